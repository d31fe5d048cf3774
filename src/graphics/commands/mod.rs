mod command_list;
mod command_queue;

pub use command_list::*;
pub use command_queue::*;
