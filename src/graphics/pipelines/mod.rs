mod pipeline;
mod pipeline_type;

pub use pipeline::*;
pub use pipeline_type::*;
