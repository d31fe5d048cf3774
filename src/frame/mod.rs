mod pacer;
mod timeline;

pub use pacer::*;
pub use timeline::*;
