mod buffer;
mod texture;
mod upload;

pub use buffer::*;
pub use texture::*;
pub use upload::*;
