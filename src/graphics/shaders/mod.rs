mod shader;
mod shader_type;

pub use shader::*;
pub use shader_type::*;
