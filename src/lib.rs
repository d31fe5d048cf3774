pub mod app;
pub mod compute;
pub mod config;
pub mod debug_messages;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod resource_state;
pub mod texture_data;

#[cfg(windows)]
pub mod graphics;
#[cfg(windows)]
pub mod samples;

pub use error::{Error, Result};
