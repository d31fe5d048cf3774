#![allow(private_bounds)]

pub mod commands;
pub mod descriptor_heap;
pub mod device;
pub mod info_queue;
pub mod pipeline_layout;
pub mod pipelines;
pub mod renderer;
pub mod resources;
pub mod shaders;
pub mod swapchain;
pub mod types;

pub(crate) trait Sealed {}
