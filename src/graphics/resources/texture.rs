use oxidx::dx;

use crate::resource_state::{ResourceStates, TrackedState};

pub const TEXTURE_FORMAT: dx::Format = dx::Format::Rgba8Unorm;

/// A sampled 2D texture with a single mip.
#[derive(Debug)]
pub struct Texture {
    pub(crate) raw: dx::Resource,
    pub(crate) state: TrackedState,
    width: u32,
    height: u32,
}

impl Texture {
    pub(crate) fn inner_new(raw: dx::Resource, width: u32, height: u32) -> Self {
        Self {
            raw,
            state: TrackedState::new(ResourceStates::CopyDst),
            width,
            height,
        }
    }

    pub fn raw(&self) -> &dx::Resource {
        &self.raw
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn srv_desc(&self) -> dx::ShaderResourceViewDesc {
        dx::ShaderResourceViewDesc::texture_2d(TEXTURE_FORMAT, 0, 1, 0.0, 0)
    }
}
