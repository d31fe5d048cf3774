use std::marker::PhantomData;

use bytemuck::Pod;
use oxidx::dx::{self, IResource};

use crate::{
    geometry::Vertex,
    resource_state::{ResourceStates, TrackedState},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferUsage {
    Vertex,
    Index,
    /// Read and written by compute shaders, rests in non-pixel shader
    /// resource state.
    Storage,
}

impl BufferUsage {
    pub(crate) fn flags(self) -> dx::ResourceFlags {
        match self {
            BufferUsage::Storage => dx::ResourceFlags::AllowUnorderedAccess,
            _ => dx::ResourceFlags::empty(),
        }
    }

    pub(crate) fn resting_state(self) -> ResourceStates {
        match self {
            BufferUsage::Vertex => ResourceStates::VertexAndConstantBuffer,
            BufferUsage::Index => ResourceStates::IndexBuffer,
            BufferUsage::Storage => ResourceStates::NonPixelShaderResource,
        }
    }
}

/// A default-heap buffer of `count` elements of `T`.
#[derive(Debug)]
pub struct Buffer<T: Pod> {
    pub(crate) raw: dx::Resource,
    pub(crate) state: TrackedState,
    count: usize,
    usage: BufferUsage,
    _marker: PhantomData<T>,
}

impl<T: Pod> Buffer<T> {
    pub(crate) fn inner_new(raw: dx::Resource, count: usize, usage: BufferUsage) -> Self {
        Self {
            raw,
            state: TrackedState::new(ResourceStates::CopyDst),
            count,
            usage,
            _marker: PhantomData,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn size(&self) -> usize {
        self.count * size_of::<T>()
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn raw(&self) -> &dx::Resource {
        &self.raw
    }

    pub fn state(&self) -> &TrackedState {
        &self.state
    }

    /// Structured view over every element, for `StructuredBuffer<T>`.
    pub fn srv_desc(&self) -> dx::ShaderResourceViewDesc {
        dx::ShaderResourceViewDesc::buffer(
            dx::Format::Unknown,
            0..self.count,
            size_of::<T>(),
            dx::BufferSrvFlags::empty(),
        )
    }

    /// Structured view over every element, for `RWStructuredBuffer<T>`.
    pub fn uav_desc(&self) -> dx::UnorderedAccessViewDesc {
        dx::UnorderedAccessViewDesc::buffer(
            dx::Format::Unknown,
            0..self.count,
            size_of::<T>(),
            0,
            dx::BufferUavFlags::empty(),
        )
    }
}

impl<T: Vertex> Buffer<T> {
    pub fn vertex_view(&self) -> dx::VertexBufferView {
        dx::VertexBufferView::new(self.raw.get_gpu_virtual_address(), T::stride(), self.size())
    }
}

impl Buffer<u32> {
    pub fn index_view(&self) -> dx::IndexBufferView {
        dx::IndexBufferView::new(
            self.raw.get_gpu_virtual_address(),
            self.size(),
            dx::Format::R32Uint,
        )
    }
}
