use oxidx::dx::{self, IDevice, IGraphicsCommandList};

use crate::{
    error::Result,
    graphics::{
        descriptor_heap::{CbvSrvUavHeapView, DescriptorHeap, ResourceDescriptor},
        device::Device,
        pipeline_layout::PipelineLayout,
        pipelines::{Compute, Graphics, Pipeline},
    },
    resource_state::{ResourceStates, TrackedState},
};

/// A direct command list. Everything a sample records goes through here.
#[derive(Debug)]
pub struct CommandList {
    pub(crate) raw: dx::GraphicsCommandList,
}

impl CommandList {
    pub(crate) fn inner_new(device: &Device, allocator: &dx::CommandAllocator) -> Result<Self> {
        let raw: dx::GraphicsCommandList = device.raw.create_command_list(
            0,
            dx::CommandListType::Direct,
            allocator,
            dx::PSO_NONE,
        )?;
        raw.close()?;

        Ok(Self { raw })
    }

    pub(crate) fn reset(&self, allocator: &dx::CommandAllocator) -> Result<()> {
        self.raw.reset(allocator, dx::PSO_NONE)?;
        Ok(())
    }

    pub(crate) fn close(&self) -> Result<()> {
        self.raw.close()?;
        Ok(())
    }
}

impl CommandList {
    pub fn barrier(&self, barriers: &[dx::ResourceBarrier<'_>]) {
        self.raw.resource_barrier(barriers);
    }

    /// Moves `resource` into `state`, skipping the barrier when it is
    /// already there.
    pub fn transition(&self, resource: &dx::Resource, tracked: &TrackedState, state: ResourceStates) {
        if let Some(transition) = tracked.transition(state) {
            self.barrier(&[dx::ResourceBarrier::transition(
                resource,
                transition.before.as_raw(),
                transition.after.as_raw(),
                None,
            )]);
        }
    }

    pub fn clear_rt(&self, handle: dx::CpuDescriptorHandle, color: [f32; 4]) {
        self.raw.clear_render_target_view(handle, color, &[]);
    }

    pub fn clear_depth(&self, handle: dx::CpuDescriptorHandle, depth: f32) {
        self.raw
            .clear_depth_stencil_view(handle, dx::ClearFlags::Depth, depth, 0, &[]);
    }

    pub fn set_render_target(&self, rtv: dx::CpuDescriptorHandle, dsv: dx::CpuDescriptorHandle) {
        self.raw.om_set_render_targets(&[rtv], false, Some(dsv));
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.raw.rs_set_viewports(&[dx::Viewport::from_size((
            width as f32,
            height as f32,
        ))]);
        self.raw.rs_set_scissor_rects(&[dx::Rect::default()
            .with_size((width as i32, height as i32))]);
    }

    pub fn set_descriptor_heap(&self, heap: &DescriptorHeap<CbvSrvUavHeapView>) {
        self.raw.set_descriptor_heaps(&[Some(heap.raw.clone())]);
    }
}

impl CommandList {
    pub fn set_graphics_pipeline(&self, pipeline: &Pipeline<Graphics>, layout: &PipelineLayout) {
        self.raw.set_pipeline_state(&pipeline.raw);
        self.raw.set_graphics_root_signature(Some(&layout.raw));
    }

    pub fn set_graphics_table(&self, index: u32, table: ResourceDescriptor<CbvSrvUavHeapView>) {
        self.raw
            .set_graphics_root_descriptor_table(index, table.gpu());
    }

    pub fn bind_vertex_buffer(&self, slot: u32, view: dx::VertexBufferView) {
        self.raw.ia_set_vertex_buffers(slot, &[view]);
    }

    pub fn bind_index_buffer(&self, view: dx::IndexBufferView) {
        self.raw.ia_set_index_buffer(Some(&view));
    }

    pub fn draw(&self, vertex_count: u32) {
        self.raw
            .ia_set_primitive_topology(dx::PrimitiveTopology::Triangle);
        self.raw.draw_instanced(vertex_count, 1, 0, 0);
    }

    pub fn draw_indexed(&self, index_count: u32) {
        self.raw
            .ia_set_primitive_topology(dx::PrimitiveTopology::Triangle);
        self.raw.draw_indexed_instanced(index_count, 1, 0, 0, 0);
    }
}

impl CommandList {
    pub fn set_compute_pipeline(&self, pipeline: &Pipeline<Compute>, layout: &PipelineLayout) {
        self.raw.set_compute_root_signature(Some(&layout.raw));
        self.raw.set_pipeline_state(&pipeline.raw);
    }

    pub fn set_compute_table(&self, index: u32, table: ResourceDescriptor<CbvSrvUavHeapView>) {
        self.raw.set_compute_root_descriptor_table(index, table.gpu());
    }

    pub fn dispatch(&self, x: u32, y: u32, z: u32) {
        self.raw.dispatch(x, y, z);
    }
}
