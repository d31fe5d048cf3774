use std::{marker::PhantomData, sync::Arc};

use oxidx::dx::{self, IDevice};

use crate::{
    error::Result,
    geometry::Vertex,
    graphics::{
        device::Device,
        pipeline_layout::PipelineLayout,
        shaders::{self, Shader},
        types::{input_layout, BACK_BUFFER_FORMAT},
    },
};

use super::{Compute, Graphics, PipelineType};

#[derive(Clone, Debug)]
pub struct Pipeline<T: PipelineType>(Arc<PipelineInner<T>>);

impl<T: PipelineType> std::ops::Deref for Pipeline<T> {
    type Target = PipelineInner<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct PipelineInner<T: PipelineType> {
    pub(crate) raw: dx::PipelineState,
    _marker: PhantomData<T>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullMode {
    None,
    Back,
}

pub struct GraphicsPipelineDesc<'a> {
    pub layout: &'a PipelineLayout,
    pub vs: &'a Shader<shaders::Vertex>,
    pub ps: &'a Shader<shaders::Pixel>,
    pub cull_mode: CullMode,
}

impl Pipeline<Graphics> {
    /// Triangle-list pipeline writing one back-buffer-format target with
    /// depth testing off.
    pub fn graphics<V: Vertex>(device: &Device, desc: &GraphicsPipelineDesc<'_>) -> Result<Self> {
        let input_layout = input_layout::<V>();

        let cull_mode = match desc.cull_mode {
            CullMode::None => dx::CullMode::None,
            CullMode::Back => dx::CullMode::Back,
        };

        let raw_desc = dx::GraphicsPipelineDesc::new(&desc.vs.raw)
            .with_ps(&desc.ps.raw)
            .with_input_layout(&input_layout)
            .with_root_signature(&desc.layout.raw)
            .with_rasterizer_state(
                dx::RasterizerDesc::default()
                    .with_fill_mode(dx::FillMode::Solid)
                    .with_cull_mode(cull_mode),
            )
            .with_blend_desc(dx::BlendDesc::default())
            .with_depth_stencil(dx::DepthStencilDesc::default().enable_depth(false), dx::Format::Unknown)
            .with_sample_mask(u32::MAX)
            .with_primitive_topology(dx::PipelinePrimitiveTopology::Triangle)
            .with_render_targets([BACK_BUFFER_FORMAT])
            .with_sample_desc(dx::SampleDesc::new(1, 0));

        let raw = device.raw.create_graphics_pipeline(&raw_desc)?;

        Ok(Self(Arc::new(PipelineInner {
            raw,
            _marker: PhantomData,
        })))
    }
}

impl Pipeline<Compute> {
    pub fn compute(
        device: &Device,
        layout: &PipelineLayout,
        cs: &Shader<shaders::Compute>,
    ) -> Result<Self> {
        let raw_desc = dx::ComputePipelineStateDesc::new(&cs.raw).with_root_signature(&layout.raw);
        let raw = device.raw.create_compute_pipeline(&raw_desc)?;

        Ok(Self(Arc::new(PipelineInner {
            raw,
            _marker: PhantomData,
        })))
    }
}
