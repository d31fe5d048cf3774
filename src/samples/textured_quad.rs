use oxidx::dx;

use crate::{
    config::AppConfig,
    error::Result,
    geometry::{TexturedVertex, QUAD_INDICES, QUAD_VERTICES},
    graphics::{
        commands::CommandList,
        descriptor_heap::{CbvSrvUavHeapView, DescriptorHeap, ResourceDescriptor},
        pipeline_layout::PipelineLayout,
        pipelines::{CullMode, Graphics, GraphicsPipelineDesc, Pipeline},
        renderer::Renderer,
        resources::{Buffer, BufferUsage, Texture},
        shaders::Shader,
        types::{BindingTable, BindingType, StaticSampler},
    },
    texture_data::TextureData,
};

use super::Sample;

/// A vertex-coloured quad sampling a PNG through a static point sampler.
pub struct TexturedQuad {
    layout: PipelineLayout,
    pipeline: Pipeline<Graphics>,

    vertices: Buffer<TexturedVertex>,
    indices: Buffer<u32>,
    _texture: Texture,

    heap: DescriptorHeap<CbvSrvUavHeapView>,
    texture_srv: ResourceDescriptor<CbvSrvUavHeapView>,
}

impl Sample for TexturedQuad {
    const TITLE: &'static str = "textured quad";

    fn init(renderer: &mut Renderer, config: &AppConfig) -> Result<Self> {
        let image = TextureData::load(&config.assets.texture)?;
        let device = renderer.device().clone();

        let layout = PipelineLayout::graphics(
            &device,
            &[BindingType::Table {
                entries: &[BindingTable::Srv {
                    slot: 0,
                    space: 0,
                    count: 1,
                }],
                visibility: dx::ShaderVisibility::Pixel,
            }],
            &[StaticSampler::point_border(0)],
        )?;

        let shaders = &config.assets.shaders;
        let vs = Shader::compile(&device, shaders.join("quad.vert.hlsl"))?;
        let ps = Shader::compile(&device, shaders.join("quad.frag.hlsl"))?;

        let pipeline = Pipeline::graphics::<TexturedVertex>(
            &device,
            &GraphicsPipelineDesc {
                layout: &layout,
                vs: &vs,
                ps: &ps,
                cull_mode: CullMode::None,
            },
        )?;

        let (vertices, indices, texture) = renderer.upload(|uploader| {
            let vertices = uploader.buffer(&QUAD_VERTICES, BufferUsage::Vertex)?;
            let indices = uploader.buffer(&QUAD_INDICES, BufferUsage::Index)?;
            let texture = uploader.texture(&image)?;

            Ok((vertices, indices, texture))
        })?;

        let mut heap = device.create_cbv_srv_uav_heap(1)?;
        let texture_srv = heap.push_srv(texture.raw(), Some(&texture.srv_desc()))?;

        Ok(Self {
            layout,
            pipeline,
            vertices,
            indices,
            _texture: texture,
            heap,
            texture_srv,
        })
    }

    fn draw(&mut self, list: &CommandList) -> Result<()> {
        list.set_graphics_pipeline(&self.pipeline, &self.layout);
        list.set_descriptor_heap(&self.heap);
        list.set_graphics_table(0, self.texture_srv);

        list.bind_vertex_buffer(0, self.vertices.vertex_view());
        list.bind_index_buffer(self.indices.index_view());
        list.draw_indexed(self.indices.count() as u32);

        Ok(())
    }
}
