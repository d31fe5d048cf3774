use oxidx::dx;
use smallvec::SmallVec;

use crate::{
    compute::{PingPong, BUFFER_COUNT, DESCRIPTOR_COUNT, PARTICLE_COUNT, RESTING_STATE},
    config::AppConfig,
    error::{Error, Result},
    geometry::{Particle, TRIANGLE_PARTICLES},
    graphics::{
        commands::CommandList,
        descriptor_heap::{CbvSrvUavHeapView, DescriptorHeap},
        pipeline_layout::PipelineLayout,
        pipelines::{Compute, CullMode, Graphics, GraphicsPipelineDesc, Pipeline},
        renderer::Renderer,
        resources::{Buffer, BufferUsage},
        shaders::Shader,
        types::{BindingTable, BindingType},
    },
    resource_state::ResourceStates,
};

use super::Sample;

/// Three particles advanced by a compute shader through two ping-pong
/// buffers, then drawn straight from the latest buffer as a red triangle.
pub struct ComputeTriangle {
    layout: PipelineLayout,
    pipeline: Pipeline<Graphics>,

    compute_layout: PipelineLayout,
    compute_pipeline: Pipeline<Compute>,

    buffers: SmallVec<[Buffer<Particle>; BUFFER_COUNT]>,
    heap: DescriptorHeap<CbvSrvUavHeapView>,
    ping_pong: PingPong,
    steps_per_frame: u32,
}

impl Sample for ComputeTriangle {
    const TITLE: &'static str = "compute triangle";

    fn init(renderer: &mut Renderer, config: &AppConfig) -> Result<Self> {
        let device = renderer.device().clone();
        let shaders = &config.assets.shaders;

        let layout = PipelineLayout::graphics(&device, &[], &[])?;
        let vs = Shader::compile(&device, shaders.join("particles.vert.hlsl"))?;
        let ps = Shader::compile(&device, shaders.join("particles.frag.hlsl"))?;
        let pipeline = Pipeline::graphics::<Particle>(
            &device,
            &GraphicsPipelineDesc {
                layout: &layout,
                vs: &vs,
                ps: &ps,
                cull_mode: CullMode::Back,
            },
        )?;

        let compute_layout = PipelineLayout::compute(
            &device,
            &[
                BindingType::Table {
                    entries: &[BindingTable::Srv {
                        slot: 0,
                        space: 0,
                        count: 1,
                    }],
                    visibility: dx::ShaderVisibility::All,
                },
                BindingType::Table {
                    entries: &[BindingTable::Uav {
                        slot: 0,
                        space: 0,
                        count: 1,
                    }],
                    visibility: dx::ShaderVisibility::All,
                },
            ],
        )?;
        let cs = Shader::compile(&device, shaders.join("particles.comp.hlsl"))?;
        let compute_pipeline = Pipeline::compute(&device, &compute_layout, &cs)?;

        let buffers = renderer.upload(|uploader| {
            (0..BUFFER_COUNT)
                .map(|_| uploader.buffer(&TRIANGLE_PARTICLES, BufferUsage::Storage))
                .collect::<Result<SmallVec<[_; BUFFER_COUNT]>>>()
        })?;

        let mut heap = device.create_cbv_srv_uav_heap(DESCRIPTOR_COUNT)?;
        for buffer in &buffers {
            heap.push_uav(buffer.raw(), Some(&buffer.uav_desc()))?;
        }
        for buffer in &buffers {
            heap.push_srv(buffer.raw(), Some(&buffer.srv_desc()))?;
        }

        Ok(Self {
            layout,
            pipeline,
            compute_layout,
            compute_pipeline,
            buffers,
            heap,
            ping_pong: PingPong::new(),
            steps_per_frame: config.compute.steps_per_frame,
        })
    }

    fn draw(&mut self, list: &CommandList) -> Result<()> {
        let (buffers, heap) = (&self.buffers, &self.heap);

        list.set_compute_pipeline(&self.compute_pipeline, &self.compute_layout);
        list.set_descriptor_heap(heap);

        self.ping_pong.run(self.steps_per_frame, |slots| {
            let target = &buffers[slots.write];

            list.transition(target.raw(), target.state(), ResourceStates::UnorderedAccess);

            list.set_compute_table(0, heap.get(slots.srv as usize));
            list.set_compute_table(1, heap.get(slots.uav as usize));
            list.dispatch(PARTICLE_COUNT, 1, 1);

            list.transition(target.raw(), target.state(), RESTING_STATE);

            Ok::<_, Error>(())
        })?;

        let latest = &self.buffers[self.ping_pong.read_index()];
        list.transition(
            latest.raw(),
            latest.state(),
            ResourceStates::VertexAndConstantBuffer,
        );

        list.set_graphics_pipeline(&self.pipeline, &self.layout);
        list.bind_vertex_buffer(0, latest.vertex_view());
        list.draw(PARTICLE_COUNT);

        list.transition(latest.raw(), latest.state(), RESTING_STATE);

        Ok(())
    }
}
