use std::num::NonZero;

use oxidx::dx::{self, ICommandAllocator, IDevice};
use smallvec::SmallVec;

use crate::{
    config::RendererConfig,
    error::{Error, Result},
    frame::{FramePacer, MAX_FRAMES_IN_FLIGHT},
    resource_state::ResourceStates,
};

use super::{
    commands::{CommandList, CommandQueue},
    device::Device,
    resources::Uploader,
    swapchain::Swapchain,
};

/// Owns the device, the direct queue and the swap chain, and records one
/// command list per frame.
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,

    device: Device,
    queue: CommandQueue,
    allocators: SmallVec<[dx::CommandAllocator; MAX_FRAMES_IN_FLIGHT]>,
    list: CommandList,
    swapchain: Swapchain,

    pacer: FramePacer,
}

impl Renderer {
    pub fn new(
        config: &RendererConfig,
        hwnd: NonZero<isize>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let device = Device::new(config.debug_layer)?;

        let mut pacer = FramePacer::new();
        let queue = CommandQueue::inner_new(&device, pacer.arm())?;

        let allocators = (0..MAX_FRAMES_IN_FLIGHT)
            .map(|_| device.raw.create_command_allocator(dx::CommandListType::Direct))
            .collect::<std::result::Result<SmallVec<[dx::CommandAllocator; MAX_FRAMES_IN_FLIGHT]>, _>>()?;
        let list = CommandList::inner_new(&device, &allocators[pacer.frame_index()])?;

        pacer.wait_for_gpu(&queue);
        pacer.sync_all_frames();

        let swapchain = Swapchain::inner_new(&device, &queue, hwnd, width, height)?;
        pacer.set_frame_index(swapchain.current_back_buffer_index());

        tracing::info!(adapter = device.name(), width, height, "renderer ready");

        Ok(Self {
            config: config.clone(),
            device,
            queue,
            allocators,
            list,
            swapchain,
            pacer,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn width(&self) -> u32 {
        self.swapchain.width()
    }

    pub fn height(&self) -> u32 {
        self.swapchain.height()
    }

    pub fn frame_index(&self) -> usize {
        self.pacer.frame_index()
    }

    pub fn wait_for_gpu(&mut self) {
        self.pacer.wait_for_gpu(&self.queue);
    }

    /// Recreates the back buffers at the new size. A zero-sized (minimised)
    /// window keeps the old buffers.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            tracing::trace!("window minimised, skipping resize");
            return Ok(());
        }

        if width == self.width() && height == self.height() {
            return Ok(());
        }

        self.pacer.wait_for_gpu(&self.queue);
        self.swapchain.release_buffers();
        self.pacer.sync_all_frames();

        self.swapchain.resize(width, height)?;
        self.pacer
            .set_frame_index(self.swapchain.current_back_buffer_index());

        Ok(())
    }

    /// Records one-off copies, submits them and blocks until the GPU is done
    /// so the staging memory can be released.
    pub fn upload<R>(&mut self, record: impl FnOnce(&mut Uploader<'_>) -> Result<R>) -> Result<R> {
        self.pacer.wait_for_gpu(&self.queue);

        let allocator = &self.allocators[self.pacer.frame_index()];
        allocator.reset()?;
        self.list.reset(allocator)?;

        let mut uploader = Uploader::new(&self.device, &self.list);
        let result = record(&mut uploader);
        let staging = uploader.into_staging();

        self.list.close()?;
        let value = result?;

        self.queue.execute(&self.list);
        self.pacer.wait_for_gpu(&self.queue);
        self.device.drain_debug_messages();

        tracing::debug!(staging = staging.len(), "upload finished");
        drop(staging);

        Ok(value)
    }

    /// Records a frame: clears the back buffer, lets `record` add its work and
    /// presents.
    pub fn render(&mut self, record: impl FnOnce(&CommandList) -> Result<()>) -> Result<()> {
        self.begin_frame()?;

        if let Err(err) = record(&self.list) {
            self.abandon_frame();
            return Err(err);
        }

        self.end_frame()
    }

    /// Returns the back buffer to PRESENT so the next frame records its
    /// barrier again, then closes the list without submitting it.
    fn abandon_frame(&mut self) {
        let back_buffer = &self.swapchain.back_buffers[self.pacer.frame_index()];
        self.list.transition(
            &back_buffer.raw,
            &back_buffer.state,
            ResourceStates::Present,
        );

        if let Err(err) = self.list.close() {
            tracing::warn!(%err, "failed to close an abandoned command list");
        }
    }

    fn begin_frame(&mut self) -> Result<()> {
        let index = self.pacer.frame_index();

        let allocator = &self.allocators[index];
        allocator.reset()?;
        self.list.reset(allocator)?;

        let back_buffer = &self.swapchain.back_buffers[index];
        let dsv = self
            .swapchain
            .dsv
            .ok_or_else(|| Error::Graphics("depth buffer is missing".to_string()))?;

        self.list.transition(
            &back_buffer.raw,
            &back_buffer.state,
            ResourceStates::RenderTarget,
        );

        self.list.set_render_target(back_buffer.rtv.cpu(), dsv.cpu());
        self.list
            .clear_rt(back_buffer.rtv.cpu(), self.config.clear_color);
        self.list.clear_depth(dsv.cpu(), 1.0);
        self.list.set_viewport(self.width(), self.height());

        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        let back_buffer = &self.swapchain.back_buffers[self.pacer.frame_index()];
        self.list.transition(
            &back_buffer.raw,
            &back_buffer.state,
            ResourceStates::Present,
        );

        self.list.close()?;
        self.queue.execute(&self.list);
        self.device.drain_debug_messages();

        if let Err(err) = self.swapchain.present(self.config.vsync) {
            if err.is_device_lost() {
                tracing::warn!("device lost during present");
            }
            return Err(err);
        }

        self.pacer
            .move_to_next_frame(&self.queue, self.swapchain.current_back_buffer_index())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.pacer.wait_for_gpu(&self.queue);
    }
}
