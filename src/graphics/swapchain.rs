use std::num::NonZero;

use oxidx::dx::{self, IDevice, IFactory4, ISwapchain1, ISwapchain3, OUTPUT_NONE};
use smallvec::SmallVec;

use crate::{
    error::{Error, Result},
    frame::MAX_FRAMES_IN_FLIGHT,
    graphics::{
        commands::CommandQueue,
        descriptor_heap::{DescriptorHeap, DsvHeapView, ResourceDescriptor, RtvHeapView},
        device::Device,
        types::{BACK_BUFFER_FORMAT, DEPTH_FORMAT},
    },
    resource_state::{ResourceStates, TrackedState},
};

#[derive(Debug)]
pub(crate) struct BackBuffer {
    pub(crate) raw: dx::Resource,
    pub(crate) state: TrackedState,
    pub(crate) rtv: ResourceDescriptor<RtvHeapView>,
}

/// Flip-discard swap chain plus the depth buffer rendered alongside it.
#[derive(Debug)]
pub struct Swapchain {
    device: Device,
    raw: dx::Swapchain3,
    hwnd: NonZero<isize>,

    rtv_heap: DescriptorHeap<RtvHeapView>,
    dsv_heap: DescriptorHeap<DsvHeapView>,

    pub(crate) back_buffers: SmallVec<[BackBuffer; MAX_FRAMES_IN_FLIGHT]>,
    depth: Option<dx::Resource>,
    pub(crate) dsv: Option<ResourceDescriptor<DsvHeapView>>,

    width: u32,
    height: u32,
}

impl Swapchain {
    pub(crate) fn inner_new(
        device: &Device,
        queue: &CommandQueue,
        hwnd: NonZero<isize>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let desc = dx::SwapchainDesc1::new(width, height)
            .with_format(BACK_BUFFER_FORMAT)
            .with_buffer_count(MAX_FRAMES_IN_FLIGHT)
            .with_usage(dx::FrameBufferUsage::RenderTargetOutput)
            .with_scaling(dx::Scaling::Stretch)
            .with_swap_effect(dx::SwapEffect::FlipDiscard)
            .with_alpha_mode(dx::AlphaMode::Ignore);

        let raw: dx::Swapchain1 = device
            .factory
            .create_swapchain_for_hwnd(&queue.raw, hwnd, &desc, None, OUTPUT_NONE)?;
        device
            .factory
            .make_window_association(hwnd, dx::WindowAssociationFlags::NoAltEnter)?;

        let raw: dx::Swapchain3 = raw
            .try_into()
            .map_err(|_| Error::Graphics("IDXGISwapChain3 is not supported".to_string()))?;

        let mut swapchain = Self {
            device: device.clone(),
            raw,
            hwnd,
            rtv_heap: DescriptorHeap::inner_new(device, MAX_FRAMES_IN_FLIGHT)?,
            dsv_heap: DescriptorHeap::inner_new(device, 1)?,
            back_buffers: Default::default(),
            depth: None,
            dsv: None,
            width,
            height,
        };
        swapchain.create_views()?;

        tracing::debug!(hwnd = swapchain.hwnd.get(), width, height, "created swap chain");

        Ok(swapchain)
    }

    /// Drops every reference to the back buffers. `ResizeBuffers` fails while
    /// any of them is alive.
    pub(crate) fn release_buffers(&mut self) {
        self.back_buffers.clear();
        self.rtv_heap.reset();
        self.depth = None;
        self.dsv = None;
        self.dsv_heap.reset();
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.release_buffers();

        self.raw.resize_buffers(
            MAX_FRAMES_IN_FLIGHT,
            width,
            height,
            BACK_BUFFER_FORMAT,
            dx::SwapchainFlags::empty(),
        )?;

        self.width = width;
        self.height = height;
        self.create_views()?;

        tracing::debug!(width, height, "resized swap chain");

        Ok(())
    }

    fn create_views(&mut self) -> Result<()> {
        for i in 0..MAX_FRAMES_IN_FLIGHT {
            let raw: dx::Resource = self.raw.get_buffer(i)?;
            let rtv = self.rtv_heap.push(&raw)?;

            self.back_buffers.push(BackBuffer {
                raw,
                state: TrackedState::new(ResourceStates::Present),
                rtv,
            });
        }

        let depth: dx::Resource = self.device.raw.create_committed_resource(
            &dx::HeapProperties::default(),
            dx::HeapFlags::empty(),
            &dx::ResourceDesc::texture_2d(self.width, self.height)
                .with_format(DEPTH_FORMAT)
                .with_mip_levels(1)
                .with_flags(dx::ResourceFlags::AllowDepthStencil),
            dx::ResourceStates::DepthWrite,
            Some(&dx::ClearValue::depth(DEPTH_FORMAT, 1.0, 0)),
        )?;

        self.dsv = Some(self.dsv_heap.push(&depth)?);
        self.depth = Some(depth);

        Ok(())
    }

    pub fn current_back_buffer_index(&self) -> usize {
        self.raw.get_current_back_buffer_index() as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn present(&self, vsync: bool) -> Result<()> {
        let interval = if vsync { 1 } else { 0 };
        self.raw.present(interval, dx::PresentFlags::empty())?;

        Ok(())
    }
}
