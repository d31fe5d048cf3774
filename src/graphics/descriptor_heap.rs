use std::marker::PhantomData;

use oxidx::dx::{self, IDescriptorHeap, IDevice};

use crate::{
    error::{Error, Result},
    graphics::{device::Device, Sealed},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceDescriptor<T: DescriptorHeapType> {
    index: usize,
    gpu: dx::GpuDescriptorHandle,
    cpu: dx::CpuDescriptorHandle,
    _marker: PhantomData<T>,
}

impl<T: DescriptorHeapType> ResourceDescriptor<T> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn gpu(&self) -> dx::GpuDescriptorHandle {
        self.gpu
    }

    pub fn cpu(&self) -> dx::CpuDescriptorHandle {
        self.cpu
    }
}

/// A fixed-capacity descriptor heap filled front to back.
#[derive(Debug)]
pub struct DescriptorHeap<T: DescriptorHeapType> {
    device: Device,
    pub(crate) raw: dx::DescriptorHeap,

    size: usize,
    capacity: usize,
    increment_size: usize,

    _marker: PhantomData<T>,
}

impl<T: DescriptorHeapType> DescriptorHeap<T> {
    pub(crate) fn inner_new(device: &Device, capacity: usize) -> Result<Self> {
        let raw: dx::DescriptorHeap = device
            .raw
            .create_descriptor_heap(&T::get_desc(capacity))?;
        let increment_size = device
            .raw
            .get_descriptor_handle_increment_size(T::RAW_TYPE);

        Ok(Self {
            device: device.clone(),
            raw,
            size: 0,
            capacity,
            increment_size,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forgets every descriptor so the slots can be written again.
    pub fn reset(&mut self) {
        self.size = 0;
    }

    pub fn get(&self, index: usize) -> ResourceDescriptor<T> {
        assert!(
            index < self.size,
            "DescriptorHeap<{}>: Index out of bounds, length {} and passed {}",
            std::any::type_name::<T>(),
            self.size,
            index
        );

        self.handle(index)
    }

    fn handle(&self, index: usize) -> ResourceDescriptor<T> {
        ResourceDescriptor {
            index,
            gpu: self
                .raw
                .get_gpu_descriptor_handle_for_heap_start()
                .advance(index, self.increment_size),
            cpu: self
                .raw
                .get_cpu_descriptor_handle_for_heap_start()
                .advance(index, self.increment_size),
            _marker: PhantomData,
        }
    }

    fn next(&mut self) -> Result<ResourceDescriptor<T>> {
        if self.size == self.capacity {
            return Err(Error::Graphics(format!(
                "DescriptorHeap<{}> is full ({} descriptors)",
                std::any::type_name::<T>(),
                self.capacity
            )));
        }

        let handle = self.handle(self.size);
        self.size += 1;

        Ok(handle)
    }
}

impl DescriptorHeap<RtvHeapView> {
    pub fn push(&mut self, resource: &dx::Resource) -> Result<ResourceDescriptor<RtvHeapView>> {
        let handle = self.next()?;
        self.device
            .raw
            .create_render_target_view(Some(resource), None, handle.cpu());

        Ok(handle)
    }
}

impl DescriptorHeap<DsvHeapView> {
    pub fn push(&mut self, resource: &dx::Resource) -> Result<ResourceDescriptor<DsvHeapView>> {
        let handle = self.next()?;
        self.device
            .raw
            .create_depth_stencil_view(Some(resource), None, handle.cpu());

        Ok(handle)
    }
}

impl DescriptorHeap<CbvSrvUavHeapView> {
    pub fn push_srv(
        &mut self,
        resource: &dx::Resource,
        desc: Option<&dx::ShaderResourceViewDesc>,
    ) -> Result<ResourceDescriptor<CbvSrvUavHeapView>> {
        let handle = self.next()?;
        self.device
            .raw
            .create_shader_resource_view(Some(resource), desc, handle.cpu());

        Ok(handle)
    }

    pub fn push_uav(
        &mut self,
        resource: &dx::Resource,
        desc: Option<&dx::UnorderedAccessViewDesc>,
    ) -> Result<ResourceDescriptor<CbvSrvUavHeapView>> {
        let handle = self.next()?;
        self.device
            .raw
            .create_unordered_access_view(Some(resource), None, desc, handle.cpu());

        Ok(handle)
    }
}

pub trait DescriptorHeapType: Sealed {
    const RAW_TYPE: dx::DescriptorHeapType;

    fn get_desc(num: usize) -> dx::DescriptorHeapDesc;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RtvHeapView;
impl Sealed for RtvHeapView {}
impl DescriptorHeapType for RtvHeapView {
    const RAW_TYPE: dx::DescriptorHeapType = dx::DescriptorHeapType::Rtv;

    fn get_desc(num: usize) -> dx::DescriptorHeapDesc {
        dx::DescriptorHeapDesc::rtv(num)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DsvHeapView;
impl Sealed for DsvHeapView {}
impl DescriptorHeapType for DsvHeapView {
    const RAW_TYPE: dx::DescriptorHeapType = dx::DescriptorHeapType::Dsv;

    fn get_desc(num: usize) -> dx::DescriptorHeapDesc {
        dx::DescriptorHeapDesc::dsv(num)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CbvSrvUavHeapView;
impl Sealed for CbvSrvUavHeapView {}
impl DescriptorHeapType for CbvSrvUavHeapView {
    const RAW_TYPE: dx::DescriptorHeapType = dx::DescriptorHeapType::CbvSrvUav;

    fn get_desc(num: usize) -> dx::DescriptorHeapDesc {
        dx::DescriptorHeapDesc::cbr_srv_uav(num).with_flags(dx::DescriptorHeapFlags::ShaderVisible)
    }
}
