use std::{ops::Deref, sync::Arc};

use oxidx::dx::{self, IAdapter3, IDebug, IFactory4};

use crate::error::{Error, Result};

use super::{
    descriptor_heap::{CbvSrvUavHeapView, DescriptorHeap},
    info_queue::InfoQueue,
};

#[derive(Clone, Debug)]
pub struct Device(Arc<DeviceInner>);

impl Deref for Device {
    type Target = DeviceInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub struct DeviceInner {
    name: String,
    debug: bool,
    pub(crate) factory: dx::Factory4,
    pub(crate) raw: dx::Device,
    info_queue: Option<InfoQueue>,
}

impl Device {
    /// Creates a feature level 11.0 device on the first hardware adapter that
    /// supports it.
    pub fn new(debug: bool) -> Result<Self> {
        let flags = if debug {
            let debug: dx::Debug3 = dx::create_debug()?;
            debug.enable_debug_layer();
            tracing::info!("D3D12 debug layer enabled");

            dx::FactoryCreationFlags::Debug
        } else {
            dx::FactoryCreationFlags::empty()
        };

        let factory: dx::Factory4 = dx::create_factory(flags)?;

        let mut index = 0;
        while let Ok(adapter) = factory.enum_adapters(index) {
            index += 1;

            let desc = adapter.get_desc1()?;
            let name = desc.description().to_string();

            if desc.flags().contains(dx::AdapterFlags::Software) {
                tracing::debug!(adapter = %name, "skipping software adapter");
                continue;
            }

            match dx::create_device(Some(&adapter), dx::FeatureLevel::Level11) {
                Ok(raw) => {
                    tracing::info!(adapter = %name, "created device");

                    let info_queue = match debug.then(|| InfoQueue::inner_new(&raw)) {
                        Some(Ok(queue)) => Some(queue),
                        Some(Err(err)) => {
                            tracing::warn!(%err, "debug layer messages are unavailable");
                            None
                        }
                        None => None,
                    };

                    return Ok(Self(Arc::new(DeviceInner {
                        name,
                        debug,
                        factory,
                        raw,
                        info_queue,
                    })));
                }
                Err(err) => tracing::debug!(adapter = %name, ?err, "adapter rejected"),
            }
        }

        Err(Error::NoAdapter)
    }
}

impl DeviceInner {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Forwards pending debug layer messages to the log.
    pub fn drain_debug_messages(&self) {
        if let Some(queue) = &self.info_queue {
            queue.drain();
        }
    }
}

impl Device {
    pub fn create_cbv_srv_uav_heap(
        &self,
        capacity: usize,
    ) -> Result<DescriptorHeap<CbvSrvUavHeapView>> {
        DescriptorHeap::inner_new(self, capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::Device;

    const fn is_send_sync<T: Send + Sync>() {}

    const _: () = is_send_sync::<Device>();
}
