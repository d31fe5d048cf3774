use oxidx::dx::{self, ICommandQueue, IDevice, IFence};

use crate::{
    error::{Error, Result},
    frame::Timeline,
    graphics::device::Device,
};

use super::CommandList;

/// The direct queue together with the fence and event used to wait on it.
pub struct CommandQueue {
    pub(crate) raw: dx::CommandQueue,
    fence: dx::Fence,
    event: dx::Event,
}

impl CommandQueue {
    pub(crate) fn inner_new(device: &Device, initial_value: u64) -> Result<Self> {
        let raw = device
            .raw
            .create_command_queue(&dx::CommandQueueDesc::direct())?;
        let fence = device
            .raw
            .create_fence(initial_value, dx::FenceFlags::empty())?;
        let event = dx::Event::create(false, false)?;

        Ok(Self { raw, fence, event })
    }

    pub fn execute(&self, list: &CommandList) {
        self.raw
            .execute_command_lists(&[Some(list.raw.clone())]);
    }
}

impl std::fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandQueue")
            .field("raw", &self.raw)
            .field("completed", &self.fence.get_completed_value())
            .finish_non_exhaustive()
    }
}

impl Timeline for CommandQueue {
    fn signal(&self, value: u64) -> Result<()> {
        self.raw.signal(&self.fence, value)?;
        Ok(())
    }

    fn completed_value(&self) -> u64 {
        self.fence.get_completed_value()
    }

    fn wait(&self, value: u64) -> Result<()> {
        if self.is_lost() {
            return Err(Error::DeviceLost);
        }

        if self.is_complete(value) {
            return Ok(());
        }

        self.fence.set_event_on_completion(value, self.event)?;
        self.event.wait(u32::MAX);

        if self.is_lost() {
            return Err(Error::DeviceLost);
        }

        Ok(())
    }
}

impl Drop for CommandQueue {
    fn drop(&mut self) {
        if let Err(err) = self.event.close() {
            tracing::warn!(?err, "failed to close fence event");
        }
    }
}
