use oxidx::dx::{self, IInfoQueue};

use crate::{
    debug_messages::{self, DeniedMessage, MessageSeverity, DENIED_MESSAGES},
    error::Result,
};

/// The device's debug message queue. Only exists when the debug layer is on.
#[derive(Debug)]
pub struct InfoQueue {
    raw: dx::InfoQueue,
}

impl InfoQueue {
    pub(crate) fn inner_new(device: &dx::Device) -> Result<Self> {
        let raw: dx::InfoQueue = device.try_into()?;

        let deny = DENIED_MESSAGES.map(DeniedMessage::as_raw);
        raw.push_storage_filter(&dx::InfoQueueFilter::default().with_deny_ids(&deny))?;

        tracing::debug!(denied = deny.len(), "debug message queue ready");

        Ok(Self { raw })
    }

    /// Logs every stored message and empties the queue.
    pub fn drain(&self) {
        let count = self.raw.get_num_stored_messages();

        for index in 0..count {
            match self.raw.get_message(index) {
                Ok(message) => debug_messages::log(message.severity().into(), message.description()),
                Err(err) => tracing::warn!(?err, index, "failed to read debug message"),
            }
        }

        self.raw.clear_stored_messages();
    }
}

impl DeniedMessage {
    pub(crate) fn as_raw(self) -> dx::MessageId {
        match self {
            DeniedMessage::MapInvalidNullRange => dx::MessageId::MapInvalidNullRange,
            DeniedMessage::UnmapInvalidNullRange => dx::MessageId::UnmapInvalidNullRange,
        }
    }
}

impl From<dx::MessageSeverity> for MessageSeverity {
    fn from(value: dx::MessageSeverity) -> Self {
        match value {
            dx::MessageSeverity::Corruption => MessageSeverity::Corruption,
            dx::MessageSeverity::Error => MessageSeverity::Error,
            dx::MessageSeverity::Warning => MessageSeverity::Warning,
            dx::MessageSeverity::Info => MessageSeverity::Info,
            dx::MessageSeverity::Message => MessageSeverity::Message,
        }
    }
}
