//! Messages reported by the Direct3D 12 debug layer, forwarded to `tracing`.

use tracing::Level;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageSeverity {
    Corruption,
    Error,
    Warning,
    Info,
    Message,
}

impl MessageSeverity {
    /// Corruption and errors surface as `error!`, so they stand out the way a
    /// debugger break would.
    pub fn level(self) -> Level {
        match self {
            MessageSeverity::Corruption | MessageSeverity::Error => Level::ERROR,
            MessageSeverity::Warning => Level::WARN,
            MessageSeverity::Info => Level::INFO,
            MessageSeverity::Message => Level::DEBUG,
        }
    }
}

/// Messages kept out of the queue entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeniedMessage {
    /// `Map` called with a null read range.
    MapInvalidNullRange,
    /// `Unmap` called with a null written range.
    UnmapInvalidNullRange,
}

pub const DENIED_MESSAGES: [DeniedMessage; 2] = [
    DeniedMessage::MapInvalidNullRange,
    DeniedMessage::UnmapInvalidNullRange,
];

pub fn log(severity: MessageSeverity, description: &str) {
    match severity {
        MessageSeverity::Corruption | MessageSeverity::Error => {
            tracing::error!(target: "d3d12", ?severity, "{description}")
        }
        MessageSeverity::Warning => tracing::warn!(target: "d3d12", "{description}"),
        MessageSeverity::Info => tracing::info!(target: "d3d12", "{description}"),
        MessageSeverity::Message => tracing::debug!(target: "d3d12", "{description}"),
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::{log, DeniedMessage, MessageSeverity, DENIED_MESSAGES};

    #[test]
    fn corruption_and_errors_log_as_errors() {
        assert_eq!(MessageSeverity::Corruption.level(), Level::ERROR);
        assert_eq!(MessageSeverity::Error.level(), Level::ERROR);
        assert_eq!(MessageSeverity::Warning.level(), Level::WARN);
        assert_eq!(MessageSeverity::Info.level(), Level::INFO);
        assert_eq!(MessageSeverity::Message.level(), Level::DEBUG);
    }

    #[test]
    fn null_range_map_messages_are_denied() {
        assert!(DENIED_MESSAGES.contains(&DeniedMessage::MapInvalidNullRange));
        assert!(DENIED_MESSAGES.contains(&DeniedMessage::UnmapInvalidNullRange));
    }

    #[test]
    fn logging_without_subscriber_is_harmless() {
        log(MessageSeverity::Corruption, "heap corrupted");
        log(MessageSeverity::Message, "resource created");
    }
}
