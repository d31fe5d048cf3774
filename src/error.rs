use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to load asset {path}: {reason}")]
    Asset { path: PathBuf, reason: String },

    #[error("window error: {0}")]
    Window(String),

    #[error("no hardware adapter supports feature level 11.0")]
    NoAdapter,

    #[error("graphics device was removed or reset")]
    DeviceLost,

    #[error("graphics API call failed: {0}")]
    Graphics(String),

    #[error("Direct3D 12 samples only run on Windows")]
    UnsupportedPlatform,
}

impl Error {
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Error::DeviceLost)
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(value: winit::error::EventLoopError) -> Self {
        Error::Window(value.to_string())
    }
}

impl From<winit::error::OsError> for Error {
    fn from(value: winit::error::OsError) -> Self {
        Error::Window(value.to_string())
    }
}

#[cfg(windows)]
impl From<oxidx::dx::DxError> for Error {
    fn from(value: oxidx::dx::DxError) -> Self {
        match value {
            oxidx::dx::DxError::DeviceRemoved | oxidx::dx::DxError::DeviceReset => {
                Error::DeviceLost
            }
            other => Error::Graphics(format!("{other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    const fn is_send_sync<T: Send + Sync>() {}

    const _: () = is_send_sync::<Error>();

    #[test]
    fn only_device_lost_is_device_lost() {
        assert!(Error::DeviceLost.is_device_lost());
        assert!(!Error::NoAdapter.is_device_lost());
        assert!(!Error::Graphics("E_INVALIDARG".into()).is_device_lost());
    }

    #[test]
    fn asset_error_names_the_file() {
        let err = Error::Asset {
            path: "data/checker.png".into(),
            reason: "not found".into(),
        };

        assert_eq!(
            err.to_string(),
            "failed to load asset data/checker.png: not found"
        );
    }
}
