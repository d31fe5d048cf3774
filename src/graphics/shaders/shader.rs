use std::{marker::PhantomData, path::Path};

use oxidx::dx::{self, IBlobExt};

use crate::{
    error::{Error, Result},
    graphics::device::Device,
};

use super::ShaderType;

#[derive(Clone, Debug)]
pub struct Shader<T: ShaderType> {
    pub(crate) raw: dx::Blob,
    _marker: PhantomData<T>,
}

impl<T: ShaderType> Shader<T> {
    /// Compiles the `main` entry point of an HLSL file.
    pub fn compile(device: &Device, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let flags = if device.is_debug() {
            dx::COMPILE_DEBUG | dx::COMPILE_SKIP_OPT
        } else {
            dx::COMPILE_OPT3
        };

        let raw = dx::Blob::compile_from_file(path, &[], c"main", T::TARGET, flags, 0)
            .map_err(|err| Error::Asset {
                path: path.to_path_buf(),
                reason: format!("{err:?}"),
            })?;

        tracing::debug!(path = %path.display(), target = ?T::TARGET, "compiled shader");

        Ok(Self {
            raw,
            _marker: PhantomData,
        })
    }
}
