use crate::{config::AppConfig, error::Result, graphics::renderer::Renderer};

use super::Sample;

/// Clears the window and presents. Everything happens in the renderer.
pub struct ClearScreen;

impl Sample for ClearScreen {
    const TITLE: &'static str = "clear screen";

    fn init(_renderer: &mut Renderer, _config: &AppConfig) -> Result<Self> {
        Ok(Self)
    }
}
