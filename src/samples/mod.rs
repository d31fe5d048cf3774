mod clear_screen;
mod compute_triangle;
mod textured_quad;

pub use clear_screen::ClearScreen;
pub use compute_triangle::ComputeTriangle;
pub use textured_quad::TexturedQuad;

use winit::{event::KeyEvent, window::Window};

use crate::{
    app::{self, Handler},
    config::AppConfig,
    error::Result,
    graphics::{commands::CommandList, renderer::Renderer},
};

/// One tutorial program. GPU objects are created in `init` and dropped with
/// the sample, so a lost device is recovered by calling `init` again.
pub trait Sample: Sized {
    const TITLE: &'static str;

    fn init(renderer: &mut Renderer, config: &AppConfig) -> Result<Self>;

    fn update(&mut self) {}

    /// Records the frame's work after the back buffer has been cleared.
    fn draw(&mut self, _list: &CommandList) -> Result<()> {
        Ok(())
    }

    fn on_key(&mut self, _event: &KeyEvent) {}

    fn on_mouse(&mut self, _x: f64, _y: f64) {}
}

pub struct SampleHost<S: Sample> {
    sample: S,
    renderer: Renderer,
}

impl<S: Sample> SampleHost<S> {
    pub fn new(window: &Window, config: &AppConfig) -> Result<Self> {
        let size = window.inner_size();
        let mut renderer = Renderer::new(
            &config.renderer,
            app::hwnd(window)?,
            size.width.max(1),
            size.height.max(1),
        )?;
        let sample = S::init(&mut renderer, config)?;

        tracing::info!(sample = S::TITLE, "sample initialised");

        Ok(Self { sample, renderer })
    }
}

impl<S: Sample> Handler for SampleHost<S> {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.renderer.resize(width, height)
    }

    fn frame(&mut self) -> Result<()> {
        self.sample.update();

        let sample = &mut self.sample;
        self.renderer.render(|list| sample.draw(list))
    }

    fn key(&mut self, event: &KeyEvent) {
        self.sample.on_key(event);
    }

    fn cursor(&mut self, x: f64, y: f64) {
        self.sample.on_mouse(x, y);
    }
}

impl<S: Sample> Drop for SampleHost<S> {
    fn drop(&mut self) {
        // The sample's resources may still be referenced by queued frames.
        self.renderer.wait_for_gpu();
    }
}

/// Loads the config and runs `S` until its window closes.
pub fn run<S: Sample>() -> Result<()> {
    let config = AppConfig::load()?;
    let title = format!("{} | {}", config.window.title, S::TITLE);
    let config = config.with_title(title);

    app::run(&config.window, |window| SampleHost::<S>::new(window, &config))
}
