//! The window runtime shared by every sample: one window, a continuous redraw
//! loop and recovery from a lost device.

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::WindowConfig,
    error::{Error, Result},
};

/// What the runtime drives once a window exists.
pub trait Handler {
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    fn frame(&mut self) -> Result<()>;

    fn key(&mut self, _event: &KeyEvent) {}

    fn cursor(&mut self, _x: f64, _y: f64) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Drop the handler and build a new one for the same window.
    Rebuild,
    Exit,
}

impl Control {
    pub fn after(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Control::Continue,
            Err(err) if err.is_device_lost() => Control::Rebuild,
            Err(_) => Control::Exit,
        }
    }
}

pub fn is_minimised(size: PhysicalSize<u32>) -> bool {
    size.width == 0 || size.height == 0
}

/// Redraw continuously while the window is visible. A minimised window
/// sleeps until the next event.
pub fn control_flow(minimised: bool) -> ControlFlow {
    if minimised {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    }
}

pub fn is_exit_key(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
}

/// Opens the window and runs until it is closed or Escape is pressed.
/// `factory` builds the handler and is called again after a device loss.
pub fn run<H, F>(config: &WindowConfig, factory: F) -> Result<()>
where
    H: Handler,
    F: FnMut(&Window) -> Result<H>,
{
    let event_loop = EventLoop::new()?;
    let mut runtime = Runtime {
        handler: None,
        window: None,
        config: config.clone(),
        factory,
        minimised: false,
        error: None,
    };

    event_loop.run_app(&mut runtime)?;

    match runtime.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Runtime<H, F> {
    // Dropped before the window it renders into.
    handler: Option<H>,
    window: Option<Window>,

    config: WindowConfig,
    factory: F,
    minimised: bool,
    error: Option<Error>,
}

impl<H, F> Runtime<H, F>
where
    H: Handler,
    F: FnMut(&Window) -> Result<H>,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        tracing::error!(%err, "shutting down");
        self.handler = None;
        self.error = Some(err);
        event_loop.exit();
    }

    fn build_handler(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        match (self.factory)(window) {
            Ok(handler) => self.handler = Some(handler),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, result: Result<()>) {
        match Control::after(&result) {
            Control::Continue => {}
            Control::Rebuild => {
                tracing::warn!("device lost, recreating every GPU object");
                self.handler = None;
                self.build_handler(event_loop);
            }
            Control::Exit => {
                if let Err(err) = result {
                    self.fail(event_loop, err);
                }
            }
        }
    }
}

impl<H, F> ApplicationHandler for Runtime<H, F>
where
    H: Handler,
    F: FnMut(&Window) -> Result<H>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                tracing::info!(
                    title = %self.config.title,
                    width = self.config.width,
                    height = self.config.height,
                    "window created"
                );
                self.window = Some(window);
                self.build_handler(event_loop);
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(control_flow(self.minimised));
        if self.minimised {
            return;
        }

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if is_exit_key(&event) {
                    event_loop.exit();
                    return;
                }

                if let Some(handler) = self.handler.as_mut() {
                    handler.key(&event);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(handler) = self.handler.as_mut() {
                    handler.cursor(position.x, position.y);
                }
            }

            WindowEvent::Resized(size) => {
                self.minimised = is_minimised(size);
                if self.minimised {
                    return;
                }

                if let Some(handler) = self.handler.as_mut() {
                    let result = handler.resize(size.width, size.height);
                    self.apply(event_loop, result);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.minimised {
                    return;
                }

                if let Some(handler) = self.handler.as_mut() {
                    let result = handler.frame();
                    self.apply(event_loop, result);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.handler = None;
        tracing::info!("event loop exiting");
    }
}

/// The Win32 handle a swap chain is created for.
#[cfg(windows)]
pub fn hwnd(window: &Window) -> Result<std::num::NonZero<isize>> {
    use winit::raw_window_handle::{HasWindowHandle, RawWindowHandle};

    let handle = window
        .window_handle()
        .map_err(|err| Error::Window(err.to_string()))?;

    match handle.as_raw() {
        RawWindowHandle::Win32(handle) => Ok(handle.hwnd),
        other => Err(Error::Window(format!("unexpected window handle {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use winit::{dpi::PhysicalSize, event_loop::ControlFlow};

    use crate::error::Error;

    use super::{control_flow, is_minimised, Control};

    #[test]
    fn successful_frame_continues() {
        assert_eq!(Control::after(&Ok(())), Control::Continue);
    }

    #[test]
    fn device_lost_rebuilds() {
        assert_eq!(Control::after(&Err(Error::DeviceLost)), Control::Rebuild);
    }

    #[test]
    fn other_errors_exit() {
        let result = Err(Error::Graphics("E_OUTOFMEMORY".to_string()));

        assert_eq!(Control::after(&result), Control::Exit);
    }

    #[test]
    fn zero_extent_is_minimised() {
        assert!(is_minimised(PhysicalSize::new(0, 600)));
        assert!(is_minimised(PhysicalSize::new(800, 0)));
        assert!(!is_minimised(PhysicalSize::new(800, 600)));
    }

    #[test]
    fn minimised_window_sleeps_instead_of_polling() {
        assert_eq!(control_flow(true), ControlFlow::Wait);
        assert_eq!(control_flow(false), ControlFlow::Poll);
    }
}
