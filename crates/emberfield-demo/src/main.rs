//! Demo host for the emberfield backdrops.
//!
//! Opens a main window carrying the particle backdrop and, on desktop-sized
//! displays, a second small window carrying the wireframe emblem. The
//! backdrop's visibility gate is fed a fully-visible report on the first
//! redraw, which is when a freshly mapped window is first on screen.

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use emberfield_engine::controller::{
    BackdropConfig, BackdropController, DESKTOP_MIN_WIDTH, EmblemConfig, EmblemController,
};
use emberfield_engine::logging::{LoggingConfig, init_logging};
use emberfield_engine::render::WgpuBackend;
use emberfield_engine::time::FrameClock;

const BACKDROP_SIZE: LogicalSize<f64> = LogicalSize::new(1280.0, 720.0);
const EMBLEM_SIZE: LogicalSize<f64> = LogicalSize::new(360.0, 360.0);

struct DemoApp {
    backend: WgpuBackend,
    clock: FrameClock,

    backdrop_window: Option<Arc<Window>>,
    backdrop: Option<BackdropController<WgpuBackend>>,

    emblem_window: Option<Arc<Window>>,
    emblem: Option<EmblemController<WgpuBackend>>,

    exiting: bool,
}

impl DemoApp {
    fn new() -> Self {
        Self {
            backend: WgpuBackend::new(),
            clock: FrameClock::new(),
            backdrop_window: None,
            backdrop: None,
            emblem_window: None,
            emblem: None,
            exiting: false,
        }
    }

    fn create_windows(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title("emberfield")
                    .with_inner_size(BACKDROP_SIZE)
                    .with_transparent(true),
            )
            .context("failed to create backdrop window")?;
        let window = Arc::new(window);

        let viewport = logical_size(&window);
        self.backdrop = Some(BackdropController::new(BackdropConfig {
            viewport,
            ..Default::default()
        }));
        self.backdrop_window = Some(window);

        // The emblem exists only when the display was desktop-sized at
        // startup; narrower sessions never get the second window.
        if viewport.0 >= DESKTOP_MIN_WIDTH {
            let window = event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("emberfield emblem")
                        .with_inner_size(EMBLEM_SIZE)
                        .with_transparent(true),
                )
                .context("failed to create emblem window")?;
            let window = Arc::new(window);

            let emblem = EmblemController::new(EmblemConfig {
                viewport_width: viewport.0,
                surface_size: logical_size(&window),
                ..Default::default()
            });
            self.emblem_window = Some(window);
            self.emblem = Some(emblem);
        }

        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.dispose(&mut self.backend);
        }
        if let Some(emblem) = self.emblem.as_mut() {
            emblem.dispose(&mut self.backend);
        }
        self.exiting = true;
        event_loop.exit();
    }

    fn is_backdrop_window(&self, id: WindowId) -> bool {
        self.backdrop_window.as_ref().is_some_and(|w| w.id() == id)
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.backdrop_window.is_some() {
            return;
        }

        if let Err(e) = self.create_windows(event_loop) {
            log::error!("failed to create windows: {e:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the backdrops animate every frame.
        if let Some(w) = &self.backdrop_window {
            w.request_redraw();
        }
        if let Some(w) = &self.emblem_window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exiting {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(size) => {
                if self.is_backdrop_window(window_id) {
                    if let Some(backdrop) = self.backdrop.as_mut() {
                        backdrop.on_resize(
                            &mut self.backend,
                            size.width as f32,
                            size.height as f32,
                        );
                    }
                } else if let Some(emblem) = self.emblem.as_mut() {
                    emblem.on_resize(&mut self.backend, size.width as f32, size.height as f32);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if !self.is_backdrop_window(window_id) {
                    return;
                }
                let (Some(window), Some(backdrop)) =
                    (self.backdrop_window.as_ref(), self.backdrop.as_mut())
                else {
                    return;
                };

                let scale = window.scale_factor();
                let pos = position.to_logical::<f64>(scale);
                backdrop.on_pointer_move((pos.x as f32, pos.y as f32), logical_size(window));
            }

            WindowEvent::Occluded(occluded) => {
                if self.is_backdrop_window(window_id) {
                    if let Some(backdrop) = self.backdrop.as_mut() {
                        backdrop.set_live(!occluded);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if self.is_backdrop_window(window_id) {
                    let (Some(window), Some(backdrop)) =
                        (self.backdrop_window.as_ref(), self.backdrop.as_mut())
                    else {
                        return;
                    };

                    // First redraw doubles as the fully-visible report.
                    backdrop.on_visibility(1.0, &mut self.backend, Some(window));

                    let ft = self.clock.tick();
                    backdrop.on_frame(&mut self.backend, ft.elapsed);
                } else if let (Some(window), Some(emblem)) =
                    (self.emblem_window.as_ref(), self.emblem.as_mut())
                {
                    emblem.on_visibility(1.0, &mut self.backend, Some(window));
                    emblem.on_frame(&mut self.backend);
                }
            }

            _ => {}
        }
    }
}

/// Logical inner size of a window as (width, height).
fn logical_size(window: &Window) -> (f32, f32) {
    let size = window
        .inner_size()
        .to_logical::<f64>(window.scale_factor());
    (size.width as f32, size.height as f32)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = DemoApp::new();

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    Ok(())
}
