use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use tracing::{debug, error, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::error::EngineError;
use crate::graphics::{BLACK, Canvas2d, Color, CpuCanvas};
use crate::pixels_renderer::PixelsSurface;
use crate::surface::{Surface, SurfaceSize};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone)]
pub struct SketchConfig {
    pub title: String,
    pub size: SurfaceSize,
    pub vsync: bool,
    /// Pacing of the idle `frame` callback.
    pub frame_interval: Duration,
}

impl SketchConfig {
    pub fn new(title: impl Into<String>, size: SurfaceSize) -> Self {
        Self {
            title: title.into(),
            size,
            vsync: true,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

/// Event-driven drawing program.
///
/// The host calls `setup` once after the canvas exists, `frame` once per animation frame,
/// and `mouse_clicked` for every left-button click with the pointer position in canvas
/// pixels. Callbacks never overlap. Whatever a callback draws stays on the canvas.
pub trait Sketch {
    fn setup(&mut self, canvas: &mut dyn Canvas2d);

    fn frame(&mut self, _canvas: &mut dyn Canvas2d) {}

    fn mouse_clicked(&mut self, canvas: &mut dyn Canvas2d, x: i32, y: i32);
}

/// Drives a [`Sketch`] against any [`Surface`].
///
/// The windowed loop and headless tests share this type, so both see the same callback
/// ordering and the same sticky stroke color between callbacks.
pub struct SketchHost<S, K> {
    surface: S,
    sketch: K,
    stroke: Color,
    started: bool,
    frames: u64,
}

impl<S: Surface, K: Sketch> SketchHost<S, K> {
    pub fn new(surface: S, sketch: K) -> Self {
        Self {
            surface,
            sketch,
            stroke: BLACK,
            started: false,
            frames: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn sketch(&self) -> &K {
        &self.sketch
    }

    /// Number of `frame` callbacks delivered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs `setup` the first time; later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.with_canvas(|sketch, canvas| sketch.setup(canvas));
    }

    pub fn frame(&mut self) {
        self.start();
        self.frames += 1;
        self.with_canvas(|sketch, canvas| sketch.frame(canvas));
    }

    pub fn click(&mut self, x: i32, y: i32) {
        self.start();
        self.with_canvas(|sketch, canvas| sketch.mouse_clicked(canvas, x, y));
    }

    pub fn present(&mut self) -> Result<(), S::Error> {
        self.surface.present()
    }

    pub fn into_parts(self) -> (S, K) {
        (self.surface, self.sketch)
    }

    fn with_canvas<F>(&mut self, f: F)
    where
        F: FnOnce(&mut K, &mut dyn Canvas2d),
    {
        let size = self.surface.size();
        let mut canvas = CpuCanvas::new(self.surface.frame_mut(), size).with_stroke(self.stroke);
        f(&mut self.sketch, &mut canvas);
        self.stroke = canvas.stroke();
    }
}

/// Opens a fixed-size window and runs `sketch` until the window is closed.
pub fn run_sketch<K: Sketch + 'static>(
    config: SketchConfig,
    sketch: K,
) -> Result<(), EngineError> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.size.width, config.size.height))
        .with_resizable(false)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let pixels = PixelsBuilder::new(config.size.width, config.size.height, surface_texture)
        .enable_vsync(config.vsync)
        .build()?;

    let mut host = SketchHost::new(PixelsSurface::new(pixels, config.size), sketch);
    host.start();
    info!(
        width = config.size.width,
        height = config.size.height,
        title = %config.title,
        "canvas ready"
    );

    let frame_interval = config.frame_interval;
    let mut cursor: Option<(f64, f64)> = None;
    let mut next_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        if let ControlFlow::ExitWithCode(_) = *control_flow {
            return;
        }

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!("window closed");
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if let Err(err) = host.surface_mut().resize_window(size.width, size.height) {
                        error!(%err, "resize failed");
                    }
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Some((position.x, position.y));
                }
                WindowEvent::CursorLeft { .. } => {
                    cursor = None;
                }
                WindowEvent::MouseInput {
                    state: ElementState::Released,
                    button: MouseButton::Left,
                    ..
                } => match cursor {
                    Some(pos) => {
                        let (x, y) = host.surface().window_pos_to_canvas(pos);
                        host.click(x, y);
                        window.request_redraw();
                    }
                    None => debug!("click without a known cursor position"),
                },
                _ => {}
            },
            Event::RedrawRequested(_) => {
                host.frame();
                if let Err(err) = host.present() {
                    error!(%err, "present failed");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                let now = Instant::now();
                if now >= next_frame {
                    window.request_redraw();
                    next_frame = now + frame_interval;
                }
                *control_flow = ControlFlow::WaitUntil(next_frame);
            }
            _ => {}
        }
    });
}
