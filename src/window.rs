//! Window host: shows a tank with `winit` and `pixels`.

use pixels::{Pixels, SurfaceTexture};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::color::Color;
use crate::config::TankConfig;
use crate::error::Result;
use crate::geometry::Size;
use crate::raster::RasterSurface;
use crate::surface::Container;
use crate::tank::{LiquidTank, TankCommand};
use crate::transition::FrameQueue;

const LIGHT_BACKGROUND: Color = Color::new(0xff, 0xff, 0xff);
const DARK_BACKGROUND: Color = Color::new(0x21, 0x21, 0x21);

/// The window's inner area. `winit` reports every resize, so this container
/// observes its own size changes.
struct WindowContainer {
    window: Arc<Window>,
}

impl Container for WindowContainer {
    fn measure(&self) -> Size {
        let size = self.window.inner_size();
        Size::new(size.width as f64, size.height as f64)
    }

    fn observes_resize(&self) -> bool {
        true
    }
}

pub struct TankWindow {
    config: TankConfig,
    font_data: Option<Vec<u8>>,
    initial_value: Option<f64>,
}

impl TankWindow {
    pub fn new(config: TankConfig) -> Self {
        Self {
            config,
            font_data: None,
            initial_value: None,
        }
    }

    /// TTF/OTF data used for the value label; without it no label is drawn.
    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        self.font_data = Some(data);
        self
    }

    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn show(self) -> Result<()> {
        self.run_window(None)
    }

    pub fn show_with_commands(self, receiver: Receiver<TankCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(self, receiver: Option<Receiver<TankCommand>>) -> Result<()> {
        let Self {
            config,
            font_data,
            initial_value,
        } = self;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_min_inner_size(LogicalSize::new(40.0, 80.0))
            .build(&event_loop)?;
        let window = Arc::new(window);

        let background = if config.dark {
            DARK_BACKGROUND
        } else {
            LIGHT_BACKGROUND
        };
        let raster = match font_data {
            Some(data) => RasterSurface::with_font_data(background, data)?,
            None => {
                log::info!("no font given, the value label will not be drawn");
                RasterSurface::new(background)
            }
        };

        let size = window.inner_size();
        let mut fb_width = size.width;
        let mut fb_height = size.height;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
        let container = Box::new(WindowContainer {
            window: window.clone(),
        });
        let mut tank = LiquidTank::new(config, raster, FrameQueue::new(), container)?;
        if let Some(value) = initial_value {
            tank.set_value(value);
        }

        let window_clone = window.clone();
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        tank.destroy();
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        fb_width = new_size.width;
                        fb_height = new_size.height;
                        if let Err(err) = pixels.resize_buffer(fb_width, fb_height) {
                            log::error!("resize buffer: {err}");
                        }
                        if let Err(err) = pixels.resize_surface(fb_width, fb_height) {
                            log::error!("resize surface: {err}");
                        }
                        tank.notify_resize(Instant::now());
                        window_clone.request_redraw();
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                tank.apply(command, now);
                            }
                        }
                        if tank.is_destroyed() {
                            window_target.exit();
                            return;
                        }
                        tank.poll_resize(now);
                        for task in tank.scheduler_mut().take() {
                            tank.run_frame(task, now);
                        }

                        let frame = pixels.frame_mut();
                        tank.surface()
                            .copy_to(frame, fb_width as usize, fb_height as usize);
                        if let Err(err) = pixels.render() {
                            log::error!("render: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
