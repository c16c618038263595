use std::time::Instant;

use glutin::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
    Api, ContextBuilder, ContextWrapper, GlProfile, GlRequest, PossiblyCurrent,
};
use log::{debug, error, info};

use crate::engine::config::Config;
use crate::engine::error::EngineError;
use crate::engine::input::{requests_exit, InputState};
use crate::engine::rotator::{KeyRotator, MouseRotator};
use crate::engine::scene::{FrameInput, RenderContext};
use crate::engine::utilities::{fps_title, gl_string, FpsCounter};

/// `Renderer` owns the window, its OpenGL context and the event loop.
///
/// `glutin` handles the platform-specific window and context creation;
/// OpenGL functions are loaded through the `gl` crate. [`Renderer::run`]
/// drives one frame per loop iteration until the window is closed or
/// Escape is pressed.
///
/// # Example Usage
///
/// ```no_run
/// use glprimer::engine::{config::Config, renderer::Renderer, scene::RenderContext};
///
/// let config = Config::default();
/// let renderer = Renderer::new(&config).unwrap();
/// let context = RenderContext::load(&config).unwrap();
/// renderer.run(context);
/// ```
pub struct Renderer {
    /// The event loop responsible for driving window events and rendering
    event_loop: EventLoop<()>,

    /// The OpenGL context tied to a window, current on this thread.
    windowed_context: ContextWrapper<PossiblyCurrent, Window>,

    title: String,
}

impl Renderer {
    /// Opens the window and makes a 3.3 core-profile context current.
    ///
    /// The window is square with the primary monitor's height unless
    /// `config.window_size` says otherwise.
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        let event_loop = EventLoop::new();

        let monitor = event_loop.primary_monitor().map(|m| {
            let size = m.size();
            (size.width, size.height)
        });
        let (width, height) = config.resolve_window_size(monitor);

        let wb = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(width, height));

        // Request a 3.3 core profile; legacy GL is excluded.
        let windowed_context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
            .with_gl_profile(GlProfile::Core)
            .with_vsync(config.vsync)
            .build_windowed(wb, &event_loop)?;

        // Make the OpenGL context current on this thread; required before issuing GL calls
        let windowed_context =
            unsafe { windowed_context.make_current() }.map_err(|(_, e)| e)?;

        gl::load_with(|symbol| windowed_context.get_proc_address(symbol) as *const _);

        info!("GL vendor:       {}", gl_string(gl::VENDOR));
        info!("GL renderer:     {}", gl_string(gl::RENDERER));
        info!("GL version:      {}", gl_string(gl::VERSION));
        if let Some((w, h)) = monitor {
            info!("Desktop size:    {w}x{h} pixels");
        }

        let clear_color = config.clear_color;
        unsafe {
            gl::ClearColor(clear_color[0], clear_color[1], clear_color[2], clear_color[3]);
            gl::PolygonMode(gl::FRONT_AND_BACK, gl::FILL);
            gl::Enable(gl::CULL_FACE);
            gl::Enable(gl::DEPTH_TEST);
        }

        Ok(Self {
            event_loop,
            windowed_context,
            title: config.title.clone(),
        })
    }

    /// Runs the frame loop. Never returns; the process exits when the window
    /// is closed, Escape is pressed, or a frame fails.
    ///
    /// Per frame: set the viewport, clear color and depth, update the FPS
    /// title, poll the rotators, rebuild the matrices, draw, swap.
    pub fn run(self, mut scene: RenderContext) -> ! {
        let Renderer {
            event_loop,
            windowed_context,
            title,
        } = self;

        let size = windowed_context.window().inner_size();
        let mut input = InputState::new(size.width, size.height);
        scene.camera.set_viewport(size.width, size.height);

        let mut key_rotator = KeyRotator::new();
        let mut mouse_rotator = MouseRotator::new();
        let mut fps = FpsCounter::new();
        let start = Instant::now();

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                Event::WindowEvent { event, .. } => {
                    input.handle_window_event(&event);
                    if requests_exit(&event) {
                        *control_flow = ControlFlow::Exit;
                    } else if let WindowEvent::Resized(size) = event {
                        windowed_context.resize(size);
                        scene.camera.set_viewport(size.width, size.height);
                        debug!("resized to {}x{}", size.width, size.height);
                    }
                }

                Event::MainEventsCleared => windowed_context.window().request_redraw(),

                Event::RedrawRequested(_) => {
                    let now = start.elapsed().as_secs_f64();
                    if let Some(rate) = fps.tick(now) {
                        debug!("{rate:.1} FPS");
                        windowed_context.window().set_title(&fps_title(&title, rate));
                    }

                    key_rotator.poll(&input, now);
                    mouse_rotator.poll(&input);
                    let frame = FrameInput {
                        time: now as f32,
                        key: (key_rotator.phi as f32, key_rotator.theta as f32),
                        mouse: (mouse_rotator.phi as f32, mouse_rotator.theta as f32),
                    };

                    let (width, height) = input.window_size();
                    unsafe {
                        gl::Viewport(0, 0, width as i32, height as i32);
                        gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
                    }

                    let result = scene
                        .frame_matrices(&frame)
                        .map_err(EngineError::from)
                        .and_then(|matrices| {
                            scene.draw(&frame, &matrices);
                            windowed_context.swap_buffers().map_err(EngineError::from)
                        });
                    if let Err(e) = result {
                        error!("{e}");
                        *control_flow = ControlFlow::ExitWithCode(1);
                    }
                }

                Event::LoopDestroyed => info!("window closed"),

                _ => {}
            }
        })
    }
}
