//! Window, event loop and per-frame update of the desk scene viewer

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tabletop_core::{Error, FlyCamera, Result, Scene, ViewerConfig};
use tabletop_gpu::{GpuContext, SceneRenderer, TextureSet};
use winit::{
    dpi::LogicalSize,
    event::{DeviceEvent, ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowBuilder},
};

use crate::input::{scroll_lines, Command, InputState};

/// Longest frame step fed to the camera, so a stall does not teleport it
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

/// Measures the time between rendered frames
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Seconds since the previous tick, capped at [`MAX_FRAME_TIME`]
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed.min(MAX_FRAME_TIME).as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Interactive first-person viewer of the desk scene
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Open the window and run until it is closed or Escape is pressed
    pub fn run(self) -> Result<()> {
        let config = self.config;
        let scene = Scene::desk()?;

        let event_loop = EventLoop::new().map_err(|e| Error::Window(format!("Failed to create event loop: {}", e)))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.window.title.as_str())
                .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
                .build(&event_loop)
                .map_err(|e| Error::Window(format!("Failed to create window: {}", e)))?,
        );
        if config.window.grab_cursor {
            grab_cursor(&window);
        }

        let mut ctx = pollster::block_on(GpuContext::for_window(window.clone(), config.render.vsync))?;
        let textures = TextureSet::load(&ctx, &config.asset_dir, &scene.texture_slots())?;
        let mut renderer = SceneRenderer::new(&ctx, &scene, &textures, config.lighting, config.render.clone())?;

        let mut camera: FlyCamera = config.camera.build();
        let mut input = InputState::new();
        let mut clock = FrameClock::new();
        let mut focused = true;

        log::info!(
            "Viewing {} objects ({} triangles); WASD/QE to move, P to switch projection, Esc to quit",
            scene.objects.len(),
            scene.triangle_count()
        );

        let failure: Rc<RefCell<Option<Error>>> = Rc::new(RefCell::new(None));
        let loop_failure = failure.clone();

        event_loop
            .run(move |event, target| match event {
                Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::Resized(new_size) => {
                        if ctx.resize(new_size) {
                            renderer.resize(&ctx);
                        }
                    }
                    WindowEvent::Focused(is_focused) => {
                        focused = is_focused;
                        if !is_focused {
                            input.clear();
                        }
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        let PhysicalKey::Code(key) = event.physical_key else {
                            return;
                        };
                        match input.handle_key(key, event.state) {
                            Some(Command::Quit) => target.exit(),
                            Some(Command::ToggleProjection) => {
                                let mode = camera.toggle_projection();
                                log::info!("Projection: {:?}", mode);
                            }
                            None => {}
                        }
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        let verb = if state == ElementState::Pressed { "pressed" } else { "released" };
                        log::debug!("Mouse {:?} {}", button, verb);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        camera.process_scroll(scroll_lines(delta));
                        log::info!("Movement speed: {:.1}", camera.movement_speed);
                    }
                    WindowEvent::RedrawRequested => {
                        let dt = clock.tick();
                        input.apply(&mut camera, dt);
                        if let Err(e) = renderer.render(&ctx, &camera) {
                            log::error!("Render failed: {}", e);
                            *loop_failure.borrow_mut() = Some(e);
                            target.exit();
                        }
                    }
                    _ => {}
                },
                // Raw motion keeps working while the cursor is locked
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                    ..
                } if focused => {
                    camera.process_mouse_movement(dx as f32, -dy as f32);
                }
                Event::AboutToWait => window.request_redraw(),
                _ => {}
            })
            .map_err(|e| Error::Window(format!("Event loop failed: {}", e)))?;

        match failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(e) => log::warn!("Could not grab the cursor: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_is_capped() {
        let mut clock = FrameClock {
            last: Instant::now() - Duration::from_secs(5),
        };
        let dt = clock.tick();
        assert!(dt <= MAX_FRAME_TIME.as_secs_f32());
        assert!(dt > 0.0);
        assert!(clock.tick() < MAX_FRAME_TIME.as_secs_f32());
    }

    #[test]
    fn test_viewer_rejects_invalid_config() {
        let mut config = ViewerConfig::default();
        config.window.width = 0;
        assert!(matches!(Viewer::new(config), Err(Error::Config(_))));
        assert!(Viewer::new(ViewerConfig::default()).is_ok());
    }
}
