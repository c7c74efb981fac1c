//! Keyboard and mouse state for the fly camera

use std::collections::HashSet;

use tabletop_core::{CameraMovement, FlyCamera};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Pixel scroll deltas are converted to wheel lines at this rate
pub const PIXELS_PER_LINE: f32 = 100.0;

/// One-shot actions raised by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleProjection,
    Quit,
}

pub fn movement_for(key: KeyCode) -> Option<CameraMovement> {
    match key {
        KeyCode::KeyW => Some(CameraMovement::Forward),
        KeyCode::KeyS => Some(CameraMovement::Backward),
        KeyCode::KeyA => Some(CameraMovement::Left),
        KeyCode::KeyD => Some(CameraMovement::Right),
        KeyCode::KeyQ => Some(CameraMovement::Up),
        KeyCode::KeyE => Some(CameraMovement::Down),
        _ => None,
    }
}

/// Scroll distance in wheel lines, positive away from the user
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

/// Tracks which movement keys are held between frames
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<CameraMovement>,
    projection_key_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a key event, returning a command on the press that triggers it
    ///
    /// The projection toggle fires once per physical press, ignoring key
    /// repeat until the key is released.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> Option<Command> {
        let pressed = state == ElementState::Pressed;

        if let Some(movement) = movement_for(key) {
            if pressed {
                self.held.insert(movement);
            } else {
                self.held.remove(&movement);
            }
            return None;
        }

        match key {
            KeyCode::Escape if pressed => Some(Command::Quit),
            KeyCode::KeyP => {
                let fire = pressed && !self.projection_key_down;
                self.projection_key_down = pressed;
                fire.then_some(Command::ToggleProjection)
            }
            _ => None,
        }
    }

    pub fn is_held(&self, movement: CameraMovement) -> bool {
        self.held.contains(&movement)
    }

    /// Move the camera for every held key over `delta_time` seconds
    pub fn apply(&self, camera: &mut FlyCamera, delta_time: f32) {
        for &movement in &self.held {
            camera.process_keyboard(movement, delta_time);
        }
    }

    /// Forget held keys, e.g. when the window loses focus and releases go unseen
    pub fn clear(&mut self) {
        self.held.clear();
        self.projection_key_down = false;
    }
}
