//! Interactive viewer for the tabletop desk scene
//!
//! Opens a window, grabs the mouse for free-look and flies a camera
//! through the textured scene with the keyboard.

pub mod app;
pub mod input;

pub use app::{FrameClock, Viewer};
pub use input::{Command, InputState};
