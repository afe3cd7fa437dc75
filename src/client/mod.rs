//! Collaborators at the edge of the game: matcher, picker, display.

mod console;
mod display;
mod matcher;
mod picker;

pub use console::*;
pub use display::*;
pub use matcher::*;
pub use picker::*;
