//! Game module - catalog, rounds and the game loop.

mod catalog;
mod rng;
mod round;
mod session;

pub use catalog::*;
pub use rng::*;
pub use round::*;
pub use session::*;
