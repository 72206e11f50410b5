pub mod screen;
pub mod state;

pub use screen::{CompareBackend, CompareScreen};
pub use state::{Effect, ScreenState, VISIBLE_DEFAULT, VISIBLE_STEP};
