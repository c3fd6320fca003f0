//! Frame composition for display. No drawing happens here.

pub mod compose;
pub mod hud;
pub mod style;

pub use compose::{compose, RenderFrame};
