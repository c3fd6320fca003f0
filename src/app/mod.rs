//! Client session and its actor loop

pub mod runner;
pub mod state;

pub use runner::{run_session, ControlSource};
pub use state::ClientSession;
