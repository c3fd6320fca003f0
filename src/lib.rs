//! Feast Duel client core
//!
//! Client half of the two-player feast duel. It keeps the locally
//! controlled player responsive between server snapshots:
//! - Dead reckoning of the local player from sampled input
//! - Snap-or-blend reconciliation against authoritative snapshots
//! - Throttled input reports back to the server
//! - Merging predicted and authoritative state into a renderable frame

pub mod app;
pub mod config;
pub mod game;
pub mod render;
pub mod util;
pub mod ws;
