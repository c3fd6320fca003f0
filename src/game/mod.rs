//! Prediction and reconciliation for the local player

pub mod angle;
pub mod input;
pub mod prediction;
pub mod reconcile;
pub mod script;
pub mod snapshot;

pub use input::{ControlState, InputIntent, InputSampler};
pub use prediction::{Arena, PredictedPlayer, PredictionModel};
pub use reconcile::{Correction, ReconcilePolicy};
pub use snapshot::SnapshotSlot;
