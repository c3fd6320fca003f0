//! Correcting the predicted player against authoritative snapshots

use super::angle::{angle_between, rotate_towards};
use super::prediction::{PredictedPlayer, PredictionModel, MAX_ANGULAR_SPEED};
use crate::ws::protocol::PlayerState;

/// Position error beyond which prediction is discarded
pub const SNAP_DISTANCE: f32 = 40.0;
/// Facing error (radians) beyond which prediction is discarded
pub const SNAP_ANGLE: f32 = 0.9;
/// Fraction of the position error removed per frame when blending.
/// Applied per call, not scaled by `dt`.
pub const BLEND_FACTOR: f32 = 0.1;

/// What the policy did on a given frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    /// Prediction replaced by the authoritative value
    Snap { distance: f32, angle_error: f32 },
    /// Prediction nudged towards the authoritative value
    Blend,
}

/// Snap-or-blend reconciliation
#[derive(Debug, Clone, Copy)]
pub struct ReconcilePolicy {
    pub snap_distance: f32,
    pub snap_angle: f32,
    pub blend_factor: f32,
    pub max_angular_speed: f32,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            snap_distance: SNAP_DISTANCE,
            snap_angle: SNAP_ANGLE,
            blend_factor: BLEND_FACTOR,
            max_angular_speed: MAX_ANGULAR_SPEED,
        }
    }
}

impl ReconcilePolicy {
    /// Reconcile the model's predicted player. Returns `None` if the model
    /// has not been seeded yet.
    pub fn apply(
        &self,
        model: &mut PredictionModel,
        authoritative: &PlayerState,
        dt: f32,
    ) -> Option<Correction> {
        let predicted = model.predicted_mut()?;
        Some(self.correct(predicted, authoritative, dt))
    }

    /// Compare `predicted` with `authoritative` and snap or blend it in place
    pub fn correct(
        &self,
        predicted: &mut PredictedPlayer,
        authoritative: &PlayerState,
        dt: f32,
    ) -> Correction {
        let distance = (authoritative.x - predicted.x).hypot(authoritative.y - predicted.y);
        let angle_error = angle_between(predicted.angle, authoritative.angle);

        if distance > self.snap_distance || angle_error > self.snap_angle {
            *predicted = PredictedPlayer::from_authoritative(authoritative);
            return Correction::Snap {
                distance,
                angle_error,
            };
        }

        predicted.x = lerp(predicted.x, authoritative.x, self.blend_factor);
        predicted.y = lerp(predicted.y, authoritative.y, self.blend_factor);
        predicted.angle = rotate_towards(
            predicted.angle,
            authoritative.angle,
            self.max_angular_speed * dt,
        );
        Correction::Blend
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
