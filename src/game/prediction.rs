//! Dead reckoning for the locally controlled player

use super::angle::{rotate_towards, wrap_angle};
use super::input::InputIntent;
use crate::ws::protocol::{PlayerState, WorldConfig};

/// Movement speed in arena units per second
pub const MOVE_SPEED: f32 = 220.0;
/// Turn rate in radians per second
pub const MAX_ANGULAR_SPEED: f32 = 4.5;

/// Margin kept clear on the left, right and bottom edges
pub const EDGE_MARGIN: f32 = 60.0;
/// Larger top margin leaves room for the HUD
pub const TOP_MARGIN: f32 = 80.0;

/// Playable rectangle for player positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        let min_x = EDGE_MARGIN;
        let min_y = TOP_MARGIN;
        // A degenerate arena collapses to its minimum corner instead of inverting
        Self {
            min_x,
            max_x: (width - EDGE_MARGIN).max(min_x),
            min_y,
            max_y: (height - EDGE_MARGIN).max(min_y),
        }
    }

    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(self.min_x, self.max_x), y.clamp(self.min_y, self.max_y))
    }
}

impl From<&WorldConfig> for Arena {
    fn from(config: &WorldConfig) -> Self {
        Self::new(config.width, config.height)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::from(&WorldConfig::default())
    }
}

/// Predicted kinematic state. Side and fullness are never predicted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedPlayer {
    pub x: f32,
    pub y: f32,
    /// Always within (-π, π]
    pub angle: f32,
}

impl PredictedPlayer {
    /// Copy kinematics out of an authoritative player
    pub fn from_authoritative(player: &PlayerState) -> Self {
        Self {
            x: player.x,
            y: player.y,
            angle: wrap_angle(player.angle),
        }
    }
}

/// Owns the single predicted player for this session
#[derive(Debug, Default)]
pub struct PredictionModel {
    arena: Arena,
    predicted: Option<PredictedPlayer>,
}

impl PredictionModel {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            predicted: None,
        }
    }

    pub fn set_arena(&mut self, arena: Arena) {
        self.arena = arena;
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn predicted(&self) -> Option<&PredictedPlayer> {
        self.predicted.as_ref()
    }

    /// Get the predicted player, seeding it from `authoritative` the first time.
    /// Returns whether this call did the seeding alongside the state.
    pub fn seed_from(&mut self, authoritative: &PlayerState) -> (&mut PredictedPlayer, bool) {
        let seeded = self.predicted.is_none();
        let predicted = self
            .predicted
            .get_or_insert_with(|| PredictedPlayer::from_authoritative(authoritative));
        (predicted, seeded)
    }

    /// Mutable access once seeded
    pub fn predicted_mut(&mut self) -> Option<&mut PredictedPlayer> {
        self.predicted.as_mut()
    }

    /// Advance the predicted player by `dt` seconds of `intent`.
    /// No-op until seeded.
    pub fn advance(&mut self, intent: &InputIntent, dt: f32) {
        let arena = self.arena;
        let Some(p) = self.predicted.as_mut() else {
            return;
        };

        p.angle = rotate_towards(p.angle, intent.aim, MAX_ANGULAR_SPEED * dt);
        let x = p.x + intent.move_x * MOVE_SPEED * dt;
        let y = p.y + intent.move_y * MOVE_SPEED * dt;
        (p.x, p.y) = arena.clamp(x, y);
    }
}
