//! Per-frame input sampling

use super::angle::normalize;
use crate::ws::protocol::{ClientMsg, Vec2};

/// Raw control state as read from the host each frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Release key held
    pub release: bool,
    /// Pointer position in arena coordinates, if the host has one
    pub pointer: Option<(f32, f32)>,
}

/// Normalized intent derived from one frame of controls
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputIntent {
    /// Unit vector or zero
    pub move_x: f32,
    pub move_y: f32,
    /// Aim angle in radians
    pub aim: f32,
    /// True only on the frame the release key went down
    pub release: bool,
}

impl InputIntent {
    pub fn to_msg(&self) -> ClientMsg {
        ClientMsg::Input {
            movement: Vec2 {
                x: self.move_x,
                y: self.move_y,
            },
            aim: self.aim,
            release: self.release,
        }
    }
}

/// Turns raw controls into intents, tracking the release key edge
#[derive(Debug, Default)]
pub struct InputSampler {
    release_was_down: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample intent for an entity at (`x`, `y`) currently facing `facing`.
    ///
    /// Without a pointer the aim holds the current facing.
    pub fn sample(&mut self, controls: &ControlState, x: f32, y: f32, facing: f32) -> InputIntent {
        let (move_x, move_y) = move_direction(controls);

        let aim = match controls.pointer {
            Some((px, py)) => (py - y).atan2(px - x),
            None => facing,
        };

        let release = controls.release && !self.release_was_down;
        self.release_was_down = controls.release;

        InputIntent {
            move_x,
            move_y,
            aim,
            release,
        }
    }
}

/// Unit movement direction from the four axis keys (y grows downwards)
pub fn move_direction(controls: &ControlState) -> (f32, f32) {
    let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
    normalize(
        axis(controls.left, controls.right),
        axis(controls.up, controls.down),
    )
}
