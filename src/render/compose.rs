//! Merge of predicted and authoritative state into one renderable frame

use std::f32::consts::PI;

use super::hud::Hud;
use super::style::{SideStyle, FREE_FOOD_COLOR};
use crate::game::PredictedPlayer;
use crate::ws::protocol::{FoodState, PlayerId, PlayerState, Side, Snapshot};

pub const BODY_RADIUS: f32 = 18.0;
pub const CHOPSTICK_LENGTH: f32 = 80.0;
pub const MOUTH_RADIUS: f32 = 18.0;
pub const CONE_RADIUS: f32 = 70.0;
pub const CONE_HALF_ANGLE: f32 = PI / 7.0;
pub const FOOD_RADIUS: f32 = 10.0;

/// Grab cone anchored at the chopstick tip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub origin: (f32, f32),
    pub radius: f32,
    pub start: (f32, f32),
    pub end: (f32, f32),
}

/// A player ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlayer {
    pub id: PlayerId,
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub fullness: u32,
    pub color: u32,
    pub body_radius: f32,
    pub tip: (f32, f32),
    pub mouth: (f32, f32),
    pub mouth_radius: f32,
    pub cone: Cone,
}

impl RenderPlayer {
    pub fn from_state(state: &PlayerState) -> Self {
        Self::at(state, state.x, state.y, state.angle)
    }

    /// Identity and fullness from `state`, pose from the arguments
    fn at(state: &PlayerState, x: f32, y: f32, angle: f32) -> Self {
        let style = SideStyle::for_side(state.side);
        let tip = (
            x + angle.cos() * CHOPSTICK_LENGTH,
            y + angle.sin() * CHOPSTICK_LENGTH,
        );
        let edge = |a: f32| (tip.0 + a.cos() * CONE_RADIUS, tip.1 + a.sin() * CONE_RADIUS);

        Self {
            id: state.id.clone(),
            side: state.side,
            x,
            y,
            angle,
            fullness: state.fullness,
            color: style.body_color,
            body_radius: BODY_RADIUS,
            tip,
            mouth: (x + style.mouth_offset_x, y - 8.0),
            mouth_radius: MOUTH_RADIUS,
            cone: Cone {
                origin: tip,
                radius: CONE_RADIUS,
                start: edge(angle - CONE_HALF_ANGLE),
                end: edge(angle + CONE_HALF_ANGLE),
            },
        }
    }
}

/// A food item ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFood {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: u32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub players: Vec<RenderPlayer>,
    pub foods: Vec<RenderFood>,
    pub hud: Hud,
}

/// Merge the predicted local pose into the authoritative snapshot.
///
/// Neither input is modified. The local player's side and fullness still
/// come from the snapshot.
pub fn compose(
    snapshot: &Snapshot,
    local_id: &PlayerId,
    predicted: &PredictedPlayer,
    max_fullness: u32,
) -> RenderFrame {
    let players: Vec<RenderPlayer> = snapshot
        .players
        .iter()
        .map(|p| {
            if &p.id == local_id {
                RenderPlayer::at(p, predicted.x, predicted.y, predicted.angle)
            } else {
                RenderPlayer::from_state(p)
            }
        })
        .collect();

    let foods = snapshot
        .foods
        .iter()
        .map(|food| {
            let color = match food.state {
                FoodState::Free => FREE_FOOD_COLOR,
                FoodState::Held => {
                    let holder_side = food
                        .held_by
                        .as_ref()
                        .and_then(|id| players.iter().find(|p| &p.id == id))
                        .map(|p| p.side)
                        .unwrap_or(Side::Right);
                    SideStyle::for_side(holder_side).held_food_color
                }
            };
            RenderFood {
                x: food.x,
                y: food.y,
                radius: FOOD_RADIUS,
                color,
            }
        })
        .collect();

    let hud = Hud::build(&players, snapshot, local_id, max_fullness);

    RenderFrame {
        players,
        foods,
        hud,
    }
}
