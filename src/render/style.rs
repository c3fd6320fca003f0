//! Per-side presentation constants

use crate::ws::protocol::Side;

/// Derived constants for one side of the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideStyle {
    /// Body colour (0xRRGGBB)
    pub body_color: u32,
    /// Colour of food held by this side
    pub held_food_color: u32,
    /// Horizontal mouth offset from the body centre
    pub mouth_offset_x: f32,
    /// HUD row label
    pub label: &'static str,
}

const LEFT: SideStyle = SideStyle {
    body_color: 0x5aa9e6,
    held_food_color: 0x4fc3f7,
    mouth_offset_x: 22.0,
    label: "Left",
};

const RIGHT: SideStyle = SideStyle {
    body_color: 0xf38ba0,
    held_food_color: 0xff7043,
    mouth_offset_x: -22.0,
    label: "Right",
};

impl SideStyle {
    pub fn for_side(side: Side) -> &'static SideStyle {
        match side {
            Side::Left => &LEFT,
            Side::Right => &RIGHT,
        }
    }
}

/// Colour of food nobody holds
pub const FREE_FOOD_COLOR: u32 = 0xf5d76e;
