//! Wire protocol message definitions
//! These are the JSON frame types exchanged with the arena server

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Player identity as assigned by the server.
///
/// The server may hand out string or numeric ids; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which end of the table a player sits at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Sent once after connecting
    Welcome(Welcome),

    /// Authoritative snapshot (sent every server tick)
    State(Snapshot),

    /// Room is at capacity, nothing else will follow
    Full,
}

/// Identity and world parameters for this session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Welcome {
    pub id: PlayerId,
    pub side: Side,
    pub config: WorldConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    /// Fullness at which a player is stuffed
    pub max_fullness: u32,
    /// Arena width
    pub width: f32,
    /// Arena height
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_fullness: 100,
            width: 960.0,
            height: 540.0,
        }
    }
}

/// Authoritative world state. Never written to after it is received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub players: Vec<PlayerState>,
    #[serde(default)]
    pub foods: Vec<Food>,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub loser_id: Option<PlayerId>,
}

impl Snapshot {
    /// Look up a player by id
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// True if anyone other than `id` is present
    pub fn has_opponent(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id != id)
    }
}

/// Per-player state as seen by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub side: Side,
    pub x: f32,
    pub y: f32,
    /// Facing in radians
    pub angle: f32,
    pub fullness: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodState {
    Free,
    Held,
}

/// A food item on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub x: f32,
    pub y: f32,
    pub state: FoodState,
    #[serde(default)]
    pub held_by: Option<PlayerId>,
}

/// 2D vector on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Latest control intent
    Input {
        /// Unit movement direction, or zero
        #[serde(rename = "move")]
        movement: Vec2,
        /// Aim direction in radians
        aim: f32,
        /// Drop whatever is held this frame
        release: bool,
    },
}
