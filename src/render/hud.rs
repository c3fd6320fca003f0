//! HUD summary: fullness bars and match status

use super::compose::RenderPlayer;
use super::style::SideStyle;
use crate::ws::protocol::{PlayerId, Side, Snapshot};

/// Width of a fullness bar in glyphs
pub const BAR_WIDTH: usize = 12;

/// One side's fullness row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullnessRow {
    pub side: Side,
    /// Fullness clamped to the maximum
    pub value: u32,
    pub max: u32,
    pub bar: String,
}

/// Match outcome as shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    InBattle,
    LocalStuffed,
    OpponentStuffed,
}

impl MatchStatus {
    pub fn from_snapshot(snapshot: &Snapshot, local_id: &PlayerId) -> Self {
        if !snapshot.game_over {
            Self::InBattle
        } else if snapshot.loser_id.as_ref() == Some(local_id) {
            Self::LocalStuffed
        } else {
            Self::OpponentStuffed
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::InBattle => "In battle",
            Self::LocalStuffed => "You got stuffed",
            Self::OpponentStuffed => "Opponent got stuffed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub left: FullnessRow,
    pub right: FullnessRow,
    pub status: MatchStatus,
}

impl Hud {
    pub fn build(
        players: &[RenderPlayer],
        snapshot: &Snapshot,
        local_id: &PlayerId,
        max_fullness: u32,
    ) -> Self {
        let row = |side: Side| {
            let value = players
                .iter()
                .find(|p| p.side == side)
                .map(|p| p.fullness.min(max_fullness))
                .unwrap_or(0);
            FullnessRow {
                side,
                value,
                max: max_fullness,
                bar: make_bar(value, max_fullness),
            }
        };

        Self {
            left: row(Side::Left),
            right: row(Side::Right),
            status: MatchStatus::from_snapshot(snapshot, local_id),
        }
    }

    /// Three-line text rendering
    pub fn text(&self) -> String {
        let line = |row: &FullnessRow| {
            format!(
                "{} fullness {}  {}/{}",
                SideStyle::for_side(row.side).label,
                row.bar,
                row.value,
                row.max
            )
        };
        format!(
            "{}\n{}\nStatus: {}",
            line(&self.left),
            line(&self.right),
            self.status.text()
        )
    }
}

/// Proportional bar of `BAR_WIDTH` glyphs, `=` filled and `.` empty
pub fn make_bar(value: u32, max: u32) -> String {
    let filled = if max == 0 {
        0
    } else {
        let ratio = f64::from(value.min(max)) / f64::from(max);
        ((ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH)
    };
    format!("{}{}", "=".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::protocol::PlayerState;

    fn render_player(id: &str, side: Side, fullness: u32) -> RenderPlayer {
        RenderPlayer::from_state(&PlayerState {
            id: PlayerId::from(id),
            side,
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            fullness,
        })
    }

    #[test]
    fn bar_half() {
        assert_eq!(make_bar(50, 100), "======......");
    }

    #[test]
    fn bar_full_and_empty() {
        assert_eq!(make_bar(100, 100), "============");
        assert_eq!(make_bar(0, 100), "............");
    }

    #[test]
    fn bar_rounds_and_never_overflows() {
        assert_eq!(make_bar(1, 24), "=...........");
        assert_eq!(make_bar(250, 100).len(), BAR_WIDTH);
        assert_eq!(make_bar(5, 0), "............");
    }

    #[test]
    fn status_follows_loser() {
        let me = PlayerId::from("me");
        let mut snapshot = Snapshot::default();
        assert_eq!(MatchStatus::from_snapshot(&snapshot, &me), MatchStatus::InBattle);

        snapshot.game_over = true;
        snapshot.loser_id = Some(me.clone());
        assert_eq!(MatchStatus::from_snapshot(&snapshot, &me), MatchStatus::LocalStuffed);

        snapshot.loser_id = Some(PlayerId::from("them"));
        assert_eq!(MatchStatus::from_snapshot(&snapshot, &me), MatchStatus::OpponentStuffed);
    }

    #[test]
    fn hud_clamps_and_fills_missing_side() {
        let players = vec![render_player("me", Side::Left, 130)];
        let hud = Hud::build(&players, &Snapshot::default(), &PlayerId::from("me"), 100);
        assert_eq!(hud.left.value, 100);
        assert_eq!(hud.right.value, 0);
        assert_eq!(
            hud.text(),
            "Left fullness ============  100/100\n\
             Right fullness ............  0/100\n\
             Status: In battle"
        );
    }
}
