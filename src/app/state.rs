//! Client session state owned by the session actor

use tracing::{debug, info};

use crate::game::{
    Arena, ControlState, Correction, InputSampler, PredictionModel, ReconcilePolicy, SnapshotSlot,
};
use crate::render::{compose, RenderFrame};
use crate::util::rate_limit::InputThrottle;
use crate::ws::protocol::{ClientMsg, PlayerId, ServerMsg, Side, WorldConfig};

/// Connection-level status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    WaitingForOpponent,
    InBattle,
    GameOver { local_lost: bool },
    /// Terminal: the room had no free seat
    RoomFull,
}

impl ConnectionStatus {
    pub fn text(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::WaitingForOpponent => "Waiting for an opponent...",
            Self::InBattle => "In battle",
            Self::GameOver { local_lost: true } => "Match over: you got stuffed!",
            Self::GameOver { local_lost: false } => "Match over: your opponent got stuffed!",
            Self::RoomFull => "Room is full",
        }
    }
}

/// Identity assigned by the welcome message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    pub id: PlayerId,
    pub side: Side,
}

/// A throttled input report ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct InputReport {
    /// Session time the report was released, in milliseconds
    pub sent_at_ms: u64,
    pub msg: ClientMsg,
}

/// Result of one frame step
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame: RenderFrame,
    pub correction: Correction,
    pub report: Option<InputReport>,
}

/// Everything one client session owns: identity, the single predicted
/// player and the latest snapshot slot.
#[derive(Debug)]
pub struct ClientSession {
    local: Option<LocalIdentity>,
    world: WorldConfig,
    model: PredictionModel,
    snapshots: SnapshotSlot,
    sampler: InputSampler,
    policy: ReconcilePolicy,
    throttle: InputThrottle,
    status: ConnectionStatus,
}

impl ClientSession {
    pub fn new() -> Self {
        let world = WorldConfig::default();
        Self {
            local: None,
            world,
            model: PredictionModel::new(Arena::from(&world)),
            snapshots: SnapshotSlot::new(),
            sampler: InputSampler::new(),
            policy: ReconcilePolicy::default(),
            throttle: InputThrottle::default(),
            status: ConnectionStatus::Connecting,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn local(&self) -> Option<&LocalIdentity> {
        self.local.as_ref()
    }

    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    pub fn model(&self) -> &PredictionModel {
        &self.model
    }

    /// True once the latest snapshot contains the local player, i.e. when
    /// `step` would run a frame
    pub fn is_ready(&self) -> bool {
        match (&self.local, self.snapshots.latest()) {
            (Some(local), Some(snapshot)) => snapshot.player(&local.id).is_some(),
            _ => false,
        }
    }

    pub fn snapshots_received(&self) -> u64 {
        self.snapshots.received()
    }

    /// Apply one inbound message. Never blends; a snapshot only replaces
    /// the latest slot.
    pub fn handle_message(&mut self, msg: ServerMsg) {
        match msg {
            ServerMsg::Welcome(welcome) => {
                info!(
                    player_id = %welcome.id,
                    side = ?welcome.side,
                    width = welcome.config.width,
                    height = welcome.config.height,
                    max_fullness = welcome.config.max_fullness,
                    "Joined arena"
                );
                self.world = welcome.config;
                self.model.set_arena(Arena::from(&self.world));
                self.local = Some(LocalIdentity {
                    id: welcome.id,
                    side: welcome.side,
                });
                self.set_status(ConnectionStatus::WaitingForOpponent);
            }
            ServerMsg::State(snapshot) => {
                let status = if snapshot.game_over {
                    let local_lost = match (&snapshot.loser_id, &self.local) {
                        (Some(loser), Some(local)) => loser == &local.id,
                        _ => false,
                    };
                    ConnectionStatus::GameOver { local_lost }
                } else {
                    let opponent = match &self.local {
                        Some(local) => snapshot.has_opponent(&local.id),
                        None => false,
                    };
                    if opponent {
                        ConnectionStatus::InBattle
                    } else {
                        ConnectionStatus::WaitingForOpponent
                    }
                };
                self.snapshots.replace(snapshot);
                self.set_status(status);
            }
            ServerMsg::Full => {
                self.set_status(ConnectionStatus::RoomFull);
            }
        }
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status == ConnectionStatus::RoomFull || self.status == status {
            return;
        }
        info!(status = status.text(), "Status changed");
        self.status = status;
    }

    /// Run one frame: sample input, predict, reconcile, compose.
    ///
    /// Returns `None` (and does nothing) until a snapshot containing the
    /// local player has arrived.
    pub fn step(&mut self, now_ms: u64, dt: f32, controls: &ControlState) -> Option<FrameOutput> {
        let local = self.local.as_ref()?;
        let snapshot = self.snapshots.latest()?;
        let authoritative = snapshot.player(&local.id)?;

        let (predicted, seeded) = self.model.seed_from(authoritative);
        if seeded {
            info!(
                x = predicted.x,
                y = predicted.y,
                angle = predicted.angle,
                "Seeded local prediction"
            );
        }
        let intent = self
            .sampler
            .sample(controls, predicted.x, predicted.y, predicted.angle);

        self.model.advance(&intent, dt);
        let correction = self.policy.apply(&mut self.model, authoritative, dt)?;
        if let Correction::Snap {
            distance,
            angle_error,
        } = correction
        {
            debug!(distance, angle_error, "Prediction snapped to server state");
        }

        let report = self.throttle.check(now_ms).then(|| InputReport {
            sent_at_ms: now_ms,
            msg: intent.to_msg(),
        });

        let predicted = self.model.predicted()?;
        let frame = compose(&snapshot, &local.id, predicted, self.world.max_fullness);

        Some(FrameOutput {
            frame,
            correction,
            report,
        })
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::protocol::{PlayerState, Snapshot, Vec2, Welcome};

    fn welcome() -> ServerMsg {
        ServerMsg::Welcome(Welcome {
            id: PlayerId::from("me"),
            side: Side::Left,
            config: WorldConfig {
                max_fullness: 100,
                width: 960.0,
                height: 540.0,
            },
        })
    }

    fn player(id: &str, side: Side, x: f32, y: f32, angle: f32) -> PlayerState {
        PlayerState {
            id: PlayerId::from(id),
            side,
            x,
            y,
            angle,
            fullness: 10,
        }
    }

    fn state(players: Vec<PlayerState>) -> ServerMsg {
        ServerMsg::State(Snapshot {
            players,
            ..Default::default()
        })
    }

    fn right() -> ControlState {
        ControlState {
            right: true,
            pointer: Some((1000.0, 100.0)),
            ..Default::default()
        }
    }

    #[test]
    fn step_is_noop_without_snapshot() {
        let mut session = ClientSession::new();
        assert!(session.step(0, 0.016, &right()).is_none());

        session.handle_message(welcome());
        assert!(session.step(16, 0.016, &right()).is_none());
        assert!(session.model().predicted().is_none());
    }

    #[test]
    fn step_is_noop_when_local_player_missing() {
        let mut session = ClientSession::new();
        session.handle_message(welcome());
        session.handle_message(state(vec![player("them", Side::Right, 500.0, 300.0, 0.0)]));
        assert!(session.step(0, 0.016, &right()).is_none());
        assert!(session.model().predicted().is_none());
    }

    #[test]
    fn ready_only_with_local_player_in_snapshot() {
        let mut session = ClientSession::new();
        assert!(!session.is_ready());

        session.handle_message(welcome());
        assert!(!session.is_ready());

        session.handle_message(state(vec![player("them", Side::Right, 500.0, 300.0, 0.0)]));
        assert!(!session.is_ready());

        session.handle_message(state(vec![player("me", Side::Left, 100.0, 100.0, 0.0)]));
        assert!(session.is_ready());
    }

    #[test]
    fn predicts_then_blends_toward_server() {
        let mut session = ClientSession::new();
        session.handle_message(welcome());
        session.handle_message(state(vec![player("me", Side::Left, 100.0, 100.0, 0.0)]));

        let out = session.step(0, 0.1, &right()).unwrap();

        // 100 + 22 predicted, then 10% back toward the server's 100.
        assert_eq!(out.correction, Correction::Blend);
        let p = session.model().predicted().unwrap();
        assert!((p.x - 119.8).abs() < 1e-4);
        assert_eq!(p.y, 100.0);

        let me = &out.frame.players[0];
        assert_eq!(me.x, p.x);
        assert_eq!(me.fullness, 10);
    }

    #[test]
    fn emits_throttled_reports() {
        let mut session = ClientSession::new();
        session.handle_message(welcome());
        session.handle_message(state(vec![player("me", Side::Left, 100.0, 100.0, 0.0)]));

        let first = session.step(0, 0.005, &right()).unwrap();
        let second = session.step(5, 0.005, &right()).unwrap();
        let third = session.step(20, 0.005, &right()).unwrap();

        let report = first.report.unwrap();
        assert_eq!(report.sent_at_ms, 0);
        let ClientMsg::Input { movement, release, .. } = report.msg;
        assert_eq!(movement, Vec2 { x: 1.0, y: 0.0 });
        assert!(!release);

        assert!(second.report.is_none());
        assert_eq!(third.report.map(|r| r.sent_at_ms), Some(20));
    }

    #[test]
    fn teleport_snaps() {
        let mut session = ClientSession::new();
        session.handle_message(welcome());
        session.handle_message(state(vec![player("me", Side::Left, 100.0, 100.0, 0.0)]));
        session.step(0, 0.016, &ControlState::default()).unwrap();

        session.handle_message(state(vec![player("me", Side::Left, 700.0, 400.0, 0.0)]));
        let out = session.step(16, 0.016, &ControlState::default()).unwrap();

        assert!(matches!(out.correction, Correction::Snap { .. }));
        let p = session.model().predicted().unwrap();
        assert_eq!((p.x, p.y), (700.0, 400.0));
    }

    #[test]
    fn status_tracks_messages() {
        let mut session = ClientSession::new();
        assert_eq!(session.status(), ConnectionStatus::Connecting);

        session.handle_message(welcome());
        assert_eq!(session.status(), ConnectionStatus::WaitingForOpponent);

        session.handle_message(state(vec![
            player("me", Side::Left, 100.0, 100.0, 0.0),
            player("them", Side::Right, 800.0, 100.0, 0.0),
        ]));
        assert_eq!(session.status(), ConnectionStatus::InBattle);

        session.handle_message(ServerMsg::State(Snapshot {
            players: vec![player("me", Side::Left, 100.0, 100.0, 0.0)],
            game_over: true,
            loser_id: Some(PlayerId::from("me")),
            ..Default::default()
        }));
        assert_eq!(
            session.status(),
            ConnectionStatus::GameOver { local_lost: true }
        );
    }

    #[test]
    fn room_full_is_terminal() {
        let mut session = ClientSession::new();
        session.handle_message(ServerMsg::Full);
        session.handle_message(welcome());
        assert_eq!(session.status(), ConnectionStatus::RoomFull);
    }

    #[test]
    fn welcome_sets_arena() {
        let mut session = ClientSession::new();
        session.handle_message(ServerMsg::Welcome(Welcome {
            id: PlayerId::from("me"),
            side: Side::Right,
            config: WorldConfig {
                max_fullness: 50,
                width: 1280.0,
                height: 720.0,
            },
        }));
        assert_eq!(session.model().arena().max_x, 1220.0);
        assert_eq!(session.world().max_fullness, 50);
        assert_eq!(session.local().map(|l| l.side), Some(Side::Right));
    }
}
