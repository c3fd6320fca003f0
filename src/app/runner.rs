//! Session actor: one task owning the session, driven by inbound messages
//! and the frame clock

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace};

use super::state::{ClientSession, FrameOutput};
use crate::game::script::ScriptedControls;
use crate::game::ControlState;
use crate::util::time::{delta_secs, Timer};
use crate::ws::handler::send_best_effort;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Where per-frame controls come from
#[derive(Debug)]
pub enum ControlSource {
    /// No keys held, no pointer
    Idle,
    Scripted(ScriptedControls),
}

impl ControlSource {
    fn next(&mut self, dt: f32) -> ControlState {
        match self {
            Self::Idle => ControlState::default(),
            Self::Scripted(script) => script.advance(dt),
        }
    }
}

/// Step one frame. Controls are only consumed on frames the session can
/// actually run, so scripts start with the first live frame.
fn run_frame(
    session: &mut ClientSession,
    controls: &mut ControlSource,
    now_ms: u64,
    dt: f32,
) -> Option<FrameOutput> {
    if !session.is_ready() {
        return None;
    }
    let state = controls.next(dt);
    session.step(now_ms, dt, &state)
}

/// Drive `session` until the server stream ends or `shutdown` resolves.
/// Returns the session for inspection.
pub async fn run_session(
    mut session: ClientSession,
    mut inbound: mpsc::Receiver<ServerMsg>,
    outbound: mpsc::Sender<ClientMsg>,
    mut controls: ControlSource,
    frame_period: Duration,
    shutdown: impl Future<Output = ()>,
) -> ClientSession {
    tokio::pin!(shutdown);

    let mut frames = interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let clock = Timer::new();
    let mut last_frame = Instant::now();
    let mut last_hud = String::new();
    let mut frame_count: u64 = 0;

    loop {
        tokio::select! {
            msg = inbound.recv() => match msg {
                Some(msg) => session.handle_message(msg),
                None => {
                    info!("Server stream ended");
                    break;
                }
            },
            tick = frames.tick() => {
                let now = tick.into_std();
                let dt = delta_secs(last_frame, now);
                last_frame = now;

                let Some(output) = run_frame(&mut session, &mut controls, clock.elapsed_ms(), dt)
                else {
                    continue;
                };
                frame_count += 1;

                if let Some(report) = output.report {
                    trace!(sent_at_ms = report.sent_at_ms, "Input report");
                    send_best_effort(&outbound, report.msg);
                }

                let hud = output.frame.hud.text();
                if hud != last_hud {
                    debug!(hud = %hud, "HUD updated");
                    last_hud = hud;
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    info!(frames = frame_count, status = session.status().text(), "Session loop stopped");
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ConnectionStatus;
    use crate::ws::protocol::{PlayerId, PlayerState, Side, Snapshot, Welcome, WorldConfig};

    fn welcome() -> ServerMsg {
        ServerMsg::Welcome(Welcome {
            id: PlayerId::from("me"),
            side: Side::Left,
            config: WorldConfig::default(),
        })
    }

    fn state() -> ServerMsg {
        ServerMsg::State(Snapshot {
            players: vec![PlayerState {
                id: PlayerId::from("me"),
                side: Side::Left,
                x: 200.0,
                y: 200.0,
                angle: 0.0,
                fullness: 0,
            }],
            ..Default::default()
        })
    }

    const SCRIPT: &str = r#"{"steps":[
        {"duration":0.05,"right":true},
        {"duration":1.0}
    ]}"#;

    #[test]
    fn script_waits_for_first_live_frame() {
        let mut session = ClientSession::new();
        let mut controls = ControlSource::Scripted(ScriptedControls::from_json(SCRIPT).unwrap());

        // Plenty of idle time passes before the local player shows up.
        for t in 0..10 {
            assert!(run_frame(&mut session, &mut controls, t * 100, 0.1).is_none());
        }
        session.handle_message(welcome());
        session.handle_message(state());

        let output = run_frame(&mut session, &mut controls, 1000, 0.01).unwrap();
        let ClientMsg::Input { movement, .. } = output.report.unwrap().msg;
        assert_eq!(movement.x, 1.0);
        assert!(session.model().predicted().unwrap().x > 200.0);
    }

    #[test]
    fn idle_source_yields_no_input() {
        let mut session = ClientSession::new();
        let mut controls = ControlSource::Idle;
        session.handle_message(welcome());
        session.handle_message(state());

        let output = run_frame(&mut session, &mut controls, 0, 0.01).unwrap();
        let ClientMsg::Input { movement, release, .. } = output.report.unwrap().msg;
        assert_eq!((movement.x, movement.y), (0.0, 0.0));
        assert!(!release);
    }

    #[tokio::test]
    async fn stops_when_server_stream_ends() {
        let (inbound_tx, inbound_rx) = mpsc::channel(8);
        let (outbound_tx, _outbound_rx) = mpsc::channel(8);
        inbound_tx.send(ServerMsg::Full).await.unwrap();
        drop(inbound_tx);

        let session = run_session(
            ClientSession::new(),
            inbound_rx,
            outbound_tx,
            ControlSource::Idle,
            Duration::from_millis(10),
            std::future::pending(),
        )
        .await;

        assert_eq!(session.status(), ConnectionStatus::RoomFull);
    }

    #[tokio::test]
    async fn predicts_and_reports_while_running() {
        let (inbound_tx, inbound_rx) = mpsc::channel(8);
        let (outbound_tx, mut outbound_rx) = mpsc::channel(64);
        inbound_tx.send(welcome()).await.unwrap();
        inbound_tx.send(state()).await.unwrap();

        let session = run_session(
            ClientSession::new(),
            inbound_rx,
            outbound_tx,
            ControlSource::Idle,
            Duration::from_millis(2),
            tokio::time::sleep(Duration::from_millis(150)),
        )
        .await;

        let predicted = session.model().predicted().copied().unwrap();
        assert_eq!((predicted.x, predicted.y), (200.0, 200.0));

        let reports = std::iter::from_fn(|| outbound_rx.try_recv().ok()).count();
        assert!(reports >= 1);
        drop(inbound_tx);
    }
}
