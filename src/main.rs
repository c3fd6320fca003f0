//! Feast Duel headless client
//!
//! Speaks the arena protocol as newline-delimited JSON on stdin/stdout, so
//! any socket bridge can be piped in front of it. Logs go to stderr.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feast_duel_client::app::{run_session, ClientSession, ControlSource};
use feast_duel_client::config::{Config, LogFormat};
use feast_duel_client::game::script::ScriptedControls;
use feast_duel_client::util::time::frame_period;
use feast_duel_client::ws::handler::{read_frames, write_frames};

/// Inbound queue depth between the reader task and the session
const INBOUND_QUEUE: usize = 64;

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config);

    // One logical thread of control: the session actor never shares state
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config));

    // The stdin reader sits on a blocking thread that may never return
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

async fn run(config: Config) -> anyhow::Result<()> {
    info!("Starting Feast Duel client");
    info!(frame_rate = config.frame_rate, "Frame clock");

    let controls = match &config.input_script {
        Some(path) => {
            info!(path = %path.display(), "Using scripted controls");
            ControlSource::Scripted(ScriptedControls::from_path(path)?)
        }
        None => ControlSource::Idle,
    };

    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE);
    let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_queue);

    let reader = tokio::spawn(read_frames(tokio::io::stdin(), inbound_tx));
    let writer = tokio::spawn(write_frames(tokio::io::stdout(), outbound_rx));

    let session = run_session(
        ClientSession::new(),
        inbound_rx,
        outbound_tx,
        controls,
        frame_period(config.frame_rate),
        shutdown_signal(),
    )
    .await;

    if let Some(local) = session.local() {
        info!(
            player_id = %local.id,
            side = ?local.side,
            snapshots = session.snapshots_received(),
            "Client shutdown complete"
        );
    }

    reader.abort();
    // Outbound sender went away with the session; let the writer drain
    writer.await??;
    Ok(())
}

/// Initialize tracing/logging on stderr
fn init_tracing(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
