//! Frame channel: newline-delimited JSON over any async byte stream

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Frame channel I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reader loop: frames -> session inbound queue.
///
/// Undecodable frames are logged and skipped. Returns when the stream ends
/// or the session stops listening.
pub async fn read_frames<R>(reader: R, inbound: mpsc::Sender<ServerMsg>) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<ServerMsg>(line) {
            Ok(msg) => {
                if inbound.send(msg).await.is_err() {
                    debug!("Inbound channel closed");
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse server message");
            }
        }
    }

    Ok(())
}

/// Writer loop: session outbound queue -> frames
pub async fn write_frames<W>(
    mut writer: W,
    mut outbound: mpsc::Receiver<ClientMsg>,
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = outbound.recv().await {
        let mut frame = serde_json::to_vec(&msg)?;
        frame.push(b'\n');
        writer.write_all(&frame).await?;
        writer.flush().await?;
    }
    debug!("Outbound channel closed");
    Ok(())
}

/// Queue a message without waiting. A full or closed queue drops it.
pub fn send_best_effort(outbound: &mpsc::Sender<ClientMsg>, msg: ClientMsg) -> bool {
    match outbound.try_send(msg) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            debug!("Outbound queue full, dropping input report");
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("Outbound channel closed, dropping input report");
            false
        }
    }
}
