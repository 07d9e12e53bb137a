use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use game_types::{ChatEvent, Platform};

use super::ConnectorError;
use crate::engine::EngineHandle;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct KickFrame {
    sender: KickSender,
    content: String,
}

#[derive(Debug, Deserialize)]
struct KickSender {
    username: String,
}

/// Listens to a Kick chat relay websocket. Inbound only; Kick replies go
/// out through the Twitch sender instead.
pub fn spawn(ws_url: String, engine: EngineHandle) {
    tokio::spawn(async move {
        loop {
            match run_connection(&ws_url, &engine).await {
                Ok(()) => info!("kick connection closed"),
                Err(e) => warn!("kick connection error: {}", e),
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
            info!("reconnecting to kick");
        }
    });
}

async fn run_connection(ws_url: &str, engine: &EngineHandle) -> Result<(), ConnectorError> {
    let (socket, _) = connect_async(ws_url).await?;
    info!("connected to kick chat");
    let (mut writer, mut reader) = socket.split();

    while let Some(frame) = reader.next().await {
        match frame? {
            Message::Text(raw) => handle_frame(&raw, engine),
            Message::Ping(payload) => writer.send(Message::Pong(payload)).await?,
            Message::Close(_) => return Err(ConnectorError::ConnectionClosed),
            _ => {}
        }
    }

    Err(ConnectorError::ConnectionClosed)
}

fn handle_frame(raw: &str, engine: &EngineHandle) {
    let frame: KickFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("unrecognized kick frame: {}", e);
            return;
        }
    };

    let text = frame.content.trim();
    debug!(user = %frame.sender.username, text, "kick message");
    engine.chat(ChatEvent::new(Platform::Kick, &frame.sender.username, text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_frame() {
        let raw = r#"{"sender":{"username":"bob"},"content":"!guess apple"}"#;
        let frame: KickFrame = serde_json::from_str(raw).unwrap();
        assert_eq!(frame.sender.username, "bob");
        assert_eq!(frame.content, "!guess apple");
    }

    #[test]
    fn rejects_frames_without_sender() {
        let raw = r#"{"content":"hello"}"#;
        assert!(serde_json::from_str::<KickFrame>(raw).is_err());
    }
}
