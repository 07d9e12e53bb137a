pub mod kick;
pub mod twitch;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use game_types::Platform;

/// Where the engine sends chat replies.
pub trait ChatResponder: Send + Sync {
    fn say(&self, platform: Platform, text: &str);
}

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connection closed by remote")]
    ConnectionClosed,
}

/// Routes replies to whichever platform connectors can speak.
///
/// Kick is read-only, so replies addressed to Kick fall back to the
/// Twitch sender when one is configured. With no senders at all the
/// reply is dropped with a debug log.
pub struct ChatOutbox {
    twitch: Option<mpsc::UnboundedSender<String>>,
}

impl ChatOutbox {
    pub fn new(twitch: Option<mpsc::UnboundedSender<String>>) -> Self {
        Self { twitch }
    }
}

impl ChatResponder for ChatOutbox {
    fn say(&self, platform: Platform, text: &str) {
        match &self.twitch {
            Some(sender) => {
                let _ = sender.send(text.to_string());
            }
            None => {
                debug!(%platform, text, "no chat sender configured, dropping reply");
            }
        }
    }
}
