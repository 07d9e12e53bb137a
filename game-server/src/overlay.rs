use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use warp::ws::{Message, WebSocket};

use crate::engine::EngineHandle;
use game_types::OverlayMessage;

/// Fan-out point for overlay updates. The engine pushes through the
/// [`OverlaySink`] face; each connected overlay socket holds a subscriber.
pub struct OverlayBroadcaster {
    tx: broadcast::Sender<OverlayMessage>,
}

/// Where the engine publishes display updates.
pub trait OverlaySink: Send + Sync {
    fn broadcast(&self, message: OverlayMessage);
}

impl OverlayBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OverlayMessage> {
        self.tx.subscribe()
    }
}

impl OverlaySink for OverlayBroadcaster {
    fn broadcast(&self, message: OverlayMessage) {
        // Send only fails with no subscribers, which is fine.
        let _ = self.tx.send(message);
    }
}

pub async fn handle_overlay_socket(
    websocket: WebSocket,
    broadcaster: Arc<OverlayBroadcaster>,
    engine: EngineHandle,
) {
    info!("overlay client connected");

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    // Subscribe before the snapshot so no update falls in the gap.
    let mut updates = broadcaster.subscribe();

    // Replay the current state so a freshly opened overlay is in sync.
    for message in engine.overlay_snapshot().await {
        if send_message(&mut ws_sender, &message).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Ok(message) => {
                        if send_message(&mut ws_sender, &message).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "overlay client lagging, skipping updates");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = ws_receiver.next() => {
                match incoming {
                    // The overlay never speaks; drain whatever it sends.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("overlay socket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    info!("overlay client disconnected");
}

async fn send_message(
    sender: &mut (impl SinkExt<Message> + Unpin),
    message: &OverlayMessage,
) -> Result<(), ()> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            warn!("failed to serialize overlay message: {:?}", e);
            return Ok(());
        }
    };

    sender.send(Message::text(json)).await.map_err(|_| ())
}
