use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use regex::Regex;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use game_types::{ChatEvent, Platform};

use super::ConnectorError;
use crate::engine::EngineHandle;

const TWITCH_IRC_URL: &str = "wss://irc-ws.chat.twitch.tv:443";
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub bot_name: String,
    pub oauth_token: String,
    pub channel: String,
}

/// Connects to Twitch IRC over websocket, forwarding channel messages to
/// the engine and sending queued replies back. Reconnects on failure.
pub fn spawn(
    config: TwitchConfig,
    engine: EngineHandle,
    mut say_rx: mpsc::UnboundedReceiver<String>,
) {
    tokio::spawn(async move {
        loop {
            match run_connection(&config, &engine, &mut say_rx).await {
                Ok(()) => info!("twitch connection closed"),
                Err(e) => warn!("twitch connection error: {}", e),
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
            info!("reconnecting to twitch");
        }
    });
}

async fn run_connection(
    config: &TwitchConfig,
    engine: &EngineHandle,
    say_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ConnectorError> {
    let (socket, _) = connect_async(TWITCH_IRC_URL).await?;
    let (mut writer, mut reader) = socket.split();

    writer
        .send(Message::Text(format!("PASS {}", config.oauth_token)))
        .await?;
    writer
        .send(Message::Text(format!("NICK {}", config.bot_name)))
        .await?;
    writer
        .send(Message::Text(format!("JOIN #{}", config.channel)))
        .await?;
    info!(channel = %config.channel, "joined twitch chat");

    let privmsg =
        Regex::new(r"^:(?P<user>[^!\s]+)![^\s]+ PRIVMSG #[^\s]+ :(?P<text>.*)$").expect("regex");

    loop {
        tokio::select! {
            reply = say_rx.recv() => {
                let Some(text) = reply else {
                    return Ok(());
                };
                writer
                    .send(Message::Text(format!("PRIVMSG #{} :{}", config.channel, text)))
                    .await?;
            }
            frame = reader.next() => {
                let Some(frame) = frame else {
                    return Err(ConnectorError::ConnectionClosed);
                };
                match frame? {
                    Message::Text(raw) => {
                        for line in raw.lines() {
                            if let Some(pong) = handle_line(line, &privmsg, config, engine) {
                                writer.send(Message::Text(pong)).await?;
                            }
                        }
                    }
                    Message::Close(_) => return Err(ConnectorError::ConnectionClosed),
                    _ => {}
                }
            }
        }
    }
}

/// Processes one IRC line, returning a PONG payload if one is due.
fn handle_line(
    line: &str,
    privmsg: &Regex,
    config: &TwitchConfig,
    engine: &EngineHandle,
) -> Option<String> {
    if let Some(payload) = line.strip_prefix("PING ") {
        return Some(format!("PONG {}", payload));
    }

    if let Some(captures) = privmsg.captures(line) {
        let user = &captures["user"];
        let text = captures["text"].trim();
        // Ignore our own messages echoed back.
        if user.eq_ignore_ascii_case(&config.bot_name) {
            return None;
        }
        debug!(user, text, "twitch message");
        engine.chat(ChatEvent::new(Platform::Twitch, user, text));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn privmsg_regex() -> Regex {
        Regex::new(r"^:(?P<user>[^!\s]+)![^\s]+ PRIVMSG #[^\s]+ :(?P<text>.*)$").unwrap()
    }

    #[test]
    fn parses_privmsg_line() {
        let re = privmsg_regex();
        let line = ":alice!alice@alice.tmi.twitch.tv PRIVMSG #somechannel :!guess hello";
        let caps = re.captures(line).unwrap();
        assert_eq!(&caps["user"], "alice");
        assert_eq!(&caps["text"], "!guess hello");
    }

    #[test]
    fn ignores_non_privmsg_lines() {
        let re = privmsg_regex();
        assert!(re.captures(":tmi.twitch.tv 001 bot :Welcome").is_none());
        assert!(re.captures("PING :tmi.twitch.tv").is_none());
    }
}
