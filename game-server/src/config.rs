use std::env;
use std::time::Duration;

use game_core::RoundTiming;

use crate::chat::twitch::TwitchConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub public_dir: String,
    pub owner_name: String,
    pub round_duration_secs: u64,
    pub post_round_delay_secs: u64,
    pub min_reveal_interval_secs: u64,
    pub first_reveal_delay_secs: u64,
    pub twitch_bot_name: Option<String>,
    pub twitch_oauth: Option<String>,
    pub twitch_channel: Option<String>,
    pub kick_chat_ws: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("Invalid PORT"),
            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string()),
            owner_name: env::var("OWNER_NAME").unwrap_or_default(),
            round_duration_secs: env::var("ROUND_DURATION_SECS")
                .unwrap_or_else(|_| "180".to_string())
                .parse()
                .expect("Invalid ROUND_DURATION_SECS"),
            post_round_delay_secs: env::var("POST_ROUND_DELAY_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("Invalid POST_ROUND_DELAY_SECS"),
            min_reveal_interval_secs: env::var("MIN_REVEAL_INTERVAL_SECS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("Invalid MIN_REVEAL_INTERVAL_SECS"),
            first_reveal_delay_secs: env::var("FIRST_REVEAL_DELAY_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("Invalid FIRST_REVEAL_DELAY_SECS"),
            twitch_bot_name: env::var("TWITCH_BOT_NAME").ok(),
            twitch_oauth: env::var("TWITCH_OAUTH").ok(),
            twitch_channel: env::var("TWITCH_CHANNEL").ok(),
            kick_chat_ws: env::var("KICK_CHAT_WS").ok(),
        }
    }

    pub fn timing(&self) -> RoundTiming {
        RoundTiming {
            round_duration: Duration::from_secs(self.round_duration_secs),
            min_reveal_interval: Duration::from_secs(self.min_reveal_interval_secs),
            first_reveal_delay: Duration::from_secs(self.first_reveal_delay_secs),
            post_round_delay: Duration::from_secs(self.post_round_delay_secs),
        }
    }

    /// Twitch credentials, when all three are configured.
    pub fn twitch(&self) -> Option<TwitchConfig> {
        Some(TwitchConfig {
            bot_name: self.twitch_bot_name.clone()?,
            oauth_token: self.twitch_oauth.clone()?,
            channel: self.twitch_channel.clone()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
