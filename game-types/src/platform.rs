use std::fmt;

use serde::{Deserialize, Serialize};

/// The chat platform a message arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitch,
    Kick,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Twitch, Platform::Kick];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Twitch => write!(f, "Twitch"),
            Platform::Kick => write!(f, "Kick"),
        }
    }
}

/// A single chat message, normalized at the connector boundary so the
/// core never sees platform-specific message shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    pub platform: Platform,
    pub user: String,
    pub text: String,
}

impl ChatEvent {
    pub fn new(platform: Platform, user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            platform,
            user: user.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::Twitch.to_string(), "Twitch");
        assert_eq!(Platform::Kick.to_string(), "Kick");
    }

    #[test]
    fn test_platform_serde_tag() {
        assert_eq!(serde_json::to_string(&Platform::Kick).unwrap(), "\"kick\"");
    }
}
