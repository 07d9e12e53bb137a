use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One row of the spectator leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

/// Platform win counts while battle mode is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BattleStandings {
    pub twitch: u32,
    pub kick: u32,
}

/// Push-channel payloads sent to the browser overlay.
///
/// Serialized as `{"type": "...", ...fields}` so the overlay client can
/// switch on the tag the same way the display always has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverlayMessage {
    /// The current display string: revealed letters and `_` placeholders
    /// joined with spaces, or a status banner between games.
    Word { value: String },
    /// Winner name, or empty to clear the winner banner.
    Winner { name: String },
    /// Seconds remaining before the next round starts.
    Countdown { seconds: u32 },
    /// Top-5 scores.
    Leaderboard { entries: Vec<LeaderboardEntry> },
    /// Battle-mode platform standings.
    Battle { standings: BattleStandings },
    /// Bare signal that somebody just won the round.
    Win,
}
