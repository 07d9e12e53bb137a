use std::collections::HashMap;

use game_types::{BattleStandings, LeaderboardEntry, Platform};

/// How many rows the overlay and the `!gamelb` reply show.
pub const LEADERBOARD_TOP: usize = 5;

/// Win counts per chat user, kept for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    scores: HashMap<String, u32>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a round win to `user` and return their new score.
    pub fn record_win(&mut self, user: &str) -> u32 {
        let score = self.scores.entry(user.to_string()).or_insert(0);
        *score += 1;
        *score
    }

    pub fn score(&self, user: &str) -> u32 {
        self.scores.get(user).copied().unwrap_or(0)
    }

    /// Top `n` entries, highest score first. Ties break alphabetically so
    /// repeated snapshots render identically.
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .scores
            .iter()
            .map(|(name, score)| LeaderboardEntry {
                name: name.clone(),
                score: *score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        entries.truncate(n);
        entries
    }

    pub fn reset(&mut self) {
        self.scores.clear();
    }
}

/// Chat-facing rendering of the top of the leaderboard.
pub fn leaderboard_text(top: &[LeaderboardEntry]) -> String {
    if top.is_empty() {
        return "🏆 Leaderboard is empty.".to_string();
    }

    let rows: Vec<String> = top
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}) {}({})", i + 1, entry.name, entry.score))
        .collect();

    format!("🏆 Game Leaderboard: {}", rows.join(" "))
}

/// Per-platform win counts while battle mode runs. Reset whenever battle
/// mode is (re)started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BattleScoreboard {
    twitch: u32,
    kick: u32,
}

impl BattleScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, platform: Platform) {
        match platform {
            Platform::Twitch => self.twitch += 1,
            Platform::Kick => self.kick += 1,
        }
    }

    pub fn standings(&self) -> BattleStandings {
        BattleStandings {
            twitch: self.twitch,
            kick: self.kick,
        }
    }

    pub fn report_text(&self) -> String {
        format!("⚔️ Battle score: Twitch {} | Kick {}", self.twitch, self.kick)
    }
}
