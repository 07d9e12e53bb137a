use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::recent::RecentWords;

pub const MIN_WORD_LEN: usize = 5;
pub const MAX_WORD_LEN: usize = 9;

/// How many fetch-and-validate attempts before giving up on the network.
pub const MAX_ATTEMPTS: usize = 8;

/// Guaranteed-safe word used when every attempt fails, so a round can
/// always start.
pub const FALLBACK_WORD: &str = "streamer";

/// Remote supplier of raw candidate words. Failures are advisory and
/// surface as `None`.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn fetch_candidate(&self) -> Option<String>;
}

/// Judges whether a word is common enough to be guessable.
#[async_trait]
pub trait FrequencyOracle: Send + Sync {
    async fn is_common(&self, word: &str) -> bool;
}

pub trait ProfanityFilter: Send + Sync {
    fn is_clean(&self, word: &str) -> bool;
}

/// Lowercase and strip everything that is not an ASCII letter.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Produces the next round's word: fetched remotely, normalized, length-
/// and cleanliness-checked, commonality-checked, and not recently played.
#[derive(Clone)]
pub struct WordSelector {
    source: Arc<dyn WordSource>,
    oracle: Arc<dyn FrequencyOracle>,
    filter: Arc<dyn ProfanityFilter>,
}

impl WordSelector {
    pub fn new(
        source: Arc<dyn WordSource>,
        oracle: Arc<dyn FrequencyOracle>,
        filter: Arc<dyn ProfanityFilter>,
    ) -> Self {
        Self {
            source,
            oracle,
            filter,
        }
    }

    /// Select a word for a new round. Never fails and never blocks
    /// indefinitely: after [`MAX_ATTEMPTS`] rejected or failed fetches it
    /// returns [`FALLBACK_WORD`].
    pub async fn select(&self, recent: &RecentWords) -> String {
        for attempt in 1..=MAX_ATTEMPTS {
            let Some(raw) = self.source.fetch_candidate().await else {
                debug!(attempt, "word source returned nothing");
                continue;
            };

            let word = normalize(&raw);
            if word.len() < MIN_WORD_LEN || word.len() > MAX_WORD_LEN {
                debug!(attempt, word, "candidate rejected: length");
                continue;
            }
            if !self.filter.is_clean(&word) {
                debug!(attempt, "candidate rejected: profanity");
                continue;
            }
            if recent.contains(&word) {
                debug!(attempt, word, "candidate rejected: recently played");
                continue;
            }
            if !self.oracle.is_common(&word).await {
                debug!(attempt, word, "candidate rejected: too obscure");
                continue;
            }

            return word;
        }

        warn!(
            "no usable word after {} attempts, using fallback",
            MAX_ATTEMPTS
        );
        FALLBACK_WORD.to_string()
    }
}
