use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use game_core::{DefinitionSource, FrequencyOracle, ProfanityFilter, WordSource};

/// Datamuse frequency score below which a word is considered too obscure.
const COMMON_FREQUENCY_THRESHOLD: f64 = 3.5;

const RANDOM_WORD_ENDPOINTS: [&str; 2] = [
    "https://random-word-api.herokuapp.com/word",
    "https://random-word-api.vercel.app/api?words=1",
];

/// Random-word HTTP API. Both known mirrors answer with a JSON array of
/// one word; whichever responds first wins.
pub struct RandomWordApi {
    client: reqwest::Client,
}

impl RandomWordApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WordSource for RandomWordApi {
    async fn fetch_candidate(&self) -> Option<String> {
        for endpoint in RANDOM_WORD_ENDPOINTS {
            match fetch_word_list(&self.client, endpoint).await {
                Ok(words) => {
                    if let Some(word) = words.into_iter().next() {
                        return Some(word);
                    }
                    debug!(endpoint, "word endpoint returned an empty list");
                }
                Err(e) => warn!(endpoint, "word fetch failed: {}", e),
            }
        }
        None
    }
}

async fn fetch_word_list(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<Vec<String>, reqwest::Error> {
    client
        .get(endpoint)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

#[derive(Debug, Deserialize)]
struct DatamuseEntry {
    #[serde(default)]
    tags: Vec<String>,
}

/// Commonality check backed by Datamuse word-frequency metadata.
pub struct DatamuseOracle {
    client: reqwest::Client,
}

impl DatamuseOracle {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FrequencyOracle for DatamuseOracle {
    async fn is_common(&self, word: &str) -> bool {
        let url = format!("https://api.datamuse.com/words?sp={}&md=f&max=1", word);
        let entries: Vec<DatamuseEntry> = match self.client.get(&url).send().await {
            Ok(response) => match response.json().await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(word, "datamuse response unreadable: {}", e);
                    return false;
                }
            },
            Err(e) => {
                warn!(word, "datamuse lookup failed: {}", e);
                return false;
            }
        };

        let Some(entry) = entries.first() else {
            return false;
        };
        frequency_score(entry)
            .map(|score| score >= COMMON_FREQUENCY_THRESHOLD)
            .unwrap_or(false)
    }
}

/// Frequency tags look like `f:12.34`, per million words of text.
fn frequency_score(entry: &DatamuseEntry) -> Option<f64> {
    entry
        .tags
        .iter()
        .find_map(|tag| tag.strip_prefix("f:"))
        .and_then(|value| value.parse().ok())
}

#[derive(Debug, Deserialize)]
struct DictionaryEntry {
    meanings: Vec<DictionaryMeaning>,
}

#[derive(Debug, Deserialize)]
struct DictionaryMeaning {
    definitions: Vec<DictionaryDefinition>,
}

#[derive(Debug, Deserialize)]
struct DictionaryDefinition {
    definition: String,
}

/// Hint definitions from the free dictionaryapi.dev service.
pub struct DictionaryApi {
    client: reqwest::Client,
}

impl DictionaryApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DefinitionSource for DictionaryApi {
    async fn fetch_definition(&self, word: &str) -> Option<String> {
        let url = format!("https://api.dictionaryapi.dev/api/v2/entries/en/{}", word);
        let entries: Vec<DictionaryEntry> = match self.client.get(&url).send().await {
            Ok(response) => response.json().await.ok()?,
            Err(e) => {
                warn!(word, "dictionary lookup failed: {}", e);
                return None;
            }
        };

        entries
            .into_iter()
            .next()?
            .meanings
            .into_iter()
            .next()?
            .definitions
            .into_iter()
            .next()
            .map(|d| d.definition)
    }
}

/// Words that never make it onto a broadcast overlay. Substring matching
/// so compounds and plurals are caught too.
const DENY_LIST: [&str; 12] = [
    "anal", "arse", "bitch", "boob", "cock", "cunt", "dick", "fuck", "penis", "pussy", "shit",
    "slut",
];

pub struct DenyList;

impl ProfanityFilter for DenyList {
    fn is_clean(&self, word: &str) -> bool {
        let lowered = word.to_ascii_lowercase();
        !DENY_LIST.iter().any(|banned| lowered.contains(banned))
    }
}
