use async_trait::async_trait;

/// External dictionary lookup. Failures are advisory and surface as `None`.
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    async fn fetch_definition(&self, word: &str) -> Option<String>;
}

/// What the caller of [`HintState::begin`] should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintRequest {
    /// First hint of the round: perform the lookup and store the result.
    Lookup,
    /// The round's hint was already spent.
    AlreadyUsed,
}

/// Per-round hint gate: at most one definition lookup per round, with the
/// result cached even when the lookup finds nothing.
#[derive(Debug, Clone, Default)]
pub struct HintState {
    used: bool,
    cached: Option<Option<String>>,
}

impl HintState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called at round start, and only then.
    pub fn reset(&mut self) {
        self.used = false;
        self.cached = None;
    }

    /// Spend the round's hint. Only the first call per round asks for a
    /// lookup; the lookup's outcome does not give the round another try.
    pub fn begin(&mut self) -> HintRequest {
        if self.used {
            HintRequest::AlreadyUsed
        } else {
            self.used = true;
            HintRequest::Lookup
        }
    }

    /// Record the lookup result, `None` meaning "no definition found".
    pub fn store(&mut self, definition: Option<String>) {
        self.cached = Some(definition);
    }

    pub fn used(&self) -> bool {
        self.used
    }

    /// `Some(None)` is a cached miss; `None` means no lookup finished yet.
    pub fn cached(&self) -> Option<&Option<String>> {
        self.cached.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hint_requests_lookup() {
        let mut hint = HintState::new();
        assert_eq!(hint.begin(), HintRequest::Lookup);
        assert!(hint.used());
    }

    #[test]
    fn test_second_hint_is_gated_even_after_failed_lookup() {
        let mut hint = HintState::new();
        assert_eq!(hint.begin(), HintRequest::Lookup);
        hint.store(None);

        // The failed lookup stays cached; no second lookup happens.
        assert_eq!(hint.begin(), HintRequest::AlreadyUsed);
        assert_eq!(hint.cached(), Some(&None));
    }

    #[test]
    fn test_reset_rearms_the_gate() {
        let mut hint = HintState::new();
        hint.begin();
        hint.store(Some("a word game".to_string()));

        hint.reset();
        assert!(!hint.used());
        assert!(hint.cached().is_none());
        assert_eq!(hint.begin(), HintRequest::Lookup);
    }
}
