use std::collections::{HashSet, VecDeque};

/// How many accepted words are remembered for repeat rejection.
pub const RECENT_CAPACITY: usize = 50;

/// Bounded FIFO set of recently played words. Inserting past capacity
/// evicts the oldest entry.
#[derive(Debug, Clone, Default)]
pub struct RecentWords {
    order: VecDeque<String>,
    seen: HashSet<String>,
}

impl RecentWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.seen.contains(word)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn insert(&mut self, word: &str) {
        if !self.seen.insert(word.to_string()) {
            return;
        }
        self.order.push_back(word.to_string());
        while self.order.len() > RECENT_CAPACITY {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut recent = RecentWords::new();
        recent.insert("hangman");
        assert!(recent.contains("hangman"));
        assert!(!recent.contains("streamer"));
    }

    #[test]
    fn test_duplicate_insert_does_not_grow() {
        let mut recent = RecentWords::new();
        recent.insert("hangman");
        recent.insert("hangman");
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut recent = RecentWords::new();
        for i in 0..RECENT_CAPACITY {
            recent.insert(&format!("word{i}"));
        }
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert!(recent.contains("word0"));

        // The 51st insertion pushes out the very first word only.
        recent.insert("overflow");
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert!(!recent.contains("word0"));
        assert!(recent.contains("word1"));
        assert!(recent.contains("overflow"));
    }
}
