use rand::Rng;

/// Placeholder shown for letters that have not been revealed yet.
pub const HIDDEN_MARKER: char = '_';

/// The secret word of a round and its per-letter reveal mask.
///
/// The first and last letters are revealed from the start; interior
/// letters open up one at a time. A `WordRound` is a plain value, built
/// fresh for every round and replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRound {
    word: String,
    revealed: Vec<bool>,
}

impl WordRound {
    pub fn new(word: &str) -> Self {
        let word = word.trim().to_uppercase();
        let len = word.chars().count();
        let mut revealed = vec![false; len];
        if len > 0 {
            revealed[0] = true;
            revealed[len - 1] = true;
        }
        Self { word, revealed }
    }

    /// The secret word, uppercase.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    pub fn hidden_count(&self) -> usize {
        self.revealed.iter().filter(|r| !**r).count()
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.revealed.iter().all(|r| *r)
    }

    /// Reveal one hidden position, chosen uniformly at random. No-op when
    /// nothing is hidden.
    pub fn reveal_random(&mut self) {
        self.reveal_random_with(&mut rand::thread_rng());
    }

    pub fn reveal_random_with(&mut self, rng: &mut impl Rng) {
        let hidden: Vec<usize> = self
            .revealed
            .iter()
            .enumerate()
            .filter(|(_, r)| !**r)
            .map(|(i, _)| i)
            .collect();

        if hidden.is_empty() {
            return;
        }
        let index = hidden[rng.gen_range(0..hidden.len())];
        self.revealed[index] = true;
    }

    /// Render the mask for the overlay: letters and hidden markers joined
    /// with spaces, e.g. `H _ _ _ _ _ N`.
    pub fn display(&self) -> String {
        self.word
            .chars()
            .zip(&self.revealed)
            .map(|(c, revealed)| if *revealed { c } else { HIDDEN_MARKER })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Case-insensitive exact match against the secret word.
    pub fn check(&self, guess: &str) -> bool {
        guess.trim().to_uppercase() == self.word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_letters_start_revealed() {
        let round = WordRound::new("hangman");
        assert_eq!(round.word(), "HANGMAN");
        assert_eq!(round.display(), "H _ _ _ _ _ N");
        assert_eq!(round.hidden_count(), 5);
    }

    #[test]
    fn test_reveal_terminates_in_interior_count_calls() {
        let mut round = WordRound::new("hangman");
        for _ in 0..round.len() - 2 {
            assert!(!round.is_fully_revealed());
            round.reveal_random();
        }
        assert!(round.is_fully_revealed());
        assert_eq!(round.display(), "H A N G M A N");
    }

    #[test]
    fn test_reveal_never_repeats_a_position() {
        let mut round = WordRound::new("streamer");
        let mut hidden = round.hidden_count();
        while hidden > 0 {
            round.reveal_random();
            let now_hidden = round.hidden_count();
            // Each call must reveal exactly one previously-hidden position.
            assert_eq!(now_hidden, hidden - 1);
            hidden = now_hidden;
        }
    }

    #[test]
    fn test_reveal_on_fully_revealed_round_is_noop() {
        let mut round = WordRound::new("abcde");
        while !round.is_fully_revealed() {
            round.reveal_random();
        }
        round.reveal_random();
        assert!(round.is_fully_revealed());
        assert_eq!(round.display(), "A B C D E");
    }

    #[test]
    fn test_check_is_case_insensitive() {
        let round = WordRound::new("HANGMAN");
        assert!(round.check("hangman"));
        assert!(round.check("HANGMAN"));
        assert!(round.check("HaNgMaN"));
        assert!(round.check(" hangman "));
        assert!(!round.check("hangmen"));
        assert!(!round.check(""));
    }
}
