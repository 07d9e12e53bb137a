use std::time::{Duration, Instant};

use game_types::{BattleStandings, OverlayMessage, Platform};
use tracing::info;

use crate::hint::{HintRequest, HintState};
use crate::reveal::WordRound;
use crate::scoring::{BattleScoreboard, LEADERBOARD_TOP, Leaderboard};

/// Overlay banner before the first `!word`.
pub const WAITING_TEXT: &str = "WAITING FOR !WORD";
/// Overlay banner after `!endword`.
pub const ENDED_TEXT: &str = "WORD GAME ENDED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round; waiting for a start command.
    Idle,
    /// Round running, timers armed.
    Active,
    /// Word fully shown, post-round countdown running.
    Ended,
}

/// Timing knobs, injected from server config.
#[derive(Debug, Clone, Copy)]
pub struct RoundTiming {
    pub round_duration: Duration,
    pub min_reveal_interval: Duration,
    pub first_reveal_delay: Duration,
    pub post_round_delay: Duration,
}

impl Default for RoundTiming {
    fn default() -> Self {
        Self {
            round_duration: Duration::from_secs(180),
            min_reveal_interval: Duration::from_secs(20),
            first_reveal_delay: Duration::from_secs(10),
            post_round_delay: Duration::from_secs(30),
        }
    }
}

/// Timer schedule handed back when a round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSchedule {
    pub first_reveal_delay: Duration,
    /// `max(round_duration / hidden_letters, min_reveal_interval)`: short
    /// words reveal no faster than the floor, long words still finish
    /// inside the round budget.
    pub reveal_interval: Duration,
    pub round_duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub platform: Platform,
    pub user: String,
}

/// The result of ending a round. Produced exactly once per round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEnd {
    pub word: String,
    pub winner: Option<Winner>,
}

/// Outcome of a reveal timer firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// One more letter is showing; round continues.
    Revealed(String),
    /// The reveal emptied the hidden set; round over, no winner.
    Finished(RoundEnd),
    /// Timer outlived its round; nothing happened.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoActiveRound,
    MalformedCommand,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedGuess {
    pub end: RoundEnd,
    pub new_score: u32,
    /// Standings after crediting the winner's platform; `None` outside
    /// battle mode.
    pub battle: Option<BattleStandings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    Accepted(AcceptedGuess),
    Rejected(RejectReason),
}

/// Outcome of a `!hint` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintQuery {
    NoActiveRound,
    AlreadyUsed,
    /// First hint of the round: look up a definition for this word.
    Lookup(String),
}

/// The round lifecycle state machine.
///
/// Owns the current round, the hint gate, the leaderboard and the battle
/// scoreboard. All transitions are synchronous; the caller drives them
/// from a single serialized event loop, so ending a round is guarded by a
/// latch rather than a lock: whichever trigger arrives first (winning
/// guess, timeout, final reveal) takes the end-of-round effects, and every
/// later trigger is a no-op.
#[derive(Debug)]
pub struct GameSession {
    timing: RoundTiming,
    phase: Phase,
    round: Option<WordRound>,
    started_at: Option<Instant>,
    ended: bool,
    hint: HintState,
    leaderboard: Leaderboard,
    battle: Option<BattleScoreboard>,
    game_active: bool,
    banner: &'static str,
}

impl GameSession {
    pub fn new(timing: RoundTiming) -> Self {
        Self {
            timing,
            phase: Phase::Idle,
            round: None,
            started_at: None,
            ended: false,
            hint: HintState::new(),
            leaderboard: Leaderboard::new(),
            battle: None,
            game_active: false,
            banner: WAITING_TEXT,
        }
    }

    pub fn timing(&self) -> RoundTiming {
        self.timing
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// When the current round began; `None` between games.
    pub fn round_started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// True between a start command and the next `!endword`.
    pub fn game_active(&self) -> bool {
        self.game_active
    }

    pub fn set_active(&mut self) {
        self.game_active = true;
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn battle_mode(&self) -> bool {
        self.battle.is_some()
    }

    pub fn battle_standings(&self) -> Option<BattleStandings> {
        self.battle.as_ref().map(|b| b.standings())
    }

    /// Chat-facing battle report, when battle mode is running.
    pub fn battle_report(&self) -> Option<String> {
        self.battle.as_ref().map(|b| b.report_text())
    }

    /// Enable battle mode. Restarting it resets both scoreboards.
    pub fn start_battle(&mut self) {
        self.battle = Some(BattleScoreboard::new());
        self.leaderboard.reset();
        self.game_active = true;
    }

    pub fn stop_battle(&mut self) {
        self.battle = None;
    }

    /// Install a fresh round and return its timer schedule. Replaces any
    /// previous round wholesale; the caller must have cancelled that
    /// round's timers already.
    pub fn begin_round(&mut self, word: &str) -> RoundSchedule {
        let round = WordRound::new(word);
        let hidden = round.hidden_count().max(1) as u32;

        let computed = self.timing.round_duration / hidden;
        let reveal_interval = computed.max(self.timing.min_reveal_interval);

        info!(word_len = round.len(), ?reveal_interval, "round started");

        self.round = Some(round);
        self.started_at = Some(Instant::now());
        self.ended = false;
        self.phase = Phase::Active;
        self.hint.reset();

        RoundSchedule {
            first_reveal_delay: self.timing.first_reveal_delay,
            reveal_interval,
            round_duration: self.timing.round_duration,
        }
    }

    /// The overlay's current word line.
    pub fn display(&self) -> String {
        match (self.phase, &self.round) {
            (Phase::Active, Some(round)) => round.display(),
            (Phase::Ended, Some(round)) => round.word().to_string(),
            _ => self.banner.to_string(),
        }
    }

    /// Reveal one more letter. Transitions to `Ended` (no winner) when the
    /// reveal finishes the word.
    pub fn reveal_tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Active || self.ended {
            return TickOutcome::Stale;
        }
        let Some(round) = self.round.as_mut() else {
            return TickOutcome::Stale;
        };

        round.reveal_random();

        if round.is_fully_revealed() {
            let word = round.word().to_string();
            self.ended = true;
            self.phase = Phase::Ended;
            TickOutcome::Finished(RoundEnd { word, winner: None })
        } else {
            TickOutcome::Revealed(round.display())
        }
    }

    /// End the round with no winner. Returns `None` when the round already
    /// ended, making a racing timeout harmless.
    pub fn time_out(&mut self) -> Option<RoundEnd> {
        self.end_round(None)
    }

    /// Idempotent end-of-round latch: only the first end per round yields
    /// `Some`, every later call is silently ignored.
    pub fn end_round(&mut self, winner: Option<Winner>) -> Option<RoundEnd> {
        if self.phase != Phase::Active || self.ended {
            return None;
        }
        let word = self.round.as_ref()?.word().to_string();

        self.ended = true;
        self.phase = Phase::Ended;
        Some(RoundEnd { word, winner })
    }

    /// Validate and arbitrate a guess. At most one guess per round is
    /// accepted; acceptance updates the leaderboard, the battle standings
    /// when battle mode is on, and ends the round.
    pub fn submit_guess(&mut self, platform: Platform, user: &str, text: &str) -> GuessOutcome {
        let guess = text.trim();
        if guess.is_empty() {
            return GuessOutcome::Rejected(RejectReason::MalformedCommand);
        }
        if self.phase != Phase::Active || self.ended {
            return GuessOutcome::Rejected(RejectReason::NoActiveRound);
        }
        let Some(round) = self.round.as_ref() else {
            return GuessOutcome::Rejected(RejectReason::NoActiveRound);
        };
        if !round.check(guess) {
            return GuessOutcome::Rejected(RejectReason::Incorrect);
        }

        let word = round.word().to_string();
        let new_score = self.leaderboard.record_win(user);
        let battle = self.battle.as_mut().map(|board| {
            board.record(platform);
            board.standings()
        });

        self.ended = true;
        self.phase = Phase::Ended;

        info!(user, %platform, "round won");

        GuessOutcome::Accepted(AcceptedGuess {
            end: RoundEnd {
                word,
                winner: Some(Winner {
                    platform,
                    user: user.to_string(),
                }),
            },
            new_score,
            battle,
        })
    }

    /// `!hint`: gate on an active round and on the once-per-round latch.
    pub fn request_hint(&mut self) -> HintQuery {
        if self.phase != Phase::Active || self.ended {
            return HintQuery::NoActiveRound;
        }
        let Some(round) = self.round.as_ref() else {
            return HintQuery::NoActiveRound;
        };
        match self.hint.begin() {
            HintRequest::AlreadyUsed => HintQuery::AlreadyUsed,
            HintRequest::Lookup => HintQuery::Lookup(round.word().to_lowercase()),
        }
    }

    pub fn store_hint(&mut self, definition: Option<String>) {
        self.hint.store(definition);
    }

    pub fn hint_used(&self) -> bool {
        self.hint.used()
    }

    /// Stop the game: back to `Idle` with everything per-round cleared.
    /// Scores survive; only a battle-mode restart resets them.
    pub fn stop(&mut self) {
        self.game_active = false;
        self.phase = Phase::Idle;
        self.round = None;
        self.started_at = None;
        self.ended = false;
        self.hint.reset();
        self.banner = ENDED_TEXT;
        info!("game stopped");
    }

    /// Current overlay values, replayed to a freshly connected subscriber.
    pub fn snapshot(&self) -> Vec<OverlayMessage> {
        let mut messages = vec![
            OverlayMessage::Word {
                value: self.display(),
            },
            OverlayMessage::Leaderboard {
                entries: self.leaderboard.top(LEADERBOARD_TOP),
            },
        ];
        if let Some(standings) = self.battle_standings() {
            messages.push(OverlayMessage::Battle { standings });
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        let mut session = GameSession::new(RoundTiming::default());
        session.set_active();
        session
    }

    #[test]
    fn test_reveal_interval_has_a_floor_for_short_words() {
        let mut session = session();
        // 5 letters: 3 hidden, 180s / 3 = 60s.
        let schedule = session.begin_round("horse");
        assert_eq!(schedule.reveal_interval, Duration::from_secs(60));

        // A word short enough to compute below the floor is clamped.
        let timing = RoundTiming {
            round_duration: Duration::from_secs(30),
            ..RoundTiming::default()
        };
        let mut session = GameSession::new(timing);
        session.set_active();
        let schedule = session.begin_round("horse");
        assert_eq!(schedule.reveal_interval, Duration::from_secs(20));
    }

    #[test]
    fn test_natural_full_reveal_ends_round_without_winner() {
        let mut session = session();
        session.begin_round("hangman");
        assert_eq!(session.display(), "H _ _ _ _ _ N");

        let mut outcome = session.reveal_tick();
        for _ in 0..10 {
            match outcome {
                TickOutcome::Revealed(_) => outcome = session.reveal_tick(),
                _ => break,
            }
        }

        let TickOutcome::Finished(end) = outcome else {
            panic!("expected round to finish, got {outcome:?}");
        };
        assert_eq!(end.word, "HANGMAN");
        assert_eq!(end.winner, None);
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(session.display(), "HANGMAN");

        // A stale tick after the finish changes nothing.
        assert_eq!(session.reveal_tick(), TickOutcome::Stale);
    }

    #[test]
    fn test_correct_guess_wins_and_updates_leaderboard() {
        let mut session = session();
        session.begin_round("HANGMAN");

        let outcome = session.submit_guess(Platform::Twitch, "alice", "hangman");
        let GuessOutcome::Accepted(accepted) = outcome else {
            panic!("expected accepted guess, got {outcome:?}");
        };
        assert_eq!(accepted.new_score, 1);
        assert_eq!(accepted.battle, None);
        assert_eq!(accepted.end.word, "HANGMAN");
        assert_eq!(
            accepted.end.winner,
            Some(Winner {
                platform: Platform::Twitch,
                user: "alice".to_string(),
            })
        );
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(session.leaderboard().score("alice"), 1);
    }

    #[test]
    fn test_guess_rejections() {
        let mut session = session();
        assert_eq!(
            session.submit_guess(Platform::Twitch, "alice", "hangman"),
            GuessOutcome::Rejected(RejectReason::NoActiveRound)
        );

        session.begin_round("HANGMAN");
        assert_eq!(
            session.submit_guess(Platform::Twitch, "alice", "  "),
            GuessOutcome::Rejected(RejectReason::MalformedCommand)
        );
        assert_eq!(
            session.submit_guess(Platform::Twitch, "alice", "hangmen"),
            GuessOutcome::Rejected(RejectReason::Incorrect)
        );

        // Wrong guesses leave the round running and score untouched.
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.leaderboard().score("alice"), 0);
    }

    #[test]
    fn test_only_first_correct_guess_is_accepted() {
        let mut session = session();
        session.begin_round("HANGMAN");

        let first = session.submit_guess(Platform::Kick, "alice", "hangman");
        assert!(matches!(first, GuessOutcome::Accepted(_)));

        let second = session.submit_guess(Platform::Twitch, "bob", "hangman");
        assert_eq!(second, GuessOutcome::Rejected(RejectReason::NoActiveRound));
        assert_eq!(session.leaderboard().score("bob"), 0);
    }

    #[test]
    fn test_ending_a_round_is_idempotent() {
        let mut session = session();
        session.begin_round("HANGMAN");

        // A winning guess and a timeout race: the guess lands first.
        let outcome = session.submit_guess(Platform::Twitch, "alice", "hangman");
        assert!(matches!(outcome, GuessOutcome::Accepted(_)));
        assert_eq!(session.time_out(), None);

        // And in the other order on the next round.
        session.begin_round("PUZZLE");
        assert!(session.time_out().is_some());
        assert_eq!(session.time_out(), None);
        assert_eq!(
            session.submit_guess(Platform::Twitch, "alice", "puzzle"),
            GuessOutcome::Rejected(RejectReason::NoActiveRound)
        );
    }

    #[test]
    fn test_battle_mode_credits_platform() {
        let mut session = session();
        session.start_battle();
        session.begin_round("HANGMAN");

        let outcome = session.submit_guess(Platform::Kick, "alice", "hangman");
        let GuessOutcome::Accepted(accepted) = outcome else {
            panic!("expected accepted guess");
        };
        let standings = accepted.battle.expect("battle mode on");
        assert_eq!(standings.kick, 1);
        assert_eq!(standings.twitch, 0);
    }

    #[test]
    fn test_battle_restart_resets_scores() {
        let mut session = session();
        session.start_battle();
        session.begin_round("HANGMAN");
        session.submit_guess(Platform::Twitch, "alice", "hangman");
        assert_eq!(session.leaderboard().score("alice"), 1);

        session.start_battle();
        assert_eq!(session.leaderboard().score("alice"), 0);
        assert_eq!(session.battle_standings().unwrap(), BattleStandings::default());
    }

    #[test]
    fn test_round_start_time_is_recorded() {
        let mut session = session();
        assert!(session.round_started_at().is_none());

        session.begin_round("HANGMAN");
        assert!(session.round_started_at().is_some());

        session.stop();
        assert!(session.round_started_at().is_none());
    }

    #[test]
    fn test_hint_gating() {
        let mut session = session();
        assert_eq!(session.request_hint(), HintQuery::NoActiveRound);

        session.begin_round("HANGMAN");
        assert_eq!(
            session.request_hint(),
            HintQuery::Lookup("hangman".to_string())
        );
        session.store_hint(None);
        assert_eq!(session.request_hint(), HintQuery::AlreadyUsed);

        // A new round re-arms the hint.
        session.begin_round("PUZZLE");
        assert_eq!(
            session.request_hint(),
            HintQuery::Lookup("puzzle".to_string())
        );
    }

    #[test]
    fn test_stop_clears_round_but_keeps_scores() {
        let mut session = session();
        session.begin_round("HANGMAN");
        session.submit_guess(Platform::Twitch, "alice", "hangman");

        session.stop();
        assert!(!session.game_active());
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.display(), ENDED_TEXT);
        assert_eq!(session.leaderboard().score("alice"), 1);

        // Stale timers after a stop are no-ops.
        assert_eq!(session.reveal_tick(), TickOutcome::Stale);
        assert_eq!(session.time_out(), None);
    }

    #[test]
    fn test_snapshot_replays_current_state() {
        let mut session = session();
        let snapshot = session.snapshot();
        assert_eq!(
            snapshot[0],
            OverlayMessage::Word {
                value: WAITING_TEXT.to_string()
            }
        );

        session.start_battle();
        session.begin_round("HANGMAN");
        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot[0],
            OverlayMessage::Word {
                value: "H _ _ _ _ _ N".to_string()
            }
        );
        assert!(matches!(snapshot[2], OverlayMessage::Battle { .. }));
    }
}
