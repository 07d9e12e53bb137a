use game_core::{
    Command, GameSession, GuessOutcome, Phase, RoundTiming, TickOutcome, parse,
};
use game_types::Platform;

/// Full life of a round driven through the public API: command parsing,
/// reveal ticks, a winning guess, and the stale timers left behind.
#[test]
fn test_round_played_to_a_win() {
    let mut session = GameSession::new(RoundTiming::default());

    // Owner starts the game.
    assert_eq!(parse("!word", true), Some(Command::StartGame));
    session.set_active();
    let schedule = session.begin_round("hangman");
    assert!(schedule.reveal_interval >= session.timing().min_reveal_interval);

    // A couple of reveals happen.
    assert!(matches!(session.reveal_tick(), TickOutcome::Revealed(_)));
    assert!(matches!(session.reveal_tick(), TickOutcome::Revealed(_)));

    // A viewer guesses it from chat.
    let Some(Command::Guess(word)) = parse("!guess HANGMAN", false) else {
        panic!("guess should parse");
    };
    let outcome = session.submit_guess(Platform::Twitch, "viewer", &word);
    assert!(matches!(outcome, GuessOutcome::Accepted(_)));
    assert_eq!(session.phase(), Phase::Ended);

    // The round's timers fire late; none of them do anything.
    assert_eq!(session.reveal_tick(), TickOutcome::Stale);
    assert_eq!(session.time_out(), None);
}

/// An owner stop mid-round cancels the game; a simulated late timer fire
/// produces no further state change.
#[test]
fn test_stop_mid_round_defuses_timers() {
    let mut session = GameSession::new(RoundTiming::default());
    session.set_active();
    session.begin_round("puzzle");

    session.stop();

    assert_eq!(session.reveal_tick(), TickOutcome::Stale);
    assert_eq!(session.time_out(), None);
    assert_eq!(session.display(), game_core::ENDED_TEXT);
}
