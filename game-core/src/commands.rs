/// A chat command, already past identity gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!word` (owner): start the game and the first round.
    StartGame,
    /// `!endword` (owner): stop the game, cancel everything.
    StopGame,
    /// `!kvt` (owner): enable battle mode and start a round.
    StartBattle,
    /// `!endkvt` (owner): disable battle mode.
    StopBattle,
    /// `!kvtscore`: report the platform standings.
    BattleScore,
    /// `!hint`: fetch the round's one hint.
    Hint,
    /// `!myscore`: report the caller's score.
    MyScore,
    /// `!gamelb`: report the top of the leaderboard.
    Leaderboard,
    /// `!guess <word>`: submit a guess.
    Guess(String),
}

/// Map chat text to a command. Owner-only commands simply fail to parse
/// for everyone else, and anything unrecognized (including `!guess` with
/// no argument) is `None` so it can be silently ignored.
pub fn parse(text: &str, is_owner: bool) -> Option<Command> {
    let text = text.trim();

    match text {
        "!word" if is_owner => return Some(Command::StartGame),
        "!endword" if is_owner => return Some(Command::StopGame),
        "!kvt" if is_owner => return Some(Command::StartBattle),
        "!endkvt" if is_owner => return Some(Command::StopBattle),
        "!kvtscore" => return Some(Command::BattleScore),
        "!hint" => return Some(Command::Hint),
        "!myscore" => return Some(Command::MyScore),
        "!gamelb" => return Some(Command::Leaderboard),
        _ => {}
    }

    let rest = text.strip_prefix("!guess")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let word = rest.split_whitespace().next()?;
    Some(Command::Guess(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_commands_require_owner() {
        assert_eq!(parse("!word", true), Some(Command::StartGame));
        assert_eq!(parse("!word", false), None);
        assert_eq!(parse("!endword", true), Some(Command::StopGame));
        assert_eq!(parse("!endword", false), None);
        assert_eq!(parse("!kvt", true), Some(Command::StartBattle));
        assert_eq!(parse("!kvt", false), None);
        assert_eq!(parse("!endkvt", false), None);
    }

    #[test]
    fn test_open_commands() {
        assert_eq!(parse("!kvtscore", false), Some(Command::BattleScore));
        assert_eq!(parse("!hint", false), Some(Command::Hint));
        assert_eq!(parse("!myscore", false), Some(Command::MyScore));
        assert_eq!(parse("!gamelb", false), Some(Command::Leaderboard));
    }

    #[test]
    fn test_guess_parsing() {
        assert_eq!(
            parse("!guess hangman", false),
            Some(Command::Guess("hangman".to_string()))
        );
        // Extra words after the guess are ignored.
        assert_eq!(
            parse("!guess hangman please", false),
            Some(Command::Guess("hangman".to_string()))
        );
        // A missing argument is not a command at all.
        assert_eq!(parse("!guess", false), None);
        assert_eq!(parse("!guess   ", false), None);
        // No prefix-gobbling of longer commands.
        assert_eq!(parse("!guessing hard", false), None);
    }

    #[test]
    fn test_unrelated_chatter_is_ignored() {
        assert_eq!(parse("hello everyone", false), None);
        assert_eq!(parse("!unknown", true), None);
        assert_eq!(parse("", false), None);
    }
}
