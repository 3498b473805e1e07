//! Input classification for the REPL
//!
//! `exit` and `quit` (any case) are the only control commands; every other
//! non-blank line is a message for the model.

/// What a line of input means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Blank,
    Message(String),
}

/// Classify a raw input line
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Command::Blank;
    }

    if is_exit(trimmed) {
        return Command::Exit;
    }

    Command::Message(input.to_string())
}

/// Check whether the input ends the session
pub fn is_exit(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands_any_case() {
        for input in ["exit", "EXIT", "Exit", "quit", "QUIT", "qUiT", "  exit  "] {
            assert_eq!(parse(input), Command::Exit, "input: {:?}", input);
        }
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(parse(""), Command::Blank);
        assert_eq!(parse("   \t"), Command::Blank);
    }

    #[test]
    fn test_message_kept_verbatim() {
        assert_eq!(parse("hi"), Command::Message("hi".to_string()));
        assert_eq!(parse(" hi there "), Command::Message(" hi there ".to_string()));
    }

    #[test]
    fn test_exit_inside_sentence_is_message() {
        assert_eq!(
            parse("how do I exit vim"),
            Command::Message("how do I exit vim".to_string())
        );
        assert!(!is_exit("exit now"));
        assert!(!is_exit("/exit"));
    }
}
