//! Keyboard input handling.
//!
//! Input is forwarded to the server as typed. The client interprets exactly one
//! command itself: `/quit` is still sent to the server, and then ends the
//! session locally. Other slash commands are the server's business.

use ircline_proto::{OutboundLine, ProtocolError};

/// Local quit command.
pub const QUIT_COMMAND: &str = "/quit";

/// Help banner shown before reading input.
pub const INPUT_BANNER: &str =
    "Type messages and press Enter. Commands: /nick <name>, /users, /help, /quit";

/// What to do with one line of keyboard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Nothing to send.
    Skip,
    /// Forward the line to the server.
    Send(OutboundLine),
    /// Forward the line, then stop the session.
    Quit(OutboundLine),
}

/// Decide what to do with a line read from the keyboard.
///
/// # Errors
///
/// - `ProtocolError::EmbeddedDelimiter` if the line contains a CR LF pair
///   before its end.
pub fn parse(line: &str) -> Result<InputAction, ProtocolError> {
    let outbound = OutboundLine::new(line)?;

    if outbound.is_empty() {
        return Ok(InputAction::Skip);
    }
    if outbound.as_str() == QUIT_COMMAND {
        return Ok(InputAction::Quit(outbound));
    }
    Ok(InputAction::Send(outbound))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(text: &str) -> InputAction {
        InputAction::Send(OutboundLine::new(text).unwrap())
    }

    #[test]
    fn plain_text_is_sent() {
        assert_eq!(parse("hello world\n").unwrap(), send("hello world"));
    }

    #[test]
    fn slash_commands_pass_through() {
        assert_eq!(parse("/nick bob").unwrap(), send("/nick bob"));
        assert_eq!(parse("/users").unwrap(), send("/users"));
        assert_eq!(parse("/quitter").unwrap(), send("/quitter"));
    }

    #[test]
    fn quit_is_forwarded_and_stops() {
        let expected = InputAction::Quit(OutboundLine::new("/quit").unwrap());
        assert_eq!(parse("/quit").unwrap(), expected);
        assert_eq!(parse("/quit\r\n").unwrap(), expected);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse("").unwrap(), InputAction::Skip);
        assert_eq!(parse("\r").unwrap(), InputAction::Skip);
    }

    #[test]
    fn whitespace_is_not_blank() {
        assert_eq!(parse(" ").unwrap(), send(" "));
    }

    #[test]
    fn lone_cr_is_sent_as_typed() {
        assert_eq!(parse("PRIVMSG #c :a\rb").unwrap(), send("PRIVMSG #c :a\rb"));
    }

    #[test]
    fn embedded_delimiter_is_rejected() {
        assert!(parse("a\r\nb").is_err());
    }
}
