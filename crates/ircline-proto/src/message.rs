//! Message classification.
//!
//! Maps one [`ProtocolLine`] to a [`Message`]. Only a handful of shapes are
//! recognized; everything else is carried through as [`Message::Raw`] so the
//! display layer can show it verbatim.
//!
//! # Grammar
//!
//! ```text
//! line    = ":" prefix SP command [SP rest]
//! prefix  = nick ["!" user] ["@" host]
//! ```
//!
//! The line is split on single spaces into at most three parts. `rest` is not
//! split further, so it keeps inner spaces and the ` :` trailing marker.
//!
//! Classification is pure. Color assignment for nicknames belongs to the
//! renderer.

use crate::line::ProtocolLine;

/// Leading marker of a prefixed (server-relayed) line.
const PREFIX_MARKER: char = ':';

/// Separator between a PRIVMSG target and its body.
const TRAILING_MARKER: &str = " :";

/// Reason shown when a QUIT carries none.
pub const DEFAULT_QUIT_REASON: &str = "Quit";

/// A classified protocol line.
///
/// # Invariants
///
/// Every variant except [`Message::Raw`] comes from a line that starts with
/// `:` and has at least a prefix and a command token. `Raw` holds the decoded
/// line exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Server reply with an all-digit command such as `001`.
    ServerNumeric(NumericReply),

    /// State change of a participant.
    UserAction(UserAction),

    /// `PRIVMSG` with a target and a body.
    Chat(ChatMessage),

    /// Anything else, unmodified.
    Raw(String),
}

/// Numeric reply.
///
/// The full line is kept because replies are displayed whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericReply {
    /// Full decoded line.
    pub line: String,
}

/// Kind of participant state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Nickname change.
    Nick,
    /// Disconnect from the server.
    Quit,
    /// Channel join.
    Join,
    /// Channel part.
    Part,
}

/// A participant state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAction {
    /// What happened.
    pub kind: ActionKind,
    /// Nickname of the participant.
    pub actor: String,
    /// New nickname for [`ActionKind::Nick`], reason for [`ActionKind::Quit`],
    /// `None` for joins and parts.
    pub detail: Option<String>,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Nickname of the author.
    pub sender: String,
    /// Channel or nickname the message was sent to.
    pub target: String,
    /// Message text.
    pub body: String,
}

impl Message {
    /// Classify a framed line. Invalid UTF-8 is decoded lossily first.
    pub fn classify(line: &ProtocolLine) -> Self {
        Self::parse(&line.to_text())
    }

    /// Classify decoded line text.
    pub fn parse(text: &str) -> Self {
        Self::parse_prefixed(text).unwrap_or_else(|| Self::Raw(text.to_owned()))
    }

    /// Parse a `:prefix COMMAND rest` line. `None` means raw.
    fn parse_prefixed(text: &str) -> Option<Self> {
        let body = text.strip_prefix(PREFIX_MARKER)?;

        let mut parts = body.splitn(3, ' ');
        let prefix = parts.next()?;
        let command = parts.next()?;
        let rest = parts.next().unwrap_or("");

        let nick = nickname(prefix);

        let message = match command {
            "PRIVMSG" => {
                let (target, body) = rest.split_once(TRAILING_MARKER)?;
                Self::Chat(ChatMessage {
                    sender: nick.to_owned(),
                    target: target.to_owned(),
                    body: body.to_owned(),
                })
            },
            "NICK" => {
                let (_, new_nick) = rest.split_once(':')?;
                Self::action(ActionKind::Nick, nick, Some(new_nick))
            },
            "QUIT" => {
                let reason = rest.split_once(':').map_or(DEFAULT_QUIT_REASON, |(_, r)| r);
                Self::action(ActionKind::Quit, nick, Some(reason))
            },
            "JOIN" => Self::action(ActionKind::Join, nick, None),
            "PART" => Self::action(ActionKind::Part, nick, None),
            code if is_numeric(code) => {
                Self::ServerNumeric(NumericReply { line: text.to_owned() })
            },
            _ => return None,
        };

        Some(message)
    }

    fn action(kind: ActionKind, actor: &str, detail: Option<&str>) -> Self {
        Self::UserAction(UserAction {
            kind,
            actor: actor.to_owned(),
            detail: detail.map(str::to_owned),
        })
    }
}

/// Nickname part of a `nick!user@host` prefix.
fn nickname(prefix: &str) -> &str {
    prefix.split_once('!').map_or(prefix, |(nick, _)| nick)
}

fn is_numeric(command: &str) -> bool {
    !command.is_empty() && command.bytes().all(|b| b.is_ascii_digit())
}
