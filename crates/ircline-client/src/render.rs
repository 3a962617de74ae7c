//! Terminal rendering of classified messages.
//!
//! Chat lines get a per-nickname color; user actions and server replies use a
//! fixed bold white "server" style; unrecognized lines pass through untouched.
//!
//! # Nickname colors
//!
//! A nickname's color is `MD5(nick) mod PALETTE.len()`, with the digest read
//! as a big-endian 128-bit integer. The hash depends only on the nickname
//! bytes, so every client assigns the same color to the same nickname, across
//! runs and across machines.

use std::collections::HashMap;

use crossterm::style::{Color, Stylize};
use ircline_proto::{ActionKind, Message, UserAction, message::DEFAULT_QUIT_REASON};
use md5::{Digest, Md5};

/// Nickname colors. Dark tones are left out for readability.
pub const PALETTE: [Color; 9] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::DarkYellow,
    Color::DarkMagenta,
    Color::DarkCyan,
];

/// Color for server replies and user-action notices.
const SERVER_COLOR: Color = Color::White;

/// Raw lines with these prefixes came from the server and get server style.
const SERVER_LINE_PREFIXES: [&str; 2] = [":server", "Available commands"];

/// Palette index for `nick`.
pub fn palette_index(nick: &str) -> usize {
    let digest: [u8; 16] = Md5::digest(nick.as_bytes()).into();
    (u128::from_be_bytes(digest) % PALETTE.len() as u128) as usize
}

/// Memoized nickname to color assignment.
///
/// Entries are never evicted or reassigned for the lifetime of the map.
#[derive(Debug, Default, Clone)]
pub struct NickColors {
    assigned: HashMap<String, Color>,
}

impl NickColors {
    /// Create an empty assignment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for `nick`, assigning it on first use.
    pub fn color_for(&mut self, nick: &str) -> Color {
        if let Some(color) = self.assigned.get(nick) {
            return *color;
        }
        let color = PALETTE[palette_index(nick)];
        self.assigned.insert(nick.to_owned(), color);
        color
    }

    /// Number of nicknames seen so far.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Whether no nickname has been seen yet.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

/// Turns [`Message`]s into display strings.
///
/// Owns the nickname colors for one session.
#[derive(Debug, Clone)]
pub struct Renderer {
    colors: NickColors,
    styled: bool,
}

impl Renderer {
    /// Create a renderer. With `styled == false` no escape sequences are
    /// emitted.
    pub fn new(styled: bool) -> Self {
        Self { colors: NickColors::new(), styled }
    }

    /// Renderer without colors.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Nickname colors assigned so far.
    #[cfg(test)]
    pub fn nick_colors(&self) -> &NickColors {
        &self.colors
    }

    /// Render one message as a single display line.
    pub fn render(&mut self, message: &Message) -> String {
        match message {
            Message::Chat(chat) => {
                let tag = format!("<{}>", chat.sender);
                let color = self.colors.color_for(&chat.sender);
                let tag = if self.styled { tag.with(color).to_string() } else { tag };
                format!("{tag} {}", chat.body)
            },
            Message::UserAction(action) => self.server_style(&describe(action)),
            Message::ServerNumeric(reply) => self.server_style(&reply.line),
            Message::Raw(line) if is_server_line(line) => self.server_style(line),
            Message::Raw(line) => line.clone(),
        }
    }

    fn server_style(&self, text: &str) -> String {
        if self.styled { text.with(SERVER_COLOR).bold().to_string() } else { text.to_owned() }
    }
}

/// Narrative sentence for a user action.
fn describe(action: &UserAction) -> String {
    let actor = &action.actor;
    match action.kind {
        ActionKind::Nick => {
            format!("* {actor} is now known as {}", action.detail.as_deref().unwrap_or_default())
        },
        ActionKind::Quit => format!(
            "* {actor} has quit ({})",
            action.detail.as_deref().unwrap_or(DEFAULT_QUIT_REASON)
        ),
        ActionKind::Join => format!("* {actor} has joined"),
        ActionKind::Part => format!("* {actor} has left"),
    }
}

fn is_server_line(line: &str) -> bool {
    SERVER_LINE_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_plain(line: &str) -> String {
        Renderer::plain().render(&Message::parse(line))
    }

    #[test]
    fn chat_line() {
        insta::assert_snapshot!(
            render_plain(":alice!u@h PRIVMSG #chan :hello there"),
            @"<alice> hello there"
        );
    }

    #[test]
    fn user_actions() {
        insta::assert_snapshot!(render_plain(":alice NICK :bob"), @"* alice is now known as bob");
        insta::assert_snapshot!(
            render_plain(":alice QUIT :gone fishing"),
            @"* alice has quit (gone fishing)"
        );
        insta::assert_snapshot!(render_plain(":alice QUIT"), @"* alice has quit (Quit)");
        insta::assert_snapshot!(render_plain(":alice JOIN #chan"), @"* alice has joined");
        insta::assert_snapshot!(render_plain(":alice PART #chan"), @"* alice has left");
    }

    #[test]
    fn numeric_reply_is_shown_whole() {
        insta::assert_snapshot!(
            render_plain(":server 001 nick :Welcome"),
            @":server 001 nick :Welcome"
        );
    }

    #[test]
    fn raw_lines_are_unchanged() {
        for line in ["PING :tmi", "just some text", ":x KICK #c y :bye", "", "caf\u{fffd}"] {
            assert_eq!(render_plain(line), line);
            assert_eq!(Renderer::new(true).render(&Message::parse(line)), line);
        }
    }

    #[test]
    fn server_lines_are_styled() {
        let mut renderer = Renderer::new(true);
        for line in [":server NOTICE * :hi", "Available commands: /nick /quit"] {
            let rendered = renderer.render(&Message::parse(line));
            assert!(rendered.contains(line));
            assert_ne!(rendered, line);
        }
    }

    #[test]
    fn styled_chat_keeps_text() {
        let mut renderer = Renderer::new(true);
        let rendered = renderer.render(&Message::parse(":bob PRIVMSG #c :yo"));
        assert!(rendered.contains("<bob>"));
        assert!(rendered.ends_with(" yo"));
    }

    #[test]
    fn palette_index_is_pinned() {
        // Shared with other clients using the same hash; must not drift.
        assert_eq!(palette_index("alice"), 1);
        assert_eq!(palette_index("bob"), 8);
        assert_eq!(palette_index("carol"), 4);
        assert_eq!(palette_index("Alice"), 0);
    }

    #[test]
    fn colors_are_memoized_and_stable() {
        let mut colors = NickColors::new();
        assert!(colors.is_empty());
        let first = colors.color_for("alice");
        let second = colors.color_for("alice");
        assert_eq!(first, second);
        assert_eq!(first, PALETTE[palette_index("alice")]);
        assert_eq!(colors.len(), 1);

        let mut other_session = NickColors::new();
        assert_eq!(other_session.color_for("alice"), first);
    }

    #[test]
    fn nicknames_are_case_sensitive() {
        let mut colors = NickColors::new();
        colors.color_for("alice");
        colors.color_for("Alice");
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn chat_assigns_sender_color() {
        let mut renderer = Renderer::plain();
        renderer.render(&Message::parse(":dave PRIVMSG #c :hi"));
        renderer.render(&Message::parse(":dave PRIVMSG #c :again"));
        renderer.render(&Message::parse(":erin JOIN #c"));
        assert_eq!(renderer.nick_colors().len(), 1);
    }
}
