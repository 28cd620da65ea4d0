use std::fmt;

use super::kind::MessageKind;
use super::nom_parser::SplitLine;

/// One parsed protocol line.
///
/// Only the fields that the [`MessageKind`] grammar defines are populated;
/// everything else stays empty. `full_text` is always set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Classified command.
    pub kind: MessageKind,
    /// Prefix without the leading `:`. Empty when the line had none.
    pub from: String,
    /// Channel or nick the line is addressed to.
    pub to: String,
    /// Trailing free-text payload.
    pub data: String,
    /// Nick being kicked (`Kick` only).
    pub kicked_nick: String,
    /// Literal command token (`Raw` only).
    pub raw_token: String,
    /// The received line with its terminator stripped.
    pub full_text: String,
}

/// Parse one received line into a [`Message`].
///
/// Never fails. A missing parameter or trailing segment leaves the
/// corresponding field empty, and a line without a command token becomes
/// a `Raw` message with an empty `raw_token`.
pub fn parse(line: &str) -> Message {
    let full_text = strip_terminator(line);
    let split = SplitLine::split(full_text);

    let command = split.command.unwrap_or_default();
    let kind = MessageKind::from_command(command);
    let param = |i: usize| split.params.get(i).copied().unwrap_or_default().to_owned();

    let mut message = Message {
        kind,
        from: split.prefix.unwrap_or_default().to_owned(),
        full_text: full_text.to_owned(),
        ..Default::default()
    };

    if kind.carries_target() {
        message.to = param(0);
    }
    if kind.carries_data() {
        message.data = split.trailing.unwrap_or_default().to_owned();
    }
    match kind {
        MessageKind::Kick => message.kicked_nick = param(1),
        MessageKind::Raw => message.raw_token = command.to_owned(),
        _ => {}
    }

    message
}

/// Remove a single trailing line terminator (`\r\n` or bare `\n`).
fn strip_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

fn is_channel_name(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

impl Message {
    /// Parse one received line. See [`parse`].
    pub fn parse(line: &str) -> Self {
        parse(line)
    }

    /// The nick portion of `from`, or `None` when the line had no prefix.
    ///
    /// For a server prefix this is the whole server name.
    pub fn sender_nick(&self) -> Option<&str> {
        if self.from.is_empty() {
            return None;
        }
        let end = self.from.find(['!', '@']).unwrap_or(self.from.len());
        Some(&self.from[..end])
    }

    /// Where a reply to this message should go.
    ///
    /// Messages and notices sent to a channel are answered in the channel;
    /// those sent to `own_nick` are answered to the sender. Other kinds have
    /// no reply target.
    pub fn reply_target(&self, own_nick: &str) -> Option<&str> {
        if !matches!(self.kind, MessageKind::Privmsg | MessageKind::Notice) {
            return None;
        }
        if is_channel_name(&self.to) {
            Some(&self.to)
        } else if !self.to.is_empty() && self.to.eq_ignore_ascii_case(own_nick) {
            self.sender_nick()
        } else {
            None
        }
    }
}

impl From<&str> for Message {
    fn from(line: &str) -> Self {
        parse(line)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_privmsg() {
        let msg = parse(":nick!user@host PRIVMSG #chan :hello there\r\n");
        assert_eq!(msg.kind, MessageKind::Privmsg);
        assert_eq!(msg.from, "nick!user@host");
        assert_eq!(msg.to, "#chan");
        assert_eq!(msg.data, "hello there");
        assert_eq!(msg.kicked_nick, "");
        assert_eq!(msg.raw_token, "");
        assert_eq!(msg.full_text, ":nick!user@host PRIVMSG #chan :hello there");
    }

    #[test]
    fn test_parse_ping_without_prefix() {
        let msg = parse("PING :abc123\r\n");
        assert_eq!(msg.kind, MessageKind::Ping);
        assert_eq!(msg.data, "abc123");
        assert_eq!(msg.from, "");
        assert_eq!(msg.to, "");
    }

    #[test]
    fn test_parse_join_ignores_trailing() {
        let msg = parse(":nick!user@host JOIN #chan");
        assert_eq!(msg.kind, MessageKind::Join);
        assert_eq!(msg.to, "#chan");
        assert_eq!(msg.data, "");

        // Some servers send the channel as trailing; JOIN only reads the token.
        let msg = parse(":nick!user@host JOIN :#chan");
        assert_eq!(msg.to, "");
        assert_eq!(msg.data, "");
    }

    #[test]
    fn test_parse_kick() {
        let msg = parse(":op!user@host KICK #chan target :reason text");
        assert_eq!(msg.kind, MessageKind::Kick);
        assert_eq!(msg.to, "#chan");
        assert_eq!(msg.kicked_nick, "target");
        assert_eq!(msg.data, "reason text");
    }

    #[test]
    fn test_parse_numeric_is_raw() {
        let msg = parse(":irc.server.example 001 mynick :Welcome");
        assert_eq!(msg.kind, MessageKind::Raw);
        assert_eq!(msg.raw_token, "001");
        assert_eq!(msg.from, "irc.server.example");
        assert_eq!(msg.to, "");
        assert_eq!(msg.data, "");
    }

    #[test]
    fn test_missing_trailing_yields_empty_data() {
        let msg = parse(":nick!user@host PRIVMSG #chan");
        assert_eq!(msg.kind, MessageKind::Privmsg);
        assert_eq!(msg.to, "#chan");
        assert_eq!(msg.data, "");

        let msg = parse("KICK #chan");
        assert_eq!(msg.to, "#chan");
        assert_eq!(msg.kicked_nick, "");
        assert_eq!(msg.data, "");

        let msg = parse("PING");
        assert_eq!(msg.kind, MessageKind::Ping);
        assert_eq!(msg.data, "");
    }

    #[test]
    fn test_degenerate_lines_are_raw() {
        let msg = parse("\r\n");
        assert_eq!(msg.kind, MessageKind::Raw);
        assert_eq!(msg.raw_token, "");
        assert_eq!(msg.full_text, "");

        let msg = parse(":lonely.prefix\r\n");
        assert_eq!(msg.kind, MessageKind::Raw);
        assert_eq!(msg.from, "lonely.prefix");
        assert_eq!(msg.raw_token, "");
    }

    #[test]
    fn test_strip_only_one_terminator() {
        assert_eq!(parse("PING :x\n").full_text, "PING :x");
        assert_eq!(parse("PING :x\r\n\r\n").full_text, "PING :x\r\n");
        assert_eq!(parse("PING :x  ").full_text, "PING :x  ");
    }

    #[test]
    fn test_sender_nick() {
        assert_eq!(parse(":nick!user@host QUIT :bye").sender_nick(), Some("nick"));
        assert_eq!(parse(":nick@host QUIT :bye").sender_nick(), Some("nick"));
        assert_eq!(parse(":irc.example.com NOTICE * :hi").sender_nick(), Some("irc.example.com"));
        assert_eq!(parse("PING :x").sender_nick(), None);
    }

    #[test]
    fn test_reply_target() {
        let msg = parse(":alice!a@host PRIVMSG #rust :hi");
        assert_eq!(msg.reply_target("bot"), Some("#rust"));

        let msg = parse(":alice!a@host PRIVMSG Bot :hi");
        assert_eq!(msg.reply_target("bot"), Some("alice"));

        let msg = parse(":alice!a@host PRIVMSG carol :hi");
        assert_eq!(msg.reply_target("bot"), None);

        let msg = parse(":alice!a@host JOIN #rust");
        assert_eq!(msg.reply_target("bot"), None);
    }

    #[test]
    fn test_display_is_full_text() {
        let msg: Message = ":srv 372 me :- motd line\r\n".into();
        assert_eq!(msg.to_string(), ":srv 372 me :- motd line");
    }
}
