//! Command classification for parsed lines.

use std::fmt;
use std::str::FromStr;

/// The kind of a parsed [`Message`](super::Message).
///
/// Only a fixed set of commands is recognized. Numeric replies and any
/// other command token classify as [`MessageKind::Raw`], with the token kept
/// in [`Message::raw_token`](super::Message::raw_token).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// `PRIVMSG target :text`
    Privmsg,
    /// `JOIN channel`
    Join,
    /// `PART channel :reason`
    Part,
    /// `NOTICE target :text`
    Notice,
    /// `PING :token`
    Ping,
    /// `QUIT :reason`
    Quit,
    /// `KICK channel nick :reason`
    Kick,
    /// Numeric reply or unrecognized command.
    #[default]
    Raw,
    /// `ERROR :text`
    Error,
    /// `MODE target :modes`
    Mode,
}

impl MessageKind {
    /// Classify a command token. Matching is exact; unknown tokens are `Raw`.
    pub fn from_command(token: &str) -> Self {
        match token {
            "PRIVMSG" => MessageKind::Privmsg,
            "JOIN" => MessageKind::Join,
            "PART" => MessageKind::Part,
            "NOTICE" => MessageKind::Notice,
            "PING" => MessageKind::Ping,
            "QUIT" => MessageKind::Quit,
            "KICK" => MessageKind::Kick,
            "ERROR" => MessageKind::Error,
            "MODE" => MessageKind::Mode,
            _ => MessageKind::Raw,
        }
    }

    /// The wire command for this kind. `Raw` has none and renders as `RAW`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Privmsg => "PRIVMSG",
            MessageKind::Join => "JOIN",
            MessageKind::Part => "PART",
            MessageKind::Notice => "NOTICE",
            MessageKind::Ping => "PING",
            MessageKind::Quit => "QUIT",
            MessageKind::Kick => "KICK",
            MessageKind::Raw => "RAW",
            MessageKind::Error => "ERROR",
            MessageKind::Mode => "MODE",
        }
    }

    /// Whether the trailing segment is copied into `data` for this kind.
    pub(crate) fn carries_data(&self) -> bool {
        !matches!(self, MessageKind::Join | MessageKind::Raw)
    }

    /// Whether the first positional parameter is copied into `to`.
    pub(crate) fn carries_target(&self) -> bool {
        matches!(
            self,
            MessageKind::Privmsg
                | MessageKind::Join
                | MessageKind::Part
                | MessageKind::Notice
                | MessageKind::Kick
                | MessageKind::Mode
        )
    }
}

impl FromStr for MessageKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MessageKind::from_command(s))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_commands() {
        assert_eq!(MessageKind::from_command("PRIVMSG"), MessageKind::Privmsg);
        assert_eq!(MessageKind::from_command("KICK"), MessageKind::Kick);
        assert_eq!("MODE".parse::<MessageKind>().unwrap(), MessageKind::Mode);
    }

    #[test]
    fn test_unknown_and_numeric_are_raw() {
        assert_eq!(MessageKind::from_command("001"), MessageKind::Raw);
        assert_eq!(MessageKind::from_command("TOPIC"), MessageKind::Raw);
        assert_eq!(MessageKind::from_command(""), MessageKind::Raw);
        // lookup is case-sensitive
        assert_eq!(MessageKind::from_command("privmsg"), MessageKind::Raw);
    }

    #[test]
    fn test_display_matches_command() {
        for kind in [
            MessageKind::Privmsg,
            MessageKind::Join,
            MessageKind::Part,
            MessageKind::Notice,
            MessageKind::Ping,
            MessageKind::Quit,
            MessageKind::Kick,
            MessageKind::Error,
            MessageKind::Mode,
        ] {
            assert_eq!(MessageKind::from_command(&kind.to_string()), kind);
        }
        assert_eq!(MessageKind::Raw.to_string(), "RAW");
    }

    #[test]
    fn test_field_shapes() {
        assert!(MessageKind::Join.carries_target());
        assert!(!MessageKind::Join.carries_data());
        assert!(MessageKind::Ping.carries_data());
        assert!(!MessageKind::Ping.carries_target());
        assert!(!MessageKind::Raw.carries_target());
        assert!(!MessageKind::Raw.carries_data());
    }
}
