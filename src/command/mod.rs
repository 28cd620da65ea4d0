//! Builders for outbound protocol lines.
//!
//! Each function returns a complete line without its terminator, ready for
//! [`Session::send`](crate::Session::send). The final free-text argument is
//! always sent as a colon-prefixed trailing segment.

mod serialize;

use self::serialize::{cmd_freeform, cmd_middle};

/// `NICK <nick>`
pub fn nick(nick: &str) -> String {
    cmd_middle("NICK", &[nick])
}

/// `USER <user_name> 0 * :<real_name>`
pub fn user(user_name: &str, real_name: &str) -> String {
    cmd_freeform("USER", &[user_name, "0", "*", real_name])
}

/// `PONG <token>`, echoing the token of a received `PING`.
///
/// A token that cannot travel as a middle parameter goes out as the trailing
/// segment. An empty token yields a bare `PONG`.
pub fn pong(token: &str) -> String {
    if token.is_empty() {
        cmd_middle("PONG", &[])
    } else if token.starts_with(':') || token.contains(char::is_whitespace) {
        cmd_freeform("PONG", &[token])
    } else {
        cmd_middle("PONG", &[token])
    }
}

/// `QUIT :<message>`
pub fn quit(message: &str) -> String {
    cmd_freeform("QUIT", &[message])
}

/// `JOIN <channel>`
pub fn join(channel: &str) -> String {
    cmd_middle("JOIN", &[channel])
}

/// `PART <channel> :<reason>`
pub fn part(channel: &str, reason: &str) -> String {
    cmd_freeform("PART", &[channel, reason])
}

/// `PRIVMSG <target> :<text>`
pub fn privmsg(target: &str, text: &str) -> String {
    cmd_freeform("PRIVMSG", &[target, text])
}

/// `NOTICE <target> :<text>`
pub fn notice(target: &str, text: &str) -> String {
    cmd_freeform("NOTICE", &[target, text])
}

/// `KICK <channel> <nick> :<reason>`
pub fn kick(channel: &str, nick: &str, reason: &str) -> String {
    cmd_freeform("KICK", &[channel, nick, reason])
}

/// `MODE <target> <modes> [args...]`
pub fn mode(target: &str, modes: &str, args: &[&str]) -> String {
    let mut all = Vec::with_capacity(args.len() + 2);
    all.push(target);
    all.push(modes);
    all.extend_from_slice(args);
    cmd_middle("MODE", &all)
}
