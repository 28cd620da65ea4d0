//! Session identity and connection settings.

use std::time::Duration;

use crate::error::ConfigError;

/// Inactivity deadline used when none is configured.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(240);

/// Pause between sending `QUIT` and closing the socket on teardown.
pub const DEFAULT_QUIT_GRACE: Duration = Duration::from_secs(1);

/// Everything a [`Session`](crate::Session) needs to connect and register.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ircsess::SessionConfig;
///
/// let config = SessionConfig::new("gobotgo", "hi", "hey", "irc.libera.chat:6667")
///     .with_alternate_nick("gobotgo_")
///     .with_inactivity_timeout(Duration::from_secs(300));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Nick sent with `NICK` on registration.
    pub nick: String,
    /// Fallback nick. Accepted and stored but never sent.
    pub alternate_nick: String,
    /// User name sent with `USER`.
    pub user_name: String,
    /// Real name sent as the `USER` trailing segment.
    pub real_name: String,
    /// Server to dial, as `host:port`.
    pub server_address: String,
    /// A connection with no received line for this long is dropped.
    pub inactivity_timeout: Duration,
    /// How long `destroy` waits after `QUIT` before closing. Also bounds the
    /// `QUIT` write itself.
    pub quit_grace: Duration,
    /// Enable TCP keepalive probes on the socket.
    pub tcp_keepalive: bool,
}

impl SessionConfig {
    /// Create a config with default timeouts and no alternate nick.
    pub fn new(
        nick: impl Into<String>,
        user_name: impl Into<String>,
        real_name: impl Into<String>,
        server_address: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            alternate_nick: String::new(),
            user_name: user_name.into(),
            real_name: real_name.into(),
            server_address: server_address.into(),
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            quit_grace: DEFAULT_QUIT_GRACE,
            tcp_keepalive: true,
        }
    }

    /// Set the alternate nick.
    #[must_use]
    pub fn with_alternate_nick(mut self, nick: impl Into<String>) -> Self {
        self.alternate_nick = nick.into();
        self
    }

    /// Set the inactivity timeout.
    #[must_use]
    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    /// Set the grace period between `QUIT` and close.
    #[must_use]
    pub fn with_quit_grace(mut self, grace: Duration) -> Self {
        self.quit_grace = grace;
        self
    }

    /// Enable or disable TCP keepalive.
    #[must_use]
    pub fn with_tcp_keepalive(mut self, enabled: bool) -> Self {
        self.tcp_keepalive = enabled;
        self
    }

    /// Check the fields that would otherwise produce a malformed handshake.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("nick", &self.nick), ("user name", &self.user_name)] {
            if value.is_empty() {
                return Err(ConfigError::EmptyField(name));
            }
            if value.contains(char::is_whitespace) {
                return Err(ConfigError::Whitespace(name));
            }
        }

        let valid_address = self
            .server_address
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        if !valid_address {
            return Err(ConfigError::InvalidAddress(self.server_address.clone()));
        }

        if self.inactivity_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SessionConfig {
        SessionConfig::new("gobotgo", "hi", "hey", "irc.example.com:6667")
    }

    #[test]
    fn test_defaults() {
        let config = base();
        assert_eq!(config.inactivity_timeout, Duration::from_secs(240));
        assert_eq!(config.quit_grace, Duration::from_secs(1));
        assert!(config.tcp_keepalive);
        assert!(config.alternate_nick.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = base()
            .with_alternate_nick("gobotgo_")
            .with_inactivity_timeout(Duration::from_millis(500))
            .with_quit_grace(Duration::ZERO)
            .with_tcp_keepalive(false);
        assert_eq!(config.alternate_nick, "gobotgo_");
        assert_eq!(config.inactivity_timeout, Duration::from_millis(500));
        assert_eq!(config.quit_grace, Duration::ZERO);
        assert!(!config.tcp_keepalive);
    }

    #[test]
    fn test_rejects_bad_identity() {
        let mut config = base();
        config.nick.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyField("nick")));

        let mut config = base();
        config.user_name = "two words".to_string();
        assert_eq!(config.validate(), Err(ConfigError::Whitespace("user name")));
    }

    #[test]
    fn test_rejects_bad_address() {
        for address in ["irc.example.com", ":6667", "irc.example.com:", "host:99999"] {
            let mut config = base();
            config.server_address = address.to_string();
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidAddress(address.to_string())),
                "{address}"
            );
        }

        let mut config = base();
        config.server_address = "[::1]:6667".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = base().with_inactivity_timeout(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
