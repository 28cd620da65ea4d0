//! Error types for the IRC session library.
//!
//! Parsing never fails (see [`crate::message::parse`]), so everything here
//! concerns configuration and the socket.

use std::time::Duration;

use thiserror::Error;

/// Convenience type alias for Results using [`SessionError`].
pub type Result<T, E = SessionError> = std::result::Result<T, E>;

/// Errors surfaced to callers of [`Session`](crate::Session) operations.
///
/// Only connection setup can fail. Failures on an established connection
/// end it with [`Event::Disconnect`](crate::Event::Disconnect) instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The TCP connection to the server could not be established.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        /// The `host:port` that was dialed.
        address: String,
        /// The underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// The session configuration was rejected before dialing.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors found while validating a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required identity field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Whitespace inside a field that travels as a single protocol token.
    #[error("{0} must not contain whitespace")]
    Whitespace(&'static str),

    /// Server address was not of the form `host:port`.
    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    /// The inactivity timeout must be non-zero.
    #[error("inactivity timeout must be greater than zero")]
    ZeroTimeout,
}

/// Errors that end a read on the connection.
///
/// Every variant is fatal to the connection instance it occurred on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportReadError {
    /// An I/O error occurred.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The server closed the connection.
    #[error("connection closed by peer")]
    Closed,

    /// No line arrived within the inactivity deadline.
    #[error("no activity for {0:?}")]
    Timeout(Duration),

    /// A line exceeded the maximum allowed length.
    #[error("line too long: more than {0} bytes")]
    LineTooLong(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransportReadError::LineTooLong(8191);
        assert_eq!(format!("{}", err), "line too long: more than 8191 bytes");

        let err = ConfigError::EmptyField("nick");
        assert_eq!(format!("{}", err), "nick must not be empty");

        let err = TransportReadError::Timeout(Duration::from_secs(240));
        assert_eq!(format!("{}", err), "no activity for 240s");
    }

    #[test]
    fn test_connect_error_source_chaining() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = SessionError::Connect {
            address: "127.0.0.1:6667".to_string(),
            source: io_err,
        };

        assert_eq!(
            err.to_string(),
            "failed to connect to 127.0.0.1:6667: connection refused"
        );
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), "connection refused");
    }

    #[test]
    fn test_error_conversion() {
        let err: SessionError = ConfigError::ZeroTimeout.into();
        match err {
            SessionError::Config(ConfigError::ZeroTimeout) => {}
            _ => panic!("Expected Config variant"),
        }
    }

    #[test]
    fn test_session_errors_are_setup_only() {
        fn during_setup(err: &SessionError) -> bool {
            match err {
                SessionError::Connect { .. } | SessionError::Config(_) => true,
            }
        }

        let err = SessionError::Connect {
            address: "127.0.0.1:6667".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
        };
        assert!(during_setup(&err));
        assert!(during_setup(&ConfigError::ZeroTimeout.into()));
    }
}
