//! # ircsess
//!
//! A minimal client for line-oriented IRC servers.
//!
//! ## Features
//!
//! - Infallible parsing of `[:prefix] <command> [params] [:trailing]` lines
//!   into a flat [`Message`] record
//! - Builders for the outbound lines a simple client needs
//! - A [`Session`] that connects, registers, answers `PING`, drops idle
//!   connections and delivers [`Event`]s to a caller-supplied handler
//!   (requires the default `tokio` feature)

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing lines
//!
//! ```rust
//! use ircsess::{Message, MessageKind};
//!
//! let msg = Message::parse(":nick!user@host PRIVMSG #chan :hello there\r\n");
//! assert_eq!(msg.kind, MessageKind::Privmsg);
//! assert_eq!(msg.from, "nick!user@host");
//! assert_eq!(msg.to, "#chan");
//! assert_eq!(msg.data, "hello there");
//!
//! let welcome = Message::parse(":irc.example.com 001 me :Welcome");
//! assert_eq!(welcome.kind, MessageKind::Raw);
//! assert_eq!(welcome.raw_token, "001");
//! ```
//!
//! ### Running a session
//!
//! ```no_run
//! use ircsess::{command, Event, MessageKind, Session, SessionConfig};
//!
//! # async fn run() -> ircsess::error::Result<()> {
//! let config = SessionConfig::new("gobotgo", "hi", "hey", "irc.libera.chat:6667");
//! let session = Session::create(config, |session: Session, event: Event| async move {
//!     match event {
//!         Event::Message(m) if m.kind == MessageKind::Raw && m.raw_token == "001" => {
//!             session.send(command::join("#rust")).await;
//!         }
//!         _ => {}
//!     }
//! })
//! .await?;
//!
//! session.destroy("Leaving").await;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod message;

#[cfg(feature = "tokio")]
pub mod session;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::config::SessionConfig;
pub use self::error::{ConfigError, SessionError, TransportReadError};
pub use self::event::{Event, EventKind};
pub use self::message::{Message, MessageKind};

#[cfg(feature = "tokio")]
pub use self::session::{EventHandler, Session};
#[cfg(feature = "tokio")]
pub use self::transport::MAX_LINE_LEN;
