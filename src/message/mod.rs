//! Parsed representation of received protocol lines.

mod kind;
mod nom_parser;
mod types;

pub use self::kind::MessageKind;
pub use self::types::{parse, Message};

#[cfg(feature = "tokio")]
pub(crate) use self::nom_parser::SplitLine;
