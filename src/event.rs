//! Events a session delivers to its handler.

use crate::message::Message;

/// Type tag of an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A connection was established and registration was sent.
    Connect,
    /// The connection was lost or dropped on request.
    Disconnect,
    /// A line was received.
    Message,
}

/// A lifecycle or message event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Connected; `NICK` and `USER` have been sent.
    Connect,
    /// Disconnected. Emitted at most once per connection instance and never
    /// for a teardown started with [`Session::destroy`](crate::Session::destroy).
    Disconnect,
    /// A parsed incoming line.
    Message(Message),
}

impl Event {
    /// The type tag of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Connect => EventKind::Connect,
            Event::Disconnect => EventKind::Disconnect,
            Event::Message(_) => EventKind::Message,
        }
    }

    /// The carried message, for `Message` events.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Event::Message(message) => Some(message),
            _ => None,
        }
    }
}
