use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::Session;
use crate::event::Event;

/// Caller logic invoked for every session event.
///
/// Each event is delivered on its own spawned task. Invocations are neither
/// awaited by the session nor serialized with each other, so implementations
/// must tolerate concurrent calls. Any async closure taking
/// `(Session, Event)` implements this trait.
///
/// ```no_run
/// use ircsess::{command, Event, MessageKind, Session, SessionConfig};
///
/// # async fn run() -> ircsess::error::Result<()> {
/// let config = SessionConfig::new("bot", "bot", "A Bot", "irc.libera.chat:6667");
/// let session = Session::create(config, |session: Session, event: Event| async move {
///     if let Event::Message(m) = event {
///         if m.kind == MessageKind::Raw && m.raw_token == "001" {
///             session.send(command::join("#rust")).await;
///         }
///     }
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub trait EventHandler: Send + Sync + 'static {
    /// Handle one event.
    fn handle(&self, session: Session, event: Event) -> BoxFuture<'static, ()>;
}

impl<F, Fut> EventHandler for F
where
    F: Fn(Session, Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn handle(&self, session: Session, event: Event) -> BoxFuture<'static, ()> {
        (self)(session, event).boxed()
    }
}
