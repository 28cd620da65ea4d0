use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::Session;
use crate::command;
use crate::error::TransportReadError;
use crate::event::Event;
use crate::message::{Message, MessageKind, SplitLine};
use crate::transport::LineReader;

/// Read lines for connection instance `id` until it fails or is cancelled.
///
/// Every read is bounded by the inactivity timeout. `PING` is answered
/// before its `Message` event is dispatched.
pub(super) async fn run(
    session: Session,
    id: u64,
    mut reader: LineReader,
    cancel: CancellationToken,
) {
    let timeout = session.config().inactivity_timeout;

    loop {
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(id, "read loop cancelled");
                return;
            }
            read = tokio::time::timeout(timeout, reader.read_line()) => read,
        };

        let line = match read {
            Ok(Ok(line)) => line,
            Ok(Err(e)) => {
                warn!(id, "read failed: {}", e);
                break;
            }
            Err(_) => {
                warn!(id, "read failed: {}", TransportReadError::Timeout(timeout));
                break;
            }
        };

        session.touch();
        let message = Message::parse(&line);
        debug!("<< {}", message.full_text);

        if message.kind == MessageKind::Ping {
            session.send(command::pong(keepalive_token(&message))).await;
        }

        session.dispatch(Event::Message(message));
    }

    // Our own handle comes back here; dropping it just detaches.
    let _ = session.teardown(Some(id), true).await;
}

/// The token to echo in `PONG`.
///
/// Usually the trailing segment, even when it is empty. Some servers send
/// `PING server` with no colon, in which case the first parameter is echoed
/// instead.
fn keepalive_token(ping: &Message) -> &str {
    let split = SplitLine::split(&ping.full_text);
    split
        .trailing
        .or_else(|| split.params.first().copied())
        .unwrap_or_default()
}
