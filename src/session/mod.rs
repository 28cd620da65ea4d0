//! Client session: connection lifecycle, registration, read loop and event
//! dispatch.
//!
//! A [`Session`] is a cheap, cloneable handle. It moves between two states,
//! disconnected and connected:
//!
//! - [`connect`](Session::connect) dials, sends `NICK`/`USER`, emits
//!   [`Event::Connect`] and starts a read loop for the new connection.
//!   It is a no-op while connected.
//! - A read failure, EOF or inactivity deadline in the read loop tears the
//!   connection down and emits [`Event::Disconnect`].
//! - [`disconnect`](Session::disconnect) and [`destroy`](Session::destroy)
//!   tear down on request and are no-ops while disconnected.
//!
//! Each connection instance emits `Disconnect` at most once. The read loop
//! for an instance is stopped through a cancellation token and reaped by
//! whichever external teardown closed it. The same token aborts a write in
//! flight, so teardown never waits behind a peer that stopped reading.

mod handler;
mod read_loop;

pub use self::handler::EventHandler;

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command;
use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::event::Event;
use crate::transport::{self, LineWriter};

/// Handle to one IRC server session.
///
/// Clones share the same connection. Event handler invocations each receive
/// their own clone, so the session stays alive while any of them runs.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    config: SessionConfig,
    handler: Arc<dyn EventHandler>,
    link: Mutex<Option<Link>>,
    /// Id and cancel token of the current link, reachable while a write
    /// holds `link`.
    live: StdMutex<Option<(u64, CancellationToken)>>,
    connected: AtomicBool,
    next_id: AtomicU64,
    clock: StdMutex<Clock>,
}

#[derive(Clone, Copy, Default)]
struct Clock {
    connected_at: Option<DateTime<Utc>>,
    last_activity: Option<DateTime<Utc>>,
}

/// A live connection instance.
struct Link {
    id: u64,
    writer: LineWriter,
    cancel: CancellationToken,
    reader: Option<JoinHandle<()>>,
    /// Set by `destroy`; suppresses the `Disconnect` event.
    quitting: bool,
}

impl Session {
    /// Build a disconnected session. Call [`connect`](Self::connect) to dial.
    pub fn new<H: EventHandler>(config: SessionConfig, handler: H) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                handler: Arc::new(handler),
                link: Mutex::new(None),
                live: StdMutex::new(None),
                connected: AtomicBool::new(false),
                next_id: AtomicU64::new(1),
                clock: StdMutex::new(Clock::default()),
            }),
        }
    }

    /// Validate `config`, connect and register.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] for an invalid config and
    /// [`SessionError::Connect`] when the server cannot be reached. No retry
    /// is attempted.
    pub async fn create<H: EventHandler>(config: SessionConfig, handler: H) -> Result<Self> {
        config.validate()?;
        let session = Self::new(config, handler);
        session.connect().await?;
        Ok(session)
    }

    /// Connect to the configured server and send the registration handshake.
    ///
    /// Does nothing if already connected. On failure the session stays
    /// disconnected.
    pub async fn connect(&self) -> Result<()> {
        let config = &self.inner.config;
        let mut slot = self.inner.link.lock().await;
        if slot.is_some() {
            debug!(server = %config.server_address, "already connected");
            return Ok(());
        }

        let (reader, writer) =
            transport::connect(&config.server_address, config.tcp_keepalive)
                .await
                .map_err(|source| SessionError::Connect {
                    address: config.server_address.clone(),
                    source,
                })?;

        let now = Utc::now();
        {
            let mut clock = self.inner.clock();
            clock.connected_at = Some(now);
            clock.last_activity = Some(now);
        }
        self.inner.connected.store(true, Ordering::SeqCst);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        info!(server = %config.server_address, id, "connected");

        let mut link = Link {
            id,
            writer,
            cancel: CancellationToken::new(),
            reader: None,
            quitting: false,
        };
        let deadline = config.inactivity_timeout;
        link.write_logged(deadline, &command::nick(&config.nick)).await;
        link.write_logged(deadline, &command::user(&config.user_name, &config.real_name))
            .await;

        self.dispatch(Event::Connect);

        let cancel = link.cancel.clone();
        *self.inner.live() = Some((id, cancel.clone()));
        link.reader = Some(tokio::spawn(read_loop::run(self.clone(), id, reader, cancel)));
        *slot = Some(link);

        Ok(())
    }

    /// Close the connection, emitting [`Event::Disconnect`] if `notify` is set.
    ///
    /// Does nothing if already disconnected. Waits for the read loop of the
    /// closed connection to finish.
    pub async fn disconnect(&self, notify: bool) {
        if let Some(task) = self.teardown(None, notify).await {
            reap(task).await;
        }
    }

    /// Send one protocol line. The CRLF terminator is appended here.
    ///
    /// Sends are fire-and-forget: a write failure, or sending while
    /// disconnected, is logged and otherwise ignored. A write that makes no
    /// progress within the inactivity timeout is abandoned. Anything after an
    /// embedded line break is discarded so a caller cannot smuggle extra lines.
    pub async fn send(&self, line: impl AsRef<str>) {
        let line = single_line(line.as_ref());
        let mut slot = self.inner.link.lock().await;
        match slot.as_mut() {
            Some(link) => {
                link.write_logged(self.inner.config.inactivity_timeout, line)
                    .await
            }
            None => warn!("not connected, dropping line {:?}", line),
        }
    }

    /// Send `QUIT`, wait the configured grace period, then close.
    ///
    /// No [`Event::Disconnect`] is emitted for this teardown, even if the
    /// server closes the socket first. Does nothing if already disconnected.
    pub async fn destroy(&self, quit_message: &str) {
        {
            let mut slot = self.inner.link.lock().await;
            let Some(link) = slot.as_mut() else {
                return;
            };
            link.quitting = true;
            link.write_logged(self.inner.config.quit_grace, &command::quit(quit_message))
                .await;
        }

        tokio::time::sleep(self.inner.config.quit_grace).await;
        self.disconnect(false).await;
    }

    /// Whether a connection is currently established.
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// When the most recent connection was established.
    pub fn time_connected(&self) -> Option<DateTime<Utc>> {
        self.inner.clock().connected_at
    }

    /// When the most recent line was received (or the connection established).
    pub fn time_last_activity(&self) -> Option<DateTime<Utc>> {
        self.inner.clock().last_activity
    }

    /// The configuration this session was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Our registered nick.
    pub fn nick(&self) -> &str {
        &self.inner.config.nick
    }

    fn touch(&self) {
        self.inner.clock().last_activity = Some(Utc::now());
    }

    /// Run the handler for `event` on its own task.
    fn dispatch(&self, event: Event) {
        let handler = Arc::clone(&self.inner.handler);
        let session = self.clone();
        debug!(kind = ?event.kind(), "dispatching event");
        tokio::spawn(async move {
            handler.handle(session, event).await;
        });
    }

    /// Close the current connection.
    ///
    /// With `instance` set, only that connection instance is closed. Returns
    /// the read loop handle for the caller to reap.
    ///
    /// The link is cancelled before `link` is locked, which releases any
    /// write blocked on a full socket buffer.
    async fn teardown(&self, instance: Option<u64>, notify: bool) -> Option<JoinHandle<()>> {
        {
            let live = self.inner.live();
            let (id, cancel) = live.as_ref()?;
            if instance.is_some_and(|want| want != *id) {
                return None;
            }
            cancel.cancel();
        }

        let mut slot = self.inner.link.lock().await;
        let current = slot.as_ref()?.id;
        if instance.is_some_and(|id| id != current) {
            return None;
        }
        let mut link = slot.take()?;
        *self.inner.live() = None;
        self.inner.connected.store(false, Ordering::SeqCst);
        drop(slot);

        if let Err(e) = link.writer.shutdown().await {
            debug!(id = link.id, "socket shutdown failed: {}", e);
        }
        info!(server = %self.inner.config.server_address, id = link.id, "disconnected");

        if notify && !link.quitting {
            self.dispatch(Event::Disconnect);
        }
        link.reader.take()
    }
}

impl Inner {
    fn clock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live(&self) -> MutexGuard<'_, Option<(u64, CancellationToken)>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Link {
    /// Write one line, giving up after `deadline` or once the link is
    /// cancelled.
    async fn write_logged(&mut self, deadline: Duration, line: &str) {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "connection closing",
            )),
            written = tokio::time::timeout(deadline, self.writer.write_line(line)) => {
                written.unwrap_or_else(|_| {
                    Err(io::Error::new(io::ErrorKind::TimedOut, "write stalled"))
                })
            }
        };
        match result {
            Ok(()) => debug!(">> {}", line),
            Err(e) => warn!(id = self.id, "couldn't write {:?}: {}", line, e),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("nick", &self.inner.config.nick)
            .field("server_address", &self.inner.config.server_address)
            .field("connected", &self.is_connected())
            .finish()
    }
}

async fn reap(task: JoinHandle<()>) {
    if let Err(e) = task.await {
        if e.is_panic() {
            warn!("read loop panicked: {}", e);
        }
    }
}

/// Cut `line` at its first CR or LF.
fn single_line(line: &str) -> &str {
    let end = line.find(['\r', '\n']).unwrap_or(line.len());
    let (head, tail) = line.split_at(end);
    if !tail.trim_start_matches(['\r', '\n']).is_empty() {
        warn!("discarding text after line break in {:?}", line);
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("PRIVMSG #c :hi"), "PRIVMSG #c :hi");
        assert_eq!(single_line("PRIVMSG #c :hi\r\n"), "PRIVMSG #c :hi");
        assert_eq!(single_line("JOIN #a\r\nJOIN #b"), "JOIN #a");
        assert_eq!(single_line(""), "");
    }

    #[tokio::test]
    async fn test_new_session_is_disconnected() {
        let config = SessionConfig::new("bot", "bot", "Bot", "127.0.0.1:6667");
        let session = Session::new(config, |_s: Session, _e: Event| async {});

        assert!(!session.is_connected());
        assert!(session.time_connected().is_none());
        assert!(session.time_last_activity().is_none());
        assert_eq!(session.nick(), "bot");

        // No-ops while disconnected.
        session.send("PRIVMSG #c :lost").await;
        session.disconnect(true).await;
        session.destroy("bye").await;
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_config() {
        let config = SessionConfig::new("", "bot", "Bot", "127.0.0.1:6667");
        let err = Session::create(config, |_s: Session, _e: Event| async {})
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }
}
