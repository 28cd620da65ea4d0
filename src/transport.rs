//! Line-oriented TCP transport.
//!
//! Splits a [`TcpStream`] into a bounded line reader and a line writer that
//! flushes every line on its own.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::warn;

use crate::error::TransportReadError;

/// Longest accepted inbound line, terminator included.
pub const MAX_LINE_LEN: usize = 8191;

/// Protocol line terminator.
pub const CRLF: &str = "\r\n";

/// Dial `address` and split the stream into reader and writer halves.
pub(crate) async fn connect(
    address: &str,
    keepalive: bool,
) -> io::Result<(LineReader, LineWriter)> {
    let stream = TcpStream::connect(address).await?;
    if keepalive {
        if let Err(e) = enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
    }
    if let Err(e) = stream.set_nodelay(true) {
        warn!("failed to set TCP_NODELAY: {}", e);
    }

    let (read, write) = stream.into_split();
    Ok((LineReader::new(read), LineWriter::new(write)))
}

fn enable_keepalive(stream: &TcpStream) -> io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}

/// Reads one terminated line at a time.
pub(crate) struct LineReader {
    inner: BufReader<OwnedReadHalf>,
    buf: Vec<u8>,
}

impl LineReader {
    fn new(read: OwnedReadHalf) -> Self {
        Self {
            inner: BufReader::new(read),
            buf: Vec::with_capacity(512),
        }
    }

    /// Read up to and including the next `\n`.
    ///
    /// End of stream, even after a partial line, is [`TransportReadError::Closed`].
    /// Invalid UTF-8 is replaced rather than rejected.
    pub async fn read_line(&mut self) -> Result<String, TransportReadError> {
        self.buf.clear();
        let n = (&mut self.inner)
            .take(MAX_LINE_LEN as u64)
            .read_until(b'\n', &mut self.buf)
            .await?;

        if n == 0 {
            return Err(TransportReadError::Closed);
        }
        if self.buf.last() != Some(&b'\n') {
            return Err(if n >= MAX_LINE_LEN {
                TransportReadError::LineTooLong(MAX_LINE_LEN)
            } else {
                TransportReadError::Closed
            });
        }

        Ok(String::from_utf8_lossy(&self.buf).into_owned())
    }
}

/// Writes complete lines, flushing each one.
pub(crate) struct LineWriter {
    inner: OwnedWriteHalf,
}

impl LineWriter {
    fn new(write: OwnedWriteHalf) -> Self {
        Self { inner: write }
    }

    /// Write `line` followed by CRLF and flush.
    pub async fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = String::with_capacity(line.len() + CRLF.len());
        out.push_str(line);
        out.push_str(CRLF);
        self.inner.write_all(out.as_bytes()).await?;
        self.inner.flush().await
    }

    /// Shut down the write direction, which closes the connection for the peer.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.inner.shutdown().await
    }
}
