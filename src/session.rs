//! TCP session with a discovered collector.
//!
//! The node is the connecting side. Framing is one JSON object per read
//! buffer, UTF-8, no delimiter or length prefix; a message larger than the
//! read buffer is a known protocol limitation, not handled here.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;

use crate::error::{Error, Result};
use crate::node_config::NodeConfig;
use crate::protocol::SessionMessage;

/// One established TCP session.
///
/// Created by [`Session::connect`], which also performs the `CONN`
/// handshake. On any returned error the session is no longer usable; the
/// caller drops it and re-enters discovery.
pub struct Session {
    stream: TcpStream,
    buf: Vec<u8>,
    idle_interval: Duration,
}

impl Session {
    /// Connect to a discovered collector and announce presence.
    ///
    /// Sends a `CONN` message with empty data immediately after the stream
    /// opens; no synchronous reply is expected. Connection refusal or
    /// timeout surfaces as `Error::Connect`.
    pub async fn connect(ip: &str, port: u16, config: &NodeConfig) -> Result<Self> {
        let stream = TcpStream::connect((ip, port)).await.map_err(|source| {
            Error::Connect {
                addr: format!("{ip}:{port}"),
                source,
            }
        })?;

        tracing::info!(addr = %format!("{ip}:{port}"), "connected to collector");

        let mut session = Self {
            stream,
            buf: vec![0u8; config.max_frame_bytes],
            idle_interval: config.idle_interval,
        };
        session.send(&SessionMessage::conn()).await?;

        Ok(session)
    }

    /// Send one message as a single frame.
    pub async fn send(&mut self, msg: &SessionMessage) -> Result<()> {
        let frame = msg.encode()?;
        self.stream
            .write_all(&frame)
            .await
            .map_err(Error::ConnectionLost)?;
        Ok(())
    }

    /// Receive the next message, blocking until one arrives.
    ///
    /// Empty or whitespace-only payloads are ignored: the session idles for
    /// the configured interval and reads again, which bounds CPU usage
    /// against a peer sending keepalive padding. The reference node paused
    /// after every message; here the read itself blocks without spinning,
    /// so the pause is only needed on the empty-payload path. EOF and I/O
    /// errors are `ConnectionLost`; undecodable payloads are
    /// `SessionDecode`. Both mean the caller must tear the session down.
    pub async fn receive(&mut self) -> Result<SessionMessage> {
        loop {
            let len = self
                .stream
                .read(&mut self.buf)
                .await
                .map_err(Error::ConnectionLost)?;

            if len == 0 {
                return Err(Error::ConnectionLost(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "collector closed the connection",
                )));
            }

            let raw = &self.buf[..len];
            if raw.iter().all(|b| b.is_ascii_whitespace()) {
                time::sleep(self.idle_interval).await;
                continue;
            }

            return SessionMessage::decode(raw);
        }
    }

    /// Best-effort shutdown notice.
    ///
    /// Send failures are ignored: this runs on the way out, when the peer
    /// may already be gone.
    pub async fn close(mut self) {
        if self.send(&SessionMessage::close()).await.is_err() {
            tracing::debug!("collector unreachable during close, dropping session");
        }
        let _ = self.stream.shutdown().await;
    }
}
