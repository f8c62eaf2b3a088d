//! UDP collector discovery.
//!
//! The collector's address is not known in advance: collectors broadcast a
//! JSON announcement on a well-known port, and the node listens until one
//! arrives. The node never transmits on this channel.

use tokio::net::UdpSocket;

use crate::error::{Error, Result};
use crate::node_config::NodeConfig;
use crate::protocol::DiscoveryAnnouncement;

/// Listens for a collector's broadcast announcement.
pub struct DiscoveryListener {
    config: NodeConfig,
}

impl DiscoveryListener {
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    /// Block until a recognized announcement arrives, returning the
    /// collector's `(ip, port)`.
    ///
    /// Binds a fresh socket on the wildcard address each call. Datagrams
    /// from unrecognized senders are ignored and listening continues; a
    /// malformed datagram or any socket error abandons the socket and
    /// returns, and the caller retries with a fresh `discover()`.
    pub async fn discover(&self) -> Result<(String, u16)> {
        let bind_addr = ("0.0.0.0", self.config.discovery_port);
        let socket = UdpSocket::bind(bind_addr).await.map_err(Error::DiscoveryIo)?;

        tracing::info!(port = self.config.discovery_port, "listening for collector broadcast");

        let mut buf = vec![0u8; self.config.max_frame_bytes];
        loop {
            let (len, peer) = socket.recv_from(&mut buf).await.map_err(Error::DiscoveryIo)?;

            let announcement = DiscoveryAnnouncement::decode(&buf[..len])?;
            if !announcement.is_collector() {
                tracing::debug!(%peer, id = %announcement.id, "ignoring foreign announcement");
                continue;
            }

            tracing::info!(
                ip = %announcement.ip,
                port = announcement.port,
                iteration = announcement.iteration,
                "collector announcement received"
            );
            return Ok((announcement.ip, announcement.port));
        }
    }
}
