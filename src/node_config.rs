//! Public node configuration.
//!
//! This type intentionally contains no socket handles or protocol state.
//! The discovery and session layers are responsible for interpreting this
//! config into concrete socket settings.

use std::time::Duration;

/// Well-known UDP port collectors broadcast their announcements on.
pub const DISCOVERY_PORT: u16 = 51519;

/// Maximum bytes read per UDP datagram or TCP frame. One read is one
/// message; larger messages are a known protocol limitation.
pub const MAX_FRAME_BYTES: usize = 1024;

/// Default interval between sampled readings that are retained. With a
/// threshold of 15, roughly one reading in sixteen is appended to the
/// buffer.
pub const SAMPLING_THRESHOLD: u32 = 15;

/// Node tuning and addressing parameters.
///
/// # Example
///
/// ```
/// use picocast_node::NodeConfig;
/// use std::time::Duration;
///
/// let config = NodeConfig::default()
///     .with_discovery_port(51519)
///     .with_idle_interval(Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// UDP port the discovery listener binds on the wildcard address.
    ///
    /// Defaults to [`DISCOVERY_PORT`]. Overridable so tests can run
    /// concurrent discovery listeners on distinct ports.
    pub discovery_port: u16,

    /// Receive buffer size for both discovery datagrams and session frames.
    pub max_frame_bytes: usize,

    /// Pause between session receive attempts when the peer sent an empty
    /// payload. Bounds CPU usage on a chatty-but-idle connection; not a
    /// correctness requirement.
    pub idle_interval: Duration,

    /// Sampling counter threshold. The counter resets and a reading is
    /// retained when it exceeds this value.
    pub sampling_threshold: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            discovery_port: DISCOVERY_PORT,
            max_frame_bytes: MAX_FRAME_BYTES,
            idle_interval: Duration::from_secs(1),
            sampling_threshold: SAMPLING_THRESHOLD,
        }
    }
}

impl NodeConfig {
    /// Set the UDP discovery port.
    pub fn with_discovery_port(mut self, port: u16) -> Self {
        self.discovery_port = port;
        self
    }

    /// Set the per-read buffer size.
    pub fn with_max_frame_bytes(mut self, bytes: usize) -> Self {
        self.max_frame_bytes = bytes;
        self
    }

    /// Set the idle pause between empty session reads.
    pub fn with_idle_interval(mut self, interval: Duration) -> Self {
        self.idle_interval = interval;
        self
    }

    /// Set the sampling counter threshold.
    pub fn with_sampling_threshold(mut self, threshold: u32) -> Self {
        self.sampling_threshold = threshold;
        self
    }
}
