use thiserror::Error;

/// Errors that can occur while locating a collector or serving a session.
///
/// Every variant is recoverable: the node's response to any of them is to
/// tear down whatever socket was involved and re-enter discovery. Nothing
/// here is fatal to the process.
#[derive(Error, Debug)]
pub enum Error {
    /// A discovery datagram was not valid UTF-8, not valid JSON, or was
    /// missing expected announcement fields.
    #[error("malformed discovery datagram: {0}")]
    DiscoveryDecode(String),

    /// The discovery socket failed to bind or receive.
    #[error("discovery socket error")]
    DiscoveryIo(#[source] std::io::Error),

    /// The TCP connection to the discovered collector was refused or
    /// timed out.
    #[error("failed to connect to collector at {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A session payload was not valid UTF-8, not valid JSON, or carried a
    /// status outside the protocol vocabulary.
    #[error("malformed session payload: {0}")]
    SessionDecode(String),

    /// The session socket was closed by the peer or failed mid-exchange.
    #[error("session connection lost")]
    ConnectionLost(#[source] std::io::Error),
}

/// Result type alias for node operations
pub type Result<T> = std::result::Result<T, Error>;
