use serde::Deserialize;

use crate::error::{Error, Result};

/// Protocol identifier a collector announcement must carry to be accepted.
pub const PROTOCOL_ID: &str = "PicoCast";

/// A collector's UDP broadcast announcement.
///
/// Transient: exists only while one datagram is being parsed. Wire form:
/// `{"ID":"PicoCast","ip":<string>,"port":<integer>,"iter":<integer>}`.
/// The node never replies on the discovery channel.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryAnnouncement {
    #[serde(rename = "ID")]
    pub id: String,

    /// Collector's TCP address, as announced.
    pub ip: String,

    /// Collector's TCP port.
    pub port: u16,

    /// Broadcast sequence number, logged for operator visibility.
    #[serde(rename = "iter")]
    pub iteration: u64,
}

impl DiscoveryAnnouncement {
    /// Decode one datagram.
    ///
    /// Invalid UTF-8, invalid JSON, and missing fields are all
    /// `DiscoveryDecode`: the listener's socket is abandoned and discovery
    /// restarts from a fresh bind.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let text =
            std::str::from_utf8(raw).map_err(|e| Error::DiscoveryDecode(e.to_string()))?;
        serde_json::from_str(text).map_err(|e| Error::DiscoveryDecode(e.to_string()))
    }

    /// Whether this announcement comes from a collector we recognize.
    ///
    /// Announcements with any other `ID` are ignored, not errors.
    pub fn is_collector(&self) -> bool {
        self.id == PROTOCOL_ID
    }
}
