use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One snapshot of sensor values plus a timestamp.
///
/// Immutable once produced. `time` is monotonic seconds since node start;
/// there is no wall-clock time anywhere in the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Seconds since the node epoch (boot).
    #[serde(rename = "TIME")]
    pub time: u64,

    /// Temperature in degrees Celsius.
    #[serde(rename = "TEMP")]
    pub temperature: f64,

    /// Relative humidity in percent.
    #[serde(rename = "HUM")]
    pub humidity: f64,

    /// UV index derived from the sensor's voltage curve.
    #[serde(rename = "UV")]
    pub uv_index: f64,
}

/// Session message status tag.
///
/// The vocabulary is closed: a payload whose `STATUS` is none of these six
/// strings fails to decode. Which statuses the node *reacts* to is decided
/// by the protocol handler; decoding and dispatch are separate concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Handshake sent by the node immediately after connecting. No reply
    /// is expected.
    #[serde(rename = "CONN")]
    Conn,

    /// As a command: request the full retained-readings buffer. As a
    /// reply: carries that buffer.
    #[serde(rename = "DATA")]
    Data,

    /// Reply carrying exactly one fresh measurement.
    #[serde(rename = "MES")]
    Mes,

    /// Sent by the node on shutdown, best-effort.
    #[serde(rename = "CLOSE")]
    Close,

    /// Liveness command; answered with a fresh measurement.
    #[serde(rename = "ACK")]
    Ack,

    /// Command to clear the retained-readings buffer.
    #[serde(rename = "RST")]
    Rst,
}

/// A framed session message, identical in shape for both directions.
///
/// Wire form: `{"STATUS": <string>, "DATA": [<Reading>, ...]}`, one JSON
/// object per TCP read, UTF-8, no delimiter or length prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    #[serde(rename = "STATUS")]
    pub status: Status,

    #[serde(rename = "DATA", default)]
    pub data: Vec<Reading>,
}

impl SessionMessage {
    /// The post-connect handshake. Empty data.
    pub fn conn() -> Self {
        Self {
            status: Status::Conn,
            data: Vec::new(),
        }
    }

    /// The shutdown notice. Empty data.
    pub fn close() -> Self {
        Self {
            status: Status::Close,
            data: Vec::new(),
        }
    }

    /// A `MES` reply carrying exactly one fresh reading.
    pub fn measurement(reading: Reading) -> Self {
        Self {
            status: Status::Mes,
            data: vec![reading],
        }
    }

    /// A `DATA` reply carrying a snapshot of the retained buffer.
    pub fn data(readings: Vec<Reading>) -> Self {
        Self {
            status: Status::Data,
            data: readings,
        }
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Result<Bytes> {
        let raw = serde_json::to_vec(self).map_err(|e| Error::SessionDecode(e.to_string()))?;
        Ok(Bytes::from(raw))
    }

    /// Decode one frame of wire bytes.
    ///
    /// Invalid UTF-8, invalid JSON, missing `STATUS`, or a status outside
    /// the protocol vocabulary all surface as `SessionDecode`; the caller
    /// is expected to tear the session down and re-enter discovery.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let text =
            std::str::from_utf8(raw).map_err(|e| Error::SessionDecode(e.to_string()))?;
        serde_json::from_str(text).map_err(|e| Error::SessionDecode(e.to_string()))
    }
}
