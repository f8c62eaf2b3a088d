//! Environmental telemetry node with broadcast-based collector discovery.
//!
//! The node does not know its collector's address in advance. It listens
//! for a UDP broadcast announcement on a well-known port, connects to the
//! announced TCP endpoint, and then serves a small command protocol:
//! liveness checks answered with fresh sensor readings, bulk retrieval of
//! the retained-readings buffer, and buffer resets. Any session failure
//! sends the node back to discovery; the cycle is deliberately infinite.

// Import all sub modules once...
mod controller;
mod discovery;
mod domain;
mod handler;
mod sampler;
mod session;

mod node_config;

mod error;
mod protocol;

// Re-export main types
pub use controller::{ConnectionState, NodeController};
pub use discovery::DiscoveryListener;
pub use handler::ProtocolHandler;
pub use sampler::SamplingScheduler;
pub use session::Session;

pub use node_config::{NodeConfig, DISCOVERY_PORT, MAX_FRAME_BYTES, SAMPLING_THRESHOLD};

pub use error::{Error, Result};

// --- public re-exports
pub use domain::{
    //
    Clock,
    MonotonicClock,
    SensorPtr,
    SensorSource,
    SimulatedSensor,
};

pub use protocol::{
    //
    DiscoveryAnnouncement,
    Reading,
    SessionMessage,
    Status,
};
