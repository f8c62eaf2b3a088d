//! Wire protocol types.
//!
//! Two channels share this module: the one-shot UDP discovery announcement
//! and the framed JSON session messages exchanged over TCP. Field names on
//! the wire are the legacy upper-case keys (`STATUS`, `DATA`, `TIME`, ...)
//! spoken by existing collectors; Rust-side names follow normal conventions
//! and are mapped with serde renames.

mod announce;
mod message;

pub use announce::DiscoveryAnnouncement;
pub use message::{Reading, SessionMessage, Status};
