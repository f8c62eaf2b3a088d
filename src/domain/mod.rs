//! Collaborator trait seams.
//!
//! This module defines the narrow read interfaces the protocol core depends
//! on without committing to any concrete hardware: a sensor that can produce
//! a reading on demand and a monotonic clock. Board-level acquisition
//! (temperature/humidity probes, UV voltage readout, RTC bring-up) lives
//! behind these traits and is assumed reliable once constructed.
//!
//! The simulated implementations are the reference collaborators: always
//! available, deterministic, used by the bundled binary and by tests.

mod sensor;

pub use sensor::{Clock, MonotonicClock, SensorPtr, SensorSource, SimulatedSensor};
