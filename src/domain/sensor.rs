use std::sync::Arc;
use std::time::Instant;

use crate::protocol::Reading;

/// Monotonic seconds since node start.
///
/// There is no wall-clock time on the node; every timestamp in the protocol
/// is relative to boot.
pub trait Clock: Send + Sync {
    fn elapsed_seconds(&self) -> u64;
}

/// `Clock` backed by `std::time::Instant`, anchored at construction.
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed_seconds(&self) -> u64 {
        self.epoch.elapsed().as_secs()
    }
}

/// Produces a complete environmental reading on demand.
///
/// Implementations are assumed infallible once constructed; there are no
/// retry semantics at this seam. Acquisition may block briefly (real
/// humidity sensors do), which is acceptable because the core only samples
/// while handling a command.
pub trait SensorSource: Send + Sync {
    fn current_reading(&self) -> Reading;
}

/// Shared sensor pointer.
///
/// `Arc<dyn SensorSource>` so the sampler and tests can hold the same
/// instance; `.clone()` only bumps a reference count.
pub type SensorPtr = Arc<dyn SensorSource>;

/// ML8511 transfer function: output voltage to UV index, from the sensor's
/// linear voltage-UV characteristic (0.99 V at index 0, 2.8 V at index 15).
fn voltage_to_uv_index(voltage: f64) -> f64 {
    (voltage - 0.99) * 15.0 / (2.8 - 0.99)
}

/// Deterministic in-process sensor.
///
/// The reference `SensorSource`: values drift smoothly with elapsed time so
/// consecutive readings are distinguishable, and the UV channel goes through
/// the same voltage-to-index transfer a real ML8511 readout would.
pub struct SimulatedSensor {
    clock: Arc<dyn Clock>,
}

impl SimulatedSensor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl SensorSource for SimulatedSensor {
    fn current_reading(&self) -> Reading {
        let t = self.clock.elapsed_seconds();
        let phase = t as f64 / 60.0;

        // Plausible indoor ranges: ~19-25 C, ~40-60 %RH, UV voltage swept
        // across the lower half of the ML8511 output range.
        let temperature = 22.0 + 3.0 * (phase).sin();
        let humidity = 50.0 + 10.0 * (phase / 2.0).cos();
        let uv_voltage = 1.2 + 0.4 * (phase / 3.0).sin().abs();

        Reading {
            time: t,
            temperature,
            humidity,
            uv_index: voltage_to_uv_index(uv_voltage),
        }
    }
}
