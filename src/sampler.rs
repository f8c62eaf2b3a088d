//! Sampling and retention policy.
//!
//! Readings are produced at whatever rate commands arrive; retained storage
//! grows at roughly 1/16th of that rate. This is a deliberate
//! amplitude-reduction policy to bound memory on a device that never
//! persists across power loss.

use crate::domain::SensorPtr;
use crate::protocol::Reading;

/// Decides, per sample, whether a reading is retained.
///
/// Sole owner of the retained-readings buffer. The counter starts at 0 and
/// every [`sample`](Self::sample) increments it; when it exceeds the
/// threshold it resets to 0 and that call's reading is appended. With the
/// default threshold of 15 this retains every 16th reading.
///
/// Single-task access only: the counter increment and buffer append are not
/// synchronized. A background sampling timer on another task would need to
/// own this behind a mutex or a single-owner channel.
pub struct SamplingScheduler {
    sensor: SensorPtr,
    counter: u32,
    threshold: u32,
    buffer: Vec<Reading>,
}

impl SamplingScheduler {
    pub fn new(sensor: SensorPtr, threshold: u32) -> Self {
        Self {
            sensor,
            counter: 0,
            threshold,
            buffer: Vec::new(),
        }
    }

    /// Acquire a fresh reading, advancing the retention counter.
    ///
    /// Always returns the just-acquired reading, whether or not it was
    /// retained. N calls append exactly `N / (threshold + 1)` readings.
    pub fn sample(&mut self) -> Reading {
        let reading = self.sensor.current_reading();

        self.counter += 1;
        if self.counter > self.threshold {
            self.counter = 0;
            self.buffer.push(reading);
        }

        reading
    }

    /// Clear the retained buffer. The counter is unaffected.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Borrow the retained readings, oldest first.
    pub fn readings(&self) -> &[Reading] {
        &self.buffer
    }

    /// Owned copy of the retained readings, for `DATA` replies.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.buffer.clone()
    }
}
