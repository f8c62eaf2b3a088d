//! Command dispatch.
//!
//! Maps one inbound session message to at most one outbound reply, with
//! side effects on the retained-readings buffer. The dispatch table is
//! deliberately permissive: statuses that are valid protocol vocabulary but
//! not commands (`CONN`, `CLOSE`, `MES` arriving inbound) are dropped
//! without a reply rather than treated as protocol errors.

use crate::protocol::{SessionMessage, Status};
use crate::sampler::SamplingScheduler;

/// Interprets inbound session messages as commands.
///
/// | inbound | action        | reply                       |
/// |---------|---------------|-----------------------------|
/// | `ACK`   | sample once   | `MES` + that reading        |
/// | `DATA`  | none          | `DATA` + buffer snapshot    |
/// | `RST`   | clear buffer  | `MES` + one fresh reading   |
/// | other   | none          | none (dropped)              |
///
/// Every `MES` reply goes through [`SamplingScheduler::sample`], so handling
/// a command always advances the retention counter, whether or not that
/// particular reading is kept.
pub struct ProtocolHandler {
    scheduler: SamplingScheduler,
}

impl ProtocolHandler {
    pub fn new(scheduler: SamplingScheduler) -> Self {
        Self { scheduler }
    }

    /// Dispatch one inbound message. `None` means no reply is sent.
    pub fn handle(&mut self, msg: &SessionMessage) -> Option<SessionMessage> {
        match msg.status {
            Status::Ack => {
                tracing::debug!("acknowledged, replying with fresh measurement");
                Some(SessionMessage::measurement(self.scheduler.sample()))
            }
            Status::Data => {
                let snapshot = self.scheduler.snapshot();
                tracing::debug!(readings = snapshot.len(), "buffer requested");
                Some(SessionMessage::data(snapshot))
            }
            Status::Rst => {
                tracing::info!("buffer reset requested");
                self.scheduler.reset();
                Some(SessionMessage::measurement(self.scheduler.sample()))
            }
            other => {
                tracing::debug!(status = ?other, "dropping non-command message");
                None
            }
        }
    }

    /// Access to the underlying scheduler, for inspection.
    pub fn scheduler(&self) -> &SamplingScheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SensorPtr, SensorSource};
    use crate::protocol::Reading;
    use std::sync::Arc;

    struct StaticSensor;

    impl SensorSource for StaticSensor {
        fn current_reading(&self) -> Reading {
            Reading {
                time: 5,
                temperature: 21.0,
                humidity: 45.0,
                uv_index: 0.8,
            }
        }
    }

    fn handler() -> ProtocolHandler {
        let sensor: SensorPtr = Arc::new(StaticSensor);
        ProtocolHandler::new(SamplingScheduler::new(sensor, 15))
    }

    fn command(status: Status) -> SessionMessage {
        SessionMessage {
            status,
            data: Vec::new(),
        }
    }

    #[test]
    fn ack_yields_mes_with_exactly_one_reading() {
        let mut h = handler();

        let reply = h.handle(&command(Status::Ack)).unwrap();
        assert_eq!(reply.status, Status::Mes);
        assert_eq!(reply.data.len(), 1);
    }

    #[test]
    fn data_returns_snapshot_without_clearing() {
        let mut h = handler();

        // 20 commands: one retained reading (the 16th sample).
        for _ in 0..20 {
            h.handle(&command(Status::Ack));
        }

        let reply = h.handle(&command(Status::Data)).unwrap();
        assert_eq!(reply.status, Status::Data);
        assert_eq!(reply.data.len(), 1);

        // Not cleared: asking again returns the same snapshot.
        let again = h.handle(&command(Status::Data)).unwrap();
        assert_eq!(again.data.len(), 1);
    }

    #[test]
    fn rst_clears_buffer_and_replies_with_measurement() {
        let mut h = handler();

        for _ in 0..20 {
            h.handle(&command(Status::Ack));
        }
        assert_eq!(h.scheduler().readings().len(), 1);

        let reply = h.handle(&command(Status::Rst)).unwrap();
        assert_eq!(reply.status, Status::Mes);
        assert_eq!(reply.data.len(), 1);

        let data = h.handle(&command(Status::Data)).unwrap();
        assert!(data.data.is_empty());
    }

    #[test]
    fn data_query_does_not_advance_sampling() {
        let mut h = handler();

        for _ in 0..100 {
            h.handle(&command(Status::Data));
        }
        assert!(h.scheduler().readings().is_empty());
    }

    #[test]
    fn non_command_statuses_are_dropped() {
        let mut h = handler();

        assert!(h.handle(&command(Status::Conn)).is_none());
        assert!(h.handle(&command(Status::Close)).is_none());
        assert!(h.handle(&command(Status::Mes)).is_none());
    }
}
