//! Top-level node lifecycle.
//!
//! Composes discovery, session, and command dispatch into one sequential
//! state machine. The philosophy throughout is "when confused, go back to
//! discovery": every session-level failure tears the connection down and
//! redoes the whole discovery cycle, so the node converges on whichever
//! collector is currently announcing.

use tokio::sync::watch;

use crate::discovery::DiscoveryListener;
use crate::domain::SensorPtr;
use crate::handler::ProtocolHandler;
use crate::node_config::NodeConfig;
use crate::sampler::SamplingScheduler;
use crate::session::Session;

/// Lifecycle phase of the node. Exactly one per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for a collector announcement on the discovery port.
    Discovering,
    /// Announcement resolved, TCP connect in flight.
    Connecting,
    /// Session established, pumping commands.
    Active,
    /// Shutdown observed; the node will not run again.
    Closed,
}

/// The node's top-level loop.
///
/// Runs strictly sequentially: discovery, connect, and the active message
/// loop never overlap. The only mutable shared resource, the retained-
/// readings buffer, is owned (via the handler) by this single task, so no
/// locking is involved.
pub struct NodeController {
    config: NodeConfig,
    listener: DiscoveryListener,
    handler: ProtocolHandler,
    state: ConnectionState,
}

impl NodeController {
    pub fn new(config: NodeConfig, sensor: SensorPtr) -> Self {
        let listener = DiscoveryListener::new(config.clone());
        let scheduler = SamplingScheduler::new(sensor, config.sampling_threshold);

        Self {
            config,
            listener,
            handler: ProtocolHandler::new(scheduler),
            state: ConnectionState::Discovering,
        }
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Run the node until `shutdown` fires.
    ///
    /// The cycle is deliberately infinite; no error terminates it. On
    /// shutdown the node sends a best-effort `CLOSE` if a session is up,
    /// then returns. A dropped shutdown sender counts as a shutdown
    /// request.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        'node: loop {
            // --- Discovering
            self.state = ConnectionState::Discovering;
            let (ip, port) = tokio::select! {
                resolved = self.listener.discover() => match resolved {
                    Ok(addr) => addr,
                    Err(e) => {
                        tracing::warn!(error = %e, "discovery failed, rebinding");
                        continue;
                    }
                },
                _ = shutdown.changed() => break,
            };

            // --- Connecting
            self.state = ConnectionState::Connecting;
            let mut session = tokio::select! {
                connected = Session::connect(&ip, port, &self.config) => match connected {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::warn!(error = %e, "connect failed, restarting discovery");
                        continue;
                    }
                },
                _ = shutdown.changed() => break,
            };

            // --- Active
            self.state = ConnectionState::Active;
            loop {
                let msg = tokio::select! {
                    received = session.receive() => match received {
                        Ok(msg) => msg,
                        Err(e) => {
                            tracing::warn!(error = %e, "session lost, restarting discovery");
                            break;
                        }
                    },
                    _ = shutdown.changed() => {
                        session.close().await;
                        break 'node;
                    }
                };

                if let Some(reply) = self.handler.handle(&msg) {
                    if let Err(e) = session.send(&reply).await {
                        tracing::warn!(error = %e, "reply failed, restarting discovery");
                        break;
                    }
                }
            }
        }

        self.state = ConnectionState::Closed;
        tracing::info!("shutdown requested, node stopped");
    }
}
