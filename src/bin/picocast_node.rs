//! Telemetry node binary wired to the simulated sensor.
//!
//! Runs the full discovery/session cycle against whichever collector is
//! broadcasting. Ctrl-C triggers a best-effort `CLOSE` before exit.
//!
//! Run with: cargo run --bin picocast_node
//!
//! Environment:
//! - `DISCOVERY_PORT` overrides the UDP discovery port (default 51519)
//! - `RUST_LOG` controls log filtering as usual

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use picocast_node::{
    //
    MonotonicClock,
    NodeConfig,
    NodeController,
    SensorPtr,
    SimulatedSensor,
};

#[tokio::main]
async fn main() {
    // ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_ansi(false)
        .init();

    let mut config = NodeConfig::default();
    if let Ok(port) = std::env::var("DISCOVERY_PORT") {
        match port.parse() {
            Ok(port) => config = config.with_discovery_port(port),
            Err(_) => tracing::warn!(%port, "ignoring unparseable DISCOVERY_PORT"),
        }
    }

    let clock = Arc::new(MonotonicClock::new());
    let sensor: SensorPtr = Arc::new(SimulatedSensor::new(clock));

    // Boot-time sanity reading, logged before the node goes looking for a
    // collector.
    let test_reading = sensor.current_reading();
    tracing::info!(
        temperature = test_reading.temperature,
        humidity = test_reading.humidity,
        uv_index = test_reading.uv_index,
        "test reading"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut controller = NodeController::new(config, sensor);
    controller.run(shutdown_rx).await;
}
