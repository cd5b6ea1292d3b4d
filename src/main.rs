//! # CanSat Ground Station
//!
//! Binary entry point: wires the telemetry pipeline to a logging render
//! sink and runs the dispatcher until Ctrl+C.
//!
//! Startup attempts to open the configured serial port once; if that
//! fails the station simply keeps simulating, and a `Connect` command can
//! be issued later. Loss of the transport at any point falls back to the
//! simulator — nothing here is fatal to the session.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use cansat_ground::config::Config;
use cansat_ground::render::{RenderPayload, RenderSink};
use cansat_ground::station::{Command, GroundStation};

/// Payloads between periodic status log lines.
const LOG_INTERVAL_PAYLOADS: u64 = 50;

/// Render sink that logs payload summaries instead of painting. Stands in
/// for the charting/3D collaborator, which consumes the same payloads.
struct LogSink {
    presented: u64,
}

impl LogSink {
    fn new() -> Self {
        Self { presented: 0 }
    }
}

impl RenderSink for LogSink {
    fn present(&mut self, payload: &RenderPayload) {
        self.presented += 1;

        debug!(
            "alt {:.1} m, temp {:.1} °C, pres {:.1} hPa, lag {:.1} s — {}",
            payload.metrics.altitude,
            payload.metrics.temperature,
            payload.metrics.pressure,
            payload.metrics.lag_seconds,
            payload.scene.title,
        );

        if self.presented % LOG_INTERVAL_PAYLOADS == 0 {
            info!(
                "{} payloads rendered, {} history points, {}",
                self.presented,
                payload.series.time.len(),
                payload.scene.title,
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("CanSat ground station v{} starting...", env!("CARGO_PKG_VERSION"));

    // Optional config file path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(&path)?
        }
        None => Config::default(),
    };

    let mut station = GroundStation::new(&config, LogSink::new());
    let (cmd_tx, cmd_rx) = mpsc::channel(16);

    // Try the configured port once; on failure the simulator keeps running
    cmd_tx
        .send(Command::Connect(config.serial.clone()))
        .await?;

    info!(
        "Refreshing at {} Hz (history capacity {}); press Ctrl+C to exit",
        config.refresh.refresh_hz, config.history.capacity
    );

    let run = station.run(cmd_rx);
    tokio::pin!(run);

    tokio::select! {
        _ = &mut run => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            // Closing the command channel lets the dispatcher tear the
            // transport down and return on its own
            drop(cmd_tx);
            run.await;
        }
    }

    info!("Ground station stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cansat_ground::history::HistoryBuffer;
    use cansat_ground::render::build_payload;
    use cansat_ground::rotation::Mesh;
    use cansat_ground::state::TelemetryState;

    #[test]
    fn test_log_interval_constant() {
        // 5 seconds between status lines at the default 10 Hz
        assert_eq!(LOG_INTERVAL_PAYLOADS, 50);
    }

    #[test]
    fn test_log_sink_counts_payloads() {
        let mut sink = LogSink::new();
        let state = TelemetryState::new();
        let history = HistoryBuffer::new(10);
        let mesh = Mesh::cylinder(0.033, 0.115, 4, 2);
        let payload = build_payload(&state, &history, &mesh, 0.0);

        for _ in 0..3 {
            sink.present(&payload);
        }
        assert_eq!(sink.presented, 3);
    }
}
