//! # Transport Module
//!
//! Owns the byte stream from the live serial link.
//!
//! This module handles:
//! - Opening the serial port with 8N1 framing at a configured baud rate
//! - An async pump task that reads byte chunks and assembles complete lines
//! - Delivering lines (and the read loop's terminal failure) to the
//!   station dispatcher over a channel
//! - Prompt, idempotent close that cancels the pending read and releases
//!   the device
//!
//! The pump never parses: a partially buffered line stays in the assembler
//! until its `\n` arrives, and grammar concerns live in `frame::parser`.

pub mod line_assembler;

pub use line_assembler::LineAssembler;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::config::{SerialConfig, SUPPORTED_BAUD_RATES};
use crate::error::{GroundError, Result};

/// Read chunk size for the pump loop.
const READ_CHUNK_BYTES: usize = 512;

/// What the transport delivers to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// One complete decoded line, newline stripped
    Line(String),
    /// The read loop terminated: device error or end of stream. The
    /// transport is unusable afterwards and the station falls back to the
    /// simulator.
    Failed(String),
}

/// Live serial transport with an independent open/close lifecycle.
///
/// Opening spawns a pump task that owns the port; closing signals the pump
/// and waits for it to exit, which drops the port handle and releases the
/// device.
pub struct SerialTransport {
    device_path: String,
    shutdown: watch::Sender<bool>,
    pump_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl SerialTransport {
    /// Open the configured device and start pumping lines into `events`.
    ///
    /// # Errors
    ///
    /// Returns `GroundError::UnsupportedBaudRate` when the configured rate
    /// is not offered by the port chooser, or `GroundError::Transport`
    /// when the device cannot be claimed.
    pub fn open(config: &SerialConfig, events: mpsc::Sender<TransportEvent>) -> Result<Self> {
        if !SUPPORTED_BAUD_RATES.contains(&config.baud_rate) {
            return Err(GroundError::UnsupportedBaudRate(config.baud_rate));
        }

        debug!("Opening serial port {} at {} baud", config.port, config.baud_rate);

        let port = tokio_serial::new(&config.port, config.baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                GroundError::Transport(format!("failed to open {}: {}", config.port, e))
            })?;

        info!("Serial transport open on {}", config.port);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pump_task = tokio::spawn(pump_lines(port, events, shutdown_rx));

        Ok(Self {
            device_path: config.port.clone(),
            shutdown: shutdown_tx,
            pump_task: Some(pump_task),
        })
    }

    /// Cancel the pending read and release the device.
    ///
    /// Safe to call more than once; later calls are no-ops.
    pub async fn close(&mut self) {
        let _ = self.shutdown.send(true);

        if let Some(task) = self.pump_task.take() {
            // The pump owns the port handle; waiting for it guarantees the
            // device is released before close() returns.
            if task.await.is_err() {
                warn!("Transport pump task panicked during close");
            }
            info!("Serial transport on {} closed", self.device_path);
        }
    }

    /// Device path of the opened serial port.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

/// Drain a byte stream into complete lines until shutdown, EOF, or a read
/// error.
///
/// Generic over the reader so tests can drive it with an in-memory stream;
/// production hands it the serial port. Terminal conditions are reported as
/// a final `TransportEvent::Failed` rather than a return value, since by
/// then nobody is awaiting the task.
pub async fn pump_lines<R>(
    mut reader: R,
    events: mpsc::Sender<TransportEvent>,
    mut shutdown: watch::Receiver<bool>,
) where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut assembler = LineAssembler::new();
    let mut chunk = [0u8; READ_CHUNK_BYTES];

    loop {
        tokio::select! {
            result = reader.read(&mut chunk) => {
                match result {
                    Ok(0) => {
                        send_or_shutdown(
                            &events,
                            TransportEvent::Failed("device closed the stream".to_string()),
                            &mut shutdown,
                        )
                        .await;
                        return;
                    }
                    Ok(n) => {
                        for line in assembler.feed(&chunk[..n]) {
                            debug!("Transport line: {}", line);
                            if !send_or_shutdown(
                                &events,
                                TransportEvent::Line(line),
                                &mut shutdown,
                            )
                            .await
                            {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        send_or_shutdown(
                            &events,
                            TransportEvent::Failed(format!("read failed: {}", e)),
                            &mut shutdown,
                        )
                        .await;
                        return;
                    }
                }
            }
            _ = shutdown.changed() => {
                debug!("Transport pump shutting down");
                return;
            }
        }
    }
}

/// Deliver one event unless shutdown preempts the send.
///
/// `close()` awaits the pump while the dispatcher may have stopped
/// draining the channel, so a send blocked on a full channel must still
/// observe the shutdown signal. Returns false when the pump should stop
/// (shutdown signaled or the receiver is gone).
async fn send_or_shutdown(
    events: &mpsc::Sender<TransportEvent>,
    event: TransportEvent,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    tokio::select! {
        result = events.send(event) => result.is_ok(),
        _ = shutdown.changed() => {
            debug!("Transport pump shutting down");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_baud_rate_rejected_before_device_open() {
        let (tx, _rx) = mpsc::channel(8);
        let config = SerialConfig {
            port: "/dev/null".to_string(),
            baud_rate: 7,
        };

        match SerialTransport::open(&config, tx) {
            Err(GroundError::UnsupportedBaudRate(rate)) => assert_eq!(rate, 7),
            other => panic!("Expected UnsupportedBaudRate, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_open_with_missing_device_returns_transport_error() {
        let (tx, _rx) = mpsc::channel(8);
        let config = SerialConfig {
            port: "/dev/nonexistent_cansat_port_12345".to_string(),
            baud_rate: 115200,
        };

        match SerialTransport::open(&config, tx) {
            Err(GroundError::Transport(msg)) => {
                assert!(msg.contains("/dev/nonexistent_cansat_port_12345"));
            }
            other => panic!("Expected Transport error, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_pump_delivers_lines_across_chunk_boundaries() {
        let reader = tokio_test::io::Builder::new()
            .read(b"Data: A-1;\nDa")
            .read(b"ta: T-2;\npartial")
            .build();

        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        pump_lines(reader, tx, shutdown_rx).await;

        assert_eq!(
            rx.recv().await,
            Some(TransportEvent::Line("Data: A-1;".to_string()))
        );
        assert_eq!(
            rx.recv().await,
            Some(TransportEvent::Line("Data: T-2;".to_string()))
        );
        // EOF surfaces as a failure; the partial tail is never delivered
        match rx.recv().await {
            Some(TransportEvent::Failed(_)) => {}
            other => panic!("Expected Failed event, got: {:?}", other),
        }
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_pump_reports_read_error() {
        let reader = tokio_test::io::Builder::new()
            .read(b"Data: A-1;\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged"))
            .build();

        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        pump_lines(reader, tx, shutdown_rx).await;

        assert_eq!(
            rx.recv().await,
            Some(TransportEvent::Line("Data: A-1;".to_string()))
        );
        match rx.recv().await {
            Some(TransportEvent::Failed(msg)) => assert!(msg.contains("unplugged")),
            other => panic!("Expected Failed event, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_send_into_full_channel() {
        let reader = tokio_test::io::Builder::new()
            .read(b"Data: A-1;\nData: A-2;\nData: A-3;\n")
            .wait(std::time::Duration::from_secs(3600))
            .build();

        // Capacity 1 and a receiver that never drains: the first line
        // fills the channel and the second send blocks
        let (tx, rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pump = tokio::spawn(pump_lines(reader, tx, shutdown_rx));

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        // close() awaits the pump exactly like this; a blocked send must
        // not keep it parked
        tokio::time::timeout(std::time::Duration::from_secs(2), pump)
            .await
            .expect("pump must exit while its channel is full")
            .unwrap();
        drop(rx);
    }

    #[tokio::test]
    async fn test_pump_stops_on_shutdown_signal() {
        // A reader that never resolves keeps the pump parked on its read
        let reader = tokio_test::io::Builder::new()
            .wait(std::time::Duration::from_secs(3600))
            .build();

        let (tx, mut rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pump = tokio::spawn(pump_lines(reader, tx, shutdown_rx));

        shutdown_tx.send(true).unwrap();
        pump.await.unwrap();

        assert_eq!(rx.recv().await, None, "no events after cancelled read");
    }
}
