//! # Ground Station Dispatcher
//!
//! Single cooperative event loop tying the pipeline together. One
//! `tokio::select!` multiplexes four triggers — decoded transport lines,
//! the refresh timer, the simulator timer, and user commands — so the
//! shared `TelemetryState` and `HistoryBuffer` are only ever touched from
//! one task and need no locking.
//!
//! Writer exclusivity is enforced by an explicit link state machine
//! rather than ad hoc timer juggling: the simulator branch is only armed
//! in `DisconnectedSimulating`, and live lines are only applied in
//! `ConnectedLive`, so at most one writer feeds the telemetry state in any
//! state. A transport failure is surfaced loudly, tears the link down, and
//! lands back in `DisconnectedSimulating` — the simulator is always the
//! fallback and no transport error ends the session.

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::{Config, SerialConfig};
use crate::frame;
use crate::history::HistoryBuffer;
use crate::recorder::LaunchRecorder;
use crate::render::{self, RenderSink};
use crate::rotation::Mesh;
use crate::simulator::Simulator;
use crate::state::TelemetryState;
use crate::transport::{SerialTransport, TransportEvent};

/// Floor on the refresh period regardless of the configured rate.
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_millis(10);

/// Capacity of the decoded-line channel between pump and dispatcher.
const TRANSPORT_CHANNEL_CAPACITY: usize = 64;

/// Wall clock as fractional seconds since epoch.
pub fn now_epoch_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Timer period for a refresh rate: `max(10 ms, 1000/hz ms)`.
pub fn refresh_period(hz: u32) -> Duration {
    let period = Duration::from_millis(1000 / u64::from(hz.max(1)));
    period.max(MIN_REFRESH_PERIOD)
}

/// Dispatcher timer whose first tick waits a full period, so installing a
/// new rate changes only the period and never fires an immediate extra
/// capture.
fn dispatcher_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// Connection lifecycle states. Transitions guarantee at most one writer
/// to the telemetry state at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No transport; the simulator drives the telemetry state
    DisconnectedSimulating,
    /// Transport open in progress; neither writer is active
    Connecting,
    /// Live transport is the sole writer
    ConnectedLive,
    /// Transport teardown in progress; neither writer is active
    Disconnecting,
}

/// User actions accepted by the running dispatcher.
#[derive(Debug)]
pub enum Command {
    /// Open a live transport (halting the simulator first)
    Connect(SerialConfig),
    /// Close the live transport and fall back to the simulator
    Disconnect,
    /// Replace the refresh timer with a new rate in Hz
    SetRate(u32),
    /// Toggle timer-driven history capture and rendering
    SetAutoRefresh(bool),
}

/// The ground-station context object: owns all pipeline state and runs the
/// dispatcher loop. Constructed by the application entry point; tests
/// instantiate isolated instances directly.
pub struct GroundStation<S: RenderSink> {
    link: LinkState,
    state: TelemetryState,
    history: HistoryBuffer,
    simulator: Simulator,
    mesh: Mesh,
    transport: Option<SerialTransport>,
    recorder: Option<LaunchRecorder>,
    sink: S,
    auto_refresh: bool,
    refresh_hz: u32,
}

impl<S: RenderSink> GroundStation<S> {
    pub fn new(config: &Config, sink: S) -> Self {
        Self {
            link: LinkState::DisconnectedSimulating,
            state: TelemetryState::new(),
            history: HistoryBuffer::new(config.history.capacity),
            simulator: Simulator::new(config.refresh.refresh_hz),
            mesh: Mesh::cansat_body(),
            transport: None,
            recorder: LaunchRecorder::from_config(&config.recorder),
            sink,
            auto_refresh: config.refresh.auto_refresh,
            refresh_hz: config.refresh.refresh_hz,
        }
    }

    pub fn link(&self) -> LinkState {
        self.link
    }

    pub fn state(&self) -> &TelemetryState {
        &self.state
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn refresh_hz(&self) -> u32 {
        self.refresh_hz
    }

    /// Dispatcher loop. Runs until the command channel closes, then tears
    /// the transport down and returns.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) {
        let (transport_tx, mut transport_rx) =
            mpsc::channel::<TransportEvent>(TRANSPORT_CHANNEL_CAPACITY);

        'rebuild: loop {
            let period = refresh_period(self.refresh_hz);
            let mut refresh_timer = dispatcher_timer(period);
            let mut sim_timer = dispatcher_timer(period);

            debug!(
                "Dispatcher timers installed: {} Hz ({:?} period)",
                self.refresh_hz, period
            );

            loop {
                tokio::select! {
                    event = transport_rx.recv() => {
                        // We hold a sender clone, so recv never yields None
                        if let Some(event) = event {
                            self.on_transport_event(event, now_epoch_secs()).await;
                        }
                    }

                    _ = refresh_timer.tick() => {
                        self.on_refresh_tick(now_epoch_secs());
                    }

                    _ = sim_timer.tick(),
                        if self.link == LinkState::DisconnectedSimulating => {
                        self.on_sim_tick(now_epoch_secs());
                    }

                    command = commands.recv() => {
                        match command {
                            Some(Command::Connect(serial)) => {
                                self.connect(&serial, transport_tx.clone()).await;
                            }
                            Some(Command::Disconnect) => {
                                self.disconnect().await;
                            }
                            Some(Command::SetRate(hz)) => {
                                if self.set_rate(hz) {
                                    continue 'rebuild;
                                }
                            }
                            Some(Command::SetAutoRefresh(enabled)) => {
                                self.auto_refresh = enabled;
                                info!("Auto-refresh {}", if enabled { "enabled" } else { "disabled" });
                            }
                            None => {
                                info!("Command channel closed, shutting down dispatcher");
                                self.disconnect().await;
                                return;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Open a live transport. The simulator is halted (via the state
    /// machine) before the device is claimed, so no simulated sample can
    /// land after the first live one.
    pub async fn connect(
        &mut self,
        serial: &SerialConfig,
        events: mpsc::Sender<TransportEvent>,
    ) {
        if self.transport.is_some() {
            warn!("Connect requested while a transport is already open, ignoring");
            return;
        }

        self.link = LinkState::Connecting;

        match SerialTransport::open(serial, events) {
            Ok(transport) => {
                info!("Live telemetry from {}", transport.device_path());
                self.transport = Some(transport);
                self.link = LinkState::ConnectedLive;
            }
            Err(e) => {
                // Visible failure: the UI re-enables its connect controls
                // and the simulator resumes
                error!("Failed to open transport: {}", e);
                self.link = LinkState::DisconnectedSimulating;
            }
        }
    }

    /// Close the live transport (if any) and fall back to the simulator.
    pub async fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            self.link = LinkState::Disconnecting;
            transport.close().await;
        }
        self.link = LinkState::DisconnectedSimulating;
    }

    /// Apply a new refresh rate. Returns true when the dispatcher timers
    /// must be rebuilt. History and telemetry state are untouched.
    pub fn set_rate(&mut self, hz: u32) -> bool {
        if hz < 1 {
            warn!("Ignoring refresh rate change to {} Hz (minimum 1)", hz);
            return false;
        }
        if hz == self.refresh_hz {
            return false;
        }

        info!("Refresh rate {} Hz -> {} Hz", self.refresh_hz, hz);
        self.refresh_hz = hz;
        self.simulator.set_rate(hz);
        true
    }

    async fn on_transport_event(&mut self, event: TransportEvent, now: f64) {
        match event {
            TransportEvent::Line(line) => {
                // A queued line from an already-closed transport must not
                // mutate state in a disconnected link
                if self.link == LinkState::ConnectedLive {
                    self.apply_live_line(&line, now);
                }
            }
            TransportEvent::Failed(reason) => {
                error!("Transport lost: {}", reason);
                self.disconnect().await;
            }
        }
    }

    /// Parse one live line and, when it is valid telemetry, apply it and
    /// refresh immediately. Returns true when the line was accepted.
    ///
    /// The immediate history push and render keep fresh data from waiting
    /// on the polling period; the refresh timer is a latency floor, not
    /// the only trigger.
    pub fn apply_live_line(&mut self, line: &str, now: f64) -> bool {
        let Some(parsed) = frame::parse_line(line) else {
            // Not telemetry; state stays untouched
            debug!("Skipping non-telemetry line: {}", line);
            return false;
        };

        let sample = parsed.into_sample(now);
        self.state.update(sample, now);
        self.history.push(&sample, now);

        // The launch file keeps records with actual fields only: a marker
        // line whose tokens all failed still updates the dashboard, but
        // does not belong in the flight log
        if !parsed.is_empty() {
            if let Some(recorder) = &mut self.recorder {
                if let Err(e) = recorder.record(&sample) {
                    warn!("Launch record write failed: {}", e);
                }
            }
        }

        self.present(now);
        true
    }

    /// Refresh timer tick: capture the current sample into history and
    /// rebuild the render payload, when auto-refresh is on.
    pub fn on_refresh_tick(&mut self, now: f64) {
        if !self.auto_refresh {
            return;
        }
        let current = *self.state.current();
        self.history.push(&current, now);
        self.present(now);
    }

    /// Simulator timer tick: synthesize the next sample into the telemetry
    /// state. History capture is left to the refresh tick.
    pub fn on_sim_tick(&mut self, now: f64) {
        if self.link != LinkState::DisconnectedSimulating {
            return;
        }
        let sample = self.simulator.tick(now);
        self.state.update(sample, now);
    }

    fn present(&mut self, now: f64) {
        let payload = render::build_payload(&self.state, &self.history, &self.mesh, now);
        self.sink.present(&payload);
    }
}
