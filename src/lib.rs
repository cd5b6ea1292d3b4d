//! # CanSat Ground Station Core
//!
//! Real-time telemetry ground-station pipeline: ingests a line-oriented
//! text protocol from a serial link (or a built-in simulator), parses it
//! into typed samples, keeps a bounded rolling history for trend charts,
//! reconstructs 3D attitude from yaw angles, and drives the render layer
//! at a refresh rate independent of how fast data arrives.

pub mod config;
pub mod error;
pub mod frame;
pub mod history;
pub mod recorder;
pub mod render;
pub mod rotation;
pub mod simulator;
pub mod state;
pub mod station;
pub mod transport;
