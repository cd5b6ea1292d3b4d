//! # Telemetry Frame Module
//!
//! Wire protocol for CanSat telemetry lines.
//!
//! This module handles:
//! - The `TelemetrySample` data model (one instant's readings)
//! - Parsing line-oriented `KEY-VALUE` telemetry frames
//! - Distinguishing "field absent" from "field present with value 0"

pub mod parser;
pub mod sample;

pub use parser::parse_line;
pub use sample::{ParsedFrame, TelemetrySample};
