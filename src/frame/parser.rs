//! # Telemetry Line Parser
//!
//! Parses one wire line into a `ParsedFrame`.
//!
//! Grammar (see the flight firmware's transmit format):
//!
//! ```text
//! Data: A-450.2; T-27.5; P-1013.0; X-5; Y-0; Z-0; YX-10; YY-0; YZ-0;
//! ```
//!
//! A line must contain the literal `Data` to count as telemetry at all. An
//! optional `Data:` prefix is stripped; the rest splits on `;` into trimmed
//! tokens, and each token splits on the first `-` into key and value. The
//! split on the *first* dash keeps negative values intact (`A--450.2` reads
//! as altitude -450.2). Unknown keys and unparsable values are skipped
//! silently; a bad token never invalidates the rest of the line.

use super::sample::ParsedFrame;

/// Marker that identifies a telemetry line.
const DATA_MARKER: &str = "Data";

/// Parse one raw line into a telemetry frame.
///
/// Returns `None` when the line carries no `Data` marker, meaning the line
/// is not telemetry and must not be applied as an update. A marker line
/// whose tokens all fail to parse still returns a frame (with every field
/// absent) — that distinction belongs to the caller.
pub fn parse_line(line: &str) -> Option<ParsedFrame> {
    let trimmed = line.trim();
    if !trimmed.contains(DATA_MARKER) {
        return None;
    }

    let body = trimmed
        .strip_prefix("Data:")
        .or_else(|| trimmed.strip_prefix(DATA_MARKER))
        .unwrap_or(trimmed);

    let mut frame = ParsedFrame::default();
    for token in body.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let Some((key, value)) = token.split_once('-') else {
            continue;
        };

        let Ok(value) = value.trim().parse::<f64>() else {
            continue;
        };

        // Exact key match: "Y" and "YX" are distinct keys, never prefixes.
        match key.trim() {
            "A" => frame.altitude = Some(value),
            "T" => frame.temperature = Some(value),
            "P" => frame.pressure = Some(value),
            "X" => frame.acc_x = Some(value),
            "Y" => frame.acc_y = Some(value),
            "Z" => frame.acc_z = Some(value),
            "YX" => frame.yaw_x = Some(value),
            "YY" => frame.yaw_y = Some(value),
            "YZ" => frame.yaw_z = Some(value),
            _ => {}
        }
    }

    Some(frame)
}
