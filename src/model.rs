/// Core data types for the Dungeness River flow monitor.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies beyond chrono —
/// only types.

use chrono::{DateTime, FixedOffset};

// ---------------------------------------------------------------------------
// Parameter codes
// ---------------------------------------------------------------------------

/// USGS parameter code for discharge (streamflow), in cubic feet per second.
pub const PARAM_DISCHARGE: &str = "00060";

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// The most recent instantaneous discharge measurement from the gauge.
///
/// Corresponds to the last entry of the innermost `value[]` array in a USGS
/// IV API response. Produced fresh on every poll; never persisted; owned by
/// the current poll cycle.
///
/// The timestamp keeps the feed's UTC offset (Pacific time for this gauge)
/// so display formatting does not depend on the host timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub flow_cfs: f64,
    pub timestamp: DateTime<FixedOffset>,
}

impl Reading {
    /// Formats the reading's timestamp for the panel, in the feed's own
    /// offset: `2026-01-19 08:15 AM`.
    pub fn timestamp_display(&self) -> String {
        self.timestamp.format("%Y-%m-%d %I:%M %p").to_string()
    }

    /// Formats the flow value with its unit suffix: `45.2 CFS`.
    /// Whole-number flows print without a trailing `.0`.
    pub fn flow_display(&self) -> String {
        format!("{} CFS", self.flow_cfs)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching the current reading from USGS NWIS.
///
/// All four kinds are non-fatal: the refresh loop converts each into an
/// inline error panel rather than crashing or showing stale data.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Non-2xx HTTP response from the USGS API.
    ServerError(u16),
    /// The feed responded but the innermost readings array was empty.
    EmptyData,
    /// The response JSON did not have the expected shape
    /// (missing key, absent index, unparseable value or timestamp).
    SchemaError(String),
    /// Transport-level failure: DNS, connection reset, timeout.
    NetworkError(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::ServerError(code) => write!(f, "Server error: HTTP {}", code),
            FetchError::EmptyData => write!(f, "No readings available from gauge"),
            FetchError::SchemaError(detail) => write!(f, "Unexpected response shape: {}", detail),
            FetchError::NetworkError(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
