/// Status panel rendering.
///
/// Pure string producers: every function here takes domain values and
/// returns styled terminal output. Nothing in this module performs I/O or
/// mutates a `Reading` or `StatusBand` — the refresh loop owns printing.
///
/// Band hex colors become 24-bit ANSI backgrounds; alert bands additionally
/// get the SGR slow-blink attribute for the pulsing treatment.

use crate::model::{FetchError, Reading};
use crate::status::{classify, StatusBand};

// ---------------------------------------------------------------------------
// Display payload
// ---------------------------------------------------------------------------

/// View model for one rendered panel: the matched band plus pre-formatted
/// text fields. Ephemeral — rebuilt from scratch on every cycle.
#[derive(Debug)]
pub struct DisplayPayload {
    pub band: &'static StatusBand,
    /// Raw flow value, kept for the gauge-bar geometry.
    pub flow_cfs: f64,
    /// e.g. "45.2 CFS"
    pub flow_text: String,
    /// e.g. "2026-01-19 08:15 AM"
    pub timestamp_text: String,
    pub gauge_id: String,
    /// Wall-clock caption for when this cycle ran, e.g. "14:30:05".
    pub checked_at: String,
}

/// Classifies the reading and assembles the payload for rendering.
pub fn build_payload(reading: &Reading, gauge_id: &str, checked_at: &str) -> DisplayPayload {
    DisplayPayload {
        band: classify(reading.flow_cfs),
        flow_cfs: reading.flow_cfs,
        flow_text: reading.flow_display(),
        timestamp_text: reading.timestamp_display(),
        gauge_id: gauge_id.to_string(),
        checked_at: checked_at.to_string(),
    }
}

// ---------------------------------------------------------------------------
// ANSI styling
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BLINK: &str = "\x1b[5m";
const BOLD: &str = "\x1b[1m";

/// Parses a `#RRGGBB` string; falls back to white on malformed input so a
/// bad table entry degrades visually instead of panicking mid-render.
fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    // Length check counts bytes, so require ASCII before byte-slicing:
    // a 6-byte multibyte string must fall back, not split a char.
    if digits.len() != 6 || !digits.is_ascii() {
        return (255, 255, 255);
    }
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Some(r), Some(g), Some(b)) => (r, g, b),
        _ => (255, 255, 255),
    }
}

fn background(hex: &str) -> String {
    let (r, g, b) = hex_to_rgb(hex);
    format!("\x1b[48;2;{};{};{}m", r, g, b)
}

// ---------------------------------------------------------------------------
// Gauge bar geometry
// ---------------------------------------------------------------------------

/// Full-scale bar covers 0–7000 CFS; flows above that pin the marker to the
/// right edge.
pub const TOTAL_SCALE_CFS: f64 = 7000.0;

/// Character cells per bar.
const BAR_WIDTH: usize = 56;

/// Marker position (percent of bar width) for a flow on the 0–7000 scale.
pub fn total_scale_percent(flow_cfs: f64) -> f64 {
    ((flow_cfs / TOTAL_SCALE_CFS) * 100.0).clamp(0.0, 100.0)
}

/// Marker position within the matched band, plus the upper bound used for
/// the axis label. The open-ended top band widens its displayed range to
/// `max(7000, flow × 1.1)` so the marker always lands inside the bar.
pub fn band_scale(flow_cfs: f64, band: &StatusBand) -> (f64, f64) {
    let display_upper = match band.upper_cfs {
        Some(upper) => upper,
        None => TOTAL_SCALE_CFS.max(flow_cfs * 1.1),
    };
    let span = display_upper - band.lower_cfs;
    let percent = if span > 0.0 {
        (((flow_cfs - band.lower_cfs) / span) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    (percent, display_upper)
}

/// One row of colored cells, each band's width proportional to its share of
/// the 0–7000 scale (the open-ended band renders its 6200–7000 slice).
fn total_scale_strip() -> String {
    use crate::status::STATUS_BANDS;
    let mut strip = String::new();
    let mut cells_used = 0usize;
    for band in STATUS_BANDS {
        let upper = band.upper_cfs.unwrap_or(TOTAL_SCALE_CFS).min(TOTAL_SCALE_CFS);
        let end_cell = ((upper / TOTAL_SCALE_CFS) * BAR_WIDTH as f64).round() as usize;
        let width = end_cell.saturating_sub(cells_used);
        strip.push_str(&background(band.color));
        for _ in 0..width {
            strip.push(' ');
        }
        cells_used = end_cell;
    }
    strip.push_str(RESET);
    strip
}

/// A marker row with `▼` at the given percent of the bar width.
fn marker_row(percent: f64) -> String {
    let cell = ((percent / 100.0) * (BAR_WIDTH - 1) as f64).round() as usize;
    let mut row = String::new();
    for i in 0..BAR_WIDTH {
        row.push(if i == cell { '▼' } else { ' ' });
    }
    row
}

/// Trims a float axis label: whole numbers print without decimals.
fn axis_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ---------------------------------------------------------------------------
// Panel rendering
// ---------------------------------------------------------------------------

/// Renders the full status panel: colored headline block, reading details,
/// and the two gauge bars. The blink attribute is applied to the headline
/// block only when the band is flagged as an alert.
pub fn render_panel(payload: &DisplayPayload) -> String {
    let bg = background(payload.band.color);
    let pulse = if payload.band.is_alert { BLINK } else { "" };
    let pad = |text: &str| format!("{:^width$}", text, width = BAR_WIDTH);

    let mut out = String::new();

    // Headline block in the band color.
    out.push_str(&format!("{}{}{}{}{}\n", pulse, bg, BOLD, pad(payload.band.label), RESET));
    out.push_str(&format!(
        "{}{}{}{}{}\n",
        pulse,
        bg,
        BOLD,
        pad(&format!("Current Flow: {}", payload.flow_text)),
        RESET
    ));
    out.push_str(&format!(
        "{}{}{}{}\n",
        pulse,
        bg,
        pad(&format!("Last Updated: {}", payload.timestamp_text)),
        RESET
    ));
    out.push_str(&format!(
        "{}{}{}{}\n",
        pulse,
        bg,
        pad(&format!("USGS Gauge: {}", payload.gauge_id)),
        RESET
    ));
    out.push('\n');

    // Total-scale bar: where the flow sits across all bands.
    out.push_str(&format!("{}\n", pad("Categories of Total River Flow")));
    out.push_str(&format!("{}\n", marker_row(total_scale_percent(payload.flow_cfs))));
    out.push_str(&format!("{}\n", total_scale_strip()));
    out.push_str(&format!(
        "{:<width$}\n",
        format!("0 CFS{:>rest$}", format!("{} CFS", axis_label(TOTAL_SCALE_CFS)), rest = BAR_WIDTH - 5),
        width = BAR_WIDTH
    ));
    out.push('\n');

    // Within-band bar: where the flow sits inside its matched band.
    let (band_percent, display_upper) = band_scale(payload.flow_cfs, payload.band);
    out.push_str(&format!("{}\n", pad("Position Within Current Band")));
    out.push_str(&format!("{}\n", marker_row(band_percent)));
    out.push_str(&format!("{}{}{}\n", bg, " ".repeat(BAR_WIDTH), RESET));
    let lower_label = format!("{} CFS", axis_label(payload.band.lower_cfs));
    let upper_label = format!("{} CFS", axis_label(display_upper));
    out.push_str(&format!(
        "{}{:>rest$}\n",
        lower_label,
        upper_label,
        rest = BAR_WIDTH - lower_label.len()
    ));
    out.push('\n');

    out.push_str(&format!("Checked USGS servers at: {}\n", payload.checked_at));
    out
}

/// Renders the inline error panel shown when a fetch fails. Contains the
/// failure reason and the manual-retry control; the panel never shows stale
/// data alongside an error.
pub fn render_error(error: &FetchError, checked_at: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}{}{:^width$}{}\n",
        background("#8B0000"),
        BOLD,
        "DATA UNAVAILABLE",
        RESET,
        width = BAR_WIDTH
    ));
    out.push_str(&format!("Error fetching data: {}\n", error));
    out.push_str("[Force Reconnect] press Enter to retry immediately\n");
    out.push_str(&format!("Checked USGS servers at: {}\n", checked_at));
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
