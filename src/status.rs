/// Flow severity bands for the Dungeness River gauge.
///
/// Defines the canonical eight-band classification of discharge values and
/// the `classify` function that maps a flow reading onto it. This is the
/// single source of truth for thresholds, labels, and colors — the renderer
/// reads bands from here rather than hardcoding any of them.
///
/// Sources:
///   - Low-flow thresholds: WA Dept. of Ecology instream flow rule for the
///     Dungeness (salmon protection / withdrawal curtailment levels).
///   - Flood thresholds: NWS flood categories for the gauge.

// ---------------------------------------------------------------------------
// Band table
// ---------------------------------------------------------------------------

/// One contiguous flow range mapped to a status, a panel color, and an
/// alert flag.
///
/// Ranges are `(lower_cfs, upper_cfs]` with the upper bound inclusive;
/// `upper_cfs == None` marks the open-ended top band. The table below is
/// ordered ascending, contiguous, and exhaustive over [0, ∞): every
/// non-negative flow matches exactly one band.
#[derive(Debug, PartialEq)]
pub struct StatusBand {
    pub lower_cfs: f64,
    pub upper_cfs: Option<f64>,
    /// Panel background color, hex RGB.
    pub color: &'static str,
    pub label: &'static str,
    /// Alert bands get a pulsing visual treatment on the panel.
    pub is_alert: bool,
}

/// All severity bands, ascending by flow.
///
/// Only the two extremes carry the alert flag: extremely low flow endangers
/// the salmon run, extreme flooding may require evacuation. Everything in
/// between is informational.
pub static STATUS_BANDS: &[StatusBand] = &[
    StatusBand {
        lower_cfs: 0.0,
        upper_cfs: Some(62.5),
        color: "#FF0000",
        label: "Extremely Low – Salmon Endangered",
        is_alert: true,
    },
    StatusBand {
        lower_cfs: 62.5,
        upper_cfs: Some(120.0),
        color: "#FFBF00",
        label: "Critically Low – Withdrawals Reduced",
        is_alert: false,
    },
    StatusBand {
        lower_cfs: 120.0,
        upper_cfs: Some(238.0),
        color: "#FFFF00",
        label: "Low Flow – Conserve",
        is_alert: false,
    },
    StatusBand {
        lower_cfs: 238.0,
        upper_cfs: Some(582.0),
        color: "#0099FF",
        label: "Adequate Flow",
        is_alert: false,
    },
    StatusBand {
        lower_cfs: 582.0,
        upper_cfs: Some(2700.0),
        color: "#800080",
        label: "High Flow",
        is_alert: false,
    },
    StatusBand {
        lower_cfs: 2700.0,
        upper_cfs: Some(4275.0),
        color: "#FFBF00",
        label: "Flood Alert",
        is_alert: false,
    },
    StatusBand {
        lower_cfs: 4275.0,
        upper_cfs: Some(6200.0),
        color: "#FF0000",
        label: "Minor to Moderate Flood",
        is_alert: false,
    },
    StatusBand {
        lower_cfs: 6200.0,
        upper_cfs: None,
        color: "#8B0000",
        label: "Extreme Flooding",
        is_alert: true,
    },
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Maps a discharge value onto its severity band.
///
/// Total and deterministic: linear scan in ascending order, first band whose
/// upper bound covers the flow wins, and the open-ended top band catches
/// everything else. Boundary values belong to the lower band (62.5 CFS is
/// still "Extremely Low", 62.6 is not).
pub fn classify(flow_cfs: f64) -> &'static StatusBand {
    for band in STATUS_BANDS {
        match band.upper_cfs {
            Some(upper) if flow_cfs <= upper => return band,
            Some(_) => continue,
            None => return band,
        }
    }
    // The table ends with an unbounded band, so the loop always returns.
    unreachable!("STATUS_BANDS must end with an open-ended band")
}
