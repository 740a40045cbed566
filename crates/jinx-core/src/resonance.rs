//! Resonance rules — bands, drift, the breath-guard reset.
//! Pure functions; the console decides what to print.

/// Tunable frequencies, taken from [`Config`](crate::config::Config).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    pub grief_baseline: f64,
    pub target_hum: f64,
    pub coupling_constant: f64,
    pub dark_matter_hedge: f64,
}

/// 4-4-6 breath.
const BREATH_COUNTS: f64 = (4 + 4 + 6) as f64;

const BREATH_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Below 0.70
    Wobbling,
    /// 0.70 up to 0.95
    Close,
    /// 0.95 and above
    Arrival,
}

pub fn band(score: f64) -> Band {
    if score < 0.70 {
        Band::Wobbling
    } else if score < 0.95 {
        Band::Close
    } else {
        Band::Arrival
    }
}

/// Distance from the target hum, when it exceeds the hedge.
pub fn drift(score: f64, constants: &Constants) -> Option<f64> {
    let distance = (score - constants.target_hum).abs();
    (distance > constants.dark_matter_hedge).then_some(distance)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathOutcome {
    /// Resonance after the cycle.
    pub resonance: f64,
    /// The value the breath guard reports.
    pub reported: f64,
    /// Whether the guard had to step in.
    pub safeguarded: bool,
}

/// One breath cycle. Under the coupling constant, resonance climbs a step
/// toward the target hum (never past it) and the guard reports its reset
/// value; otherwise nothing changes.
pub fn breathe(resonance: f64, constants: &Constants) -> BreathOutcome {
    if resonance < constants.coupling_constant {
        BreathOutcome {
            resonance: constants.target_hum.min(resonance + BREATH_STEP),
            reported: BREATH_COUNTS * constants.grief_baseline,
            safeguarded: true,
        }
    } else {
        BreathOutcome {
            resonance,
            reported: resonance,
            safeguarded: false,
        }
    }
}

/// Parse a typed score. `None` for anything that is not a finite number in
/// [0.0, 1.0]; callers substitute their default.
pub fn parse_reported_score(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|s| (0.0..=1.0).contains(s))
}

pub fn mean(readings: &[f64]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    Some(readings.iter().sum::<f64>() / readings.len() as f64)
}
