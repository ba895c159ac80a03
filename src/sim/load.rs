//! Deterministic load model: peak demand scaled by the class's hourly profile.

use crate::catalog::CustomerClass;

/// Instantaneous load (kW) of `class` at `hour` for a configured `peak_kw`.
///
/// An unset or non-positive peak falls back to the class minimum; that only
/// happens when configuration validation was bypassed.
pub fn load_at(hour: usize, class: &CustomerClass, peak_kw: Option<f64>) -> f64 {
    let peak = match peak_kw {
        Some(kw) if kw.is_finite() && kw > 0.0 => kw,
        _ => {
            log::warn!(
                "peak demand unset for class \"{}\", using class minimum {} kW",
                class.id,
                class.peak_min_kw
            );
            class.peak_min_kw
        }
    };
    peak * class.load_profile[hour % 24]
}

/// Base load for all 24 hours, for charting.
pub fn load_series(class: &CustomerClass, peak_kw: Option<f64>) -> [f64; 24] {
    std::array::from_fn(|hour| load_at(hour, class, peak_kw))
}
