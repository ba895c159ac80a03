//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

use crate::sim::types::DrStatus;

/// Base load line color.
pub const LOAD_COLOR: Color = Color::Cyan;
/// Curtailed load line color.
pub const CURTAIL_COLOR: Color = Color::Green;
/// Price line color.
pub const PRICE_COLOR: Color = Color::Yellow;
/// Satisfaction gauge color when high (>= 85%).
pub const SAT_HIGH: Color = Color::Green;
/// Satisfaction gauge color when medium (>= 70%).
pub const SAT_MID: Color = Color::Yellow;
/// Satisfaction gauge color when low (< 70%).
pub const SAT_LOW: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Grid event indicator color.
pub const EVENT_ACTIVE: Color = Color::Magenta;
/// Focused slider color.
pub const SELECTED: Color = Color::LightBlue;
/// Error line color.
pub const ERROR_FG: Color = Color::Red;

/// Returns a color based on customer satisfaction (%).
pub fn satisfaction_color(satisfaction: u32) -> Color {
    if satisfaction >= 85 {
        SAT_HIGH
    } else if satisfaction >= 70 {
        SAT_MID
    } else {
        SAT_LOW
    }
}

pub fn dr_status_color(status: DrStatus) -> Color {
    match status {
        DrStatus::Ready => FOOTER_FG,
        DrStatus::Active => Color::Yellow,
        DrStatus::HighResponse => EVENT_ACTIVE,
    }
}

/// Computes Y-axis bounds from chart data points with 10% headroom, floored at zero.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let max = series
        .iter()
        .flat_map(|s| s.iter().map(|&(_, y)| y))
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return [0.0, 1.0];
    }
    [0.0, max * 1.1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pad_the_maximum() {
        let a = [(0.0, 1.0), (1.0, 4.0)];
        let b = [(0.0, 2.0)];
        let bounds = auto_bounds_y(&[a.as_slice(), b.as_slice()]);
        assert_eq!(bounds[0], 0.0);
        assert!((bounds[1] - 4.4).abs() < 1e-12);
        assert_eq!(auto_bounds_y(&[]), [0.0, 1.0]);
    }

    #[test]
    fn satisfaction_bands() {
        assert_eq!(satisfaction_color(100), SAT_HIGH);
        assert_eq!(satisfaction_color(72), SAT_MID);
        assert_eq!(satisfaction_color(60), SAT_LOW);
    }
}
