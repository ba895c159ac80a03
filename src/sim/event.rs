use std::fmt;

use serde::Serialize;

use crate::catalog::rate_plan::{CRITICAL_HOURS, PEAK_HOURS};
use crate::catalog::{PricingPolicy, RatePlan};

/// A grid condition signalled to the customer for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridEvent {
    /// Critical-peak plan inside its critical window.
    CriticalPeak,
    /// Time-of-use plan inside the peak band.
    PeakHours,
    /// Real-time price above the high-price threshold.
    HighPrice,
}

impl fmt::Display for GridEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::CriticalPeak => "Critical Peak Event Active!",
            Self::PeakHours => "Peak Hours - Demand Response Opportunity",
            Self::HighPrice => "High Price Alert - Grid Stress Event",
        };
        f.write_str(msg)
    }
}

/// An event that fired at a given hour of the current day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventRecord {
    pub hour: usize,
    pub event: GridEvent,
}

/// Detects the event, if any, for `hour` under `plan`.
///
/// `price` must be the price already realized for this hour so that a
/// real-time plan's event agrees with the price it was costed at.
pub fn event_at(
    hour: usize,
    plan: &RatePlan,
    price: f64,
    high_price_threshold: f64,
) -> Option<GridEvent> {
    match plan.policy {
        PricingPolicy::CriticalPeak { .. } if CRITICAL_HOURS.contains(&hour) => {
            Some(GridEvent::CriticalPeak)
        }
        PricingPolicy::TimeOfUse { .. } if PEAK_HOURS.contains(&hour) => Some(GridEvent::PeakHours),
        PricingPolicy::RealTime { .. } if price > high_price_threshold => {
            Some(GridEvent::HighPrice)
        }
        _ => None,
    }
}
