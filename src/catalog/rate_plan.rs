use std::ops::{Range, RangeInclusive};

use serde::Serialize;

/// Hours billed at the mid-peak rate on banded plans.
pub const MID_PEAK_HOURS: Range<usize> = 8..16;
/// Hours billed at the peak rate on banded plans.
pub const PEAK_HOURS: Range<usize> = 16..22;
/// Critical window, inclusive at both ends (17:00 through 20:59).
pub const CRITICAL_HOURS: RangeInclusive<usize> = 17..=20;
/// Overnight band used by the real-time model.
pub const OVERNIGHT_HOURS: Range<usize> = 0..8;

/// Half-open price interval `[low, high)` in $/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price < self.high
    }
}

/// How a rate plan turns an hour of day into a $/kWh price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingPolicy {
    /// Fixed off-peak / mid-peak / peak bands.
    TimeOfUse {
        off_peak: f64,
        mid_peak: f64,
        peak: f64,
    },
    /// Banded like time-of-use, with a critical window overriding everything.
    CriticalPeak {
        off_peak: f64,
        mid_peak: f64,
        peak: f64,
        critical_peak: f64,
    },
    /// Uniform random draw inside an hour-dependent band.
    RealTime {
        critical: PriceBand,
        mid_day: PriceBand,
        overnight: PriceBand,
        evening: PriceBand,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePlan {
    pub id: &'static str,
    pub name: &'static str,
    pub policy: PricingPolicy,
}

impl RatePlan {
    /// Returns `true` for plans whose prices are drawn at random.
    pub fn is_real_time(&self) -> bool {
        matches!(self.policy, PricingPolicy::RealTime { .. })
    }
}

pub static RATE_PLANS: [RatePlan; 3] = [
    RatePlan {
        id: "tou",
        name: "Time-of-Use",
        policy: PricingPolicy::TimeOfUse {
            off_peak: 0.08,
            mid_peak: 0.12,
            peak: 0.20,
        },
    },
    RatePlan {
        id: "cpp",
        name: "Critical Peak Pricing",
        policy: PricingPolicy::CriticalPeak {
            off_peak: 0.07,
            mid_peak: 0.11,
            peak: 0.18,
            critical_peak: 0.75,
        },
    },
    RatePlan {
        id: "rtp",
        name: "Real-Time Pricing",
        policy: PricingPolicy::RealTime {
            critical: PriceBand {
                low: 0.45,
                high: 0.60,
            },
            mid_day: PriceBand {
                low: 0.18,
                high: 0.26,
            },
            overnight: PriceBand {
                low: 0.07,
                high: 0.10,
            },
            evening: PriceBand {
                low: 0.08,
                high: 0.12,
            },
        },
    },
];
