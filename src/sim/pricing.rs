//! Hourly price model for the three rate plan policies.
//!
//! Banded plans are pure functions of the hour. Real-time prices are a fresh
//! uniform draw on every call to [`price_at`]: repeated calls for the same hour
//! may differ. The engine therefore prices each hour once through a
//! [`PriceCache`], so the chart preview, the costing, and the high-price event
//! check of one hour all see the same value.

use rand::Rng;

use crate::catalog::rate_plan::{CRITICAL_HOURS, MID_PEAK_HOURS, OVERNIGHT_HOURS, PEAK_HOURS};
use crate::catalog::{self, PriceBand, PricingPolicy, RatePlan};

/// Returns the $/kWh price of `hour` under `plan`.
///
/// `rng` is only consulted for real-time plans.
pub fn price_at<R: Rng>(hour: usize, plan: &RatePlan, rng: &mut R) -> f64 {
    match plan.policy {
        PricingPolicy::TimeOfUse {
            off_peak,
            mid_peak,
            peak,
        } => banded(hour, off_peak, mid_peak, peak),
        PricingPolicy::CriticalPeak {
            off_peak,
            mid_peak,
            peak,
            critical_peak,
        } => {
            if CRITICAL_HOURS.contains(&hour) {
                critical_peak
            } else {
                banded(hour, off_peak, mid_peak, peak)
            }
        }
        PricingPolicy::RealTime {
            critical,
            mid_day,
            overnight,
            evening,
        } => {
            let band = band_for(hour, critical, mid_day, overnight, evening);
            rng.random_range(band.low..band.high)
        }
    }
}

/// Looks up `plan_id` and prices `hour`, falling back to `fallback` for unknown ids.
///
/// The fallback is a silent recovery: an unknown id means validation was
/// bypassed upstream.
pub fn price_for_plan_id<R: Rng>(
    hour: usize,
    plan_id: &str,
    fallback: f64,
    rng: &mut R,
) -> f64 {
    match catalog::rate_plan(plan_id) {
        Some(plan) => price_at(hour, plan, rng),
        None => {
            log::warn!("unknown rate plan \"{plan_id}\", pricing hour {hour} at {fallback}");
            fallback
        }
    }
}

/// Prices all 24 hours of a day. Real-time values are fresh draws.
pub fn price_series<R: Rng>(plan: &RatePlan, rng: &mut R) -> [f64; 24] {
    std::array::from_fn(|hour| price_at(hour, plan, &mut *rng))
}

/// The real-time band covering `hour`, or `None` if `plan` is not real-time.
pub fn real_time_band(hour: usize, plan: &RatePlan) -> Option<PriceBand> {
    let PricingPolicy::RealTime {
        critical,
        mid_day,
        overnight,
        evening,
    } = plan.policy
    else {
        return None;
    };
    Some(band_for(hour, critical, mid_day, overnight, evening))
}

fn band_for(
    hour: usize,
    critical: PriceBand,
    mid_day: PriceBand,
    overnight: PriceBand,
    evening: PriceBand,
) -> PriceBand {
    if CRITICAL_HOURS.contains(&hour) {
        critical
    } else if MID_PEAK_HOURS.contains(&hour) {
        mid_day
    } else if OVERNIGHT_HOURS.contains(&hour) {
        overnight
    } else {
        evening
    }
}

fn banded(hour: usize, off_peak: f64, mid_peak: f64, peak: f64) -> f64 {
    if MID_PEAK_HOURS.contains(&hour) {
        mid_peak
    } else if PEAK_HOURS.contains(&hour) {
        peak
    } else {
        off_peak
    }
}

/// One price per hour of the current day, each drawn at most once.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    slots: [Option<f64>; 24],
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached price of `hour`, drawing and storing it on first use.
    ///
    /// The plan is resolved by id against the catalog; an id the catalog does
    /// not know is priced at `fallback`.
    pub fn price<R: Rng>(
        &mut self,
        hour: usize,
        plan: &RatePlan,
        fallback: f64,
        rng: &mut R,
    ) -> f64 {
        let slot = &mut self.slots[hour % 24];
        *slot.get_or_insert_with(|| price_for_plan_id(hour, plan.id, fallback, &mut *rng))
    }

    /// The already-realized price of `hour`, if any.
    pub fn get(&self, hour: usize) -> Option<f64> {
        self.slots[hour % 24]
    }

    /// Fills every slot and returns the whole day.
    pub fn series<R: Rng>(&mut self, plan: &RatePlan, fallback: f64, rng: &mut R) -> [f64; 24] {
        std::array::from_fn(|hour| self.price(hour, plan, fallback, &mut *rng))
    }

    /// Forgets every drawn price; called at day rollover.
    pub fn clear(&mut self) {
        self.slots = [None; 24];
    }
}
