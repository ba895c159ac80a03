//! Tunable policy constants for accounting, comfort, events, and achievements.
//!
//! Defaults give the stock game balance. A scenario file may override
//! any field through its `[policy]` table.

use serde::{Deserialize, Serialize};

use crate::catalog::ComfortImpact;

/// Grid marginal emissions factor (kg CO2 per kWh curtailed).
pub const EMISSIONS_FACTOR_KG_PER_KWH: f64 = 0.35;
/// Satisfaction at the start of every run (%).
pub const INITIAL_SATISFACTION: u32 = 100;
/// Satisfaction never drops below this (%).
pub const SATISFACTION_FLOOR: u32 = 60;
/// Real-time price above which an hour raises a high-price event ($/kWh).
pub const HIGH_PRICE_THRESHOLD: f64 = 0.40;
/// Price charged when a plan id cannot be resolved ($/kWh).
pub const FALLBACK_PRICE: f64 = 0.10;

/// Penalty applied per technology when effective curtailment exceeds `above_pct`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComfortRule {
    /// Effective curtailment (%) that must be strictly exceeded.
    pub above_pct: f64,
    /// Satisfaction points deducted.
    pub penalty: u32,
}

/// Comfort rules per impact class. `None`-impact technologies never penalize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComfortPolicy {
    pub high: ComfortRule,
    pub medium: ComfortRule,
    pub low: ComfortRule,
}

impl Default for ComfortPolicy {
    fn default() -> Self {
        Self {
            high: ComfortRule {
                above_pct: 15.0,
                penalty: 10,
            },
            medium: ComfortRule {
                above_pct: 20.0,
                penalty: 6,
            },
            low: ComfortRule {
                above_pct: 30.0,
                penalty: 3,
            },
        }
    }
}

impl ComfortPolicy {
    /// Points deducted for one technology of `impact` at `effective_pct` curtailment.
    pub fn penalty(&self, impact: ComfortImpact, effective_pct: f64) -> u32 {
        let rule = match impact {
            ComfortImpact::High => self.high,
            ComfortImpact::Medium => self.medium,
            ComfortImpact::Low => self.low,
            ComfortImpact::None => return 0,
        };
        if effective_pct > rule.above_pct {
            rule.penalty
        } else {
            0
        }
    }
}

/// Achievement unlock thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AchievementPolicy {
    /// Cumulative savings ($) for "First $100 Saved".
    pub savings_milestone: f64,
    /// Emissions saved (kg) for "Eco Warrior".
    pub eco_warrior_kg: f64,
    /// Day counter for "Week Veteran".
    pub veteran_day: u32,
    /// Minimum satisfaction (%) for "Perfect Balance".
    pub balance_satisfaction: u32,
    /// Minimum cumulative savings ($) for "Perfect Balance".
    pub balance_savings: f64,
}

impl Default for AchievementPolicy {
    fn default() -> Self {
        Self {
            savings_milestone: 100.0,
            eco_warrior_kg: 50.0,
            veteran_day: 7,
            balance_satisfaction: 95,
            balance_savings: 50.0,
        }
    }
}

/// Every numeric policy knob of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    pub emissions_factor_kg_per_kwh: f64,
    pub initial_satisfaction: u32,
    pub satisfaction_floor: u32,
    pub high_price_threshold: f64,
    pub fallback_price: f64,
    pub comfort: ComfortPolicy,
    pub achievements: AchievementPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            emissions_factor_kg_per_kwh: EMISSIONS_FACTOR_KG_PER_KWH,
            initial_satisfaction: INITIAL_SATISFACTION,
            satisfaction_floor: SATISFACTION_FLOOR,
            high_price_threshold: HIGH_PRICE_THRESHOLD,
            fallback_price: FALLBACK_PRICE,
            comfort: ComfortPolicy::default(),
            achievements: AchievementPolicy::default(),
        }
    }
}

impl Policy {
    /// Applies the summed comfort penalty to `satisfaction`, holding the floor.
    pub fn apply_penalty(&self, satisfaction: u32, total_penalty: u32) -> u32 {
        satisfaction
            .saturating_sub(total_penalty)
            .max(self.satisfaction_floor)
    }
}
