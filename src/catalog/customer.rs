use serde::Serialize;

/// A customer segment with its demand envelope and eligible DR technologies.
///
/// `load_profile` holds one multiplier per hour of day, each in `[0, 1]`,
/// scaling the configured peak demand into instantaneous load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerClass {
    pub id: &'static str,
    pub name: &'static str,
    /// Lower bound of configurable peak demand (kW).
    pub peak_min_kw: f64,
    /// Upper bound of configurable peak demand (kW).
    pub peak_max_kw: f64,
    /// Technology ids this class may enroll, in display order.
    pub technologies: &'static [&'static str],
    /// Class-wide structural curtailment ceiling (%).
    pub max_curtail_pct: f64,
    pub load_profile: [f64; 24],
}

impl CustomerClass {
    /// Returns `true` if `technology_id` is in this class's eligible list.
    pub fn is_eligible(&self, technology_id: &str) -> bool {
        self.technologies.contains(&technology_id)
    }

    /// Returns `true` if `peak_kw` lies within `[peak_min_kw, peak_max_kw]`.
    pub fn accepts_peak(&self, peak_kw: f64) -> bool {
        peak_kw.is_finite() && peak_kw >= self.peak_min_kw && peak_kw <= self.peak_max_kw
    }
}

pub static CUSTOMER_CLASSES: [CustomerClass; 4] = [
    CustomerClass {
        id: "residential",
        name: "Residential",
        peak_min_kw: 2.0,
        peak_max_kw: 8.0,
        technologies: &["smart_thermostat", "ev_charging", "water_heater", "pool_pump"],
        max_curtail_pct: 30.0,
        load_profile: [
            0.3, 0.25, 0.2, 0.2, 0.25, 0.4, 0.6, 0.8, 0.7, 0.6, 0.7, 0.8, 0.9, 0.95, 1.0, 0.95, 0.9,
            1.0, 1.0, 0.95, 0.8, 0.7, 0.5, 0.4,
        ],
    },
    CustomerClass {
        id: "commercial",
        name: "Commercial",
        peak_min_kw: 50.0,
        peak_max_kw: 500.0,
        technologies: &[
            "hvac_control",
            "lighting_control",
            "equipment_cycling",
            "battery_storage",
        ],
        max_curtail_pct: 25.0,
        load_profile: [
            0.2, 0.15, 0.1, 0.1, 0.15, 0.3, 0.6, 0.8, 0.9, 0.95, 1.0, 0.95, 0.9, 0.95, 1.0, 0.95,
            0.9, 0.8, 0.6, 0.4, 0.3, 0.25, 0.2, 0.2,
        ],
    },
    CustomerClass {
        id: "industrial",
        name: "Industrial",
        peak_min_kw: 500.0,
        peak_max_kw: 5000.0,
        technologies: &[
            "process_control",
            "motor_drives",
            "compressed_air",
            "thermal_storage",
        ],
        max_curtail_pct: 20.0,
        load_profile: [
            0.9, 0.85, 0.8, 0.8, 0.85, 0.9, 0.95, 1.0, 1.0, 1.0, 1.0, 1.0, 0.95, 1.0, 1.0, 1.0, 1.0,
            0.95, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9,
        ],
    },
    CustomerClass {
        id: "aggregator",
        name: "Aggregator",
        peak_min_kw: 100.0,
        peak_max_kw: 10000.0,
        technologies: &[
            "portfolio_optimization",
            "ev_fleet",
            "building_portfolio",
            "battery_fleet",
        ],
        max_curtail_pct: 35.0,
        load_profile: [
            0.45, 0.4, 0.4, 0.5, 0.55, 0.7, 0.7, 0.8, 0.85, 0.9, 0.98, 1.0, 1.0, 1.0, 1.0, 0.93,
            0.9, 0.98, 1.0, 0.9, 0.8, 0.7, 0.6, 0.6,
        ],
    },
];
