use std::fmt;

use serde::Serialize;

/// Qualitative discomfort class of curtailing a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComfortImpact {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for ComfortImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

/// A demand response technology a customer can enroll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Technology {
    pub id: &'static str,
    pub name: &'static str,
    /// This technology's own curtailment ceiling (%).
    pub max_curtail_pct: f64,
    pub comfort_impact: ComfortImpact,
}

const fn tech(
    id: &'static str,
    name: &'static str,
    max_curtail_pct: f64,
    comfort_impact: ComfortImpact,
) -> Technology {
    Technology {
        id,
        name,
        max_curtail_pct,
        comfort_impact,
    }
}

pub static TECHNOLOGIES: [Technology; 16] = [
    tech("smart_thermostat", "Smart Thermostat", 15.0, ComfortImpact::Low),
    tech("ev_charging", "EV Charging", 25.0, ComfortImpact::None),
    tech("water_heater", "Water Heater", 10.0, ComfortImpact::Low),
    tech("pool_pump", "Pool Pump", 20.0, ComfortImpact::None),
    tech("hvac_control", "HVAC Control", 30.0, ComfortImpact::Medium),
    tech("lighting_control", "Lighting Control", 10.0, ComfortImpact::Low),
    tech("equipment_cycling", "Equipment Cycling", 20.0, ComfortImpact::Medium),
    tech("battery_storage", "Battery Storage", 40.0, ComfortImpact::None),
    tech("process_control", "Process Control", 35.0, ComfortImpact::High),
    tech("motor_drives", "Motor Drives", 15.0, ComfortImpact::Medium),
    tech("compressed_air", "Compressed Air", 20.0, ComfortImpact::Low),
    tech("thermal_storage", "Thermal Storage", 10.0, ComfortImpact::None),
    tech(
        "portfolio_optimization",
        "Portfolio Optimization",
        25.0,
        ComfortImpact::None,
    ),
    tech("ev_fleet", "EV Fleet DR", 20.0, ComfortImpact::None),
    tech(
        "building_portfolio",
        "Building Portfolio",
        28.0,
        ComfortImpact::Medium,
    ),
    tech("battery_fleet", "Battery Fleet", 35.0, ComfortImpact::None),
];
