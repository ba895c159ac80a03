//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use dr_sim::sim::engine::Engine;
use dr_sim::sim::types::SimulationSetup;

/// Default seed for reproducible real-time prices.
pub const SEED: u64 = 42;

/// Residential 5 kW customer with a smart thermostat on the given plan.
pub fn thermostat_setup(plan: &str) -> SimulationSetup {
    SimulationSetup::new("residential", 5.0, ["smart_thermostat"], plan)
}

/// One representative setup per customer class, paired with every rate plan.
pub fn all_setups() -> Vec<SimulationSetup> {
    let classes = [
        ("residential", 6.0, vec!["smart_thermostat", "ev_charging", "water_heater"]),
        ("commercial", 300.0, vec!["hvac_control", "equipment_cycling", "battery_storage"]),
        ("industrial", 2000.0, vec!["process_control", "motor_drives", "compressed_air"]),
        ("aggregator", 8000.0, vec!["portfolio_optimization", "building_portfolio"]),
    ];
    let mut setups = Vec::new();
    for (class, peak, techs) in classes {
        for plan in ["tou", "cpp", "rtp"] {
            setups.push(SimulationSetup::new(class, peak, techs.iter().copied(), plan));
        }
    }
    setups
}

/// An engine already running `setup`.
pub fn running_engine(setup: &SimulationSetup, seed: u64) -> Engine {
    let mut engine = Engine::with_seed(seed);
    engine
        .start_simulation(setup)
        .expect("fixture setup should be valid");
    engine
}
