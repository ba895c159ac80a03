//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::engine::Engine;
use crate::sim::policy::Policy;
use crate::sim::presenter::{FixedPresenter, PriceResponsivePresenter, Presenter};
use crate::sim::types::{Configuration, SimulationSetup};

/// Top-level scenario configuration parsed from TOML.
///
/// All tables have defaults matching the `residential_tou` preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::from_preset`] for a built-in scenario.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length, seed and strategy selection.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Customer class, size, technologies and rate plan.
    #[serde(default)]
    pub customer: SimulationSetup,
    /// Parameters of the batch curtailment strategy.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Accounting, comfort and achievement constants.
    #[serde(default)]
    pub policy: Policy,
}

/// Run length, seed and strategy selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed (real-time price draws).
    pub seed: u64,
    /// Number of hours to simulate in batch mode (must be > 0).
    pub hours: usize,
    /// Strategy type: `"fixed"` or `"price_responsive"`.
    pub strategy: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            hours: 24,
            strategy: "fixed".to_string(),
        }
    }
}

/// Curtailment strategy parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyConfig {
    /// Overall dial for the fixed strategy (%).
    pub overall_pct: f64,
    /// Price at or above which the responsive strategy curtails hard ($/kWh).
    pub price_threshold_per_kwh: f64,
    /// Responsive dial during expensive or signalled hours (%).
    pub high_pct: f64,
    /// Responsive dial otherwise (%).
    pub low_pct: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            overall_pct: 20.0,
            price_threshold_per_kwh: 0.20,
            high_pct: 30.0,
            low_pct: 0.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Longest batch run accepted from a scenario (ten years of hours).
pub const MAX_HOURS: usize = 24 * 366 * 10;

fn setup(class: &str, peak_kw: f64, technologies: &[&str], plan: &str) -> SimulationSetup {
    SimulationSetup::new(class, peak_kw, technologies.iter().copied(), plan)
}

impl ScenarioConfig {
    /// Small home on time-of-use pricing, constant 20% dial.
    pub fn residential_tou() -> Self {
        Self::default()
    }

    /// Office building on critical peak pricing, reacting to the peak bands.
    pub fn commercial_cpp() -> Self {
        Self {
            simulation: SimulationConfig {
                hours: 48,
                strategy: "price_responsive".to_string(),
                ..SimulationConfig::default()
            },
            customer: setup(
                "commercial",
                200.0,
                &["hvac_control", "lighting_control", "battery_storage"],
                "cpp",
            ),
            strategy: StrategyConfig {
                price_threshold_per_kwh: 0.18,
                high_pct: 25.0,
                low_pct: 5.0,
                ..StrategyConfig::default()
            },
            policy: Policy::default(),
        }
    }

    /// Plant on real-time pricing, shedding only on price spikes.
    pub fn industrial_rtp() -> Self {
        Self {
            simulation: SimulationConfig {
                hours: 72,
                strategy: "price_responsive".to_string(),
                ..SimulationConfig::default()
            },
            customer: setup(
                "industrial",
                1500.0,
                &["motor_drives", "compressed_air", "thermal_storage"],
                "rtp",
            ),
            strategy: StrategyConfig {
                price_threshold_per_kwh: 0.40,
                high_pct: 20.0,
                low_pct: 5.0,
                ..StrategyConfig::default()
            },
            policy: Policy::default(),
        }
    }

    /// Portfolio aggregator on real-time pricing over a full week.
    pub fn aggregator_rtp() -> Self {
        Self {
            simulation: SimulationConfig {
                hours: 168,
                strategy: "price_responsive".to_string(),
                ..SimulationConfig::default()
            },
            customer: setup(
                "aggregator",
                5000.0,
                &["portfolio_optimization", "ev_fleet", "battery_fleet"],
                "rtp",
            ),
            strategy: StrategyConfig {
                price_threshold_per_kwh: 0.18,
                high_pct: 35.0,
                low_pct: 10.0,
                ..StrategyConfig::default()
            },
            policy: Policy::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &[
        "residential_tou",
        "commercial_cpp",
        "industrial_rtp",
        "aggregator_rtp",
    ];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential_tou" => Ok(Self::residential_tou()),
            "commercial_cpp" => Ok(Self::commercial_cpp()),
            "industrial_rtp" => Ok(Self::industrial_rtp()),
            "aggregator_rtp" => Ok(Self::aggregator_rtp()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. The `[customer]`
    /// table is checked with the same rules the engine applies at start.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.hours == 0 || s.hours > MAX_HOURS {
            errors.push(ConfigError {
                field: "simulation.hours".into(),
                message: format!("must be in [1, {MAX_HOURS}]"),
            });
        }
        if s.strategy != "fixed" && s.strategy != "price_responsive" {
            errors.push(ConfigError {
                field: "simulation.strategy".into(),
                message: format!(
                    "must be \"fixed\" or \"price_responsive\", got \"{}\"",
                    s.strategy
                ),
            });
        }

        if let Err(e) = Configuration::from_setup(&self.customer) {
            errors.push(ConfigError {
                field: "customer".into(),
                message: e.to_string(),
            });
        }

        let st = &self.strategy;
        for (field, value) in [
            ("strategy.overall_pct", st.overall_pct),
            ("strategy.high_pct", st.high_pct),
            ("strategy.low_pct", st.low_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in [0, 100]".into(),
                });
            }
        }
        if !(0.0..).contains(&st.price_threshold_per_kwh) {
            errors.push(ConfigError {
                field: "strategy.price_threshold_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        let p = &self.policy;
        if p.initial_satisfaction > 100 {
            errors.push(ConfigError {
                field: "policy.initial_satisfaction".into(),
                message: "must be <= 100".into(),
            });
        }
        if p.satisfaction_floor > p.initial_satisfaction {
            errors.push(ConfigError {
                field: "policy.satisfaction_floor".into(),
                message: "must be <= policy.initial_satisfaction".into(),
            });
        }
        if !(0.0..).contains(&p.emissions_factor_kg_per_kwh) {
            errors.push(ConfigError {
                field: "policy.emissions_factor_kg_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if p.fallback_price.is_nan() || p.fallback_price <= 0.0 {
            errors.push(ConfigError {
                field: "policy.fallback_price".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }

    /// Builds an engine in the setup phase from the seed and policy tables.
    pub fn engine(&self) -> Engine {
        Engine::new(self.policy, self.simulation.seed)
    }

    /// Builds the batch presenter named by `simulation.strategy`.
    ///
    /// Unknown names fall back to the fixed strategy; [`validate`](Self::validate)
    /// reports them.
    pub fn presenter(&self) -> Box<dyn Presenter> {
        let st = &self.strategy;
        match self.simulation.strategy.as_str() {
            "price_responsive" => Box::new(PriceResponsivePresenter::new(
                st.price_threshold_per_kwh,
                st.high_pct,
                st.low_pct,
            )),
            _ => Box::new(FixedPresenter::new(st.overall_pct)),
        }
    }
}
