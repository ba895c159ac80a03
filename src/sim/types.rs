//! Core simulation types: setup, validated configuration, decisions, state, and hour records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, CustomerClass, RatePlan, Technology};
use crate::error::ValidationError;

use super::achievement::Achievement;
use super::event::{EventRecord, GridEvent};

/// Raw customer choices as entered in the setup phase, referencing catalog ids.
///
/// # Examples
///
/// ```
/// use dr_sim::sim::types::{Configuration, SimulationSetup};
///
/// let setup = SimulationSetup::new("residential", 5.0, ["smart_thermostat"], "tou");
/// let config = Configuration::from_setup(&setup).expect("valid setup");
/// assert_eq!(config.class.id, "residential");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSetup {
    pub customer_class: String,
    pub peak_demand_kw: f64,
    pub technologies: Vec<String>,
    pub rate_plan: String,
}

impl Default for SimulationSetup {
    /// A residential 5 kW customer with a smart thermostat on time-of-use.
    fn default() -> Self {
        Self::new("residential", 5.0, ["smart_thermostat"], "tou")
    }
}

impl SimulationSetup {
    pub fn new<I, S>(customer_class: &str, peak_demand_kw: f64, technologies: I, rate_plan: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            customer_class: customer_class.to_string(),
            peak_demand_kw,
            technologies: technologies.into_iter().map(Into::into).collect(),
            rate_plan: rate_plan.to_string(),
        }
    }
}

/// A validated setup, fixed for the lifetime of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub class: &'static CustomerClass,
    pub peak_demand_kw: f64,
    /// Selected technologies, in selection order, without duplicates.
    pub technologies: Vec<&'static Technology>,
    pub rate_plan: &'static RatePlan,
}

impl Configuration {
    /// Resolves and validates a raw setup against the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: unknown class or plan,
    /// empty selection, unknown/ineligible/duplicate technology, or a peak
    /// demand outside the class bounds.
    pub fn from_setup(setup: &SimulationSetup) -> Result<Self, ValidationError> {
        let class = catalog::customer_class(&setup.customer_class)
            .ok_or_else(|| ValidationError::UnknownCustomerClass(setup.customer_class.clone()))?;
        let rate_plan = catalog::rate_plan(&setup.rate_plan)
            .ok_or_else(|| ValidationError::UnknownRatePlan(setup.rate_plan.clone()))?;

        if setup.technologies.is_empty() {
            return Err(ValidationError::EmptyTechnologySelection);
        }

        let mut technologies: Vec<&'static Technology> = Vec::with_capacity(setup.technologies.len());
        for id in &setup.technologies {
            let tech = catalog::technology(id)
                .ok_or_else(|| ValidationError::UnknownTechnology(id.clone()))?;
            if !class.is_eligible(tech.id) {
                return Err(ValidationError::IneligibleTechnology {
                    technology: id.clone(),
                    class: class.id.to_string(),
                });
            }
            if technologies.iter().any(|t| t.id == tech.id) {
                return Err(ValidationError::DuplicateTechnology(id.clone()));
            }
            technologies.push(tech);
        }

        if !class.accepts_peak(setup.peak_demand_kw) {
            return Err(ValidationError::PeakDemandOutOfRange {
                value: setup.peak_demand_kw,
                min: class.peak_min_kw,
                max: class.peak_max_kw,
            });
        }

        Ok(Self {
            class,
            peak_demand_kw: setup.peak_demand_kw,
            technologies,
            rate_plan,
        })
    }

    /// Looks up a selected technology by id.
    pub fn technology(&self, id: &str) -> Option<&'static Technology> {
        self.technologies.iter().copied().find(|t| t.id == id)
    }

    /// Aggregate curtailable capacity (kW) of the selection at peak demand.
    pub fn technical_potential_kw(&self) -> f64 {
        let pct: f64 = self.technologies.iter().map(|t| t.max_curtail_pct).sum();
        pct.min(100.0) * self.peak_demand_kw / 100.0
    }
}

/// Indicator of how hard the per-technology sliders are pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrStatus {
    Ready,
    Active,
    HighResponse,
}

impl DrStatus {
    /// Classifies a per-technology percentage sum.
    pub fn from_technology_sum(sum_pct: f64) -> Self {
        if sum_pct > 20.0 {
            Self::HighResponse
        } else if sum_pct > 5.0 {
            Self::Active
        } else {
            Self::Ready
        }
    }
}

impl fmt::Display for DrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "Ready",
            Self::Active => "Active",
            Self::HighResponse => "High Response",
        })
    }
}

/// The caller's curtailment choice for one hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurtailmentDecision {
    /// Overall curtailment dial (%), in `[0, 100]`.
    pub overall_pct: f64,
    /// Requested curtailment (%) per selected technology id. Missing ids count as 0.
    pub technologies: BTreeMap<String, f64>,
}

impl CurtailmentDecision {
    /// A decision with the given overall dial and no technology allocations.
    pub fn new(overall_pct: f64) -> Self {
        Self {
            overall_pct,
            technologies: BTreeMap::new(),
        }
    }

    /// Every selected technology at its own ceiling, as the setup sliders start.
    pub fn at_technology_max(config: &Configuration, overall_pct: f64) -> Self {
        Self {
            overall_pct,
            technologies: config
                .technologies
                .iter()
                .map(|t| (t.id.to_string(), t.max_curtail_pct))
                .collect(),
        }
    }

    pub fn with_technology(mut self, id: &str, pct: f64) -> Self {
        self.technologies.insert(id.to_string(), pct);
        self
    }

    /// Sum of the per-technology percentages. Individual values are not capped first.
    pub fn technology_sum(&self) -> f64 {
        self.technologies.values().sum()
    }

    pub fn dr_status(&self) -> DrStatus {
        DrStatus::from_technology_sum(self.technology_sum())
    }

    /// Checks the decision against the running configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an overall dial outside `[0, 100]`, a
    /// technology value outside `[0, max_curtail_pct]`, a non-finite value, or
    /// a technology that is not part of `config`.
    pub fn validate(&self, config: &Configuration) -> Result<(), ValidationError> {
        if !(0.0..=100.0).contains(&self.overall_pct) {
            return Err(ValidationError::OverallCurtailmentOutOfRange(self.overall_pct));
        }
        for (id, &pct) in &self.technologies {
            let tech = config
                .technology(id)
                .ok_or_else(|| ValidationError::TechnologyNotSelected(id.clone()))?;
            if !(0.0..=tech.max_curtail_pct).contains(&pct) {
                return Err(ValidationError::TechnologyCurtailmentOutOfRange {
                    technology: id.clone(),
                    value: pct,
                    max: tech.max_curtail_pct,
                });
            }
        }
        Ok(())
    }
}

/// Mutable state of a running simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    /// Hour of day about to be simulated, in `[0, 23]`.
    pub current_hour: usize,
    /// Day counter, starting at 1.
    pub current_day: u32,
    /// Energy cost accrued today ($). Reset at rollover.
    pub cost_today: f64,
    /// Savings accrued today ($). Reset at rollover.
    pub savings_today: f64,
    /// Savings over the whole run ($). Never decreases.
    pub cumulative_savings: f64,
    /// Emissions avoided over the whole run (kg CO2). Never decreases.
    pub emissions_saved_kg: f64,
    /// Events fired today. Cleared at rollover.
    pub events_today: Vec<EventRecord>,
    /// Customer satisfaction (%). Only ever decreases, down to the policy floor.
    pub satisfaction: u32,
    /// Unlocked achievements in unlock order, no duplicates.
    pub unlocked_achievements: Vec<Achievement>,
    /// Effective curtailment applied in the most recent hour (%).
    pub last_effective_curtailment_pct: f64,
}

impl SimulationState {
    pub fn new(initial_satisfaction: u32) -> Self {
        Self {
            current_hour: 0,
            current_day: 1,
            cost_today: 0.0,
            savings_today: 0.0,
            cumulative_savings: 0.0,
            emissions_saved_kg: 0.0,
            events_today: Vec::new(),
            satisfaction: initial_satisfaction,
            unlocked_achievements: Vec::new(),
            last_effective_curtailment_pct: 0.0,
        }
    }
}

/// Complete accounting of one simulated hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRecord {
    /// Hours simulated before this one in the run (0-based).
    pub index: usize,
    pub day: u32,
    pub hour: usize,
    /// Price charged this hour ($/kWh).
    pub price: f64,
    /// Load before curtailment (kW).
    pub base_load_kw: f64,
    /// Sum of the decision's per-technology percentages.
    pub technology_sum_pct: f64,
    /// Curtailment actually applied after all three ceilings (%).
    pub effective_curtailment_pct: f64,
    pub curtailed_kw: f64,
    pub load_used_kw: f64,
    pub cost: f64,
    pub savings: f64,
    pub emissions_saved_kg: f64,
    /// Satisfaction points deducted this hour.
    pub comfort_penalty: u32,
    /// Satisfaction after this hour.
    pub satisfaction: u32,
    pub event: Option<GridEvent>,
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {:>3} {:02}:00 | price={:.3} $/kWh | base={:>8.2} kW  curtail={:>5.1}% \
             ({:>7.2} kW) | cost={:>8.3}  saved={:>7.3} | CO2={:>6.2} kg | sat={}%",
            self.day,
            self.hour,
            self.price,
            self.base_load_kw,
            self.effective_curtailment_pct,
            self.curtailed_kw,
            self.cost,
            self.savings,
            self.emissions_saved_kg,
            self.satisfaction,
        )?;
        if let Some(event) = self.event {
            write!(f, " | {event}")?;
        }
        Ok(())
    }
}

/// A one-time side effect of an hour, for the presentation layer to surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    GridEvent { hour: usize, event: GridEvent },
    AchievementUnlocked { achievement: Achievement },
    DayComplete { day: u32 },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridEvent { hour, event } => write!(f, "{hour:02}:00 {event}"),
            Self::AchievementUnlocked { achievement } => {
                write!(f, "Achievement Unlocked: {achievement}!")
            }
            Self::DayComplete { day } => write!(f, "Day {day} completed! Starting new day..."),
        }
    }
}

/// Result of [`advance_hour`](super::engine::Engine::advance_hour).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourOutcome {
    pub record: HourRecord,
    /// State snapshot after the hour, including any rollover.
    pub state: SimulationState,
    pub notifications: Vec<Notification>,
}

/// What a presenter sees before choosing the decision for the upcoming hour.
#[derive(Debug, Clone, Copy)]
pub struct HourView<'a> {
    pub day: u32,
    pub hour: usize,
    /// Realized price of the upcoming hour; costing will use this same value.
    pub price: f64,
    pub base_load_kw: f64,
    pub event: Option<GridEvent>,
    pub config: &'a Configuration,
    pub state: &'a SimulationState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residential_setup() -> SimulationSetup {
        SimulationSetup::new(
            "residential",
            5.0,
            ["smart_thermostat", "ev_charging"],
            "tou",
        )
    }

    #[test]
    fn valid_setup_resolves() {
        let config = Configuration::from_setup(&residential_setup()).expect("valid");
        assert_eq!(config.technologies.len(), 2);
        assert_eq!(config.rate_plan.id, "tou");
        assert!(config.technology("ev_charging").is_some());
        assert!(config.technology("pool_pump").is_none());
    }

    #[test]
    fn empty_selection_rejected() {
        let setup = SimulationSetup::new("residential", 5.0, Vec::<String>::new(), "tou");
        assert_eq!(
            Configuration::from_setup(&setup),
            Err(ValidationError::EmptyTechnologySelection)
        );
    }

    #[test]
    fn peak_out_of_bounds_rejected() {
        let mut setup = residential_setup();
        setup.peak_demand_kw = 9.0;
        assert!(matches!(
            Configuration::from_setup(&setup),
            Err(ValidationError::PeakDemandOutOfRange { min, max, .. }) if min == 2.0 && max == 8.0
        ));
    }

    #[test]
    fn unknown_and_ineligible_ids_rejected() {
        let mut setup = residential_setup();
        setup.customer_class = "utility".into();
        assert_eq!(
            Configuration::from_setup(&setup),
            Err(ValidationError::UnknownCustomerClass("utility".into()))
        );

        let mut setup = residential_setup();
        setup.rate_plan = "flat".into();
        assert_eq!(
            Configuration::from_setup(&setup),
            Err(ValidationError::UnknownRatePlan("flat".into()))
        );

        let mut setup = residential_setup();
        setup.technologies.push("flux_capacitor".into());
        assert_eq!(
            Configuration::from_setup(&setup),
            Err(ValidationError::UnknownTechnology("flux_capacitor".into()))
        );

        let mut setup = residential_setup();
        setup.technologies.push("hvac_control".into());
        assert!(matches!(
            Configuration::from_setup(&setup),
            Err(ValidationError::IneligibleTechnology { .. })
        ));

        let mut setup = residential_setup();
        setup.technologies.push("ev_charging".into());
        assert_eq!(
            Configuration::from_setup(&setup),
            Err(ValidationError::DuplicateTechnology("ev_charging".into()))
        );
    }

    #[test]
    fn technical_potential_caps_at_full_load() {
        let config = Configuration::from_setup(&residential_setup()).expect("valid");
        // 15% + 25% of 5 kW
        assert!((config.technical_potential_kw() - 2.0).abs() < 1e-12);

        let setup = SimulationSetup::new(
            "commercial",
            200.0,
            [
                "hvac_control",
                "lighting_control",
                "equipment_cycling",
                "battery_storage",
            ],
            "cpp",
        );
        let config = Configuration::from_setup(&setup).expect("valid");
        // 30 + 10 + 20 + 40 = 100%
        assert!((config.technical_potential_kw() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn decision_validation() {
        let config = Configuration::from_setup(&residential_setup()).expect("valid");
        let ok = CurtailmentDecision::at_technology_max(&config, 30.0);
        assert!(ok.validate(&config).is_ok());
        assert_eq!(ok.technology_sum(), 40.0);

        let over = CurtailmentDecision::new(101.0);
        assert!(matches!(
            over.validate(&config),
            Err(ValidationError::OverallCurtailmentOutOfRange(_))
        ));

        let nan = CurtailmentDecision::new(f64::NAN);
        assert!(nan.validate(&config).is_err());

        let tech_over = CurtailmentDecision::new(10.0).with_technology("smart_thermostat", 16.0);
        assert!(matches!(
            tech_over.validate(&config),
            Err(ValidationError::TechnologyCurtailmentOutOfRange { .. })
        ));

        let foreign = CurtailmentDecision::new(10.0).with_technology("pool_pump", 5.0);
        assert_eq!(
            foreign.validate(&config),
            Err(ValidationError::TechnologyNotSelected("pool_pump".into()))
        );
    }

    #[test]
    fn dr_status_thresholds() {
        assert_eq!(DrStatus::from_technology_sum(0.0), DrStatus::Ready);
        assert_eq!(DrStatus::from_technology_sum(5.0), DrStatus::Ready);
        assert_eq!(DrStatus::from_technology_sum(5.5), DrStatus::Active);
        assert_eq!(DrStatus::from_technology_sum(20.0), DrStatus::Active);
        assert_eq!(DrStatus::from_technology_sum(21.0), DrStatus::HighResponse);
    }

    #[test]
    fn notification_messages() {
        assert_eq!(
            Notification::DayComplete { day: 1 }.to_string(),
            "Day 1 completed! Starting new day..."
        );
        assert_eq!(
            Notification::AchievementUnlocked {
                achievement: Achievement::EcoWarrior
            }
            .to_string(),
            "Achievement Unlocked: Eco Warrior!"
        );
    }
}
