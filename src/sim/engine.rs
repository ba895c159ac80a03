//! Simulation engine: owns the run state and advances it one hour at a time.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{SimError, SimResult};

use super::achievement::unlock_new;
use super::event::{EventRecord, event_at};
use super::load::{load_at, load_series};
use super::policy::Policy;
use super::presenter::Presenter;
use super::pricing::PriceCache;
use super::types::{
    Configuration, CurtailmentDecision, HourOutcome, HourRecord, HourView, Notification,
    SimulationSetup, SimulationState,
};

/// Curtailment applied after the three independent ceilings.
///
/// A hard clamp: the overall dial, the per-technology sum, and the class
/// ceiling each bound the result; nothing is reallocated between them.
pub fn effective_curtailment_pct(overall_pct: f64, technology_sum_pct: f64, class_max_pct: f64) -> f64 {
    overall_pct
        .min(technology_sum_pct)
        .min(class_max_pct)
        .max(0.0)
}

/// Everything that exists only while a simulation is running.
#[derive(Debug, Clone)]
struct Run {
    config: Configuration,
    state: SimulationState,
    prices: PriceCache,
    /// Curtailed kW per hour of the current day, for the load chart.
    curtailed_today_kw: [f64; 24],
    hours_simulated: usize,
}

/// The hourly demand response simulation.
///
/// Two phases: *setup* (no run) and *running*. [`start_simulation`](Self::start_simulation)
/// enters the running phase, [`reset_simulation`](Self::reset_simulation) is the only way
/// back. While running, [`advance_hour`](Self::advance_hour) is the sole mutator.
///
/// # Examples
///
/// ```
/// use dr_sim::sim::engine::Engine;
/// use dr_sim::sim::types::{CurtailmentDecision, SimulationSetup};
///
/// let mut engine = Engine::with_seed(42);
/// let setup = SimulationSetup::new("residential", 5.0, ["smart_thermostat"], "tou");
/// engine.start_simulation(&setup).expect("valid setup");
///
/// let decision = CurtailmentDecision::new(30.0).with_technology("smart_thermostat", 15.0);
/// let outcome = engine.advance_hour(&decision).expect("running");
/// assert_eq!(outcome.record.effective_curtailment_pct, 15.0);
/// assert_eq!(outcome.state.current_hour, 1);
/// ```
#[derive(Debug)]
pub struct Engine {
    policy: Policy,
    rng: StdRng,
    run: Option<Run>,
}

impl Engine {
    /// Creates an engine in the setup phase.
    ///
    /// # Arguments
    ///
    /// * `policy` - Accounting, comfort, event and achievement constants
    /// * `seed` - Seed for real-time price draws
    pub fn new(policy: Policy, seed: u64) -> Self {
        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
            run: None,
        }
    }

    /// Creates an engine with the default policy.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Policy::default(), seed)
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Validates `setup` and starts a fresh run at day 1, hour 0.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Validation`] for an invalid setup and
    /// [`SimError::AlreadyRunning`] if a run is in progress. No state is
    /// created in either case.
    pub fn start_simulation(&mut self, setup: &SimulationSetup) -> SimResult<&SimulationState> {
        if self.run.is_some() {
            return Err(SimError::AlreadyRunning);
        }
        let config = Configuration::from_setup(setup)?;
        self.start_configured(config)
    }

    /// Starts a fresh run from an already resolved configuration.
    ///
    /// The configuration is taken as-is. A rate plan the catalog does not
    /// know is priced at the policy's fallback price.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AlreadyRunning`] if a run is in progress.
    pub fn start_configured(&mut self, config: Configuration) -> SimResult<&SimulationState> {
        if self.run.is_some() {
            return Err(SimError::AlreadyRunning);
        }
        log::info!(
            "starting simulation: class={} peak={} kW plan={} technologies=[{}]",
            config.class.id,
            config.peak_demand_kw,
            config.rate_plan.id,
            config
                .technologies
                .iter()
                .map(|t| t.id)
                .collect::<Vec<_>>()
                .join(", ")
        );
        let run = self.run.insert(Run {
            config,
            state: SimulationState::new(self.policy.initial_satisfaction),
            prices: PriceCache::new(),
            curtailed_today_kw: [0.0; 24],
            hours_simulated: 0,
        });
        Ok(&run.state)
    }

    /// Discards the run and its configuration, returning to the setup phase.
    pub fn reset_simulation(&mut self) {
        if let Some(run) = self.run.take() {
            log::info!(
                "simulation reset after {} hours (day {})",
                run.hours_simulated,
                run.state.current_day
            );
        }
    }

    /// The running configuration, if any.
    pub fn configuration(&self) -> Option<&Configuration> {
        self.run.as_ref().map(|r| &r.config)
    }

    /// Read-only view of the running state, if any.
    pub fn state(&self) -> Option<&SimulationState> {
        self.run.as_ref().map(|r| &r.state)
    }

    /// Number of hours simulated since the run started.
    pub fn hours_simulated(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.hours_simulated)
    }

    /// Prices and describes the upcoming hour without advancing.
    ///
    /// The price drawn here is cached and reused by the next `advance_hour`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotRunning`] in the setup phase.
    pub fn current_view(&mut self) -> SimResult<HourView<'_>> {
        let run = self.run.as_mut().ok_or(SimError::NotRunning)?;
        let hour = run.state.current_hour;
        let plan = run.config.rate_plan;
        let price = run
            .prices
            .price(hour, plan, self.policy.fallback_price, &mut self.rng);
        Ok(HourView {
            day: run.state.current_day,
            hour,
            price,
            base_load_kw: load_at(hour, run.config.class, Some(run.config.peak_demand_kw)),
            event: event_at(hour, plan, price, self.policy.high_price_threshold),
            config: &run.config,
            state: &run.state,
        })
    }

    /// The current day's 24 prices under the running plan.
    ///
    /// Real-time hours are drawn once and cached until day rollover, so this
    /// series agrees with the prices later used for costing.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotRunning`] in the setup phase.
    pub fn price_series(&mut self) -> SimResult<[f64; 24]> {
        let run = self.run.as_mut().ok_or(SimError::NotRunning)?;
        Ok(run
            .prices
            .series(run.config.rate_plan, self.policy.fallback_price, &mut self.rng))
    }

    /// Base load for each hour of day under the running configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotRunning`] in the setup phase.
    pub fn load_series(&self) -> SimResult<[f64; 24]> {
        let run = self.run.as_ref().ok_or(SimError::NotRunning)?;
        Ok(load_series(run.config.class, Some(run.config.peak_demand_kw)))
    }

    /// Curtailed kW realized so far today; hours not yet simulated are 0.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotRunning`] in the setup phase.
    pub fn curtailment_series(&self) -> SimResult<[f64; 24]> {
        let run = self.run.as_ref().ok_or(SimError::NotRunning)?;
        Ok(run.curtailed_today_kw)
    }

    /// Simulates the current hour under `decision` and moves the clock forward.
    ///
    /// The step is atomic: the decision is validated before anything is
    /// touched, and all accumulators, counters and the clock are committed
    /// together.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotRunning`] in the setup phase and
    /// [`SimError::Validation`] for a decision that does not fit the running
    /// configuration.
    pub fn advance_hour(&mut self, decision: &CurtailmentDecision) -> SimResult<HourOutcome> {
        let policy = self.policy;
        let run = self.run.as_mut().ok_or(SimError::NotRunning)?;
        decision.validate(&run.config)?;

        let config = &run.config;
        let hour = run.state.current_hour;
        let day = run.state.current_day;

        // 1. Load and price
        let base_load_kw = load_at(hour, config.class, Some(config.peak_demand_kw));
        let price = run
            .prices
            .price(hour, config.rate_plan, policy.fallback_price, &mut self.rng);

        // 2. Feasibility clamp
        let technology_sum_pct = decision.technology_sum();
        let effective_pct = effective_curtailment_pct(
            decision.overall_pct,
            technology_sum_pct,
            config.class.max_curtail_pct,
        );
        let curtailed_kw = base_load_kw * effective_pct / 100.0;
        let load_used_kw = base_load_kw - curtailed_kw;

        // 3. Accounting
        let cost = load_used_kw * price;
        let savings = curtailed_kw * price;
        let emissions_saved_kg = curtailed_kw * policy.emissions_factor_kg_per_kwh;
        let comfort_penalty: u32 = config
            .technologies
            .iter()
            .map(|t| policy.comfort.penalty(t.comfort_impact, effective_pct))
            .sum();
        let event = event_at(hour, config.rate_plan, price, policy.high_price_threshold);

        let mut next = run.state.clone();
        next.cost_today += cost;
        next.savings_today += savings;
        next.cumulative_savings += savings;
        next.emissions_saved_kg += emissions_saved_kg;
        next.satisfaction = policy.apply_penalty(next.satisfaction, comfort_penalty);
        next.last_effective_curtailment_pct = effective_pct;

        let mut notifications = Vec::new();
        if let Some(event) = event {
            next.events_today.push(EventRecord { hour, event });
            notifications.push(Notification::GridEvent { hour, event });
        }

        // 4. Clock
        next.current_hour = (hour + 1) % 24;
        let rolled_over = next.current_hour == 0;
        if rolled_over {
            next.current_day += 1;
            next.cost_today = 0.0;
            next.savings_today = 0.0;
            next.events_today.clear();
            notifications.push(Notification::DayComplete { day });
        }

        // 5. Achievements, evaluated after rollover so the day counter is current
        for achievement in unlock_new(&mut next, &policy.achievements) {
            log::info!("achievement unlocked on day {day} hour {hour}: {achievement}");
            notifications.push(Notification::AchievementUnlocked { achievement });
        }

        let record = HourRecord {
            index: run.hours_simulated,
            day,
            hour,
            price,
            base_load_kw,
            technology_sum_pct,
            effective_curtailment_pct: effective_pct,
            curtailed_kw,
            load_used_kw,
            cost,
            savings,
            emissions_saved_kg,
            comfort_penalty,
            satisfaction: next.satisfaction,
            event,
        };
        log::debug!("{record}");

        // Commit
        run.curtailed_today_kw[hour] = curtailed_kw;
        if rolled_over {
            log::info!(
                "day {day} complete: cumulative savings ${:.2}, satisfaction {}%",
                next.cumulative_savings,
                next.satisfaction
            );
            run.prices.clear();
            run.curtailed_today_kw = [0.0; 24];
        }
        run.hours_simulated += 1;
        run.state = next;

        Ok(HourOutcome {
            record,
            state: run.state.clone(),
            notifications,
        })
    }

    /// Drives `presenter` for `hours` consecutive hours and returns every hour record.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected hour and returns its error; hours already
    /// simulated stay committed.
    pub fn run<P: Presenter + ?Sized>(
        &mut self,
        presenter: &mut P,
        hours: usize,
    ) -> SimResult<Vec<HourRecord>> {
        let mut records = Vec::new();
        for _ in 0..hours {
            let decision = {
                let view = self.current_view()?;
                presenter.decide(&view)
            };
            let outcome = self.advance_hour(&decision)?;
            presenter.present(&outcome);
            records.push(outcome.record);
        }
        Ok(records)
    }
}
