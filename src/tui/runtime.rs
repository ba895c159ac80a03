//! Interactive presenter and TUI application state.

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::ScenarioConfig;
use crate::error::SimResult;
use crate::sim::engine::Engine;
use crate::sim::event::GridEvent;
use crate::sim::presenter::Presenter;
use crate::sim::types::{
    CurtailmentDecision, DrStatus, HourOutcome, HourRecord, HourView, SimulationState,
};

/// Maximum number of notification lines kept for the log panel.
const MAX_LOG: usize = 8;

/// Auto-play interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 5] = [2000, 1000, 500, 200, 50];

/// Default speed index (1 s per simulated hour).
const DEFAULT_SPEED_IDX: usize = 1;

/// Overall dial step per key press (%).
const OVERALL_STEP_PCT: f64 = 5.0;

/// Technology slider step per key press (%).
const TECHNOLOGY_STEP_PCT: f64 = 1.0;

/// One adjustable slider in the controls panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Dial {
    /// Technology id, or `None` for the overall dial.
    pub technology: Option<String>,
    pub label: String,
    pub value: f64,
    pub max: f64,
}

/// Presenter fed by keyboard-driven sliders.
///
/// Decisions are whatever the sliders currently show; outcomes are turned
/// into the log lines and chart history the layout renders.
#[derive(Debug, Clone, Default)]
pub struct Sliders {
    /// Index 0 is the overall dial, then one per selected technology.
    pub dials: Vec<Dial>,
    /// Currently focused dial.
    pub selected: usize,
    /// Newest last.
    pub log: VecDeque<String>,
    /// Every hour simulated today, for the status panel.
    pub today: Vec<HourRecord>,
    pub last_outcome: Option<HourOutcome>,
}

impl Sliders {
    /// Sliders for `engine`'s running configuration, technologies at their ceilings.
    fn for_engine(engine: &Engine, overall_pct: f64) -> Self {
        let mut dials = vec![Dial {
            technology: None,
            label: "Overall".to_string(),
            value: overall_pct,
            max: 100.0,
        }];
        if let Some(config) = engine.configuration() {
            dials.extend(config.technologies.iter().map(|t| Dial {
                technology: Some(t.id.to_string()),
                label: t.name.to_string(),
                value: t.max_curtail_pct,
                max: t.max_curtail_pct,
            }));
        }
        Self {
            dials,
            ..Self::default()
        }
    }

    pub fn decision(&self) -> CurtailmentDecision {
        let overall = self.dials.first().map_or(0.0, |d| d.value);
        self.dials
            .iter()
            .filter_map(|d| d.technology.as_deref().map(|id| (id, d.value)))
            .fold(CurtailmentDecision::new(overall), |decision, (id, pct)| {
                decision.with_technology(id, pct)
            })
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.dials.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Moves the focused dial by one step in `direction` (+1 or -1), clamped to its range.
    pub fn nudge(&mut self, direction: f64) {
        let step = if self.selected == 0 {
            OVERALL_STEP_PCT
        } else {
            TECHNOLOGY_STEP_PCT
        };
        if let Some(dial) = self.dials.get_mut(self.selected) {
            dial.value = (dial.value + direction * step).clamp(0.0, dial.max);
        }
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() >= MAX_LOG {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

impl Presenter for Sliders {
    fn decide(&mut self, _view: &HourView<'_>) -> CurtailmentDecision {
        self.decision()
    }

    fn present(&mut self, outcome: &HourOutcome) {
        self.today.push(outcome.record.clone());
        for n in &outcome.notifications {
            self.push_log(n.to_string());
        }
        if outcome.state.current_hour == 0 {
            self.today.clear();
        }
        self.last_outcome = Some(outcome.clone());
    }
}

/// Snapshot of the upcoming hour and today's series, refreshed after every change.
#[derive(Debug, Clone, Default)]
pub struct Preview {
    pub day: u32,
    pub hour: usize,
    pub price: f64,
    pub base_load_kw: f64,
    pub event: Option<GridEvent>,
    pub prices: [f64; 24],
    pub loads: [f64; 24],
    pub curtailed: [f64; 24],
}

/// TUI application state.
pub struct App {
    engine: Engine,
    /// Current scenario configuration (kept for restart/preset switch).
    scenario: ScenarioConfig,
    pub sliders: Sliders,
    pub preview: Preview,
    /// Whether auto-play is off.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last simulated hour was executed.
    pub last_tick: Instant,
    /// Name of the active preset, or `"custom"`.
    pub preset_name: String,
    /// Last rejected action, shown in the footer.
    pub error: Option<String>,
}

impl App {
    /// Creates a paused app running `scenario`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the scenario's customer setup is invalid.
    pub fn new(scenario: ScenarioConfig, preset_name: &str) -> SimResult<Self> {
        let mut engine = scenario.engine();
        engine.start_simulation(&scenario.customer)?;
        let sliders = Sliders::for_engine(&engine, scenario.strategy.overall_pct);
        let mut app = Self {
            engine,
            scenario,
            sliders,
            preview: Preview::default(),
            paused: true,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            preset_name: preset_name.to_string(),
            error: None,
        };
        app.refresh()?;
        Ok(app)
    }

    fn refresh(&mut self) -> SimResult<()> {
        let (day, hour, price, base_load_kw, event) = {
            let view = self.engine.current_view()?;
            (view.day, view.hour, view.price, view.base_load_kw, view.event)
        };
        self.preview = Preview {
            day,
            hour,
            price,
            base_load_kw,
            event,
            prices: self.engine.price_series()?,
            loads: self.engine.load_series()?,
            curtailed: self.engine.curtailment_series()?,
        };
        Ok(())
    }

    /// Simulates the upcoming hour with the current slider positions.
    pub fn tick(&mut self) {
        let result = self
            .engine
            .run(&mut self.sliders, 1)
            .and_then(|_| self.refresh());
        self.error = result.err().map(|e| e.to_string());
    }

    /// Read-only view of the running state.
    pub fn state(&self) -> Option<&SimulationState> {
        self.engine.state()
    }

    /// Curtailable capacity of the running selection at peak demand (kW).
    pub fn technical_potential_kw(&self) -> f64 {
        self.engine
            .configuration()
            .map_or(0.0, |c| c.technical_potential_kw())
    }

    /// Indicator for the current slider positions.
    pub fn dr_status(&self) -> DrStatus {
        self.sliders.decision().dr_status()
    }

    /// Toggles auto-play.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Increases auto-play speed (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases auto-play speed (longer tick interval).
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Switches to a different preset, resetting simulation state.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(scenario) = ScenarioConfig::from_preset(name) else {
            return;
        };
        self.load(scenario, name);
    }

    /// Discards the run and starts the current scenario again.
    pub fn restart(&mut self) {
        let name = self.preset_name.clone();
        self.load(self.scenario.clone(), &name);
    }

    fn load(&mut self, scenario: ScenarioConfig, name: &str) {
        self.engine.reset_simulation();
        self.engine = scenario.engine();
        if let Err(e) = self.engine.start_simulation(&scenario.customer) {
            self.error = Some(e.to_string());
            return;
        }
        self.sliders = Sliders::for_engine(&self.engine, scenario.strategy.overall_pct);
        self.scenario = scenario;
        self.preset_name = name.to_string();
        self.paused = true;
        self.error = self.refresh().err().map(|e| e.to_string());
    }
}
