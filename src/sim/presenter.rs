use super::types::{CurtailmentDecision, HourOutcome, HourView};

/// A presentation adapter driving the engine.
///
/// The engine asks the presenter for a decision before each hour is costed
/// and hands back the outcome once it is committed.
pub trait Presenter {
    /// Chooses the curtailment for the upcoming hour.
    fn decide(&mut self, view: &HourView<'_>) -> CurtailmentDecision;

    /// Receives the committed result of an hour.
    fn present(&mut self, _outcome: &HourOutcome) {}
}

/// Constant overall dial with every selected technology at its ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPresenter {
    pub overall_pct: f64,
}

impl FixedPresenter {
    pub fn new(overall_pct: f64) -> Self {
        Self { overall_pct }
    }
}

impl Presenter for FixedPresenter {
    fn decide(&mut self, view: &HourView<'_>) -> CurtailmentDecision {
        CurtailmentDecision::at_technology_max(view.config, self.overall_pct)
    }
}

/// Curtails hard when the hour is expensive or signalled, lightly otherwise.
///
/// Technologies are always left at their ceilings; only the overall dial moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceResponsivePresenter {
    /// Price ($/kWh) at or above which the high dial is used.
    pub price_threshold: f64,
    pub high_pct: f64,
    pub low_pct: f64,
}

impl PriceResponsivePresenter {
    pub fn new(price_threshold: f64, high_pct: f64, low_pct: f64) -> Self {
        Self {
            price_threshold,
            high_pct,
            low_pct,
        }
    }

    /// The overall dial for an hour priced at `price`.
    ///
    /// # Arguments
    ///
    /// * `price` - Realized price of the hour ($/kWh)
    /// * `event_active` - Whether a grid event is signalled for the hour
    pub fn overall_pct(&self, price: f64, event_active: bool) -> f64 {
        if event_active || price >= self.price_threshold {
            self.high_pct
        } else {
            self.low_pct
        }
    }
}

impl Presenter for PriceResponsivePresenter {
    fn decide(&mut self, view: &HourView<'_>) -> CurtailmentDecision {
        let overall = self.overall_pct(view.price, view.event.is_some());
        CurtailmentDecision::at_technology_max(view.config, overall)
    }
}

/// Collects every outcome it is shown; wraps another presenter's decisions.
#[derive(Debug, Clone, Default)]
pub struct Recording<P> {
    pub inner: P,
    pub outcomes: Vec<HourOutcome>,
}

impl<P: Presenter> Recording<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            outcomes: Vec::new(),
        }
    }
}

impl<P: Presenter> Presenter for Recording<P> {
    fn decide(&mut self, view: &HourView<'_>) -> CurtailmentDecision {
        self.inner.decide(view)
    }

    fn present(&mut self, outcome: &HourOutcome) {
        self.inner.present(outcome);
        self.outcomes.push(outcome.clone());
    }
}
