//! Post-hoc KPI computation from simulated hours.

use std::fmt;

use serde::Serialize;

use super::types::HourRecord;

/// Aggregate key performance indicators of a run.
///
/// Computed post-hoc from the hour records so the report always agrees with
/// the exported data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    pub hours_simulated: usize,
    /// Total energy cost paid ($).
    pub total_cost: f64,
    /// Total savings from curtailment ($).
    pub total_savings: f64,
    /// Savings as a share of the uncurtailed bill (%).
    pub savings_rate_pct: f64,
    /// Total energy curtailed (kWh; one-hour steps).
    pub curtailed_kwh: f64,
    /// Total CO2 avoided (kg).
    pub emissions_saved_kg: f64,
    /// Mean effective curtailment (%).
    pub mean_curtailment_pct: f64,
    /// Highest uncurtailed load (kW).
    pub peak_base_load_kw: f64,
    /// Highest load after curtailment (kW).
    pub peak_load_used_kw: f64,
    /// Hours with a grid event.
    pub event_hours: usize,
    /// Satisfaction after the last hour (%).
    pub final_satisfaction: u32,
}

impl KpiReport {
    /// Computes all KPIs from a run's hour records.
    ///
    /// # Arguments
    ///
    /// * `records` - Every hour of the run, in order
    pub fn from_records(records: &[HourRecord]) -> Self {
        let Some(last) = records.last() else {
            return Self {
                hours_simulated: 0,
                total_cost: 0.0,
                total_savings: 0.0,
                savings_rate_pct: 0.0,
                curtailed_kwh: 0.0,
                emissions_saved_kg: 0.0,
                mean_curtailment_pct: 0.0,
                peak_base_load_kw: 0.0,
                peak_load_used_kw: 0.0,
                event_hours: 0,
                final_satisfaction: 0,
            };
        };

        let mut cost = 0.0;
        let mut savings = 0.0;
        let mut curtailed = 0.0;
        let mut emissions = 0.0;
        let mut pct_sum = 0.0;
        let mut peak_base = 0.0_f64;
        let mut peak_used = 0.0_f64;
        let mut events = 0;

        for r in records {
            cost += r.cost;
            savings += r.savings;
            curtailed += r.curtailed_kw;
            emissions += r.emissions_saved_kg;
            pct_sum += r.effective_curtailment_pct;
            peak_base = peak_base.max(r.base_load_kw);
            peak_used = peak_used.max(r.load_used_kw);
            if r.event.is_some() {
                events += 1;
            }
        }

        let uncurtailed_bill = cost + savings;
        let savings_rate_pct = if uncurtailed_bill > 0.0 {
            100.0 * savings / uncurtailed_bill
        } else {
            0.0
        };

        Self {
            hours_simulated: records.len(),
            total_cost: cost,
            total_savings: savings,
            savings_rate_pct,
            curtailed_kwh: curtailed,
            emissions_saved_kg: emissions,
            mean_curtailment_pct: pct_sum / records.len() as f64,
            peak_base_load_kw: peak_base,
            peak_load_used_kw: peak_used,
            event_hours: events,
            final_satisfaction: last.satisfaction,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Hours simulated:       {}", self.hours_simulated)?;
        writeln!(f, "Total cost:            ${:.2}", self.total_cost)?;
        writeln!(
            f,
            "Total savings:         ${:.2} ({:.1}% of bill)",
            self.total_savings, self.savings_rate_pct
        )?;
        writeln!(f, "Energy curtailed:      {:.2} kWh", self.curtailed_kwh)?;
        writeln!(f, "CO2 saved:             {:.2} kg", self.emissions_saved_kg)?;
        writeln!(f, "Mean curtailment:      {:.1}%", self.mean_curtailment_pct)?;
        writeln!(
            f,
            "Peak load:             {:.2} kW base, {:.2} kW used",
            self.peak_base_load_kw, self.peak_load_used_kw
        )?;
        writeln!(f, "Event hours:           {}", self.event_hours)?;
        write!(f, "Final satisfaction:    {}%", self.final_satisfaction)
    }
}
