//! Integration tests for the hourly engine's invariants.

mod common;

use dr_sim::error::{SimError, ValidationError};
use dr_sim::sim::achievement::Achievement;
use dr_sim::sim::engine::{Engine, effective_curtailment_pct};
use dr_sim::sim::event::GridEvent;
use dr_sim::sim::presenter::{FixedPresenter, PriceResponsivePresenter, Recording};
use dr_sim::sim::types::{CurtailmentDecision, Notification, SimulationSetup};

#[test]
fn thermostat_hour_seven_scenario() {
    let mut engine = common::running_engine(&common::thermostat_setup("tou"), common::SEED);
    for _ in 0..7 {
        engine
            .advance_hour(&CurtailmentDecision::new(0.0))
            .expect("advance");
    }

    let decision = CurtailmentDecision::new(30.0).with_technology("smart_thermostat", 15.0);
    let outcome = engine.advance_hour(&decision).expect("advance");
    let r = outcome.record;
    assert_eq!(r.hour, 7);
    assert_eq!(r.effective_curtailment_pct, 15.0);
    assert!((r.base_load_kw - 4.0).abs() < 1e-12);
    assert!((r.curtailed_kw - 0.6).abs() < 1e-12);
    assert_eq!(r.price, 0.08);
    assert!((r.cost - 0.272).abs() < 1e-12);
    assert!((r.savings - 0.048).abs() < 1e-12);
}

#[test]
fn empty_selection_is_rejected_without_state() {
    let mut engine = Engine::with_seed(common::SEED);
    let setup = SimulationSetup::new("residential", 5.0, Vec::<&str>::new(), "tou");
    let err = engine.start_simulation(&setup).map(|_| ()).err();
    assert_eq!(
        err,
        Some(SimError::Validation(ValidationError::EmptyTechnologySelection))
    );
    assert!(engine.state().is_none());
}

#[test]
fn invariants_hold_for_every_class_and_plan() {
    for setup in common::all_setups() {
        let mut engine = common::running_engine(&setup, common::SEED);
        let class_max = engine
            .configuration()
            .map(|c| c.class.max_curtail_pct)
            .expect("running");
        let mut presenter = PriceResponsivePresenter::new(0.15, 100.0, 10.0);
        let records = engine.run(&mut presenter, 24 * 8).expect("run");

        let mut prev_savings = 0.0;
        let mut prev_emissions = 0.0;
        for r in &records {
            let ctx = format!("{}/{} day {} hour {}", setup.customer_class, setup.rate_plan, r.day, r.hour);
            assert!(r.hour < 24, "{ctx}");
            assert!((60..=100).contains(&r.satisfaction), "{ctx}");
            assert!(r.effective_curtailment_pct >= 0.0, "{ctx}");
            assert!(r.effective_curtailment_pct <= class_max, "{ctx}");
            assert!(r.effective_curtailment_pct <= r.technology_sum_pct, "{ctx}");
            assert!((r.cost - r.load_used_kw * r.price).abs() < 1e-9, "{ctx}");
            assert!((r.savings - r.curtailed_kw * r.price).abs() < 1e-9, "{ctx}");
            assert!(r.savings >= 0.0 && r.emissions_saved_kg >= 0.0, "{ctx}");
            prev_savings += r.savings;
            prev_emissions += r.emissions_saved_kg;
        }

        let state = engine.state().expect("running");
        assert!((state.cumulative_savings - prev_savings).abs() < 1e-6);
        assert!((state.emissions_saved_kg - prev_emissions).abs() < 1e-6);
        assert_eq!(state.current_day, 9);
        assert_eq!(state.current_hour, 0);
        assert!(state.unlocked_achievements.contains(&Achievement::WeekVeteran));

        let mut unique = state.unlocked_achievements.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), state.unlocked_achievements.len());
    }
}

#[test]
fn totals_never_decrease() {
    let mut engine = common::running_engine(&common::all_setups()[5], common::SEED);
    let mut last_savings = 0.0;
    let mut last_emissions = 0.0;
    for _ in 0..72 {
        let decision = engine
            .configuration()
            .map(|c| CurtailmentDecision::at_technology_max(c, 40.0))
            .expect("running");
        let outcome = engine.advance_hour(&decision).expect("advance");
        assert!(outcome.state.cumulative_savings >= last_savings);
        assert!(outcome.state.emissions_saved_kg >= last_emissions);
        last_savings = outcome.state.cumulative_savings;
        last_emissions = outcome.state.emissions_saved_kg;
    }
}

#[test]
fn rollover_after_exactly_24_hours() {
    let mut engine = common::running_engine(&common::thermostat_setup("cpp"), common::SEED);
    let mut presenter = FixedPresenter::new(30.0);
    engine.run(&mut presenter, 23).expect("run");
    let state = engine.state().cloned().expect("running");
    assert_eq!((state.current_day, state.current_hour), (1, 23));
    assert!(state.cost_today > 0.0);
    assert_eq!(state.events_today.len(), 4);

    engine.run(&mut presenter, 1).expect("run");
    let state = engine.state().expect("running");
    assert_eq!((state.current_day, state.current_hour), (2, 0));
    assert_eq!(state.cost_today, 0.0);
    assert!(state.events_today.is_empty());
}

#[test]
fn same_seed_reproduces_real_time_runs() {
    let setup = common::thermostat_setup("rtp");
    let run = |seed| {
        let mut engine = common::running_engine(&setup, seed);
        engine
            .run(&mut FixedPresenter::new(25.0), 48)
            .expect("run")
    };
    assert_eq!(run(7), run(7));
    let prices = |records: Vec<dr_sim::sim::types::HourRecord>| {
        records.into_iter().map(|r| r.price).collect::<Vec<_>>()
    };
    assert_ne!(prices(run(7)), prices(run(8)));
}

#[test]
fn effective_pct_bounds_hold_on_a_grid() {
    for overall in [0.0, 5.0, 17.5, 40.0, 100.0] {
        for sum in [0.0, 12.0, 30.0, 80.0] {
            for class_max in [20.0, 25.0, 30.0, 35.0] {
                let e = effective_curtailment_pct(overall, sum, class_max);
                assert!(e >= 0.0);
                assert!(e <= overall && e <= sum && e <= class_max);
            }
        }
    }
}

#[test]
fn decision_for_unselected_technology_is_rejected() {
    let mut engine = common::running_engine(&common::thermostat_setup("tou"), common::SEED);
    let decision = CurtailmentDecision::new(20.0).with_technology("pool_pump", 10.0);
    assert_eq!(
        engine.advance_hour(&decision).map(|_| ()),
        Err(SimError::Validation(ValidationError::TechnologyNotSelected(
            "pool_pump".to_string()
        )))
    );
    assert_eq!(engine.state().map(|s| s.current_hour), Some(0));
}

#[test]
fn presenter_sees_notifications_for_each_hour() {
    let mut engine = common::running_engine(&common::thermostat_setup("cpp"), common::SEED);
    let mut recorder = Recording::new(FixedPresenter::new(30.0));
    let records = engine.run(&mut recorder, 24).expect("run");

    assert_eq!(recorder.outcomes.len(), 24);
    for (outcome, record) in recorder.outcomes.iter().zip(&records) {
        assert_eq!(&outcome.record, record);
    }

    let event_hours: Vec<usize> = recorder
        .outcomes
        .iter()
        .flat_map(|o| &o.notifications)
        .filter_map(|n| match n {
            Notification::GridEvent {
                hour,
                event: GridEvent::CriticalPeak,
            } => Some(*hour),
            _ => None,
        })
        .collect();
    assert_eq!(event_hours, vec![17, 18, 19, 20]);

    let last = recorder.outcomes.last().expect("24 outcomes");
    assert_eq!(last.notifications, vec![Notification::DayComplete { day: 1 }]);
    assert_eq!((last.state.current_day, last.state.current_hour), (2, 0));
}
