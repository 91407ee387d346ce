//! Threaded scenario tests.
//!
//! Each test runs real passenger threads against a real station. Delays come
//! from a seeded `SimEnv` with heavy time dilation so runs stay short.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use caltrain_harness::{Scenario, ScenarioConfig, ScenarioError, ScenarioReport, SimEnv};
use proptest::prelude::*;

fn fast_env(seed: u64) -> SimEnv {
    SimEnv::with_seed(seed).with_time_dilation(50)
}

#[test]
fn everyone_boards_with_random_trains() {
    let report = Scenario::new(fast_env(1)).passengers(60).max_free_seats(15).run().unwrap();

    assert_eq!(report.boarded(), 60);
    let filled: u32 = report.departures.iter().map(|d| d.seats_filled).sum();
    assert_eq!(filled, 60);
    assert!(report.departures.iter().all(|d| d.seats_offered <= 15));
}

#[test]
fn scheduled_trains_run_in_order() {
    let config = ScenarioConfig {
        passengers: 5,
        scheduled_trains: vec![3, 0, 2],
        max_free_seats: 4,
        max_arrival_delay: Duration::ZERO,
        max_boarding_delay: Duration::from_millis(5),
        train_interval: Duration::from_millis(5),
    };

    let report = Scenario::new(fast_env(2)).with_config(config).run().unwrap();

    let offered: Vec<u32> = report.departures.iter().take(3).map(|d| d.seats_offered).collect();
    assert_eq!(offered, [3, 0, 2]);
    assert_eq!(report.departures[1].seats_filled, 0);
    assert_eq!(report.boarded(), 5);
}

#[test]
fn schedule_runs_even_after_everyone_boarded() {
    let config = ScenarioConfig {
        passengers: 2,
        scheduled_trains: vec![10, 10, 10],
        max_free_seats: 1,
        max_arrival_delay: Duration::ZERO,
        ..Default::default()
    };

    let report = Scenario::new(fast_env(3)).with_config(config).run().unwrap();
    assert!(report.departures.len() >= 3);
    assert!(report.departures.iter().take(3).all(|d| d.seats_offered == 10));
    assert_eq!(report.boarded(), 2);
}

#[test]
fn oracle_sees_verified_report() {
    let seen: Arc<Mutex<Option<ScenarioReport>>> = Arc::new(Mutex::new(None));
    let seen_clone = Arc::clone(&seen);

    let report = Scenario::new(fast_env(4))
        .passengers(20)
        .max_free_seats(6)
        .oracle(Box::new(move |report| {
            *seen_clone.lock().expect("mutex poisoned") = Some(report.clone());
            Ok(())
        }))
        .run()
        .unwrap();

    let captured = seen.lock().expect("mutex poisoned").clone().expect("oracle should run");
    assert_eq!(captured, report);
}

#[test]
fn failing_oracle_fails_run() {
    let result = Scenario::new(fast_env(5))
        .passengers(3)
        .oracle(Box::new(|report| {
            if report.trains_used() > 0 {
                return Err("no train may carry anyone".to_string());
            }
            Ok(())
        }))
        .run();

    assert!(matches!(result, Err(ScenarioError::OracleFailed { .. })));
}

#[test]
fn stranding_config_is_rejected_before_spawning() {
    let result = Scenario::new(fast_env(6)).passengers(10).train(4).max_free_seats(0).run();
    assert!(matches!(result, Err(ScenarioError::InvalidConfig { .. })));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Any passenger count and train size bound ends with everyone aboard and
    /// no train over capacity.
    #[test]
    fn prop_scenario_conserves_passengers(
        seed in any::<u64>(),
        passengers in 0u32..40,
        max_free_seats in 1u32..10,
    ) {
        let report = Scenario::new(fast_env(seed))
            .passengers(passengers)
            .max_free_seats(max_free_seats)
            .run();

        prop_assert!(report.is_ok(), "scenario failed: {:?}", report.as_ref().err());
        let report = report.unwrap();
        prop_assert_eq!(report.boarded(), passengers);
        prop_assert!(report.verify().is_ok());
        for d in &report.departures {
            prop_assert!(d.seats_filled <= d.seats_offered);
        }
    }
}
