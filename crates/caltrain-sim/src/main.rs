//! Caltrain station simulation binary.
//!
//! # Usage
//!
//! ```bash
//! # 100 passengers, random trains of up to 50 seats, OS randomness
//! caltrain-sim
//!
//! # Reproducible run: two scheduled trains, then random ones
//! caltrain-sim --passengers 40 --train 10 --train 0 --max-free-seats 8 --seed 42
//! ```

mod system_env;

use std::time::Duration;

use caltrain_core::Environment;
use caltrain_harness::{Scenario, ScenarioConfig, ScenarioError, ScenarioReport, SimEnv};
use clap::Parser;
use system_env::SystemEnv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Caltrain station simulation
#[derive(Parser, Debug)]
#[command(name = "caltrain-sim")]
#[command(about = "Simulate trains and passengers sharing one station")]
#[command(version)]
struct Args {
    /// Number of passengers
    #[arg(short, long, default_value = "100")]
    passengers: u32,

    /// Scheduled train with this many free seats (repeatable, runs in order)
    #[arg(short, long = "train", value_name = "SEATS")]
    trains: Vec<u32>,

    /// Upper bound for randomly sized trains after the schedule
    #[arg(long, default_value = "50")]
    max_free_seats: u32,

    /// Upper bound for a passenger's arrival delay, in milliseconds
    #[arg(long, default_value = "100")]
    max_arrival_delay_ms: u64,

    /// Upper bound for a passenger's boarding time, in milliseconds
    #[arg(long, default_value = "10")]
    max_boarding_delay_ms: u64,

    /// Pause between trains, in milliseconds
    #[arg(long, default_value = "20")]
    train_interval_ms: u64,

    /// Seed for a reproducible schedule (OS randomness if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn scenario_config(&self) -> ScenarioConfig {
        ScenarioConfig {
            passengers: self.passengers,
            scheduled_trains: self.trains.clone(),
            max_free_seats: self.max_free_seats,
            max_arrival_delay: Duration::from_millis(self.max_arrival_delay_ms),
            max_boarding_delay: Duration::from_millis(self.max_boarding_delay_ms),
            train_interval: Duration::from_millis(self.train_interval_ms),
        }
    }
}

fn run<E: Environment>(env: E, config: ScenarioConfig) -> Result<ScenarioReport, ScenarioError> {
    Scenario::new(env).with_config(config).run()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Caltrain simulation starting");

    let config = args.scenario_config();
    let report = match args.seed {
        Some(seed) => {
            tracing::info!("Using seed {}", seed);
            run(SimEnv::with_seed(seed), config)?
        },
        None => run(SystemEnv::new(), config)?,
    };

    for departure in &report.departures {
        tracing::info!(
            "Train {} departed: {}/{} seats filled",
            departure.arrival,
            departure.seats_filled,
            departure.seats_offered
        );
    }

    tracing::info!(
        "All {} passengers boarded {} of {} trains in {:?}",
        report.boarded(),
        report.trains_used(),
        report.departures.len(),
        report.elapsed
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_to_config() {
        let args = Args::parse_from([
            "caltrain-sim",
            "--passengers",
            "7",
            "--train",
            "3",
            "-t",
            "0",
            "--max-free-seats",
            "4",
            "--train-interval-ms",
            "1",
        ]);
        let config = args.scenario_config();

        assert_eq!(config.passengers, 7);
        assert_eq!(config.scheduled_trains, vec![3, 0]);
        assert_eq!(config.max_free_seats, 4);
        assert_eq!(config.train_interval, Duration::from_millis(1));
        assert_eq!(config.max_boarding_delay, Duration::from_millis(10));
    }

    #[test]
    fn defaults_match_scenario_defaults() {
        let args = Args::parse_from(["caltrain-sim"]);
        assert_eq!(args.scenario_config(), ScenarioConfig::default());
        assert!(args.seed.is_none());
    }

    #[test]
    fn seeded_run_boards_everyone() {
        let config = ScenarioConfig {
            passengers: 12,
            max_arrival_delay: Duration::ZERO,
            max_boarding_delay: Duration::ZERO,
            train_interval: Duration::from_millis(1),
            max_free_seats: 5,
            ..Default::default()
        };
        let report = run(SimEnv::with_seed(9), config).unwrap();
        assert_eq!(report.boarded(), 12);
    }
}
