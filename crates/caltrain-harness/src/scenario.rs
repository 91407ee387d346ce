//! Threaded scenario driver.
//!
//! Spawns one OS thread per passenger, then plays the train dispatcher on the
//! calling thread: scheduled trains first, then randomly sized trains until
//! every passenger is aboard. The finished run is verified and handed to an
//! optional oracle.
//!
//! ```text
//! passenger-0 ─┐
//! passenger-1 ─┼─ wait_to_board ─ board ─ on_board_complete ─┐
//! passenger-N ─┘                                              │
//!                                 Station                    join
//! dispatcher ── load(s1) ── load(s2) ── ... ── load(sk) ─────┘
//!                                                     │
//!                                           ScenarioReport::verify
//!                                                     │
//!                                                  oracle
//! ```

use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use caltrain_core::{BoardingPass, Departure, Environment, Station, StationError};
use thiserror::Error;

use crate::report::{ScenarioReport, Violation};

/// Oracle run against the report of a verified scenario.
pub type Oracle = Box<dyn Fn(&ScenarioReport) -> Result<(), String> + Send>;

/// Errors from scenario runs.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The configuration cannot finish.
    #[error("invalid scenario config: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// A passenger thread could not be spawned.
    #[error("failed to spawn passenger thread: {0}")]
    Spawn(#[from] io::Error),

    /// A station operation failed.
    #[error("station error: {0}")]
    Station(#[from] StationError),

    /// A passenger thread panicked.
    #[error("passenger {passenger} panicked")]
    PassengerPanicked {
        /// Index of the passenger.
        passenger: u32,
    },

    /// The finished run broke a conservation property.
    #[error("conservation violated: {0}")]
    Violation(#[from] Violation),

    /// The oracle rejected the report.
    #[error("oracle failed: {reason}")]
    OracleFailed {
        /// Oracle message.
        reason: String,
    },
}

/// Scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Passenger threads to spawn.
    pub passengers: u32,
    /// Seat counts dispatched first, in order.
    pub scheduled_trains: Vec<u32>,
    /// Upper bound (inclusive) for randomly sized trains.
    pub max_free_seats: u32,
    /// Upper bound for the delay before a passenger reaches the platform.
    pub max_arrival_delay: Duration,
    /// Upper bound for the time a passenger spends boarding.
    pub max_boarding_delay: Duration,
    /// Pause between consecutive trains.
    pub train_interval: Duration,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            passengers: 100,
            scheduled_trains: Vec::new(),
            max_free_seats: 50,
            max_arrival_delay: Duration::from_millis(100),
            max_boarding_delay: Duration::from_millis(10),
            train_interval: Duration::from_millis(20),
        }
    }
}

impl ScenarioConfig {
    /// Reject configurations that could strand passengers forever.
    ///
    /// Scheduled seats alone are not enough: a passenger that reaches the
    /// platform after the last scheduled train can only be picked up by a
    /// randomly sized one.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.passengers > 0 && self.max_free_seats == 0 {
            return Err(ScenarioError::InvalidConfig {
                reason: format!("{} passengers but max_free_seats = 0", self.passengers),
            });
        }
        Ok(())
    }
}

/// Scenario builder.
pub struct Scenario<E: Environment> {
    env: E,
    config: ScenarioConfig,
    oracle: Option<Oracle>,
}

impl<E: Environment> Scenario<E> {
    /// Create a scenario with the default configuration.
    pub fn new(env: E) -> Self {
        Self { env, config: ScenarioConfig::default(), oracle: None }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of passengers.
    #[must_use]
    pub fn passengers(mut self, passengers: u32) -> Self {
        self.config.passengers = passengers;
        self
    }

    /// Append a scheduled train.
    #[must_use]
    pub fn train(mut self, seats: u32) -> Self {
        self.config.scheduled_trains.push(seats);
        self
    }

    /// Set the upper bound for randomly sized trains.
    #[must_use]
    pub fn max_free_seats(mut self, seats: u32) -> Self {
        self.config.max_free_seats = seats;
        self
    }

    /// Set the oracle.
    #[must_use]
    pub fn oracle(mut self, oracle: Oracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Run the scenario to completion.
    ///
    /// Returns once every passenger is aboard and every scheduled train has
    /// left. On a station error the dispatcher stops and any passenger still
    /// on the platform is left blocked.
    pub fn run(self) -> Result<ScenarioReport, ScenarioError> {
        self.config.validate()?;

        let started = self.env.now();
        let station = Arc::new(Station::new());

        tracing::info!(
            passengers = self.config.passengers,
            scheduled = self.config.scheduled_trains.len(),
            max_free_seats = self.config.max_free_seats,
            "scenario starting"
        );

        let riders = (0..self.config.passengers)
            .map(|id| self.spawn_passenger(id, &station))
            .collect::<Result<Vec<_>, _>>()?;

        let departures = self.dispatch(&station)?;

        let mut passes = Vec::with_capacity(riders.len());
        for (id, rider) in riders.into_iter().enumerate() {
            let passenger = u32::try_from(id).unwrap_or(u32::MAX);
            let pass = rider.join().map_err(|_| ScenarioError::PassengerPanicked { passenger })?;
            passes.push(pass?);
        }

        let report = ScenarioReport {
            passengers: self.config.passengers,
            departures,
            passes,
            elapsed: self.env.now() - started,
        };

        report.verify()?;

        tracing::info!(
            boarded = report.boarded(),
            trains = report.departures.len(),
            trains_used = report.trains_used(),
            elapsed_ms = report.elapsed.as_millis(),
            "scenario finished"
        );

        if let Some(oracle) = &self.oracle {
            oracle(&report).map_err(|reason| ScenarioError::OracleFailed { reason })?;
        }

        Ok(report)
    }

    fn spawn_passenger(
        &self,
        id: u32,
        station: &Arc<Station>,
    ) -> Result<JoinHandle<Result<BoardingPass, StationError>>, ScenarioError> {
        let station = Arc::clone(station);
        let env = self.env.clone();
        let arrival_delay = env.random_duration(self.config.max_arrival_delay);
        let boarding_delay = env.random_duration(self.config.max_boarding_delay);

        let rider = move || -> Result<BoardingPass, StationError> {
            env.sleep(arrival_delay);
            let pass = station.wait_to_board()?;

            env.sleep(boarding_delay);
            station.on_board_complete()?;

            tracing::trace!(passenger = id, arrival = pass.arrival, seat = pass.seat, "aboard");
            Ok(pass)
        };

        let handle = thread::Builder::new().name(format!("passenger-{id}")).spawn(rider)?;

        Ok(handle)
    }

    /// Play the dispatcher until the schedule is exhausted and nobody is left.
    fn dispatch(&self, station: &Station) -> Result<Vec<Departure>, ScenarioError> {
        let mut departures = Vec::new();
        let mut boarded = 0u32;
        let mut schedule = self.config.scheduled_trains.iter().copied();

        loop {
            let seats = match schedule.next() {
                Some(seats) => seats,
                None if boarded < self.config.passengers => self.random_seats(),
                None => break,
            };

            let departure = station.load(seats).inspect_err(|e| {
                tracing::error!(error = %e, boarded, "dispatcher stopped");
            })?;

            tracing::debug!(
                arrival = departure.arrival,
                seats_offered = departure.seats_offered,
                seats_filled = departure.seats_filled,
                "train departed"
            );

            boarded += departure.seats_filled;
            departures.push(departure);
            self.env.sleep(self.config.train_interval);
        }

        Ok(departures)
    }

    fn random_seats(&self) -> u32 {
        let bound = u64::from(self.config.max_free_seats) + 1;
        u32::try_from(self.env.random_below(bound)).unwrap_or(self.config.max_free_seats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimEnv;

    #[test]
    fn default_config_is_valid() {
        assert!(ScenarioConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_free_seats_without_schedule_is_rejected() {
        let config = ScenarioConfig { max_free_seats: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ScenarioError::InvalidConfig { .. })));
    }

    #[test]
    fn zero_free_seats_with_scheduled_seats_is_still_rejected() {
        let config = ScenarioConfig {
            passengers: 4,
            scheduled_trains: vec![1, 3],
            max_free_seats: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScenarioError::InvalidConfig { .. })));
    }

    #[test]
    fn zero_free_seats_without_passengers_is_valid() {
        let config = ScenarioConfig { passengers: 0, max_free_seats: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_config() {
        let scenario =
            Scenario::new(SimEnv::new()).passengers(7).train(3).train(0).max_free_seats(2);
        assert_eq!(scenario.config().passengers, 7);
        assert_eq!(scenario.config().scheduled_trains, vec![3, 0]);
        assert_eq!(scenario.config().max_free_seats, 2);
    }

    #[test]
    fn random_seats_stay_in_bounds() {
        let scenario = Scenario::new(SimEnv::with_seed(3)).max_free_seats(4);
        for _ in 0..200 {
            assert!(scenario.random_seats() <= 4);
        }
    }

    #[test]
    fn no_passengers_runs_schedule_only() {
        let report = Scenario::new(SimEnv::new().with_time_dilation(1000))
            .passengers(0)
            .train(2)
            .train(5)
            .run()
            .unwrap();

        assert_eq!(report.departures.len(), 2);
        assert_eq!(report.seats_offered(), 7);
        assert!(report.passes.is_empty());
    }

    #[test]
    fn dispatcher_stops_on_station_error_leaving_waiters_blocked() {
        let station = Arc::new(Station::new());
        let wait_for = |predicate: fn(&caltrain_core::StationSnapshot) -> bool| {
            while !predicate(&station.snapshot().unwrap()) {
                thread::sleep(Duration::from_millis(1));
            }
        };

        // Claims the only seat and never finishes boarding
        let boarder = Arc::clone(&station);
        thread::spawn(move || boarder.wait_to_board());
        wait_for(|snap| snap.passengers_waiting == 1);

        let train = Arc::clone(&station);
        thread::spawn(move || train.load(1));
        wait_for(|snap| snap.passengers_boarding == 1);

        // Arrives after the seat is gone
        let stranded = Arc::clone(&station);
        thread::spawn(move || stranded.wait_to_board());
        wait_for(|snap| snap.passengers_waiting == 1);

        let scenario = Scenario::new(SimEnv::new()).passengers(2).train(3);
        let result = scenario.dispatch(&station);

        assert!(matches!(
            result,
            Err(ScenarioError::Station(StationError::TrainAlreadyPresent { arrival: 1 }))
        ));
        let snapshot = station.snapshot().unwrap();
        assert_eq!(snapshot.passengers_waiting, 1);
        assert_eq!(snapshot.arrivals, 1);
    }
}
