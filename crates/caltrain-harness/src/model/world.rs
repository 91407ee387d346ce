//! Model world.
//!
//! Applies operations to the model station and keeps the per-train history
//! the real implementation is checked against.

use caltrain_core::StationSnapshot;

use super::{
    operation::{Operation, OperationResult},
    station::ModelStation,
};

/// Observable state for oracle comparison.
///
/// The subset of station state both the model and the real state machine
/// expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservableState {
    /// Whether a train is at the platform.
    pub train_present: bool,
    /// Unclaimed seats on the present train.
    pub capacity_remaining: u32,
    /// Passengers on the platform.
    pub passengers_waiting: u32,
    /// Passengers between seat claim and boarding completion.
    pub passengers_boarding: u32,
    /// Trains that have arrived.
    pub arrivals: u64,
}

impl From<StationSnapshot> for ObservableState {
    fn from(snapshot: StationSnapshot) -> Self {
        Self {
            train_present: snapshot.train_present,
            capacity_remaining: snapshot.capacity_remaining,
            passengers_waiting: snapshot.passengers_waiting,
            passengers_boarding: snapshot.passengers_boarding,
            arrivals: snapshot.arrivals,
        }
    }
}

/// A train that left the model station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelDeparture {
    /// Seats offered on arrival.
    pub seats_offered: u32,
    /// Seats claimed before departure.
    pub seats_filled: u32,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone, Default)]
pub struct ModelWorld {
    station: ModelStation,
    /// Every train that departed, in order.
    departures: Vec<ModelDeparture>,
    /// Passengers that finished boarding.
    boarded: u32,
}

impl ModelWorld {
    /// Create a world with an empty station.
    pub fn new() -> Self {
        Self::default()
    }

    /// The model station.
    pub fn station(&self) -> &ModelStation {
        &self.station
    }

    /// Trains that departed, in order.
    pub fn departures(&self) -> &[ModelDeparture] {
        &self.departures
    }

    /// Passengers that finished boarding.
    pub fn boarded(&self) -> u32 {
        self.boarded
    }

    /// Apply an operation and return the result.
    ///
    /// The result should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match op {
            Operation::PassengerArrives => self.station.join_queue(),
            Operation::TrainArrives { seats } => self.station.arrive(u32::from(*seats)),
            Operation::ClaimSeat => self.station.claim_seat(),
            Operation::CompleteBoarding => {
                let result = self.station.complete_boarding();
                if result.is_ok() {
                    self.boarded += 1;
                }
                result
            },
            Operation::TrainDeparts => {
                let departure = ModelDeparture {
                    seats_offered: self.station.seats_offered(),
                    seats_filled: self.station.seats_filled(),
                };
                let result = self.station.depart();
                if result.is_ok() {
                    self.departures.push(departure);
                }
                result
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            train_present: self.station.train_present(),
            capacity_remaining: self.station.capacity_remaining(),
            passengers_waiting: self.station.passengers_waiting(),
            passengers_boarding: self.station.passengers_boarding(),
            arrivals: self.station.arrivals(),
        }
    }
}
