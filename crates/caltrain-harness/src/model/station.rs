//! Model station.
//!
//! The plain three-counter version of the station: free seats, passengers
//! waiting, passengers boarding, plus a flag for the train. No phases, no
//! locking, just the arithmetic.

use super::operation::{OperationError, OperationResult};

/// Model station state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelStation {
    /// Whether a train is at the platform.
    train_present: bool,
    /// Seats the present train offered.
    seats_offered: u32,
    /// Unclaimed seats on the present train.
    capacity_remaining: u32,
    /// Passengers on the platform.
    passengers_waiting: u32,
    /// Passengers between seat claim and boarding completion.
    passengers_boarding: u32,
    /// Trains that have arrived.
    arrivals: u64,
}

impl ModelStation {
    /// Create an empty station.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a train is at the platform.
    pub fn train_present(&self) -> bool {
        self.train_present
    }

    /// Unclaimed seats on the present train.
    pub fn capacity_remaining(&self) -> u32 {
        self.capacity_remaining
    }

    /// Passengers on the platform.
    pub fn passengers_waiting(&self) -> u32 {
        self.passengers_waiting
    }

    /// Passengers between seat claim and boarding completion.
    pub fn passengers_boarding(&self) -> u32 {
        self.passengers_boarding
    }

    /// Trains that have arrived.
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Seats the present train offered.
    pub fn seats_offered(&self) -> u32 {
        self.seats_offered
    }

    /// Seats claimed on the present train.
    pub fn seats_filled(&self) -> u32 {
        self.seats_offered - self.capacity_remaining
    }

    /// A train arrives with `seats` free seats.
    pub fn arrive(&mut self, seats: u32) -> OperationResult {
        if self.train_present {
            return OperationResult::Error(OperationError::TrainAlreadyPresent);
        }

        self.train_present = true;
        self.seats_offered = seats;
        self.capacity_remaining = seats;
        self.arrivals += 1;
        OperationResult::Ok
    }

    /// A passenger steps onto the platform.
    pub fn join_queue(&mut self) -> OperationResult {
        self.passengers_waiting += 1;
        OperationResult::Ok
    }

    /// A waiting passenger takes a free seat.
    pub fn claim_seat(&mut self) -> OperationResult {
        if self.passengers_waiting == 0 {
            return OperationResult::Error(OperationError::NoPassengerWaiting);
        }
        if self.capacity_remaining == 0 {
            return OperationResult::Error(OperationError::NoFreeSeat);
        }

        self.passengers_waiting -= 1;
        self.capacity_remaining -= 1;
        self.passengers_boarding += 1;
        OperationResult::Ok
    }

    /// A seated passenger finishes boarding.
    pub fn complete_boarding(&mut self) -> OperationResult {
        if self.passengers_boarding == 0 {
            return OperationResult::Error(OperationError::NoPassengerBoarding);
        }

        self.passengers_boarding -= 1;
        OperationResult::Ok
    }

    /// The loop condition a departing train waits on.
    pub fn must_wait(&self) -> bool {
        self.passengers_boarding != 0
            || (self.passengers_waiting != 0 && self.capacity_remaining != 0)
    }

    /// The present train leaves.
    pub fn depart(&mut self) -> OperationResult {
        if !self.train_present {
            return OperationResult::Error(OperationError::NoTrainPresent);
        }
        if self.must_wait() {
            return OperationResult::Error(OperationError::DepartureBlocked);
        }

        self.train_present = false;
        self.seats_offered = 0;
        self.capacity_remaining = 0;
        OperationResult::Ok
    }
}
