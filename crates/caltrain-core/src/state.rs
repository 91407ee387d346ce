//! Station state machine.
//!
//! Pure, non-blocking transitions over the station counters. [`Station`]
//! wraps this type in a mutex and two condition variables; everything that
//! decides *whether* a train may leave or a passenger may sit lives here, so
//! it can be tested and fuzzed without threads.
//!
//! # Invariants
//!
//! - `capacity_remaining` and `passengers_boarding` exist only while a train is
//!   at the platform. In [`StationPhase::Idle`] both read as zero.
//! - `capacity_remaining <= seats_offered`.
//! - `depart()` succeeds only when nobody is boarding and the train is either
//!   full or nobody is waiting.
//! - Counters are unsigned and every decrement is checked. An underflow is
//!   reported as a [`StationError`], never wrapped.
//!
//! [`Station`]: crate::Station

use crate::error::StationError;

/// Seat reservation handed to a passenger whose claim succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardingPass {
    /// Arrival number of the train the passenger boarded.
    pub arrival: u64,
    /// Seat index on that train, `0..seats_offered`.
    pub seat: u32,
}

/// Report returned when a train leaves the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// Arrival number, starting at 1.
    pub arrival: u64,
    /// Seats the train offered on arrival.
    pub seats_offered: u32,
    /// Seats claimed before departure.
    pub seats_filled: u32,
}

/// Train currently at the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boarding {
    /// Arrival number of this train.
    pub arrival: u64,
    /// Seats offered on arrival.
    pub seats_offered: u32,
    /// Seats nobody has claimed yet.
    pub capacity_remaining: u32,
    /// Passengers that claimed a seat and have not finished boarding.
    pub passengers_boarding: u32,
}

impl Boarding {
    fn seats_filled(&self) -> u32 {
        self.seats_offered - self.capacity_remaining
    }
}

/// Platform phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationPhase {
    /// No train at the platform.
    #[default]
    Idle,
    /// A train is at the platform accepting passengers.
    Boarding(Boarding),
}

/// Observable counters, copied out under the station lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StationSnapshot {
    /// Whether a train is at the platform.
    pub train_present: bool,
    /// Free seats on the present train (zero when idle).
    pub capacity_remaining: u32,
    /// Passengers waiting on the platform.
    pub passengers_waiting: u32,
    /// Passengers that claimed a seat and have not finished boarding.
    pub passengers_boarding: u32,
    /// Trains that have arrived so far.
    pub arrivals: u64,
}

/// Station counters with an explicit platform phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationState {
    phase: StationPhase,
    passengers_waiting: u32,
    arrivals: u64,
}

impl StationState {
    /// Create an idle station with nobody waiting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current platform phase.
    pub fn phase(&self) -> StationPhase {
        self.phase
    }

    /// Passengers waiting on the platform.
    pub fn passengers_waiting(&self) -> u32 {
        self.passengers_waiting
    }

    /// Free seats on the present train, zero when idle.
    pub fn capacity_remaining(&self) -> u32 {
        match self.phase {
            StationPhase::Idle => 0,
            StationPhase::Boarding(b) => b.capacity_remaining,
        }
    }

    /// Passengers between seat claim and boarding completion.
    pub fn passengers_boarding(&self) -> u32 {
        match self.phase {
            StationPhase::Idle => 0,
            StationPhase::Boarding(b) => b.passengers_boarding,
        }
    }

    /// Trains that have arrived so far.
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// A train arrives offering `seats` seats.
    ///
    /// Returns the arrival number. Zero seats is accepted: such a train is
    /// immediately ready to depart and boards nobody.
    pub fn arrive(&mut self, seats: u32) -> Result<u64, StationError> {
        if let StationPhase::Boarding(b) = self.phase {
            return Err(StationError::TrainAlreadyPresent { arrival: b.arrival });
        }

        self.arrivals += 1;
        self.phase = StationPhase::Boarding(Boarding {
            arrival: self.arrivals,
            seats_offered: seats,
            capacity_remaining: seats,
            passengers_boarding: 0,
        });

        Ok(self.arrivals)
    }

    /// A passenger steps onto the platform.
    pub fn join_queue(&mut self) {
        self.passengers_waiting += 1;
    }

    /// Whether a waiting passenger could claim a seat right now.
    pub fn has_free_seat(&self) -> bool {
        self.capacity_remaining() > 0
    }

    /// A waiting passenger takes one free seat.
    pub fn claim_seat(&mut self) -> Result<BoardingPass, StationError> {
        if self.passengers_waiting == 0 {
            return Err(StationError::NoPassengerWaiting);
        }

        let StationPhase::Boarding(boarding) = &mut self.phase else {
            return Err(StationError::NoFreeSeat);
        };
        if boarding.capacity_remaining == 0 {
            return Err(StationError::NoFreeSeat);
        }

        let seat = boarding.seats_filled();
        boarding.capacity_remaining -= 1;
        boarding.passengers_boarding += 1;
        self.passengers_waiting -= 1;

        Ok(BoardingPass { arrival: boarding.arrival, seat })
    }

    /// A seated passenger reports that boarding finished.
    ///
    /// Returns true if this was the last passenger still boarding, which is
    /// the moment the train may need waking.
    pub fn complete_boarding(&mut self) -> Result<bool, StationError> {
        let StationPhase::Boarding(boarding) = &mut self.phase else {
            return Err(StationError::NoPassengerBoarding);
        };

        boarding.passengers_boarding = boarding
            .passengers_boarding
            .checked_sub(1)
            .ok_or(StationError::NoPassengerBoarding)?;

        Ok(boarding.passengers_boarding == 0)
    }

    /// Departure predicate: nobody boarding, and the train is full or the
    /// platform is empty.
    ///
    /// Always true while idle.
    pub fn ready_to_depart(&self) -> bool {
        match self.phase {
            StationPhase::Idle => true,
            StationPhase::Boarding(b) => {
                b.passengers_boarding == 0
                    && (self.passengers_waiting == 0 || b.capacity_remaining == 0)
            },
        }
    }

    /// The present train leaves; no seats exist until the next arrival.
    pub fn depart(&mut self) -> Result<Departure, StationError> {
        let StationPhase::Boarding(boarding) = self.phase else {
            return Err(StationError::NoTrainPresent);
        };

        if !self.ready_to_depart() {
            return Err(StationError::DepartureBlocked {
                passengers_boarding: boarding.passengers_boarding,
                passengers_waiting: self.passengers_waiting,
                capacity_remaining: boarding.capacity_remaining,
            });
        }

        self.phase = StationPhase::Idle;

        Ok(Departure {
            arrival: boarding.arrival,
            seats_offered: boarding.seats_offered,
            seats_filled: boarding.seats_filled(),
        })
    }

    /// Copy of the observable counters.
    pub fn snapshot(&self) -> StationSnapshot {
        StationSnapshot {
            train_present: matches!(self.phase, StationPhase::Boarding(_)),
            capacity_remaining: self.capacity_remaining(),
            passengers_waiting: self.passengers_waiting,
            passengers_boarding: self.passengers_boarding(),
            arrivals: self.arrivals,
        }
    }
}
