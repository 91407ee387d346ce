//! Blocking station monitor.
//!
//! One mutex guards the [`StationState`]; two condition variables carry the
//! wakeups between the two actor roles:
//!
//! ```text
//!   train                      train_arrived                passenger
//!   load(seats) ──arrive──────────notify_all──────────▶ wait_to_board()
//!       │                                                   │ claim_seat
//!       │ wait_while !ready_to_depart                       ▼
//!       ◀──────────────────── train_ready ◀─notify_one── on_board_complete()
//!       │                                  (last boarder)
//!   depart
//! ```
//!
//! Every wait is a predicate re-check loop (`Condvar::wait_while`), so
//! spurious wakeups and broadcasts meant for other passengers are harmless.

use std::sync::{Condvar, Mutex, MutexGuard};

use crate::{
    error::StationError,
    state::{BoardingPass, Departure, StationSnapshot, StationState},
};

/// Shared station coordinating one train at a time with any number of
/// passengers.
///
/// Share it by reference between scoped threads, or wrap it in an `Arc`.
#[derive(Debug, Default)]
pub struct Station {
    state: Mutex<StationState>,
    /// Woken (broadcast) whenever a train arrives.
    train_arrived: Condvar,
    /// Woken when the last boarding passenger finishes.
    train_ready: Condvar,
}

impl Station {
    /// Create an idle station with nobody waiting.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StationState::new()),
            train_arrived: Condvar::new(),
            train_ready: Condvar::new(),
        }
    }

    /// A train arrives with `seats` free seats and waits to depart.
    ///
    /// Blocks until every passenger that claimed a seat on this train has
    /// called [`Station::on_board_complete`], and the train is either full or
    /// nobody is left waiting. Zero seats departs immediately.
    ///
    /// # Errors
    ///
    /// - [`StationError::TrainAlreadyPresent`] if another train is boarding
    /// - [`StationError::Poisoned`] if an actor panicked holding the lock
    pub fn load(&self, seats: u32) -> Result<Departure, StationError> {
        let mut state = self.lock()?;
        let arrival = state.arrive(seats).inspect_err(|e| {
            tracing::warn!(seats, error = %e, "train rejected");
        })?;

        tracing::debug!(arrival, seats, waiting = state.passengers_waiting(), "train arrived");
        self.train_arrived.notify_all();

        let mut state = self.train_ready.wait_while(state, |s| !s.ready_to_depart())?;
        let departure = state.depart()?;

        tracing::debug!(
            arrival,
            seats_filled = departure.seats_filled,
            waiting = state.passengers_waiting(),
            "train departed"
        );

        Ok(departure)
    }

    /// A passenger waits on the platform until it holds a seat.
    ///
    /// Returns only once a seat on the present train has been reserved for
    /// this caller. The caller must follow up with
    /// [`Station::on_board_complete`] once it is aboard.
    ///
    /// # Errors
    ///
    /// - [`StationError::Poisoned`] if an actor panicked holding the lock
    pub fn wait_to_board(&self) -> Result<BoardingPass, StationError> {
        let mut state = self.lock()?;
        state.join_queue();

        let mut state = self.train_arrived.wait_while(state, |s| !s.has_free_seat())?;
        let pass = state.claim_seat()?;

        tracing::trace!(arrival = pass.arrival, seat = pass.seat, "seat claimed");

        Ok(pass)
    }

    /// A passenger that claimed a seat reports it is aboard.
    ///
    /// Wakes the train when the last boarding passenger finishes. Never
    /// blocks beyond acquiring the lock.
    ///
    /// # Errors
    ///
    /// - [`StationError::NoPassengerBoarding`] without a matching seat claim
    /// - [`StationError::Poisoned`] if an actor panicked holding the lock
    pub fn on_board_complete(&self) -> Result<(), StationError> {
        let mut state = self.lock()?;
        let last = state.complete_boarding().inspect_err(|e| {
            tracing::warn!(error = %e, "boarding completion rejected");
        })?;

        tracing::trace!(last, "boarding complete");

        if last {
            self.train_ready.notify_one();
        }

        Ok(())
    }

    /// Copy of the current counters.
    ///
    /// # Errors
    ///
    /// - [`StationError::Poisoned`] if an actor panicked holding the lock
    pub fn snapshot(&self) -> Result<StationSnapshot, StationError> {
        Ok(self.lock()?.snapshot())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StationState>, StationError> {
        Ok(self.state.lock()?)
    }
}
