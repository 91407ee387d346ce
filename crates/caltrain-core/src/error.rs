//! Station error types.

use std::sync::PoisonError;

use thiserror::Error;

/// Errors from station operations.
///
/// Every variant except [`StationError::Poisoned`] is a usage error: the
/// caller drove a train or passenger through the wrong sequence of calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StationError {
    /// A train arrived while another one is still at the platform.
    #[error("train already present: arrival {arrival} has not departed")]
    TrainAlreadyPresent {
        /// Arrival number of the train occupying the platform.
        arrival: u64,
    },

    /// Departure requested with no train at the platform.
    #[error("no train present")]
    NoTrainPresent,

    /// Seat claim with no free seat on the present train.
    #[error("no free seat")]
    NoFreeSeat,

    /// Seat claim by a passenger that never joined the queue.
    #[error("no passenger waiting")]
    NoPassengerWaiting,

    /// Boarding completion without a matching seat claim.
    #[error("no passenger boarding")]
    NoPassengerBoarding,

    /// Departure requested while passengers can still board.
    #[error(
        "departure blocked: {passengers_boarding} boarding, {passengers_waiting} waiting, \
         {capacity_remaining} seats free"
    )]
    DepartureBlocked {
        /// Passengers that claimed a seat but have not finished boarding.
        passengers_boarding: u32,
        /// Passengers on the platform.
        passengers_waiting: u32,
        /// Free seats on the present train.
        capacity_remaining: u32,
    },

    /// An actor panicked while holding the station lock.
    #[error("station lock poisoned")]
    Poisoned,
}

impl StationError {
    /// Returns true if this error is fatal (unrecoverable).
    ///
    /// Transient errors clear once the current arrival cycle completes.
    pub fn is_fatal(&self) -> bool {
        match self {
            // Transient: the platform frees up after departure
            Self::TrainAlreadyPresent { .. } | Self::DepartureBlocked { .. } => false,

            // Fatal: call-sequence violations, poisoned lock
            Self::NoTrainPresent
            | Self::NoFreeSeat
            | Self::NoPassengerWaiting
            | Self::NoPassengerBoarding
            | Self::Poisoned => true,
        }
    }
}

impl<T> From<PoisonError<T>> for StationError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_already_present_is_transient() {
        let err = StationError::TrainAlreadyPresent { arrival: 3 };
        assert!(!err.is_fatal());
    }

    #[test]
    fn departure_blocked_is_transient() {
        let err = StationError::DepartureBlocked {
            passengers_boarding: 1,
            passengers_waiting: 0,
            capacity_remaining: 2,
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn boarding_underflow_is_fatal() {
        assert!(StationError::NoPassengerBoarding.is_fatal());
        assert!(StationError::Poisoned.is_fatal());
    }

    #[test]
    fn error_display() {
        let err = StationError::DepartureBlocked {
            passengers_boarding: 2,
            passengers_waiting: 4,
            capacity_remaining: 1,
        };
        assert_eq!(
            err.to_string(),
            "departure blocked: 2 boarding, 4 waiting, 1 seats free"
        );
    }
}
