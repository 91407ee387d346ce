//! Operations for model-based testing.
//!
//! Operations are the individual state-machine steps a station goes through.
//! They are generated randomly by proptest (or the fuzzer) and applied to
//! both the model and the real state machine.

use arbitrary::Arbitrary;
use caltrain_core::StationError;

/// Steps that can be applied to a station.
///
/// A blocking `wait_to_board` is `PassengerArrives` followed later by
/// `ClaimSeat`; a blocking `load` is `TrainArrives` followed later by
/// `TrainDeparts`. Splitting them lets the generator interleave the halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// A passenger steps onto the platform.
    PassengerArrives,

    /// A train arrives.
    TrainArrives {
        /// Seats offered (kept small so trains fill up).
        seats: u8,
    },

    /// A waiting passenger takes a free seat.
    ClaimSeat,

    /// A seated passenger finishes boarding.
    CompleteBoarding,

    /// The present train tries to leave.
    TrainDeparts,
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// A train is already at the platform.
    TrainAlreadyPresent,

    /// No train at the platform.
    NoTrainPresent,

    /// The present train has no free seat (or there is no train).
    NoFreeSeat,

    /// Nobody is waiting on the platform.
    NoPassengerWaiting,

    /// Nobody is boarding.
    NoPassengerBoarding,

    /// The train may not leave yet.
    DepartureBlocked,

    /// The station lock was poisoned (real system only).
    Poisoned,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, OperationResult::Ok)
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

impl From<&StationError> for OperationError {
    fn from(err: &StationError) -> Self {
        match err {
            StationError::TrainAlreadyPresent { .. } => Self::TrainAlreadyPresent,
            StationError::NoTrainPresent => Self::NoTrainPresent,
            StationError::NoFreeSeat => Self::NoFreeSeat,
            StationError::NoPassengerWaiting => Self::NoPassengerWaiting,
            StationError::NoPassengerBoarding => Self::NoPassengerBoarding,
            StationError::DepartureBlocked { .. } => Self::DepartureBlocked,
            StationError::Poisoned => Self::Poisoned,
        }
    }
}

impl<T> From<Result<T, StationError>> for OperationResult {
    fn from(result: Result<T, StationError>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => Self::Error(OperationError::from(&e)),
        }
    }
}
