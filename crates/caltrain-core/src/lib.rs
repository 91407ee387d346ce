//! Caltrain station boarding monitor.
//!
//! A train arrives with a fixed number of free seats and may not leave until
//! every passenger that claimed a seat has finished boarding and nobody who
//! could still sit is left on the platform. Passengers block until a train
//! with a free seat is present.
//!
//! ## Architecture
//!
//! ```text
//! caltrain-core
//!   ├─ StationState   (pure state machine: phase + counters)
//!   ├─ Station        (Mutex<StationState> + two Condvars)
//!   ├─ StationError   (usage errors, poisoned lock)
//!   └─ Environment    (time/randomness for drivers)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::thread;
//!
//! use caltrain_core::Station;
//!
//! let station = Station::new();
//!
//! thread::scope(|s| {
//!     s.spawn(|| {
//!         station.wait_to_board()?;
//!         station.on_board_complete()
//!     });
//!
//!     // Wait for the passenger to reach the platform before the train comes
//!     while station.snapshot()?.passengers_waiting == 0 {
//!         thread::yield_now();
//!     }
//!
//!     let departure = station.load(1)?;
//!     assert_eq!(departure.seats_filled, 1);
//!     Ok::<_, caltrain_core::StationError>(())
//! })?;
//! # Ok::<_, caltrain_core::StationError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod env;
mod error;
pub mod state;
mod station;

pub use env::Environment;
pub use error::StationError;
pub use state::{BoardingPass, Departure, StationPhase, StationSnapshot, StationState};
pub use station::Station;
