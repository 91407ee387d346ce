//! Reference model for model-based testing.
//!
//! The model is the station reduced to three integers and a flag, exactly
//! the arithmetic a train and its passengers agree on. It serves as the
//! oracle against which the phase-based `StationState` is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Captures WHAT, not HOW: no locks, no phases, no threads
//! - Deterministic: Same inputs produce same outputs

pub mod operation;
mod station;
mod world;

pub use operation::{Operation, OperationError, OperationResult};
pub use station::ModelStation;
pub use world::{ModelDeparture, ModelWorld, ObservableState};
