//! Simulation harness for the caltrain station.
//!
//! Seeded environment and threaded scenario driver for exercising the
//! station with many concurrent passengers.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference implementation for model-based
//! testing. Operations are applied to both the model and the real state
//! machine, and their observable states are compared.
//!
//! # Scenarios
//!
//! [`Scenario`] spawns passenger threads against a real [`Station`], drives
//! trains until everyone is aboard and checks the run with
//! [`ScenarioReport::verify`].
//!
//! ```rust,no_run
//! use caltrain_harness::{Scenario, SimEnv};
//!
//! let report = Scenario::new(SimEnv::with_seed(7).with_time_dilation(100))
//!     .passengers(50)
//!     .train(10)
//!     .max_free_seats(20)
//!     .run()?;
//! assert_eq!(report.boarded(), 50);
//! # Ok::<_, caltrain_harness::ScenarioError>(())
//! ```
//!
//! [`Station`]: caltrain_core::Station

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod report;
pub mod scenario;
pub mod sim_env;

pub use model::{
    ModelDeparture, ModelStation, ModelWorld, ObservableState, Operation, OperationError,
    OperationResult,
};
pub use report::{ScenarioReport, Violation};
pub use scenario::{Oracle, Scenario, ScenarioConfig, ScenarioError};
pub use sim_env::SimEnv;
