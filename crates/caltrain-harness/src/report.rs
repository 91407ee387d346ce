//! Scenario report and its conservation checks.

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use caltrain_core::{BoardingPass, Departure};
use thiserror::Error;

/// A conservation property a finished run broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Not every spawned passenger ended up with a boarding pass.
    #[error("{boarded} of {passengers} passengers boarded")]
    PassengerCount {
        /// Passengers spawned.
        passengers: u32,
        /// Boarding passes collected.
        boarded: u32,
    },

    /// A train left with more passengers than seats.
    #[error("arrival {arrival} filled {seats_filled} of {seats_offered} seats")]
    Overfilled {
        /// Offending arrival.
        arrival: u64,
        /// Seats offered.
        seats_offered: u32,
        /// Seats reported filled.
        seats_filled: u32,
    },

    /// Two passengers hold the same seat.
    #[error("seat {seat} on arrival {arrival} claimed twice")]
    DuplicateSeat {
        /// Arrival number.
        arrival: u64,
        /// Seat index.
        seat: u32,
    },

    /// A boarding pass names a train that never departed.
    #[error("boarding pass for unknown arrival {arrival}")]
    UnknownArrival {
        /// Arrival number on the pass.
        arrival: u64,
    },

    /// A departure report disagrees with the passes issued for it.
    #[error("arrival {arrival} reported {seats_filled} seats filled, {passes} passes issued")]
    FillMismatch {
        /// Arrival number.
        arrival: u64,
        /// Seats the departure reported filled.
        seats_filled: u32,
        /// Boarding passes naming this arrival.
        passes: u32,
    },
}

/// Everything observed during one scenario run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Passengers spawned.
    pub passengers: u32,
    /// Trains in departure order.
    pub departures: Vec<Departure>,
    /// Boarding passes, one per passenger, in passenger order.
    pub passes: Vec<BoardingPass>,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl ScenarioReport {
    /// Passengers that boarded.
    pub fn boarded(&self) -> u32 {
        u32::try_from(self.passes.len()).unwrap_or(u32::MAX)
    }

    /// Total seats offered by all trains.
    pub fn seats_offered(&self) -> u64 {
        self.departures.iter().map(|d| u64::from(d.seats_offered)).sum()
    }

    /// Trains that left with at least one passenger.
    pub fn trains_used(&self) -> usize {
        self.departures.iter().filter(|d| d.seats_filled > 0).count()
    }

    /// Check the conservation properties of a finished run.
    ///
    /// - every passenger holds exactly one pass
    /// - no train fills more seats than it offered
    /// - seats are unique per arrival
    /// - every departure's fill count equals the passes naming it
    pub fn verify(&self) -> Result<(), Violation> {
        if self.boarded() != self.passengers {
            return Err(Violation::PassengerCount {
                passengers: self.passengers,
                boarded: self.boarded(),
            });
        }

        let mut filled: HashMap<u64, u32> = HashMap::with_capacity(self.departures.len());
        for d in &self.departures {
            if d.seats_filled > d.seats_offered {
                return Err(Violation::Overfilled {
                    arrival: d.arrival,
                    seats_offered: d.seats_offered,
                    seats_filled: d.seats_filled,
                });
            }
            filled.insert(d.arrival, d.seats_filled);
        }

        let mut seats = HashSet::with_capacity(self.passes.len());
        let mut passes_per_arrival: HashMap<u64, u32> = HashMap::new();
        for pass in &self.passes {
            if !filled.contains_key(&pass.arrival) {
                return Err(Violation::UnknownArrival { arrival: pass.arrival });
            }
            if !seats.insert((pass.arrival, pass.seat)) {
                return Err(Violation::DuplicateSeat { arrival: pass.arrival, seat: pass.seat });
            }
            *passes_per_arrival.entry(pass.arrival).or_default() += 1;
        }

        for d in &self.departures {
            let passes = passes_per_arrival.get(&d.arrival).copied().unwrap_or(0);
            if passes != d.seats_filled {
                return Err(Violation::FillMismatch {
                    arrival: d.arrival,
                    seats_filled: d.seats_filled,
                    passes,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departure(arrival: u64, seats_offered: u32, seats_filled: u32) -> Departure {
        Departure { arrival, seats_offered, seats_filled }
    }

    fn pass(arrival: u64, seat: u32) -> BoardingPass {
        BoardingPass { arrival, seat }
    }

    fn valid_report() -> ScenarioReport {
        ScenarioReport {
            passengers: 3,
            departures: vec![departure(1, 2, 2), departure(2, 0, 0), departure(3, 5, 1)],
            passes: vec![pass(1, 0), pass(1, 1), pass(3, 0)],
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn valid_report_passes() {
        let report = valid_report();
        assert_eq!(report.verify(), Ok(()));
        assert_eq!(report.seats_offered(), 7);
        assert_eq!(report.trains_used(), 2);
    }

    #[test]
    fn missing_passenger_detected() {
        let mut report = valid_report();
        report.passengers = 4;
        assert_eq!(report.verify(), Err(Violation::PassengerCount { passengers: 4, boarded: 3 }));
    }

    #[test]
    fn overfilled_train_detected() {
        let mut report = valid_report();
        report.departures[1] = departure(2, 0, 1);
        assert!(matches!(report.verify(), Err(Violation::Overfilled { arrival: 2, .. })));
    }

    #[test]
    fn duplicate_seat_detected() {
        let mut report = valid_report();
        report.passes[1] = pass(1, 0);
        assert_eq!(report.verify(), Err(Violation::DuplicateSeat { arrival: 1, seat: 0 }));
    }

    #[test]
    fn unknown_arrival_detected() {
        let mut report = valid_report();
        report.passes[2] = pass(9, 0);
        assert_eq!(report.verify(), Err(Violation::UnknownArrival { arrival: 9 }));
    }

    #[test]
    fn fill_mismatch_detected() {
        let mut report = valid_report();
        report.departures[2] = departure(3, 5, 2);
        assert_eq!(
            report.verify(),
            Err(Violation::FillMismatch { arrival: 3, seats_filled: 2, passes: 1 })
        );
    }
}
