//! Fuzz target for the [`StationState`] machine
//!
//! Prevent lost passengers and overfilled trains via invalid transitions
//!
//! # Strategy
//!
//! - Event sequences: Arbitrary interleavings of arrivals, seat claims,
//!   boarding completions and departures
//! - Out-of-phase events: Claims and completions with no train present
//! - Capacity edges: Zero-seat trains and trains larger than the queue
//!
//! # Invariants
//!
//! - Counters never underflow; failed events leave the state untouched
//! - `Idle` implies zero free seats and nobody boarding
//! - Seat numbers stay below the seats offered by the issuing train
//! - Departure ONLY succeeds when `ready_to_depart` held beforehand
//! - Waiting plus boarded passengers always equals passengers arrived
//! - NEVER panic on an out-of-phase event

#![no_main]

use arbitrary::Arbitrary;
use caltrain_core::{StationPhase, StationState};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum StationEvent {
    PassengerArrives,
    TrainArrives { seats: u8 },
    ClaimSeat,
    CompleteBoarding,
    TrainDeparts,
}

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    /// Passengers already on the platform before the first event.
    initial_waiting: u8,
    /// Event sequence to process.
    events: Vec<StationEvent>,
}

fuzz_target!(|input: FuzzInput| {
    let mut state = StationState::new();
    for _ in 0..input.initial_waiting {
        state.join_queue();
    }

    let mut arrived = u64::from(input.initial_waiting);
    let mut boarded: u64 = 0;

    for event in input.events {
        let before = state.clone();

        let ok = match event {
            StationEvent::PassengerArrives => {
                state.join_queue();
                arrived += 1;
                true
            },
            StationEvent::TrainArrives { seats } => {
                let result = state.arrive(u32::from(seats));
                if let Ok(arrival) = result {
                    assert_eq!(arrival, before.arrivals() + 1, "arrival numbers must be sequential");
                }
                result.is_ok()
            },
            StationEvent::ClaimSeat => match state.claim_seat() {
                Ok(pass) => {
                    let StationPhase::Boarding(b) = state.phase() else {
                        panic!("seat claimed with no train present");
                    };
                    assert_eq!(pass.arrival, b.arrival);
                    assert!(pass.seat < b.seats_offered, "seat {} of {}", pass.seat, b.seats_offered);
                    boarded += 1;
                    true
                },
                Err(_) => false,
            },
            StationEvent::CompleteBoarding => state.complete_boarding().is_ok(),
            StationEvent::TrainDeparts => match state.depart() {
                Ok(departure) => {
                    assert!(before.ready_to_depart(), "departed while blocked");
                    assert_eq!(before.passengers_boarding(), 0);
                    assert!(departure.seats_filled <= departure.seats_offered);
                    assert_eq!(state.phase(), StationPhase::Idle);
                    true
                },
                Err(_) => false,
            },
        };

        if !ok {
            assert_eq!(before, state, "failed event mutated state: {:?}", event);
        }

        match state.phase() {
            StationPhase::Idle => {
                assert_eq!(state.capacity_remaining(), 0);
                assert_eq!(state.passengers_boarding(), 0);
            },
            StationPhase::Boarding(b) => {
                assert!(b.capacity_remaining <= b.seats_offered);
                assert!(b.passengers_boarding <= b.seats_offered - b.capacity_remaining);
            },
        }

        assert_eq!(u64::from(state.passengers_waiting()) + boarded, arrived);
    }
});
