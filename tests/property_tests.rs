//! Property-based tests for the execution engine.
//!
//! These tests use proptest to drive random event sequences through a
//! machine and check the invariants that must hold after every call.

use proptest::prelude::*;
use std::sync::Arc;
use strata::ident_enum;
use strata::machine::{FireOutcome, StateMachine};
use strata::model::{ModelBuilder, StateModel, Transition};
use strata::{MachineError, MachineStatus};

ident_enum! {
    enum AtmState {
        Idle,
        Loading,
        InService,
        OutOfService,
        Disconnected,
    }
}

ident_enum! {
    enum AtmEvent {
        Connected,
        ConnectionClosed,
        LoadSuccess,
        LoadFail,
        ConnectionLost,
        Startup,
        Shutdown,
        ConnectionRestored,
    }
}

const TRANSITIONS: [(AtmState, AtmEvent, AtmState); 9] = [
    (AtmState::Idle, AtmEvent::Connected, AtmState::Loading),
    (AtmState::Loading, AtmEvent::ConnectionClosed, AtmState::Disconnected),
    (AtmState::Loading, AtmEvent::LoadSuccess, AtmState::InService),
    (AtmState::Loading, AtmEvent::LoadFail, AtmState::OutOfService),
    (AtmState::OutOfService, AtmEvent::ConnectionLost, AtmState::Disconnected),
    (AtmState::OutOfService, AtmEvent::Startup, AtmState::InService),
    (AtmState::InService, AtmEvent::Shutdown, AtmState::OutOfService),
    (AtmState::InService, AtmEvent::ConnectionLost, AtmState::Disconnected),
    (AtmState::Disconnected, AtmEvent::ConnectionRestored, AtmState::InService),
];

fn atm_model() -> Arc<StateModel<AtmState, AtmEvent, ()>> {
    let mut builder = ModelBuilder::new();
    for state in [
        AtmState::Idle,
        AtmState::Loading,
        AtmState::InService,
        AtmState::OutOfService,
        AtmState::Disconnected,
    ] {
        builder = builder.state(state);
    }
    for (from, on, to) in TRANSITIONS {
        builder = builder.transition(Transition::new(from, on, to));
    }
    Arc::new(builder.build().unwrap())
}

/// Pure mirror of the declared transition table.
fn expected_next(state: AtmState, event: AtmEvent) -> Option<AtmState> {
    TRANSITIONS
        .iter()
        .find(|(from, on, _)| *from == state && *on == event)
        .map(|(_, _, to)| *to)
}

prop_compose! {
    fn arbitrary_event()(variant in 0..8u8) -> AtmEvent {
        match variant {
            0 => AtmEvent::Connected,
            1 => AtmEvent::ConnectionClosed,
            2 => AtmEvent::LoadSuccess,
            3 => AtmEvent::LoadFail,
            4 => AtmEvent::ConnectionLost,
            5 => AtmEvent::Startup,
            6 => AtmEvent::Shutdown,
            _ => AtmEvent::ConnectionRestored,
        }
    }
}

proptest! {
    #[test]
    fn machine_mirrors_the_declared_table(
        events in prop::collection::vec(arbitrary_event(), 0..25)
    ) {
        let machine = StateMachine::new(atm_model(), AtmState::Idle).unwrap();
        machine.start(()).unwrap();
        let mut expected = AtmState::Idle;

        for event in events {
            let outcome = machine.fire(event, ()).unwrap();
            match expected_next(expected, event) {
                Some(next) => {
                    prop_assert_eq!(outcome, FireOutcome::Completed(next));
                    expected = next;
                }
                None => prop_assert_eq!(outcome, FireOutcome::Declined),
            }
            prop_assert_eq!(machine.current_state(), Some(expected));
            prop_assert_eq!(machine.status(), MachineStatus::Idle);
            prop_assert_eq!(machine.execution_depth(), 0);
        }
    }

    #[test]
    fn start_succeeds_exactly_once(
        events in prop::collection::vec(arbitrary_event(), 0..10)
    ) {
        let machine = StateMachine::new(atm_model(), AtmState::Idle).unwrap();
        machine.start(()).unwrap();
        for event in events {
            machine.fire(event, ()).unwrap();
        }
        let is_illegal_state = matches!(
            machine.start(()),
            Err(MachineError::IllegalState { .. })
        );
        prop_assert!(is_illegal_state);
    }

    #[test]
    fn terminated_machines_refuse_events(
        events in prop::collection::vec(arbitrary_event(), 1..10)
    ) {
        let machine = StateMachine::new(atm_model(), AtmState::Idle).unwrap();
        machine.start(()).unwrap();
        machine.terminate(()).unwrap();

        prop_assert_eq!(machine.status(), MachineStatus::Terminated);
        for event in events {
            let is_illegal_state = matches!(
                machine.fire(event, ()),
                Err(MachineError::IllegalState { .. })
            );
            prop_assert!(is_illegal_state);
            prop_assert_eq!(machine.status(), MachineStatus::Terminated);
        }
    }

    #[test]
    fn declined_events_leave_no_trace(
        events in prop::collection::vec(arbitrary_event(), 1..25)
    ) {
        let machine = StateMachine::new(atm_model(), AtmState::Idle).unwrap();
        machine.start(()).unwrap();

        for event in events {
            let before = machine.current_state();
            if let FireOutcome::Declined = machine.fire(event, ()).unwrap() {
                prop_assert_eq!(machine.current_state(), before);
            }
        }
    }
}
