//! Strata: a hierarchical state machine execution engine
//!
//! Strata drives live instances of a declarative statechart model: states
//! nest inside composite states, events trigger transitions, and every
//! entry/exit/transition action runs in a strictly defined order through a
//! deferred execution stack. The model is built once and shared read-only
//! across any number of instances.
//!
//! # Core Concepts
//!
//! - **Model**: an immutable state hierarchy plus transition table,
//!   assembled with [`ModelBuilder`](model::ModelBuilder)
//! - **Instance**: a [`StateMachine`](machine::StateMachine) owning the
//!   current state, per-composite history, and the action batch stack
//! - **Actions**: deferred while an event resolves, then executed in
//!   exit → transition → entry order
//! - **Notifications**: typed channels reporting lifecycle changes, every
//!   transition phase, and per-action progress
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use strata::ident_enum;
//! use strata::machine::StateMachine;
//! use strata::model::{ModelBuilder, Transition};
//! use strata::Ident;
//!
//! ident_enum! {
//!     enum AtmState {
//!         Idle,
//!         Loading,
//!         InService,
//!     }
//! }
//!
//! ident_enum! {
//!     enum AtmEvent {
//!         Connected,
//!         LoadSuccess,
//!     }
//! }
//!
//! let model = ModelBuilder::<AtmState, AtmEvent, ()>::new()
//!     .state(AtmState::Idle)
//!     .state(AtmState::Loading)
//!     .state(AtmState::InService)
//!     .transition(Transition::new(
//!         AtmState::Idle,
//!         AtmEvent::Connected,
//!         AtmState::Loading,
//!     ))
//!     .transition(Transition::new(
//!         AtmState::Loading,
//!         AtmEvent::LoadSuccess,
//!         AtmState::InService,
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let machine = StateMachine::new(Arc::new(model), AtmState::Idle).unwrap();
//!
//! machine.notifications().subscribe_transitions(|notice| {
//!     println!("{} on {}", notice.phase.name(), notice.event.name());
//! });
//!
//! machine.start(()).unwrap();
//! machine.fire(AtmEvent::Connected, ()).unwrap();
//! machine.fire(AtmEvent::LoadSuccess, ()).unwrap();
//! assert_eq!(machine.current_state(), Some(AtmState::InService));
//! ```
//!
//! # Concurrency
//!
//! Instances are single-threaded and not internally synchronized; an
//! action may re-enter its own machine synchronously (nested `fire`),
//! which the execution stack resolves in LIFO order. Share the model, not
//! the instance.

pub mod core;
pub mod exec;
pub mod machine;
pub mod model;
pub mod notify;
pub mod registry;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionArgs, ActionError, Guard, Ident, MachineError, MachineResult, MachineStatus,
};
pub use crate::exec::ActionExecutor;
pub use crate::machine::{FireOutcome, StateMachine};
pub use crate::model::{
    EntryPolicy, ModelBuilder, ModelError, ModelVisitor, RawState, StateModel, Transition,
};
pub use crate::notify::{
    ActionNotice, LifecycleKind, LifecycleNotice, NotificationHub, SubscriptionId,
    TransitionNotice, TransitionPhase,
};
pub use crate::registry::StateRegistry;
