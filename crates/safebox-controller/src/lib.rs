//! Safebox controller crate.
//!
//! This crate contains the state machine of the safe, the keypad input
//! protocol, the buzzer melodies and the controller that drives the
//! peripherals from them.
//!
//! The usual entry point is [`ControlLoop`] wrapping a [`SafeController`]
//! built from a [`SafeConfig`](safebox_core::SafeConfig) and a set of
//! [`Peripherals`].

pub mod control_loop;
pub mod controller;
pub mod input;
pub mod state_machine;
pub mod tones;

pub use control_loop::ControlLoop;
pub use controller::{Peripherals, SafeController};
pub use input::{InputAccumulator, KeyOutcome};
pub use state_machine::{SafeEvent, SafeState, StateMachine, StateMachineBuilder, StateTransition};
pub use tones::{Melody, ToneStep};
