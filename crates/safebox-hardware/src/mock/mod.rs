//! Mock device implementations for testing and development.
//!
//! This module provides simulated peripherals that can be controlled and
//! observed programmatically without physical hardware. Each constructor
//! returns the device (handed to the controller) and a cloneable handle
//! (kept by the test or the CLI) that shares the device's state.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod buzzer;
pub mod display;
pub mod door;
pub mod indicator;
pub mod keypad;

// Re-export commonly used types
pub use buzzer::{BuzzerCall, MockBuzzer, MockBuzzerHandle};
pub use display::{MockDisplay, MockDisplayHandle};
pub use door::{MockDoor, MockDoorHandle};
pub use indicator::{MockIndicator, MockIndicatorHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};

/// Lock shared mock state, ignoring poisoning from a panicked test thread.
pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
