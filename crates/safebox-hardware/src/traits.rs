//! Hardware device trait definitions.
//!
//! This module defines the contract between the safe controller and its
//! peripherals: door actuator, keypad scanner, text display, RGB indicator,
//! buzzer and timer. Mock and real drivers implement the same traits, so the
//! controller is generic over them.
//!
//! Device traits use native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT), eliminating the need for the `async_trait` macro.
//!
//! # Object Safety
//!
//! **NOTE**: These traits are NOT object-safe because `async fn` methods
//! return `impl Future`. Use generic type parameters:
//!
//! ```no_run
//! use safebox_hardware::traits::{DoorActuator, KeypadScanner};
//! use safebox_hardware::Result;
//!
//! async fn open_on_key<K: KeypadScanner, D: DoorActuator>(
//!     keypad: &mut K,
//!     door: &mut D,
//! ) -> Result<()> {
//!     if keypad.scan_key().await?.is_some() {
//!         door.open().await?;
//!     }
//!     Ok(())
//! }
//! ```

#![allow(async_fn_in_trait)]

use std::time::Duration;

use crate::error::Result;
use crate::types::{LedColor, Tone};

/// Door actuator (servo-driven bolt or hinge).
pub trait DoorActuator: Send + Sync {
    /// Drive the door to the open position.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator is disconnected or jams.
    async fn open(&mut self) -> Result<()>;

    /// Drive the door to the closed position.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator is disconnected or jams.
    async fn close(&mut self) -> Result<()>;

    /// Whether the door is in the closed position.
    async fn is_closed(&self) -> Result<bool>;
}

/// Keypad scanner.
///
/// Scanning never blocks: it reports the key pressed since the last scan,
/// or `None`. Debouncing is the scanner's responsibility.
pub trait KeypadScanner: Send + Sync {
    /// Return the next pressed key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad is disconnected or a communication
    /// error occurs.
    async fn scan_key(&mut self) -> Result<Option<char>>;
}

/// Two-row character display.
pub trait TextDisplay: Send + Sync {
    /// Blank every row.
    async fn clear(&mut self) -> Result<()>;

    /// Write `text` starting at (`row`, `col`), overwriting what is there.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is out of range or the display is
    /// unreachable.
    async fn show_text(&mut self, text: &str, row: usize, col: usize) -> Result<()>;
}

/// RGB status indicator.
pub trait Indicator: Send + Sync {
    /// Set the raw RGB value.
    async fn set_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<()>;

    /// Set a named color.
    async fn set_color(&mut self, color: LedColor) -> Result<()> {
        let (r, g, b) = color.as_rgb();
        self.set_rgb(r, g, b).await
    }
}

/// Passive buzzer.
pub trait Buzzer: Send + Sync {
    /// Start sounding `tone` until [`stop`](Buzzer::stop) is called.
    async fn play(&mut self, tone: Tone) -> Result<()>;

    /// Silence the buzzer.
    async fn stop(&mut self) -> Result<()>;

    /// Short fixed-duration acknowledgment tone.
    async fn beep(&mut self) -> Result<()>;
}

/// One-shot timer delivering an event of type `E` when it fires.
///
/// Firing is asynchronous relative to the caller; how the event reaches the
/// consumer is up to the implementation (see
/// [`SoftwareTimer`](crate::timer::SoftwareTimer)).
pub trait TimerService<E>: Send {
    /// Arm the timer. An already armed timer is restarted.
    fn start(&mut self, duration: Duration, event: E);

    /// Disarm the timer. Does nothing if it is not armed.
    fn cancel(&mut self);

    /// Whether the timer is armed and has not fired yet.
    fn is_armed(&self) -> bool;
}
