//! Hardware abstraction layer for the safebox controller.
//!
//! This crate provides trait-based abstractions for the safe's peripherals:
//! the door actuator, keypad scanner, character display, RGB indicator,
//! buzzer and timer. These traits let the controller run unchanged against
//! mock implementations (for development and testing) and real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: device I/O uses native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Generic dispatch**: async traits are not object-safe, so consumers
//!   are generic over the concrete device types.
//! - **Thread-safe**: all device traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: all operations return `Result<T>` with detailed error information.
//!
//! # Device Traits
//!
//! | Trait | Peripheral |
//! |-------|-----------|
//! | [`DoorActuator`] | servo-driven door |
//! | [`KeypadScanner`] | 4×4 matrix keypad |
//! | [`TextDisplay`] | 2-row character LCD |
//! | [`Indicator`] | RGB LED |
//! | [`Buzzer`] | passive buzzer |
//! | [`TimerService`] | one-shot timeout source |
//!
//! ```no_run
//! use safebox_hardware::{Buzzer, LedColor, Indicator, Result};
//!
//! async fn acknowledge<B: Buzzer, I: Indicator>(buzzer: &mut B, led: &mut I) -> Result<()> {
//!     buzzer.beep().await?;
//!     led.set_color(LedColor::Green).await
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides simulated devices paired with observation
//! handles for tests and the command-line emulator.

pub mod error;
pub mod mock;
pub mod timer;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use timer::SoftwareTimer;
pub use traits::{Buzzer, DoorActuator, Indicator, KeypadScanner, TextDisplay, TimerService};
pub use types::{LedColor, Note, Tone};
