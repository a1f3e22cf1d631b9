//! Core constants for the safe controller.
//!
//! This module centralizes the fixed values the controller relies on: PIN
//! geometry, the keypad control keys, the reset-trigger sequence, lockout
//! threshold and the default configuration values.
//!
//! # Keypad Protocol
//!
//! The keypad stream carries three interleaved protocols:
//!
//! | Keys | Meaning | Constant |
//! |------|---------|----------|
//! | `*` | Cancel / close the door | [`KEY_CANCEL`] |
//! | `#` `6` `1` `0` `6` | Enter PIN reset mode | [`RESET_TRIGGER_PREFIX`], [`RESET_TRIGGER_FINAL`] |
//! | any 4 other keys | PIN entry | [`PIN_LENGTH`] |
//!
//! # Usage
//!
//! ```
//! use safebox_core::constants::*;
//!
//! assert_eq!(PIN_LENGTH, 4);
//! assert_eq!(ADMIN_PIN.chars().count(), PIN_LENGTH);
//! assert!(RESET_TRIGGER_PREFIX.starts_with(KEY_RESET_TRIGGER));
//! ```

// ============================================================================
// PIN Geometry
// ============================================================================

/// Number of characters in a PIN.
///
/// Both the user PIN and the admin PIN are exactly this long. The keypad
/// accumulator submits a PIN as soon as this many characters are buffered,
/// so there is no enter key.
pub const PIN_LENGTH: usize = 4;

/// Fixed admin override PIN.
///
/// Accepted in any validating context. When entered while the safe is
/// locked out it moves the controller into admin override.
pub const ADMIN_PIN: &str = "6106";

/// User PIN installed at startup when no configuration overrides it.
pub const DEFAULT_USER_PIN: &str = "1234";

// ============================================================================
// Keypad Control Keys
// ============================================================================

/// Cancel key. Clears pending input and closes an open door.
pub const KEY_CANCEL: char = '*';

/// First key of the reset-trigger sequence.
///
/// Pressing it always restarts the trigger, discarding whatever was pending.
pub const KEY_RESET_TRIGGER: char = '#';

/// Reset-trigger prefix, matched one key at a time.
///
/// ```text
/// #  6  1  0  6
/// └─prefix──┘ └ final key
/// ```
pub const RESET_TRIGGER_PREFIX: &str = "#610";

/// Key that completes the reset trigger once [`RESET_TRIGGER_PREFIX`] is buffered.
pub const RESET_TRIGGER_FINAL: char = '6';

// ============================================================================
// Lockout
// ============================================================================

/// Consecutive failed user PIN attempts before the safe locks out.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

// ============================================================================
// Control Loop
// ============================================================================

/// Default delay between keypad polls, in milliseconds.
///
/// Bounds the busy-polling rate of the control loop.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default number of character columns on each display row.
pub const DEFAULT_DISPLAY_COLUMNS: usize = 16;

/// Number of display rows.
pub const DISPLAY_ROWS: usize = 2;
