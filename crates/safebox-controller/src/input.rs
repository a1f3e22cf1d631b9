//! Keypad input accumulation.
//!
//! The [`InputAccumulator`] turns raw key presses into logical outcomes. Three
//! protocols share a single buffer, and exactly one of them interprets each
//! key:
//!
//! 1. **Reset trigger** `#` `6` `1` `0` `6`. Each key must be the next one
//!    expected. A wrong key is not a restart: it is appended as ordinary
//!    input to whatever trigger prefix is already buffered.
//! 2. **Cancel** `*`. Clears the buffer.
//! 3. **PIN entry**. Any other key is appended; the buffer is submitted when
//!    it holds exactly four characters.
//!
//! ```text
//! key   buffer   outcome
//! #     "#"      TriggerProgress
//! 6     "#6"     TriggerProgress
//! 5     "#65"    Accumulated { len: 3 }   wrong key falls through
//! 9     ""       Completed("#659")
//! ```
//!
//! `#` always restarts the trigger, even in the middle of a PIN.

use safebox_core::Pin;
use safebox_core::constants::{
    KEY_CANCEL, KEY_RESET_TRIGGER, RESET_TRIGGER_FINAL, RESET_TRIGGER_PREFIX,
};

/// What a single key press produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key advanced the reset trigger.
    TriggerProgress,

    /// The reset trigger completed; the buffer was cleared.
    ResetTrigger,

    /// Cancel key; the buffer was cleared.
    Cancel,

    /// The key was buffered as PIN input; `len` characters are pending.
    Accumulated { len: usize },

    /// Four characters were buffered and submitted; the buffer was cleared.
    Completed(Pin),
}

/// Buffer of pending keypad input.
///
/// # Examples
///
/// ```
/// use safebox_controller::{InputAccumulator, KeyOutcome};
/// use safebox_core::Pin;
///
/// let mut input = InputAccumulator::new();
/// for key in "123".chars() {
///     input.push(key);
/// }
/// assert_eq!(input.push('4'), KeyOutcome::Completed(Pin::new("1234").unwrap()));
/// assert!(input.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputAccumulator {
    pending: String,
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key.
    pub fn push(&mut self, key: char) -> KeyOutcome {
        if key == KEY_RESET_TRIGGER {
            self.pending.clear();
            self.pending.push(key);
            return KeyOutcome::TriggerProgress;
        }

        if self.pending == RESET_TRIGGER_PREFIX && key == RESET_TRIGGER_FINAL {
            self.pending.clear();
            return KeyOutcome::ResetTrigger;
        }

        if self.is_next_trigger_key(key) {
            self.pending.push(key);
            return KeyOutcome::TriggerProgress;
        }

        if key == KEY_CANCEL {
            self.pending.clear();
            return KeyOutcome::Cancel;
        }

        self.pending.push(key);
        // Pin::new accepts exactly PIN_LENGTH characters
        if let Ok(pin) = Pin::new(&self.pending) {
            self.pending.clear();
            return KeyOutcome::Completed(pin);
        }
        KeyOutcome::Accumulated { len: self.len() }
    }

    /// Whether `key` extends a partial trigger (`#`, `#6`, `#61`).
    fn is_next_trigger_key(&self, key: char) -> bool {
        !self.pending.is_empty()
            && RESET_TRIGGER_PREFIX.starts_with(self.pending.as_str())
            && RESET_TRIGGER_PREFIX.chars().nth(self.len()) == Some(key)
    }

    /// Pending characters.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Number of pending characters.
    pub fn len(&self) -> usize {
        self.pending.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
