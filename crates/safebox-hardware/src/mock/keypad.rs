//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad scanner that can be fed
//! programmatically for testing without requiring physical hardware.

use crate::{HardwareError, Result, traits::KeypadScanner};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Capacity of the simulated key buffer.
const KEY_BUFFER_CAPACITY: usize = 32;

/// Mock keypad scanner for testing and development.
///
/// Keys sent through a [`MockKeypadHandle`] are buffered and returned one
/// per [`scan_key`](KeypadScanner::scan_key) call. An empty buffer scans as
/// "no key pressed".
///
/// # Examples
///
/// ```
/// use safebox_hardware::mock::MockKeypad;
/// use safebox_hardware::traits::KeypadScanner;
///
/// #[tokio::main]
/// async fn main() -> safebox_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.press_sequence("12").await?;
///
///     assert_eq!(keypad.scan_key().await?, Some('1'));
///     assert_eq!(keypad.scan_key().await?, Some('2'));
///     assert_eq!(keypad.scan_key().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated key presses
    key_rx: mpsc::Receiver<char>,
}

impl MockKeypad {
    /// Create a new mock keypad.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// can be used to simulate key presses.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::channel(KEY_BUFFER_CAPACITY);
        (Self { key_rx }, MockKeypadHandle { key_tx })
    }
}

impl KeypadScanner for MockKeypad {
    async fn scan_key(&mut self) -> Result<Option<char>> {
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(HardwareError::disconnected("Keypad input channel closed"))
            }
        }
    }
}

/// Handle for feeding a mock keypad.
///
/// Cloneable; every clone feeds the same keypad. The keypad reports a
/// disconnect once all handles are dropped and the buffer is drained.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated key presses
    key_tx: mpsc::Sender<char>,
}

impl MockKeypadHandle {
    /// Press a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub async fn press(&self, key: char) -> Result<()> {
        self.key_tx
            .send(key)
            .await
            .map_err(|_| HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Press every character of `keys` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub async fn press_sequence(&self, keys: &str) -> Result<()> {
        for key in keys.chars() {
            self.press(key).await?;
        }
        Ok(())
    }
}
