//! Common test utilities for controller integration tests.
//!
//! [`TestSafe`] builds a controller over mock peripherals and keeps the
//! observation handle of every device, so a test can type keys and then
//! look at the door, screen, LED and buzzer.
//!
//! ```ignore
//! let mut safe = common::TestSafe::started().await;
//! safe.type_keys("1234").await;
//! common::assert_unlocked(&safe);
//! ```

#![allow(dead_code)]

use safebox_controller::{Peripherals, SafeController, SafeState};
use safebox_core::SafeConfig;
use safebox_hardware::LedColor;
use safebox_hardware::mock::{
    MockBuzzer, MockBuzzerHandle, MockDisplay, MockDisplayHandle, MockDoor, MockDoorHandle,
    MockIndicator, MockIndicatorHandle, MockKeypad, MockKeypadHandle,
};

pub type MockController =
    SafeController<MockKeypad, MockDoor, MockDisplay, MockIndicator, MockBuzzer>;

/// Test data shared by the scenario tests.
pub mod test_data {
    pub const USER_PIN: &str = "1234";
    pub const ADMIN_PIN: &str = "6106";
    pub const RESET_TRIGGER: &str = "#6106";
    pub const WRONG_PINS: [&str; 3] = ["0000", "1111", "2222"];
}

/// Observation handles of the mock peripherals.
pub struct Handles {
    pub keypad: MockKeypadHandle,
    pub door: MockDoorHandle,
    pub display: MockDisplayHandle,
    pub indicator: MockIndicatorHandle,
    pub buzzer: MockBuzzerHandle,
}

/// Mock peripherals plus their handles.
pub fn mock_peripherals() -> (
    Peripherals<MockKeypad, MockDoor, MockDisplay, MockIndicator, MockBuzzer>,
    Handles,
) {
    let (keypad, keypad_handle) = MockKeypad::new();
    let (door, door_handle) = MockDoor::new();
    let (display, display_handle) = MockDisplay::new();
    let (indicator, indicator_handle) = MockIndicator::new();
    let (buzzer, buzzer_handle) = MockBuzzer::new();

    let peripherals = Peripherals {
        keypad,
        door,
        display,
        indicator,
        buzzer,
    };
    let handles = Handles {
        keypad: keypad_handle,
        door: door_handle,
        display: display_handle,
        indicator: indicator_handle,
        buzzer: buzzer_handle,
    };
    (peripherals, handles)
}

/// A controller over mock peripherals.
pub struct TestSafe {
    pub controller: MockController,
    pub handles: Handles,
}

impl TestSafe {
    /// Controller with the default configuration, not yet started.
    pub fn new() -> Self {
        Self::with_config(SafeConfig::default())
    }

    pub fn with_config(config: SafeConfig) -> Self {
        let (peripherals, handles) = mock_peripherals();
        let controller = SafeController::new(&config, peripherals).unwrap();
        Self {
            controller,
            handles,
        }
    }

    /// Controller with the default configuration, Idle entry already run.
    pub async fn started() -> Self {
        let mut safe = Self::new();
        safe.controller.start().await.unwrap();
        safe
    }

    /// Process each character of `keys` in order.
    pub async fn type_keys(&mut self, keys: &str) {
        for key in keys.chars() {
            self.controller.process_key(key).await.unwrap();
        }
    }

    pub fn state(&self) -> SafeState {
        self.controller.state()
    }

    pub fn attempts(&self) -> u32 {
        self.controller.lock_status().attempts
    }

    /// Drive the safe from Idle into LockedOut with three wrong PINs.
    pub async fn lock_out(&mut self) {
        for pin in test_data::WRONG_PINS {
            self.type_keys(pin).await;
        }
        assert_eq!(self.state(), SafeState::LockedOut);
    }
}

/// Door closed, welcome screen, blue LED.
pub fn assert_idle(safe: &TestSafe) {
    assert_eq!(safe.state(), SafeState::Idle);
    assert!(safe.handles.door.is_closed());
    assert_eq!(
        safe.handles.display.lines(),
        vec!["Safe Crew", "Please Input Pin"]
    );
    assert!(safe.handles.indicator.shows(LedColor::Blue));
}

/// Door open, unlocked screen, green LED.
pub fn assert_unlocked(safe: &TestSafe) {
    assert!(!safe.handles.door.is_closed());
    assert_eq!(safe.handles.display.lines(), vec!["Safe", "Unlocked!"]);
    assert!(safe.handles.indicator.shows(LedColor::Green));
}
