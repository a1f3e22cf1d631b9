//! Safe controller.
//!
//! [`SafeController`] ties the state machine to the peripherals. It owns the
//! [`StateMachine`], the [`InputAccumulator`] and the [`LockGuard`], and runs
//! the entry, exit and do actions of each state.
//!
//! # Event Flow
//!
//! ```text
//! keypad ──► process_key ──► InputAccumulator ──► KeyOutcome
//!                                                     │
//!                      ┌──────────────────────────────┘
//!                      ▼
//!               handle_event ──► StateMachine::fire
//!                      │
//!                      ├──► on_exit(from)
//!                      └──► on_enter(to)
//! ```
//!
//! A PIN submission may dispatch several events in a row (for example
//! `key_entered` then `pin_valid`). Each dispatch runs to completion,
//! including tone delays, before the next one starts.
//!
//! # Peripheral Faults
//!
//! Display, indicator and buzzer failures are logged and ignored. Door
//! failures are returned as [`Error::ActuatorFault`] once the transition has
//! been recorded. Keypad failures are returned as [`Error::Hardware`].

use std::collections::VecDeque;

use safebox_core::constants::PIN_LENGTH;
use safebox_core::{CredentialStore, Error, LockGuard, LockStatus, Pin, Result, SafeConfig};
use safebox_hardware::{Buzzer, DoorActuator, Indicator, KeypadScanner, LedColor, TextDisplay};
use tracing::{debug, info, warn};

use crate::input::{InputAccumulator, KeyOutcome};
use crate::state_machine::{SafeEvent, SafeState, StateMachine, StateTransition};
use crate::tones::{self, ERROR_BEEP, LOCKOUT_ALARM, Melody, SUCCESS_CHIME};

const TOP_ROW: usize = 0;
const BOTTOM_ROW: usize = 1;

/// Peripherals driven by a [`SafeController`].
#[derive(Debug)]
pub struct Peripherals<K, D, L, I, B> {
    pub keypad: K,
    pub door: D,
    pub display: L,
    pub indicator: I,
    pub buzzer: B,
}

/// Controller for one safe.
///
/// # Examples
///
/// ```
/// use safebox_controller::{Peripherals, SafeController, SafeState};
/// use safebox_core::SafeConfig;
/// use safebox_hardware::mock::{MockBuzzer, MockDisplay, MockDoor, MockIndicator, MockKeypad};
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() -> safebox_core::Result<()> {
///     let (keypad, _keys) = MockKeypad::new();
///     let (door, door_handle) = MockDoor::new();
///     let (display, _screen) = MockDisplay::new();
///     let (indicator, _led) = MockIndicator::new();
///     let (buzzer, _buzzer) = MockBuzzer::new();
///
///     let peripherals = Peripherals { keypad, door, display, indicator, buzzer };
///     let mut controller = SafeController::new(&SafeConfig::default(), peripherals)?;
///     controller.start().await?;
///
///     for key in "1234".chars() {
///         controller.process_key(key).await?;
///     }
///     assert_eq!(controller.state(), SafeState::Unlocked);
///     assert!(!door_handle.is_closed());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SafeController<K, D, L, I, B> {
    machine: StateMachine,
    input: InputAccumulator,
    guard: LockGuard,
    devices: Peripherals<K, D, L, I, B>,
}

impl<K, D, L, I, B> SafeController<K, D, L, I, B>
where
    K: KeypadScanner,
    D: DoorActuator,
    L: TextDisplay,
    I: Indicator,
    B: Buzzer,
{
    /// Build a controller from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] or [`Error::InvalidPin`] if the configuration
    /// does not validate.
    pub fn new(config: &SafeConfig, devices: Peripherals<K, D, L, I, B>) -> Result<Self> {
        config.validate()?;
        let credentials = CredentialStore::new(config.user_pin()?);
        let guard = LockGuard::with_max_attempts(credentials, config.max_attempts);
        Ok(Self::with_guard(guard, devices))
    }

    /// Build a controller around an existing lock guard.
    pub fn with_guard(guard: LockGuard, devices: Peripherals<K, D, L, I, B>) -> Self {
        Self {
            machine: StateMachine::new(),
            input: InputAccumulator::new(),
            guard,
            devices,
        }
    }

    /// Current state.
    pub fn state(&self) -> SafeState {
        self.machine.current_state()
    }

    pub fn lock_status(&self) -> LockStatus {
        self.guard.status()
    }

    pub fn lock_guard(&self) -> &LockGuard {
        &self.guard
    }

    /// Characters typed but not yet submitted.
    pub fn pending_input(&self) -> &str {
        self.input.pending()
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        self.machine.history()
    }

    pub fn peripherals(&self) -> &Peripherals<K, D, L, I, B> {
        &self.devices
    }

    /// Run the entry action of the initial state.
    ///
    /// Call once before the first key is processed.
    pub async fn start(&mut self) -> Result<()> {
        info!(state = %self.state(), "Safe controller starting");
        self.on_enter(self.state()).await
    }

    /// Do-activity of the current state.
    ///
    /// Returns `true` if a key was read and processed.
    pub async fn do_activity(&mut self) -> Result<bool> {
        match self.state() {
            SafeState::Idle
            | SafeState::Validating
            | SafeState::Unlocked
            | SafeState::ResettingPin
            | SafeState::LockedOut
            | SafeState::AdminOverride => self.poll_keypad().await,
        }
    }

    /// Scan the keypad once and process the key, if any.
    async fn poll_keypad(&mut self) -> Result<bool> {
        let key = self
            .devices
            .keypad
            .scan_key()
            .await
            .map_err(|e| Error::Hardware(format!("keypad: {}", e)))?;

        match key {
            Some(key) => {
                self.process_key(key).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Handle one key press.
    pub async fn process_key(&mut self, key: char) -> Result<()> {
        debug!(state = %self.state(), "Key pressed");
        self.beep().await;

        match self.input.push(key) {
            KeyOutcome::TriggerProgress => {
                debug!(len = self.input.len(), "Reset trigger in progress");
            }
            KeyOutcome::ResetTrigger => {
                self.handle_event(SafeEvent::PinReset).await?;
            }
            KeyOutcome::Cancel => {
                self.handle_event(SafeEvent::Close).await?;
            }
            KeyOutcome::Accumulated { len } => {
                self.echo_masked(len).await;
            }
            KeyOutcome::Completed(pin) => {
                self.echo_masked(PIN_LENGTH).await;
                self.submit_pin(pin).await?;
            }
        }
        Ok(())
    }

    /// Act on a complete PIN.
    async fn submit_pin(&mut self, pin: Pin) -> Result<()> {
        if self.state() == SafeState::ResettingPin {
            self.guard.reset_pin(pin);
            info!("User PIN changed");
            self.show("Pin Reset", TOP_ROW).await;
            self.handle_event(SafeEvent::KeyEntered).await?;
            return Ok(());
        }

        let was_locked_out = self.state() == SafeState::LockedOut;
        self.handle_event(SafeEvent::KeyEntered).await?;

        if self.guard.attempt_admin_override(&pin) {
            debug!("Admin PIN accepted");
            let event = if self.state() == SafeState::LockedOut {
                SafeEvent::AdminOverride
            } else {
                SafeEvent::PinValid
            };
            self.handle_event(event).await?;
        } else if self.guard.attempt_unlock(&pin) {
            debug!("User PIN accepted");
            self.handle_event(SafeEvent::PinValid).await?;
        } else {
            warn!(
                attempts = self.guard.attempts(),
                max_attempts = self.guard.status().max_attempts,
                "PIN rejected"
            );
            self.play(&ERROR_BEEP).await;
            if !was_locked_out {
                if self.guard.is_locked_out() {
                    self.handle_event(SafeEvent::PinInvalid).await?;
                } else {
                    self.show("Incorrect Pin", TOP_ROW).await;
                    self.show("Try again", BOTTOM_ROW).await;
                    self.set_color(LedColor::Orange).await;
                }
            }
        }

        // Only the admin PIN leaves LockedOut; cover the echo again
        if was_locked_out && self.state() == SafeState::LockedOut {
            self.show_locked_out().await;
        }
        Ok(())
    }

    /// Dispatch an event through the transition table.
    ///
    /// Returns the transition taken, or `None` if the event was ignored in
    /// the current state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActuatorFault`] if the door failed during the entry
    /// action. The transition has already been applied.
    pub async fn handle_event(&mut self, event: SafeEvent) -> Result<Option<StateTransition>> {
        let Some(transition) = self.machine.fire(event) else {
            debug!(state = %self.state(), %event, "Event ignored");
            return Ok(None);
        };

        info!(
            from = %transition.from,
            to = %transition.to,
            %event,
            "State transition"
        );
        self.on_exit(transition.from).await;
        self.on_enter(transition.to).await?;
        Ok(Some(transition))
    }

    async fn on_enter(&mut self, state: SafeState) -> Result<()> {
        match state {
            SafeState::Idle => {
                self.input.clear();
                self.guard.lock();
                self.close_door().await?;
                self.clear_display().await;
                self.show("Safe Crew", TOP_ROW).await;
                self.show("Please Input Pin", BOTTOM_ROW).await;
                self.set_color(LedColor::Blue).await;
                info!("Safe is locked");
            }
            SafeState::Validating => {
                self.show("Validating...", TOP_ROW).await;
            }
            SafeState::Unlocked => {
                self.open_door().await?;
                self.show_unlocked().await;
                info!("Safe is unlocked");
            }
            SafeState::ResettingPin => {
                self.input.clear();
                self.guard.reset_attempts();
                self.clear_display().await;
                self.show("Pin: ", BOTTOM_ROW).await;
            }
            SafeState::LockedOut => {
                self.show_locked_out().await;
                warn!(attempts = self.guard.attempts(), "Safe locked out");
                self.play(&LOCKOUT_ALARM).await;
            }
            SafeState::AdminOverride => {
                self.show("Admin Override", TOP_ROW).await;
                self.open_door().await?;
                self.show_unlocked().await;
                info!("Safe is unlocked by admin override");
            }
        }
        Ok(())
    }

    async fn on_exit(&mut self, state: SafeState) {
        match state {
            SafeState::Unlocked => self.clear_display().await,
            SafeState::ResettingPin => self.play(&SUCCESS_CHIME).await,
            SafeState::Idle
            | SafeState::Validating
            | SafeState::LockedOut
            | SafeState::AdminOverride => {}
        }
    }

    /// Chime, then the unlocked screen in green.
    async fn show_unlocked(&mut self) {
        self.play(&SUCCESS_CHIME).await;
        self.clear_display().await;
        self.show("Safe", TOP_ROW).await;
        self.show("Unlocked!", BOTTOM_ROW).await;
        self.set_color(LedColor::Green).await;
    }

    async fn show_locked_out(&mut self) {
        self.clear_display().await;
        self.show("Locked Out", TOP_ROW).await;
        self.show("Contact Admin", BOTTOM_ROW).await;
        self.set_color(LedColor::Red).await;
    }

    async fn echo_masked(&mut self, len: usize) {
        self.clear_display().await;
        let masked = format!("Pin: {}", "*".repeat(len));
        self.show(&masked, BOTTOM_ROW).await;
    }

    async fn open_door(&mut self) -> Result<()> {
        self.devices
            .door
            .open()
            .await
            .map_err(|e| Error::ActuatorFault(format!("open: {}", e)))
    }

    async fn close_door(&mut self) -> Result<()> {
        self.devices
            .door
            .close()
            .await
            .map_err(|e| Error::ActuatorFault(format!("close: {}", e)))
    }

    async fn show(&mut self, text: &str, row: usize) {
        let result = self.devices.display.show_text(text, row, 0).await;
        ignore_fault("display", result);
    }

    async fn clear_display(&mut self) {
        let result = self.devices.display.clear().await;
        ignore_fault("display", result);
    }

    async fn set_color(&mut self, color: LedColor) {
        let result = self.devices.indicator.set_color(color).await;
        ignore_fault("indicator", result);
    }

    async fn beep(&mut self) {
        let result = self.devices.buzzer.beep().await;
        ignore_fault("buzzer", result);
    }

    async fn play(&mut self, melody: &Melody) {
        debug!(melody = melody.name, "Playing melody");
        let result = tones::play(&mut self.devices.buzzer, melody).await;
        ignore_fault("buzzer", result);
    }
}

/// Log a feedback-device failure and carry on.
fn ignore_fault(device: &'static str, result: safebox_hardware::Result<()>) {
    if let Err(e) = result {
        warn!(device, error = %e, "Feedback device fault ignored");
    }
}
