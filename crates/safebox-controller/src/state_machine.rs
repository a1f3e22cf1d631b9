//! Safe state machine.
//!
//! This module holds the transition table of the safe and the bookkeeping
//! around it (current state and a bounded transition history).
//! It performs no side effects; entry and exit actions live in
//! [`SafeController`](crate::SafeController).
//!
//! # States
//!
//! - `Idle`: door closed, waiting for a PIN
//! - `Validating`: a PIN was submitted and is being checked
//! - `Unlocked`: door open after a valid PIN
//! - `ResettingPin`: waiting for the new user PIN
//! - `LockedOut`: too many failed attempts, admin PIN required
//! - `AdminOverride`: door open after the admin PIN cleared a lockout
//!
//! # Transition Table
//!
//! | State | Event | Next |
//! |-------|-------|------|
//! | Idle | `key_entered` | Validating |
//! | Idle | `pin_reset` | ResettingPin |
//! | Validating | `pin_valid` | Unlocked |
//! | Validating | `pin_invalid` | LockedOut |
//! | Unlocked | `close` | Idle |
//! | ResettingPin | `pin_reset` | Idle |
//! | ResettingPin | `key_entered` | Idle |
//! | LockedOut | `admin_override` | AdminOverride |
//! | AdminOverride | `close` | Idle |
//!
//! Every other (state, event) pair is ignored: the state does not change
//! and nothing is recorded.
//!
//! # Examples
//!
//! ```
//! use safebox_controller::{SafeEvent, SafeState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), SafeState::Idle);
//!
//! machine.fire(SafeEvent::KeyEntered);
//! machine.fire(SafeEvent::PinValid);
//! assert_eq!(machine.current_state(), SafeState::Unlocked);
//!
//! // Not in the table: ignored
//! assert!(machine.fire(SafeEvent::PinReset).is_none());
//! assert_eq!(machine.current_state(), SafeState::Unlocked);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Maximum number of state transitions to keep in history.
///
/// A full unlock cycle (Idle → Validating → Unlocked → Idle) is three
/// transitions, so this covers roughly the last thirty uses of the safe.
const MAX_HISTORY_SIZE: usize = 100;

/// States of the safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeState {
    /// Door closed, waiting for a PIN.
    Idle,

    /// A PIN was submitted and is being checked.
    Validating,

    /// Door open after a valid PIN.
    Unlocked,

    /// Waiting for the new user PIN.
    ResettingPin,

    /// Too many failed attempts; only the admin PIN helps.
    LockedOut,

    /// Door open after an admin override.
    AdminOverride,
}

impl fmt::Display for SafeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SafeState::Idle => "Idle",
            SafeState::Validating => "Validating",
            SafeState::Unlocked => "Unlocked",
            SafeState::ResettingPin => "ResettingPin",
            SafeState::LockedOut => "LockedOut",
            SafeState::AdminOverride => "AdminOverride",
        };
        write!(f, "{}", state_str)
    }
}

impl SafeState {
    /// Every state, in ordinal order.
    pub const ALL: [SafeState; 6] = [
        SafeState::Idle,
        SafeState::Validating,
        SafeState::Unlocked,
        SafeState::ResettingPin,
        SafeState::LockedOut,
        SafeState::AdminOverride,
    ];

    /// Position of the state in the table (0–5).
    pub fn ordinal(&self) -> u8 {
        match self {
            SafeState::Idle => 0,
            SafeState::Validating => 1,
            SafeState::Unlocked => 2,
            SafeState::ResettingPin => 3,
            SafeState::LockedOut => 4,
            SafeState::AdminOverride => 5,
        }
    }

    /// Look up the transition for `event`.
    ///
    /// Returns `None` when the table has no row for this pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use safebox_controller::{SafeEvent, SafeState};
    ///
    /// assert_eq!(
    ///     SafeState::Idle.next_state(SafeEvent::KeyEntered),
    ///     Some(SafeState::Validating)
    /// );
    /// assert_eq!(SafeState::Idle.next_state(SafeEvent::Close), None);
    /// ```
    pub fn next_state(&self, event: SafeEvent) -> Option<SafeState> {
        use SafeEvent as E;
        use SafeState as S;

        match (self, event) {
            (S::Idle, E::KeyEntered) => Some(S::Validating),
            (S::Idle, E::PinReset) => Some(S::ResettingPin),
            (S::Validating, E::PinValid) => Some(S::Unlocked),
            (S::Validating, E::PinInvalid) => Some(S::LockedOut),
            (S::Unlocked, E::Close) => Some(S::Idle),
            (S::ResettingPin, E::PinReset | E::KeyEntered) => Some(S::Idle),
            (S::LockedOut, E::AdminOverride) => Some(S::AdminOverride),
            (S::AdminOverride, E::Close) => Some(S::Idle),
            _ => None,
        }
    }
}

/// Events driving the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeEvent {
    /// A complete PIN was typed.
    KeyEntered,

    /// The PIN matched the user or admin PIN.
    PinValid,

    /// The failure threshold was reached.
    PinInvalid,

    /// Cancel key pressed.
    Close,

    /// Reset-trigger sequence completed.
    PinReset,

    /// Admin PIN entered while locked out.
    AdminOverride,

    /// Timer service fired. No table row uses it yet.
    Timeout,
}

impl SafeEvent {
    /// Every event.
    pub const ALL: [SafeEvent; 7] = [
        SafeEvent::KeyEntered,
        SafeEvent::PinValid,
        SafeEvent::PinInvalid,
        SafeEvent::Close,
        SafeEvent::PinReset,
        SafeEvent::AdminOverride,
        SafeEvent::Timeout,
    ];
}

impl fmt::Display for SafeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event_str = match self {
            SafeEvent::KeyEntered => "key_entered",
            SafeEvent::PinValid => "pin_valid",
            SafeEvent::PinInvalid => "pin_invalid",
            SafeEvent::Close => "close",
            SafeEvent::PinReset => "pin_reset",
            SafeEvent::AdminOverride => "admin_override",
            SafeEvent::Timeout => "timeout",
        };
        write!(f, "{}", event_str)
    }
}

/// Represents a single state transition with timestamp.
///
/// # Serialization Note
///
/// The `timestamp` field is not serialized as `Instant` is process-specific.
/// When deserializing, the timestamp will be set to the current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: SafeState,

    /// The state transitioned to.
    pub to: SafeState,

    /// The event that caused the transition.
    pub event: SafeEvent,

    /// When the transition occurred.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateTransition {
    /// Create a new state transition record stamped with the current time.
    pub fn new(from: SafeState, to: SafeState, event: SafeEvent) -> Self {
        Self {
            from,
            to,
            event,
            timestamp: Instant::now(),
        }
    }
}

/// State machine for the safe.
///
/// # Thread Safety
///
/// Not thread-safe. The control loop owns it and processes one event at a
/// time.
#[derive(Debug)]
pub struct StateMachine {
    /// Current state of the safe.
    current_state: SafeState,

    /// History of state transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self {
            current_state: SafeState::Idle,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Create a builder for constructing a state machine with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use safebox_controller::{SafeState, StateMachine};
    ///
    /// let machine = StateMachine::builder()
    ///     .with_initial_state(SafeState::LockedOut)
    ///     .build();
    ///
    /// assert_eq!(machine.current_state(), SafeState::LockedOut);
    /// ```
    pub fn builder() -> StateMachineBuilder {
        StateMachineBuilder::default()
    }

    /// Get the current state of the machine.
    pub fn current_state(&self) -> SafeState {
        self.current_state
    }

    /// Get a reference to the state transition history, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Apply `event` to the current state.
    ///
    /// Returns the transition record, or `None` if the table has no row
    /// for the pair, in which case nothing changes.
    pub fn fire(&mut self, event: SafeEvent) -> Option<StateTransition> {
        let new_state = self.current_state.next_state(event)?;
        let transition = StateTransition::new(self.current_state, new_state, event);
        self.perform_state_change(new_state, transition.clone());
        Some(transition)
    }

    /// Internal method to perform state change and update all related fields.
    fn perform_state_change(&mut self, new_state: SafeState, transition: StateTransition) {
        self.current_state = new_state;
        self.add_to_history(transition);
    }

    /// Add a transition to history, maintaining size limit.
    fn add_to_history(&mut self, transition: StateTransition) {
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `StateMachine` instances with custom configuration.
#[derive(Debug)]
pub struct StateMachineBuilder {
    initial_state: SafeState,
}

impl StateMachineBuilder {
    /// Set the initial state for the machine.
    pub fn with_initial_state(mut self, state: SafeState) -> Self {
        self.initial_state = state;
        self
    }

    /// Build the state machine with configured parameters.
    pub fn build(self) -> StateMachine {
        StateMachine {
            current_state: self.initial_state,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self {
            initial_state: SafeState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn machine_in(state: SafeState) -> StateMachine {
        StateMachine::builder().with_initial_state(state).build()
    }

    #[test]
    fn test_new_machine_starts_idle() {
        let machine = StateMachine::new();
        assert_eq!(machine.current_state(), SafeState::Idle);
        assert_eq!(machine.history().len(), 0);
    }

    #[rstest]
    #[case(SafeState::Idle, SafeEvent::KeyEntered, SafeState::Validating)]
    #[case(SafeState::Idle, SafeEvent::PinReset, SafeState::ResettingPin)]
    #[case(SafeState::Validating, SafeEvent::PinValid, SafeState::Unlocked)]
    #[case(SafeState::Validating, SafeEvent::PinInvalid, SafeState::LockedOut)]
    #[case(SafeState::Unlocked, SafeEvent::Close, SafeState::Idle)]
    #[case(SafeState::ResettingPin, SafeEvent::PinReset, SafeState::Idle)]
    #[case(SafeState::ResettingPin, SafeEvent::KeyEntered, SafeState::Idle)]
    #[case(SafeState::LockedOut, SafeEvent::AdminOverride, SafeState::AdminOverride)]
    #[case(SafeState::AdminOverride, SafeEvent::Close, SafeState::Idle)]
    fn test_table_transitions(
        #[case] from: SafeState,
        #[case] event: SafeEvent,
        #[case] to: SafeState,
    ) {
        let mut machine = machine_in(from);
        let transition = machine.fire(event).unwrap();

        assert_eq!(machine.current_state(), to);
        assert_eq!(transition.from, from);
        assert_eq!(transition.to, to);
        assert_eq!(transition.event, event);
    }

    #[test]
    fn test_table_has_nine_rows() {
        let rows = SafeState::ALL
            .iter()
            .flat_map(|state| SafeEvent::ALL.iter().map(move |event| (*state, *event)))
            .filter(|(state, event)| state.next_state(*event).is_some())
            .count();
        assert_eq!(rows, 9);
    }

    #[rstest]
    #[case(SafeState::Idle, SafeEvent::Close)]
    #[case(SafeState::Idle, SafeEvent::PinValid)]
    #[case(SafeState::Validating, SafeEvent::KeyEntered)]
    #[case(SafeState::Unlocked, SafeEvent::PinValid)]
    #[case(SafeState::LockedOut, SafeEvent::PinValid)]
    #[case(SafeState::LockedOut, SafeEvent::Close)]
    #[case(SafeState::AdminOverride, SafeEvent::AdminOverride)]
    fn test_unlisted_event_is_noop(#[case] state: SafeState, #[case] event: SafeEvent) {
        let mut machine = machine_in(state);
        assert!(machine.fire(event).is_none());
        assert_eq!(machine.current_state(), state);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_timeout_is_noop_in_every_state() {
        for state in SafeState::ALL {
            let mut machine = machine_in(state);
            assert!(machine.fire(SafeEvent::Timeout).is_none());
            assert_eq!(machine.current_state(), state);
        }
    }

    proptest! {
        #[test]
        fn prop_state_changes_only_through_table(
            events in prop::collection::vec(prop::sample::select(SafeEvent::ALL.to_vec()), 0..50)
        ) {
            let mut machine = StateMachine::new();
            for event in events {
                let before = machine.current_state();
                let history_len = machine.history().len();
                match before.next_state(event) {
                    Some(expected) => {
                        prop_assert!(machine.fire(event).is_some());
                        prop_assert_eq!(machine.current_state(), expected);
                    }
                    None => {
                        prop_assert!(machine.fire(event).is_none());
                        prop_assert_eq!(machine.current_state(), before);
                        prop_assert_eq!(machine.history().len(), history_len);
                    }
                }
            }
        }
    }

    #[test]
    fn test_ordinals() {
        let ordinals: Vec<u8> = SafeState::ALL.iter().map(SafeState::ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_transition_history_is_recorded() {
        let mut machine = StateMachine::new();

        machine.fire(SafeEvent::KeyEntered).unwrap();
        machine.fire(SafeEvent::PinValid).unwrap();
        machine.fire(SafeEvent::Close).unwrap();

        let history: Vec<_> = machine.history().iter().collect();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].to, SafeState::Validating);
        assert_eq!(history[1].to, SafeState::Unlocked);
        assert_eq!(history[2].from, SafeState::Unlocked);
        assert_eq!(history[2].to, SafeState::Idle);
    }

    #[test]
    fn test_history_size_limit() {
        let mut machine = StateMachine::new();

        for _ in 0..150 {
            machine.fire(SafeEvent::PinReset).unwrap();
            machine.fire(SafeEvent::PinReset).unwrap();
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(SafeState::ResettingPin.to_string(), "ResettingPin");
        assert_eq!(SafeState::AdminOverride.to_string(), "AdminOverride");
        assert_eq!(SafeEvent::KeyEntered.to_string(), "key_entered");
        assert_eq!(SafeEvent::AdminOverride.to_string(), "admin_override");
    }

    #[test]
    fn test_state_serialization() {
        let serialized = serde_json::to_string(&SafeState::LockedOut).unwrap();
        assert_eq!(serialized, "\"locked_out\"");

        let deserialized: SafeState = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, SafeState::LockedOut);
    }

    #[test]
    fn test_transition_serialization() {
        let transition =
            StateTransition::new(SafeState::Idle, SafeState::ResettingPin, SafeEvent::PinReset);
        let serialized = serde_json::to_string(&transition).unwrap();

        assert!(serialized.contains("\"idle\""));
        assert!(serialized.contains("\"resetting_pin\""));
        assert!(serialized.contains("\"pin_reset\""));

        let deserialized: StateTransition = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.to, SafeState::ResettingPin);
        assert_eq!(deserialized.event, SafeEvent::PinReset);
    }
}
