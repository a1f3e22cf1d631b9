//! Attempt counting and lock status on top of the credential store.
//!
//! The [`LockGuard`] only tracks the failure counter and the locked flag.
//! Moving the controller into a lockout *state* is the caller's job; the
//! guard answers [`is_locked_out`](LockGuard::is_locked_out) so the caller
//! can decide.
//!
//! # Counting Rules
//!
//! - A failed user PIN adds exactly one attempt.
//! - A failed admin PIN is not counted.
//! - Any successful verification (user or admin) resets the counter.
//! - Entering the PIN-reset flow resets the counter
//!   ([`reset_attempts`](LockGuard::reset_attempts)).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_MAX_ATTEMPTS;
use crate::{CredentialStore, Pin};

/// Snapshot of the guard's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStatus {
    /// Whether the safe is considered locked.
    pub locked: bool,

    /// Failed user PIN attempts since the last success or reset.
    pub attempts: u32,

    /// Attempts that trigger a lockout.
    pub max_attempts: u32,
}

impl LockStatus {
    /// True iff the failure counter has reached the threshold.
    pub fn is_locked_out(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

/// Credential store wrapped with attempt counting.
///
/// # Examples
///
/// ```
/// use safebox_core::{CredentialStore, LockGuard, Pin};
///
/// let store = CredentialStore::new(Pin::new("1234").unwrap());
/// let mut guard = LockGuard::new(store);
///
/// for wrong in ["0000", "1111", "2222"] {
///     assert!(!guard.attempt_unlock(&Pin::new(wrong).unwrap()));
/// }
/// assert!(guard.is_locked_out());
///
/// assert!(guard.attempt_admin_override(&Pin::new("6106").unwrap()));
/// assert_eq!(guard.attempts(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct LockGuard {
    credentials: CredentialStore,
    status: LockStatus,
}

impl LockGuard {
    /// Create a guard with the default threshold of three attempts.
    pub fn new(credentials: CredentialStore) -> Self {
        Self::with_max_attempts(credentials, DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a guard with a custom lockout threshold.
    pub fn with_max_attempts(credentials: CredentialStore, max_attempts: u32) -> Self {
        Self {
            credentials,
            status: LockStatus {
                locked: true,
                attempts: 0,
                max_attempts,
            },
        }
    }

    /// Verify a user PIN, counting a failure.
    ///
    /// On success the safe is unlocked and the counter cleared. On failure
    /// the counter grows by one and the locked flag is set once the
    /// threshold is reached.
    pub fn attempt_unlock(&mut self, candidate: &Pin) -> bool {
        if self.credentials.verify_user(candidate) {
            self.status.locked = false;
            self.status.attempts = 0;
            return true;
        }

        self.status.attempts = self.status.attempts.saturating_add(1);
        if self.status.is_locked_out() {
            self.status.locked = true;
        }
        debug!(
            attempts = self.status.attempts,
            max_attempts = self.status.max_attempts,
            "User PIN rejected"
        );
        false
    }

    /// Verify the admin PIN. Failures are not counted.
    pub fn attempt_admin_override(&mut self, candidate: &Pin) -> bool {
        if self.credentials.verify_admin(candidate) {
            self.status.locked = false;
            self.status.attempts = 0;
            return true;
        }
        false
    }

    /// True iff attempts ≥ max attempts.
    pub fn is_locked_out(&self) -> bool {
        self.status.is_locked_out()
    }

    pub fn reset_attempts(&mut self) {
        self.status.attempts = 0;
    }

    /// Mark the safe as locked (door closed).
    pub fn lock(&mut self) {
        self.status.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.status.locked
    }

    pub fn attempts(&self) -> u32 {
        self.status.attempts
    }

    pub fn status(&self) -> LockStatus {
        self.status
    }

    /// Replace the user PIN.
    pub fn reset_pin(&mut self, new_pin: Pin) {
        self.credentials.reset_user_pin(new_pin);
    }

    /// Read access to the underlying credentials.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}
