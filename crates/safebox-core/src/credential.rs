//! Credential store holding the user PIN and the fixed admin PIN.

use crate::Pin;
use crate::constants::ADMIN_PIN;

/// Stored PINs for the safe.
///
/// The admin PIN is fixed at construction. The user PIN can only be
/// replaced through [`reset_user_pin`](CredentialStore::reset_user_pin).
///
/// # Examples
///
/// ```
/// use safebox_core::{CredentialStore, Pin};
///
/// let mut store = CredentialStore::new(Pin::new("1234").unwrap());
/// assert!(store.verify_user(&Pin::new("1234").unwrap()));
///
/// store.reset_user_pin(Pin::new("5555").unwrap());
/// assert!(!store.verify_user(&Pin::new("1234").unwrap()));
/// assert!(store.verify_user(&Pin::new("5555").unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct CredentialStore {
    user_pin: Pin,
    admin_pin: Pin,
}

impl CredentialStore {
    /// Create a store with the given user PIN and the built-in admin PIN.
    pub fn new(user_pin: Pin) -> Self {
        Self {
            user_pin,
            admin_pin: Pin::new_unchecked(ADMIN_PIN),
        }
    }

    /// True iff `candidate` equals the stored user PIN.
    pub fn verify_user(&self, candidate: &Pin) -> bool {
        self.user_pin == *candidate
    }

    /// True iff `candidate` equals the admin PIN.
    pub fn verify_admin(&self, candidate: &Pin) -> bool {
        self.admin_pin == *candidate
    }

    /// Overwrite the user PIN.
    pub fn reset_user_pin(&mut self, new_pin: Pin) {
        self.user_pin = new_pin;
    }
}
