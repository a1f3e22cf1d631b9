use crate::{Result, constants::PIN_LENGTH, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// A 4-character PIN.
///
/// Any characters are accepted; only the length is checked, counted in
/// `char`s. The value is compared exactly, without trimming or case folding.
///
/// # Security
/// Comparison runs in constant time so a failed attempt does not reveal how
/// many leading characters matched. `Debug` masks the value.
#[derive(Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin(String);

impl Pin {
    /// Create a PIN, checking its length.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if `value` is not exactly
    /// [`PIN_LENGTH`] characters long.
    ///
    /// # Examples
    ///
    /// ```
    /// use safebox_core::Pin;
    ///
    /// let pin = Pin::new("1234").unwrap();
    /// assert_eq!(pin.as_str(), "1234");
    /// assert!(Pin::new("123").is_err());
    /// ```
    pub fn new(value: &str) -> Result<Self> {
        let actual = value.chars().count();
        if actual != PIN_LENGTH {
            return Err(Error::InvalidPin {
                expected: PIN_LENGTH,
                actual,
            });
        }
        Ok(Pin(value.to_string()))
    }

    /// Create a PIN without validation (for built-in constants).
    ///
    /// Caller must ensure `value` is exactly [`PIN_LENGTH`] characters.
    pub(crate) fn new_unchecked(value: &str) -> Self {
        debug_assert!(value.chars().count() == PIN_LENGTH, "PIN must be 4 characters");
        Pin(value.to_string())
    }

    /// Get the PIN as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Constant-time comparison implementation for Pin
impl PartialEq for Pin {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pin(****)")
    }
}

impl std::str::FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pin::new(s)
    }
}

impl TryFrom<String> for Pin {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Pin::new(&value)
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> Self {
        pin.0
    }
}
