//! Error types for the safe's peripherals.
//!
//! Only three failures surface from a device: it went away, it was handed
//! something it cannot show, or the door did not move.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Failure reported by a peripheral.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The device is gone; every later call will fail too.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Request the device cannot carry out, such as a row past the panel.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Door actuator did not reach the commanded position.
    #[error("Actuator jammed: {message}")]
    Jammed { message: String },
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn jammed(message: impl Into<String>) -> Self {
        Self::Jammed {
            message: message.into(),
        }
    }

    /// Whether further calls to the device are pointless.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}
