//! Core types for the safebox controller: PINs, credentials, attempt
//! counting and configuration.

pub mod config;
pub mod constants;
pub mod credential;
pub mod error;
pub mod lock_guard;
pub mod types;

pub use config::SafeConfig;
pub use credential::CredentialStore;
pub use error::{Error, Result};
pub use lock_guard::{LockGuard, LockStatus};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
