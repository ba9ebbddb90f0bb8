//! Error types for the CrisisSim server.
//!
//! All library crates in the workspace use this hierarchy; only the server
//! binary falls back to `anyhow`. Each variant carries enough context to be
//! surfaced to a caller or logged without further lookup.
//!
//! # Examples
//!
//! ```
//! use crisis_sim_core::{Error, Result};
//!
//! fn validate_location(location: &str) -> Result<()> {
//!     if location.trim().is_empty() {
//!         return Err(Error::InvalidInput {
//!             message: "location must not be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = validate_location("").unwrap_err();
//! assert!(err.is_invalid_input());
//! ```

use thiserror::Error;

/// Main error type for CrisisSim.
///
/// Only `InvalidInput` and `SessionNotFound` are ever user-visible;
/// `Provider` errors are absorbed by the template fallback and `Config`
/// errors can only occur at startup.
#[derive(Error, Debug)]
pub enum Error {
    /// A tool argument was malformed or missing.
    ///
    /// Surfaced to the caller as a descriptive invalid-params error,
    /// never a crash.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the offending argument
        message: String,
    },

    /// The referenced session does not exist or has been evicted.
    ///
    /// Fully recoverable: the caller may generate a new scenario.
    #[error("Session ID {session_id} not found")]
    SessionNotFound {
        /// The identifier the caller supplied
        session_id: String,
    },

    /// The external text-generation provider failed.
    ///
    /// Covers transport, authentication, quota, and malformed-response
    /// failures alike. The scenario service converts this into a template
    /// fallback; it never crosses the wire as an error.
    #[error("Text generation failed: {message}")]
    Provider {
        /// Description of the provider failure
        message: String,
        /// Underlying error cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration is invalid or missing required fields.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Returns `true` if this is an invalid-input error.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Returns `true` if this is a session-not-found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use crisis_sim_core::Error;
    ///
    /// let err = Error::SessionNotFound {
    ///     session_id: "b7e3".to_string(),
    /// };
    /// assert!(err.is_session_not_found());
    /// ```
    #[must_use]
    pub const fn is_session_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound { .. })
    }

    /// Returns `true` if this is a provider error.
    #[must_use]
    pub const fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_detection() {
        let err = Error::InvalidInput {
            message: "crisis_type must not be empty".to_string(),
        };
        assert!(err.is_invalid_input());
        assert!(!err.is_session_not_found());
    }

    #[test]
    fn test_session_not_found_detection() {
        let err = Error::SessionNotFound {
            session_id: "deadbeef".to_string(),
        };
        assert!(err.is_session_not_found());
        assert!(!err.is_provider_error());
    }

    #[test]
    fn test_provider_error_detection() {
        let err = Error::Provider {
            message: "request timed out".to_string(),
            source: None,
        };
        assert!(err.is_provider_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = Error::SessionNotFound {
            session_id: "abc-123".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("abc-123"));
        assert!(display.contains("not found"));
    }

    #[test]
    fn test_result_alias() {
        fn returns_err() -> Result<u32> {
            Err(Error::Config {
                message: "missing model".to_string(),
            })
        }

        assert!(returns_err().is_err());
    }
}
