//! Runtime configuration for the CrisisSim server.
//!
//! Configuration is supplied at process startup through environment
//! variables. The provider API key is held as a [`SecretString`] so it is
//! redacted from `Debug` output and never embedded in source.
//!
//! # Examples
//!
//! ```
//! use crisis_sim_core::ServerConfig;
//!
//! let config = ServerConfig::default();
//! assert_eq!(config.provider.model, "gpt-4o-mini");
//! assert!(config.validate().is_ok());
//! ```

use crate::{Error, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Environment variable holding the provider API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable selecting the generation model.
pub const MODEL_VAR: &str = "CRISIS_MODEL";

/// Environment variable selecting the default log verbosity.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Provider-facing configuration.
///
/// The sampling temperature is fixed at 0.7 to match the tone of the
/// deterministic fallback templates.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key for the text-generation provider.
    ///
    /// If `None`, the server runs in permanent template-fallback mode for
    /// the process lifetime.
    pub api_key: Option<SecretString>,

    /// Model identifier sent to the provider.
    /// Default: `gpt-4o-mini`
    pub model: String,

    /// Upper bound on generated tokens per request.
    /// Default: 500
    pub max_output_tokens: u32,

    /// Sampling temperature.
    /// Default: 0.7
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_output_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Text-generation provider settings.
    pub provider: ProviderConfig,

    /// Sessions older than this are removed by the eviction sweep.
    /// Default: 24 hours
    pub session_max_age: Duration,

    /// Interval between eviction sweeps.
    /// Default: 1 hour
    pub sweep_interval: Duration,

    /// Default log verbosity when `RUST_LOG` is unset.
    /// Default: `info`
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            session_max_age: Duration::from_secs(24 * 60 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Builds a configuration from the process environment.
    ///
    /// Reads `OPENAI_API_KEY`, `CRISIS_MODEL`, and `LOG_LEVEL`. Unset
    /// variables fall back to defaults; an absent API key selects
    /// template-fallback mode rather than being an error.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var(API_KEY_VAR)
            && !key.trim().is_empty()
        {
            config.provider.api_key = Some(SecretString::from(key));
        }

        if let Ok(model) = std::env::var(MODEL_VAR)
            && !model.trim().is_empty()
        {
            config.provider.model = model;
        }

        if let Ok(level) = std::env::var(LOG_LEVEL_VAR)
            && !level.trim().is_empty()
        {
            config.log_level = level.to_lowercase();
        }

        config
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if:
    /// - The model name is empty
    /// - The token budget is zero
    /// - Either duration is zero
    pub fn validate(&self) -> Result<()> {
        if self.provider.model.trim().is_empty() {
            return Err(Error::Config {
                message: "model name must not be empty".to_string(),
            });
        }

        if self.provider.max_output_tokens == 0 {
            return Err(Error::Config {
                message: "max_output_tokens must be greater than zero".to_string(),
            });
        }

        if self.session_max_age.is_zero() {
            return Err(Error::Config {
                message: "session_max_age must be greater than zero".to_string(),
            });
        }

        if self.sweep_interval.is_zero() {
            return Err(Error::Config {
                message: "sweep_interval must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `true` if a provider API key is configured.
    #[must_use]
    pub const fn has_provider(&self) -> bool {
        self.provider.api_key.is_some()
    }
}
