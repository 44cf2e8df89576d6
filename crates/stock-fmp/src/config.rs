//! Provider configuration.
//!
//! The base URL and API credential are read once at start-up and never
//! change for the lifetime of a provider.

use std::fmt;

use stock_core::{FetchError, Result};

/// Base URL for the FMP stable API.
pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Environment variable holding the API base URL.
pub const BASE_URL_VAR: &str = "FMP_BASE_URL";

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "FMP_API_KEY";

/// Base URL and credential for the FMP API.
#[derive(Clone, PartialEq, Eq)]
pub struct FmpConfig {
    base_url: String,
    api_key: String,
}

impl fmt::Debug for FmpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl FmpConfig {
    /// Create a configuration from explicit values.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    /// Create a configuration for the public stable API.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::new(DEFAULT_BASE_URL, api_key)
    }

    /// Read `FMP_BASE_URL` and `FMP_API_KEY` from the process environment.
    ///
    /// # Errors
    /// Returns [`FetchError::Configuration`] if either variable is missing or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`FetchError::Configuration`] if either variable is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_default();
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();
        let config = Self::new(base_url, api_key);
        config.validate()?;
        Ok(config)
    }

    /// Checks that both values are present.
    ///
    /// # Errors
    /// Returns [`FetchError::Configuration`] naming the missing variable.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(FetchError::Configuration(format!(
                "{BASE_URL_VAR} is not set"
            )));
        }
        if self.api_key.is_empty() {
            return Err(FetchError::Configuration(format!(
                "{API_KEY_VAR} is not set"
            )));
        }
        Ok(())
    }

    /// The API base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}
