//! Configuration System
//!
//! Layered configuration for the synchronization layer: built-in defaults, the
//! user-level config file, an optional explicit file, then environment overrides.
//! Validation collects every problem instead of stopping at the first.

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Storefront API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Live search behavior
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storefront API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Upper bound on any single request, mutations included
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Check every field, reporting each problem separately.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let base = self.base_url.trim();
        if base.is_empty() {
            errors.push("base_url cannot be empty".to_string());
        } else if !(base.starts_with("http://") || base.starts_with("https://")) {
            errors.push(format!(
                "base_url must start with http:// or https:// (got '{}')",
                base
            ));
        }
        if self.connect_timeout_ms == 0 {
            errors.push("connect_timeout_ms must be greater than zero".to_string());
        }
        if self.request_timeout_ms == 0 {
            errors.push("request_timeout_ms must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Live search behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiescence required after the last keystroke before a query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How long a dispatched query may stay unanswered before it is abandoned
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,
}

fn default_debounce_ms() -> u64 {
    1_000
}

fn default_response_timeout_ms() -> u64 {
    10_000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            response_timeout_ms: default_response_timeout_ms(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.debounce_ms == 0 {
            errors.push("debounce_ms must be greater than zero".to_string());
        }
        if self.response_timeout_ms == 0 {
            errors.push("response_timeout_ms must be greater than zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Api(String),
    Search(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Api(msg) => write!(f, "api: {}", msg),
            ValidationError::Search(msg) => write!(f, "search: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SyncConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(api_errors) = self.api.validate() {
            errors.extend(api_errors.into_iter().map(ValidationError::Api));
        }
        if let Err(search_errors) = self.search.validate() {
            errors.extend(search_errors.into_iter().map(ValidationError::Search));
        }
        if let Err(e) = crate::logging::validate_format(&self.logging.format) {
            errors.push(ValidationError::Logging(e.to_string()));
        }
        if let Err(e) = crate::logging::validate_output(&self.logging.output) {
            errors.push(ValidationError::Logging(e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold every problem into one error.
    pub fn validated(self) -> Result<Self, SyncError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            SyncError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}
