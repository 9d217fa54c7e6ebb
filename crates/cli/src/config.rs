//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_RULES_LIMIT_POLICY` - `lenient` (default) skips malformed quantity
//!   limits with a warning, `strict` fails the run
//! - `CART_RULES_LOG_FORMAT` - `text` (default) or `json`
//! - `RUST_LOG` - Log filter (default: `cart_rules=info`, matching every crate in the workspace)
//!
//! Logs always go to stderr; stdout carries only the function output.

use cart_rules_functions::FunctionSettings;
use cart_rules_functions::cart_validation::LimitPolicy;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid log format: {s}")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Treatment of malformed quantity limits.
    pub limit_policy: LimitPolicy,
    /// Log output format.
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_values(
            get_optional_env("CART_RULES_LIMIT_POLICY").as_deref(),
            get_optional_env("CART_RULES_LOG_FORMAT").as_deref(),
        )
    }

    /// Build configuration from raw values; `None` means unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed.
    pub fn from_values(
        limit_policy: Option<&str>,
        log_format: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let limit_policy = parse_or_default(limit_policy, "CART_RULES_LIMIT_POLICY")?;
        let log_format = parse_or_default(log_format, "CART_RULES_LOG_FORMAT")?;

        Ok(Self {
            limit_policy,
            log_format,
        })
    }

    /// Function settings derived from this configuration.
    #[must_use]
    pub const fn function_settings(&self) -> FunctionSettings {
        FunctionSettings {
            limit_policy: self.limit_policy,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse a value if present, falling back to the type's default.
fn parse_or_default<T>(value: Option<&str>, key: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    value.map_or_else(
        || Ok(T::default()),
        |v| {
            v.parse()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
        },
    )
}
