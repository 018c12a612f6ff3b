use serde::Deserialize;

use crate::error::ReserveError;

/// Default number of decimal places used when descaling rays and dividing.
pub const DEFAULT_DECIMAL_PLACES: u32 = 20;

/// Upper bound on `decimal_places`; keeps division intermediates inside 512 bits.
pub const MAX_DECIMAL_PLACES: u32 = 60;

/// Arithmetic context owned by a formatter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FormatterConfig {
    /// Places kept when a value is produced by division (ray descaling, utilization, APYs).
    pub decimal_places: u32,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Decimal places for division results (default: 20)
    pub decimal_places: u32,

    /// Pretty-print JSON output in the CLI (default: false)
    pub pretty_output: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ReserveError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReserveError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let decimal_places: u32 = lookup("LENDVIEW_DECIMAL_PLACES")
            .unwrap_or_else(|| DEFAULT_DECIMAL_PLACES.to_string())
            .parse()
            .map_err(|_| {
                ReserveError::Config("LENDVIEW_DECIMAL_PLACES must be a valid u32".to_string())
            })?;
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(ReserveError::Config(format!(
                "LENDVIEW_DECIMAL_PLACES must be at most {MAX_DECIMAL_PLACES}"
            )));
        }

        let pretty_output = match lookup("LENDVIEW_PRETTY_OUTPUT").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ReserveError::Config(format!(
                    "LENDVIEW_PRETTY_OUTPUT must be true/false/1/0, got {other:?}"
                )));
            }
        };

        tracing::debug!(decimal_places, pretty_output, "Configuration loaded");

        Ok(Self {
            decimal_places,
            pretty_output,
        })
    }

    pub fn formatter(&self) -> FormatterConfig {
        FormatterConfig {
            decimal_places: self.decimal_places,
        }
    }
}
