//! Helper configuration
//!
//! Loading settings from a file is host-side tooling. The helpers never
//! read configuration themselves: [`filter_name`](crate::filter_name),
//! [`ignore_property`](crate::ignore_property) and the free `ensure_*`
//! functions always use the built-in defaults. A host that wants
//! file-based settings calls [`HelperConfig::load`] and hands the result to
//! [`Provisioner::from_config`](crate::Provisioner::from_config) and
//! [`PropertyFilter::from_config`](crate::PropertyFilter::from_config).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Attempts made before provisioning gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    pub retry: RetryConfig,
    /// Extra keys to keep out of the store, mapped to the reason.
    pub ignored_properties: BTreeMap<String, String>,
}

/// `[retry]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: BackoffConfig::None,
        }
    }
}

/// `[retry.backoff]` table. Delays are in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum BackoffConfig {
    /// Retry immediately.
    #[default]
    None,
    Constant {
        delay_ms: u64,
    },
    Exponential {
        initial_ms: u64,
        max_ms: u64,
        #[serde(default = "default_multiplier")]
        multiplier: f64,
    },
}

fn default_multiplier() -> f64 {
    2.0
}

/// Runtime form of [`BackoffConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BackoffStrategy {
    #[default]
    None,
    Constant {
        delay: Duration,
    },
    Exponential {
        initial: Duration,
        max: Duration,
        multiplier: f64,
    },
}

impl From<&BackoffConfig> for BackoffStrategy {
    fn from(config: &BackoffConfig) -> Self {
        match *config {
            BackoffConfig::None => Self::None,
            BackoffConfig::Constant { delay_ms } => Self::Constant {
                delay: Duration::from_millis(delay_ms),
            },
            BackoffConfig::Exponential {
                initial_ms,
                max_ms,
                multiplier,
            } => Self::Exponential {
                initial: Duration::from_millis(initial_ms),
                max: Duration::from_millis(max_ms),
                multiplier,
            },
        }
    }
}

impl HelperConfig {
    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    ///
    /// The result is validated before it is returned.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let parse_error = |format: &str, message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.into(),
            message,
        };

        let config: Self = match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| parse_error("TOML", e.to_string()))?,
            "json" => {
                serde_json::from_str(&content).map_err(|e| parse_error("JSON", e.to_string()))?
            }
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| parse_error("YAML", e.to_string()))?
            }
            _ => return Err(Error::UnsupportedFormat { extension }),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: "<inline>".into(),
            format: "TOML".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(Error::InvalidConfig {
                message: "retry.max_attempts must be at least 1".into(),
            });
        }
        if let BackoffConfig::Exponential {
            initial_ms,
            max_ms,
            multiplier,
        } = self.retry.backoff
        {
            if !multiplier.is_finite() || multiplier < 1.0 {
                return Err(Error::InvalidConfig {
                    message: format!("retry.backoff.multiplier must be >= 1, got {multiplier}"),
                });
            }
            if max_ms < initial_ms {
                return Err(Error::InvalidConfig {
                    message: "retry.backoff.max_ms is below initial_ms".into(),
                });
            }
        }
        Ok(())
    }
}
