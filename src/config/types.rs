//! Configuration data types for the wharf client.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Management API connection configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the management API, e.g. `https://orchestrator.example.com`.
    pub api_url: Option<String>,

    /// API credential sent with every request.
    pub api_key: Option<String>,
}

impl ApiConfig {
    /// Validates that both required settings are present and non-blank.
    ///
    /// Call this before constructing a transport; both fields are required
    /// for any management API call to succeed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` if either field is `None` or
    /// blank, with the missing field names listed in the error message.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if !is_present(self.api_url.as_deref()) {
            missing.push("api_url");
        }
        if !is_present(self.api_key.as_deref()) {
            missing.push("api_key");
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: missing.join(", "),
            }
            .into());
        }
        Ok(())
    }

    /// Returns whether both required settings are present and non-blank.
    ///
    /// This mirrors the checks performed by [`validate()`](Self::validate).
    #[must_use]
    pub fn is_configured(&self) -> bool {
        is_present(self.api_url.as_deref()) && is_present(self.api_key.as_deref())
    }
}

/// Whether an optional setting holds a non-blank value.
fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
