//! Configuration loading with layered precedence.
//!
//! Precedence order (lowest to highest): defaults, configuration file,
//! environment variables. The file is only consulted when `WHARF_CONFIG_PATH`
//! is set; a set-but-unreadable path is an error rather than a silent
//! fallback, so misconfigurations are visible instead of masked by defaults.

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::ApiConfig;
use crate::error::{ConfigError, Result};

/// Environment variable naming the configuration file path.
const CONFIG_PATH_VAR: &str = "WHARF_CONFIG_PATH";

/// Environment variable overriding the management API base URL.
const API_URL_VAR: &str = "WHARF_API_URL";

/// Environment variable overriding the management API credential.
const API_KEY_VAR: &str = "WHARF_API_KEY";

/// Load configuration with layered precedence.
///
/// The environment is read through the `mockable::Env` abstraction so tests
/// can exercise the layering without touching process state.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` when `WHARF_CONFIG_PATH` names a file
/// that cannot be read, and `ConfigError::ParseError` when the file is not
/// valid TOML.
pub fn load_config<E: mockable::Env>(env: &E) -> Result<ApiConfig> {
    let mut config = env
        .string(CONFIG_PATH_VAR)
        .filter(|path| !path.is_empty())
        .map(Utf8PathBuf::from)
        .map(|path| load_file(&path))
        .transpose()?
        .unwrap_or_default();

    if let Some(url) = non_empty(env.string(API_URL_VAR)) {
        config.api_url = Some(url);
    }
    if let Some(key) = non_empty(env.string(API_KEY_VAR)) {
        config.api_key = Some(key);
    }

    Ok(config)
}

/// Parse a TOML configuration file.
fn load_file(path: &Utf8Path) -> Result<ApiConfig> {
    let contents = std::fs::read_to_string(path).map_err(|error| {
        if error.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_owned(),
            }
        } else {
            ConfigError::ParseError {
                message: format!("failed to read '{path}': {error}"),
            }
        }
    })?;

    toml::from_str(&contents)
        .map_err(|error| {
            ConfigError::ParseError {
                message: error.to_string(),
            }
            .into()
        })
}

/// Treat empty environment values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
