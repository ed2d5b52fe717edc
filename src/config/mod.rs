//! Configuration system for the wharf client.
//!
//! Two settings are required: the management API base URL and the API
//! credential. Both can come from a TOML file (path in `WHARF_CONFIG_PATH`)
//! or from environment variables (`WHARF_API_URL`, `WHARF_API_KEY`), with
//! environment variables taking precedence over the file. A missing setting
//! is a fatal construction condition for the transport, surfaced once at
//! client construction and never retried.
//!
//! # Example Configuration
//!
//! ```toml
//! api_url = "https://orchestrator.example.com"
//! api_key = "wh_0123456789abcdef"
//! ```

mod loader;
mod types;


pub use loader::load_config;
pub use types::ApiConfig;
