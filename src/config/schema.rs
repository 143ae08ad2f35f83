//! Configuration schema and defaults for mvp-prompt.
//!
//! Defines the TOML-serializable configuration structure with the sections
//! `[server]`, `[backend]` and `[logging]`. Every field has a built-in
//! default; users only set the values they want to override.
use serde::{Deserialize, Serialize};

/// Default listen address for the proxy and page.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default backend URL for server-to-backend proxy calls.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default backend URL for browser-direct stats calls.
pub const DEFAULT_PUBLIC_BACKEND_URL: &str = "http://localhost:5000";

/// Default generation provider forwarded to the backend.
pub const DEFAULT_PROVIDER: &str = "groq";

/// Default timeout for backend calls. Generation can take a while.
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// Maps directly to `~/.mvp-prompt/config.toml` and `.mvp-prompt.toml`.
/// All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the proxy listens on.
    pub addr: String,
    /// Open the page in the default browser on start.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the external analysis backend lives and how to call it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL used by the proxy (server to backend).
    pub url: String,
    /// Base URL used by the page for stats (browser to backend).
    pub public_url: String,
    /// Provider name sent along with generate requests.
    pub provider: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            public_url: DEFAULT_PUBLIC_BACKEND_URL.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append proxy requests to `~/.mvp-prompt/requests.jsonl`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// Annotated default config written by `config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# mvp-prompt configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (BACKEND_API_URL, PUBLIC_BACKEND_API_URL, MVP_PROMPT_*)
#   2. Project config (.mvp-prompt.toml in current directory)
#   3. User global config (~/.mvp-prompt/config.toml)
#   4. Built-in defaults

[server]
addr = "{DEFAULT_ADDR}"
open_browser = true

[backend]
url = "{DEFAULT_BACKEND_URL}"           # proxy -> backend
public_url = "{DEFAULT_PUBLIC_BACKEND_URL}"    # browser -> backend (stats)
provider = "{DEFAULT_PROVIDER}"
timeout_ms = {DEFAULT_TIMEOUT_MS}

[logging]
enabled = true                          # ~/.mvp-prompt/requests.jsonl
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config: AppConfig = toml::from_str(&AppConfig::default_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[backend]
url = "http://analysis.internal:9000"
"#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "http://analysis.internal:9000");
        assert_eq!(config.backend.public_url, DEFAULT_PUBLIC_BACKEND_URL);
        assert_eq!(config.backend.provider, "groq");
        assert_eq!(config.server.addr, DEFAULT_ADDR);
        assert!(config.logging.enabled);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
