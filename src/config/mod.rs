//! Configuration system for mvp-prompt.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults**: hardcoded in [`schema::AppConfig::default()`]
//! 2. **User global config**: `~/.mvp-prompt/config.toml`
//! 3. **Project local config**: `.mvp-prompt.toml` in the current directory
//! 4. **Environment variables**: highest precedence
//!
//! The two backend URLs keep the environment names the deployment already
//! uses: `BACKEND_API_URL` for proxy calls and `PUBLIC_BACKEND_API_URL` for
//! browser-direct stats calls.
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::AppConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> AppConfig {
    let mut config = AppConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Project file replaces the global one wholesale; each file is
    // deserialized on top of the defaults.
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Malformed files are ignored so a broken file never stops the server.
fn load_toml_file(path: Option<PathBuf>) -> Option<AppConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("[mvp-prompt] ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.mvp-prompt`, home of the config file and the request log.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".mvp-prompt"))
}

fn global_config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".mvp-prompt.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `BACKEND_API_URL`: backend base URL for proxy calls
/// - `PUBLIC_BACKEND_API_URL`: backend base URL for browser-direct stats
/// - `MVP_PROMPT_ADDR`: listen address
/// - `MVP_PROMPT_OPEN_BROWSER`: open the page on start (`1`/`true`/...)
/// - `MVP_PROMPT_PROVIDER`: provider forwarded to the backend
/// - `MVP_PROMPT_TIMEOUT_MS`: backend request timeout
/// - `MVP_PROMPT_LOG`: JSONL request log on/off
fn apply_env_overrides(config: &mut AppConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary variable lookup. Empty values are
/// treated as unset.
fn apply_overrides_from(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(val) = get("BACKEND_API_URL") {
        config.backend.url = val;
    }
    if let Some(val) = get("PUBLIC_BACKEND_API_URL") {
        config.backend.public_url = val;
    }
    if let Some(val) = get("MVP_PROMPT_ADDR") {
        config.server.addr = val;
    }
    if let Some(val) = get("MVP_PROMPT_OPEN_BROWSER") {
        config.server.open_browser = is_truthy(&val);
    }
    if let Some(val) = get("MVP_PROMPT_PROVIDER") {
        config.backend.provider = val;
    }
    if let Some(val) = get("MVP_PROMPT_TIMEOUT_MS")
        && let Ok(ms) = val.trim().parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Some(val) = get("MVP_PROMPT_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.mvp-prompt/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.mvp-prompt/ directory")?;
    }

    fs::write(&path, AppConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key in the global config file.
///
/// Supports dotted keys like `backend.url`. The file is created from the
/// defaults if it does not exist yet.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&AppConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Refuse to write something the loader would then ignore.
    let rendered = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<AppConfig>(&rendered)
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, rendered).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path, keeping the
/// type of the existing value.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be 'section.key', got '{key}'");
    };

    let mut current = root;
    for part in section_path.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section_path}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_select_backend_urls() {
        let mut config = AppConfig::default();
        apply_overrides_from(
            &mut config,
            lookup_from(&[
                ("BACKEND_API_URL", "https://api.example.com"),
                ("PUBLIC_BACKEND_API_URL", "https://public.example.com"),
            ]),
        );
        assert_eq!(config.backend.url, "https://api.example.com");
        assert_eq!(config.backend.public_url, "https://public.example.com");
    }

    #[test]
    fn missing_or_empty_vars_fall_back() {
        let mut config = AppConfig::default();
        apply_overrides_from(&mut config, lookup_from(&[("BACKEND_API_URL", "  ")]));
        assert_eq!(config.backend.url, schema::DEFAULT_BACKEND_URL);
        assert_eq!(config.backend.public_url, schema::DEFAULT_PUBLIC_BACKEND_URL);
    }

    #[test]
    fn overrides_parse_typed_values() {
        let mut config = AppConfig::default();
        apply_overrides_from(
            &mut config,
            lookup_from(&[
                ("MVP_PROMPT_TIMEOUT_MS", "2500"),
                ("MVP_PROMPT_OPEN_BROWSER", "no"),
                ("MVP_PROMPT_LOG", "off"),
                ("MVP_PROMPT_PROVIDER", "openai"),
            ]),
        );
        assert_eq!(config.backend.timeout_ms, 2500);
        assert!(!config.server.open_browser);
        assert!(!config.logging.enabled);
        assert_eq!(config.backend.provider, "openai");
    }

    #[test]
    fn unparsable_timeout_is_ignored() {
        let mut config = AppConfig::default();
        apply_overrides_from(&mut config, lookup_from(&[("MVP_PROMPT_TIMEOUT_MS", "soon")]));
        assert_eq!(config.backend.timeout_ms, schema::DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on", " On "] {
            assert!(is_truthy(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no), "{no}");
        }
    }

    #[test]
    fn set_toml_value_keeps_types() {
        let mut root: toml::Value =
            toml::from_str(&toml::to_string_pretty(&AppConfig::default()).unwrap()).unwrap();

        set_toml_value(&mut root, "backend.url", "http://10.0.0.2:8000").unwrap();
        set_toml_value(&mut root, "backend.timeout_ms", "9000").unwrap();
        set_toml_value(&mut root, "server.open_browser", "false").unwrap();

        let config: AppConfig = toml::from_str(&toml::to_string(&root).unwrap()).unwrap();
        assert_eq!(config.backend.url, "http://10.0.0.2:8000");
        assert_eq!(config.backend.timeout_ms, 9000);
        assert!(!config.server.open_browser);
    }

    #[test]
    fn set_toml_value_rejects_bad_input() {
        let mut root: toml::Value =
            toml::from_str(&toml::to_string_pretty(&AppConfig::default()).unwrap()).unwrap();

        assert!(set_toml_value(&mut root, "backend.timeout_ms", "fast").is_err());
        assert!(set_toml_value(&mut root, "nonexistent.key", "x").is_err());
        assert!(set_toml_value(&mut root, "backend.nope", "x").is_err());
        assert!(set_toml_value(&mut root, "backend", "x").is_err());
    }
}
