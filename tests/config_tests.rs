//! Configuration loading tests.
//!
//! Uses `std::env::set_var` / `remove_var`, which are `unsafe` in edition
//! 2024. Everything touching the environment lives in one test so the
//! variables are never observed by a concurrently running test.
use mvp_prompt::config::{self, AppConfig, schema};

fn set_env(key: &str, val: &str) {
    // SAFETY: only this test reads or writes these variables.
    unsafe { std::env::set_var(key, val) }
}

fn remove_env(key: &str) {
    // SAFETY: see `set_env`.
    unsafe { std::env::remove_var(key) }
}

#[test]
fn environment_overrides_win_and_empty_values_are_ignored() {
    set_env("BACKEND_API_URL", "http://backend.internal:9000");
    set_env("PUBLIC_BACKEND_API_URL", "");
    set_env("MVP_PROMPT_TIMEOUT_MS", "1500");
    set_env("MVP_PROMPT_LOG", "false");

    let cfg = config::load();

    remove_env("BACKEND_API_URL");
    remove_env("PUBLIC_BACKEND_API_URL");
    remove_env("MVP_PROMPT_TIMEOUT_MS");
    remove_env("MVP_PROMPT_LOG");

    assert_eq!(cfg.backend.url, "http://backend.internal:9000");
    assert_eq!(cfg.backend.timeout_ms, 1500);
    assert!(!cfg.logging.enabled);
    assert!(!cfg.backend.public_url.is_empty());
}

#[test]
fn default_template_parses_to_defaults() {
    let parsed: AppConfig = toml::from_str(&AppConfig::default_toml()).unwrap();
    assert_eq!(parsed, AppConfig::default());
    assert_eq!(parsed.server.addr, "127.0.0.1:3000");
    assert_eq!(parsed.backend.url, "http://localhost:8000");
    assert_eq!(parsed.backend.public_url, "http://localhost:5000");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let parsed: AppConfig = toml::from_str(
        r#"
[backend]
provider = "openai"
"#,
    )
    .unwrap();
    assert_eq!(parsed.backend.provider, "openai");
    assert_eq!(parsed.backend.url, schema::DEFAULT_BACKEND_URL);
    assert_eq!(parsed.server, AppConfig::default().server);
}
