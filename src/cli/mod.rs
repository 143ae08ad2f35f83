//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `mvp-prompt stats`: usage statistics from the backend
//! - `mvp-prompt health`: check config, backend reachability, request log
//! - `mvp-prompt config show|init|set|reset`: configuration management

use anyhow::Result;
use colored::Colorize;

use crate::analytics::logger;
use crate::config;
use crate::gateway::{Backend, HttpBackend};

/// Output format for the stats command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// mvp-prompt stats
// ---------------------------------------------------------------------------

/// Show usage statistics, fetched the same way the page does
/// (browser-direct, from `backend.public_url`).
pub fn run_stats(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let backend = HttpBackend::public_from_config(&cfg.backend);

    match format {
        OutputFormat::Json => {
            let doc = backend
                .stats_document()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Table => match backend.get_stats() {
            Ok(stats) => crate::shell::print_stats(Some(&stats)),
            Err(e) => {
                println!("{} {}", "No stats available:".yellow(), e);
            }
        },
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// mvp-prompt health
// ---------------------------------------------------------------------------

/// Check configuration, backend reachability and the request log.
pub fn run_health() -> Result<()> {
    println!("{}", "mvp-prompt Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.mvp-prompt/config.toml found"
        } else {
            "not found (run `mvp-prompt config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".mvp-prompt.toml found"
        } else {
            "none (optional)"
        },
    );

    let proxy_backend = HttpBackend::from_config(&cfg.backend);
    let proxy_ok = proxy_backend.is_healthy();
    print_health_item(
        "Backend (proxy)",
        proxy_ok,
        &reachability(proxy_ok, &cfg.backend.url),
    );

    let public_backend = HttpBackend::public_from_config(&cfg.backend);
    let public_ok = public_backend.is_healthy();
    print_health_item(
        "Backend (stats)",
        public_ok,
        &reachability(public_ok, &cfg.backend.public_url),
    );

    print_health_item("Provider", true, &cfg.backend.provider);

    let log_exists = logger::request_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let detail = if !cfg.logging.enabled {
        "disabled".to_string()
    } else if log_exists {
        let entries = logger::read_all_entries();
        let failures = entries.iter().filter(|e| e.status >= 500).count();
        format!("{} requests, {} failed upstream", entries.len(), failures)
    } else {
        "no log file yet".to_string()
    };
    print_health_item("Request log", log_exists || !cfg.logging.enabled, &detail);

    Ok(())
}

fn reachability(ok: bool, url: &str) -> String {
    if ok {
        format!("reachable at {url}")
    } else {
        format!("not reachable at {url}")
    }
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// mvp-prompt config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.mvp-prompt/config.toml");
    print_source(project_exists, ".mvp-prompt.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "BACKEND_API_URL, PUBLIC_BACKEND_API_URL, MVP_PROMPT_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.mvp-prompt/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn reachability_mentions_url() {
        assert!(reachability(true, "http://x").contains("reachable at http://x"));
        assert!(reachability(false, "http://x").starts_with("not reachable"));
    }
}
