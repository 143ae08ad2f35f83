use anyhow::Result;
use clap::{Parser, Subcommand};

use mvp_prompt::{cli, config, shell, web};

#[derive(Debug, Parser)]
#[command(name = "mvp-prompt")]
#[command(about = "Turn a GitHub repository into an MVP prompt")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the page and the proxy endpoints
    Serve {
        /// Listen address (overrides `server.addr`)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open the page in a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Interactive terminal front-end against a running proxy
    Shell {
        /// Proxy base URL (default: http://<server.addr>)
        #[arg(long)]
        proxy: Option<String>,
    },
    /// Show usage statistics from the backend
    Stats {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check configuration and backend reachability
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `backend.url http://localhost:8000`
    Set { key: String, value: String },
    /// Restore the default config file
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_open } => {
            let mut cfg = config::load();
            if let Some(addr) = addr {
                cfg.server.addr = addr;
            }
            if no_open {
                cfg.server.open_browser = false;
            }
            web::serve(&cfg)
        }
        Commands::Shell { proxy } => {
            let cfg = config::load();
            let proxy = proxy.unwrap_or_else(|| format!("http://{}", cfg.server.addr));
            shell::run(&cfg, &proxy)
        }
        Commands::Stats { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
