//! `minivault` binary: parses flags, installs logging and serves the dashboard.

use anyhow::Context;
use clap::Parser;
use minivault_notion::DEFAULT_BASE_URL;
use minivault_server::{serve, AppState, DevSession, Secrets, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// MiniVault project dashboard server
#[derive(Parser, Debug)]
#[command(name = "minivault", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "MINIVAULT_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Directory feedback files are written under
    #[arg(long, env = "MINIVAULT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Project config file (.toml or .json)
    #[arg(long, env = "MINIVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Notion API endpoint
    #[arg(long, env = "NOTION_BASE_URL", default_value = DEFAULT_BASE_URL)]
    notion_base_url: String,

    /// Identity provider base URL used for sign-in links
    #[arg(long, env = "MINIVAULT_IDENTITY_URL")]
    identity_url: Option<String>,

    /// Sign every request in as "Name <email>" (local development only)
    #[arg(long)]
    dev_user: Option<String>,

    /// Log filter directive
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = ServerConfig {
        bind: cli.bind,
        data_dir: cli.data_dir.clone(),
        project_config: cli.config.clone(),
        notion_base_url: cli.notion_base_url.clone(),
        identity_url: cli.identity_url.clone(),
        secrets: Secrets::from_env(),
    };
    config.warn_missing();

    let mut state = AppState::from_config(&config)
        .await
        .context("failed to initialise application state")?;

    if let Some(raw) = &cli.dev_user {
        let dev = DevSession::parse(raw)?;
        tracing::warn!("dev session enabled: every request is signed in");
        state = state.with_resolver(Arc::new(dev));
    }

    serve(state, config.bind)
        .await
        .context("failed to bind listener")?;

    Ok(())
}
