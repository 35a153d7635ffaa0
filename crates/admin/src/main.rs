//! Portico admin command line.
//!
//! Builds the admin site from the environment and inspects its registries.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use portico_admin::{AdminSite, Config};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = cli::Cli::parse();

    let config = Config::from_env().context("failed to load configuration")?;
    debug!(base = %config.admin_base_url, "configuration loaded");

    let site = AdminSite::build(config).context("failed to assemble admin site")?;

    cli::run(args.command, &site)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
