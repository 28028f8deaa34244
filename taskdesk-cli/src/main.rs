//! # TaskDesk
//!
//! Command-line front end for the TaskDesk task manager. Users, the current
//! session and tasks are kept in a file-backed store under
//! `TASKDESK_DATA_DIR`.
//!
//! ## Usage
//!
//! ```bash
//! taskdesk register --name Ana --email ana@example.com --password secret
//! taskdesk login --email ana@example.com --password secret
//! taskdesk add "Write report" --priority high --tag finance
//! taskdesk list --mine
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use taskdesk_cli::cli::Cli;
use taskdesk_cli::commands;
use taskdesk_cli::config::Config;
use taskdesk_shared::context::TaskDesk;
use taskdesk_shared::store::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdesk=info,taskdesk_cli=info,taskdesk_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        "TaskDesk starting"
    );

    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open store at {}", config.data_dir.display()))?;
    let desk = TaskDesk::open(Arc::new(store), config.auth)?;

    let mut stdout = std::io::stdout().lock();
    commands::run_and_shutdown(cli.command, desk, &config, &mut stdout).await
}
