mod args;
mod commands;
mod display;
mod prompt;
mod table;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dcarbon_admin::{AssumeYes, Confirm, Ui};
use dcarbon_api::{AdminClient, ClientConfig, FileToken, Session, StaticToken};
use tracing::Level;

use crate::args::Cli;
use crate::prompt::{StderrNotifier, TerminalConfirm};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("dcarbon v{}", env!("CARGO_PKG_VERSION"));

    let session = match (&cli.token_file, &cli.token) {
        (Some(path), _) => Session::new(FileToken::new(path.clone())),
        (None, token) => Session::new(StaticToken::new(token.clone())),
    };
    let config = ClientConfig::default()
        .with_base_url(cli.base_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let client = AdminClient::new(&config, session).context("building HTTP client")?;

    let confirm: Arc<dyn Confirm> = if cli.yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(TerminalConfirm)
    };
    let ui = Ui::from_arcs(confirm, Arc::new(StderrNotifier));

    commands::run(cli.command, Arc::new(client), ui).await
}
