//! pynik console entry point.

use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use pynik_bot::cli::{Cli, Command, ConfigAction};
use pynik_bot::config::BotConfig;
use pynik_bot::error::BotResult;
use pynik_bot::{Session, build_dispatcher};
use pynik_core::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> BotResult<()> {
    // Load configuration
    let config = match cli.config {
        Some(ref path) => BotConfig::load_from(path)?,
        None => BotConfig::load()?,
    };

    init_tracing(cli.tracing_config(config.debug))?;

    if let Some(Command::Config { ref action }) = cli.command {
        return match action {
            ConfigAction::Dump => pynik_bot::commands::config::dump(&config),
            ConfigAction::Path => pynik_bot::commands::config::path(&config),
        };
    }

    let target = cli.target.clone().unwrap_or_else(|| config.nick.clone());
    let mut session = Session::new(build_dispatcher(&config)?, cli.source.as_str(), target);

    if let Some(line) = cli.one_shot_line() {
        if let Some(reply) = session.handle(&line).await? {
            println!("{}", reply);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match session.handle(&line).await {
            Ok(Some(reply)) => println!("{}", reply),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, line = %line, "Line failed");
                eprintln!("error: {}", e);
            }
        }
    }
    Ok(())
}
