//! Configuration commands.

use crate::config::BotConfig;
use crate::error::BotResult;

/// Dump the current configuration to stdout.
pub fn dump(config: &BotConfig) -> BotResult<()> {
    let toml_str = config.to_toml()?;
    println!("# config.toml ({})", BotConfig::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Show the configuration file and data directory paths.
pub fn path(config: &BotConfig) -> BotResult<()> {
    println!("config: {}", BotConfig::default_path().display());
    println!("data: {}", config.storage.data_dir().display());
    Ok(())
}
