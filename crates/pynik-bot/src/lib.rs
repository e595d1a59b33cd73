//! Console front end, configuration and command wiring
//!
//! This crate provides the `pynik` command-line interface.

pub mod bot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use bot::{Session, build_dispatcher, render_reply};
pub use cli::Cli;
pub use config::BotConfig;
pub use error::{BotError, BotResult};
