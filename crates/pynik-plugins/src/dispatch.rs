//! Trigger dispatch.
//!
//! The dispatcher splits a chat line into prefix, trigger and argument,
//! routes it to the command owning the trigger and answers the built-in
//! `commands` listing itself. Commands run one at a time: a line is fully
//! handled before the next one is looked at.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::command::{Command, Message, Reply};
use crate::error::PluginResult;

/// Trigger answered by the dispatcher with the list of all triggers.
pub const COMMANDS_TRIGGER: &str = "commands";

/// Default command prefix.
pub const DEFAULT_PREFIX: &str = ".";

/// Routes chat lines to commands.
pub struct Dispatcher {
    prefix: String,
    commands: Vec<Box<dyn Command>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.commands.iter().map(|command| command.name()).collect();
        f.debug_struct("Dispatcher")
            .field("prefix", &self.prefix)
            .field("commands", &names)
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Dispatcher {
    /// Creates an empty dispatcher for the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: Vec::new(),
        }
    }

    /// Returns the command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registers a command.
    ///
    /// When two commands share a trigger, the one registered first wins.
    pub fn register(&mut self, command: impl Command + 'static) {
        debug!(command = command.name(), triggers = ?command.triggers(), "registering command");
        self.commands.push(Box::new(command));
    }

    /// Builder method to register a command.
    pub fn with_command(mut self, command: impl Command + 'static) -> Self {
        self.register(command);
        self
    }

    /// Returns every trigger, sorted and deduplicated.
    pub fn triggers(&self) -> Vec<&str> {
        let mut triggers: BTreeSet<&str> = self
            .commands
            .iter()
            .flat_map(|command| command.triggers().iter().copied())
            .collect();
        triggers.insert(COMMANDS_TRIGGER);
        triggers.into_iter().collect()
    }

    /// Parses `<prefix><trigger>[ <argument>]`.
    ///
    /// Returns `None` for lines without the prefix or without a trigger.
    pub fn parse(&self, source: &str, target: &str, line: &str) -> Option<Message> {
        let rest = line.trim_start().strip_prefix(self.prefix.as_str())?;
        let (trigger, argument) = match rest.split_once(char::is_whitespace) {
            Some((trigger, argument)) => (trigger, argument.trim()),
            None => (rest.trim_end(), ""),
        };
        if trigger.is_empty() {
            return None;
        }
        Some(Message::new(source, target, trigger, argument))
    }

    /// Parses and dispatches a chat line.
    pub async fn handle_line(
        &mut self,
        source: &str,
        target: &str,
        line: &str,
    ) -> PluginResult<Option<Reply>> {
        match self.parse(source, target, line) {
            Some(message) => self.dispatch(&message).await,
            None => Ok(None),
        }
    }

    /// Routes a message to the command owning its trigger.
    ///
    /// Unknown triggers get no reply. Errors from the command are returned
    /// untouched apart from being tagged with the command name.
    pub async fn dispatch(&mut self, message: &Message) -> PluginResult<Option<Reply>> {
        if message.trigger == COMMANDS_TRIGGER {
            return Ok(Some(Reply::say(format!(
                "Commands: {}",
                self.triggers().join(", ")
            ))));
        }

        let Some(command) = self
            .commands
            .iter_mut()
            .find(|command| command.triggers().iter().any(|t| *t == message.trigger))
        else {
            debug!(trigger = %message.trigger, "no command for trigger");
            return Ok(None);
        };

        info!(
            command = command.name(),
            source = %message.source,
            target = %message.target,
            trigger = %message.trigger,
            "dispatching"
        );
        let name = command.name().to_string();
        command.on_trigger(message).await.map_err(|err| {
            warn!(command = %name, error = %err, "command failed");
            if err.command().is_some() {
                err
            } else {
                err.with_command(name)
            }
        })
    }
}
