//! The command plugin trait.
//!
//! A [`Command`] owns one or more triggers. The [`Dispatcher`] turns a chat
//! line such as `.schema y1a` into a [`Message`] and hands it to the command
//! owning the trigger, which answers with an optional [`Reply`].
//!
//! [`Dispatcher`]: crate::dispatch::Dispatcher

use std::future::Future;
use std::pin::Pin;

use crate::error::PluginResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep [`Command`] object-safe, so the dispatcher can hold a
/// heterogeneous list of commands.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A triggered chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Nick of the sender.
    pub source: String,
    /// Channel (or nick, for private messages) the line was sent to.
    pub target: String,
    /// The command word, without prefix.
    pub trigger: String,
    /// Everything after the trigger, trimmed. May be empty.
    pub argument: String,
}

impl Message {
    /// Creates a message.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        trigger: impl Into<String>,
        argument: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            trigger: trigger.into(),
            argument: argument.into(),
        }
    }
}

/// What a command sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text said to the message target.
    Say(String),
    /// A line written to the chat connection as-is.
    Raw(String),
}

impl Reply {
    /// Creates a [`Reply::Say`].
    pub fn say(text: impl Into<String>) -> Self {
        Self::Say(text.into())
    }

    /// Returns the text of the reply.
    pub fn text(&self) -> &str {
        match self {
            Self::Say(text) | Self::Raw(text) => text,
        }
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Self::Say(text)
    }
}

/// A chat command plugin.
///
/// # Example Implementation
///
/// ```ignore
/// struct EchoCommand;
///
/// impl Command for EchoCommand {
///     fn name(&self) -> &str { "echo" }
///
///     fn triggers(&self) -> &[&'static str] { &["echo"] }
///
///     fn on_trigger<'a>(&'a mut self, message: &'a Message)
///         -> BoxFuture<'a, PluginResult<Option<Reply>>>
///     {
///         Box::pin(async move { Ok(Some(Reply::say(message.argument.clone()))) })
///     }
/// }
/// ```
pub trait Command: Send {
    /// Returns the plugin name used in logs and errors.
    fn name(&self) -> &str;

    /// Returns the trigger words this command answers to.
    fn triggers(&self) -> &[&'static str];

    /// Runs the command for a message carrying one of its triggers.
    ///
    /// `Ok(None)` means the command deliberately stays silent.
    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_text() {
        assert_eq!(Reply::say("hi").text(), "hi");
        assert_eq!(Reply::Raw("PRIVMSG #a :x".into()).text(), "PRIVMSG #a :x");
        assert_eq!(Reply::from("x".to_string()), Reply::Say("x".into()));
    }
}
