//! Commands that answer from the message alone.

use std::sync::LazyLock;

use rand::seq::IndexedRandom;
use regex::Regex;
use tracing::{debug, info};

use crate::command::{BoxFuture, Command, Message, Reply};
use crate::error::PluginResult;

/// `.echo <text>` repeats the text.
#[derive(Debug, Default)]
pub struct EchoCommand;

impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn triggers(&self) -> &[&'static str] {
        &["echo"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move { Ok(Some(Reply::say(message.argument.clone()))) })
    }
}

/// `.hello` greets the sender.
#[derive(Debug, Default)]
pub struct HelloCommand;

impl Command for HelloCommand {
    fn name(&self) -> &str {
        "hello"
    }

    fn triggers(&self) -> &[&'static str] {
        &["hello"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move {
            Ok(Some(Reply::say(format!(
                "Hello there, {}!",
                message.source
            ))))
        })
    }
}

pub const INSULTS: &[&str] = &[
    "just not cool",
    "a little nerdy",
    "a sponge",
    "very smelly",
    "purple",
    "a pig",
    "a tad strange",
    "not very good looking",
    "awfully dull",
    "a big troll",
    "a potato",
    "oddly shaped",
    "fairly muscular",
    "not at all handy",
    "a bloody pervert",
    "very ordinary",
    "not god",
];

static FIRST_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word regex should be valid"));

/// `.insult [nick]` insults the nick, or the sender.
#[derive(Debug, Default)]
pub struct InsultCommand;

impl InsultCommand {
    /// Picks who gets insulted: the first word of the argument, else the
    /// sender.
    pub fn target<'a>(message: &'a Message) -> &'a str {
        FIRST_WORD
            .find(&message.argument)
            .map_or(message.source.as_str(), |m| m.as_str())
    }
}

impl Command for InsultCommand {
    fn name(&self) -> &str {
        "insult"
    }

    fn triggers(&self) -> &[&'static str] {
        &["insult"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move {
            let insult = INSULTS.choose(&mut rand::rng()).copied().unwrap_or("odd");
            Ok(Some(Reply::say(format!(
                "{} is {}.",
                Self::target(message),
                insult
            ))))
        })
    }
}

/// `.raw <line>` writes a line to the connection, for admins only.
#[derive(Debug, Default)]
pub struct RawCommand {
    admins: Vec<String>,
}

impl RawCommand {
    pub fn new(admins: Vec<String>) -> Self {
        Self { admins }
    }
}

impl Command for RawCommand {
    fn name(&self) -> &str {
        "raw"
    }

    fn triggers(&self) -> &[&'static str] {
        &["raw"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move {
            if self.admins.iter().any(|admin| *admin == message.source) {
                info!(source = %message.source, "Raw line");
                Ok(Some(Reply::Raw(message.argument.clone())))
            } else {
                debug!(source = %message.source, "Ignoring raw line from non-admin");
                Ok(None)
            }
        })
    }
}

/// Channel that gets the enthusiastic answer.
const HOME_CHANNEL: &str = "#c++.se";

/// `.åäö` tells the sender which encoding their client uses.
///
/// Lines reach the bot as UTF-8, so only the UTF-8 answer exists.
#[derive(Debug, Default)]
pub struct EncodingCommand;

impl Command for EncodingCommand {
    fn name(&self) -> &str {
        "encoding"
    }

    fn triggers(&self) -> &[&'static str] {
        &["åäö"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move {
            let text = if message.target == HOME_CHANNEL {
                "Du använder nog utf-8. Bra shit, mannen!"
            } else {
                "Du använder nog utf-8."
            };
            Ok(Some(Reply::say(text)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(source: &str, target: &str, trigger: &str, argument: &str) -> Message {
        Message::new(source, target, trigger, argument)
    }

    #[tokio::test]
    async fn echo_repeats_argument() {
        let reply = EchoCommand
            .on_trigger(&msg("serp", "#c", "echo", "hello world"))
            .await
            .unwrap();
        assert_eq!(reply, Some(Reply::say("hello world")));
    }

    #[tokio::test]
    async fn hello_greets_sender() {
        let reply = HelloCommand
            .on_trigger(&msg("serp", "#c", "hello", ""))
            .await
            .unwrap();
        assert_eq!(reply, Some(Reply::say("Hello there, serp!")));
    }

    #[test]
    fn insult_target() {
        assert_eq!(InsultCommand::target(&msg("serp", "#c", "insult", "")), "serp");
        assert_eq!(
            InsultCommand::target(&msg("serp", "#c", "insult", "  @teetow, now")),
            "teetow"
        );
    }

    #[tokio::test]
    async fn insult_uses_known_insult() {
        let reply = InsultCommand
            .on_trigger(&msg("serp", "#c", "insult", "teetow"))
            .await
            .unwrap()
            .unwrap();
        let text = reply.text();
        assert!(text.starts_with("teetow is "));
        assert!(text.ends_with('.'));
        let insult = &text["teetow is ".len()..text.len() - 1];
        assert!(INSULTS.contains(&insult));
    }

    #[tokio::test]
    async fn raw_only_for_admins() {
        let mut raw = RawCommand::new(vec!["serp".into()]);
        let reply = raw
            .on_trigger(&msg("serp", "#c", "raw", "JOIN #rust"))
            .await
            .unwrap();
        assert_eq!(reply, Some(Reply::Raw("JOIN #rust".into())));

        let reply = raw
            .on_trigger(&msg("mallory", "#c", "raw", "QUIT"))
            .await
            .unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn encoding_answer_depends_on_channel() {
        let home = EncodingCommand
            .on_trigger(&msg("serp", HOME_CHANNEL, "åäö", ""))
            .await
            .unwrap()
            .unwrap();
        assert!(home.text().ends_with("Bra shit, mannen!"));

        let other = EncodingCommand
            .on_trigger(&msg("serp", "#rust", "åäö", ""))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(other.text(), "Du använder nog utf-8.");
    }
}
