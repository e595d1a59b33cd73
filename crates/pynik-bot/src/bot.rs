//! Command wiring and the console session.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use pynik_core::ScheduleFormatter;
use pynik_plugins::standard::{
    CollectCommand, EchoCommand, EncodingCommand, GoogleCommand, HelloCommand, InsultCommand,
    RawCommand, TempCommand, WikipediaCommand,
};
use pynik_plugins::{
    CachingFetcher, DataStore, Dispatcher, FeedCache, Fetcher, HttpFetcher, JsonFileStore, Reply,
    ScheduleCommand, ScheduleDirectory, SharedCache,
};

use crate::config::BotConfig;
use crate::error::BotResult;

/// Builds a dispatcher with every command registered.
///
/// Schedule feeds go through the shared feed cache; the other lookups hit
/// the network every time.
pub fn build_dispatcher(config: &BotConfig) -> BotResult<Dispatcher> {
    let data_dir = config.storage.data_dir();
    let store: Arc<dyn DataStore> = Arc::new(JsonFileStore::new(&data_dir));
    let http: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.http)?);
    let cache: SharedCache = Arc::new(Mutex::new(FeedCache::new(config.cache.ttl())));
    let feeds: Arc<dyn Fetcher> = Arc::new(CachingFetcher::new(Arc::clone(&http), Arc::clone(&cache)));

    let directory = ScheduleDirectory::load(store, config.schedule.vendor_url_template.as_str())?;
    info!(
        data_dir = %data_dir.display(),
        entries = directory.len(),
        "Schedule directory ready"
    );

    Ok(Dispatcher::new(config.prefix.as_str())
        .with_command(ScheduleCommand::new(
            directory,
            feeds,
            ScheduleFormatter::new(config.schedule.limit),
        ))
        .with_command(EchoCommand)
        .with_command(HelloCommand)
        .with_command(InsultCommand)
        .with_command(RawCommand::new(config.raw.admins.clone()))
        .with_command(EncodingCommand)
        .with_command(TempCommand::new(
            Arc::clone(&http),
            config.temperature.default_location.as_str(),
        ))
        .with_command(GoogleCommand::new(Arc::clone(&http)))
        .with_command(WikipediaCommand::new(http))
        .with_command(CollectCommand::new(cache)))
}

/// Renders a reply as a console line.
pub fn render_reply(reply: &Reply) -> String {
    match reply {
        Reply::Say(text) => text.clone(),
        Reply::Raw(line) => format!("RAW {}", line),
    }
}

/// Lines typed at the console, all from one nick to one target.
pub struct Session {
    dispatcher: Dispatcher,
    source: String,
    target: String,
}

impl Session {
    pub fn new(
        dispatcher: Dispatcher,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            source: source.into(),
            target: target.into(),
        }
    }

    /// Handles one line and returns the rendered reply, if any.
    pub async fn handle(&mut self, line: &str) -> BotResult<Option<String>> {
        debug!(source = %self.source, target = %self.target, line = %line, "Handling line");
        let reply = self
            .dispatcher
            .handle_line(&self.source, &self.target, line)
            .await?;
        Ok(reply.as_ref().map(render_reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::error::BotError;

    fn config_in(dir: &Path) -> BotConfig {
        let mut config = BotConfig::default();
        config.storage.data_dir = Some(dir.to_path_buf());
        config
    }

    #[tokio::test]
    async fn commands_lists_every_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = build_dispatcher(&config_in(dir.path())).unwrap();
        let mut session = Session::new(dispatcher, "serp", "#c++.se");

        let reply = session.handle(".commands").await.unwrap();
        assert_eq!(
            reply.as_deref(),
            Some(
                "Commands: addschemaid, collect, commands, echo, google, hello, insult, raw, schema, temp, wp, åäö"
            )
        );
    }

    #[tokio::test]
    async fn add_schema_id_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut session = Session::new(build_dispatcher(&config).unwrap(), "serp", "#c");

        let reply = session.handle(".addschemaid Y1A 12345").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Added y1a."));
        assert!(dir.path().join("schema_id.json").exists());

        let reloaded = ScheduleDirectory::load(
            Arc::new(JsonFileStore::new(dir.path())),
            config.schedule.vendor_url_template.as_str(),
        )
        .unwrap();
        assert!(reloaded.get("y1a").is_some());
    }

    #[tokio::test]
    async fn raw_reply_is_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(build_dispatcher(&config_in(dir.path())).unwrap(), "serp", "#c");
        assert_eq!(
            session.handle(".raw PRIVMSG #c :hi").await.unwrap().as_deref(),
            Some("RAW PRIVMSG #c :hi")
        );
    }

    #[tokio::test]
    async fn custom_prefix_and_plain_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.prefix = "!".to_string();
        let mut session = Session::new(build_dispatcher(&config).unwrap(), "serp", "#c");

        assert_eq!(session.handle("!echo hi").await.unwrap().as_deref(), Some("hi"));
        assert_eq!(session.handle(".echo hi").await.unwrap(), None);
        assert_eq!(session.handle("just talking").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_store_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema_id.json"), "{broken").unwrap();
        let err = build_dispatcher(&config_in(dir.path())).unwrap_err();
        assert!(matches!(err, BotError::Plugin(_)));
    }
}
