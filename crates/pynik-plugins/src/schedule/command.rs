use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use pynik_core::{ScheduleFormatter, parse_feed};

use crate::command::{BoxFuture, Command, Message, Reply};
use crate::error::PluginResult;
use crate::fetch::Fetcher;
use crate::schedule::directory::{AddOutcome, Resolution, ScheduleDirectory};

pub const LOOKUP_TRIGGER: &str = "schema";
pub const ADD_TRIGGER: &str = "addschemaid";

const ADD_USAGE: &str = "Try .addschemaid <name> <url or timeedit id>";

/// Source of "now" for deciding which events are upcoming.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// `.schema` and `.addschemaid`.
pub struct ScheduleCommand {
    directory: ScheduleDirectory,
    fetcher: Arc<dyn Fetcher>,
    formatter: ScheduleFormatter,
    clock: Clock,
}

impl ScheduleCommand {
    pub fn new(
        directory: ScheduleDirectory,
        fetcher: Arc<dyn Fetcher>,
        formatter: ScheduleFormatter,
    ) -> Self {
        Self {
            directory,
            fetcher,
            formatter,
            clock: local_now,
        }
    }

    /// Builder method to replace the wall clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn directory(&self) -> &ScheduleDirectory {
        &self.directory
    }

    /// Resolves, fetches, parses and formats.
    ///
    /// An unknown identifier is answered without fetching anything. Fetch
    /// and feed errors are returned as they are.
    pub async fn lookup(&mut self, requester: &str, argument: &str) -> PluginResult<String> {
        let (identifier, url) = match self.directory.resolve(requester, argument)? {
            Resolution::Found { identifier, url } => (identifier, url),
            Resolution::Unknown { identifier } => {
                return Ok(format!(
                    "I don't have the ID '{}' in my directory. Feel free to add it by typing .addschemaid <name> <url or timeedit id>.",
                    identifier
                ));
            }
        };

        debug!(identifier = %identifier, url = %url, "Fetching schedule");
        let response = self.fetcher.read_url(&url).await?;
        let events = parse_feed(&response.data, (self.clock)())?;
        Ok(self.formatter.format(&identifier, &events))
    }

    /// Adds a directory entry from `<name> <url or timeedit id>`.
    pub fn add(&mut self, argument: &str) -> PluginResult<String> {
        Ok(match self.directory.add(argument)? {
            AddOutcome::Added { name, .. } => format!("Added {}.", name),
            AddOutcome::Usage => ADD_USAGE.to_string(),
        })
    }
}

impl Command for ScheduleCommand {
    fn name(&self) -> &str {
        "schedule"
    }

    fn triggers(&self) -> &[&'static str] {
        &[LOOKUP_TRIGGER, ADD_TRIGGER]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move {
            let text = if message.trigger == ADD_TRIGGER {
                self.add(&message.argument)?
            } else {
                self.lookup(&message.source, &message.argument).await?
            };
            Ok(Some(Reply::Say(text)))
        })
    }
}
