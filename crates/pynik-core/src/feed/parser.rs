//! Event accumulator.
//!
//! [`FeedParser`] is a two-state machine fed with [`FeedLine`]s. It opens an
//! [`EventDraft`] on `BEGIN:VEVENT`, fills it from `DTSTART`, `DTEND`,
//! `SUMMARY` and `LOCATION`, and on `END:VEVENT` keeps the event only if it
//! ends after the parser's `now`.

use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::error::FeedResult;
use crate::event::{Event, EventDraft};
use crate::feed::line::{FeedLine, tokenize};
use crate::time::parse_feed_timestamp;

/// The only component type the parser tracks.
const VEVENT: &str = "VEVENT";

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Building(EventDraft),
}

/// Accumulates upcoming events from a calendar feed.
#[derive(Debug)]
pub struct FeedParser {
    now: NaiveDateTime,
    state: State,
    events: Vec<Event>,
}

impl FeedParser {
    /// Creates a parser that keeps events ending after `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            state: State::Idle,
            events: Vec::new(),
        }
    }

    /// Feeds a whole document through the parser.
    ///
    /// # Errors
    ///
    /// Stops at the first `DTSTART`/`DTEND` inside a `VEVENT` that is not a
    /// valid timestamp.
    pub fn process(&mut self, data: &str) -> FeedResult<()> {
        for line in tokenize(data) {
            self.feed(&line)?;
        }
        Ok(())
    }

    /// Applies a single property line.
    pub fn feed(&mut self, line: &FeedLine<'_>) -> FeedResult<()> {
        trace!(tag = line.tag, value = %line.value, "feed line");
        match line.tag {
            "BEGIN" => {
                if line.value == VEVENT {
                    if matches!(self.state, State::Building(_)) {
                        debug!("nested BEGIN:VEVENT, dropping the open event");
                    }
                    self.state = State::Building(EventDraft::new());
                }
            }
            "END" => {
                if line.value == VEVENT {
                    self.close();
                }
            }
            tag => {
                if let State::Building(draft) = &mut self.state {
                    match tag {
                        "DTSTART" => draft.start = Some(parse_feed_timestamp(tag, &line.value)?),
                        "DTEND" => draft.end = Some(parse_feed_timestamp(tag, &line.value)?),
                        "SUMMARY" => draft.set_summary(&line.value),
                        "LOCATION" => draft.location = Some(line.value.clone()),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        let State::Building(draft) = std::mem::take(&mut self.state) else {
            return;
        };
        match draft.finish() {
            Some(event) if event.is_upcoming(self.now) => self.events.push(event),
            Some(event) => trace!(end = %event.end, "dropping past event"),
            None => debug!("dropping VEVENT without DTSTART/DTEND"),
        }
    }

    /// Returns the events accepted so far, in feed order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the parser, returning the accepted events.
    ///
    /// An event still open at this point is discarded.
    pub fn into_events(self) -> Vec<Event> {
        if let State::Building(_) = self.state {
            debug!("feed ended inside a VEVENT, dropping it");
        }
        self.events
    }
}

/// Parses a feed and returns its upcoming events in feed order.
///
/// # Errors
///
/// See [`FeedParser::process`].
pub fn parse_feed(data: &str, now: NaiveDateTime) -> FeedResult<Vec<Event>> {
    let mut parser = FeedParser::new(now);
    parser.process(data)?;
    let events = parser.into_events();
    debug!(count = events.len(), "parsed feed");
    Ok(events)
}
