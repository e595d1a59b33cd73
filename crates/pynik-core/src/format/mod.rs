//! Schedule reply formatting.
//!
//! A schedule reply lists the next few events of a feed on one line:
//!
//! ```text
//! linkoping: Tue 20 Oct 10:00-11:00 A1: Math | 13:00-14:00 B2: Lab | Wed 21 Oct 08:15-10:00 C3: Exam
//! ```
//!
//! The first event of each day carries its date ([`EventStyle::Long`]); the
//! following events of the same day only carry their times
//! ([`EventStyle::Short`]).
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pynik_core::{Event, ScheduleFormatter};
//!
//! let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
//! let events = vec![
//!     Event::new(day.and_hms_opt(10, 0, 0).unwrap(), day.and_hms_opt(11, 0, 0).unwrap())
//!         .with_summary("Math")
//!         .with_location("A1"),
//! ];
//!
//! let reply = ScheduleFormatter::default().format("linkoping", &events);
//! assert_eq!(reply, "linkoping: Tue 20 Oct 10:00-11:00 A1: Math");
//! ```

use crate::event::{Event, EventStyle};
use crate::time::same_day;

/// Default number of events in a schedule reply.
pub const DEFAULT_EVENT_LIMIT: usize = 5;

/// Separator between events in a schedule reply.
pub const EVENT_SEPARATOR: &str = " | ";

/// An event paired with the style it is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedEvent<'a> {
    pub event: &'a Event,
    pub style: EventStyle,
}

impl SelectedEvent<'_> {
    /// Renders the event in its selected style.
    pub fn render(&self) -> String {
        self.event.describe(self.style)
    }
}

/// Picks the first `limit` events and decides how much date context each
/// one needs.
///
/// An event gets [`EventStyle::Short`] when it starts on the same day as the
/// event right before it, [`EventStyle::Long`] otherwise.
pub fn select_events(events: &[Event], limit: usize) -> Vec<SelectedEvent<'_>> {
    let mut previous: Option<&Event> = None;
    events
        .iter()
        .take(limit)
        .map(|event| {
            let style = match previous {
                Some(prev) if same_day(&prev.start, &event.start) => EventStyle::Short,
                _ => EventStyle::Long,
            };
            previous = Some(event);
            SelectedEvent { event, style }
        })
        .collect()
}

/// Formats schedule replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleFormatter {
    /// Maximum number of events in a reply.
    pub limit: usize,
}

impl Default for ScheduleFormatter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_EVENT_LIMIT,
        }
    }
}

impl ScheduleFormatter {
    /// Creates a formatter showing at most `limit` events.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Renders the selected events without the identifier prefix.
    pub fn render_events(&self, events: &[Event]) -> Vec<String> {
        select_events(events, self.limit)
            .iter()
            .map(SelectedEvent::render)
            .collect()
    }

    /// Builds `"<identifier>: <event> | <event> | …"`.
    pub fn format(&self, identifier: &str, events: &[Event]) -> String {
        format!(
            "{}: {}",
            identifier,
            self.render_events(events).join(EVENT_SEPARATOR)
        )
    }
}
