//! Calendar event model.
//!
//! - [`Event`]: a complete, upcoming event taken from a feed
//! - [`EventDraft`]: the event under construction while its `VEVENT` block is
//!   being read
//! - [`EventStyle`]: the two renderings used in schedule replies

use std::fmt;

use chrono::NaiveDateTime;

/// Separator between the segments of a `SUMMARY` value.
pub const SUMMARY_SEPARATOR: &str = ", ";

/// Number of `SUMMARY` segments kept on an event.
pub const SUMMARY_SEGMENTS: usize = 2;

/// How much date context an event description carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStyle {
    /// `HH:MM-HH:MM LOCATION: SUMMARY`
    Short,
    /// `Dow DD Mon HH:MM-HH:MM LOCATION: SUMMARY`
    Long,
}

impl EventStyle {
    fn start_format(self) -> &'static str {
        match self {
            Self::Short => "%H:%M",
            Self::Long => "%a %d %b %H:%M",
        }
    }
}

/// A calendar event with naive local start and end times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Start time (naive, local).
    pub start: NaiveDateTime,
    /// End time (naive, local).
    pub end: NaiveDateTime,
    /// Short label, at most two comma-separated segments.
    pub summary: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
}

impl Event {
    /// Creates an event with the given time span and no text fields.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            summary: None,
            location: None,
        }
    }

    /// Builder method to set the summary.
    ///
    /// The value is truncated the same way a feed `SUMMARY` is.
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(truncate_summary(summary));
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns `true` if the event ends strictly after `now`.
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.end > now
    }

    /// Renders the event in the given style.
    pub fn describe(&self, style: EventStyle) -> String {
        format!(
            "{}-{} {}: {}",
            self.start.format(style.start_format()),
            self.end.format("%H:%M"),
            self.location.as_deref().unwrap_or_default(),
            self.summary.as_deref().unwrap_or_default(),
        )
    }

    /// `HH:MM-HH:MM LOCATION: SUMMARY`
    pub fn short_description(&self) -> String {
        self.describe(EventStyle::Short)
    }

    /// `Dow DD Mon HH:MM-HH:MM LOCATION: SUMMARY`
    pub fn long_description(&self) -> String {
        self.describe(EventStyle::Long)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.long_description())
    }
}

/// An event whose `VEVENT` block has been opened but not yet closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub summary: Option<String>,
    pub location: Option<String>,
}

impl EventDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the summary, keeping at most the first two segments.
    pub fn set_summary(&mut self, value: &str) {
        self.summary = Some(truncate_summary(value));
    }

    /// Completes the draft.
    ///
    /// Returns `None` when either timestamp is missing.
    pub fn finish(self) -> Option<Event> {
        Some(Event {
            start: self.start?,
            end: self.end?,
            summary: self.summary,
            location: self.location,
        })
    }
}

/// Keeps the first two `", "`-separated segments of a summary.
pub fn truncate_summary(value: &str) -> String {
    value
        .split(SUMMARY_SEPARATOR)
        .take(SUMMARY_SEGMENTS)
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR)
}
