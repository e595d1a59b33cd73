//! iCalendar feed ingestion.
//!
//! A feed is read in two stages: [`tokenize`] turns the raw text into
//! [`FeedLine`]s and [`FeedParser`] folds them into upcoming [`Event`]s.
//! Only `VEVENT` blocks with `DTSTART`, `DTEND`, `SUMMARY` and `LOCATION`
//! are understood; everything else (`VALARM`, `VTIMEZONE`, `RRULE`, …) is
//! skipped.
//!
//! [`Event`]: crate::event::Event

mod line;
mod parser;

pub use line::{FeedLine, LINE_TERMINATOR, tokenize};
pub use parser::{FeedParser, parse_feed};
