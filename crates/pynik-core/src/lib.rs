//! Core types: calendar feed parsing, events, schedule formatting, tracing

pub mod error;
pub mod event;
pub mod feed;
pub mod format;
pub mod time;
pub mod tracing;

pub use error::{FeedError, FeedResult};
pub use event::{Event, EventDraft, EventStyle, truncate_summary};
pub use feed::{FeedLine, FeedParser, parse_feed, tokenize};
pub use format::{DEFAULT_EVENT_LIMIT, ScheduleFormatter, SelectedEvent, select_events};
pub use time::{FEED_TIMESTAMP_FORMAT, parse_feed_timestamp, same_day};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, default_directive, init_tracing};
