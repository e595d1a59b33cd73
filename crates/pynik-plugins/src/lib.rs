//! Chat command plugins and their collaborators.
//!
//! - [`Command`] - The trait every plugin implements
//! - [`Dispatcher`] - Routes prefixed chat lines to the owning command
//! - [`ScheduleCommand`] - Calendar feed lookups with a persistent directory
//! - [`Fetcher`] / [`DataStore`] - HTTP and storage seams, swappable in tests
//! - [`PluginError`] - Error types for plugin operations
//!
//! # Flow
//!
//! ```text
//!   ".schema y1a"
//!        │
//!        ▼ Dispatcher::parse
//!   ┌──────────┐      ┌─────────────────┐      ┌───────────┐
//!   │ Message  │ ───▶ │ ScheduleCommand │ ───▶ │  Fetcher  │
//!   └──────────┘      └────────┬────────┘      └───────────┘
//!                              │ parse_feed + ScheduleFormatter
//!                              ▼
//!                        Reply::Say(..)
//! ```

pub mod cache;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod schedule;
pub mod settings;
pub mod standard;
pub mod store;

// Re-export main types at crate root
pub use cache::{CachingFetcher, FeedCache, SharedCache};
pub use command::{BoxFuture, Command, Message, Reply};
pub use dispatch::{COMMANDS_TRIGGER, DEFAULT_PREFIX, Dispatcher};
pub use error::{PluginError, PluginErrorCode, PluginResult};
pub use fetch::{FetchResponse, Fetcher, HttpFetcher};
pub use schedule::{ScheduleCommand, ScheduleDirectory};
pub use settings::{
    CacheSettings, DEFAULT_VENDOR_URL_TEMPLATE, HttpSettings, RawSettings, ScheduleSettings,
    TemperatureSettings,
};
pub use store::{DataStore, JsonFileStore, MemoryStore};
