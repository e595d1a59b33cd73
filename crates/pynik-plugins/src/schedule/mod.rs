//! Calendar schedule plugin.
//!
//! `.schema [id]` looks up the next events of a calendar feed;
//! `.addschemaid <name> <url or timeedit id>` adds a feed to the directory.

mod command;
mod directory;

pub use command::{ADD_TRIGGER, Clock, LOOKUP_TRIGGER, ScheduleCommand};
pub use directory::{
    AddOutcome, DIRECTORY_KEY, DirectoryEntry, PRESETS_KEY, Resolution, ScheduleDirectory,
    VENDOR_ID_PLACEHOLDER, parse_add_argument,
};
