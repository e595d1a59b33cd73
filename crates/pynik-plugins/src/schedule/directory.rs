//! Schedule directory and per-user presets.
//!
//! The directory maps identifiers (`y1a`, `linkoping`, …) to calendar feeds.
//! The presets remember, per requester, the identifier they last asked for
//! explicitly, so a bare `.schema` repeats it. Both maps are loaded once and
//! written back in full after every change.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PluginResult;
use crate::store::{DataStore, load_map, save_map};

/// Storage key of the directory.
pub const DIRECTORY_KEY: &str = "schema_id";

/// Storage key of the presets.
pub const PRESETS_KEY: &str = "schema_fav";

/// Placeholder for the numeric ID in the vendor URL template.
pub const VENDOR_ID_PLACEHOLDER: &str = "{id}";

static ADD_VENDOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+(\d+)").expect("vendor id regex should be valid"));

static ADD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+((?:https?://|www\.)\S+)").expect("url regex should be valid")
});

/// Where a directory identifier points.
///
/// Serialized untagged, so a stored directory is a plain JSON object of
/// numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectoryEntry {
    /// A numeric ID expanded into the vendor URL template.
    VendorId(u32),
    /// A literal feed URL.
    Url(String),
}

impl DirectoryEntry {
    /// Returns the feed URL for this entry.
    pub fn feed_url(&self, vendor_url_template: &str) -> String {
        match self {
            Self::VendorId(id) => {
                vendor_url_template.replace(VENDOR_ID_PLACEHOLDER, &id.to_string())
            }
            Self::Url(url) => url.clone(),
        }
    }
}

/// Result of resolving a requester and argument to a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier is in the directory.
    Found { identifier: String, url: String },
    /// The identifier is not in the directory.
    Unknown { identifier: String },
}

/// Result of parsing an `addschemaid` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The entry was stored under this (lowercased) name.
    Added { name: String, entry: DirectoryEntry },
    /// The argument matched neither `<name> <id>` nor `<name> <url>`.
    Usage,
}

/// The schedule directory and presets, backed by a [`DataStore`].
pub struct ScheduleDirectory {
    entries: BTreeMap<String, DirectoryEntry>,
    presets: BTreeMap<String, String>,
    store: Arc<dyn DataStore>,
    vendor_url_template: String,
}

impl std::fmt::Debug for ScheduleDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleDirectory")
            .field("entries", &self.entries)
            .field("presets", &self.presets)
            .field("vendor_url_template", &self.vendor_url_template)
            .finish_non_exhaustive()
    }
}

impl ScheduleDirectory {
    /// Loads both maps from `store`. Missing maps start empty.
    pub fn load(
        store: Arc<dyn DataStore>,
        vendor_url_template: impl Into<String>,
    ) -> PluginResult<Self> {
        let entries = load_map(store.as_ref(), DIRECTORY_KEY)?;
        let presets = load_map(store.as_ref(), PRESETS_KEY)?;
        debug!(
            entries = entries.len(),
            presets = presets.len(),
            "Loaded schedule directory"
        );
        Ok(Self {
            entries,
            presets,
            store,
            vendor_url_template: vendor_url_template.into(),
        })
    }

    /// Writes both maps to the store.
    pub fn save(&self) -> PluginResult<()> {
        save_map(self.store.as_ref(), DIRECTORY_KEY, &self.entries)?;
        save_map(self.store.as_ref(), PRESETS_KEY, &self.presets)
    }

    /// Returns the entry for an identifier (case-insensitive).
    pub fn get(&self, identifier: &str) -> Option<&DirectoryEntry> {
        self.entries.get(&identifier.to_lowercase())
    }

    /// Returns the preset of a requester (case-insensitive).
    pub fn preset(&self, requester: &str) -> Option<&str> {
        self.presets
            .get(&requester.to_lowercase())
            .map(String::as_str)
    }

    /// Returns the number of directory entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the directory has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Picks the identifier for a lookup and maps it to a feed URL.
    ///
    /// An empty `argument` falls back to the requester's preset, then to the
    /// requester's own name. A non-empty one becomes the requester's new
    /// preset and is persisted right away, whether or not it is in the
    /// directory.
    pub fn resolve(&mut self, requester: &str, argument: &str) -> PluginResult<Resolution> {
        let requester = requester.to_lowercase();
        let argument = argument.trim();

        let identifier = if argument.is_empty() {
            self.presets
                .get(&requester)
                .cloned()
                .unwrap_or_else(|| requester.clone())
        } else {
            let identifier = argument.to_lowercase();
            self.presets.insert(requester.clone(), identifier.clone());
            self.save()?;
            debug!(requester = %requester, identifier = %identifier, "Updated preset");
            identifier
        };

        Ok(match self.entries.get(&identifier) {
            Some(entry) => Resolution::Found {
                url: entry.feed_url(&self.vendor_url_template),
                identifier,
            },
            None => Resolution::Unknown { identifier },
        })
    }

    /// Parses `<name> <id>` or `<name> <url>` and stores the entry.
    pub fn add(&mut self, argument: &str) -> PluginResult<AddOutcome> {
        let Some((name, entry)) = parse_add_argument(argument) else {
            return Ok(AddOutcome::Usage);
        };
        self.entries.insert(name.clone(), entry.clone());
        self.save()?;
        info!(name = %name, entry = ?entry, "Added directory entry");
        Ok(AddOutcome::Added { name, entry })
    }
}

/// Splits an `addschemaid` argument into a lowercased name and an entry.
///
/// A numeric second word wins over a URL; a number too large for an ID
/// falls through to the URL form.
pub fn parse_add_argument(argument: &str) -> Option<(String, DirectoryEntry)> {
    if let Some(caps) = ADD_VENDOR_ID.captures(argument)
        && let Ok(id) = caps[2].parse::<u32>()
    {
        return Some((caps[1].to_lowercase(), DirectoryEntry::VendorId(id)));
    }
    ADD_URL.captures(argument).map(|caps| {
        (
            caps[1].to_lowercase(),
            DirectoryEntry::Url(caps[2].to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_VENDOR_URL_TEMPLATE;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn directory_with(store: Arc<MemoryStore>) -> ScheduleDirectory {
        ScheduleDirectory::load(store, DEFAULT_VENDOR_URL_TEMPLATE).unwrap()
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .save(
                DIRECTORY_KEY,
                &json!({"linkoping": 42, "lab": "https://example.com/lab.ics"}),
            )
            .unwrap();
        store
            .save(PRESETS_KEY, &json!({"serp": "linkoping"}))
            .unwrap();
        store
    }

    #[test]
    fn loads_legacy_shapes() {
        let dir = directory_with(seeded_store());
        assert_eq!(dir.get("LINKOPING"), Some(&DirectoryEntry::VendorId(42)));
        assert_eq!(
            dir.get("lab"),
            Some(&DirectoryEntry::Url("https://example.com/lab.ics".into()))
        );
        assert_eq!(dir.preset("Serp"), Some("linkoping"));
    }

    #[test]
    fn vendor_id_expands_into_template() {
        let url = DirectoryEntry::VendorId(42).feed_url(DEFAULT_VENDOR_URL_TEMPLATE);
        assert_eq!(
            url,
            "http://timeedit.liu.se/4DACTION/iCal_downloadReservations/timeedit.ics?branch=5&id1=42&lang=1"
        );
    }

    #[test]
    fn empty_argument_uses_preset() {
        let mut dir = directory_with(seeded_store());
        let resolution = dir.resolve("Serp", "").unwrap();
        match resolution {
            Resolution::Found { identifier, url } => {
                assert_eq!(identifier, "linkoping");
                assert!(url.contains("id1=42"));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn empty_argument_without_preset_uses_requester() {
        let store = seeded_store();
        store.save(DIRECTORY_KEY, &json!({"teetow": 7})).unwrap();
        let mut dir = directory_with(store);
        let resolution = dir.resolve("TeeTow", "  ").unwrap();
        assert!(matches!(
            resolution,
            Resolution::Found { ref identifier, .. } if identifier == "teetow"
        ));
    }

    #[test]
    fn explicit_argument_becomes_preset_and_is_saved() {
        let store = seeded_store();
        let mut dir = directory_with(store.clone());
        let resolution = dir.resolve("serp", "LAB").unwrap();
        assert_eq!(
            resolution,
            Resolution::Found {
                identifier: "lab".into(),
                url: "https://example.com/lab.ics".into()
            }
        );
        assert_eq!(dir.preset("serp"), Some("lab"));
        assert_eq!(store.load(PRESETS_KEY).unwrap().unwrap()["serp"], "lab");
    }

    #[test]
    fn unknown_identifier_is_reported_and_still_preset() {
        let mut dir = directory_with(Arc::new(MemoryStore::new()));
        let resolution = dir.resolve("serp", "nope").unwrap();
        assert_eq!(
            resolution,
            Resolution::Unknown {
                identifier: "nope".into()
            }
        );
        assert_eq!(dir.preset("serp"), Some("nope"));
    }

    #[test]
    fn parse_add_numeric() {
        assert_eq!(
            parse_add_argument("Y1A 12345"),
            Some(("y1a".into(), DirectoryEntry::VendorId(12345)))
        );
    }

    #[test]
    fn parse_add_url_stores_the_url() {
        assert_eq!(
            parse_add_argument("Lab https://example.com/lab.ics"),
            Some((
                "lab".into(),
                DirectoryEntry::Url("https://example.com/lab.ics".into())
            ))
        );
        assert_eq!(
            parse_add_argument("lab www.example.com/lab.ics"),
            Some((
                "lab".into(),
                DirectoryEntry::Url("www.example.com/lab.ics".into())
            ))
        );
    }

    #[test]
    fn parse_add_rejects_other_shapes() {
        assert_eq!(parse_add_argument(""), None);
        assert_eq!(parse_add_argument("lonely"), None);
        assert_eq!(parse_add_argument("lab ftp://example.com"), None);
        assert_eq!(parse_add_argument("lab wwwexample.com"), None);
    }

    #[test]
    fn parse_add_vendor_id_must_fit_u32() {
        assert_eq!(
            parse_add_argument("max 4294967295"),
            Some(("max".into(), DirectoryEntry::VendorId(u32::MAX)))
        );
        assert_eq!(parse_add_argument("big 4294967296"), None);
        assert_eq!(parse_add_argument("big 5000000000"), None);
    }

    #[test]
    fn add_persists_both_maps() {
        let store = Arc::new(MemoryStore::new());
        let mut dir = directory_with(store.clone());
        let outcome = dir.add("Y1A 77").unwrap();
        assert_eq!(
            outcome,
            AddOutcome::Added {
                name: "y1a".into(),
                entry: DirectoryEntry::VendorId(77)
            }
        );
        assert_eq!(store.load(DIRECTORY_KEY).unwrap().unwrap()["y1a"], 77);
        assert!(store.load(PRESETS_KEY).unwrap().is_some());

        let reloaded = directory_with(store);
        assert_eq!(reloaded.get("y1a"), Some(&DirectoryEntry::VendorId(77)));
    }

    #[test]
    fn add_usage_changes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut dir = directory_with(store.clone());
        assert_eq!(dir.add("nonsense").unwrap(), AddOutcome::Usage);
        assert!(dir.is_empty());
        assert!(store.load(DIRECTORY_KEY).unwrap().is_none());
    }
}
