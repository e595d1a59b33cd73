//! Plugin settings.
//!
//! Each section maps to a table of the bot's `config.toml`; every field has
//! a default so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use pynik_core::DEFAULT_EVENT_LIMIT;

/// Feed URL of a TimeEdit reservation list; `{id}` is replaced by the ID.
pub const DEFAULT_VENDOR_URL_TEMPLATE: &str =
    "http://timeedit.liu.se/4DACTION/iCal_downloadReservations/timeedit.ics?branch=5&id1={id}&lang=1";

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "PynikOpenAnything/1.0 +".to_string(),
        }
    }
}

impl HttpSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Schedule command settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Maximum number of events in a reply.
    pub limit: usize,
    /// URL template for numeric directory entries.
    pub vendor_url_template: String,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_EVENT_LIMIT,
            vendor_url_template: DEFAULT_VENDOR_URL_TEMPLATE.to_string(),
        }
    }
}

/// Temperature command settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureSettings {
    /// Station used when the command has no argument.
    pub default_location: String,
}

impl Default for TemperatureSettings {
    fn default() -> Self {
        Self {
            default_location: "ryd".to_string(),
        }
    }
}

/// Raw passthrough settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Nicks allowed to send raw lines.
    pub admins: Vec<String>,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            admins: vec!["serp".to_string(), "teetow".to_string()],
        }
    }
}

/// Fetch cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds a fetched body stays fresh; 0 disables caching.
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

impl CacheSettings {
    /// Returns the cache TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(HttpSettings::default().timeout(), Duration::from_secs(10));
        assert_eq!(ScheduleSettings::default().limit, 5);
        assert!(
            ScheduleSettings::default()
                .vendor_url_template
                .contains("id1={id}")
        );
        assert_eq!(TemperatureSettings::default().default_location, "ryd");
        assert_eq!(CacheSettings::default().ttl(), Duration::from_secs(300));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let settings: ScheduleSettings = serde_json::from_str(r#"{"limit": 3}"#).unwrap();
        assert_eq!(settings.limit, 3);
        assert_eq!(settings.vendor_url_template, DEFAULT_VENDOR_URL_TEMPLATE);
    }
}
