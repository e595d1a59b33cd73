//! HTTP fetch collaborator.
//!
//! Commands never talk to reqwest directly; they go through a [`Fetcher`]
//! so tests can substitute canned responses. Errors are reported once, by
//! the fetcher, and then passed up unchanged: nothing here retries.

use std::sync::LazyLock;

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::{Captures, Regex};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, trace, warn};
use url::Url;

use crate::command::BoxFuture;
use crate::error::{PluginError, PluginResult};
use crate::settings::HttpSettings;

/// A fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// The URL that was requested.
    pub url: String,
    /// The response body.
    pub data: String,
}

impl FetchResponse {
    /// Creates a response.
    pub fn new(url: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            data: data.into(),
        }
    }
}

/// Reads documents from URLs.
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns its body.
    fn read_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, PluginResult<FetchResponse>>;
}

/// [`Fetcher`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the configured timeout and user agent.
    pub fn new(settings: &HttpSettings) -> PluginResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(&settings.user_agent)
            .build()
            .map_err(|e| {
                PluginError::configuration(format!("Failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> PluginResult<FetchResponse> {
        let parsed = normalize_url(url)?;
        trace!(url = %parsed, "Sending request");
        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| PluginError::network(format!("Request failed: {}", e)).with_source(e))?;
        let data = handle_response(response).await?;
        debug!(url = %parsed, bytes = data.len(), "Fetched document");
        Ok(FetchResponse::new(url, data))
    }
}

impl Fetcher for HttpFetcher {
    fn read_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, PluginResult<FetchResponse>> {
        Box::pin(self.get(url))
    }
}

/// Maps the response status to a body or an error.
async fn handle_response(response: Response) -> PluginResult<String> {
    let status = response.status();
    trace!(status = %status, "Received response");

    match status {
        s if s.is_success() => response.text().await.map_err(|e| {
            PluginError::network(format!("Failed to read response: {}", e)).with_source(e)
        }),
        StatusCode::NOT_FOUND => Err(PluginError::not_found(format!(
            "Not found: {}",
            response.url()
        ))),
        s if s.is_server_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(PluginError::server(format!("Server error ({}): {}", s, body)))
        }
        s => {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %s, body = %body, "Unexpected response status");
            Err(PluginError::invalid_response(format!(
                "Unexpected status {}: {}",
                s, body
            )))
        }
    }
}

/// Parses a URL, assuming `http://` for scheme-less `www.` addresses.
pub fn normalize_url(url: &str) -> PluginResult<Url> {
    let candidate = if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };
    let parsed = Url::parse(&candidate).map_err(|e| {
        PluginError::bad_request(format!("Invalid URL '{}': {}", url, e)).with_source(e)
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(PluginError::bad_request(format!(
            "Unsupported URL scheme '{}' in '{}'",
            scheme, url
        ))),
    }
}

/// Percent-encodes text for use in a URL path or query.
pub fn escape(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z][a-zA-Z0-9]*);")
        .expect("entity regex should be valid")
});

/// Decodes HTML character references.
///
/// Named references use the HTML5 entity table; numeric references are
/// decoded in either base. Unknown names and invalid code points are left
/// untouched.
pub fn unescape(text: &str) -> String {
    ENTITY_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let reference = caps[0].replacen("&#X", "&#x", 1);
            match unescape_with(&reference, resolve_html5_entity) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}
