//! Commands that answer by scraping a web page.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::command::{BoxFuture, Command, Message, Reply};
use crate::error::PluginResult;
use crate::fetch::{Fetcher, escape, unescape};

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.+?>").expect("tag regex should be valid"));

fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Replaces Swedish letters with their closest ASCII letter.
pub fn asciilize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'å' | 'ä' => 'a',
            'ö' => 'o',
            'Å' | 'Ä' => 'A',
            'Ö' => 'O',
            other => other,
        })
        .collect()
}

/// `.temp [place]` reports the current temperature at a measuring station.
pub struct TempCommand {
    fetcher: Arc<dyn Fetcher>,
    default_location: String,
}

impl TempCommand {
    pub fn new(fetcher: Arc<dyn Fetcher>, default_location: impl Into<String>) -> Self {
        Self {
            fetcher,
            default_location: default_location.into(),
        }
    }

    pub fn url_for(place: &str) -> String {
        format!("http://www.temperatur.nu/termo/{}/temp.txt", asciilize(place))
    }

    pub async fn temperature(&self, argument: &str) -> PluginResult<Option<String>> {
        let place = if argument.is_empty() {
            self.default_location.as_str()
        } else {
            argument
        };
        let response = self.fetcher.read_url(&Self::url_for(place)).await?;
        let reading = response.data.trim();
        if reading.is_empty() || reading.contains('\n') {
            debug!(place = %place, "No temperature reading");
            return Ok(None);
        }
        Ok(Some(format!("Temperature in {}: {}.", place, reading)))
    }
}

impl Command for TempCommand {
    fn name(&self) -> &str {
        "temp"
    }

    fn triggers(&self) -> &[&'static str] {
        &["temp"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move {
            Ok(self
                .temperature(&message.argument)
                .await?
                .map(Reply::Say))
        })
    }
}

static CALCULATOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<td><img src=/images/calc_img\.gif alt=""></td><td>&nbsp;</td><td nowrap><font size=\+1><b>(.*?)</b>"#,
    )
    .expect("calculator regex should be valid")
});

static RESULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div class=g><a href="(.*?)" class=l>(.*?)</a>(.*?)</div>"#)
        .expect("result regex should be valid")
});

/// `.google <query>` answers with the calculator result or the first hit.
pub struct GoogleCommand {
    fetcher: Arc<dyn Fetcher>,
}

impl GoogleCommand {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub fn url_for(query: &str) -> String {
        format!(
            "http://www.google.com/search?rls=en&q={}&ie=UTF-8&oe=UTF-8",
            escape(query)
        )
    }

    pub async fn search(&self, query: &str) -> PluginResult<String> {
        let url = Self::url_for(query);
        let response = self.fetcher.read_url(&url).await?;
        Ok(extract_search_answer(&response.data, &url))
    }
}

/// Picks the answer out of a search result page, falling back to the URL.
pub fn extract_search_answer(page: &str, url: &str) -> String {
    if let Some(caps) = CALCULATOR_PATTERN.captures(page) {
        let answer = caps[1].replace(" &#215;", "×").replace("<sup>", "^");
        return strip_tags(&answer);
    }
    if let Some(caps) = RESULT_PATTERN.captures(page) {
        let text = strip_tags(&unescape(&caps[2]));
        return format!("{} - {} | {}", text, &caps[1], url);
    }
    url.to_string()
}

impl Command for GoogleCommand {
    fn name(&self) -> &str {
        "google"
    }

    fn triggers(&self) -> &[&'static str] {
        &["google"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move { Ok(Some(Reply::Say(self.search(&message.argument).await?))) })
    }
}

/// Longest article excerpt, in characters, before cutting at a full stop.
pub const EXCERPT_LIMIT: usize = 300;

static PARAGRAPH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>(.+?)</p>").expect("paragraph regex should be valid"));

static FOOTNOTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("footnote regex should be valid"));

/// `.wp <article>` quotes the start of a Wikipedia article.
pub struct WikipediaCommand {
    fetcher: Arc<dyn Fetcher>,
}

impl WikipediaCommand {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    pub fn url_for(article: &str) -> String {
        format!("http://en.wikipedia.org/wiki/{}", escape(article))
    }

    pub async fn summarize(&self, article: &str) -> PluginResult<String> {
        let url = Self::url_for(article);
        let response = self.fetcher.read_url(&url).await?;
        Ok(match extract_excerpt(&response.data) {
            Some(excerpt) => format!("{} - {}", excerpt, url),
            None => url,
        })
    }
}

/// Returns the first paragraph of an article page, cut after the last full
/// stop within [`EXCERPT_LIMIT`] characters.
///
/// A closing quote right after the full stop is kept. Without a full stop
/// the text is cut at the limit.
pub fn extract_excerpt(page: &str) -> Option<String> {
    let caps = PARAGRAPH_PATTERN.captures(page)?;
    let text = strip_tags(&unescape(&caps[1]));
    let text = FOOTNOTE_PATTERN.replace_all(&text, "");
    let chars: Vec<char> = text.chars().collect();

    let mut end = chars[..chars.len().min(EXCERPT_LIMIT)]
        .iter()
        .rposition(|c| *c == '.')
        .unwrap_or(EXCERPT_LIMIT);
    if chars.get(end + 1) == Some(&'"') {
        end += 1;
    }
    Some(chars.iter().take(end + 1).collect())
}

impl Command for WikipediaCommand {
    fn name(&self) -> &str {
        "wp"
    }

    fn triggers(&self) -> &[&'static str] {
        &["wp"]
    }

    fn on_trigger<'a>(
        &'a mut self,
        message: &'a Message,
    ) -> BoxFuture<'a, PluginResult<Option<Reply>>> {
        Box::pin(async move {
            Ok(Some(Reply::Say(
                self.summarize(&message.argument).await?,
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::error::{PluginError, PluginErrorCode};
    use crate::fetch::FetchResponse;

    #[derive(Default)]
    struct Pages(HashMap<String, String>);

    impl Pages {
        fn with(mut self, url: &str, body: &str) -> Arc<Self> {
            self.0.insert(url.to_string(), body.to_string());
            Arc::new(self)
        }
    }

    impl Fetcher for Pages {
        fn read_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, PluginResult<FetchResponse>> {
            Box::pin(async move {
                self.0
                    .get(url)
                    .map(|body| FetchResponse::new(url, body.clone()))
                    .ok_or_else(|| PluginError::not_found(url.to_string()))
            })
        }
    }

    #[test]
    fn asciilize_folds_swedish_letters() {
        assert_eq!(asciilize("Växjö"), "Vaxjo");
        assert_eq!(asciilize("ÅÄÖ åäö"), "AAO aao");
    }

    #[tokio::test]
    async fn temp_uses_default_location() {
        let pages = Pages::default().with("http://www.temperatur.nu/termo/ryd/temp.txt", " 3.5 \n");
        let temp = TempCommand::new(pages, "ryd");
        assert_eq!(
            temp.temperature("").await.unwrap().as_deref(),
            Some("Temperature in ryd: 3.5.")
        );
    }

    #[tokio::test]
    async fn temp_keeps_original_place_name() {
        let pages = Pages::default().with("http://www.temperatur.nu/termo/vaxjo/temp.txt", "-2.0");
        let temp = TempCommand::new(pages, "ryd");
        assert_eq!(
            temp.temperature("växjö").await.unwrap().as_deref(),
            Some("Temperature in växjö: -2.0.")
        );
    }

    #[tokio::test]
    async fn temp_blank_reading_is_silent() {
        let pages = Pages::default().with("http://www.temperatur.nu/termo/ryd/temp.txt", "  \n");
        let temp = TempCommand::new(pages, "ryd");
        assert_eq!(temp.temperature("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn temp_fetch_error_propagates() {
        let temp = TempCommand::new(Arc::new(Pages::default()), "ryd");
        let err = temp.temperature("nowhere").await.unwrap_err();
        assert_eq!(err.code(), PluginErrorCode::NotFound);
    }

    #[test]
    fn google_url_escapes_query() {
        assert_eq!(
            GoogleCommand::url_for("rust lang"),
            "http://www.google.com/search?rls=en&q=rust%20lang&ie=UTF-8&oe=UTF-8"
        );
    }

    #[test]
    fn search_answer_prefers_calculator() {
        let page = r#"<td><img src=/images/calc_img.gif alt=""></td><td>&nbsp;</td><td nowrap><font size=+1><b>2 &#215; 10<sup>3</sup> = <i>x</i></b></font>"#;
        assert_eq!(extract_search_answer(page, "u"), "2× 10^3 = x");
    }

    #[test]
    fn search_answer_first_result() {
        let page = r#"<div class=g><a href="http://www.rust-lang.org/" class=l><b>Rust</b> &amp; friends</a> more</div>"#;
        assert_eq!(
            extract_search_answer(page, "http://google/q"),
            "Rust & friends - http://www.rust-lang.org/ | http://google/q"
        );
    }

    #[test]
    fn search_answer_falls_back_to_url() {
        assert_eq!(extract_search_answer("<html></html>", "http://g"), "http://g");
    }

    #[test]
    fn excerpt_cuts_at_last_full_stop() {
        let page = "<p><b>Rust</b> is a language[1]. It is fast. More</p>";
        assert_eq!(
            extract_excerpt(page).as_deref(),
            Some("Rust is a language. It is fast.")
        );
    }

    #[test]
    fn excerpt_keeps_closing_quote() {
        let page = r#"<p>He said &quot;hi.&quot; Then left</p>"#;
        assert_eq!(extract_excerpt(page).as_deref(), Some(r#"He said "hi.""#));
    }

    #[test]
    fn excerpt_without_full_stop_is_cut_at_limit() {
        let long = "å".repeat(400);
        let page = format!("<p>{}</p>", long);
        let excerpt = extract_excerpt(&page).unwrap();
        assert_eq!(excerpt.chars().count(), EXCERPT_LIMIT + 1);
    }

    #[test]
    fn excerpt_ignores_full_stop_past_limit() {
        let text = format!("{}. {}.", "a".repeat(10), "b".repeat(400));
        let page = format!("<p>{}</p>", text);
        assert_eq!(extract_excerpt(&page).unwrap(), format!("{}.", "a".repeat(10)));
    }

    #[tokio::test]
    async fn wikipedia_reply_includes_url() {
        let url = "http://en.wikipedia.org/wiki/Rust";
        let pages = Pages::default().with(url, "<html><p>Rust is iron oxide.</p></html>");
        let wp = WikipediaCommand::new(pages);
        assert_eq!(
            wp.summarize("Rust").await.unwrap(),
            "Rust is iron oxide. - http://en.wikipedia.org/wiki/Rust"
        );
    }

    #[tokio::test]
    async fn wikipedia_without_paragraph_replies_url() {
        let url = "http://en.wikipedia.org/wiki/Nothing";
        let wp = WikipediaCommand::new(Pages::default().with(url, "<html></html>"));
        assert_eq!(wp.summarize("Nothing").await.unwrap(), url);
    }
}
