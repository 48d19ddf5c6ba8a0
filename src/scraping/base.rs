use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};

use super::{PageSource, ScrapeError};
use crate::config::AppConfig;

/// Items marked up as schema.org events. Used for search results and for
/// sessions on a detail page alike.
pub static EVENT_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"[itemtype="http://schema.org/Event"], [itemtype="https://schema.org/Event"]"#,
    )
    .expect("event itemtype selector")
});

pub fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().and_then(|node| {
        let cleaned = inner_text(node);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    })
}

/// Text of the first match exactly as written, trimmed only at the ends.
pub fn first_raw_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Attribute of the first match, with blank values treated as missing.
pub fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Joins a site-relative href onto the origin by plain concatenation.
pub fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!("{base}{href}")
}

/// Every event-typed item inside the first `container` of `document`, in page order.
///
/// Returns `None` when the container is missing so callers can pick their own policy.
pub fn container_items<'a>(document: &'a Html, container: &Selector) -> Option<Vec<ElementRef<'a>>> {
    let root = document.select(container).next()?;
    Some(root.select(&EVENT_ITEM_SELECTOR).collect())
}

pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &AppConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| ScrapeError::Network {
                url: config.base_url.clone(),
                message: format!("unable to build http client: {err}"),
            })?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let network = |message: String| ScrapeError::Network {
            url: url.to_string(),
            message,
        };

        tracing::debug!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| network(format!("request failed: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(network(format!("non-success status {status}")));
        }
        let body = response
            .text()
            .map_err(|err| network(format!("unable to read response body: {err}")))?;
        tracing::debug!(url, bytes = body.len(), "received page");
        Ok(body)
    }
}
