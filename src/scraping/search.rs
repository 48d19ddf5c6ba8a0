use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use super::base;
use super::{PageSource, ScrapeError};

static RESULTS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".search_results").expect("search results selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("event link"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".title").expect("event title"));

/// Name and detail-page URL read from one search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStub {
    pub name: String,
    pub url: String,
}

pub struct SearchPage {
    document: Html,
}

impl SearchPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Event items in page order. A page without a results container has none.
    pub fn event_fragments(&self) -> Vec<ElementRef<'_>> {
        match base::container_items(&self.document, &RESULTS_SELECTOR) {
            Some(items) => items,
            None => {
                tracing::warn!("search results container not found, treating as no events");
                Vec::new()
            }
        }
    }
}

pub struct SearchPageFetcher<'a, S: PageSource + ?Sized> {
    source: &'a S,
    base_url: &'a str,
}

impl<'a, S: PageSource + ?Sized> SearchPageFetcher<'a, S> {
    pub fn new(source: &'a S, base_url: &'a str) -> Self {
        Self { source, base_url }
    }

    pub fn fetch(&self, query: &str) -> Result<SearchPage, ScrapeError> {
        let url = search_url(self.base_url, query)?;
        tracing::info!(url = %url, "fetching search results");
        let html = self.source.fetch_html(&url)?;
        Ok(SearchPage::parse(&html))
    }
}

pub fn search_url(base_url: &str, query: &str) -> Result<String, ScrapeError> {
    let endpoint = format!("{base_url}/pesquisa");
    Url::parse_with_params(&endpoint, [("query", query)])
        .map(String::from)
        .map_err(|err| ScrapeError::Network {
            url: endpoint,
            message: format!("invalid search url: {err}"),
        })
}

pub fn extract_event(fragment: ElementRef<'_>, base_url: &str) -> Result<EventStub, ScrapeError> {
    let link = fragment
        .select(&LINK_SELECTOR)
        .next()
        .ok_or_else(|| ScrapeError::markup("search result", "no anchor in event item"))?;
    let href = link
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or_else(|| ScrapeError::markup("search result", "event anchor has no href"))?;
    let url = base::absolute_url(base_url, href);

    let name = base::first_text(&fragment, &TITLE_SELECTOR)
        .ok_or_else(|| ScrapeError::markup(url.as_str(), "event item has no title"))?;

    Ok(EventStub { name, url })
}
