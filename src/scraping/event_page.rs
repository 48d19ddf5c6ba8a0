use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::base;
use super::{PageSource, ScrapeError};
use crate::models::Session;

static SESSIONS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".available_sessions").expect("sessions selector"));
static DATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".date").expect("session date"));
static PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[itemprop="lowPrice"]"#).expect("session price"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("session link"));
// YYYY-MM-DDThh:mm; month, day and hour may be unpadded
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})T(\d{1,2}):(\d{2})$").expect("session date regex")
});

pub struct EventPage {
    document: Html,
}

impl EventPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Session items in the order the page lists them. Events without upcoming
    /// sessions may omit the container entirely; that is an empty list.
    pub fn session_fragments(&self) -> Vec<ElementRef<'_>> {
        base::container_items(&self.document, &SESSIONS_SELECTOR).unwrap_or_else(|| {
            tracing::debug!("available sessions container not found");
            Vec::new()
        })
    }
}

pub struct EventPageFetcher<'a, S: PageSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: PageSource + ?Sized> EventPageFetcher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn fetch(&self, event_url: &str) -> Result<EventPage, ScrapeError> {
        let html = self.source.fetch_html(event_url)?;
        Ok(EventPage::parse(&html))
    }
}

/// Reads one session item. `context` names the event page in errors.
pub fn extract_session(fragment: ElementRef<'_>, context: &str) -> Result<Session, ScrapeError> {
    let raw_date = base::first_attr(&fragment, &DATE_SELECTOR, "content")
        .ok_or_else(|| ScrapeError::markup(context, "session has no date attribute"))?;
    let date = normalize_date(&raw_date).map_err(|message| ScrapeError::markup(context, message))?;

    // Microdata prices show up both as visible text and as <meta content>.
    let price = base::first_raw_text(&fragment, &PRICE_SELECTOR)
        .or_else(|| base::first_attr(&fragment, &PRICE_SELECTOR, "content"))
        .ok_or_else(|| ScrapeError::markup(context, format!("session {date} has no price")))?;

    // No link means the session cannot be bought.
    let url = base::first_attr(&fragment, &LINK_SELECTOR, "href");

    Ok(Session { date, price, url })
}

/// `2025-6-14T19:30` becomes `2025-6-14 19:30`; anything else is rejected.
pub fn normalize_date(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    let caps = DATE_RE
        .captures(raw)
        .ok_or_else(|| format!("unexpected date format {raw:?}"))?;
    let field = |idx: usize| caps[idx].parse::<u32>().unwrap_or(u32::MAX);

    let year = caps[1]
        .parse::<i32>()
        .map_err(|_| format!("invalid year in {raw:?}"))?;
    NaiveDate::from_ymd_opt(year, field(2), field(3))
        .ok_or_else(|| format!("date out of range {raw:?}"))?;
    NaiveTime::from_hms_opt(field(4), field(5), 0)
        .ok_or_else(|| format!("time out of range {raw:?}"))?;

    Ok(raw.replacen('T', " ", 1))
}
