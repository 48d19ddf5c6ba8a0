pub mod base;
pub mod event_page;
pub mod search;

use thiserror::Error;

use crate::models::Event;
use event_page::{extract_session, EventPageFetcher};
use search::{extract_event, SearchPageFetcher};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
    #[error("markup error in {context}: {message}")]
    Markup { context: String, message: String },
}

impl ScrapeError {
    pub(crate) fn markup(context: impl Into<String>, message: impl Into<String>) -> Self {
        ScrapeError::Markup {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Anything that can turn a URL into an HTML body.
pub trait PageSource {
    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Search page, then one detail page per event, strictly in order.
///
/// The first error aborts the whole run; no partial list is returned.
pub struct ScrapePipeline<'a, S: PageSource + ?Sized> {
    source: &'a S,
    base_url: &'a str,
}

impl<'a, S: PageSource + ?Sized> ScrapePipeline<'a, S> {
    pub fn new(source: &'a S, base_url: &'a str) -> Self {
        Self { source, base_url }
    }

    pub fn run(&self, query: &str) -> Result<Vec<Event>, ScrapeError> {
        let search_page = SearchPageFetcher::new(self.source, self.base_url).fetch(query)?;
        let fragments = search_page.event_fragments();
        tracing::info!(query, events = fragments.len(), "search results parsed");

        let detail_fetcher = EventPageFetcher::new(self.source);
        let mut events = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let stub = extract_event(fragment, self.base_url)?;
            let page = detail_fetcher.fetch(&stub.url)?;
            let sessions = page
                .session_fragments()
                .into_iter()
                .map(|session| extract_session(session, &stub.url))
                .collect::<Result<Vec<_>, _>>()?;
            let event = Event {
                name: stub.name,
                url: stub.url,
                sessions,
            };
            tracing::info!(
                event = %event.name,
                url = %event.url,
                sessions = event.sessions.len(),
                available = event.available_sessions(),
                "event scraped"
            );
            events.push(event);
        }

        Ok(events)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubSource;
    use super::*;
    use crate::render;

    const BASE: &str = "https://ticketline.sapo.pt";
    const SEARCH_URL: &str = "https://ticketline.sapo.pt/pesquisa?query=cozinhas+do+mundo";

    const SEARCH_HTML: &str = r#"
    <html><body>
      <ul class="search_results">
        <li itemscope itemtype="http://schema.org/Event">
          <a href="/evento/cozinhas-do-mundo-italia-1">
            <p class="title">Cozinhas do Mundo: Itália</p>
          </a>
        </li>
        <li itemscope itemtype="http://schema.org/Event">
          <a href="/evento/cozinhas-do-mundo-japao-2">
            <p class="title">Cozinhas do Mundo: Japão</p>
          </a>
        </li>
      </ul>
    </body></html>
    "#;

    const ITALY_HTML: &str = r#"
    <html><body>
      <div class="available_sessions">
        <div itemscope itemtype="http://schema.org/Event">
          <time class="date" content="2025-6-14T19:30">14 Jun</time>
          <span itemprop="lowPrice">35,00 €</span>
          <span class="soldout">Esgotado</span>
        </div>
      </div>
    </body></html>
    "#;

    const JAPAN_HTML: &str = r#"
    <html><body>
      <div class="available_sessions">
        <div itemscope itemtype="http://schema.org/Event">
          <time class="date" content="2025-07-01T20:00">1 Jul</time>
          <span itemprop="lowPrice">40,00 €</span>
          <a href="https://ticketline.sapo.pt/comprar/111">Comprar</a>
        </div>
        <div itemscope itemtype="http://schema.org/Event">
          <time class="date" content="2025-07-02T20:00">2 Jul</time>
          <span itemprop="lowPrice">42,50 €</span>
          <a href="https://ticketline.sapo.pt/comprar/112">Comprar</a>
        </div>
      </div>
    </body></html>
    "#;

    fn full_site() -> StubSource {
        StubSource::default()
            .page(SEARCH_URL, SEARCH_HTML)
            .page(&format!("{BASE}/evento/cozinhas-do-mundo-italia-1"), ITALY_HTML)
            .page(&format!("{BASE}/evento/cozinhas-do-mundo-japao-2"), JAPAN_HTML)
    }

    #[test]
    fn scrapes_events_and_sessions_in_page_order() {
        let source = full_site();
        let events = ScrapePipeline::new(&source, BASE)
            .run("cozinhas do mundo")
            .expect("pipeline run");

        assert_eq!(source.requested.borrow().len(), 3);
        assert_eq!(events.len(), 2);

        let italy = &events[0];
        assert_eq!(italy.name, "Cozinhas do Mundo: Itália");
        assert_eq!(italy.url, format!("{BASE}/evento/cozinhas-do-mundo-italia-1"));
        assert_eq!(italy.sessions.len(), 1);
        assert_eq!(italy.sessions[0].date, "2025-6-14 19:30");
        assert_eq!(italy.sessions[0].price, "35,00 €");
        assert!(italy.sessions[0].is_sold_out());

        let japan = &events[1];
        assert_eq!(japan.sessions.len(), 2);
        assert_eq!(japan.available_sessions(), 2);
        assert_eq!(japan.sessions[1].date, "2025-07-02 20:00");

        let plain = render::to_plaintext(&events);
        assert_eq!(plain.matches("### ").count(), 2);
        assert_eq!(plain.matches("- [X] ").count(), 1);
        assert_eq!(plain.matches("- [ ] ").count(), 2);
        assert!(plain.contains("- [X] [2025-6-14 19:30] 35,00 €"));
    }

    #[test]
    fn missing_results_container_yields_no_events() {
        let source = StubSource::default().page(
            SEARCH_URL,
            "<html><body><p>Sem resultados</p></body></html>",
        );
        let events = ScrapePipeline::new(&source, BASE)
            .run("cozinhas do mundo")
            .expect("empty run");
        assert!(events.is_empty());
        assert_eq!(source.requested.borrow().len(), 1);
    }

    #[test]
    fn failed_detail_page_aborts_run() {
        let source = StubSource::default()
            .page(SEARCH_URL, SEARCH_HTML)
            .page(&format!("{BASE}/evento/cozinhas-do-mundo-italia-1"), ITALY_HTML)
            .status(&format!("{BASE}/evento/cozinhas-do-mundo-japao-2"), 500);

        let err = ScrapePipeline::new(&source, BASE)
            .run("cozinhas do mundo")
            .expect_err("detail page failure");
        match err {
            ScrapeError::Network { url, .. } => {
                assert_eq!(url, format!("{BASE}/evento/cozinhas-do-mundo-japao-2"))
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_session_date_aborts_run() {
        let broken = ITALY_HTML.replace("2025-6-14T19:30", "14/06/2025 19h30");
        let source = full_site().page(&format!("{BASE}/evento/cozinhas-do-mundo-italia-1"), &broken);

        let err = ScrapePipeline::new(&source, BASE)
            .run("cozinhas do mundo")
            .expect_err("bad date");
        assert!(matches!(err, ScrapeError::Markup { .. }));
        // the second event is never requested
        assert_eq!(source.requested.borrow().len(), 2);
    }
}
