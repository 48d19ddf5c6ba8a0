//! Plaintext, HTML and JSON views of a scrape. All renderers keep input order.

use crate::config::OutputFormat;
use crate::models::{Event, Session};

pub fn render(events: &[Event], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Plain => Ok(to_plaintext(events)),
        OutputFormat::Html => Ok(to_html(events)),
        OutputFormat::Json => to_json(events),
    }
}

pub fn to_plaintext(events: &[Event]) -> String {
    events
        .iter()
        .map(event_plaintext)
        .collect::<Vec<_>>()
        .join("\n")
}

fn event_plaintext(event: &Event) -> String {
    let sessions = event
        .sessions
        .iter()
        .map(session_plaintext)
        .collect::<Vec<_>>()
        .join("\n");
    format!("### {} — {}\n\n{}\n", event.name, event.url, sessions)
}

fn session_plaintext(session: &Session) -> String {
    let mark = if session.is_sold_out() { "X" } else { " " };
    format!("- [{mark}] [{}] {}", session.date, session.price)
}

/// Self-contained document suitable for an email body.
pub fn to_html(events: &[Event]) -> String {
    let body = events.iter().map(event_html).collect::<String>();
    format!("<html>\n<body>\n{body}</body>\n</html>\n")
}

fn event_html(event: &Event) -> String {
    let sessions = event.sessions.iter().map(session_html).collect::<String>();
    format!(
        "<h3><a href=\"{}\">{}</a></h3>\n{}",
        escape_html(&event.url),
        escape_html(&event.name),
        sessions
    )
}

fn session_html(session: &Session) -> String {
    let checked = if session.is_sold_out() {
        " checked=\"checked\""
    } else {
        ""
    };
    let buy = session
        .url
        .as_deref()
        .map(|url| format!(" <a href=\"{}\">Comprar</a>", escape_html(url)))
        .unwrap_or_default();
    format!(
        "<p><input type=\"checkbox\" disabled=\"disabled\"{checked}/> {} {}{buy}</p>\n",
        escape_html(&session.date),
        escape_html(&session.price)
    )
}

pub fn to_json(events: &[Event]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(events)
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
