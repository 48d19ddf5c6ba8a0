use serde::{Deserialize, Serialize};

/// One scheduled showing of an event, as listed on its detail page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub date: String, // "YYYY-MM-DD hh:mm"
    pub price: String,
    /// Purchase link; `None` when the session is sold out.
    pub url: Option<String>,
}

impl Session {
    pub fn is_sold_out(&self) -> bool {
        self.url.is_none()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub url: String,
    pub sessions: Vec<Session>,
}

impl Event {
    pub fn available_sessions(&self) -> usize {
        self.sessions.iter().filter(|s| !s.is_sold_out()).count()
    }
}
