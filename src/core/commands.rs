//! Command history view: a debounced search box over the shell command log.

use std::time::{Duration, Instant};

use crate::api::client::ApiResult;
use crate::api::types::CommandLogEntry;
use crate::core::debounce::Debounce;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Which backend call a command fetch should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandQuery {
    History,
    Search(String),
}

impl CommandQuery {
    pub fn for_text(query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            CommandQuery::History
        } else {
            CommandQuery::Search(trimmed.to_string())
        }
    }
}

#[derive(Debug)]
pub struct CommandBrowser {
    pub entries: Vec<CommandLogEntry>,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    debounce: Debounce,
}

impl Default for CommandBrowser {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl CommandBrowser {
    pub fn new(debounce: Duration) -> Self {
        Self {
            entries: Vec::new(),
            query: String::new(),
            loading: false,
            error: None,
            debounce: Debounce::new(debounce),
        }
    }

    /// Fetch immediately with the current query (tab mount, retry).
    pub fn load_now(&mut self) -> CommandQuery {
        self.debounce.cancel();
        self.loading = true;
        self.error = None;
        CommandQuery::for_text(&self.query)
    }

    /// Record an edit to the search box; the fetch waits for quiet time.
    pub fn set_query(&mut self, query: String, now: Instant) {
        self.query = query;
        self.debounce.schedule(now);
    }

    /// The fetch to dispatch if the debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<CommandQuery> {
        if self.debounce.fire(now) {
            self.loading = true;
            self.error = None;
            Some(CommandQuery::for_text(&self.query))
        } else {
            None
        }
    }

    pub fn search_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn apply(&mut self, result: ApiResult<Vec<CommandLogEntry>>) {
        self.loading = false;
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}
