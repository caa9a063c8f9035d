//! # Session Browser
//!
//! State behind the sessions tab: the fetched session list, the client-side
//! filters applied to it, and the transcript of the selected session.
//!
//! Filtering is recomputed from the current fields on every call; nothing is
//! cached, so a keystroke in the search box is reflected on the next draw.

use std::collections::BTreeSet;

use log::debug;

use crate::api::client::ApiResult;
use crate::api::types::{ClaudeMessage, ClaudeSession};
use crate::core::path::normalize_project_path;

/// Which speaker's messages are shown for the selected session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageTypeFilter {
    #[default]
    All,
    User,
    Assistant,
}

impl MessageTypeFilter {
    pub fn next(self) -> Self {
        match self {
            MessageTypeFilter::All => MessageTypeFilter::User,
            MessageTypeFilter::User => MessageTypeFilter::Assistant,
            MessageTypeFilter::Assistant => MessageTypeFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MessageTypeFilter::All => "all",
            MessageTypeFilter::User => "user",
            MessageTypeFilter::Assistant => "assistant",
        }
    }

    pub fn matches(self, message: &ClaudeMessage) -> bool {
        match (self, message) {
            (_, ClaudeMessage::Summary(_)) => false,
            (MessageTypeFilter::All, _) => true,
            (MessageTypeFilter::User, ClaudeMessage::User(_)) => true,
            (MessageTypeFilter::Assistant, ClaudeMessage::Assistant(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionBrowser {
    pub sessions: Vec<ClaudeSession>,
    pub search: String,
    /// Normalized project path, or `None` for every project.
    pub project_filter: Option<String>,
    pub type_filter: MessageTypeFilter,
    pub selected: Option<String>,
    pub messages: Vec<ClaudeMessage>,
    pub loading: bool,
    pub messages_loading: bool,
    pub error: Option<String>,
    pub messages_error: Option<String>,
}

impl SessionBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_sessions(&mut self, result: ApiResult<Vec<ClaudeSession>>) {
        self.loading = false;
        match result {
            Ok(sessions) => {
                debug!("Session browser: {} sessions loaded", sessions.len());
                self.sessions = sessions;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Select a session and clear the previous transcript. The caller fetches
    /// the new one; there is no per-session cache.
    pub fn select(&mut self, session_id: &str) {
        self.selected = Some(session_id.to_string());
        self.messages.clear();
        self.messages_loading = true;
        self.messages_error = None;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.messages.clear();
        self.messages_loading = false;
        self.messages_error = None;
    }

    pub fn apply_messages(&mut self, result: ApiResult<Vec<ClaudeMessage>>) {
        self.messages_loading = false;
        match result {
            Ok(messages) => {
                self.messages = messages;
                self.messages_error = None;
            }
            Err(e) => self.messages_error = Some(e.to_string()),
        }
    }

    /// Fold a delta of changed sessions into the list without touching the
    /// loading flag. Returns true if the selected session was among them.
    pub fn merge_changed(&mut self, changed: Vec<ClaudeSession>) -> bool {
        let mut selected_changed = false;
        for session in changed {
            if self.selected.as_deref() == Some(session.session_id.as_str()) {
                selected_changed = true;
            }
            match self
                .sessions
                .iter_mut()
                .find(|s| s.session_id == session.session_id)
            {
                Some(existing) => *existing = session,
                None => self.sessions.push(session),
            }
        }
        self.sessions
            .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        selected_changed
    }

    pub fn filtered_sessions(&self) -> Vec<&ClaudeSession> {
        let needle = self.search.trim().to_lowercase();
        self.sessions
            .iter()
            .filter(|s| {
                self.project_filter
                    .as_deref()
                    .is_none_or(|p| normalize_project_path(&s.project_path) == p)
            })
            .filter(|s| needle.is_empty() || session_matches(s, &needle))
            .collect()
    }

    pub fn visible_messages(&self) -> Vec<&ClaudeMessage> {
        self.messages
            .iter()
            .filter(|m| self.type_filter.matches(m))
            .collect()
    }

    /// Distinct normalized project paths, sorted.
    pub fn projects(&self) -> Vec<String> {
        self.sessions
            .iter()
            .map(|s| normalize_project_path(&s.project_path))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Step the project filter: all → first project → … → last → all.
    pub fn cycle_project_filter(&mut self) {
        let projects = self.projects();
        self.project_filter = match &self.project_filter {
            None => projects.first().cloned(),
            Some(current) => projects
                .iter()
                .position(|p| p == current)
                .and_then(|i| projects.get(i + 1))
                .cloned(),
        };
    }

    pub fn selected_session(&self) -> Option<&ClaudeSession> {
        let id = self.selected.as_deref()?;
        self.sessions.iter().find(|s| s.session_id == id)
    }
}

fn session_matches(session: &ClaudeSession, needle: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(needle);
    contains(&session.project_path)
        || contains(&normalize_project_path(&session.project_path))
        || contains(&session.session_id)
        || session.git_branch.as_deref().is_some_and(contains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiError;
    use crate::test_support::{assistant_text, session, user_text};
    use chrono::Duration;

    fn browser() -> SessionBrowser {
        let mut web = session("s1", "-Users-a-web", Some("main"), 3);
        web.latest_content_preview = Some("Fixed the login bug".into());
        let mut mobile = session("s2", "/Users/a/mobile", Some("feature/push"), 2);
        mobile.updated_at = mobile.updated_at - Duration::hours(1);
        let mut tools = session("s3", "/opt/tools", None, 1);
        tools.updated_at = tools.updated_at - Duration::hours(2);

        let mut b = SessionBrowser::new();
        b.apply_sessions(Ok(vec![web, mobile, tools]));
        b
    }

    fn ids(sessions: Vec<&ClaudeSession>) -> Vec<&str> {
        sessions.into_iter().map(|s| s.session_id.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut b = browser();
        b.search = "FEATURE".into();
        assert_eq!(ids(b.filtered_sessions()), vec!["s2"]);
        b.search = "S3".into();
        assert_eq!(ids(b.filtered_sessions()), vec!["s3"]);
        b.search = "/users/a/web".into();
        assert_eq!(ids(b.filtered_sessions()), vec!["s1"]);
        b.search = "  ".into();
        assert_eq!(b.filtered_sessions().len(), 3);
    }

    #[test]
    fn test_search_ignores_preview_text() {
        let mut b = browser();
        b.search = "login".into();
        assert!(b.filtered_sessions().is_empty());

        let mut docs = session("s-main", "/Users/a/docs", Some("main"), 1);
        docs.latest_content_preview = Some("Set up the developer docs".into());
        let dev = session("s-dev", "/Users/a/docs", Some("develop"), 1);
        b.apply_sessions(Ok(vec![docs, dev]));
        b.search = "develop".into();
        assert_eq!(ids(b.filtered_sessions()), vec!["s-dev"]);
    }

    #[test]
    fn test_project_filter_compares_normalized_paths() {
        let mut b = browser();
        b.project_filter = Some("/Users/a/web".into());
        assert_eq!(ids(b.filtered_sessions()), vec!["s1"]);
    }

    #[test]
    fn test_filters_combine() {
        let mut b = browser();
        b.project_filter = Some("/Users/a/mobile".into());
        b.search = "main".into();
        assert!(b.filtered_sessions().is_empty());
    }

    #[test]
    fn test_projects_are_distinct_and_normalized() {
        let b = browser();
        assert_eq!(b.projects(), vec!["/Users/a/mobile", "/Users/a/web", "/opt/tools"]);
    }

    #[test]
    fn test_cycle_project_filter_wraps_to_all() {
        let mut b = browser();
        let mut seen = Vec::new();
        for _ in 0..4 {
            b.cycle_project_filter();
            seen.push(b.project_filter.clone());
        }
        assert_eq!(
            seen,
            vec![
                Some("/Users/a/mobile".to_string()),
                Some("/Users/a/web".to_string()),
                Some("/opt/tools".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_type_filter_hides_other_speaker() {
        let mut b = browser();
        b.select("s1");
        b.apply_messages(Ok(vec![user_text("s1", "hi"), assistant_text("s1", "hello")]));
        assert_eq!(b.visible_messages().len(), 2);
        b.type_filter = MessageTypeFilter::User;
        assert!(matches!(b.visible_messages().as_slice(), [ClaudeMessage::User(_)]));
        b.type_filter = b.type_filter.next();
        assert!(matches!(b.visible_messages().as_slice(), [ClaudeMessage::Assistant(_)]));
        assert_eq!(b.type_filter.next(), MessageTypeFilter::All);
    }

    #[test]
    fn test_select_clears_previous_transcript() {
        let mut b = browser();
        b.select("s1");
        b.apply_messages(Ok(vec![user_text("s1", "hi")]));
        b.select("s2");
        assert!(b.messages.is_empty());
        assert!(b.messages_loading);
        assert_eq!(b.selected_session().map(|s| s.session_id.as_str()), Some("s2"));
    }

    #[test]
    fn test_load_error_keeps_previous_list() {
        let mut b = browser();
        b.begin_load();
        b.apply_sessions(Err(ApiError::Network("timeout".into())));
        assert!(!b.loading);
        assert_eq!(b.sessions.len(), 3);
        assert_eq!(b.error.as_deref(), Some("network error: timeout"));
    }

    #[test]
    fn test_merge_changed_replaces_inserts_and_resorts() {
        let mut b = browser();
        b.select("s3");
        let mut bumped = session("s3", "/opt/tools", None, 5);
        bumped.updated_at = bumped.updated_at + Duration::hours(1);
        let brand_new = session("s4", "/opt/new", None, 1);

        let selected_changed = b.merge_changed(vec![bumped, brand_new]);

        assert!(selected_changed);
        assert!(!b.loading);
        assert_eq!(b.sessions.len(), 4);
        assert_eq!(b.sessions[0].session_id, "s3");
        assert_eq!(b.sessions[0].message_count, 5);
    }

    #[test]
    fn test_merge_unrelated_change_leaves_selection_alone() {
        let mut b = browser();
        b.select("s1");
        assert!(!b.merge_changed(vec![session("s2", "/Users/a/mobile", None, 9)]));
    }
}
