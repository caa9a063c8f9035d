//! # Mock Provider
//!
//! In-memory [`ManagerApi`] backed by [`Fixtures`]. Every call waits a fixed,
//! per-operation delay before answering so loading states are visible in the
//! dashboard; [`Latency::None`] skips the wait for tests.
//!
//! Settings saves and file writes mutate the in-memory copy, so a save
//! followed by a fetch returns the saved value for the lifetime of the
//! provider.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};

use super::client::{ApiResult, ManagerApi};
use super::fixtures::{CLAUDE_DIR, Fixtures};
use super::notify::{ChangeNotifier, Subscription};
use super::types::{
    ChangeEvent, ClaudeDirectoryInfo, ClaudeMessage, ClaudeSession, ClaudeSettings,
    CommandLogEntry, IdeInfo, ProjectSummary, SessionStats, TodoItem,
};
use crate::core::stats;

/// Simulated response time per operation, in milliseconds.
mod delay {
    pub const GET_ALL_SESSIONS: u64 = 300;
    pub const GET_CHANGED_SESSIONS: u64 = 100;
    pub const GET_SESSION_MESSAGES: u64 = 200;
    pub const SEARCH_SESSIONS: u64 = 250;
    pub const GET_COMMAND_HISTORY: u64 = 200;
    pub const SEARCH_COMMANDS: u64 = 150;
    pub const GET_TODOS: u64 = 150;
    pub const GET_SETTINGS: u64 = 100;
    pub const SAVE_SETTINGS: u64 = 400;
    pub const GET_PROJECT_SUMMARY: u64 = 350;
    pub const GET_SESSION_STATS: u64 = 250;
    pub const EXPORT_SESSION_DATA: u64 = 500;
    pub const ACTIVATE_IDE_WINDOW: u64 = 100;
    pub const GET_DIRECTORY_INFO: u64 = 200;
    pub const READ_FILE: u64 = 150;
    pub const WRITE_FILE: u64 = 300;
}

const CLAUDE_MD: &str = "# Global instructions\n\n\
- Prefer small, reviewable commits\n\
- Run the test suite before declaring a task done\n\n\
## Style\n\n\
1. Match the surrounding code\n\
2. Keep comments short\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    /// Per-operation delays between 100 and 500 ms.
    #[default]
    Realistic,
    /// Answer immediately.
    None,
}

impl Latency {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "realistic" | "on" | "true" => Some(Latency::Realistic),
            "none" | "off" | "false" => Some(Latency::None),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Latency::Realistic => "realistic",
            Latency::None => "none",
        }
    }
}

struct MockState {
    fixtures: Fixtures,
    /// Newest `updated_at` handed out by `get_changed_sessions`.
    watermark: Option<DateTime<Utc>>,
    /// Contents written through `write_claude_file`, keyed by path.
    written: HashMap<String, String>,
}

pub struct MockApi {
    latency: Latency,
    state: Mutex<MockState>,
    notifier: ChangeNotifier,
}

impl MockApi {
    pub fn new(latency: Latency) -> Self {
        Self::with_fixtures(Fixtures::demo(), latency)
    }

    pub fn with_fixtures(fixtures: Fixtures, latency: Latency) -> Self {
        Self {
            latency,
            state: Mutex::new(MockState {
                fixtures,
                watermark: None,
                written: HashMap::new(),
            }),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    async fn simulate(&self, operation: &str, millis: u64) {
        debug!("Mock {} ({} ms, latency {})", operation, millis, self.latency.name());
        if self.latency == Latency::Realistic {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    // A panic while holding the lock leaves plain data behind; keep serving it.
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session_messages(state: &MockState, session_id: &str) -> Vec<ClaudeMessage> {
        state
            .fixtures
            .messages
            .iter()
            .filter(|m| m.session_id() == Some(session_id))
            .cloned()
            .collect()
    }

    fn sorted_sessions(state: &MockState) -> Vec<ClaudeSession> {
        let mut sessions = state.fixtures.sessions.clone();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    fn fixture_file(state: &MockState, path: &str) -> ApiResult<String> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);

        if file_name == "settings.json" {
            return Ok(serde_json::to_string_pretty(&state.fixtures.settings)?);
        }
        if file_name.ends_with(".jsonl") {
            let lines = Self::session_messages(state, stem)
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(lines.join("\n"));
        }
        if file_name.ends_with(".md") {
            return Ok(CLAUDE_MD.to_string());
        }
        if file_name == "command_history.log" {
            let lines: Vec<String> = state
                .fixtures
                .commands
                .iter()
                .map(|c| {
                    format!(
                        "[{}] {} ({}) $ {}",
                        c.timestamp.to_rfc3339(),
                        c.user,
                        c.cwd.as_deref().unwrap_or("-"),
                        c.command
                    )
                })
                .collect();
            return Ok(lines.join("\n"));
        }
        if file_name.ends_with(".json") && path.contains("todos/") {
            let todos: Vec<&TodoItem> = state
                .fixtures
                .todos
                .iter()
                .filter(|(session, _)| session == stem)
                .map(|(_, todo)| todo)
                .collect();
            return Ok(serde_json::to_string_pretty(&todos)?);
        }
        Ok(format!("# {path}\n\n(no preview available)"))
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl ManagerApi for MockApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_all_sessions(&self) -> ApiResult<Vec<ClaudeSession>> {
        self.simulate("get_all_sessions", delay::GET_ALL_SESSIONS).await;
        Ok(Self::sorted_sessions(&self.state()))
    }

    async fn get_changed_sessions(&self) -> ApiResult<Vec<ClaudeSession>> {
        self.simulate("get_changed_sessions", delay::GET_CHANGED_SESSIONS)
            .await;
        let mut state = self.state();
        let watermark = state.watermark;
        let changed: Vec<ClaudeSession> = Self::sorted_sessions(&state)
            .into_iter()
            .filter(|s| watermark.is_none_or(|w| s.updated_at > w))
            .collect();
        if let Some(newest) = changed.iter().map(|s| s.updated_at).max() {
            state.watermark = Some(newest);
        }
        debug!("Mock get_changed_sessions: {} changed", changed.len());
        Ok(changed)
    }

    async fn get_session_messages(&self, session_id: &str) -> ApiResult<Vec<ClaudeMessage>> {
        self.simulate("get_session_messages", delay::GET_SESSION_MESSAGES)
            .await;
        Ok(Self::session_messages(&self.state(), session_id))
    }

    async fn search_sessions(&self, query: &str) -> ApiResult<Vec<ClaudeSession>> {
        self.simulate("search_sessions", delay::SEARCH_SESSIONS).await;
        let needle = query.to_lowercase();
        Ok(Self::sorted_sessions(&self.state())
            .into_iter()
            .filter(|s| {
                contains_ignore_case(&s.project_path, &needle)
                    || contains_ignore_case(&s.session_id, &needle)
                    || s.git_branch
                        .as_deref()
                        .is_some_and(|b| contains_ignore_case(b, &needle))
            })
            .collect())
    }

    async fn get_command_history(&self) -> ApiResult<Vec<CommandLogEntry>> {
        self.simulate("get_command_history", delay::GET_COMMAND_HISTORY)
            .await;
        let mut commands = self.state().fixtures.commands.clone();
        commands.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(commands)
    }

    async fn search_commands(&self, query: &str) -> ApiResult<Vec<CommandLogEntry>> {
        self.simulate("search_commands", delay::SEARCH_COMMANDS).await;
        let needle = query.to_lowercase();
        let mut commands: Vec<CommandLogEntry> = self
            .state()
            .fixtures
            .commands
            .iter()
            .filter(|c| contains_ignore_case(&c.command, &needle))
            .cloned()
            .collect();
        commands.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(commands)
    }

    async fn get_todos(&self) -> ApiResult<Vec<TodoItem>> {
        self.simulate("get_todos", delay::GET_TODOS).await;
        Ok(self
            .state()
            .fixtures
            .todos
            .iter()
            .map(|(_, todo)| todo.clone())
            .collect())
    }

    async fn get_settings(&self) -> ApiResult<ClaudeSettings> {
        self.simulate("get_settings", delay::GET_SETTINGS).await;
        Ok(self.state().fixtures.settings.clone())
    }

    async fn save_settings(&self, settings: &ClaudeSettings) -> ApiResult<()> {
        self.simulate("save_settings", delay::SAVE_SETTINGS).await;
        self.state().fixtures.settings = settings.clone();
        info!(
            "Mock settings saved ({} allow, {} deny, {} hook matchers)",
            settings.permissions.allow.len(),
            settings.permissions.deny.len(),
            settings.hooks.pre_tool_use.len()
        );
        Ok(())
    }

    async fn get_project_summary(&self) -> ApiResult<Vec<ProjectSummary>> {
        self.simulate("get_project_summary", delay::GET_PROJECT_SUMMARY)
            .await;
        let state = self.state();
        let mut open_todos: HashMap<String, usize> = HashMap::new();
        for (session, todo) in &state.fixtures.todos {
            if todo.status.is_open() {
                *open_todos.entry(session.clone()).or_default() += 1;
            }
        }
        Ok(stats::project_summaries(&state.fixtures.sessions, &open_todos))
    }

    async fn get_session_stats(&self) -> ApiResult<SessionStats> {
        self.simulate("get_session_stats", delay::GET_SESSION_STATS).await;
        let state = self.state();
        let todos: Vec<TodoItem> = state.fixtures.todos.iter().map(|(_, t)| t.clone()).collect();
        Ok(stats::session_stats(
            &state.fixtures.sessions,
            &state.fixtures.commands,
            &todos,
        ))
    }

    async fn export_session_data(&self, session_id: &str) -> ApiResult<String> {
        self.simulate("export_session_data", delay::EXPORT_SESSION_DATA)
            .await;
        let messages = Self::session_messages(&self.state(), session_id);
        Ok(serde_json::to_string_pretty(&messages)?)
    }

    async fn activate_ide_window(&self, ide_info: &IdeInfo) -> ApiResult<()> {
        self.simulate("activate_ide_window", delay::ACTIVATE_IDE_WINDOW)
            .await;
        info!(
            "Mock IDE activation: {} (pid {}, {:?})",
            ide_info.ide_name, ide_info.pid, ide_info.workspace_folders
        );
        Ok(())
    }

    async fn get_claude_directory_info(&self) -> ApiResult<ClaudeDirectoryInfo> {
        self.simulate("get_claude_directory_info", delay::GET_DIRECTORY_INFO)
            .await;
        let files = self.state().fixtures.files.clone();
        let total_size = files.iter().map(|f| f.size).sum();
        Ok(ClaudeDirectoryInfo {
            path: CLAUDE_DIR.to_string(),
            files,
            total_size,
        })
    }

    async fn read_claude_file(&self, path: &str) -> ApiResult<String> {
        self.simulate("read_claude_file", delay::READ_FILE).await;
        let state = self.state();
        if let Some(content) = state.written.get(path) {
            return Ok(content.clone());
        }
        Self::fixture_file(&state, path)
    }

    async fn write_claude_file(&self, path: &str, content: &str) -> ApiResult<()> {
        self.simulate("write_claude_file", delay::WRITE_FILE).await;
        {
            let mut state = self.state();
            state.written.insert(path.to_string(), content.to_string());

            let file_name = path.rsplit('/').next().unwrap_or(path);
            if let Some(stem) = file_name.strip_suffix(".jsonl") {
                let now = Utc::now();
                if let Some(session) = state
                    .fixtures
                    .sessions
                    .iter_mut()
                    .find(|s| s.session_id == stem)
                {
                    session.updated_at = now;
                    debug!("Mock write bumped session {}", stem);
                }
            }
        }
        self.notifier.notify(ChangeEvent {
            reason: "file written".to_string(),
            paths: vec![path.to_string()],
        });
        Ok(())
    }

    fn changes(&self) -> Subscription {
        self.notifier.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::MessageContent;

    fn api() -> MockApi {
        MockApi::new(Latency::None)
    }

    #[tokio::test]
    async fn test_sessions_newest_first() {
        let sessions = api().get_all_sessions().await.unwrap();
        assert_eq!(sessions.len(), 5);
        assert!(sessions.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
    }

    #[tokio::test]
    async fn test_session_messages_exclude_summaries() {
        let messages = api().get_session_messages("sess-web-001").await.unwrap();
        assert!(!messages.is_empty());
        assert!(messages.iter().all(|m| !m.is_summary()));
        assert!(messages.iter().all(|m| m.session_id() == Some("sess-web-001")));
    }

    #[tokio::test]
    async fn test_unknown_session_has_no_messages() {
        assert!(api().get_session_messages("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_sessions_matches_branch_case_insensitively() {
        let found = api().search_sessions("FEATURE/push").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].session_id, "sess-mob-001");
    }

    #[tokio::test]
    async fn test_search_commands_filters_by_text() {
        let found = api().search_commands("NPM").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.command.contains("npm")));
    }

    #[tokio::test]
    async fn test_settings_save_then_fetch() {
        let api = api();
        let mut settings = api.get_settings().await.unwrap();
        settings.permissions.deny.push("Bash(sudo:*)".to_string());
        api.save_settings(&settings).await.unwrap();
        assert_eq!(api.get_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_export_is_pretty_json_of_session_messages() {
        let json = api().export_session_data("sess-api-001").await.unwrap();
        assert!(json.starts_with("[\n  {"));
        let parsed: Vec<ClaudeMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 3);
        let ClaudeMessage::User(first) = &parsed[0] else {
            panic!("expected the user prompt first");
        };
        assert!(matches!(first.content, MessageContent::Text { .. }));
    }

    #[tokio::test]
    async fn test_changed_sessions_uses_watermark() {
        let api = api();
        assert_eq!(api.get_changed_sessions().await.unwrap().len(), 5);
        assert!(api.get_changed_sessions().await.unwrap().is_empty());

        let path = format!("{CLAUDE_DIR}/projects/-Users-demo-projects-api-server/sess-api-001.jsonl");
        api.write_claude_file(&path, "{}").await.unwrap();

        let changed = api.get_changed_sessions().await.unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].session_id, "sess-api-001");
    }

    #[tokio::test]
    async fn test_write_notifies_subscribers() {
        let api = api();
        let mut sub = api.changes();
        api.write_claude_file("~/.claude/CLAUDE.md", "# hi").await.unwrap();
        let event = sub.try_next().unwrap();
        assert_eq!(event.paths, vec!["~/.claude/CLAUDE.md"]);
        assert_eq!(api.read_claude_file("~/.claude/CLAUDE.md").await.unwrap(), "# hi");
    }

    #[tokio::test]
    async fn test_read_file_by_suffix() {
        let api = api();
        let settings = api.read_claude_file("~/.claude/settings.json").await.unwrap();
        assert!(settings.contains("\"defaultMode\": \"acceptEdits\""));

        let transcript = api
            .read_claude_file("~/.claude/projects/-Users-demo-projects-web-app/sess-web-001.jsonl")
            .await
            .unwrap();
        assert_eq!(transcript.lines().count(), 6);

        let todos = api.read_claude_file("~/.claude/todos/sess-web-002.json").await.unwrap();
        let parsed: Vec<TodoItem> = serde_json::from_str(&todos).unwrap();
        assert_eq!(parsed.len(), 2);

        let md = api.read_claude_file("~/.claude/CLAUDE.md").await.unwrap();
        assert!(md.starts_with("# "));

        let other = api.read_claude_file("~/.claude/scripts/audit-bash.sh").await.unwrap();
        assert!(other.contains("no preview"));
    }

    #[tokio::test]
    async fn test_project_summary_counts_open_todos() {
        let summaries = api().get_project_summary().await.unwrap();
        assert_eq!(summaries.len(), 4);
        let web = summaries
            .iter()
            .find(|s| s.project_path == "/Users/demo/projects/web-app")
            .unwrap();
        assert_eq!(web.session_count, 2);
        assert_eq!(web.active_todos, 2);
        assert_eq!(summaries[0].project_path, "/Users/demo/projects/web-app");
    }

    #[tokio::test]
    async fn test_session_stats() {
        let stats = api().get_session_stats().await.unwrap();
        assert_eq!(stats.total_sessions, 5);
        assert_eq!(stats.total_commands, 8);
        assert_eq!(stats.active_projects, 4);
        assert_eq!(stats.pending_todos, 4);
    }

    #[test]
    fn test_latency_names() {
        assert_eq!(Latency::from_name("None"), Some(Latency::None));
        assert_eq!(Latency::from_name("realistic"), Some(Latency::Realistic));
        assert_eq!(Latency::from_name("sometimes"), None);
    }
}
