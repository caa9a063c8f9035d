//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::client::{ApiError, ApiResult, ManagerApi};
use crate::api::mock::{Latency, MockApi};
use crate::api::notify::{ChangeNotifier, Subscription};
use crate::api::types::{
    ChatMessage, ClaudeDirectoryInfo, ClaudeMessage, ClaudeSession, ClaudeSettings,
    CommandLogEntry, ContentBlock, IdeInfo, MessageContent, ProcessingStatus, ProjectSummary,
    SessionStats, TodoItem,
};

/// 2025-07-20T12:00:00Z
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_753_012_800, 0).unwrap()
}

pub fn session(
    id: &str,
    project_path: &str,
    branch: Option<&str>,
    message_count: usize,
) -> ClaudeSession {
    ClaudeSession {
        session_id: id.to_string(),
        project_path: project_path.to_string(),
        created_at: fixed_time(),
        updated_at: fixed_time(),
        message_count,
        git_branch: branch.map(str::to_string),
        latest_content_preview: None,
        ide_info: None,
        is_processing: false,
    }
}

pub fn command(cmd: &str) -> CommandLogEntry {
    CommandLogEntry {
        timestamp: fixed_time(),
        user: "tester".to_string(),
        command: cmd.to_string(),
        cwd: None,
    }
}

fn chat(session_id: &str, content: MessageContent) -> ChatMessage {
    ChatMessage {
        uuid: format!("{session_id}-msg"),
        parent_uuid: None,
        session_id: session_id.to_string(),
        timestamp: fixed_time(),
        cwd: "/tmp".to_string(),
        git_branch: None,
        processing_status: ProcessingStatus::Completed,
        stop_reason: None,
        content,
    }
}

pub fn user_text(session_id: &str, text: &str) -> ClaudeMessage {
    ClaudeMessage::User(chat(
        session_id,
        MessageContent::Text {
            role: "user".to_string(),
            content: text.to_string(),
        },
    ))
}

pub fn assistant_blocks(session_id: &str, blocks: Vec<ContentBlock>) -> ClaudeMessage {
    ClaudeMessage::Assistant(chat(
        session_id,
        MessageContent::Blocks {
            role: "assistant".to_string(),
            content: blocks,
        },
    ))
}

pub fn assistant_text(session_id: &str, text: &str) -> ClaudeMessage {
    assistant_blocks(
        session_id,
        vec![ContentBlock::Text {
            text: text.to_string(),
        }],
    )
}

/// A provider where every call fails, for error-panel paths.
pub struct FailingApi {
    notifier: ChangeNotifier,
}

impl FailingApi {
    pub fn new() -> Self {
        Self {
            notifier: ChangeNotifier::new(),
        }
    }

    fn fail<T>() -> ApiResult<T> {
        Err(ApiError::Network("connection refused".to_string()))
    }
}

#[async_trait]
impl ManagerApi for FailingApi {
    fn name(&self) -> &str {
        "failing"
    }
    async fn get_all_sessions(&self) -> ApiResult<Vec<ClaudeSession>> {
        Self::fail()
    }
    async fn get_changed_sessions(&self) -> ApiResult<Vec<ClaudeSession>> {
        Self::fail()
    }
    async fn get_session_messages(&self, _session_id: &str) -> ApiResult<Vec<ClaudeMessage>> {
        Self::fail()
    }
    async fn search_sessions(&self, _query: &str) -> ApiResult<Vec<ClaudeSession>> {
        Self::fail()
    }
    async fn get_command_history(&self) -> ApiResult<Vec<CommandLogEntry>> {
        Self::fail()
    }
    async fn search_commands(&self, _query: &str) -> ApiResult<Vec<CommandLogEntry>> {
        Self::fail()
    }
    async fn get_todos(&self) -> ApiResult<Vec<TodoItem>> {
        Self::fail()
    }
    async fn get_settings(&self) -> ApiResult<ClaudeSettings> {
        Self::fail()
    }
    async fn save_settings(&self, _settings: &ClaudeSettings) -> ApiResult<()> {
        Err(ApiError::Rejected("settings are read-only".to_string()))
    }
    async fn get_project_summary(&self) -> ApiResult<Vec<ProjectSummary>> {
        Self::fail()
    }
    async fn get_session_stats(&self) -> ApiResult<SessionStats> {
        Self::fail()
    }
    async fn export_session_data(&self, session_id: &str) -> ApiResult<String> {
        Err(ApiError::NotFound(session_id.to_string()))
    }
    async fn activate_ide_window(&self, _ide_info: &IdeInfo) -> ApiResult<()> {
        Self::fail()
    }
    async fn get_claude_directory_info(&self) -> ApiResult<ClaudeDirectoryInfo> {
        Self::fail()
    }
    async fn read_claude_file(&self, path: &str) -> ApiResult<String> {
        Err(ApiError::NotFound(path.to_string()))
    }
    async fn write_claude_file(&self, _path: &str, _content: &str) -> ApiResult<()> {
        Self::fail()
    }
    fn changes(&self) -> Subscription {
        self.notifier.subscribe()
    }
}

/// The mock backend, plus a log of every settings object it was asked to save.
pub struct RecordingApi {
    inner: MockApi,
    saved: Mutex<Vec<ClaudeSettings>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            inner: MockApi::new(Latency::None),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn saved(&self) -> Vec<ClaudeSettings> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ManagerApi for RecordingApi {
    fn name(&self) -> &str {
        "recording"
    }
    async fn get_all_sessions(&self) -> ApiResult<Vec<ClaudeSession>> {
        self.inner.get_all_sessions().await
    }
    async fn get_changed_sessions(&self) -> ApiResult<Vec<ClaudeSession>> {
        self.inner.get_changed_sessions().await
    }
    async fn get_session_messages(&self, session_id: &str) -> ApiResult<Vec<ClaudeMessage>> {
        self.inner.get_session_messages(session_id).await
    }
    async fn search_sessions(&self, query: &str) -> ApiResult<Vec<ClaudeSession>> {
        self.inner.search_sessions(query).await
    }
    async fn get_command_history(&self) -> ApiResult<Vec<CommandLogEntry>> {
        self.inner.get_command_history().await
    }
    async fn search_commands(&self, query: &str) -> ApiResult<Vec<CommandLogEntry>> {
        self.inner.search_commands(query).await
    }
    async fn get_todos(&self) -> ApiResult<Vec<TodoItem>> {
        self.inner.get_todos().await
    }
    async fn get_settings(&self) -> ApiResult<ClaudeSettings> {
        self.inner.get_settings().await
    }
    async fn save_settings(&self, settings: &ClaudeSettings) -> ApiResult<()> {
        self.saved.lock().unwrap().push(settings.clone());
        self.inner.save_settings(settings).await
    }
    async fn get_project_summary(&self) -> ApiResult<Vec<ProjectSummary>> {
        self.inner.get_project_summary().await
    }
    async fn get_session_stats(&self) -> ApiResult<SessionStats> {
        self.inner.get_session_stats().await
    }
    async fn export_session_data(&self, session_id: &str) -> ApiResult<String> {
        self.inner.export_session_data(session_id).await
    }
    async fn activate_ide_window(&self, ide_info: &IdeInfo) -> ApiResult<()> {
        self.inner.activate_ide_window(ide_info).await
    }
    async fn get_claude_directory_info(&self) -> ApiResult<ClaudeDirectoryInfo> {
        self.inner.get_claude_directory_info().await
    }
    async fn read_claude_file(&self, path: &str) -> ApiResult<String> {
        self.inner.read_claude_file(path).await
    }
    async fn write_claude_file(&self, path: &str, content: &str) -> ApiResult<()> {
        self.inner.write_claude_file(path, content).await
    }
    fn changes(&self) -> Subscription {
        self.inner.changes()
    }
}
