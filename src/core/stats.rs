//! Aggregates over fetched collections: per-project summaries and the
//! dashboard-wide counters.

use std::collections::{HashMap, HashSet};

use crate::api::types::{ClaudeSession, CommandLogEntry, ProjectSummary, SessionStats, TodoItem};
use crate::core::path::normalize_project_path;

/// Group sessions by (normalized) project path, most recently active first.
///
/// `open_todos` maps a session id to its count of unfinished to-dos; projects
/// sum the counts of their sessions.
pub fn project_summaries(
    sessions: &[ClaudeSession],
    open_todos: &HashMap<String, usize>,
) -> Vec<ProjectSummary> {
    let mut by_project: HashMap<String, ProjectSummary> = HashMap::new();
    // Tracks which session supplied `latest_message` so newer ones replace it.
    let mut latest_at: HashMap<String, chrono::DateTime<chrono::Utc>> = HashMap::new();

    for session in sessions {
        let path = normalize_project_path(&session.project_path);
        let entry = by_project
            .entry(path.clone())
            .or_insert_with(|| ProjectSummary {
                project_path: path.clone(),
                session_count: 0,
                last_activity: session.updated_at,
                total_messages: 0,
                active_todos: 0,
                latest_message: None,
            });

        entry.session_count += 1;
        entry.total_messages += session.message_count;
        entry.active_todos += open_todos.get(&session.session_id).copied().unwrap_or(0);
        if session.updated_at > entry.last_activity {
            entry.last_activity = session.updated_at;
        }

        let newer = latest_at
            .get(&path)
            .is_none_or(|seen| session.updated_at > *seen);
        if newer && session.latest_content_preview.is_some() {
            entry.latest_message = session.latest_content_preview.clone();
            latest_at.insert(path, session.updated_at);
        }
    }

    let mut summaries: Vec<ProjectSummary> = by_project.into_values().collect();
    summaries.sort_by(|a, b| {
        b.last_activity
            .cmp(&a.last_activity)
            .then_with(|| a.project_path.cmp(&b.project_path))
    });
    summaries
}

pub fn session_stats(
    sessions: &[ClaudeSession],
    commands: &[CommandLogEntry],
    todos: &[TodoItem],
) -> SessionStats {
    let active_projects = sessions
        .iter()
        .map(|s| normalize_project_path(&s.project_path))
        .collect::<HashSet<_>>()
        .len();

    SessionStats {
        total_sessions: sessions.len(),
        total_messages: sessions.iter().map(|s| s.message_count).sum(),
        total_commands: commands.len(),
        active_projects,
        pending_todos: todos.iter().filter(|t| t.status.is_open()).count(),
    }
}
