//! # Actions
//!
//! Everything that can happen in the dashboard becomes an `Action`.
//! User switches tab? That's `Action::SelectTab(tab)`.
//! The API answers? That's `Action::SessionsLoaded(result)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the effects to perform. No side effects here. I/O
//! happens in the TUI, which runs each `Effect` against the API and feeds the
//! answer back in as another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + [Effect]
//!                                               │
//!                      Action ◀── ManagerApi ◀──┘
//! ```

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info, warn};

use crate::Tab;
use crate::api::client::ApiResult;
use crate::api::types::{
    ChangeEvent, ClaudeDirectoryInfo, ClaudeMessage, ClaudeSession, ClaudeSettings,
    CommandLogEntry, IdeInfo, ProjectSummary, SessionStats, TodoItem,
};
use crate::core::commands::CommandQuery;
use crate::core::settings_editor::SettingsEdit;
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    // Navigation
    SelectTab(Tab),
    /// Reload the active tab (also the retry for error panels).
    Refresh,
    Quit,
    Tick(Instant),
    ExternalChange(ChangeEvent),

    // Sessions
    SelectSession(String),
    ClearSelection,
    SetSessionSearch(String),
    CycleProjectFilter,
    CycleMessageFilter,
    ExportSelected,
    ActivateIde,
    SessionsLoaded(ApiResult<Vec<ClaudeSession>>),
    ChangedSessionsLoaded(ApiResult<Vec<ClaudeSession>>),
    MessagesLoaded(ApiResult<Vec<ClaudeMessage>>),
    ExportFinished(Result<PathBuf, String>),
    IdeActivated(ApiResult<()>),

    // Commands
    SetCommandQuery { query: String, at: Instant },
    CommandsLoaded(ApiResult<Vec<CommandLogEntry>>),

    // Todos
    CycleTodoFilter,
    TodosLoaded(ApiResult<Vec<TodoItem>>),

    // Overview
    OverviewLoaded {
        stats: ApiResult<SessionStats>,
        projects: ApiResult<Vec<ProjectSummary>>,
    },

    // Settings
    StartEditSettings,
    CancelEditSettings,
    EditSettings(SettingsEdit),
    SaveSettings,
    SettingsLoaded(ApiResult<ClaudeSettings>),
    SettingsSaved(ApiResult<()>),

    // Files
    SelectFile(String),
    TouchSelectedFile,
    DirectoryLoaded(ApiResult<ClaudeDirectoryInfo>),
    FileLoaded(ApiResult<String>),
    FileTouched(ApiResult<()>),
}

/// Work for the adapter to perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchSessions,
    FetchChangedSessions,
    FetchMessages(String),
    FetchCommands(CommandQuery),
    FetchTodos,
    FetchOverview,
    FetchSettings,
    SaveSettings(ClaudeSettings),
    FetchDirectory,
    FetchFile(String),
    TouchFile { path: String, content: String },
    Export { session_id: String, dir: PathBuf },
    ActivateIde(IdeInfo),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::SelectTab(tab) => {
            debug!("Tab: {:?} -> {:?}", app.tab, tab);
            app.tab = tab;
            load_active_tab(app)
        }
        Action::Refresh => load_active_tab(app),
        Action::Quit => vec![Effect::Quit],
        Action::Tick(now) => app
            .commands
            .poll(now)
            .map(Effect::FetchCommands)
            .into_iter()
            .collect(),
        Action::ExternalChange(event) => {
            info!("External change: {} ({} paths)", event.reason, event.paths.len());
            app.status_message = format!("Change detected: {}", event.reason);
            let mut effects = vec![Effect::FetchChangedSessions];
            if app.tab == Tab::Files {
                effects.push(Effect::FetchDirectory);
            }
            effects
        }

        // ====================================================================
        // Sessions
        // ====================================================================
        Action::SelectSession(session_id) => {
            app.sessions.select(&session_id);
            vec![Effect::FetchMessages(session_id)]
        }
        Action::ClearSelection => {
            app.sessions.clear_selection();
            Vec::new()
        }
        Action::SetSessionSearch(search) => {
            app.sessions.search = search;
            Vec::new()
        }
        Action::CycleProjectFilter => {
            app.sessions.cycle_project_filter();
            app.status_message = match &app.sessions.project_filter {
                Some(project) => format!("Project: {project}"),
                None => "Project: all".to_string(),
            };
            Vec::new()
        }
        Action::CycleMessageFilter => {
            app.sessions.type_filter = app.sessions.type_filter.next();
            app.status_message = format!("Messages: {}", app.sessions.type_filter.label());
            Vec::new()
        }
        Action::ExportSelected => match app.sessions.selected.clone() {
            Some(session_id) => {
                app.status_message = format!("Exporting {session_id}...");
                vec![Effect::Export {
                    session_id,
                    dir: app.export_dir.clone(),
                }]
            }
            None => {
                app.status_message = "Select a session to export".to_string();
                Vec::new()
            }
        },
        Action::ActivateIde => {
            let ide_info = app
                .sessions
                .selected_session()
                .and_then(|s| s.ide_info.clone());
            match ide_info {
                Some(info) => {
                    app.status_message = format!("Activating {}...", info.ide_name);
                    vec![Effect::ActivateIde(info)]
                }
                None => {
                    app.status_message = "No IDE window for this session".to_string();
                    Vec::new()
                }
            }
        }
        Action::SessionsLoaded(result) => {
            report_failure(app, "Loading sessions", &result);
            app.sessions.apply_sessions(result);
            Vec::new()
        }
        Action::ChangedSessionsLoaded(Ok(changed)) => {
            debug!("Selective refresh: {} changed sessions", changed.len());
            let selected_changed = app.sessions.merge_changed(changed);
            match app.sessions.selected.clone() {
                // Quiet re-fetch: the old transcript stays visible meanwhile.
                Some(session_id) if selected_changed => vec![Effect::FetchMessages(session_id)],
                _ => Vec::new(),
            }
        }
        Action::ChangedSessionsLoaded(Err(e)) => {
            warn!("Selective refresh failed: {}", e);
            app.status_message = format!("Refresh failed: {e}");
            Vec::new()
        }
        Action::MessagesLoaded(result) => {
            report_failure(app, "Loading messages", &result);
            app.sessions.apply_messages(result);
            Vec::new()
        }
        Action::ExportFinished(Ok(path)) => {
            app.status_message = format!("Exported to {}", path.display());
            Vec::new()
        }
        Action::ExportFinished(Err(e)) => {
            warn!("Export failed: {}", e);
            app.status_message = format!("Export failed: {e}");
            Vec::new()
        }
        Action::IdeActivated(result) => {
            app.status_message = match result {
                Ok(()) => "IDE window activated".to_string(),
                Err(e) => format!("IDE activation failed: {e}"),
            };
            Vec::new()
        }

        // ====================================================================
        // Commands
        // ====================================================================
        Action::SetCommandQuery { query, at } => {
            app.commands.set_query(query, at);
            Vec::new()
        }
        Action::CommandsLoaded(result) => {
            report_failure(app, "Loading commands", &result);
            app.commands.apply(result);
            Vec::new()
        }

        // ====================================================================
        // Todos and overview
        // ====================================================================
        Action::CycleTodoFilter => {
            app.todos.cycle_filter();
            app.status_message = format!("Todos: {}", app.todos.filter_label());
            Vec::new()
        }
        Action::TodosLoaded(result) => {
            report_failure(app, "Loading todos", &result);
            app.todos.apply(result);
            Vec::new()
        }
        Action::OverviewLoaded { stats, projects } => {
            report_failure(app, "Loading stats", &stats);
            report_failure(app, "Loading projects", &projects);
            app.overview.apply(stats, projects);
            Vec::new()
        }

        // ====================================================================
        // Settings
        // ====================================================================
        Action::StartEditSettings => {
            if app.settings.start_edit() {
                app.status_message = "Editing settings".to_string();
            }
            Vec::new()
        }
        Action::CancelEditSettings => {
            app.settings.cancel();
            app.status_message = "Edit cancelled".to_string();
            Vec::new()
        }
        Action::EditSettings(edit) => {
            debug!("Settings edit: {:?}", edit);
            app.settings.edit(edit);
            Vec::new()
        }
        Action::SaveSettings => match app.settings.begin_save() {
            Some(draft) => {
                app.status_message = "Saving settings...".to_string();
                vec![Effect::SaveSettings(draft)]
            }
            None => {
                app.status_message = "No changes to save".to_string();
                Vec::new()
            }
        },
        Action::SettingsSaved(result) => {
            if app.settings.save_finished(result) {
                app.status_message = "Settings saved".to_string();
                app.settings.begin_load();
                vec![Effect::FetchSettings]
            } else {
                app.status_message = "Save failed".to_string();
                Vec::new()
            }
        }
        Action::SettingsLoaded(result) => {
            report_failure(app, "Loading settings", &result);
            app.settings.apply_loaded(result);
            Vec::new()
        }

        // ====================================================================
        // Files
        // ====================================================================
        Action::SelectFile(path) => {
            if app.files.select(&path) {
                vec![Effect::FetchFile(path)]
            } else {
                Vec::new()
            }
        }
        Action::TouchSelectedFile => match app.files.touch_target() {
            Some((path, content)) => {
                app.status_message = format!("Rewriting {path}...");
                vec![Effect::TouchFile { path, content }]
            }
            None => {
                app.status_message = "Select a file first".to_string();
                Vec::new()
            }
        },
        Action::DirectoryLoaded(result) => {
            report_failure(app, "Loading directory", &result);
            app.files.apply_directory(result);
            Vec::new()
        }
        Action::FileLoaded(result) => {
            report_failure(app, "Reading file", &result);
            app.files.apply_content(result);
            Vec::new()
        }
        Action::FileTouched(result) => {
            app.status_message = match result {
                Ok(()) => "File rewritten".to_string(),
                Err(e) => format!("Write failed: {e}"),
            };
            Vec::new()
        }
    }
}

/// Start the fetches the active tab needs on mount or refresh.
fn load_active_tab(app: &mut App) -> Vec<Effect> {
    match app.tab {
        Tab::Overview => {
            app.overview.begin_load();
            vec![Effect::FetchOverview]
        }
        Tab::Sessions => {
            app.sessions.begin_load();
            let mut effects = vec![Effect::FetchSessions];
            if let Some(session_id) = app.sessions.selected.clone() {
                app.sessions.messages_loading = true;
                effects.push(Effect::FetchMessages(session_id));
            }
            effects
        }
        Tab::Commands => vec![Effect::FetchCommands(app.commands.load_now())],
        Tab::Todos => {
            app.todos.begin_load();
            vec![Effect::FetchTodos]
        }
        Tab::Settings => {
            app.settings.begin_load();
            vec![Effect::FetchSettings]
        }
        Tab::Files => {
            app.files.begin_load();
            vec![Effect::FetchDirectory]
        }
    }
}

fn report_failure<T>(app: &mut App, what: &str, result: &ApiResult<T>) {
    if let Err(e) = result {
        warn!("{} failed: {}", what, e);
        app.status_message = format!("{what} failed");
    }
}
