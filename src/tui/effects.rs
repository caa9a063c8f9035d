//! Runs `Effect`s against the API on tokio tasks and sends the outcome back
//! to the event loop as an `Action`.

use std::sync::{Arc, mpsc};

use chrono::Local;
use log::{debug, info, warn};

use crate::api::client::ManagerApi;
use crate::core::action::{Action, Effect};
use crate::core::commands::CommandQuery;
use crate::core::export;

/// Spawn one effect. `Effect::Quit` is handled by the loop and never gets here.
pub fn spawn_effect(api: Arc<dyn ManagerApi>, effect: Effect, tx: mpsc::Sender<Action>) {
    info!("Spawning effect: {}", effect_name(&effect));
    tokio::spawn(async move {
        let name = effect_name(&effect);
        let Some(action) = perform(api.as_ref(), effect).await else {
            return;
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver result of {}: receiver dropped", name);
        }
    });
}

pub async fn perform(api: &dyn ManagerApi, effect: Effect) -> Option<Action> {
    let action = match effect {
        Effect::FetchSessions => Action::SessionsLoaded(api.get_all_sessions().await),
        Effect::FetchChangedSessions => {
            Action::ChangedSessionsLoaded(api.get_changed_sessions().await)
        }
        Effect::FetchMessages(session_id) => {
            Action::MessagesLoaded(api.get_session_messages(&session_id).await)
        }
        Effect::FetchCommands(CommandQuery::History) => {
            Action::CommandsLoaded(api.get_command_history().await)
        }
        Effect::FetchCommands(CommandQuery::Search(query)) => {
            Action::CommandsLoaded(api.search_commands(&query).await)
        }
        Effect::FetchTodos => Action::TodosLoaded(api.get_todos().await),
        Effect::FetchOverview => {
            let (stats, projects) =
                futures::join!(api.get_session_stats(), api.get_project_summary());
            Action::OverviewLoaded { stats, projects }
        }
        Effect::FetchSettings => Action::SettingsLoaded(api.get_settings().await),
        Effect::SaveSettings(draft) => Action::SettingsSaved(api.save_settings(&draft).await),
        Effect::FetchDirectory => Action::DirectoryLoaded(api.get_claude_directory_info().await),
        Effect::FetchFile(path) => Action::FileLoaded(api.read_claude_file(&path).await),
        Effect::TouchFile { path, content } => {
            Action::FileTouched(api.write_claude_file(&path, &content).await)
        }
        Effect::Export { session_id, dir } => {
            let result = match api.export_session_data(&session_id).await {
                Ok(json) => export::write_export(&dir, Local::now().date_naive(), &json)
                    .map_err(|e| format!("could not write export: {e}")),
                Err(e) => Err(e.to_string()),
            };
            Action::ExportFinished(result)
        }
        Effect::ActivateIde(info) => Action::IdeActivated(api.activate_ide_window(&info).await),
        Effect::Quit => return None,
    };
    debug!("Effect finished: {:?}", action_name(&action));
    Some(action)
}

fn effect_name(effect: &Effect) -> &'static str {
    match effect {
        Effect::FetchSessions => "fetch_sessions",
        Effect::FetchChangedSessions => "fetch_changed_sessions",
        Effect::FetchMessages(_) => "fetch_messages",
        Effect::FetchCommands(_) => "fetch_commands",
        Effect::FetchTodos => "fetch_todos",
        Effect::FetchOverview => "fetch_overview",
        Effect::FetchSettings => "fetch_settings",
        Effect::SaveSettings(_) => "save_settings",
        Effect::FetchDirectory => "fetch_directory",
        Effect::FetchFile(_) => "fetch_file",
        Effect::TouchFile { .. } => "touch_file",
        Effect::Export { .. } => "export",
        Effect::ActivateIde(_) => "activate_ide",
        Effect::Quit => "quit",
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::SessionsLoaded(_) => "SessionsLoaded",
        Action::ChangedSessionsLoaded(_) => "ChangedSessionsLoaded",
        Action::MessagesLoaded(_) => "MessagesLoaded",
        Action::CommandsLoaded(_) => "CommandsLoaded",
        Action::TodosLoaded(_) => "TodosLoaded",
        Action::OverviewLoaded { .. } => "OverviewLoaded",
        Action::SettingsLoaded(_) => "SettingsLoaded",
        Action::SettingsSaved(_) => "SettingsSaved",
        Action::DirectoryLoaded(_) => "DirectoryLoaded",
        Action::FileLoaded(_) => "FileLoaded",
        Action::FileTouched(_) => "FileTouched",
        Action::ExportFinished(_) => "ExportFinished",
        Action::IdeActivated(_) => "IdeActivated",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Latency, MockApi};
    use crate::Tab;
    use crate::core::action::update;
    use crate::core::settings_editor::SettingsEdit;
    use crate::core::state::App;
    use crate::test_support::{FailingApi, RecordingApi};

    /// Feed `action` through `update` and run every resulting effect to completion.
    async fn settle(api: &dyn ManagerApi, app: &mut App, action: Action) {
        let mut pending = update(app, action);
        while !pending.is_empty() {
            let effect = pending.remove(0);
            if let Some(action) = perform(api, effect).await {
                pending.extend(update(app, action));
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_sessions_from_mock() {
        let api = MockApi::new(Latency::None);
        let action = perform(&api, Effect::FetchSessions).await;
        assert!(matches!(action, Some(Action::SessionsLoaded(Ok(s))) if !s.is_empty()));
    }

    #[tokio::test]
    async fn test_command_query_routes_to_search() {
        let api = MockApi::new(Latency::None);
        let Some(Action::CommandsLoaded(Ok(entries))) =
            perform(&api, Effect::FetchCommands(CommandQuery::Search("npm".into()))).await
        else {
            panic!("expected CommandsLoaded");
        };
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| e.command.to_lowercase().contains("npm")));
    }

    #[tokio::test]
    async fn test_overview_fetches_both_halves() {
        let api = MockApi::new(Latency::None);
        let action = perform(&api, Effect::FetchOverview).await;
        assert!(matches!(
            action,
            Some(Action::OverviewLoaded { stats: Ok(_), projects: Ok(_) })
        ));
    }

    #[tokio::test]
    async fn test_failures_come_back_as_errors() {
        let api = FailingApi::new();
        let action = perform(&api, Effect::FetchTodos).await;
        assert!(matches!(action, Some(Action::TodosLoaded(Err(_)))));
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let api = MockApi::new(Latency::None);
        let dir = tempfile::tempdir().unwrap();
        let action = perform(
            &api,
            Effect::Export {
                session_id: "sess-web-001".into(),
                dir: dir.path().to_path_buf(),
            },
        )
        .await;
        let Some(Action::ExportFinished(Ok(path))) = action else {
            panic!("expected a successful export, got {action:?}");
        };
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
    }

    #[tokio::test]
    async fn test_settings_save_sends_one_full_object() {
        let api = RecordingApi::new();
        let mut app = App::new(api.name());
        settle(&api, &mut app, Action::SelectTab(Tab::Settings)).await;
        settle(&api, &mut app, Action::StartEditSettings).await;
        for edit in [
            SettingsEdit::AddAllow("Bash(cargo test:*)".into()),
            SettingsEdit::RemoveDeny(0),
            SettingsEdit::CycleDefaultMode,
            SettingsEdit::AddHook {
                matcher: "Bash".into(),
                command: "echo checked".into(),
            },
        ] {
            settle(&api, &mut app, Action::EditSettings(edit)).await;
        }
        let draft = app.settings.current().cloned().unwrap();
        assert!(api.saved().is_empty());

        settle(&api, &mut app, Action::SaveSettings).await;
        assert_eq!(api.saved(), vec![draft.clone()]);
        assert_eq!(api.get_settings().await.unwrap(), draft);
        assert_eq!(app.settings.loaded.as_ref(), Some(&draft));
    }

    #[tokio::test]
    async fn test_quit_produces_nothing() {
        let api = MockApi::new(Latency::None);
        assert!(perform(&api, Effect::Quit).await.is_none());
    }

    #[tokio::test]
    async fn test_spawned_effect_reports_back() {
        let api: Arc<dyn ManagerApi> = Arc::new(MockApi::new(Latency::None));
        let (tx, rx) = mpsc::channel();
        spawn_effect(api, Effect::FetchSettings, tx);
        let action = tokio::task::spawn_blocking(move || rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(action, Action::SettingsLoaded(Ok(_))));
    }
}
