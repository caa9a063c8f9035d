//! # Application State
//!
//! Core dashboard state. Domain logic only, no TUI-specific types;
//! presentation state (list cursors, scroll offsets, text inputs) lives in
//! the `tui` module.
//!
//! ```text
//! App
//! ├── tab: Tab                       // active tab
//! ├── overview: Overview             // stats + project summaries
//! ├── sessions: SessionBrowser       // session list, filters, transcript
//! ├── commands: CommandBrowser       // debounced command search
//! ├── todos: TodoList                // to-dos with status filter
//! ├── settings: SettingsEditor       // view / edit / save state machine
//! ├── files: FileBrowser             // ~/.claude listing + preview
//! ├── render_options: RenderOptions  // markdown on/off
//! ├── export_dir: PathBuf            // where exports are written
//! ├── source_name: String            // data source shown in the title bar
//! └── status_message: String         // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::path::PathBuf;

use crate::Tab;
use crate::core::browser::SessionBrowser;
use crate::core::classify::RenderOptions;
use crate::core::commands::CommandBrowser;
use crate::core::config::ResolvedConfig;
use crate::core::files::FileBrowser;
use crate::core::overview::Overview;
use crate::core::settings_editor::SettingsEditor;
use crate::core::todos::TodoList;

pub struct App {
    pub tab: Tab,
    pub overview: Overview,
    pub sessions: SessionBrowser,
    pub commands: CommandBrowser,
    pub todos: TodoList,
    pub settings: SettingsEditor,
    pub files: FileBrowser,
    pub render_options: RenderOptions,
    pub export_dir: PathBuf,
    pub source_name: String,
    pub status_message: String,
}

impl App {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            tab: Tab::default(),
            overview: Overview::default(),
            sessions: SessionBrowser::new(),
            commands: CommandBrowser::default(),
            todos: TodoList::default(),
            settings: SettingsEditor::default(),
            files: FileBrowser::default(),
            render_options: RenderOptions::default(),
            export_dir: PathBuf::from("."),
            source_name: source_name.into(),
            status_message: String::from("Welcome to ccmanager"),
        }
    }

    pub fn from_config(source_name: impl Into<String>, config: &ResolvedConfig) -> Self {
        Self {
            tab: config.initial_tab,
            commands: CommandBrowser::new(config.command_search_debounce),
            render_options: RenderOptions {
                render_markdown: config.render_markdown,
            },
            export_dir: config.export_dir.clone(),
            ..Self::new(source_name)
        }
    }

    /// Whether the active tab is waiting on a fetch.
    pub fn is_loading(&self) -> bool {
        match self.tab {
            Tab::Overview => self.overview.loading,
            Tab::Sessions => self.sessions.loading || self.sessions.messages_loading,
            Tab::Commands => self.commands.loading || self.commands.search_pending(),
            Tab::Todos => self.todos.loading,
            Tab::Settings => self.settings.loading || self.settings.is_saving(),
            Tab::Files => self.files.loading || self.files.content_loading,
        }
    }

    /// Error text of the active tab's main fetch, if it failed.
    pub fn active_error(&self) -> Option<&str> {
        match self.tab {
            Tab::Overview => self.overview.error.as_deref(),
            Tab::Sessions => self.sessions.error.as_deref(),
            Tab::Commands => self.commands.error.as_deref(),
            Tab::Todos => self.todos.error.as_deref(),
            Tab::Settings => self.settings.error.as_deref(),
            Tab::Files => self.files.error.as_deref(),
        }
    }
}
