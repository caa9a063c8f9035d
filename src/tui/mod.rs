//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the dashboard,
//! and translates keyboard events into `core::Action` values. Effects
//! returned by `update()` are run against the `ManagerApi` on tokio tasks
//! (see `effects`).
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Key routing
//!
//! 1. Ctrl+C always quits.
//! 2. While a search box or settings prompt has focus, every key goes to it.
//! 3. Otherwise `q` quits, `r` refreshes, Tab/Shift+Tab/Home/End/1-6 switch
//!    tabs, and everything else goes to the active view.
//!
//! ## Redraw Strategy
//!
//! - **Loading** (any fetch in flight, or a command search waiting out its
//!   debounce): draws every ~80ms so the spinner moves and ticks arrive in
//!   time.
//! - **Idle**: sleeps up to 250ms, only redraws on input, API results or
//!   external change notifications.

mod component;
mod components;
pub mod effects;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::Tab;
use crate::api::client::ManagerApi;
use crate::api::mock::MockApi;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::TabsState;
use crate::tui::components::command_list::CommandListState;
use crate::tui::components::file_browser::{FileBrowserEvent, FileBrowserState};
use crate::tui::components::overview::OverviewState;
use crate::tui::components::session_list::{SessionListEvent, SessionListState};
use crate::tui::components::settings_panel::{SettingsPanelEvent, SettingsPanelState};
use crate::tui::components::todo_list::{TodoListEvent, TodoListState};
use crate::tui::effects::spawn_effect;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub tabs: TabsState,
    pub overview: OverviewState,
    pub sessions: SessionListState,
    pub commands: CommandListState,
    pub todos: TodoListState,
    pub settings: SettingsPanelState,
    pub files: FileBrowserState,
}

impl TuiState {
    pub fn new(initial_tab: Tab) -> Self {
        Self {
            tabs: TabsState::new(initial_tab),
            overview: OverviewState::default(),
            sessions: SessionListState::new(),
            commands: CommandListState::default(),
            todos: TodoListState::default(),
            settings: SettingsPanelState::default(),
            files: FileBrowserState::default(),
        }
    }

    /// Whether the active view owns the keyboard.
    fn is_typing(&self, tab: Tab) -> bool {
        match tab {
            Tab::Sessions => self.sessions.is_typing(),
            Tab::Commands => self.commands.is_typing(),
            Tab::Settings => self.settings.is_typing(),
            Tab::Overview | Tab::Todos | Tab::Files => false,
        }
    }
}

/// Route one input event. Returns the action it stands for, if any.
pub fn dispatch(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        _ => {}
    }
    if app.tab == Tab::Settings {
        tui.settings.sync(&app.settings);
    }
    if tui.is_typing(app.tab) {
        return view_event(app, tui, event);
    }

    match event {
        TuiEvent::Char('q') => return Some(Action::Quit),
        TuiEvent::Char('r') => return Some(Action::Refresh),
        _ => {}
    }
    if tui.tabs.selected() != app.tab {
        tui.tabs = TabsState::new(app.tab);
    }
    if let Some(tab) = tui.tabs.handle_event(event) {
        return Some(Action::SelectTab(tab));
    }
    // An error panel only answers to the global keys above
    if app.active_error().is_some() {
        return None;
    }
    view_event(app, tui, event)
}

fn view_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match app.tab {
        Tab::Overview => {
            tui.overview.handle_event(event);
            None
        }
        Tab::Sessions => Some(match tui.sessions.handle_event(event)? {
            SessionListEvent::Search(query) => Action::SetSessionSearch(query),
            SessionListEvent::Select(id) => Action::SelectSession(id),
            SessionListEvent::Back => Action::ClearSelection,
            SessionListEvent::CycleProject => Action::CycleProjectFilter,
            SessionListEvent::CycleMessages => Action::CycleMessageFilter,
            SessionListEvent::Export => Action::ExportSelected,
            SessionListEvent::ActivateIde => Action::ActivateIde,
        }),
        Tab::Commands => {
            let changed = tui.commands.handle_event(event)?;
            Some(Action::SetCommandQuery {
                query: changed.query,
                at: changed.at,
            })
        }
        Tab::Todos => match tui.todos.handle_event(event)? {
            TodoListEvent::CycleFilter => Some(Action::CycleTodoFilter),
        },
        Tab::Settings => Some(match tui.settings.handle_event(event)? {
            SettingsPanelEvent::StartEdit => Action::StartEditSettings,
            SettingsPanelEvent::Cancel => Action::CancelEditSettings,
            SettingsPanelEvent::Save => Action::SaveSettings,
            SettingsPanelEvent::Edit(edit) => Action::EditSettings(edit),
        }),
        Tab::Files => Some(match tui.files.handle_event(event)? {
            FileBrowserEvent::Select(path) => Action::SelectFile(path),
            FileBrowserEvent::Touch => Action::TouchSelectedFile,
        }),
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets a bare Esc arrive without delay;
        // terminals that lack it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let api: Arc<dyn ManagerApi> = Arc::new(MockApi::new(config.latency));
    let mut app = App::from_config(api.name(), &config);
    let mut tui = TuiState::new(app.tab);
    let mut changes = api.changes();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from effect tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    // Mount the initial tab
    let initial_tab = app.tab;
    let mut pending = update(&mut app, Action::SelectTab(initial_tab));

    'main: loop {
        for effect in pending.drain(..) {
            if effect == Effect::Quit {
                break 'main;
            }
            spawn_effect(Arc::clone(&api), effect, tx.clone());
        }

        let animating = app.is_loading();
        if animating {
            needs_redraw = true;
        }
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }
        // Drain all pending input before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = dispatch(&app, &mut tui, &event) {
                debug!("Input action: {:?}", action);
                pending.extend(update(&mut app, action));
            }
        }

        pending.extend(update(&mut app, Action::Tick(Instant::now())));

        if let Some(change) = changes.drain() {
            needs_redraw = true;
            pending.extend(update(&mut app, Action::ExternalChange(change)));
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            pending.extend(update(&mut app, action));
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}
