use crate::Tab;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::command_list::CommandList;
use crate::tui::components::file_browser::FileBrowserView;
use crate::tui::components::overview::OverviewView;
use crate::tui::components::session_list::SessionList;
use crate::tui::components::settings_panel::SettingsPanel;
use crate::tui::components::todo_list::TodoListView;
use crate::tui::components::{ErrorPanel, TabBar, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, tabs_area, main_area] =
        Layout::vertical([Length(1), Length(1), Min(0)]).areas(frame.area());

    let mut title_bar = TitleBar::new(&app.source_name, &app.status_message);
    title_bar.loading = app.is_loading();
    title_bar.spinner_frame = spinner_frame;
    title_bar.render(frame, title_area);

    TabBar { selected: app.tab }.render(frame, tabs_area);

    // A failed main fetch replaces the whole view
    if let Some(message) = app.active_error() {
        ErrorPanel {
            title: app.tab.title(),
            message,
        }
        .render(frame, main_area);
        return;
    }
    draw_tab(frame, main_area, app, tui);
}

fn draw_tab(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    match app.tab {
        Tab::Overview => OverviewView {
            overview: &app.overview,
            state: &mut tui.overview,
        }
        .render(frame, area),
        Tab::Sessions => SessionList {
            browser: &app.sessions,
            options: app.render_options,
            state: &mut tui.sessions,
        }
        .render(frame, area),
        Tab::Commands => CommandList {
            browser: &app.commands,
            state: &mut tui.commands,
        }
        .render(frame, area),
        Tab::Todos => TodoListView {
            todos: &app.todos,
            state: &mut tui.todos,
        }
        .render(frame, area),
        Tab::Settings => SettingsPanel {
            editor: &app.settings,
            state: &mut tui.settings,
        }
        .render(frame, area),
        Tab::Files => FileBrowserView {
            browser: &app.files,
            state: &mut tui.files,
        }
        .render(frame, area),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiError;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_and_tabs_always_drawn() {
        let app = App::new("mock");
        let mut tui = TuiState::new(app.tab);
        let text = draw(&app, &mut tui);
        assert!(text.contains("ccmanager (source: mock)"));
        assert!(text.contains("1 Overview"));
        assert!(text.contains("6 Files"));
    }

    #[test]
    fn test_error_replaces_active_view() {
        let mut app = App::new("mock");
        app.tab = Tab::Todos;
        app.todos.apply(Err(ApiError::Network("connection reset".into())));
        let mut tui = TuiState::new(app.tab);
        let text = draw(&app, &mut tui);
        assert!(text.contains("Something went wrong"));
        assert!(text.contains("connection reset"));
        assert!(!text.contains("Todos · All"));
    }

    #[test]
    fn test_active_tab_view_is_drawn() {
        let mut app = App::new("mock");
        app.tab = Tab::Commands;
        let mut tui = TuiState::new(app.tab);
        let text = draw(&app, &mut tui);
        assert!(text.contains("Command history (0)"));
    }
}
