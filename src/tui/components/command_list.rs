//! # Commands tab
//!
//! Search box over the command log. Keystrokes are reported as they happen;
//! the 300 ms debounce lives in `core::commands`, not here.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::core::commands::CommandBrowser;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{
    Card, TextInput, TextInputEvent, clamp_selection, format_timestamp, step_selection,
};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryChanged {
    pub query: String,
    pub at: Instant,
}

pub struct CommandListState {
    pub list_state: ListState,
    pub search: TextInput,
    len: usize,
}

impl Default for CommandListState {
    fn default() -> Self {
        Self {
            list_state: ListState::default(),
            search: TextInput::new("Search commands (/)"),
            len: 0,
        }
    }
}

impl CommandListState {
    pub fn is_typing(&self) -> bool {
        self.search.focused
    }
}

impl EventHandler for CommandListState {
    type Event = QueryChanged;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<QueryChanged> {
        if self.search.focused {
            let changed = |query| QueryChanged {
                query,
                at: Instant::now(),
            };
            return match self.search.handle_event(event)? {
                TextInputEvent::Changed(query) => Some(changed(query)),
                TextInputEvent::Submit(_) => {
                    self.search.focused = false;
                    None
                }
                TextInputEvent::Cancel => {
                    self.search.focused = false;
                    let had_text = !self.search.take().is_empty();
                    had_text.then(|| changed(String::new()))
                }
            };
        }
        match event {
            TuiEvent::Char('/') => self.search.focused = true,
            TuiEvent::Up => step_selection(&mut self.list_state, self.len, -1),
            TuiEvent::Down => step_selection(&mut self.list_state, self.len, 1),
            TuiEvent::PageUp => step_selection(&mut self.list_state, self.len, -10),
            TuiEvent::PageDown => step_selection(&mut self.list_state, self.len, 10),
            _ => {}
        }
        None
    }
}

pub struct CommandList<'a> {
    pub browser: &'a CommandBrowser,
    pub state: &'a mut CommandListState,
}

impl Component for CommandList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let entries = &self.browser.entries;
        self.state.len = entries.len();
        clamp_selection(&mut self.state.list_state, entries.len());

        let title = match self.browser.query.as_str() {
            "" => format!("Command history ({})", entries.len()),
            q => format!("Commands matching \"{q}\" ({})", entries.len()),
        };
        let inner = Card::new(&title)
            .focused(true)
            .hint("/ search  Esc clear  ↑↓ move")
            .render(frame, area);
        let [search_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        self.state.search.render(frame, search_area);

        if entries.is_empty() {
            let text = if self.browser.loading || self.browser.search_pending() {
                "Searching..."
            } else {
                "No commands found."
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                list_area,
            );
            return;
        }

        let dim = Style::default().fg(Color::DarkGray);
        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| {
                let mut spans = vec![
                    Span::styled(format!("{}  ", format_timestamp(entry.timestamp)), dim),
                    Span::styled("$ ", Style::default().fg(Color::Green)),
                    Span::raw(entry.command.clone()),
                ];
                if let Some(cwd) = &entry.cwd {
                    spans.push(Span::styled(format!("  ({cwd})"), dim));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::command;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_slash_focuses_search_and_letters_type() {
        let mut state = CommandListState::default();
        assert!(state.handle_event(&TuiEvent::Char('/')).is_none());
        assert!(state.is_typing());
        let changed = state.handle_event(&TuiEvent::Char('q')).unwrap();
        assert_eq!(changed.query, "q");
    }

    #[test]
    fn test_escape_clears_query() {
        let mut state = CommandListState::default();
        state.handle_event(&TuiEvent::Char('/'));
        state.handle_event(&TuiEvent::Char('g'));
        let cleared = state.handle_event(&TuiEvent::Escape).unwrap();
        assert_eq!(cleared.query, "");
        assert!(!state.is_typing());
    }

    #[test]
    fn test_escape_on_empty_query_is_silent() {
        let mut state = CommandListState::default();
        state.handle_event(&TuiEvent::Char('/'));
        assert!(state.handle_event(&TuiEvent::Escape).is_none());
    }

    #[test]
    fn test_render_entries() {
        let mut browser = CommandBrowser::default();
        browser.apply(Ok(vec![command("npm run build"), command("git status")]));
        let mut state = CommandListState::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|f| {
                CommandList {
                    browser: &browser,
                    state: &mut state,
                }
                .render(f, f.area())
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Command history (2)"));
        assert!(text.contains("$ npm run build"));
        assert_eq!(state.list_state.selected(), Some(0));
    }
}
