use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::api::types::{TodoItem, TodoPriority, TodoStatus};
use crate::core::todos::TodoList;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{Card, clamp_selection, step_selection};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoListEvent {
    CycleFilter,
}

#[derive(Default)]
pub struct TodoListState {
    pub list_state: ListState,
    len: usize,
}

impl EventHandler for TodoListState {
    type Event = TodoListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<TodoListEvent> {
        match event {
            TuiEvent::Char('f') => return Some(TodoListEvent::CycleFilter),
            TuiEvent::Up => step_selection(&mut self.list_state, self.len, -1),
            TuiEvent::Down => step_selection(&mut self.list_state, self.len, 1),
            TuiEvent::PageUp => step_selection(&mut self.list_state, self.len, -10),
            TuiEvent::PageDown => step_selection(&mut self.list_state, self.len, 10),
            _ => {}
        }
        None
    }
}

pub struct TodoListView<'a> {
    pub todos: &'a TodoList,
    pub state: &'a mut TodoListState,
}

impl Component for TodoListView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let visible = self.todos.visible();
        self.state.len = visible.len();
        clamp_selection(&mut self.state.list_state, visible.len());

        let title = format!("Todos · {}", self.todos.filter_label());
        let inner = Card::new(&title)
            .focused(true)
            .hint("f filter  ↑↓ move")
            .render(frame, area);
        let [counts_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

        let counts = self.todos.counts();
        frame.render_widget(
            Line::from(vec![
                Span::styled(format!("○ {} pending", counts.pending), status_style(TodoStatus::Pending)),
                Span::raw("   "),
                Span::styled(
                    format!("◐ {} in progress", counts.in_progress),
                    status_style(TodoStatus::InProgress),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("● {} completed", counts.completed),
                    status_style(TodoStatus::Completed),
                ),
            ]),
            counts_area,
        );

        if visible.is_empty() {
            let text = if self.todos.loading {
                "Loading todos..."
            } else {
                "Nothing to do."
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                list_area,
            );
            return;
        }

        let width = list_area.width.saturating_sub(4).max(1) as usize;
        let items: Vec<ListItem> = visible.iter().map(|t| todo_item(t, width)).collect();
        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);
    }
}

fn todo_item(todo: &TodoItem, width: usize) -> ListItem<'static> {
    let icon = match todo.status {
        TodoStatus::Pending => "○",
        TodoStatus::InProgress => "◐",
        TodoStatus::Completed => "●",
    };
    let mut text_style = Style::default();
    if todo.status == TodoStatus::Completed {
        text_style = text_style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
    }
    // ListItem does not wrap, so wrap by hand and indent continuation lines
    let wrapped = textwrap::wrap(&todo.content, width.saturating_sub(10).max(10));
    let mut lines = Vec::with_capacity(wrapped.len());
    for (i, chunk) in wrapped.iter().enumerate() {
        if i == 0 {
            lines.push(Line::from(vec![
                Span::styled(format!("{icon} "), status_style(todo.status)),
                Span::styled(
                    format!("[{:<6}] ", todo.priority.label()),
                    priority_style(todo.priority),
                ),
                Span::styled(chunk.to_string(), text_style),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(11)),
                Span::styled(chunk.to_string(), text_style),
            ]));
        }
    }
    ListItem::new(Text::from(lines))
}

fn status_style(status: TodoStatus) -> Style {
    match status {
        TodoStatus::Pending => Style::default().fg(Color::Gray),
        TodoStatus::InProgress => Style::default().fg(Color::Yellow),
        TodoStatus::Completed => Style::default().fg(Color::Green),
    }
}

fn priority_style(priority: TodoPriority) -> Style {
    match priority {
        TodoPriority::High => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        TodoPriority::Medium => Style::default().fg(Color::Yellow),
        TodoPriority::Low => Style::default().fg(Color::DarkGray),
    }
}
