//! # Overview tab
//!
//! Counter cards across the top, one row per project below.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Table, TableState};

use crate::core::overview::Overview;
use crate::core::path::project_display_name;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{Card, format_timestamp, truncate_str};
use crate::tui::event::TuiEvent;

#[derive(Default)]
pub struct OverviewState {
    pub table_state: TableState,
    len: usize,
}

impl EventHandler for OverviewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        if self.len == 0 {
            return None;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = match event {
            TuiEvent::Up => current.saturating_sub(1),
            TuiEvent::Down => (current + 1).min(self.len - 1),
            _ => return None,
        };
        self.table_state.select(Some(next));
        Some(())
    }
}

pub struct OverviewView<'a> {
    pub overview: &'a Overview,
    pub state: &'a mut OverviewState,
}

impl Component for OverviewView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [stats_area, projects_area] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).areas(area);
        self.render_stats(frame, stats_area);
        self.render_projects(frame, projects_area);
    }
}

impl OverviewView<'_> {
    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let stats = self.overview.stats.clone().unwrap_or_default();
        let counters = [
            ("Sessions", stats.total_sessions),
            ("Messages", stats.total_messages),
            ("Commands", stats.total_commands),
            ("Projects", stats.active_projects),
            ("Open todos", stats.pending_todos),
        ];
        let areas = Layout::horizontal([Constraint::Ratio(1, 5); 5]).split(area);
        for ((label, value), cell) in counters.iter().zip(areas.iter()) {
            let inner = Card::new(label).render(frame, *cell);
            let text = if self.overview.stats.is_some() {
                value.to_string()
            } else {
                "…".to_string()
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    text,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )))
                .centered(),
                inner,
            );
        }
    }

    fn render_projects(&mut self, frame: &mut Frame, area: Rect) {
        let projects = &self.overview.projects;
        self.state.len = projects.len();
        if projects.is_empty() {
            self.state.table_state.select(None);
        } else if self.state.table_state.selected().is_none_or(|i| i >= projects.len()) {
            self.state.table_state.select(Some(0));
        }

        let title = format!("Projects ({})", projects.len());
        let inner = Card::new(&title).focused(true).hint("r refresh").render(frame, area);
        if projects.is_empty() {
            let text = if self.overview.loading {
                "Loading..."
            } else {
                "No projects yet."
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let header = Row::new(["Project", "Sessions", "Messages", "Todos", "Last activity", "Latest"])
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = projects
            .iter()
            .map(|p| {
                Row::new(vec![
                    project_display_name(&p.project_path),
                    p.session_count.to_string(),
                    p.total_messages.to_string(),
                    p.active_todos.to_string(),
                    format_timestamp(p.last_activity),
                    truncate_str(p.latest_message.as_deref().unwrap_or(""), 40),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(6),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray));
        frame.render_stateful_widget(table, inner, &mut self.state.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ProjectSummary, SessionStats};
    use crate::test_support::fixed_time;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(overview: &Overview, state: &mut OverviewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 16)).unwrap();
        terminal
            .draw(|f| OverviewView { overview, state }.render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_renders_counters_and_projects() {
        let mut overview = Overview::default();
        overview.apply(
            Ok(SessionStats {
                total_sessions: 5,
                total_messages: 42,
                total_commands: 8,
                active_projects: 4,
                pending_todos: 3,
            }),
            Ok(vec![ProjectSummary {
                project_path: "/Users/me/webapp".into(),
                session_count: 2,
                last_activity: fixed_time(),
                total_messages: 20,
                active_todos: 1,
                latest_message: Some("Added login form".into()),
            }]),
        );
        let mut state = OverviewState::default();
        let text = draw(&overview, &mut state);
        assert!(text.contains("42"));
        assert!(text.contains("Open todos"));
        assert!(text.contains("webapp"));
        assert!(text.contains("Added login form"));
        assert_eq!(state.table_state.selected(), Some(0));
    }

    #[test]
    fn test_placeholder_before_first_load() {
        let mut overview = Overview::default();
        overview.begin_load();
        let text = draw(&overview, &mut OverviewState::default());
        assert!(text.contains("Loading..."));
    }
}
