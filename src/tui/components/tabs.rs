//! # Tab strip
//!
//! `TabsState` is the selection cursor over the dashboard's tabs; `TabBar`
//! draws it. Navigation wraps in both directions.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Tabs;

use crate::Tab;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabsState {
    selected: usize,
}

impl TabsState {
    pub fn new(initial: Tab) -> Self {
        Self {
            selected: initial.index(),
        }
    }

    pub fn selected(&self) -> Tab {
        Tab::from_index(self.selected).unwrap_or_default()
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % Tab::ALL.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + Tab::ALL.len() - 1) % Tab::ALL.len();
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = Tab::ALL.len() - 1;
    }

    /// Jump to the 1-based tab `digit`. Out of range is ignored.
    pub fn jump(&mut self, digit: u32) -> bool {
        match digit.checked_sub(1).and_then(|i| Tab::from_index(i as usize)) {
            Some(tab) => {
                self.selected = tab.index();
                true
            }
            None => false,
        }
    }
}

impl EventHandler for TabsState {
    /// The newly selected tab, only when the selection moved.
    type Event = Tab;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Tab> {
        let before = self.selected;
        match event {
            TuiEvent::NextTab => self.next(),
            TuiEvent::PrevTab => self.previous(),
            TuiEvent::Home => self.first(),
            TuiEvent::End => self.last(),
            TuiEvent::Char(c @ '1'..='9') => {
                self.jump(c.to_digit(10).unwrap_or(0));
            }
            _ => return None,
        }
        (self.selected != before).then(|| self.selected())
    }
}

pub struct TabBar {
    pub selected: Tab,
}

impl Component for TabBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.selected.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
            .divider("│");
        frame.render_widget(tabs, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_next_wraps_to_first() {
        let mut tabs = TabsState::new(Tab::Files);
        tabs.next();
        assert_eq!(tabs.selected(), Tab::Overview);
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let mut tabs = TabsState::new(Tab::Overview);
        tabs.previous();
        assert_eq!(tabs.selected(), Tab::Files);
    }

    #[test]
    fn test_first_and_last() {
        let mut tabs = TabsState::new(Tab::Todos);
        tabs.last();
        assert_eq!(tabs.selected(), Tab::Files);
        tabs.first();
        assert_eq!(tabs.selected(), Tab::Overview);
    }

    #[test]
    fn test_digit_jump() {
        let mut tabs = TabsState::new(Tab::Overview);
        assert_eq!(tabs.handle_event(&TuiEvent::Char('3')), Some(Tab::Commands));
        assert_eq!(tabs.selected(), Tab::Commands);
    }

    #[test]
    fn test_digit_out_of_range_is_ignored() {
        let mut tabs = TabsState::new(Tab::Sessions);
        assert_eq!(tabs.handle_event(&TuiEvent::Char('9')), None);
        assert!(!tabs.jump(0));
        assert_eq!(tabs.selected(), Tab::Sessions);
    }

    #[test]
    fn test_same_tab_emits_nothing() {
        let mut tabs = TabsState::new(Tab::Overview);
        assert_eq!(tabs.handle_event(&TuiEvent::Home), None);
        assert_eq!(tabs.handle_event(&TuiEvent::Char('x')), None);
    }

    #[test]
    fn test_tab_bar_renders_titles() {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal
            .draw(|f| TabBar { selected: Tab::Todos }.render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("1 Overview"));
        assert!(text.contains("6 Files"));
    }
}
