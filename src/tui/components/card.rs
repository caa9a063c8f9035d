//! Bordered, titled panel used by every view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding};

#[derive(Debug, Clone, Default)]
pub struct Card<'a> {
    pub title: &'a str,
    pub focused: bool,
    /// Key hints drawn into the bottom border.
    pub hint: Option<&'a str>,
}

impl<'a> Card<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn block(&self) -> Block<'a> {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Line::from(format!(" {} ", self.title)))
            .title_style(border.add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(1));
        if let Some(hint) = self.hint {
            block = block.title_bottom(Line::from(format!(" {hint} ")).centered());
        }
        block
    }

    /// Draw the frame and return the area inside it.
    pub fn render(&self, frame: &mut Frame, area: Rect) -> Rect {
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(card: &Card) -> (ratatui::buffer::Buffer, Rect) {
        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        let mut inner = Rect::default();
        terminal
            .draw(|f| inner = card.render(f, f.area()))
            .unwrap();
        (terminal.backend().buffer().clone(), inner)
    }

    fn row(buffer: &ratatui::buffer::Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_title_and_hint_in_borders() {
        let (buffer, _) = draw(&Card::new("Todos").hint("f filter"));
        assert!(row(&buffer, 0).contains(" Todos "));
        assert!(row(&buffer, 4).contains(" f filter "));
    }

    #[test]
    fn test_inner_area_excludes_border_and_padding() {
        let (_, inner) = draw(&Card::new("x"));
        assert_eq!(inner, Rect::new(2, 1, 26, 3));
    }

    #[test]
    fn test_focus_highlights_border() {
        let (focused, _) = draw(&Card::new("x").focused(true));
        let (plain, _) = draw(&Card::new("x"));
        assert_eq!(focused[(0, 0)].fg, Color::Cyan);
        assert_eq!(plain[(0, 0)].fg, Color::DarkGray);
    }
}
