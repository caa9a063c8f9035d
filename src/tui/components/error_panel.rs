use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::components::Card;

/// Shown in place of a view whose fetch failed. Retry is `r`, handled by
/// the loop like any refresh.
pub struct ErrorPanel<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

impl Component for ErrorPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner = Card::new(self.title).hint("r retry").render(frame, area);
        let text = vec![
            Line::from(Span::styled(
                "Something went wrong",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(self.message.to_string()),
            Line::default(),
            Line::from(Span::styled(
                "Press r to try again",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
    }
}
