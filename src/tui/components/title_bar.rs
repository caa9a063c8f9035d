//! # TitleBar Component
//!
//! Top line of the dashboard: application name, data source, the latest
//! status message and a spinner while the active tab is loading.
//!
//! Purely presentational. All fields are props filled from `App` each frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(&app.source_name, &app.status_message);
//! title_bar.loading = app.is_loading();
//! title_bar.render(frame, title_area);
//! ```
//!
//! Layout, left to right: `ccmanager (source: mock) | <status> | ⠋ Loading`.
//! The status segment is omitted when empty.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar<'a> {
    pub source_name: &'a str,
    pub status_message: &'a str,
    pub loading: bool,
    pub spinner_frame: usize,
}

impl<'a> TitleBar<'a> {
    pub fn new(source_name: &'a str, status_message: &'a str) -> Self {
        Self {
            source_name,
            status_message,
            loading: false,
            spinner_frame: 0,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("ccmanager (source: {})", self.source_name);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(self.status_message);
        }
        text
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.loading {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("{glyph} Loading"),
                Style::default().fg(Color::Yellow),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
