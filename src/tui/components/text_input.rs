//! # TextInput Component
//!
//! One-line editable field used for the session search, the command search
//! and the settings pattern prompt.
//!
//! The buffer and cursor are internal state; `focused` and `placeholder` are
//! props set by the parent before each render. The cursor is a byte offset
//! that always sits on a char boundary.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    Changed(String),
    Submit(String),
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
    pub focused: bool,
    pub placeholder: String,
}

impl TextInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Empty the field and return what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn changed(&self) -> Option<TextInputEvent> {
        Some(TextInputEvent::Changed(self.buffer.clone()))
    }

    /// Display columns to skip so the cursor stays inside `width`.
    fn scroll(&self, width: u16) -> usize {
        let before = self.buffer[..self.cursor].width();
        before.saturating_sub(usize::from(width).saturating_sub(1))
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl EventHandler for TextInput {
    type Event = TextInputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<TextInputEvent> {
        match event {
            TuiEvent::Char(c) => {
                let mut bytes = [0u8; 4];
                self.insert(c.encode_utf8(&mut bytes));
                self.changed()
            }
            // single line: newlines in pasted text become spaces
            TuiEvent::Paste(text) => {
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.insert(&flat);
                self.changed()
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                self.changed()
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                self.changed()
            }
            TuiEvent::Left => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::Right => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                }
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Enter => Some(TextInputEvent::Submit(self.buffer.clone())),
            TuiEvent::Escape => Some(TextInputEvent::Cancel),
            _ => None,
        }
    }
}

impl Component for TextInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let prompt = Span::styled("/ ", Style::default().fg(Color::DarkGray));
        let width = area.width.saturating_sub(2);

        let line = if self.buffer.is_empty() && !self.focused {
            Line::from(vec![
                prompt,
                Span::styled(self.placeholder.clone(), Style::default().fg(Color::DarkGray)),
            ])
        } else {
            let skip = self.scroll(width);
            let mut skipped = 0;
            let visible: String = self
                .buffer
                .chars()
                .skip_while(|c| {
                    let w = unicode_width::UnicodeWidthChar::width(*c).unwrap_or(0);
                    let skipping = skipped < skip;
                    if skipping {
                        skipped += w;
                    }
                    skipping
                })
                .collect();
            let style = if self.focused {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![prompt, Span::styled(visible, style)])
        };
        frame.render_widget(Paragraph::new(line), area);

        if self.focused {
            let column = self.buffer[..self.cursor].width() - self.scroll(width);
            let x = area.x + 2 + column as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }
}
