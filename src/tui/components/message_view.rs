//! # Transcript view
//!
//! Renders the selected session's messages top to bottom inside a
//! `ScrollView`. Each message is classified by `core::classify` and turned
//! into a bordered paragraph here:
//!
//! - **User** (cyan) and **Assistant** (green) messages show their blocks:
//!   markdown, plain text, red/green diffs and tool calls
//! - **Command** cards (magenta) show the slash command, its message and args
//! - **Summary** records (yellow, italic) are only reachable through
//!   `classify`; the browser filters them out of the transcript
//! - **Raw** records fall back to pretty-printed JSON
//!
//! Heights come from `Paragraph::line_count`, so the layout is measured
//! with the same wrapping the paragraph renders with. Transcripts can run
//! past `u16::MAX` rows, so positions are kept as `usize` and only the
//! messages that intersect the viewport are drawn into the `ScrollView`.
//!
//! Diffs are a single column, removed lines (`-`, red) above added lines
//! (`+`, green). Side by side columns halve the width available to code
//! lines in a split pane, so the terminal view stacks them instead.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::types::{ClaudeMessage, ProcessingStatus};
use crate::core::classify::{self, BlockView, CommandCard, RenderOptions};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::format_timestamp;
use crate::tui::event::TuiEvent;
use crate::tui::markdown::{self, MarkdownTheme};

/// Scroll position of the transcript. Must be persisted in the parent state.
#[derive(Default)]
pub struct MessageViewState {
    /// First transcript row on screen.
    pub offset: usize,
    /// Transcript rows at the last render.
    total: usize,
    viewport_height: u16,
    /// Offset into the canvas of visible messages, derived from `offset`.
    canvas: ScrollViewState,
}

impl MessageViewState {
    /// Back to the top, e.g. after another session was selected.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport_height as usize)
    }

    fn scroll_by(&mut self, rows: isize) {
        self.offset = self
            .offset
            .saturating_add_signed(rows)
            .min(self.max_offset());
    }
}

impl EventHandler for MessageViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        let page = self.viewport_height.max(1) as isize;
        match event {
            TuiEvent::Up => self.scroll_by(-1),
            TuiEvent::Down => self.scroll_by(1),
            TuiEvent::PageUp => self.scroll_by(-page),
            TuiEvent::PageDown => self.scroll_by(page),
            _ => return None,
        }
        Some(())
    }
}

/// Message heights at one width, with running totals for lookup by row.
pub struct TranscriptLayout {
    heights: Vec<usize>,
    prefix_heights: Vec<usize>,
}

impl TranscriptLayout {
    pub fn new(heights: Vec<usize>) -> Self {
        let prefix_heights = heights
            .iter()
            .scan(0usize, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
        Self {
            heights,
            prefix_heights,
        }
    }

    pub fn total(&self) -> usize {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Row at which message `index` starts.
    pub fn top(&self, index: usize) -> usize {
        match index {
            0 => 0,
            i => self.prefix_heights[i - 1],
        }
    }

    /// Messages with at least one row inside `offset..offset + viewport_height`.
    pub fn visible_range(&self, offset: usize, viewport_height: u16) -> Range<usize> {
        let end_row = offset.saturating_add(viewport_height as usize);
        let start = self.prefix_heights.partition_point(|&end| end <= offset);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < end_row)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end.max(start)
    }
}

/// A message ready to draw: border title, accent color and body.
pub struct RenderedMessage {
    pub title: String,
    pub accent: Style,
    pub body: Text<'static>,
}

impl RenderedMessage {
    pub fn new(message: &ClaudeMessage, options: &RenderOptions) -> Self {
        let (title, accent) = header(message);
        let view = classify::classify(message, options);
        let accent = match view {
            classify::MessageView::Command(_) => Style::default().fg(Color::Magenta),
            _ => accent,
        };
        let body = match view {
            classify::MessageView::Summary { text } => Text::from(Line::from(Span::styled(
                text,
                Style::default().add_modifier(Modifier::ITALIC),
            ))),
            classify::MessageView::Command(card) => command_text(&card),
            classify::MessageView::Blocks(blocks) => {
                let theme = MarkdownTheme::with_text(Color::Reset);
                let mut lines: Vec<Line<'static>> = Vec::new();
                for (i, block) in blocks.iter().enumerate() {
                    if i > 0 {
                        lines.push(Line::default());
                    }
                    lines.extend(block_lines(block, &theme));
                }
                Text::from(lines)
            }
            classify::MessageView::Raw(json) => Text::from(
                json.lines()
                    .map(|l| Line::styled(l.to_owned(), Style::default().fg(Color::DarkGray)))
                    .collect::<Vec<_>>(),
            ),
        };
        Self { title, accent, body }
    }

    fn paragraph(&self) -> Paragraph<'static> {
        let border = self.accent.add_modifier(Modifier::DIM);
        Paragraph::new(self.body.clone())
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(self.title.clone())
                    .border_style(border)
                    .title_style(self.accent)
                    .padding(Padding::horizontal(1)),
            )
            .wrap(Wrap { trim: false })
    }

    /// Rows needed at `width`, borders included.
    pub fn height(&self, width: u16) -> usize {
        self.paragraph().line_count(width)
    }
}

fn header(message: &ClaudeMessage) -> (String, Style) {
    match message {
        ClaudeMessage::User(chat) => (
            format!(" user · {} ", format_timestamp(chat.timestamp)),
            Style::default().fg(Color::Cyan),
        ),
        ClaudeMessage::Assistant(chat) => {
            let mut title = format!(" assistant · {} ", format_timestamp(chat.timestamp));
            if chat.processing_status == ProcessingStatus::Processing {
                title.push_str("· processing ");
            }
            (title, Style::default().fg(Color::Green))
        }
        ClaudeMessage::Summary(_) => (" summary ".to_string(), Style::default().fg(Color::Yellow)),
    }
}

fn command_text(card: &CommandCard) -> Text<'static> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Command ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            card.name.clone(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(message) = &card.message {
        lines.push(Line::from(message.clone()));
    }
    if let Some(args) = &card.args {
        lines.push(Line::from(vec![
            Span::styled("args ", Style::default().fg(Color::DarkGray)),
            Span::raw(args.clone()),
        ]));
    }
    Text::from(lines)
}

pub fn block_lines(block: &BlockView, theme: &MarkdownTheme) -> Vec<Line<'static>> {
    match block {
        BlockView::Diff {
            removed,
            added,
            file_path,
        } => {
            let mut lines = Vec::new();
            if let Some(path) = file_path {
                lines.push(Line::styled(
                    format!("✎ {path}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
            let red = Style::default().fg(Color::Red);
            let green = Style::default().fg(Color::Green);
            lines.extend(removed.lines().map(|l| Line::styled(format!("- {l}"), red)));
            lines.extend(added.lines().map(|l| Line::styled(format!("+ {l}"), green)));
            lines
        }
        BlockView::Markdown(text) => markdown::render(text, theme).lines,
        BlockView::Plain(text) => text
            .lines()
            .map(|l| Line::styled(l.replace('\t', "    "), Style::default().fg(theme.text)))
            .collect(),
        BlockView::ToolUse { name, input } => {
            let mut lines = vec![Line::styled(
                format!("⚙ {name}"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )];
            let dim = Style::default().fg(Color::DarkGray);
            lines.extend(input.lines().map(|l| Line::styled(l.to_owned(), dim)));
            lines
        }
    }
}

pub struct MessageView<'a> {
    pub messages: &'a [&'a ClaudeMessage],
    pub options: RenderOptions,
    pub state: &'a mut MessageViewState,
}

impl Component for MessageView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // -1 keeps the scrollbar off the borders
        let width = area.width.saturating_sub(1);
        let rendered: Vec<RenderedMessage> = self
            .messages
            .iter()
            .map(|m| RenderedMessage::new(m, &self.options))
            .collect();
        let layout = TranscriptLayout::new(rendered.iter().map(|r| r.height(width)).collect());

        let state = &mut *self.state;
        state.total = layout.total();
        state.viewport_height = area.height;
        state.offset = state.offset.min(state.max_offset());

        let visible = layout.visible_range(state.offset, area.height);
        let window_top = layout.top(visible.start);
        let heights: Vec<u16> = visible
            .clone()
            .map(|i| u16::try_from(layout.heights[i]).unwrap_or(u16::MAX))
            .collect();
        let canvas_height = heights.iter().fold(0u16, |acc, h| acc.saturating_add(*h));

        let mut scroll_view = ScrollView::new(Size::new(width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        let mut y: u16 = 0;
        for (i, height) in visible.zip(heights) {
            scroll_view.render_widget(rendered[i].paragraph(), Rect::new(0, y, width, height));
            y = y.saturating_add(height);
        }
        let canvas_offset = state.offset.saturating_sub(window_top);
        state.canvas.set_offset(Position {
            x: 0,
            y: u16::try_from(canvas_offset).unwrap_or(u16::MAX),
        });
        frame.render_stateful_widget(scroll_view, area, &mut state.canvas);

        if state.total > area.height as usize {
            let mut scrollbar = ScrollbarState::new(state.max_offset()).position(state.offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar,
            );
        }
    }
}
