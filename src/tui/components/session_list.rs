//! # Sessions tab
//!
//! Left: search box, active filters and the session list. Right: the
//! transcript of the selected session.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SessionListState` lives in `TuiState` (cursor, search input, focus)
//! - `SessionList` is created each frame with borrowed state
//!
//! Enter on a session selects it and moves focus to the transcript; Esc in
//! the transcript returns to the list and clears the selection.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};

use crate::api::types::ClaudeSession;
use crate::core::browser::SessionBrowser;
use crate::core::classify::RenderOptions;
use crate::core::path::{is_path_in_home_directory, normalize_project_path, project_display_name};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message_view::{MessageView, MessageViewState};
use crate::tui::components::{
    Card, TextInput, TextInputEvent, clamp_selection, format_timestamp, step_selection,
    truncate_str,
};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFocus {
    List,
    Search,
    Transcript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionListEvent {
    Search(String),
    Select(String),
    Back,
    CycleProject,
    CycleMessages,
    Export,
    ActivateIde,
}

pub struct SessionListState {
    pub list_state: ListState,
    pub search: TextInput,
    pub focus: SessionFocus,
    pub transcript: MessageViewState,
    /// Ids in display order as of the last frame.
    visible_ids: Vec<String>,
}

impl Default for SessionListState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionListState {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            search: TextInput::new("Search sessions (/)"),
            focus: SessionFocus::List,
            transcript: MessageViewState::default(),
            visible_ids: Vec::new(),
        }
    }

    pub fn is_typing(&self) -> bool {
        self.focus == SessionFocus::Search
    }

    /// Record what the list currently shows.
    pub fn sync(&mut self, ids: Vec<String>) {
        clamp_selection(&mut self.list_state, ids.len());
        self.visible_ids = ids;
    }

    fn highlighted(&self) -> Option<&String> {
        self.list_state.selected().and_then(|i| self.visible_ids.get(i))
    }
}

impl EventHandler for SessionListState {
    type Event = SessionListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SessionListEvent> {
        match self.focus {
            SessionFocus::Search => {
                match self.search.handle_event(event)? {
                    TextInputEvent::Changed(text) => Some(SessionListEvent::Search(text)),
                    TextInputEvent::Submit(_) => {
                        self.search.focused = false;
                        self.focus = SessionFocus::List;
                        None
                    }
                    TextInputEvent::Cancel => {
                        self.search.take();
                        self.search.focused = false;
                        self.focus = SessionFocus::List;
                        Some(SessionListEvent::Search(String::new()))
                    }
                }
            }
            SessionFocus::List => match event {
                TuiEvent::Char('/') => {
                    self.focus = SessionFocus::Search;
                    self.search.focused = true;
                    None
                }
                TuiEvent::Up => self.step(-1),
                TuiEvent::Down => self.step(1),
                TuiEvent::PageUp => self.step(-10),
                TuiEvent::PageDown => self.step(10),
                TuiEvent::Enter => {
                    let id = self.highlighted()?.clone();
                    self.focus = SessionFocus::Transcript;
                    self.transcript.reset();
                    Some(SessionListEvent::Select(id))
                }
                _ => self.shared_keys(event),
            },
            SessionFocus::Transcript => match event {
                TuiEvent::Escape => {
                    self.focus = SessionFocus::List;
                    Some(SessionListEvent::Back)
                }
                TuiEvent::Up | TuiEvent::Down | TuiEvent::PageUp | TuiEvent::PageDown => {
                    self.transcript.handle_event(event);
                    None
                }
                _ => self.shared_keys(event),
            },
        }
    }
}

impl SessionListState {
    fn step(&mut self, delta: isize) -> Option<SessionListEvent> {
        step_selection(&mut self.list_state, self.visible_ids.len(), delta);
        None
    }

    fn shared_keys(&mut self, event: &TuiEvent) -> Option<SessionListEvent> {
        match event {
            TuiEvent::Char('p') => Some(SessionListEvent::CycleProject),
            TuiEvent::Char('m') => Some(SessionListEvent::CycleMessages),
            TuiEvent::Char('e') => Some(SessionListEvent::Export),
            TuiEvent::Char('i') => Some(SessionListEvent::ActivateIde),
            _ => None,
        }
    }
}

pub struct SessionList<'a> {
    pub browser: &'a SessionBrowser,
    pub options: RenderOptions,
    pub state: &'a mut SessionListState,
}

impl Component for SessionList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [list_area, transcript_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(area);
        self.render_list(frame, list_area);
        self.render_transcript(frame, transcript_area);
    }
}

impl SessionList<'_> {
    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let sessions = self.browser.filtered_sessions();
        self.state
            .sync(sessions.iter().map(|s| s.session_id.clone()).collect());

        let title = format!("Sessions ({}/{})", sessions.len(), self.browser.sessions.len());
        let inner = Card::new(&title)
            .focused(self.state.focus != SessionFocus::Transcript)
            .hint("/ search  p project  m messages  Enter open")
            .render(frame, area);

        let [search_area, filter_area, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        self.state.search.render(frame, search_area);

        let project = self
            .browser
            .project_filter
            .as_deref()
            .map(project_display_name)
            .unwrap_or_else(|| "all".to_string());
        let filters = Line::from(vec![
            Span::styled("project: ", Style::default().fg(Color::DarkGray)),
            Span::raw(project),
            Span::styled("  messages: ", Style::default().fg(Color::DarkGray)),
            Span::raw(self.browser.type_filter.label()),
        ]);
        frame.render_widget(filters, filter_area);

        if sessions.is_empty() {
            let text = if self.browser.loading {
                "Loading sessions..."
            } else {
                "No sessions match."
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                list_area,
            );
            return;
        }

        let width = list_area.width as usize;
        let selected = self.browser.selected.as_deref();
        let items: Vec<ListItem> = sessions
            .iter()
            .map(|s| session_item(s, selected == Some(s.session_id.as_str()), width))
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let Some(session) = self.browser.selected_session() else {
            let inner = Card::new("Transcript").render(frame, area);
            frame.render_widget(
                Paragraph::new("Select a session with Enter.")
                    .style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        };

        let title = format!(
            "{} · {}",
            project_display_name(&session.project_path),
            session.session_id
        );
        let hint = if session.ide_info.is_some() {
            "Esc back  m filter  e export  i IDE"
        } else {
            "Esc back  m filter  e export"
        };
        let inner = Card::new(&title)
            .focused(self.state.focus == SessionFocus::Transcript)
            .hint(hint)
            .render(frame, area);

        if let Some(error) = &self.browser.messages_error {
            frame.render_widget(
                Paragraph::new(format!("Could not load messages: {error}\nPress r to retry."))
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }
        let messages = self.browser.visible_messages();
        if messages.is_empty() {
            let text = if self.browser.messages_loading {
                "Loading messages..."
            } else {
                "No messages."
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }
        MessageView {
            messages: &messages,
            options: self.options,
            state: &mut self.state.transcript,
        }
        .render(frame, inner);
    }
}

fn session_item(session: &ClaudeSession, is_open: bool, width: usize) -> ListItem<'static> {
    let normalized = normalize_project_path(&session.project_path);
    let location = if is_path_in_home_directory(&normalized) {
        format!("~/{}", project_display_name(&normalized))
    } else {
        normalized
    };
    let marker = if session.is_processing {
        Span::styled("● ", Style::default().fg(Color::Yellow))
    } else if is_open {
        Span::styled("▸ ", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("  ")
    };
    let mut first = vec![
        marker,
        Span::styled(location, Style::default().add_modifier(Modifier::BOLD)),
    ];
    if let Some(branch) = &session.git_branch {
        first.push(Span::styled(
            format!("  {branch}"),
            Style::default().fg(Color::Magenta),
        ));
    }
    first.push(Span::styled(
        format!("  {} msgs", session.message_count),
        Style::default().fg(Color::DarkGray),
    ));

    let preview = session.latest_content_preview.as_deref().unwrap_or("");
    let second = Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{}  ", format_timestamp(session.updated_at)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(truncate_str(preview, width.saturating_sub(18))),
    ]);
    ListItem::new(Text::from(vec![Line::from(first), second]))
}
