//! # Settings tab
//!
//! Shows permissions and PreToolUse hooks. `e` enters edit mode; edits go to
//! the draft held by `core::settings_editor` and only reach the API on `s`.
//!
//! Editing keys: `a` add allow, `d` add deny, `h` add hook (`<matcher>
//! <command>`), `m` cycle default mode, `x`/Delete remove the highlighted
//! row, `s` save, Esc discard.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use crate::api::types::ClaudeSettings;
use crate::core::settings_editor::{SettingsEdit, SettingsEditor};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{Card, TextInput, TextInputEvent};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Allow,
    Deny,
    Hook,
}

impl Prompt {
    fn label(self) -> &'static str {
        match self {
            Prompt::Allow => "Allow pattern",
            Prompt::Deny => "Deny pattern",
            Prompt::Hook => "Hook (<matcher> <command>)",
        }
    }
}

/// A removable row of the settings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Allow(usize),
    Deny(usize),
    Hook(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsPanelEvent {
    StartEdit,
    Cancel,
    Save,
    Edit(SettingsEdit),
}

#[derive(Default)]
pub struct SettingsPanelState {
    pub cursor: usize,
    pub prompt: Option<Prompt>,
    pub input: TextInput,
    editing: bool,
    rows: Vec<SettingsRow>,
}

impl SettingsPanelState {
    pub fn is_typing(&self) -> bool {
        self.prompt.is_some()
    }

    /// Refresh the cached mode and rows from core state.
    pub fn sync(&mut self, editor: &SettingsEditor) {
        self.editing = editor.is_editing();
        self.rows = editor.current().map(rows_of).unwrap_or_default();
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
        if !self.editing {
            self.prompt = None;
            self.input.focused = false;
        }
    }

    fn open_prompt(&mut self, prompt: Prompt) -> Option<SettingsPanelEvent> {
        self.prompt = Some(prompt);
        self.input.take();
        self.input.focused = true;
        self.input.placeholder = prompt.label().to_string();
        None
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        self.input.focused = false;
    }

    fn submit(&mut self, prompt: Prompt, text: &str) -> Option<SettingsPanelEvent> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let edit = match prompt {
            Prompt::Allow => SettingsEdit::AddAllow(text.to_string()),
            Prompt::Deny => SettingsEdit::AddDeny(text.to_string()),
            Prompt::Hook => {
                let (matcher, command) = text.split_once(char::is_whitespace)?;
                SettingsEdit::AddHook {
                    matcher: matcher.to_string(),
                    command: command.trim().to_string(),
                }
            }
        };
        Some(SettingsPanelEvent::Edit(edit))
    }
}

fn rows_of(settings: &ClaudeSettings) -> Vec<SettingsRow> {
    let permissions = &settings.permissions;
    (0..permissions.allow.len())
        .map(SettingsRow::Allow)
        .chain((0..permissions.deny.len()).map(SettingsRow::Deny))
        .chain((0..settings.hooks.pre_tool_use.len()).map(SettingsRow::Hook))
        .collect()
}

impl EventHandler for SettingsPanelState {
    type Event = SettingsPanelEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SettingsPanelEvent> {
        if let Some(prompt) = self.prompt {
            return match self.input.handle_event(event)? {
                TextInputEvent::Changed(_) => None,
                TextInputEvent::Submit(text) => {
                    self.close_prompt();
                    self.input.take();
                    self.submit(prompt, &text)
                }
                TextInputEvent::Cancel => {
                    self.close_prompt();
                    None
                }
            };
        }
        if !self.editing {
            return matches!(event, TuiEvent::Char('e')).then_some(SettingsPanelEvent::StartEdit);
        }
        match event {
            TuiEvent::Char('a') => self.open_prompt(Prompt::Allow),
            TuiEvent::Char('d') => self.open_prompt(Prompt::Deny),
            TuiEvent::Char('h') => self.open_prompt(Prompt::Hook),
            TuiEvent::Char('m') => Some(SettingsPanelEvent::Edit(SettingsEdit::CycleDefaultMode)),
            TuiEvent::Char('s') => Some(SettingsPanelEvent::Save),
            TuiEvent::Escape => Some(SettingsPanelEvent::Cancel),
            TuiEvent::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::Down => {
                self.cursor = (self.cursor + 1).min(self.rows.len().saturating_sub(1));
                None
            }
            TuiEvent::Char('x') | TuiEvent::Delete => {
                let edit = match self.rows.get(self.cursor)? {
                    SettingsRow::Allow(i) => SettingsEdit::RemoveAllow(*i),
                    SettingsRow::Deny(i) => SettingsEdit::RemoveDeny(*i),
                    SettingsRow::Hook(i) => SettingsEdit::RemoveHook(*i),
                };
                Some(SettingsPanelEvent::Edit(edit))
            }
            _ => None,
        }
    }
}

pub struct SettingsPanel<'a> {
    pub editor: &'a SettingsEditor,
    pub state: &'a mut SettingsPanelState,
}

impl Component for SettingsPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.editor);

        let (mode, hint) = if self.editor.is_saving() {
            ("saving...", "")
        } else if self.editor.is_editing() {
            if self.editor.has_unsaved_changes() {
                ("editing, unsaved", "a allow  d deny  h hook  m mode  x remove  s save  Esc discard")
            } else {
                ("editing", "a allow  d deny  h hook  m mode  x remove  Esc discard")
            }
        } else {
            ("", "e edit")
        };
        let title = if mode.is_empty() {
            "Settings".to_string()
        } else {
            format!("Settings · {mode}")
        };
        let inner = Card::new(&title)
            .focused(self.editor.is_editing())
            .hint(hint)
            .render(frame, area);

        let Some(settings) = self.editor.current() else {
            let text = if self.editor.loading {
                "Loading settings..."
            } else {
                "No settings loaded."
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        };

        let mut notices: Vec<Line> = self
            .editor
            .duplicate_patterns()
            .into_iter()
            .map(|p| {
                Line::styled(
                    format!("⚠ {p} is both allowed and denied"),
                    Style::default().fg(Color::Yellow),
                )
            })
            .collect();
        if let Some(error) = &self.editor.save_error {
            notices.push(Line::styled(
                format!("Save failed: {error}"),
                Style::default().fg(Color::Red),
            ));
        }
        let prompt_height = u16::from(self.state.prompt.is_some());
        let [list_area, notice_area, prompt_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(notices.len() as u16),
            Constraint::Length(prompt_height),
        ])
        .areas(inner);

        let (items, selectable) = settings_items(settings);
        let mut list_state = ListState::default();
        if self.editor.is_editing() {
            list_state.select(selectable.get(self.state.cursor).copied());
        }
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, list_area, &mut list_state);
        frame.render_widget(Paragraph::new(notices), notice_area);

        if let Some(prompt) = self.state.prompt {
            let [label_area, input_area] = Layout::horizontal([
                Constraint::Length(prompt.label().len() as u16 + 2),
                Constraint::Min(0),
            ])
            .areas(prompt_area);
            frame.render_widget(
                Span::styled(format!("{}:", prompt.label()), Style::default().fg(Color::Cyan)),
                label_area,
            );
            self.state.input.render(frame, input_area);
        }
    }
}

/// List items plus, per removable row, its index in the item list.
fn settings_items(settings: &ClaudeSettings) -> (Vec<ListItem<'static>>, Vec<usize>) {
    let heading = |text: &str| {
        ListItem::new(Line::styled(
            text.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    };
    let muted = Style::default().fg(Color::DarkGray);
    let permissions = &settings.permissions;

    let mut items = vec![
        ListItem::new(Line::from(vec![
            Span::styled("Default mode  ", muted),
            Span::styled(
                permissions.default_mode.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])),
        ListItem::new(Line::default()),
    ];
    let mut selectable = Vec::new();

    items.push(heading("Allow"));
    for pattern in &permissions.allow {
        selectable.push(items.len());
        items.push(ListItem::new(Line::from(vec![
            Span::styled("  ✓ ", Style::default().fg(Color::Green)),
            Span::raw(pattern.clone()),
        ])));
    }
    if permissions.allow.is_empty() {
        items.push(ListItem::new(Line::styled("  (none)", muted)));
    }

    items.push(heading("Deny"));
    for pattern in &permissions.deny {
        selectable.push(items.len());
        items.push(ListItem::new(Line::from(vec![
            Span::styled("  ✗ ", Style::default().fg(Color::Red)),
            Span::raw(pattern.clone()),
        ])));
    }
    if permissions.deny.is_empty() {
        items.push(ListItem::new(Line::styled("  (none)", muted)));
    }

    items.push(heading("PreToolUse hooks"));
    for hook in &settings.hooks.pre_tool_use {
        selectable.push(items.len());
        let commands: Vec<&str> = hook.hooks.iter().map(|h| h.command.as_str()).collect();
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("  {} ", hook.matcher), Style::default().fg(Color::Magenta)),
            Span::styled("→ ", muted),
            Span::raw(commands.join(", ")),
        ])));
    }
    if settings.hooks.pre_tool_use.is_empty() {
        items.push(ListItem::new(Line::styled("  (none)", muted)));
    }
    (items, selectable)
}
