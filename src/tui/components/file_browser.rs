//! # Files tab
//!
//! Listing of the configuration directory on the left, preview of the
//! selected file on the right. JSON and Markdown previews are highlighted.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};

use crate::api::types::ClaudeFileInfo;
use crate::core::files::FileBrowser;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{
    Card, clamp_selection, format_size, format_timestamp, step_selection,
};
use crate::tui::event::TuiEvent;
use crate::tui::markdown::{self, MarkdownTheme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBrowserEvent {
    Select(String),
    Touch,
}

#[derive(Default)]
pub struct FileBrowserState {
    pub list_state: ListState,
    pub preview_scroll: u16,
    paths: Vec<String>,
}

impl EventHandler for FileBrowserState {
    type Event = FileBrowserEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<FileBrowserEvent> {
        let len = self.paths.len();
        match event {
            TuiEvent::Up => step_selection(&mut self.list_state, len, -1),
            TuiEvent::Down => step_selection(&mut self.list_state, len, 1),
            TuiEvent::PageUp => self.preview_scroll = self.preview_scroll.saturating_sub(10),
            TuiEvent::PageDown => self.preview_scroll = self.preview_scroll.saturating_add(10),
            TuiEvent::Enter => {
                let path = self.paths.get(self.list_state.selected()?)?.clone();
                self.preview_scroll = 0;
                return Some(FileBrowserEvent::Select(path));
            }
            TuiEvent::Char('t') => return Some(FileBrowserEvent::Touch),
            _ => {}
        }
        None
    }
}

pub struct FileBrowserView<'a> {
    pub browser: &'a FileBrowser,
    pub state: &'a mut FileBrowserState,
}

impl Component for FileBrowserView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [list_area, preview_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(area);
        self.render_list(frame, list_area);
        self.render_preview(frame, preview_area);
    }
}

impl FileBrowserView<'_> {
    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let files = self.browser.files();
        self.state.paths = files.iter().map(|f| f.path.clone()).collect();
        clamp_selection(&mut self.state.list_state, files.len());

        let title = match &self.browser.info {
            Some(info) => format!("{} · {}", info.path, format_size(info.total_size)),
            None => "Files".to_string(),
        };
        let inner = Card::new(&title)
            .focused(true)
            .hint("Enter open  t touch")
            .render(frame, area);

        if files.is_empty() {
            let text = if self.browser.loading {
                "Loading..."
            } else {
                "Directory is empty."
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let items: Vec<ListItem> = files.iter().map(file_item).collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, inner, &mut self.state.list_state);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let browser = self.browser;
        let title = browser
            .selected
            .as_deref()
            .and_then(|p| p.rsplit('/').next())
            .unwrap_or("Preview");
        let inner = Card::new(title).render(frame, area);

        let muted = Style::default().fg(Color::DarkGray);
        let text = if browser.content_loading {
            Text::styled("Loading file...", muted)
        } else if let Some(error) = &browser.content_error {
            Text::styled(format!("Could not read file: {error}"), Style::default().fg(Color::Red))
        } else if let (Some(path), Some(content)) = (&browser.selected, &browser.content) {
            preview_text(path, content)
        } else {
            Text::styled("Select a file and press Enter.", muted)
        };
        frame.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .scroll((self.state.preview_scroll, 0)),
            inner,
        );
    }
}

fn file_item(file: &ClaudeFileInfo) -> ListItem<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let (icon, name_style) = if file.is_directory {
        ("▸ ", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
    } else {
        ("  ", Style::default())
    };
    let size = if file.is_directory {
        String::new()
    } else {
        format_size(file.size)
    };
    ListItem::new(Line::from(vec![
        Span::raw(icon),
        Span::styled(format!("{:<22}", file.name), name_style),
        Span::styled(format!("{size:>8}  "), dim),
        Span::styled(format_timestamp(file.modified), dim),
    ]))
}

fn preview_text(path: &str, content: &str) -> Text<'static> {
    let theme = MarkdownTheme::default();
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("md") => markdown::render(content, &theme),
        Some(lang @ ("json" | "jsonl" | "toml" | "sh")) => {
            markdown::render(&format!("```{lang}\n{content}\n```"), &theme)
        }
        _ => Text::raw(content.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ClaudeDirectoryInfo;
    use crate::test_support::fixed_time;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn entry(name: &str, size: u64, is_directory: bool) -> ClaudeFileInfo {
        ClaudeFileInfo {
            name: name.into(),
            path: format!("~/.claude/{name}"),
            size,
            modified: fixed_time(),
            is_directory,
            file_type: if is_directory { "directory" } else { "file" }.into(),
        }
    }

    fn browser() -> FileBrowser {
        let mut browser = FileBrowser::default();
        browser.apply_directory(Ok(ClaudeDirectoryInfo {
            path: "~/.claude".into(),
            files: vec![
                entry("settings.json", 2048, false),
                entry("CLAUDE.md", 300, false),
                entry("todos", 0, true),
            ],
            total_size: 2348,
        }));
        browser
    }

    fn draw(browser: &FileBrowser, state: &mut FileBrowserState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 14)).unwrap();
        terminal
            .draw(|f| FileBrowserView { browser, state }.render(f, f.area()))
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
    fn test_enter_selects_highlighted_file() {
        let browser = browser();
        let mut state = FileBrowserState::default();
        draw(&browser, &mut state);
        state.handle_event(&TuiEvent::Down);
        assert_eq!(
            state.handle_event(&TuiEvent::Enter),
            Some(FileBrowserEvent::Select("~/.claude/CLAUDE.md".into()))
        );
        assert_eq!(state.handle_event(&TuiEvent::Char('t')), Some(FileBrowserEvent::Touch));
    }

    #[test]
    fn test_enter_on_empty_listing_does_nothing() {
        let mut state = FileBrowserState::default();
        assert_eq!(state.handle_event(&TuiEvent::Enter), None);
    }

    #[test]
    fn test_render_listing_and_preview() {
        let mut browser = browser();
        browser.select("~/.claude/CLAUDE.md");
        browser.apply_content(Ok("# Project rules\n\nUse tabs.".into()));
        let text = draw(&browser, &mut FileBrowserState::default());
        assert!(text.contains("~/.claude · 2.3 KB"));
        assert!(text.contains("settings.json"));
        assert!(text.contains("▸ todos"));
        assert!(text.contains("Project rules"));
    }

    #[test]
    fn test_render_content_error() {
        let mut browser = browser();
        browser.select("~/.claude/settings.json");
        browser.apply_content(Err(crate::api::client::ApiError::NotFound(
            "settings.json".into(),
        )));
        let text = draw(&browser, &mut FileBrowserState::default());
        assert!(text.contains("Could not read file"));
    }

    #[test]
    fn test_preview_picks_renderer_by_extension() {
        let plain = preview_text("notes.txt", "a\nb");
        assert_eq!(plain.lines.len(), 2);
        let json = preview_text("settings.json", "{}");
        assert!(json.lines.len() > 1);
    }
}
