//! Markdown → ratatui `Text` renderer for assistant replies.
//!
//! Walks `pulldown_cmark` events and emits styled `Line`/`Span` values:
//! headings, emphasis, inline code, fenced code (syntect-highlighted, with
//! `diff` fences colored by `+`/`-`), lists, task lists, block quotes, links,
//! and tables flattened to `│`-separated rows.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Colors used for one rendering. The base color differs per speaker.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownTheme {
    pub text: Color,
    pub muted: Color,
    pub link: Color,
    pub code_fg: Color,
    pub code_bg: Color,
    /// Key into syntect's default theme set.
    pub syntax_theme: &'static str,
}

impl MarkdownTheme {
    pub fn with_text(text: Color) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }
}

impl Default for MarkdownTheme {
    fn default() -> Self {
        Self {
            text: Color::Reset,
            muted: Color::DarkGray,
            link: Color::Cyan,
            code_fg: Color::White,
            code_bg: Color::DarkGray,
            syntax_theme: "base16-ocean.dark",
        }
    }
}

pub fn render(content: &str, theme: &MarkdownTheme) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_TABLES);

    let mut w = Writer::new(*theme);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeMode {
    None,
    Plain,
    Diff,
}

struct Writer {
    text: Text<'static>,
    theme: MarkdownTheme,
    /// Inline style stack; entries compose via `patch` so bold+italic nests.
    styles: Vec<Style>,
    /// Per-line prefixes (block quote and code block gutters).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = bullets, Some(n) = numbered, next index n.
    list_indices: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    code_mode: CodeMode,
    link_url: Option<String>,
    needs_newline: bool,
    /// Cells already emitted on the current table row.
    table_cells: usize,
}

impl Writer {
    fn new(theme: MarkdownTheme) -> Self {
        Self {
            text: Text::default(),
            theme,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            code_mode: CodeMode::None,
            link_url: None,
            needs_newline: false,
            table_cells: 0,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.theme.text))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn muted(&self) -> Style {
        Style::default().fg(self.theme.muted)
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for prefix in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, prefix);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled("─".repeat(40), self.muted())));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::styled(marker, self.muted()));
            }
            // Raw HTML shows up in prompts as literal tags; keep it visible.
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = self.muted();
                for (i, line) in html.lines().enumerate() {
                    if i > 0 {
                        self.push_line(Line::default());
                    }
                    self.push_span(Span::styled(line.to_owned(), style));
                }
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let style = heading_style(self.theme.text, level);
                self.push_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(level as usize)),
                    style,
                )));
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes.push(Span::styled("│ ", self.muted()));
                self.push_style(
                    Style::default()
                        .fg(self.theme.text)
                        .add_modifier(Modifier::DIM | Modifier::ITALIC),
                );
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind),
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                let marker = match self.list_indices.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.push_span(Span::styled(marker, self.muted()));
            }
            Tag::Table(_) => {
                self.blank_line_if_needed();
            }
            Tag::TableHead => {
                self.push_line(Line::default());
                self.table_cells = 0;
                self.push_style(Style::default().add_modifier(Modifier::BOLD));
            }
            Tag::TableRow => {
                self.push_line(Line::default());
                self.table_cells = 0;
            }
            Tag::TableCell => {
                if self.table_cells > 0 {
                    self.push_span(Span::styled(" │ ", self.muted()));
                }
                self.table_cells += 1;
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(self.theme.link)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {}
        }
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) {
        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
        let lang = match &kind {
            CodeBlockKind::Fenced(l) => l.split_whitespace().next().unwrap_or(""),
            CodeBlockKind::Indented => "",
        };

        let border = self.muted();
        let top = if lang.is_empty() {
            Line::from(Span::styled("╭──", border))
        } else {
            Line::from(vec![
                Span::styled("╭── ", border),
                Span::styled(lang.to_owned(), border.add_modifier(Modifier::BOLD)),
                Span::styled(" ──", border),
            ])
        };
        self.push_line(top);
        self.line_prefixes.push(Span::styled("│ ", border));

        if matches!(lang, "diff" | "patch") {
            self.code_mode = CodeMode::Diff;
            return;
        }
        if !lang.is_empty()
            && let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang)
            && let Some(theme) = THEME_SET.themes.get(self.theme.syntax_theme)
        {
            self.highlighter = Some(HighlightLines::new(syntax, theme));
        } else {
            self.code_mode = CodeMode::Plain;
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.code_mode = CodeMode::None;
                self.line_prefixes.pop();
                self.push_line(Line::from(Span::styled("╰──", self.muted())));
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::TableHead => self.pop_style(),
            TagEnd::Table => self.needs_newline = true,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    let style = Style::default()
                        .fg(self.theme.link)
                        .add_modifier(Modifier::UNDERLINED);
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(url, style));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', "    ");

        if let Some(mut highlighter) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                let Ok(ranges) = highlighter.highlight_line(line, &SYNTAX_SET) else {
                    continue;
                };
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(style, fragment)| {
                        let content = fragment.trim_end_matches('\n');
                        if content.is_empty() {
                            return None;
                        }
                        let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                        Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
                    })
                    .collect();
                self.push_line(Line::from(spans));
            }
            self.highlighter = Some(highlighter);
            return;
        }

        match self.code_mode {
            CodeMode::Plain => {
                let style = Style::default().fg(self.theme.code_fg);
                for line in text.lines() {
                    self.push_line(Line::from(Span::styled(line.to_owned(), style)));
                }
            }
            CodeMode::Diff => {
                for line in text.lines() {
                    let style = diff_line_style(line, self.theme.code_fg);
                    self.push_line(Line::from(Span::styled(line.to_owned(), style)));
                }
            }
            CodeMode::None => {
                let style = self.style();
                self.push_span(Span::styled(text, style));
            }
        }
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        let style = Style::default().fg(self.theme.code_fg).bg(self.theme.code_bg);
        self.push_span(Span::styled(cow.to_string(), style));
    }
}

fn heading_style(text: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(text);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => style.add_modifier(Modifier::BOLD),
        _ => style.add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn diff_line_style(line: &str, default: Color) -> Style {
    if line.starts_with("+++") || line.starts_with("---") {
        Style::default().fg(default).add_modifier(Modifier::BOLD)
    } else if line.starts_with('+') {
        Style::default().fg(Color::Green)
    } else if line.starts_with('-') {
        Style::default().fg(Color::Red)
    } else if line.starts_with("@@") {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn blue() -> MarkdownTheme {
        MarkdownTheme::with_text(Color::Blue)
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Plan", &blue());
        let line = &text.lines[0];
        assert!(line.spans.len() >= 2, "expected >= 2 spans, got {line:?}");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[1].style.fg, Some(Color::Blue));
    }

    #[test]
    fn nested_emphasis_composes() {
        let text = render("***both***", &blue());
        let span = text.lines[0].spans.iter().find(|s| s.content == "both").unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
    }

    #[test]
    fn inline_code_styled() {
        let text = render("Run `npm test` first", &blue());
        let span = text.lines[0].spans.iter().find(|s| s.content == "npm test").unwrap();
        assert_eq!(span.style.fg, Some(Color::White));
        assert_eq!(span.style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn code_block_has_border_structure() {
        let lines = plain(&render("```\nline1\nline2\n```", &blue()));
        assert!(lines[0].starts_with('╭'), "top border, got {:?}", lines[0]);
        assert!(lines[1].starts_with("│ ") && lines[1].contains("line1"));
        assert!(lines[2].starts_with("│ ") && lines[2].contains("line2"));
        assert!(lines.last().unwrap().starts_with('╰'));
    }

    #[test]
    fn highlighted_code_keeps_every_line() {
        let lines = plain(&render("```rust\nfn a() {}\n\nfn b() {}\n```", &blue()));
        assert_eq!(lines[0], "╭── rust ──");
        assert!(lines.iter().any(|l| l.contains("fn a")));
        assert!(lines.iter().any(|l| l.contains("fn b")));
    }

    #[test]
    fn diff_fence_colors_changes() {
        let text = render("```diff\n-old\n+new\n same\n```", &blue());
        let find = |needle: &str| {
            text.lines
                .iter()
                .flat_map(|l| l.spans.iter())
                .find(|s| s.content == needle)
                .unwrap()
                .style
                .fg
        };
        assert_eq!(find("-old"), Some(Color::Red));
        assert_eq!(find("+new"), Some(Color::Green));
        assert_eq!(find(" same"), Some(Color::White));
    }

    #[test]
    fn lists_are_numbered_and_bulleted() {
        let lines = plain(&render("1. first\n2. second\n\n- bullet", &blue()));
        assert!(lines.iter().any(|l| l == "1. first"));
        assert!(lines.iter().any(|l| l == "2. second"));
        assert!(lines.iter().any(|l| l == "• bullet"));
    }

    #[test]
    fn tables_flatten_to_rows() {
        let lines = plain(&render("| a | b |\n|---|---|\n| 1 | 2 |", &blue()));
        assert!(lines.iter().any(|l| l == "a │ b"), "{lines:?}");
        assert!(lines.iter().any(|l| l == "1 │ 2"), "{lines:?}");
    }

    #[test]
    fn plain_text_uses_theme_color() {
        let text = render("hello", &MarkdownTheme::with_text(Color::Green));
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn tabs_expanded_to_spaces() {
        let text = render("```\n\tindented\n```", &blue());
        assert!(text.lines.iter().any(|l| l.spans.iter().any(|s| s.content.starts_with("    "))));
        assert!(!text.lines.iter().any(|l| l.spans.iter().any(|s| s.content.contains('\t'))));
    }
}
