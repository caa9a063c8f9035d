//! # TUI Components
//!
//! ## Primitives
//!
//! - `Card`: bordered, titled panel with an optional key-hint line
//! - `TabsState` / `TabBar`: the tab strip
//! - `TextInput`: one-line search and prompt field
//! - `TitleBar`: top line with data source, status and a loading spinner
//! - `ErrorPanel`: failed fetch with a retry hint
//!
//! ## Views
//!
//! One per tab. Each follows the persistent state + transient wrapper
//! pattern: `FooState` lives in `TuiState` and holds cursors and text
//! inputs, `Foo<'a>` is built every frame from borrowed core state plus
//! `&mut FooState` and rendered.
//!
//! Views never mutate core state. Key handling returns a view event which
//! the loop turns into a `core::action::Action`.
//!
//! ```text
//! components/
//! ├── card.rs, tabs.rs, text_input.rs, title_bar.rs, error_panel.rs
//! ├── overview.rs
//! ├── session_list.rs   (+ message_view.rs for the transcript)
//! ├── command_list.rs
//! ├── todo_list.rs
//! ├── settings_panel.rs
//! └── file_browser.rs
//! ```

pub mod card;
pub mod command_list;
pub mod error_panel;
pub mod file_browser;
pub mod message_view;
pub mod overview;
pub mod session_list;
pub mod settings_panel;
pub mod tabs;
pub mod text_input;
pub mod title_bar;
pub mod todo_list;

pub use card::Card;
pub use error_panel::ErrorPanel;
pub use tabs::{TabBar, TabsState};
pub use text_input::{TextInput, TextInputEvent};
pub use title_bar::TitleBar;

use chrono::{DateTime, Local, Utc};
use ratatui::widgets::ListState;

/// Format a timestamp as "Jul 20 14:05" in local time.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %d %H:%M").to_string()
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

/// Truncate to `max_chars` characters, adding "..." if needed.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        ".".repeat(max_chars)
    } else {
        let kept: String = s.chars().take(max_chars - 3).collect();
        format!("{kept}...")
    }
}

/// Move a list cursor by `delta`, clamped to `0..len`.
pub fn step_selection(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(next as usize));
}

/// Keep a list cursor valid after the list changed length.
pub fn clamp_selection(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), len) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}
