use crate::api::client::ApiResult;
use crate::api::types::{TodoItem, TodoStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// To-do list tab: every to-do across sessions, optionally narrowed to one
/// status.
#[derive(Debug, Default)]
pub struct TodoList {
    pub items: Vec<TodoItem>,
    /// `None` shows every status.
    pub status_filter: Option<TodoStatus>,
    pub loading: bool,
    pub error: Option<String>,
}

impl TodoList {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply(&mut self, result: ApiResult<Vec<TodoItem>>) {
        self.loading = false;
        match result {
            Ok(mut items) => {
                // Open work first, then by priority.
                items.sort_by(|a, b| {
                    b.status
                        .is_open()
                        .cmp(&a.status.is_open())
                        .then_with(|| b.priority.cmp(&a.priority))
                });
                self.items = items;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn cycle_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(TodoStatus::Pending),
            Some(TodoStatus::Pending) => Some(TodoStatus::InProgress),
            Some(TodoStatus::InProgress) => Some(TodoStatus::Completed),
            Some(TodoStatus::Completed) => None,
        };
    }

    pub fn filter_label(&self) -> &'static str {
        self.status_filter.map_or("All", TodoStatus::label)
    }

    pub fn visible(&self) -> Vec<&TodoItem> {
        self.items
            .iter()
            .filter(|t| self.status_filter.is_none_or(|s| t.status == s))
            .collect()
    }

    pub fn counts(&self) -> TodoCounts {
        self.items
            .iter()
            .fold(TodoCounts::default(), |mut counts, todo| {
                match todo.status {
                    TodoStatus::Pending => counts.pending += 1,
                    TodoStatus::InProgress => counts.in_progress += 1,
                    TodoStatus::Completed => counts.completed += 1,
                }
                counts
            })
    }
}
