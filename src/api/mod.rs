pub mod client;
pub mod fixtures;
pub mod mock;
pub mod notify;
pub mod types;

pub use client::{ApiError, ApiResult, ManagerApi};
pub use mock::{Latency, MockApi};
pub use notify::{ChangeNotifier, Subscription};
pub use types::{
    ChangeEvent, ClaudeDirectoryInfo, ClaudeFileInfo, ClaudeMessage, ClaudeSession,
    ClaudeSettings, CommandLogEntry, ContentBlock, IdeInfo, MessageContent, ProjectSummary,
    SessionStats, TodoItem, TodoPriority, TodoStatus,
};
