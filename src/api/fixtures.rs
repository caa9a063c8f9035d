//! Canned data for the mock provider: five sessions across four projects,
//! a transcript per session, shell history, to-dos, settings, and a listing
//! of the configuration directory.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::api::types::{
    ChatMessage, ClaudeFileInfo, ClaudeMessage, ClaudeSession, ClaudeSettings, CommandLogEntry,
    ContentBlock, Hook, HookMatcher, HookSettings, IdeInfo, MessageContent, PermissionSettings,
    ProcessingStatus, SummaryMessage, TodoItem, TodoPriority, TodoStatus,
};

/// 2025-07-20T09:00:00Z. Every fixture timestamp is an offset from here.
const BASE_EPOCH_SECS: i64 = 1_753_002_000;

pub const CLAUDE_DIR: &str = "~/.claude";

/// All the data a [`MockApi`](super::MockApi) serves.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub sessions: Vec<ClaudeSession>,
    /// Transcript records for every session, summaries included.
    pub messages: Vec<ClaudeMessage>,
    pub commands: Vec<CommandLogEntry>,
    /// To-dos keyed by the session that created them.
    pub todos: Vec<(String, TodoItem)>,
    pub settings: ClaudeSettings,
    pub files: Vec<ClaudeFileInfo>,
}

impl Fixtures {
    pub fn demo() -> Self {
        Self {
            sessions: sessions(),
            messages: messages(),
            commands: commands(),
            todos: todos(),
            settings: settings(),
            files: files(),
        }
    }

    pub fn empty() -> Self {
        Self {
            sessions: Vec::new(),
            messages: Vec::new(),
            commands: Vec::new(),
            todos: Vec::new(),
            settings: ClaudeSettings::default(),
            files: Vec::new(),
        }
    }
}

fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(BASE_EPOCH_SECS, 0).unwrap_or_default() + Duration::minutes(minutes)
}

// ============================================================================
// Sessions
// ============================================================================

fn vscode(pid: u32, folder: &str) -> IdeInfo {
    IdeInfo {
        pid,
        workspace_folders: vec![folder.to_string()],
        ide_name: "Visual Studio Code".to_string(),
        transport: "ws-ide".to_string(),
        running_in_windows: false,
        auth_token: "mock-token".to_string(),
    }
}

fn sessions() -> Vec<ClaudeSession> {
    let session = |id: &str,
                   path: &str,
                   branch: Option<&str>,
                   created: i64,
                   updated: i64,
                   count: usize,
                   preview: &str| ClaudeSession {
        session_id: id.to_string(),
        project_path: path.to_string(),
        created_at: at(created),
        updated_at: at(updated),
        message_count: count,
        git_branch: branch.map(str::to_string),
        latest_content_preview: Some(preview.to_string()),
        ide_info: None,
        is_processing: false,
    };

    let mut web_main = session(
        "sess-web-001",
        "/Users/demo/projects/web-app",
        Some("main"),
        180,
        300,
        6,
        "Done. The auth middleware now uses async/await and all 42 tests pass.",
    );
    web_main.ide_info = Some(vscode(48213, "/Users/demo/projects/web-app"));

    let mut web_develop = session(
        "sess-web-002",
        "/Users/demo/projects/web-app",
        Some("develop"),
        120,
        210,
        3,
        "[Using tool: Bash] npm run build",
    );
    web_develop.is_processing = true;

    let mobile = session(
        "sess-mob-001",
        "/Users/demo/projects/mobile-app",
        Some("feature/push-notifications"),
        60,
        130,
        2,
        "CLAUDE.md created with build and test commands.",
    );

    let mut api = session(
        "sess-api-001",
        "/Users/demo/projects/api-server",
        Some("develop"),
        0,
        75,
        3,
        "Rate limiting is applied per API key with a sliding window.",
    );
    api.ide_info = Some(IdeInfo {
        ide_name: "Cursor".to_string(),
        ..vscode(51877, "/Users/demo/projects/api-server")
    });

    let tools = session(
        "sess-tools-001",
        "/opt/tools/scripts",
        None,
        -1300,
        -1210,
        2,
        "The script now skips hidden directories.",
    );

    let mut all = vec![web_main, web_develop, mobile, api, tools];
    all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    all
}

// ============================================================================
// Messages
// ============================================================================

fn chat(session: &str, uuid: &str, minute: i64, cwd: &str, branch: Option<&str>, content: MessageContent) -> ChatMessage {
    ChatMessage {
        uuid: uuid.to_string(),
        parent_uuid: None,
        session_id: session.to_string(),
        timestamp: at(minute),
        cwd: cwd.to_string(),
        git_branch: branch.map(str::to_string),
        processing_status: ProcessingStatus::Completed,
        stop_reason: None,
        content,
    }
}

fn user_text(text: &str) -> MessageContent {
    MessageContent::Text {
        role: "user".to_string(),
        content: text.to_string(),
    }
}

fn assistant_blocks(blocks: Vec<ContentBlock>) -> MessageContent {
    MessageContent::Blocks {
        role: "assistant".to_string(),
        content: blocks,
    }
}

fn text(t: &str) -> ContentBlock {
    ContentBlock::Text { text: t.to_string() }
}

fn tool(id: &str, name: &str, input: serde_json::Value) -> ContentBlock {
    ContentBlock::ToolUse {
        id: id.to_string(),
        name: name.to_string(),
        input,
    }
}

/// Chains messages of one session so each points at its predecessor.
fn thread(messages: Vec<(bool, ChatMessage)>) -> Vec<ClaudeMessage> {
    let mut previous: Option<String> = None;
    messages
        .into_iter()
        .map(|(is_user, mut m)| {
            m.parent_uuid = previous.replace(m.uuid.clone());
            if is_user {
                ClaudeMessage::User(m)
            } else {
                ClaudeMessage::Assistant(m)
            }
        })
        .collect()
}

fn messages() -> Vec<ClaudeMessage> {
    let web = "/Users/demo/projects/web-app";
    let mobile = "/Users/demo/projects/mobile-app";
    let api = "/Users/demo/projects/api-server";
    let scripts = "/opt/tools/scripts";

    let mut all = Vec::new();

    // sess-web-001: refactor with markdown plan, edit tool, inline diff, slash command
    all.extend(thread(vec![
        (true, chat("sess-web-001", "m-web1-1", 180, web, Some("main"), user_text(
            "Can you refactor the auth middleware to use async/await instead of callbacks?",
        ))),
        (false, chat("sess-web-001", "m-web1-2", 182, web, Some("main"), assistant_blocks(vec![
            text("## Plan\n\n1. Convert `verify` to an async function\n2. Replace the callback chain in `authMiddleware`\n3. Update the tests\n\n```ts\nconst user = await verify(token);\n```"),
            tool("toolu_01", "Edit", json!({
                "file_path": "src/middleware/auth.ts",
                "old_string": "function verify(token, cb) {",
                "new_string": "async function verify(token) {"
            })),
        ]))),
        (false, chat("sess-web-001", "m-web1-3", 184, web, Some("main"), assistant_blocks(vec![
            text(r#"{"file_path":"src/middleware/auth.ts","old_string":"verify(token, (err, user) => {\n  if (err) return next(err);","new_string":"const user = await verify(token);"}"#),
        ]))),
        (true, chat("sess-web-001", "m-web1-4", 240, web, Some("main"), user_text(
            "<command-message>compact is running…</command-message>\n<command-name>/compact</command-name>\n<command-args>keep the auth notes</command-args>",
        ))),
        (false, chat("sess-web-001", "m-web1-5", 299, web, Some("main"), assistant_blocks(vec![
            tool("toolu_02", "Bash", json!({"command": "npm test", "description": "Run the test suite"})),
        ]))),
        (false, chat("sess-web-001", "m-web1-6", 300, web, Some("main"), assistant_blocks(vec![
            text("Done. The auth middleware now uses async/await and all 42 tests pass."),
        ]))),
    ]));
    all.push(ClaudeMessage::Summary(SummaryMessage {
        summary: "Auth middleware refactor to async/await".to_string(),
        leaf_uuid: "m-web1-6".to_string(),
    }));

    // sess-web-002: build failure investigation, still running
    all.extend(thread(vec![
        (true, chat("sess-web-002", "m-web2-1", 120, web, Some("develop"), user_text(
            "Why is the build failing on develop?",
        ))),
        (false, chat("sess-web-002", "m-web2-2", 121, web, Some("develop"), assistant_blocks(vec![
            text("Let me run the build to see the error."),
            tool("toolu_03", "Bash", json!({"command": "npm run build"})),
        ]))),
        (false, chat("sess-web-002", "m-web2-3", 210, web, Some("develop"), assistant_blocks(vec![
            text("The build fails for two reasons:\n\n- `tsconfig.json` enables `strict` but `src/legacy/` is untyped\n- `@types/node` is pinned to an old major\n\nI can exclude the legacy folder or add types."),
        ]))),
    ]));

    // sess-mob-001: bare slash command without message or args
    all.extend(thread(vec![
        (true, chat("sess-mob-001", "m-mob-1", 60, mobile, Some("feature/push-notifications"), user_text(
            "<command-name>/init</command-name>",
        ))),
        (false, chat("sess-mob-001", "m-mob-2", 130, mobile, Some("feature/push-notifications"), assistant_blocks(vec![
            tool("toolu_04", "Write", json!({"file_path": "CLAUDE.md", "content": "# Mobile App\n\n- Build: `npm run ios`\n- Test: `npm test`"})),
            text("CLAUDE.md created with build and test commands."),
        ]))),
    ]));

    // sess-api-001: reading code, plain-text answer
    all.extend(thread(vec![
        (true, chat("sess-api-001", "m-api-1", 0, api, Some("develop"), user_text(
            "How does rate limiting work in this service?",
        ))),
        (false, chat("sess-api-001", "m-api-2", 2, api, Some("develop"), assistant_blocks(vec![
            tool("toolu_05", "Read", json!({"file_path": "src/middleware/rate_limit.rs"})),
        ]))),
        (false, chat("sess-api-001", "m-api-3", 75, api, Some("develop"), assistant_blocks(vec![
            text("Rate limiting is applied per API key with a sliding window.\nLimits come from RATE_LIMIT_PER_MINUTE (default 120)."),
        ]))),
    ]));
    all.push(ClaudeMessage::Summary(SummaryMessage {
        summary: "Rate limiting walkthrough".to_string(),
        leaf_uuid: "m-api-3".to_string(),
    }));

    // sess-tools-001: outside the home directory, no branch
    all.extend(thread(vec![
        (true, chat("sess-tools-001", "m-tools-1", -1300, scripts, None, user_text(
            "Make backup.sh skip hidden directories",
        ))),
        (false, chat("sess-tools-001", "m-tools-2", -1210, scripts, None, assistant_blocks(vec![
            text("The script now skips hidden directories."),
        ]))),
    ]));

    all
}

// ============================================================================
// Commands, to-dos, settings
// ============================================================================

fn commands() -> Vec<CommandLogEntry> {
    let entry = |minute: i64, command: &str, cwd: &str| CommandLogEntry {
        timestamp: at(minute),
        user: "demo".to_string(),
        command: command.to_string(),
        cwd: Some(cwd.to_string()),
    };
    let web = "/Users/demo/projects/web-app";
    let api = "/Users/demo/projects/api-server";
    let mut all = vec![
        entry(299, "npm test", web),
        entry(185, "git diff src/middleware/auth.ts", web),
        entry(121, "npm run build", web),
        entry(125, "git checkout develop", web),
        entry(70, "cargo test rate_limit", api),
        entry(3, "rg \"RATE_LIMIT\" src/", api),
        entry(-1250, "ls -la /opt/tools/scripts", "/opt/tools/scripts"),
        entry(-1220, "bash backup.sh --dry-run", "/opt/tools/scripts"),
    ];
    all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    all
}

fn todos() -> Vec<(String, TodoItem)> {
    let todo = |session: &str, id: &str, content: &str, status, priority| {
        (
            session.to_string(),
            TodoItem {
                id: id.to_string(),
                content: content.to_string(),
                status,
                priority,
            },
        )
    };
    vec![
        todo("sess-web-001", "1", "Convert verify() to async", TodoStatus::Completed, TodoPriority::High),
        todo("sess-web-001", "2", "Update auth middleware tests", TodoStatus::Completed, TodoPriority::Medium),
        todo("sess-web-002", "3", "Fix strict-mode errors in src/legacy", TodoStatus::InProgress, TodoPriority::High),
        todo("sess-web-002", "4", "Bump @types/node", TodoStatus::Pending, TodoPriority::Low),
        todo("sess-api-001", "5", "Document RATE_LIMIT_PER_MINUTE", TodoStatus::Pending, TodoPriority::Medium),
        todo("sess-mob-001", "6", "Add push notification entitlement", TodoStatus::Pending, TodoPriority::High),
    ]
}

fn settings() -> ClaudeSettings {
    ClaudeSettings {
        permissions: PermissionSettings {
            default_mode: "acceptEdits".to_string(),
            allow: vec![
                "Bash(npm run test:*)".to_string(),
                "Bash(git status)".to_string(),
                "Read(**)".to_string(),
            ],
            deny: vec!["Bash(rm -rf:*)".to_string(), "Bash(curl:*)".to_string()],
        },
        hooks: HookSettings {
            pre_tool_use: vec![HookMatcher {
                matcher: "Bash".to_string(),
                hooks: vec![Hook {
                    hook_type: "command".to_string(),
                    command: "~/.claude/scripts/audit-bash.sh".to_string(),
                }],
            }],
        },
    }
}

// ============================================================================
// Configuration directory
// ============================================================================

fn files() -> Vec<ClaudeFileInfo> {
    let file = |path: &str, size: u64, minute: i64, is_directory: bool, file_type: &str| ClaudeFileInfo {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: format!("{CLAUDE_DIR}/{path}"),
        size,
        modified: at(minute),
        is_directory,
        file_type: file_type.to_string(),
    };
    vec![
        file("settings.json", 612, 100, false, "json"),
        file("CLAUDE.md", 1_480, -2000, false, "markdown"),
        file("command_history.log", 2_304, 299, false, "log"),
        file("projects", 0, 300, true, "directory"),
        file("projects/-Users-demo-projects-web-app/sess-web-001.jsonl", 48_920, 300, false, "jsonl"),
        file("projects/-Users-demo-projects-api-server/sess-api-001.jsonl", 21_377, 75, false, "jsonl"),
        file("todos", 0, 210, true, "directory"),
        file("todos/sess-web-002.json", 388, 210, false, "json"),
        file("scripts/audit-bash.sh", 214, -5000, false, "shell"),
    ]
}
