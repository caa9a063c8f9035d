//! # Settings Edit Session
//!
//! ```text
//!            start_edit            begin_save
//! Viewing ─────────────▶ Editing ─────────────▶ Saving
//!    ▲                    │   ▲                   │
//!    │       cancel       │   │   save failed     │
//!    ├────────────────────┘   └───────────────────┤
//!    │                  save succeeded            │
//!    └────────────────────────────────────────────┘
//! ```
//!
//! The draft is a full copy of the loaded settings; edits only touch the
//! draft. "Unsaved changes" is deep equality between the two.

use log::{debug, info, warn};

use crate::api::client::ApiResult;
use crate::api::types::{ClaudeSettings, Hook, HookMatcher};

/// Permission modes in cycling order.
pub const DEFAULT_MODES: [&str; 4] = ["default", "acceptEdits", "plan", "bypassPermissions"];

/// Mode after `current`; an unrecognized mode restarts the cycle.
pub fn next_default_mode(current: &str) -> &'static str {
    DEFAULT_MODES
        .iter()
        .position(|m| *m == current)
        .map_or(DEFAULT_MODES[0], |i| DEFAULT_MODES[(i + 1) % DEFAULT_MODES.len()])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Viewing,
    Editing { draft: ClaudeSettings },
    Saving { draft: ClaudeSettings },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEdit {
    AddAllow(String),
    RemoveAllow(usize),
    AddDeny(String),
    RemoveDeny(usize),
    CycleDefaultMode,
    AddHook { matcher: String, command: String },
    RemoveHook(usize),
}

#[derive(Debug)]
pub struct SettingsEditor {
    pub loaded: Option<ClaudeSettings>,
    pub state: EditState,
    pub loading: bool,
    pub error: Option<String>,
    pub save_error: Option<String>,
}

impl Default for SettingsEditor {
    fn default() -> Self {
        Self {
            loaded: None,
            state: EditState::Viewing,
            loading: false,
            error: None,
            save_error: None,
        }
    }
}

impl SettingsEditor {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_loaded(&mut self, result: ApiResult<ClaudeSettings>) {
        self.loading = false;
        match result {
            Ok(settings) => {
                self.loaded = Some(settings);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, EditState::Saving { .. })
    }

    /// Settings as currently displayed: the draft while editing or saving,
    /// otherwise the last loaded copy.
    pub fn current(&self) -> Option<&ClaudeSettings> {
        match &self.state {
            EditState::Editing { draft } | EditState::Saving { draft } => Some(draft),
            EditState::Viewing => self.loaded.as_ref(),
        }
    }

    pub fn start_edit(&mut self) -> bool {
        let Some(loaded) = &self.loaded else {
            return false;
        };
        if self.state != EditState::Viewing {
            return false;
        }
        debug!("Settings: Viewing -> Editing");
        self.state = EditState::Editing {
            draft: loaded.clone(),
        };
        self.save_error = None;
        true
    }

    /// Discard the draft.
    pub fn cancel(&mut self) {
        if self.is_editing() {
            debug!("Settings: Editing -> Viewing (draft discarded)");
            self.state = EditState::Viewing;
            self.save_error = None;
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        match &self.state {
            EditState::Editing { draft } | EditState::Saving { draft } => {
                self.loaded.as_ref() != Some(draft)
            }
            EditState::Viewing => false,
        }
    }

    pub fn can_save(&self) -> bool {
        self.is_editing() && self.has_unsaved_changes()
    }

    /// Move to `Saving` and hand back the draft to persist.
    pub fn begin_save(&mut self) -> Option<ClaudeSettings> {
        if !self.can_save() {
            return None;
        }
        let EditState::Editing { draft } = std::mem::replace(&mut self.state, EditState::Viewing)
        else {
            return None;
        };
        info!("Settings: Editing -> Saving");
        self.save_error = None;
        self.state = EditState::Saving {
            draft: draft.clone(),
        };
        Some(draft)
    }

    /// Finish a save. On success the saved draft becomes the loaded copy and
    /// `true` is returned so the caller re-fetches; on failure the draft goes
    /// back to editing with the error shown.
    pub fn save_finished(&mut self, result: ApiResult<()>) -> bool {
        let EditState::Saving { draft } = std::mem::replace(&mut self.state, EditState::Viewing)
        else {
            warn!("Settings save finished while not saving");
            return false;
        };
        match result {
            Ok(()) => {
                info!("Settings: Saving -> Viewing");
                self.loaded = Some(draft);
                true
            }
            Err(e) => {
                warn!("Settings save failed: {}", e);
                self.save_error = Some(e.to_string());
                self.state = EditState::Editing { draft };
                false
            }
        }
    }

    /// Apply one edit to the draft. Returns false when not editing or the
    /// edit changed nothing.
    pub fn edit(&mut self, edit: SettingsEdit) -> bool {
        let EditState::Editing { draft } = &mut self.state else {
            return false;
        };
        let permissions = &mut draft.permissions;
        match edit {
            SettingsEdit::AddAllow(pattern) => add_pattern(&mut permissions.allow, pattern),
            SettingsEdit::AddDeny(pattern) => add_pattern(&mut permissions.deny, pattern),
            SettingsEdit::RemoveAllow(index) => remove_at(&mut permissions.allow, index),
            SettingsEdit::RemoveDeny(index) => remove_at(&mut permissions.deny, index),
            SettingsEdit::CycleDefaultMode => {
                permissions.default_mode = next_default_mode(&permissions.default_mode).to_string();
                true
            }
            SettingsEdit::AddHook { matcher, command } => {
                let (matcher, command) = (matcher.trim(), command.trim());
                if matcher.is_empty() || command.is_empty() {
                    return false;
                }
                draft.hooks.pre_tool_use.push(HookMatcher {
                    matcher: matcher.to_string(),
                    hooks: vec![Hook {
                        hook_type: "command".to_string(),
                        command: command.to_string(),
                    }],
                });
                true
            }
            SettingsEdit::RemoveHook(index) => remove_at(&mut draft.hooks.pre_tool_use, index),
        }
    }

    /// Patterns that appear in both allow and deny. Advisory only; saving is
    /// not blocked.
    pub fn duplicate_patterns(&self) -> Vec<String> {
        let Some(settings) = self.current() else {
            return Vec::new();
        };
        let permissions = &settings.permissions;
        permissions
            .allow
            .iter()
            .filter(|p| permissions.deny.contains(p))
            .cloned()
            .collect()
    }
}

fn add_pattern(list: &mut Vec<String>, pattern: String) -> bool {
    let pattern = pattern.trim();
    if pattern.is_empty() || list.iter().any(|p| p == pattern) {
        return false;
    }
    list.push(pattern.to_string());
    true
}

fn remove_at<T>(list: &mut Vec<T>, index: usize) -> bool {
    if index < list.len() {
        list.remove(index);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiError;
    use crate::api::types::PermissionSettings;

    fn loaded_editor() -> SettingsEditor {
        let mut editor = SettingsEditor::default();
        editor.begin_load();
        editor.apply_loaded(Ok(ClaudeSettings {
            permissions: PermissionSettings {
                default_mode: "default".into(),
                allow: vec!["Bash(ls:*)".into()],
                deny: vec!["Bash(rm:*)".into()],
            },
            ..Default::default()
        }));
        editor
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(next_default_mode("default"), "acceptEdits");
        assert_eq!(next_default_mode("plan"), "bypassPermissions");
        assert_eq!(next_default_mode("bypassPermissions"), "default");
        assert_eq!(next_default_mode("weird"), "default");
    }

    #[test]
    fn test_cannot_edit_before_load() {
        let mut editor = SettingsEditor::default();
        assert!(!editor.start_edit());
        assert!(!editor.edit(SettingsEdit::CycleDefaultMode));
    }

    #[test]
    fn test_no_changes_means_no_save() {
        let mut editor = loaded_editor();
        editor.start_edit();
        assert!(!editor.has_unsaved_changes());
        assert!(!editor.can_save());
        assert_eq!(editor.begin_save(), None);
        assert!(editor.is_editing());
    }

    #[test]
    fn test_reverting_an_edit_clears_unsaved_flag() {
        let mut editor = loaded_editor();
        editor.start_edit();
        assert!(editor.edit(SettingsEdit::AddAllow("Read(**)".into())));
        assert!(editor.has_unsaved_changes());
        assert!(editor.edit(SettingsEdit::RemoveAllow(1)));
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut editor = loaded_editor();
        editor.start_edit();
        editor.edit(SettingsEdit::CycleDefaultMode);
        editor.cancel();
        assert_eq!(editor.state, EditState::Viewing);
        assert_eq!(
            editor.current().map(|s| s.permissions.default_mode.as_str()),
            Some("default")
        );
    }

    #[test]
    fn test_successful_save_round_trip() {
        let mut editor = loaded_editor();
        editor.start_edit();
        editor.edit(SettingsEdit::CycleDefaultMode);
        let draft = editor.begin_save().unwrap();
        assert!(editor.is_saving());
        assert!(!editor.can_save());

        assert!(editor.save_finished(Ok(())));
        assert_eq!(editor.state, EditState::Viewing);
        assert_eq!(editor.loaded.as_ref(), Some(&draft));
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_failed_save_returns_to_editing() {
        let mut editor = loaded_editor();
        editor.start_edit();
        editor.edit(SettingsEdit::AddDeny("Bash(curl:*)".into()));
        editor.begin_save();

        assert!(!editor.save_finished(Err(ApiError::Rejected("read-only".into()))));
        assert!(editor.is_editing());
        assert!(editor.has_unsaved_changes());
        assert_eq!(editor.save_error.as_deref(), Some("request rejected: read-only"));
    }

    #[test]
    fn test_duplicate_patterns_are_reported() {
        let mut editor = loaded_editor();
        editor.start_edit();
        editor.edit(SettingsEdit::AddDeny("Bash(ls:*)".into()));
        assert_eq!(editor.duplicate_patterns(), vec!["Bash(ls:*)"]);
        // Advisory only.
        assert!(editor.can_save());
    }

    #[test]
    fn test_blank_and_repeated_patterns_are_ignored() {
        let mut editor = loaded_editor();
        editor.start_edit();
        assert!(!editor.edit(SettingsEdit::AddAllow("   ".into())));
        assert!(!editor.edit(SettingsEdit::AddAllow(" Bash(ls:*) ".into())));
        assert!(!editor.edit(SettingsEdit::RemoveDeny(5)));
    }

    #[test]
    fn test_hooks() {
        let mut editor = loaded_editor();
        editor.start_edit();
        assert!(!editor.edit(SettingsEdit::AddHook {
            matcher: "Bash".into(),
            command: " ".into()
        }));
        assert!(editor.edit(SettingsEdit::AddHook {
            matcher: "Bash".into(),
            command: "audit.sh".into()
        }));
        let hooks = &editor.current().unwrap().hooks.pre_tool_use;
        assert_eq!(hooks[0].hooks[0].hook_type, "command");
        assert!(editor.edit(SettingsEdit::RemoveHook(0)));
        assert!(!editor.has_unsaved_changes());
    }
}
