//! Configuration directory browser: a flat listing plus a preview of the
//! selected file.

use crate::api::client::ApiResult;
use crate::api::types::{ClaudeDirectoryInfo, ClaudeFileInfo};

#[derive(Debug, Default)]
pub struct FileBrowser {
    pub info: Option<ClaudeDirectoryInfo>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<String>,
    pub content: Option<String>,
    pub content_loading: bool,
    pub content_error: Option<String>,
}

impl FileBrowser {
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply_directory(&mut self, result: ApiResult<ClaudeDirectoryInfo>) {
        self.loading = false;
        match result {
            Ok(info) => {
                self.info = Some(info);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn files(&self) -> &[ClaudeFileInfo] {
        self.info
            .as_ref()
            .map(|info| info.files.as_slice())
            .unwrap_or_default()
    }

    /// Select a file for preview. Directories cannot be previewed; returns
    /// false for them and for unknown paths.
    pub fn select(&mut self, path: &str) -> bool {
        let Some(file) = self.files().iter().find(|f| f.path == path) else {
            return false;
        };
        if file.is_directory {
            return false;
        }
        self.selected = Some(path.to_string());
        self.content = None;
        self.content_loading = true;
        self.content_error = None;
        true
    }

    pub fn apply_content(&mut self, result: ApiResult<String>) {
        self.content_loading = false;
        match result {
            Ok(content) => {
                self.content = Some(content);
                self.content_error = None;
            }
            Err(e) => self.content_error = Some(e.to_string()),
        }
    }

    /// Path and current content of the previewed file, for rewriting it
    /// unchanged.
    pub fn touch_target(&self) -> Option<(String, String)> {
        Some((self.selected.clone()?, self.content.clone()?))
    }
}
