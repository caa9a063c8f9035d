//! Project path helpers.
//!
//! The assistant stores each project's sessions under a directory whose name
//! is the project path with every `/` replaced by `-`
//! (`/Users/me/web-app` → `-Users-me-web-app`). Decoding is lossy: a literal
//! hyphen inside a segment comes back as a separator. That ambiguity is
//! inherent to the encoding and accepted here.

/// Decode a dash-encoded project directory name into a slash path.
///
/// Already-decoded paths (leading `/`) pass through unchanged, so the
/// function is idempotent.
pub fn normalize_project_path(encoded: &str) -> String {
    if encoded.is_empty() || encoded.starts_with('/') {
        return encoded.to_string();
    }

    let decoded = encoded.replace('-', "/");
    if decoded.starts_with("Users/") {
        format!("/{decoded}")
    } else {
        decoded
    }
}

/// Last non-empty segment of the normalized path, e.g. `MyProj`.
pub fn project_display_name(path: &str) -> String {
    let normalized = normalize_project_path(path);
    normalized
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or(normalized)
}

pub fn is_path_in_home_directory(path: &str) -> bool {
    normalize_project_path(path).starts_with("/Users/")
}
