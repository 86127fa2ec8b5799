//! Identifier validation and canonical file names.

/// Sub-project every category implicitly has. Scenes in it are stored
/// directly under the category folder.
pub const DEFAULT_SUB_PROJECT: &str = "None";

/// Minimum width of the version field. Larger numbers widen the field
/// instead of being truncated.
pub const VERSION_PADDING: usize = 3;

pub fn is_default_sub_project(sub_project: &str) -> bool {
    sub_project.is_empty() || sub_project == DEFAULT_SUB_PROJECT
}

/// Accepts non-empty ASCII alphanumerics, `_` and `-`; spaces only when
/// `allow_spaces` is set. Leading/trailing whitespace is never accepted.
pub fn is_valid_identifier(text: &str, allow_spaces: bool) -> bool {
    if text.is_empty() || text.trim() != text {
        return false;
    }
    text.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || (allow_spaces && c == ' '))
}

/// `v001`, `v042`, `v1000`
pub fn version_tag(version: u32) -> String {
    format!("v{:0width$}", version, width = VERSION_PADDING)
}

/// `{base}_{category}_{initials}_v{NNN}`
pub fn format_versioned_name(
    base_name: &str,
    category: &str,
    author_initials: &str,
    version: u32,
) -> String {
    format!(
        "{}_{}_{}_{}",
        base_name,
        category,
        author_initials,
        version_tag(version)
    )
}

/// `{base}_{category}_forReference`
pub fn format_reference_name(base_name: &str, category: &str) -> String {
    format!("{}_{}_forReference", base_name, category)
}

/// Camera identifiers become part of preview file names.
pub fn sanitize_camera(camera: &str) -> String {
    camera.replace('|', "__").replace(' ', "_")
}

/// `{versionName}_{camera}_PB.{ext}`
pub fn format_preview_name(version_name: &str, camera: &str, extension: &str) -> String {
    format!(
        "{}_{}_PB.{}",
        version_name,
        sanitize_camera(camera),
        extension
    )
}

/// Note block as stored on a version: author and timestamp header, then text.
pub fn format_note(author: &str, timestamp: &chrono::DateTime<chrono::Local>, text: &str) -> String {
    format!(
        "[{}] on {}\n{}\n",
        author,
        timestamp.format("%d/%m/%Y-%H:%M"),
        text
    )
}
