//! Filename sanitization for preset and audio artifact storage.
//!
//! Both preset names (user supplied, may contain CJK text) and audio
//! filenames (taken from URL path segments) end up as filesystem paths, so
//! every external string passes through one of the mappers here before it
//! touches the disk.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Maximum length in characters of a sanitized preset name.
const MAX_PRESET_STEM_LEN: usize = 50;

/// Stem used when sanitization leaves nothing usable.
const FALLBACK_PRESET_STEM: &str = "default";

// Word characters, hyphens, and the CJK, kana, and hangul ranges survive;
// everything else becomes an underscore.
static PRESET_UNSAFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\-\x{4e00}-\x{9fff}\x{3040}-\x{30ff}\x{ac00}-\x{d7af}]")
        .unwrap_or_else(|e| panic!("invalid preset sanitizer pattern: {e}"))
});

/// Map an arbitrary preset name to a filesystem-safe stem.
///
/// Unsafe characters are replaced with underscores, the result is truncated
/// to 50 characters, and leading/trailing underscores are stripped. A name
/// that sanitizes to nothing maps to `"default"`. The mapping is many-to-one:
/// distinct names may share a stem, and the caller treats that as
/// last-writer-wins.
///
/// # Example
/// ```rust
/// use voxrelay::core::sanitize::safe_preset_stem;
///
/// assert_eq!(safe_preset_stem("早安 问候/语音"), "早安_问候_语音");
/// assert_eq!(safe_preset_stem("///"), "default");
/// ```
pub fn safe_preset_stem(name: &str) -> String {
    let replaced = PRESET_UNSAFE.replace_all(name, "_");
    let truncated: String = replaced.chars().take(MAX_PRESET_STEM_LEN).collect();
    let trimmed = truncated.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_PRESET_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the storage filename for a preset: `{prefix}{sanitized}.json`.
pub fn preset_filename(prefix: &str, name: &str) -> String {
    format!("{prefix}{}.json", safe_preset_stem(name))
}

/// Reduce a requested audio filename to its safe ASCII form.
///
/// Only ASCII alphanumerics, dots, hyphens, and underscores survive, and
/// leading/trailing dots and underscores are stripped so relative path
/// elements like `..` cannot be reconstructed. Returns `None` when nothing
/// usable remains.
pub fn audio_filename(raw: &str) -> Option<String> {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let trimmed = filtered.trim_matches(['.', '_']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolve a requested audio filename against the storage root.
///
/// The sanitized name must resolve to a direct child of `root`; anything
/// else returns `None`.
pub fn audio_path(root: &Path, raw: &str) -> Option<PathBuf> {
    let name = audio_filename(raw)?;
    let path = root.join(&name);
    if path.parent() == Some(root) {
        Some(path)
    } else {
        None
    }
}
