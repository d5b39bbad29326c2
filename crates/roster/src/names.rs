//! Class-label and file-name normalisation.

use std::sync::LazyLock;

use regex::Regex;

/// Longest file-name component we produce, in characters.
pub const MAX_FILE_NAME_CHARS: usize = 80;

static RE_RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Make a string usable as a single path component.
///
/// Reserved characters become `_`, whitespace runs collapse to one space,
/// the result is trimmed and cut to [`MAX_FILE_NAME_CHARS`].
pub fn safe_file_name(s: &str) -> String {
    let replaced = RE_RESERVED.replace_all(s, "_");
    let collapsed = RE_WHITESPACE.replace_all(&replaced, " ");
    collapsed
        .trim()
        .chars()
        .take(MAX_FILE_NAME_CHARS)
        .collect()
}

/// Folder key for a class label: `07/1` becomes `07-1`.
pub fn folder_key(class_label: &str) -> String {
    safe_file_name(&class_label.trim().replace('/', "-"))
}
