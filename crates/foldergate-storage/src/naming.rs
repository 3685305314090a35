//! Validation and sanitization of filesystem item names.

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;

/// Characters that are not allowed in filesystem item names, in addition
/// to control characters.
pub const INVALID_NAME_CHARS: &str = r#"<>:"/\|?*"#;

/// Returns whether a character is forbidden in filesystem item names.
pub fn is_invalid_name_char(c: char) -> bool {
    c.is_control() || INVALID_NAME_CHARS.contains(c)
}

/// Collect the distinct forbidden characters present in a name.
pub fn invalid_chars(name: &str) -> Vec<char> {
    let mut found = Vec::new();
    for c in name.chars() {
        if is_invalid_name_char(c) && !found.contains(&c) {
            found.push(c);
        }
    }
    found
}

/// Validate a filesystem item name, listing the offending characters.
pub fn validate_name(name: &str) -> AppResult<()> {
    let invalid = invalid_chars(name);
    if invalid.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = invalid.iter().map(|c| c.escape_default().to_string()).collect();
    Err(AppError::validation(format!(
        "The name '{name}' contains invalid characters: {}. \
         The following characters are not allowed: {INVALID_NAME_CHARS} and control characters",
        listed.join(", ")
    )))
}

/// Sanitize a filesystem item name by replacing forbidden characters with
/// the given replacement (which may be empty to simply remove them).
/// Surrounding whitespace is trimmed before and after replacement.
pub fn sanitize_name(name: &str, replace: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if is_invalid_name_char(c) {
            sanitized.push_str(replace);
        } else {
            sanitized.push(c);
        }
    }
    sanitized.trim().to_string()
}

/// Validate that a replacement character is itself allowed in names.
pub fn validate_replace_char(replace: &str) -> AppResult<()> {
    if replace.chars().any(is_invalid_name_char) {
        return Err(AppError::validation(format!(
            "The replacement character cannot be one of: {INVALID_NAME_CHARS}"
        )));
    }
    Ok(())
}
