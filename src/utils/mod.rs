//! Common utilities and helpers

pub mod logging;
pub mod path;
pub mod time;

/// Last `max_chars` characters of an external tool's stderr
pub fn stderr_tail(stderr: &str, max_chars: usize) -> String {
    let trimmed = stderr.trim();
    let count = trimmed.chars().count();
    if count <= max_chars {
        trimmed.to_string()
    } else {
        trimmed.chars().skip(count - max_chars).collect()
    }
}
