// src/handler/split.rs

use super::HandlerError;

/// Split a handler command string into program + arguments.
///
/// Uses POSIX shell word splitting, so `"ruby '/path/with space/n.rb'"`
/// yields two words. Windows has no shell quoting to imitate and falls back
/// to whitespace splitting.
pub fn split_command(handler: &str) -> Result<Vec<String>, HandlerError> {
    let words = split_words(handler).ok_or_else(|| HandlerError::Invalid {
        handler: handler.to_string(),
    })?;

    if words.is_empty() {
        return Err(HandlerError::Invalid {
            handler: handler.to_string(),
        });
    }
    Ok(words)
}

#[cfg(not(windows))]
fn split_words(handler: &str) -> Option<Vec<String>> {
    shell_words::split(handler).ok()
}

#[cfg(windows)]
fn split_words(handler: &str) -> Option<Vec<String>> {
    Some(handler.split_whitespace().map(str::to_string).collect())
}
