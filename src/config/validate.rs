// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{HeraldError, Result};
use crate::output::validate_log_pattern;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - no handler entry is blank
/// - `log`, when set, is a strftime pattern chrono can expand
///
/// It does **not** check that handler programs exist; a missing handler is a
/// runtime warning, not a config error.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_handlers("reporter", &cfg.reporter)?;
    validate_handlers("noticer", &cfg.noticer)?;
    if let Some(pattern) = &cfg.log {
        validate_log_pattern(pattern)?;
    }
    Ok(())
}

fn validate_handlers(key: &str, handlers: &[String]) -> Result<()> {
    for (idx, handler) in handlers.iter().enumerate() {
        if handler.trim().is_empty() {
            return Err(HeraldError::ConfigError(format!(
                "`{key}` entry {idx} is empty"
            )));
        }
    }
    Ok(())
}
