// src/output/logfile.rs

//! Persistent, append-only log of the merged output.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::Sink;
use crate::errors::{HeraldError, Result};

/// Check that `pattern` only uses strftime directives chrono understands.
pub fn validate_log_pattern(pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(HeraldError::LogPattern {
            pattern: pattern.to_string(),
            reason: "unsupported strftime directive".to_string(),
        });
    }
    Ok(())
}

/// Expand a strftime pattern such as `/var/log/job-%Y%m%d.log`.
pub fn expand_log_path(pattern: &str, now: &DateTime<Local>) -> Result<PathBuf> {
    validate_log_pattern(pattern)?;
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    Ok(PathBuf::from(now.format_with_items(items.iter()).to_string()))
}

/// Log file sink.
///
/// Appending is best-effort: the first write error is logged and the sink
/// goes quiet, so a full disk never stalls the drains.
pub struct LogFile {
    path: PathBuf,
    file: Mutex<File>,
    broken: AtomicBool,
}

impl LogFile {
    /// Expand `pattern` against the current local time and open the result.
    pub fn open_pattern(pattern: &str) -> Result<Self> {
        let path = expand_log_path(pattern, &Local::now())?;
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let file = options.open(path).map_err(|e| {
            HeraldError::IoError(io::Error::new(
                e.kind(),
                format!("failed to open log file {:?}: {e}", path),
            ))
        })?;
        debug!(path = ?path, "opened log file");

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            broken: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for LogFile {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        if self.broken.load(Ordering::Relaxed) {
            return Ok(());
        }
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = file.write_all(buf) {
            warn!(path = ?self.path, error = %e, "writing to log file failed; disabling it");
            self.broken.store(true, Ordering::Relaxed);
        }
        Ok(())
    }
}
