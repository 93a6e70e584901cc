// src/output/mod.rs

//! Output capture for the supervised command.
//!
//! - [`tee`] wraps each child pipe in a reader that copies every chunk into
//!   a set of sinks before handing it to the drain loop.
//! - [`timestamp`] prefixes each line written through it with the capture
//!   time.
//! - [`logfile`] expands the log path pattern and appends to the file.
//!
//! Sinks are shared between the stdout and stderr drain threads, so they take
//! `&self` and serialize internally.
//!
//! The merged buffer receives chunks in the order the two drains happen to
//! read them. That is as close to the child's real interleaving as pipe
//! scheduling allows; it is not a strict ordering guarantee.
//!
//! Each buffer is decoded to text on its own. A multi-byte UTF-8 character
//! split across two reads, with the other stream's chunk landing between the
//! halves, becomes U+FFFD in the merged text while staying intact in its own
//! stream, so the merged length can then differ from the sum of the two.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

pub mod logfile;
pub mod tee;
pub mod timestamp;

pub use logfile::{LogFile, expand_log_path, validate_log_pattern};
pub use tee::{CapturedOutput, OutputCapture, TeeReader, drain};
pub use timestamp::{TimestampWriter, format_timestamp};

/// A destination for captured bytes that may be written from several threads.
pub trait Sink: Send + Sync {
    fn write_all(&self, buf: &[u8]) -> io::Result<()>;
}

/// Growable in-memory buffer.
#[derive(Debug, Default)]
pub struct SharedBuffer {
    inner: Mutex<Vec<u8>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for SharedBuffer {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(())
    }
}

/// Writes every chunk to each inner sink in order.
///
/// Chunks are applied one at a time so all inner sinks see the same order.
pub struct FanOut {
    sinks: Vec<Arc<dyn Sink>>,
    order: Mutex<()>,
}

impl FanOut {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            sinks,
            order: Mutex::new(()),
        }
    }
}

impl Sink for FanOut {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let _guard = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        for sink in &self.sinks {
            sink.write_all(buf)?;
        }
        Ok(())
    }
}
