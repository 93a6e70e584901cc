// src/output/timestamp.rs

//! Line timestamp decoration.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDateTime};

use super::Sink;

/// Source of the time printed in front of each line.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Fixed-width prefix, e.g. `[2019-11-04 11:12:13.123456] `.
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format("[%Y-%m-%d %H:%M:%S%.6f] ").to_string()
}

/// Prefixes every line passing through it with the time its first byte was
/// written.
///
/// A line that arrives over several writes gets a single prefix. The
/// mid-line flag and the write to the inner sink happen under one lock, so
/// concurrent writers never split a prefix from its bytes.
pub struct TimestampWriter {
    inner: Arc<dyn Sink>,
    mid_line: Mutex<bool>,
    clock: Clock,
}

impl TimestampWriter {
    pub fn new(inner: Arc<dyn Sink>) -> Self {
        Self::with_clock(inner, local_now)
    }

    pub fn with_clock(inner: Arc<dyn Sink>, clock: Clock) -> Self {
        Self {
            inner,
            mid_line: Mutex::new(false),
            clock,
        }
    }
}

impl Sink for TimestampWriter {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut mid_line = self.mid_line.lock().unwrap_or_else(PoisonError::into_inner);

        let mut decorated = Vec::with_capacity(buf.len() + 32);
        for &byte in buf {
            if !*mid_line {
                decorated.extend_from_slice(format_timestamp(&(self.clock)()).as_bytes());
                *mid_line = true;
            }
            decorated.push(byte);
            if byte == b'\n' {
                *mid_line = false;
            }
        }

        self.inner.write_all(&decorated)
    }
}
