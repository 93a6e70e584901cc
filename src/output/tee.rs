// src/output/tee.rs

//! Duplicating readers over the child's output pipes.

use std::io::{self, Read, Write};
use std::sync::Arc;

use super::{FanOut, SharedBuffer, Sink, TimestampWriter};

/// Reader that copies every chunk it yields into each sink first.
pub struct TeeReader<R> {
    inner: R,
    sinks: Vec<Arc<dyn Sink>>,
}

impl<R: Read> TeeReader<R> {
    pub fn new(inner: R, sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { inner, sinks }
    }
}

impl<R: Read> Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            for sink in &self.sinks {
                sink.write_all(&buf[..n])?;
            }
        }
        Ok(n)
    }
}

/// Buffers collected for one run: one per stream plus the merged view.
pub struct OutputCapture {
    stdout: Arc<SharedBuffer>,
    stderr: Arc<SharedBuffer>,
    merged: Arc<SharedBuffer>,
    merged_sink: Arc<dyn Sink>,
}

/// Final text of the three buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    pub output: String,
}

impl OutputCapture {
    /// Build the sink graph.
    ///
    /// The merged buffer and the optional log file sit behind one chain; with
    /// `timestamp` the whole chain is decorated, the per-stream buffers never
    /// are.
    pub fn new(timestamp: bool, log: Option<Arc<dyn Sink>>) -> Self {
        let merged = Arc::new(SharedBuffer::new());

        let mut merged_sink: Arc<dyn Sink> = match log {
            Some(log) => {
                let merged_dyn: Arc<dyn Sink> = merged.clone();
                Arc::new(FanOut::new(vec![merged_dyn, log]))
            }
            None => merged.clone(),
        };
        if timestamp {
            merged_sink = Arc::new(TimestampWriter::new(merged_sink));
        }

        Self {
            stdout: Arc::new(SharedBuffer::new()),
            stderr: Arc::new(SharedBuffer::new()),
            merged,
            merged_sink,
        }
    }

    pub fn stdout_reader<R: Read>(&self, source: R) -> TeeReader<R> {
        TeeReader::new(source, vec![self.stdout.clone(), self.merged_sink.clone()])
    }

    pub fn stderr_reader<R: Read>(&self, source: R) -> TeeReader<R> {
        TeeReader::new(source, vec![self.stderr.clone(), self.merged_sink.clone()])
    }

    pub fn finish(&self) -> CapturedOutput {
        CapturedOutput {
            stdout: self.stdout.to_string_lossy(),
            stderr: self.stderr.to_string_lossy(),
            output: self.merged.to_string_lossy(),
        }
    }
}

/// Copy `reader` into `writer` until EOF.
///
/// If `writer` fails, reading continues so the child never blocks on a full
/// pipe; the first write error is returned once the source is exhausted.
pub fn drain<R: Read, W: Write>(mut reader: R, mut writer: W) -> io::Result<u64> {
    let mut buf = vec![0u8; 32 * 1024];
    let mut total = 0u64;
    let mut forward_error = None;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        total += n as u64;

        if forward_error.is_none() {
            if let Err(e) = writer.write_all(&buf[..n]).and_then(|()| writer.flush()) {
                forward_error = Some(e);
            }
        }
    }

    match forward_error {
        Some(e) => Err(e),
        None => Ok(total),
    }
}
