// src/handler/invoke.rs

//! Running a single handler process.

use std::process::Stdio;
use std::sync::{Mutex, PoisonError};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{HandlerError, split_command};

/// Spawn `handler`, write `payload` to its stdin, close stdin, and wait.
///
/// The handler's stdout and stderr are captured together for the log. A
/// handler that exits before reading its input is fine: the write error is
/// ignored.
pub async fn run_handler(handler: &str, payload: &[u8]) -> Result<(), HandlerError> {
    info!(handler = %handler, "starting to run the handler");

    let args = split_command(handler).inspect_err(|_| {
        warn!(handler = %handler, "failed to run the handler: invalid handler arguments");
    })?;

    let mut child = Command::new(&args[0])
        .args(&args[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| {
            warn!(handler = %handler, error = %source, "failed to run the handler");
            HandlerError::Spawn {
                handler: handler.to_string(),
                source,
            }
        })?;

    let stdin = child.stdin.take();
    let feed = async move {
        let Some(mut stdin) = stdin else { return };
        if let Err(e) = stdin.write_all(payload).await {
            debug!(handler = %handler, error = %e, "handler did not take the whole report");
        }
        // Dropping stdin closes it so the handler sees EOF.
    };
    let capture = capture_combined(child.stdout.take(), child.stderr.take());
    let ((), output) = tokio::join!(feed, capture);

    let status = child.wait().await.map_err(|source| {
        warn!(handler = %handler, error = %source, "failed to run the handler");
        HandlerError::Wait {
            handler: handler.to_string(),
            source,
        }
    })?;

    if !status.success() {
        let message = format!("failed to run the handler {handler:?}: {status}");
        warn!("{}", append_output(&message, &output));
        return Err(HandlerError::Failed {
            handler: handler.to_string(),
            status,
            output,
        });
    }

    let message = format!("finished to run the handler {handler:?}");
    info!("{}", append_output(&message, &output));
    Ok(())
}

/// Append captured handler output to a log message as an indented block.
///
/// ```
/// use herald::handler::append_output;
///
/// assert_eq!(append_output("done", ""), "done");
/// assert_eq!(append_output("done", "a\nb\n"), "done\n  Output:\n  a\n  b");
/// ```
pub fn append_output(base: &str, output: &str) -> String {
    let output = output.trim();
    if output.is_empty() {
        return base.to_string();
    }

    let mut message = base.to_string();
    if !message.ends_with('\n') {
        message.push('\n');
    }
    const INDENT: &str = "  ";
    message.push_str(INDENT);
    message.push_str(&format!("Output:\n{output}").replace('\n', &format!("\n{INDENT}")));
    message
}

/// Read stdout and stderr concurrently into one buffer, chunk by chunk.
async fn capture_combined<O, E>(stdout: Option<O>, stderr: Option<E>) -> String
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let combined = Mutex::new(Vec::new());
    tokio::join!(pump(stdout, &combined), pump(stderr, &combined));
    let bytes = combined.into_inner().unwrap_or_else(PoisonError::into_inner);
    String::from_utf8_lossy(&bytes).into_owned()
}

async fn pump<R: AsyncRead + Unpin>(reader: Option<R>, sink: &Mutex<Vec<u8>>) {
    let Some(mut reader) = reader else { return };
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => sink
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(&buf[..n]),
        }
    }
}
