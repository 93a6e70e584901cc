//! Shared helpers for herald's integration tests.

pub mod backend;
pub mod builders;

use std::future::Future;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a test-friendly subscriber once per test binary.
///
/// Output goes through the harness capture, so it only shows for failing
/// tests. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Fail the test if `fut` has not finished within ten seconds.
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(Duration::from_secs(10), fut).await {
        Ok(out) => out,
        Err(_) => panic!("test did not finish within 10 seconds"),
    }
}

/// Handler command that writes whatever it reads on stdin to `path`.
pub fn capture_handler(path: &Path) -> String {
    format!(
        "sh -c 'cat > \"$1\"' capture {}",
        shell_words::quote(&path.to_string_lossy())
    )
}

/// Handler command that reads its input and then exits with `code`.
pub fn failing_handler(code: i32) -> String {
    format!("sh -c 'cat > /dev/null; echo handler broke >&2; exit {code}'")
}

/// Argument vector running `script` under `sh -c`.
pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}
