// src/handler/backend.rs

//! Pluggable handler dispatch.
//!
//! The supervisor talks to a `HandlerBackend` instead of spawning handler
//! processes itself. Production uses [`ProcessBackend`]; tests can provide a
//! backend that records the payloads it was given.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::fanout::{DispatchSummary, run_handlers};

/// Trait abstracting how a report is delivered to a set of handlers.
///
/// The returned future must not borrow `self`: the noticer dispatch is moved
/// onto its own task and joined later.
pub trait HandlerBackend: Send + Sync {
    /// Deliver `payload` to every handler in `handlers` and wait for all of
    /// them.
    fn dispatch(
        &self,
        handlers: Vec<String>,
        payload: Arc<[u8]>,
    ) -> Pin<Box<dyn Future<Output = DispatchSummary> + Send + 'static>>;
}

/// Backend that runs each handler as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessBackend;

impl HandlerBackend for ProcessBackend {
    fn dispatch(
        &self,
        handlers: Vec<String>,
        payload: Arc<[u8]>,
    ) -> Pin<Box<dyn Future<Output = DispatchSummary> + Send + 'static>> {
        Box::pin(async move { run_handlers(&handlers, payload).await })
    }
}
