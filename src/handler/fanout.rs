// src/handler/fanout.rs

//! Concurrent dispatch to a set of handlers.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use super::{HandlerError, run_handler};

/// Result of one handler in a dispatch.
#[derive(Debug)]
pub struct HandlerOutcome {
    pub handler: String,
    pub result: Result<(), HandlerError>,
}

/// Per-handler results of a dispatch, in the order the handlers were given.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    pub outcomes: Vec<HandlerOutcome>,
}

impl DispatchSummary {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Launch every handler at once and wait for all of them.
///
/// Each handler gets its own task and result slot. A failing handler never
/// cancels its siblings; the call returns after the last one finishes.
pub async fn run_handlers(handlers: &[String], payload: Arc<[u8]>) -> DispatchSummary {
    let tasks: Vec<(String, JoinHandle<Result<(), HandlerError>>)> = handlers
        .iter()
        .map(|handler| {
            let cmd = handler.clone();
            let payload = Arc::clone(&payload);
            let task = tokio::spawn(async move { run_handler(&cmd, &payload).await });
            (handler.clone(), task)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for (handler, task) in tasks {
        let result = match task.await {
            Ok(result) => result,
            Err(e) => Err(HandlerError::Aborted {
                handler: handler.clone(),
                reason: e.to_string(),
            }),
        };
        outcomes.push(HandlerOutcome { handler, result });
    }

    let summary = DispatchSummary { outcomes };
    debug!(
        total = summary.len(),
        failed = summary.failed(),
        "handler dispatch joined"
    );
    summary
}
