use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use herald::handler::{DispatchSummary, HandlerBackend, HandlerError, HandlerOutcome};
use herald::report::Report;

/// One call into the backend: which handlers, and the report they got.
#[derive(Debug, Clone)]
pub struct RecordedDispatch {
    pub handlers: Vec<String>,
    pub report: Report,
}

/// A fake handler backend that:
/// - decodes and records every payload it is handed
/// - reports success for each handler, except the ones marked as failing.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<RecordedDispatch>>>,
    failing: Arc<Vec<String>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose dispatch reports `handlers` as failed.
    pub fn failing(handlers: &[&str]) -> Self {
        Self {
            calls: Arc::default(),
            failing: Arc::new(handlers.iter().map(|h| h.to_string()).collect()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedDispatch> {
        self.calls.lock().unwrap().clone()
    }

    /// Reports delivered to `handler`, in dispatch order.
    pub fn reports_for(&self, handler: &str) -> Vec<Report> {
        self.calls()
            .into_iter()
            .filter(|call| call.handlers.iter().any(|h| h == handler))
            .map(|call| call.report)
            .collect()
    }
}

impl HandlerBackend for RecordingBackend {
    fn dispatch(
        &self,
        handlers: Vec<String>,
        payload: Arc<[u8]>,
    ) -> Pin<Box<dyn Future<Output = DispatchSummary> + Send + 'static>> {
        let calls = Arc::clone(&self.calls);
        let failing = Arc::clone(&self.failing);

        Box::pin(async move {
            let report = Report::from_json(&payload).expect("payload is a JSON report");
            calls.lock().unwrap().push(RecordedDispatch {
                handlers: handlers.clone(),
                report,
            });

            let outcomes = handlers
                .into_iter()
                .map(|handler| {
                    let result = if failing.contains(&handler) {
                        Err(HandlerError::Invalid {
                            handler: handler.clone(),
                        })
                    } else {
                        Ok(())
                    };
                    HandlerOutcome { handler, result }
                })
                .collect();
            DispatchSummary { outcomes }
        })
    }
}
