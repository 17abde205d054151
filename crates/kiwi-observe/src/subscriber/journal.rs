use std::collections::HashMap;

use async_trait::async_trait;
use kiwi_core::RunSignal;
use taskvisor::{Event, EventKind, Subscribe};
use tracing::debug;

use crate::subscriber::view::log_event;

/// Logs taskvisor runtime events for recorder workers, tagged with each worker's endpoint.
///
/// With a run signal attached, a runtime shutdown request clears it right away, so workers
/// sitting in a backoff wind down before the runtime starts cancelling tasks.
#[derive(Debug, Default)]
pub struct Journal {
    endpoints: HashMap<String, String>,
    signal: Option<RunSignal>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a worker so its events carry `endpoint`.
    pub fn with_worker(mut self, label: impl Into<String>, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(label.into(), endpoint.into());
        self
    }

    pub fn with_signal(mut self, signal: RunSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn endpoint(&self, worker: &str) -> Option<&str> {
        self.endpoints.get(worker).map(String::as_str)
    }

    fn shutdown_requested(&self) {
        if let Some(signal) = &self.signal
            && signal.is_set()
        {
            debug!("shutdown requested, clearing run signal");
            signal.clear();
        }
    }
}

#[async_trait]
impl Subscribe for Journal {
    async fn on_event(&self, event: &Event) {
        if matches!(event.kind, EventKind::ShutdownRequested) {
            self.shutdown_requested();
        }
        let endpoint = event.task.as_deref().and_then(|t| self.endpoint(t));
        log_event(event, endpoint);
    }

    fn name(&self) -> &'static str {
        "kiwi-journal"
    }

    fn queue_capacity(&self) -> usize {
        // a handful of events per worker lifetime
        256
    }
}
