use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use kiwi_model::RunStatus;

/// Shared slot holding the outcome of one coordinated worker.
///
/// The supervisor writes it; whoever owns the target reads it once the worker has stopped.
#[derive(Clone, Debug, Default)]
pub struct RunStatusCell {
    inner: Arc<AtomicU8>,
}

impl RunStatusCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, status: RunStatus) {
        self.inner.store(status.code(), Ordering::Release);
    }

    pub fn get(&self) -> RunStatus {
        // Only codes produced by `set` are ever stored.
        RunStatus::try_from(self.inner.load(Ordering::Acquire)).unwrap_or(RunStatus::Failure)
    }
}
