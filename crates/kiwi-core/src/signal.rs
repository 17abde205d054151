use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Process-wide "keep running" flag shared by every worker.
///
/// Clearing is one-way: once cleared the signal never becomes set again. Clones observe the
/// same state, so any worker may clear it to stop its siblings.
#[derive(Clone, Debug, Default)]
pub struct RunSignal {
    token: CancellationToken,
}

impl RunSignal {
    /// Creates a signal in the set state.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Clears the signal and wakes every pending [`RunSignal::interruptible_wait`].
    /// Clearing an already cleared signal is a no-op.
    #[inline]
    pub fn clear(&self) {
        self.token.cancel();
    }

    /// Sleeps for `timeout` unless the signal gets cleared first.
    ///
    /// Returns `true` when the wait was cut short. A signal that is already cleared returns
    /// immediately.
    pub async fn interruptible_wait(&self, timeout: Duration) -> bool {
        tokio::select! {
            _ = self.token.cancelled() => true,
            _ = tokio::time::sleep(timeout) => false,
        }
    }

    /// Resolves once the signal has been cleared.
    pub async fn cleared(&self) {
        self.token.cancelled().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn clear_is_one_way_and_shared() {
        let signal = RunSignal::new();
        let sibling = signal.clone();
        assert!(signal.is_set());

        sibling.clear();
        sibling.clear();
        assert!(!signal.is_set());
        assert!(!sibling.is_set());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_runs_to_timeout_when_untouched() {
        let signal = RunSignal::new();
        let start = Instant::now();

        let interrupted = signal.interruptible_wait(Duration::from_secs(15)).await;

        assert!(!interrupted);
        assert!(start.elapsed() >= Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_wakes_pending_wait() {
        let signal = RunSignal::new();
        let remote = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            remote.clear();
        });
        let start = Instant::now();

        let interrupted = signal.interruptible_wait(Duration::from_secs(15)).await;

        assert!(interrupted);
        assert!(start.elapsed() < Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn cleared_signal_does_not_wait() {
        let signal = RunSignal::new();
        signal.clear();
        let start = Instant::now();

        assert!(signal.interruptible_wait(Duration::from_secs(5)).await);
        assert_eq!(start.elapsed(), Duration::ZERO);
        signal.cleared().await;
    }
}
