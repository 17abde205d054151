use std::time::Duration;

use kiwi_model::{ConnectionTarget, RunStatus};

use crate::error::{FailureKind, RecorderError};

/// Delays applied between reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Wait after a failed `connect`.
    pub connect_backoff: Duration,
    /// Wait after the server reported it is too busy.
    pub busy_backoff: Duration,
    /// Wait after the server terminated an open session.
    pub terminated_backoff: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            connect_backoff: Duration::from_secs(15),
            busy_backoff: Duration::from_secs(15),
            terminated_backoff: Duration::from_secs(5),
        }
    }
}

/// Why a supervisor stopped for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `connect` failed in coordinated mode.
    ConnectFailed,
    /// The recorder used up its session quota.
    TimeLimit,
    /// The server was busy in coordinated mode.
    TooBusy,
    /// A failure outside the known taxonomy.
    Unclassified,
    /// The shared run signal was observed cleared.
    Signalled,
}

/// What the supervisor does after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Wait, then reconnect.
    Retry { after: Duration },
    /// Close the recorder, start a fresh segment, wait, then reconnect.
    Restart { after: Duration },
    /// Terminate the worker, writing `status` when present.
    Stop {
        reason: ExitReason,
        status: Option<RunStatus>,
        diagnose: bool,
    },
}

/// Failure handling strategy.
///
/// `Standalone` absorbs transient failures and keeps retrying. `Coordinated` escalates connect
/// failures and busy servers to a [`RunStatus`] and stops, so an external coordinator learns
/// the outcome of every receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Standalone,
    Coordinated,
}

impl FailurePolicy {
    pub fn for_target(target: &ConnectionTarget) -> Self {
        if target.coordinated {
            FailurePolicy::Coordinated
        } else {
            FailurePolicy::Standalone
        }
    }

    #[inline]
    pub fn is_coordinated(self) -> bool {
        matches!(self, FailurePolicy::Coordinated)
    }

    /// Decision for an error raised by `connect`. Every error counts, whatever its variant.
    pub fn on_connect_error(self, cfg: &ReconnectConfig, _err: &RecorderError) -> Action {
        match self {
            FailurePolicy::Standalone => Action::Retry {
                after: cfg.connect_backoff,
            },
            FailurePolicy::Coordinated => Action::Stop {
                reason: ExitReason::ConnectFailed,
                status: Some(RunStatus::Failure),
                diagnose: false,
            },
        }
    }

    /// Decision for an error raised by `open` or `run`.
    pub fn on_session_error(self, cfg: &ReconnectConfig, err: &RecorderError) -> Action {
        match (err.kind(), self) {
            (FailureKind::Terminated, _) => Action::Restart {
                after: cfg.terminated_backoff,
            },
            (FailureKind::Busy, FailurePolicy::Standalone) => Action::Retry {
                after: cfg.busy_backoff,
            },
            (FailureKind::Busy, FailurePolicy::Coordinated) => Action::Stop {
                reason: ExitReason::TooBusy,
                status: Some(RunStatus::Busy),
                diagnose: false,
            },
            (FailureKind::TimeLimit, _) => Action::Stop {
                reason: ExitReason::TimeLimit,
                status: None,
                diagnose: false,
            },
            (FailureKind::Unclassified, policy) => Action::Stop {
                reason: ExitReason::Unclassified,
                status: policy.is_coordinated().then_some(RunStatus::Failure),
                diagnose: true,
            },
        }
    }
}
