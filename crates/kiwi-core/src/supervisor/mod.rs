use kiwi_model::ConnectionTarget;
use tracing::{debug, error, info, instrument, trace};

use crate::{
    error::{FailureKind, RecorderError},
    policy::{Action, ExitReason, FailurePolicy, ReconnectConfig},
    recorder::Recorder,
    signal::RunSignal,
    status::RunStatusCell,
};

/// Where a supervisor is in its connect/pump cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Disconnected,
    Connecting,
    Connected,
    Pumping,
    Terminating,
    Terminated,
}

/// Drives one [`Recorder`] through `connect → open → run…` cycles until it either stops for
/// good or the shared [`RunSignal`] is cleared.
///
/// Whatever the exit path, [`ReconnectSupervisor::run`] clears the signal (stopping sibling
/// workers) and closes the recorder before returning. Failures never escape `run`; in
/// coordinated mode the outcome is published through the [`RunStatusCell`].
pub struct ReconnectSupervisor<R> {
    name: String,
    recorder: R,
    target: ConnectionTarget,
    signal: RunSignal,
    status: RunStatusCell,
    policy: FailurePolicy,
    cfg: ReconnectConfig,
    state: SupervisorState,
    exit: Option<ExitReason>,
}

impl<R: Recorder> ReconnectSupervisor<R> {
    pub fn new(recorder: R, target: ConnectionTarget, signal: RunSignal) -> Self {
        Self {
            name: target.endpoint(),
            policy: FailurePolicy::for_target(&target),
            status: RunStatusCell::new(),
            cfg: ReconnectConfig::default(),
            state: SupervisorState::Disconnected,
            exit: None,
            recorder,
            target,
            signal,
        }
    }

    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn with_config(mut self, cfg: ReconnectConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Publishes the coordinated-mode outcome into `status` instead of a private cell.
    #[inline]
    pub fn with_status(mut self, status: RunStatusCell) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signal(&self) -> &RunSignal {
        &self.signal
    }

    pub fn status(&self) -> RunStatusCell {
        self.status.clone()
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Set once `run` has returned.
    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    #[instrument(level = "info", skip(self), fields(worker = %self.name, host = %self.target.host, port = self.target.port))]
    pub async fn run(&mut self) {
        let reason = self.drive().await;
        self.exit = Some(reason);

        self.enter(SupervisorState::Terminating);
        self.signal.clear();
        self.recorder.close().await;
        self.enter(SupervisorState::Terminated);

        info!(?reason, status = ?self.status.get(), "worker stopped");
    }

    async fn drive(&mut self) -> ExitReason {
        while self.signal.is_set() {
            self.enter(SupervisorState::Connecting);
            if let Err(err) = self
                .recorder
                .connect(&self.target.host, self.target.port)
                .await
            {
                self.enter(SupervisorState::Disconnected);
                info!(error = %err, "failed to connect, sleeping and reconnecting");

                let action = self.policy.on_connect_error(&self.cfg, &err);
                if let Some(reason) = self.apply(action, &err).await {
                    return reason;
                }
                continue;
            }

            self.enter(SupervisorState::Connected);
            if !self.signal.is_set() {
                break;
            }

            let err = match self.session().await {
                Ok(()) => continue,
                Err(err) => err,
            };
            self.report(&err);

            let action = self.policy.on_session_error(&self.cfg, &err);
            if let Some(reason) = self.apply(action, &err).await {
                return reason;
            }
        }
        debug!("run signal cleared");
        ExitReason::Signalled
    }

    /// Opens the session and pumps until an error surfaces or the signal is cleared.
    async fn session(&mut self) -> Result<(), RecorderError> {
        self.recorder.open().await?;
        self.enter(SupervisorState::Pumping);
        while self.signal.is_set() {
            self.recorder.run().await?;
        }
        Ok(())
    }

    fn report(&self, err: &RecorderError) {
        match err.kind() {
            FailureKind::Terminated => info!(
                error = %err,
                after_secs = self.cfg.terminated_backoff.as_secs(),
                "server terminated the session, reconnecting",
            ),
            FailureKind::Busy => info!(
                after_secs = self.cfg.busy_backoff.as_secs(),
                "server too busy now, reconnecting",
            ),
            FailureKind::TimeLimit => debug!("time limit reached"),
            FailureKind::Unclassified => {}
        }
    }

    /// Carries out `action`; returns the exit reason when the worker must stop.
    async fn apply(&mut self, action: Action, err: &RecorderError) -> Option<ExitReason> {
        match action {
            Action::Retry { after } => {
                self.enter(SupervisorState::Disconnected);
                self.signal.interruptible_wait(after).await;
                None
            }
            Action::Restart { after } => {
                self.recorder.close().await;
                self.recorder.reset_segment();
                self.enter(SupervisorState::Disconnected);
                self.signal.interruptible_wait(after).await;
                None
            }
            Action::Stop {
                reason,
                status,
                diagnose,
            } => {
                if let Some(status) = status {
                    self.status.set(status);
                }
                if diagnose {
                    error!(error = ?err, "unrecoverable recorder failure: {err}");
                }
                Some(reason)
            }
        }
    }

    fn enter(&mut self, next: SupervisorState) {
        if self.state != next {
            trace!(from = ?self.state, to = ?next, "state transition");
            self.state = next;
        }
    }
}
