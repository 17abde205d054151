use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{error::RecorderError, recorder::Recorder, signal::RunSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Connect,
    Open,
    Run,
    Close,
    Reset,
}

pub(crate) type Journal = Arc<Mutex<Vec<(Call, Instant)>>>;

/// Recorder that replays scripted results and journals every call.
///
/// Exhausted scripts succeed for `connect`/`open`; an exhausted `run` script reports the
/// time limit so every scenario ends.
#[derive(Default)]
pub(crate) struct ScriptedRecorder {
    connects: VecDeque<Result<(), RecorderError>>,
    opens: VecDeque<Result<(), RecorderError>>,
    runs: VecDeque<Result<(), RecorderError>>,
    clear_on_connect: Option<RunSignal>,
    clear_on_run: Option<(usize, RunSignal)>,
    run_calls: usize,
    journal: Journal,
}

impl ScriptedRecorder {
    pub(crate) fn connects(
        mut self,
        script: impl IntoIterator<Item = Result<(), RecorderError>>,
    ) -> Self {
        self.connects = script.into_iter().collect();
        self
    }

    pub(crate) fn opens(
        mut self,
        script: impl IntoIterator<Item = Result<(), RecorderError>>,
    ) -> Self {
        self.opens = script.into_iter().collect();
        self
    }

    pub(crate) fn runs(
        mut self,
        script: impl IntoIterator<Item = Result<(), RecorderError>>,
    ) -> Self {
        self.runs = script.into_iter().collect();
        self
    }

    /// Clears `signal` from inside every successful `connect`.
    pub(crate) fn clear_on_connect(mut self, signal: RunSignal) -> Self {
        self.clear_on_connect = Some(signal);
        self
    }

    pub(crate) fn clear_on_run(mut self, nth: usize, signal: RunSignal) -> Self {
        self.clear_on_run = Some((nth, signal));
        self
    }

    pub(crate) fn journal(&self) -> Journal {
        Arc::clone(&self.journal)
    }

    fn log(&self, call: Call) {
        self.journal.lock().unwrap().push((call, Instant::now()));
    }
}

#[async_trait]
impl Recorder for ScriptedRecorder {
    async fn connect(&mut self, _host: &str, _port: u16) -> Result<(), RecorderError> {
        self.log(Call::Connect);
        let result = self.connects.pop_front().unwrap_or(Ok(()));
        if result.is_ok()
            && let Some(signal) = &self.clear_on_connect
        {
            signal.clear();
        }
        result
    }

    async fn open(&mut self) -> Result<(), RecorderError> {
        self.log(Call::Open);
        self.opens.pop_front().unwrap_or(Ok(()))
    }

    async fn run(&mut self) -> Result<(), RecorderError> {
        self.log(Call::Run);
        self.run_calls += 1;
        if let Some((nth, signal)) = &self.clear_on_run
            && *nth == self.run_calls
        {
            signal.clear();
            return Ok(());
        }
        self.runs.pop_front().unwrap_or(Err(RecorderError::TimeLimit))
    }

    async fn close(&mut self) {
        self.log(Call::Close);
    }

    fn reset_segment(&mut self) {
        self.log(Call::Reset);
    }
}

pub(crate) fn calls(journal: &Journal) -> Vec<Call> {
    journal.lock().unwrap().iter().map(|(c, _)| *c).collect()
}

pub(crate) fn times_of(journal: &Journal, call: Call) -> Vec<Instant> {
    journal
        .lock()
        .unwrap()
        .iter()
        .filter(|(c, _)| *c == call)
        .map(|(_, t)| *t)
        .collect()
}

