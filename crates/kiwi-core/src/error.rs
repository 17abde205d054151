use thiserror::Error;

/// Everything a [`Recorder`](crate::Recorder) can fail with.
///
/// The set is closed on purpose: the supervisor matches on it to pick a recovery action,
/// so a new way of failing means a new variant and a new row in the policy table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("server terminated connection: {0}")]
    ServerTerminated(String),
    #[error("server too busy")]
    TooBusy,
    #[error("time limit reached")]
    TimeLimit,
    #[error("io error: {0}")]
    Io(String),
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for RecorderError {
    fn from(e: std::io::Error) -> Self {
        RecorderError::Io(e.to_string())
    }
}

/// How a failure raised while a session is open is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote end closed the session; reconnect into a fresh segment.
    Terminated,
    /// The remote end refused admission.
    Busy,
    /// The session quota is used up; a normal stop.
    TimeLimit,
    /// Anything else; fatal for the worker.
    Unclassified,
}

impl RecorderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RecorderError::ServerTerminated(_) => FailureKind::Terminated,
            RecorderError::TooBusy => FailureKind::Busy,
            RecorderError::TimeLimit => FailureKind::TimeLimit,
            RecorderError::Connect(_) | RecorderError::Io(_) | RecorderError::Other(_) => {
                FailureKind::Unclassified
            }
        }
    }
}
