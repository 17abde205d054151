use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Terminal outcome reported by a worker running in coordinated mode.
///
/// The numeric codes are stable: the agent uses them as its process exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    /// Nothing was reported; the worker finished normally or has not finished yet.
    #[default]
    Unset,
    /// Connect failure or an unclassified session error.
    Failure,
    /// The server refused the session because it was too busy.
    Busy,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Unset => 0,
            RunStatus::Failure => 1,
            RunStatus::Busy => 2,
        }
    }

    /// Returns `true` for every status other than [`RunStatus::Unset`].
    pub fn is_failure(self) -> bool {
        !matches!(self, RunStatus::Unset)
    }
}

impl TryFrom<u8> for RunStatus {
    type Error = ModelError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RunStatus::Unset),
            1 => Ok(RunStatus::Failure),
            2 => Ok(RunStatus::Busy),
            other => Err(ModelError::UnknownStatus(other)),
        }
    }
}
