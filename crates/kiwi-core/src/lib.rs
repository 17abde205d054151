pub mod error;
pub use error::{FailureKind, RecorderError};
pub mod recorder;
pub use recorder::Recorder;
pub mod signal;
pub use signal::RunSignal;
pub mod policy;
pub use policy::{Action, ExitReason, FailurePolicy, ReconnectConfig};
pub mod status;
pub use status::RunStatusCell;
pub mod supervisor;
pub use supervisor::{ReconnectSupervisor, SupervisorState};
pub mod task;
pub use task::worker_task;

#[cfg(test)]
mod testing;
