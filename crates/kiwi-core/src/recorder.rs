use async_trait::async_trait;

use crate::error::RecorderError;

/// One logical connection plus the data pump behind it.
///
/// A recorder is driven by exactly one [`ReconnectSupervisor`](crate::ReconnectSupervisor)
/// through repeated `connect → open → run…` cycles. Every method may block for as long as
/// the underlying I/O needs; the supervisor adds no pacing of its own.
#[async_trait]
pub trait Recorder: Send {
    /// Establish the network connection.
    async fn connect(&mut self, host: &str, port: u16) -> Result<(), RecorderError>;

    /// Start the session on an established connection.
    async fn open(&mut self) -> Result<(), RecorderError>;

    /// Pump one bounded unit of data.
    async fn run(&mut self) -> Result<(), RecorderError>;

    /// Release every resource. Must be safe to call repeatedly and on a recorder that was
    /// never opened.
    async fn close(&mut self);

    /// Forget the current output segment so the next successful session starts a new one.
    fn reset_segment(&mut self);
}
