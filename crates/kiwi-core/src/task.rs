use std::sync::Arc;

use taskvisor::{BackoffPolicy, RestartPolicy, TaskError, TaskFn, TaskRef, TaskSpec};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{recorder::Recorder, supervisor::ReconnectSupervisor};

/// Wraps a supervisor into a one-shot taskvisor task.
///
/// The supervisor owns its retry loop, so the runtime must never restart it. When the runtime
/// cancels the task (OS shutdown), the worker's run signal is cleared and the supervisor is
/// allowed to wind down, closing its recorder, before the task reports cancellation.
pub fn worker_task<R>(supervisor: ReconnectSupervisor<R>) -> TaskSpec
where
    R: Recorder + 'static,
{
    let name = supervisor.name().to_string();
    let supervisor = Arc::new(Mutex::new(supervisor));

    let task: TaskRef = TaskFn::arc(name, move |ctx: CancellationToken| {
        run_worker(Arc::clone(&supervisor), ctx)
    });

    TaskSpec::new(task, RestartPolicy::Never, BackoffPolicy::default(), None)
}

async fn run_worker<R>(
    supervisor: Arc<Mutex<ReconnectSupervisor<R>>>,
    ctx: CancellationToken,
) -> Result<(), TaskError>
where
    R: Recorder + 'static,
{
    let mut sup = supervisor.lock().await;
    let signal = sup.signal().clone();

    let run = sup.run();
    tokio::pin!(run);
    let cancelled = tokio::select! {
        _ = &mut run => false,
        _ = ctx.cancelled() => true,
    };
    if !cancelled {
        return Ok(());
    }

    debug!("runtime cancelled worker; clearing run signal");
    signal.clear();
    run.await;
    Err(TaskError::Canceled)
}
