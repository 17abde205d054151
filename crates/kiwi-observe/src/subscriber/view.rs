use taskvisor::{Event, EventKind};
use tracing::{debug, error, info, trace, warn};

/// Short description of a runtime event, worded for the recorder workers it hosts.
pub fn message_for(kind: EventKind) -> &'static str {
    match kind {
        EventKind::TaskStarting => "worker starting",
        EventKind::TaskStopped => "worker finished",
        EventKind::TaskFailed => "worker reported failure",
        EventKind::ActorDead => "worker terminated permanently",
        EventKind::ShutdownRequested => "shutdown requested",
        EventKind::GraceExceeded => "workers did not stop within the grace period",
        _ => "runtime event",
    }
}

/// Logs `e` at a level matching its severity; `endpoint` is the worker's receiver, when known.
pub fn log_event(e: &Event, endpoint: Option<&str>) {
    let worker = e.task.as_deref().unwrap_or("-");
    let endpoint = endpoint.unwrap_or("-");
    let reason = e.reason.as_deref().unwrap_or("-");
    let msg = message_for(e.kind);

    match e.kind {
        EventKind::TaskStarting => info!(worker, endpoint, "{msg}"),
        EventKind::TaskStopped => debug!(worker, endpoint, "{msg}"),
        EventKind::TaskFailed => warn!(worker, endpoint, reason, "{msg}"),
        EventKind::ActorDead => error!(worker, endpoint, reason, "{msg}"),
        EventKind::ShutdownRequested => info!("{msg}"),
        EventKind::GraceExceeded => warn!("{msg}"),
        kind => trace!(worker, ?kind, "{msg}"),
    }
}
