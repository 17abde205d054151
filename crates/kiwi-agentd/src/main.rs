use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use tracing::{info, warn};

use kiwi_core::{ReconnectSupervisor, RunSignal, RunStatusCell, worker_task};
use kiwi_model::{RunStatus, parse_targets};
use kiwi_observe::Journal;
use kiwi_stream::{StreamConfig, TcpRecorder};
use taskvisor::{Subscribe, Supervisor, SupervisorConfig};

mod cli;
use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 1) Logger
    cli.logger().install()?;

    // 2) Targets
    let targets = parse_targets(&cli.targets)?;
    if targets.is_empty() {
        bail!("no targets given");
    }

    // 3) One supervisor per target, all sharing a single run signal
    let signal = RunSignal::new();
    let reconnect = cli.reconnect();
    let mut specs = Vec::with_capacity(targets.len());
    let mut statuses = Vec::with_capacity(targets.len());
    let mut journal = Journal::new().with_signal(signal.clone());

    for spec in targets {
        let stream = StreamConfig::new(spec.label.clone(), cli.spool.clone())
            .with_time_limit(cli.time_limit());
        stream
            .validate()
            .with_context(|| format!("target {}", spec.label))?;

        let status = RunStatusCell::new();
        let target = spec.target.coordinated(cli.tdoa);
        info!(label = %spec.label, endpoint = %target.endpoint(), coordinated = cli.tdoa, "worker configured");
        journal = journal.with_worker(spec.label.clone(), target.endpoint());

        let supervisor = ReconnectSupervisor::new(TcpRecorder::new(stream), target, signal.clone())
            .with_name(spec.label.clone())
            .with_config(reconnect)
            .with_status(status.clone());
        specs.push(worker_task(supervisor));
        statuses.push((spec.label, status));
    }

    // 4) Runtime; returns once every worker stopped or after an OS shutdown signal
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(journal)];
    let runtime = Supervisor::builder(SupervisorConfig::default())
        .with_subscribers(subscribers)
        .build();
    runtime
        .run(specs)
        .await
        .map_err(|e| anyhow!("runtime: {e}"))?;
    signal.clear();

    // 5) Outcome
    if !cli.tdoa {
        info!("all workers stopped");
        return Ok(ExitCode::SUCCESS);
    }
    let mut worst = RunStatus::Unset;
    for (label, status) in &statuses {
        let status = status.get();
        if status.is_failure() {
            warn!(%label, ?status, "worker failed");
        }
        worst = worst.max(status);
    }
    info!(status = ?worst, "all workers stopped");
    Ok(ExitCode::from(worst.code()))
}
