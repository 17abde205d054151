use std::{path::PathBuf, time::Duration};

use clap::Parser;
use kiwi_core::ReconnectConfig;
use kiwi_observe::{LoggerConfig, LoggerFormat};

#[derive(Parser, Debug)]
#[command(
    name = "kiwi-agentd",
    about = "Record raw streams from KiwiSDR receivers, reconnecting whenever a session drops"
)]
pub struct Cli {
    /// Comma separated targets, each `label:host[:port]` (port defaults to 8073)
    #[arg(short, long)]
    pub targets: String,

    /// Spool directory; segments land in `<spool>/<label>/`
    #[arg(short, long, default_value = "/tmp/spool")]
    pub spool: PathBuf,

    /// Stop recording after this many seconds
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Coordinated (TDOA) mode: stop on the first connect failure or busy server and
    /// exit with the worst status code (1 = failure, 2 = busy)
    #[arg(long)]
    pub tdoa: bool,

    /// Seconds to wait after a failed connect
    #[arg(long, default_value_t = 15)]
    pub connect_backoff: u64,

    /// Seconds to wait after the server reported it is too busy
    #[arg(long, default_value_t = 15)]
    pub busy_backoff: u64,

    /// Seconds to wait after the server terminated a session
    #[arg(long, default_value_t = 5)]
    pub terminated_backoff: u64,

    /// Log filter directive
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output: text, json or journald
    #[arg(long, default_value = "text")]
    pub log_format: LoggerFormat,
}

impl Cli {
    pub fn reconnect(&self) -> ReconnectConfig {
        ReconnectConfig {
            connect_backoff: Duration::from_secs(self.connect_backoff),
            busy_backoff: Duration::from_secs(self.busy_backoff),
            terminated_backoff: Duration::from_secs(self.terminated_backoff),
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit.map(Duration::from_secs)
    }

    pub fn logger(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            ..Default::default()
        }
    }
}
