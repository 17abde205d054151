use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::time::OffsetTime, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Name the agent logs under in the journal.
#[cfg(all(target_os = "linux", feature = "journald"))]
const SYSLOG_IDENTIFIER: &str = "kiwi-agentd";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

impl LoggerConfig {
    /// Installs this configuration as the process-wide `tracing` subscriber.
    ///
    /// Only the first successful call takes effect; later calls report
    /// [`LoggerError::AlreadyInitialized`].
    pub fn install(&self) -> Result<(), LoggerError> {
        let filter = filter(&self.level)?;
        let output = match self.format {
            LoggerFormat::Text => fmt::layer()
                .with_ansi(self.use_color)
                .with_target(self.with_targets)
                .with_timer(local_timer())
                .boxed(),
            LoggerFormat::Json => fmt::layer()
                .json()
                .with_ansi(false)
                .with_current_span(true)
                .with_target(self.with_targets)
                .with_timer(local_timer())
                .boxed(),
            LoggerFormat::Journald => journald()?,
        };

        tracing_subscriber::registry()
            .with(output.with_filter(filter))
            .try_init()
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("global default") {
                    LoggerError::AlreadyInitialized
                } else {
                    LoggerError::Init(msg)
                }
            })
    }
}

pub(crate) fn filter(level: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(level).map_err(|e| LoggerError::InvalidLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

/// Timestamps in the host's local offset; falls back to UTC when the offset is unknown.
fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald() -> Result<BoxedLayer, LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::Init(format!("journald: {e}")))?
        .with_syslog_identifier(SYSLOG_IDENTIFIER.to_string());
    Ok(layer.boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald() -> Result<BoxedLayer, LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}
