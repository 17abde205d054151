use std::{path::PathBuf, time::Duration};

use crate::error::StreamError;

#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Subdirectory of `spool` and prefix of every segment file.
    pub label: String,
    /// Root directory holding one subdirectory per label.
    pub spool: PathBuf,
    /// Upper bound of bytes pumped by one `run` call.
    pub chunk_size: usize,
    /// A read that stays silent this long counts as a dropped session.
    pub read_timeout: Duration,
    pub connect_timeout: Duration,
    /// Total recording time, counted from the first opened session.
    pub time_limit: Option<Duration>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            label: "kiwi".to_string(),
            spool: PathBuf::from("/tmp/spool"),
            chunk_size: 8192,
            read_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            time_limit: None,
        }
    }
}

impl StreamConfig {
    pub fn new(label: impl Into<String>, spool: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            spool: spool.into(),
            ..Default::default()
        }
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.label.trim().is_empty() {
            return Err(StreamError::EmptyLabel);
        }
        if self.label.contains(['/', '\\']) || self.label == "." || self.label == ".." {
            return Err(StreamError::InvalidLabel(self.label.clone()));
        }
        if self.chunk_size == 0 {
            return Err(StreamError::ZeroChunk);
        }
        if self.read_timeout.is_zero() {
            return Err(StreamError::ZeroTimeout("read timeout"));
        }
        if self.connect_timeout.is_zero() {
            return Err(StreamError::ZeroTimeout("connect timeout"));
        }
        Ok(())
    }

    /// Directory the segments of this label are written to.
    pub fn segment_dir(&self) -> PathBuf {
        self.spool.join(&self.label)
    }
}
