use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use kiwi_core::{Recorder, RecorderError};
use time::OffsetDateTime;
use tokio::{
    fs::{File, OpenOptions},
    io::{AsyncReadExt, AsyncWriteExt, BufWriter},
    net::TcpStream,
    time::{Instant, timeout},
};
use tracing::{debug, trace, warn};

use crate::{
    config::StreamConfig,
    segment::{free_segment_path, segment_stem},
};

/// Recorder pumping a raw TCP byte stream into `<spool>/<label>/<label>--<utc>.raw` segments.
///
/// A segment survives reconnects: reopening after a plain reconnect appends to it, while
/// [`Recorder::reset_segment`] makes the next `open` start a new file.
pub struct TcpRecorder {
    cfg: StreamConfig,
    stream: Option<TcpStream>,
    sink: Option<BufWriter<File>>,
    segment: Option<PathBuf>,
    first_open: Option<Instant>,
    buf: Vec<u8>,
    written: u64,
}

impl TcpRecorder {
    pub fn new(cfg: StreamConfig) -> Self {
        let buf = vec![0; cfg.chunk_size.max(1)];
        Self {
            cfg,
            stream: None,
            sink: None,
            segment: None,
            first_open: None,
            buf,
            written: 0,
        }
    }

    /// Segment currently written to, if any.
    pub fn segment(&self) -> Option<&Path> {
        self.segment.as_deref()
    }

    /// Bytes written across every segment so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    fn time_limit_reached(&self) -> bool {
        match (self.cfg.time_limit, self.first_open) {
            (Some(limit), Some(started)) => started.elapsed() >= limit,
            _ => false,
        }
    }

    async fn open_sink(&mut self) -> std::io::Result<File> {
        if let Some(path) = &self.segment {
            return OpenOptions::new().append(true).create(true).open(path).await;
        }

        let dir = self.cfg.segment_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let stem = segment_stem(&self.cfg.label, OffsetDateTime::now_utc());
        let path = free_segment_path(&dir, &stem).await?;
        let file = File::create(&path).await?;

        debug!(label = %self.cfg.label, segment = %path.display(), "new segment");
        self.segment = Some(path);
        Ok(file)
    }
}

#[async_trait]
impl Recorder for TcpRecorder {
    async fn connect(&mut self, host: &str, port: u16) -> Result<(), RecorderError> {
        self.stream = None;
        let stream = timeout(self.cfg.connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| {
                RecorderError::Connect(format!(
                    "{host}:{port}: no answer within {:?}",
                    self.cfg.connect_timeout
                ))
            })?
            .map_err(|e| RecorderError::Connect(format!("{host}:{port}: {e}")))?;

        trace!(host, port, "connected");
        self.stream = Some(stream);
        Ok(())
    }

    async fn open(&mut self) -> Result<(), RecorderError> {
        if self.stream.is_none() {
            return Err(RecorderError::Other("open without a connection".into()));
        }
        if let Some(mut sink) = self.sink.take() {
            sink.flush().await?;
        }
        let file = self.open_sink().await?;
        self.sink = Some(BufWriter::new(file));
        self.first_open.get_or_insert_with(Instant::now);
        Ok(())
    }

    async fn run(&mut self) -> Result<(), RecorderError> {
        if self.time_limit_reached() {
            return Err(RecorderError::TimeLimit);
        }
        let (Some(stream), Some(sink)) = (self.stream.as_mut(), self.sink.as_mut()) else {
            return Err(RecorderError::Other("run without an open session".into()));
        };

        let n = match timeout(self.cfg.read_timeout, stream.read(&mut self.buf)).await {
            Err(_) => {
                return Err(RecorderError::ServerTerminated(format!(
                    "no data for {:?}",
                    self.cfg.read_timeout
                )));
            }
            Ok(read) => read.map_err(hangup_or_io)?,
        };
        if n == 0 {
            return Err(RecorderError::ServerTerminated(
                "connection closed by peer".into(),
            ));
        }

        sink.write_all(&self.buf[..n]).await?;
        self.written += n as u64;
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(mut sink) = self.sink.take()
            && let Err(e) = sink.flush().await
        {
            warn!(label = %self.cfg.label, error = %e, "failed to flush segment");
        }
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
    }

    fn reset_segment(&mut self) {
        self.segment = None;
    }
}

/// A reset or aborted session is the peer going away, not a local IO failure.
fn hangup_or_io(e: io::Error) -> RecorderError {
    match e.kind() {
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => RecorderError::ServerTerminated(e.to_string()),
        _ => e.into(),
    }
}

#[cfg(test)]
mod tests;
