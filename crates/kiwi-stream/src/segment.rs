use std::path::{Path, PathBuf};

use time::{OffsetDateTime, UtcOffset, macros::format_description};

/// `<label>--YYYY-MM-DD--HH-MM-SS`, in UTC.
pub(crate) fn segment_stem(label: &str, at: OffsetDateTime) -> String {
    let ts = at
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]--[hour]-[minute]-[second]"
        ))
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("{label}--{ts}")
}

/// First `<stem>[-n].raw` under `dir` that does not exist yet.
pub(crate) async fn free_segment_path(dir: &Path, stem: &str) -> std::io::Result<PathBuf> {
    let mut n = 0u32;
    loop {
        let name = match n {
            0 => format!("{stem}.raw"),
            n => format!("{stem}-{n}.raw"),
        };
        let path = dir.join(name);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(path);
        }
        n += 1;
    }
}
