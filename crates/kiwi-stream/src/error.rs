use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StreamError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("label {0:?} must not contain path separators")]
    InvalidLabel(String),
    #[error("chunk size must be positive")]
    ZeroChunk,
    #[error("{0} must be positive")]
    ZeroTimeout(&'static str),
}
