use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("expected label:host[:port], got {0:?}")]
    InvalidTarget(String),
    #[error("empty label in target {0:?}")]
    EmptyLabel(String),
    #[error("empty host in target {0:?}")]
    EmptyHost(String),
    #[error("invalid port {port:?} in target {target:?}")]
    InvalidPort { target: String, port: String },
    #[error("label {0:?} used by more than one target")]
    DuplicateLabel(String),
    #[error("unknown run status code: {0}")]
    UnknownStatus(u8),
}
