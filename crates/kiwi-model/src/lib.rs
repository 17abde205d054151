//! Plain data shared by the recorder workers and the agent binary.

mod domain;
pub use domain::*;

mod error;
pub use error::ModelError;
