//! Raw TCP recorder: pumps whatever the receiver streams into segmented spool files.
//!
//! The crate implements [`kiwi_core::Recorder`] and knows nothing about reconnect policy;
//! it only classifies its own failures into [`kiwi_core::RecorderError`].

mod config;
pub use config::StreamConfig;

mod error;
pub use error::StreamError;

mod segment;

mod tcp;
pub use tcp::TcpRecorder;
