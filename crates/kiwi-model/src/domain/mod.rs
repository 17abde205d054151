mod target;
pub use target::ConnectionTarget;

mod run_status;
pub use run_status::RunStatus;

mod target_spec;
pub use target_spec::{TargetSpec, parse_targets};

/// Port the receivers listen on unless a target names another one.
pub const DEFAULT_PORT: u16 = 8073;

/// Human readable name of a recording target, used for spool directories and log fields.
pub type Label = String;
