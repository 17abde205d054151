use serde::{Deserialize, Serialize};

/// Remote endpoint a worker keeps reconnecting to.
///
/// `coordinated` selects the status-reporting failure policy used when several receivers are
/// recorded together for time-difference-of-arrival processing: instead of retrying forever,
/// the worker stops on the first connect failure or busy server and reports why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub coordinated: bool,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            coordinated: false,
        }
    }

    pub fn coordinated(mut self, on: bool) -> Self {
        self.coordinated = on;
        self
    }

    /// Returns `host:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
