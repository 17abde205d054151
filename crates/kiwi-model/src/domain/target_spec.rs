use std::{collections::HashSet, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ConnectionTarget, DEFAULT_PORT, Label, ModelError};

/// A labelled recording target, written on the command line as `label:host[:port]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    pub label: Label,
    pub target: ConnectionTarget,
}

impl FromStr for TargetSpec {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let parts: Vec<&str> = raw.split(':').map(str::trim).collect();

        let (label, host, port) = match parts.as_slice() {
            [label, host] => (*label, *host, DEFAULT_PORT),
            [label, host, port] => {
                let port = port.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(|| {
                    ModelError::InvalidPort {
                        target: raw.to_string(),
                        port: port.to_string(),
                    }
                })?;
                (*label, *host, port)
            }
            _ => return Err(ModelError::InvalidTarget(raw.to_string())),
        };

        if label.is_empty() {
            return Err(ModelError::EmptyLabel(raw.to_string()));
        }
        if host.is_empty() {
            return Err(ModelError::EmptyHost(raw.to_string()));
        }
        Ok(Self {
            label: label.to_string(),
            target: ConnectionTarget::new(host, port),
        })
    }
}

/// Parses a comma separated list of targets, skipping empty entries.
///
/// Labels name both the worker and its spool directory, so they must be unique.
pub fn parse_targets(list: &str) -> Result<Vec<TargetSpec>, ModelError> {
    let specs = list
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(TargetSpec::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(specs.len());
    if let Some(dup) = specs.iter().find(|s| !seen.insert(s.label.as_str())) {
        return Err(ModelError::DuplicateLabel(dup.label.clone()));
    }
    Ok(specs)
}
