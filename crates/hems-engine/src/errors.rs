//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use std::fmt;

use thiserror::Error;

use crate::model::DeviceField;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("device id {0} appears more than once")]
    DuplicateId(String),
    #[error("no numeric device ids left to allocate")]
    IdsExhausted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("yaml serialization error: {0}")]
    YamlSerializationFailed(#[from] serde_yaml::Error),
}

/// Rejected device input. Lists every offending field, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<DeviceField>,
    pub invalid: Vec<DeviceField>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |fields: &[DeviceField]| {
            fields
                .iter()
                .map(|field| field.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "invalid device")?;
        if !self.missing.is_empty() {
            write!(f, "; missing required fields: {}", join(&self.missing))?;
        }
        if !self.invalid.is_empty() {
            write!(f, "; invalid values for: {}", join(&self.invalid))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
