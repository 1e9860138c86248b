//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use std::{fs, path::Path};

use tracing::debug;

use crate::{
    errors::{EngineError, Result, ValidationError},
    model::{Device, DeviceField},
};

/// Load a device collection from a JSON array or a YAML sequence.
///
/// Every power and consumption reading must be a finite, non-negative number.
pub fn load_devices_from_file(path: impl AsRef<Path>) -> Result<Vec<Device>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    let devices = parse_devices(&data)?;
    debug!(path = %path.display(), devices = devices.len(), "device file loaded");
    Ok(devices)
}

pub fn parse_devices(data: &str) -> Result<Vec<Device>> {
    let trimmed = data.trim_start();
    let devices: Vec<Device> = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        serde_json::from_str(data)?
    } else {
        serde_yaml::from_str(data).map_err(EngineError::YamlSerializationFailed)?
    };
    for device in &devices {
        check_readings(device)?;
    }
    Ok(devices)
}

fn check_readings(device: &Device) -> Result<()> {
    let readings = [
        (DeviceField::CurrentPower, device.current_power),
        (DeviceField::AveragePower, device.average_power),
        (DeviceField::DailyConsumption, device.daily_consumption),
        (DeviceField::MonthlyConsumption, device.monthly_consumption),
    ];
    let invalid: Vec<DeviceField> = readings
        .into_iter()
        .filter(|(_, value)| !(value.is_finite() && *value >= 0.0))
        .map(|(field, _)| field)
        .collect();
    if invalid.is_empty() {
        return Ok(());
    }
    debug!(device = %device.id, "rejecting device with invalid readings");
    Err(ValidationError {
        missing: Vec::new(),
        invalid,
    }
    .into())
}
