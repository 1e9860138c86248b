//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{category::DeviceCategory, errors::ValidationError, metrics::percent_of};

pub const HOURS_PER_DAY: f64 = 24.0;
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Energy drawn over a day at a constant `power_w`, in kWh.
pub fn daily_consumption_kwh(power_w: f64) -> f64 {
    power_w * HOURS_PER_DAY / 1000.0
}

/// Monthly energy extrapolated from a daily figure, in kWh.
pub fn monthly_consumption_kwh(daily_kwh: f64) -> f64 {
    daily_kwh * DAYS_PER_MONTH
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceStatus {
    #[default]
    Online,
    Offline,
    Standby,
}

/// A monitored household device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub location: String,
    pub status: DeviceStatus,
    /// Instantaneous draw in watts.
    pub current_power: f64,
    /// Baseline draw in watts used as the comparison denominator.
    pub average_power: f64,
    /// kWh
    pub daily_consumption: f64,
    /// kWh
    pub monthly_consumption: f64,
    #[serde(default)]
    pub is_anomaly: bool,
    #[serde(default)]
    pub has_phantom_load: bool,
    #[serde(default = "Utc::now")]
    pub last_update: DateTime<Utc>,
}

impl Device {
    /// `current_power / average_power * 100`, or `0` when the baseline is zero.
    pub fn consumption_ratio(&self) -> f64 {
        percent_of(self.current_power, self.average_power)
    }

    pub fn daily_cost(&self, cost_per_unit: f64) -> f64 {
        self.daily_consumption * cost_per_unit
    }

    pub fn monthly_cost(&self, cost_per_unit: f64) -> f64 {
        self.monthly_consumption * cost_per_unit
    }

    pub fn category(&self) -> DeviceCategory {
        DeviceCategory::from_type_label(&self.device_type)
    }

    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }

    /// Set a new instantaneous draw and derive both consumption fields from it.
    pub(crate) fn apply_power(&mut self, power_w: f64, now: DateTime<Utc>) {
        self.current_power = power_w;
        self.daily_consumption = daily_consumption_kwh(power_w);
        self.monthly_consumption = monthly_consumption_kwh(self.daily_consumption);
        self.last_update = now;
    }
}

/// Device fields named by a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceField {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "type")]
    Type,
    #[strum(serialize = "location")]
    Location,
    #[strum(serialize = "currentPower")]
    CurrentPower,
    #[strum(serialize = "averagePower")]
    AveragePower,
    #[strum(serialize = "dailyConsumption")]
    DailyConsumption,
    #[strum(serialize = "monthlyConsumption")]
    MonthlyConsumption,
}

/// Caller input for a new device; derived fields are computed on insertion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub location: String,
    pub current_power: f64,
    pub average_power: f64,
    pub status: DeviceStatus,
}

impl NewDevice {
    pub fn new(
        name: impl Into<String>,
        device_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            device_type: device_type.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn with_power(mut self, current_power: f64, average_power: f64) -> Self {
        self.current_power = current_power;
        self.average_power = average_power;
        self
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(DeviceField::Name);
        }
        if self.device_type.trim().is_empty() {
            missing.push(DeviceField::Type);
        }
        if self.location.trim().is_empty() {
            missing.push(DeviceField::Location);
        }

        let mut invalid = Vec::new();
        if !is_valid_power(self.current_power) {
            invalid.push(DeviceField::CurrentPower);
        }
        if !is_valid_power(self.average_power) {
            invalid.push(DeviceField::AveragePower);
        }

        let err = ValidationError { missing, invalid };
        if err.is_empty() {
            Ok(())
        } else {
            Err(err)
        }
    }
}

fn is_valid_power(watts: f64) -> bool {
    watts.is_finite() && watts >= 0.0
}
