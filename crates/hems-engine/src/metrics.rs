//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    category::DeviceCategory,
    model::{daily_consumption_kwh, monthly_consumption_kwh, Device, DeviceStatus},
};

/// `numerator / denominator * 100`, or `0` whenever the result would not be finite.
pub fn percent_of(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    finite_or_zero(numerator / denominator * 100.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Monthly cost of drawing `power_w` continuously for thirty days.
///
/// This prices the device's *current* draw, not its measured standby energy.
pub fn continuous_draw_monthly_cost(power_w: f64, cost_per_unit: f64) -> f64 {
    monthly_consumption_kwh(daily_consumption_kwh(power_w)) * cost_per_unit
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceCost {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: DeviceStatus,
    pub monthly_consumption: f64,
    pub daily_cost: f64,
    pub monthly_cost: f64,
    /// Share of the household's estimated monthly cost.
    pub percent_of_total: f64,
    /// Current draw as a percentage of the device's baseline.
    pub consumption_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeShare {
    pub device_type: String,
    pub category: DeviceCategory,
    pub total_power_w: f64,
    pub share_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationShare {
    pub location: String,
    pub device_count: usize,
    pub share_percent: f64,
}

/// Snapshot of everything the dashboard derives from the device collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub cost_per_unit: f64,
    pub device_count: usize,
    pub total_current_power: f64,
    pub total_daily_consumption: f64,
    pub total_monthly_consumption: f64,
    pub online_count: usize,
    pub anomaly_devices: Vec<Device>,
    pub phantom_load_devices: Vec<Device>,
    pub efficient_count: usize,
    pub estimated_monthly_cost: f64,
    pub daily_cost: f64,
    pub phantom_load_cost: f64,
    /// Phantom-load cost as a percentage of the estimated monthly cost.
    pub phantom_cost_share: f64,
    /// Per-device costs in collection order.
    pub device_costs: Vec<DeviceCost>,
    /// Current draw grouped by device type, in first-seen order.
    pub power_by_type: Vec<TypeShare>,
    /// Device counts grouped by location, in first-seen order.
    pub devices_by_location: Vec<LocationShare>,
}

impl DashboardMetrics {
    /// Number of alerts shown on the summary card. A device that is both
    /// anomalous and in phantom load counts twice.
    pub fn alert_count(&self) -> usize {
        self.anomaly_devices.len() + self.phantom_load_devices.len()
    }

    pub fn has_alerts(&self) -> bool {
        self.alert_count() > 0
    }

    /// Per-device costs ordered by monthly consumption, largest first.
    pub fn cost_breakdown(&self) -> Vec<&DeviceCost> {
        let mut costs: Vec<&DeviceCost> = self.device_costs.iter().collect();
        costs.sort_by(|a, b| b.monthly_consumption.total_cmp(&a.monthly_consumption));
        costs
    }

    pub fn device_cost(&self, id: &str) -> Option<&DeviceCost> {
        self.device_costs.iter().find(|cost| cost.id == id)
    }
}

/// Derive the dashboard snapshot for `devices` priced at `cost_per_unit` per kWh.
///
/// Never fails: every ratio with a zero or non-finite denominator is reported as `0`.
pub fn compute_metrics(devices: &[Device], cost_per_unit: f64) -> DashboardMetrics {
    let cost_per_unit = finite_or_zero(cost_per_unit);

    let total_current_power: f64 = devices.iter().map(|d| d.current_power).sum();
    let total_daily_consumption: f64 = devices.iter().map(|d| d.daily_consumption).sum();
    let total_monthly_consumption: f64 = devices.iter().map(|d| d.monthly_consumption).sum();
    let online_count = devices.iter().filter(|d| d.is_online()).count();

    let anomaly_devices: Vec<Device> = devices.iter().filter(|d| d.is_anomaly).cloned().collect();
    let phantom_load_devices: Vec<Device> = devices
        .iter()
        .filter(|d| d.has_phantom_load)
        .cloned()
        .collect();
    let efficient_count = devices
        .iter()
        .filter(|d| !d.is_anomaly && !d.has_phantom_load)
        .count();

    let estimated_monthly_cost = total_monthly_consumption * cost_per_unit;
    let daily_cost = total_daily_consumption * cost_per_unit;
    let phantom_load_cost = phantom_load_devices
        .iter()
        .map(|d| continuous_draw_monthly_cost(d.current_power, cost_per_unit))
        .sum();
    let phantom_cost_share = percent_of(phantom_load_cost, estimated_monthly_cost);

    let device_costs = devices
        .iter()
        .map(|d| {
            let monthly_cost = d.monthly_cost(cost_per_unit);
            DeviceCost {
                id: d.id.clone(),
                name: d.name.clone(),
                location: d.location.clone(),
                status: d.status,
                monthly_consumption: d.monthly_consumption,
                daily_cost: d.daily_cost(cost_per_unit),
                monthly_cost,
                percent_of_total: percent_of(monthly_cost, estimated_monthly_cost),
                consumption_ratio: d.consumption_ratio(),
            }
        })
        .collect();

    let mut type_power: IndexMap<&str, f64> = IndexMap::new();
    let mut location_counts: IndexMap<&str, usize> = IndexMap::new();
    for device in devices {
        *type_power.entry(device.device_type.as_str()).or_default() += device.current_power;
        *location_counts.entry(device.location.as_str()).or_default() += 1;
    }

    let power_by_type = type_power
        .into_iter()
        .map(|(device_type, total_power_w)| TypeShare {
            device_type: device_type.to_owned(),
            category: DeviceCategory::from_type_label(device_type),
            total_power_w,
            share_percent: percent_of(total_power_w, total_current_power),
        })
        .collect();

    let devices_by_location = location_counts
        .into_iter()
        .map(|(location, device_count)| LocationShare {
            location: location.to_owned(),
            device_count,
            share_percent: percent_of(device_count as f64, devices.len() as f64),
        })
        .collect();

    debug!(
        devices = devices.len(),
        total_current_power,
        total_monthly_consumption,
        estimated_monthly_cost,
        anomalies = anomaly_devices.len(),
        phantom_loads = phantom_load_devices.len(),
        "dashboard metrics computed"
    );

    DashboardMetrics {
        cost_per_unit,
        device_count: devices.len(),
        total_current_power,
        total_daily_consumption,
        total_monthly_consumption,
        online_count,
        anomaly_devices,
        phantom_load_devices,
        efficient_count,
        estimated_monthly_cost,
        daily_cost,
        phantom_load_cost,
        phantom_cost_share,
        device_costs,
        power_by_type,
        devices_by_location,
    }
}
