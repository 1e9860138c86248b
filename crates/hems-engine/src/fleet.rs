//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use std::collections::HashSet;

use chrono::Utc;
use hems_logging::{log_fleet_event, EventOutcome, LogContext};

use crate::{
    classify::{is_phantom_load, PHANTOM_LOAD_THRESHOLD_W},
    errors::{EngineError, Result},
    filter::DeviceFilter,
    metrics::{compute_metrics, DashboardMetrics},
    model::{daily_consumption_kwh, monthly_consumption_kwh, Device, NewDevice},
    seed::sample_devices,
    simulate::{RefreshReport, RefreshSimulator},
};

/// Household label used in log context when none is given.
pub const DEFAULT_HOUSEHOLD: &str = "household";

/// The live device collection plus the dashboard's current selection.
///
/// Ids are allocated from a monotonic counter that starts above every numeric
/// id already present, so an id is never handed out twice. Once the counter
/// passes `u64::MAX` further adds fail with [`EngineError::IdsExhausted`].
///
/// The fleet owns the phantom-load threshold; both adds and refreshes read it.
#[derive(Debug, Clone)]
pub struct DeviceFleet {
    household: String,
    devices: Vec<Device>,
    next_id: Option<u64>,
    selected: Option<String>,
    phantom_threshold_w: f64,
}

impl DeviceFleet {
    /// Wrap an existing collection, rejecting duplicate ids.
    pub fn new(devices: Vec<Device>) -> Result<Self> {
        let mut seen = HashSet::new();
        for device in &devices {
            if !seen.insert(device.id.as_str()) {
                return Err(EngineError::DuplicateId(device.id.clone()));
            }
        }
        let next_id = devices
            .iter()
            .filter_map(|d| d.id.parse::<u64>().ok())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        Ok(Self {
            household: DEFAULT_HOUSEHOLD.to_owned(),
            devices,
            next_id,
            selected: None,
            phantom_threshold_w: PHANTOM_LOAD_THRESHOLD_W,
        })
    }

    /// Fleet holding the six sample devices.
    pub fn seeded() -> Self {
        Self {
            household: "sample".to_owned(),
            devices: sample_devices(),
            next_id: Some(7),
            selected: None,
            phantom_threshold_w: PHANTOM_LOAD_THRESHOLD_W,
        }
    }

    pub fn with_phantom_threshold(mut self, threshold_w: f64) -> Self {
        self.phantom_threshold_w = threshold_w;
        self
    }

    /// Label attached to every log event the fleet emits.
    pub fn with_household(mut self, household: impl Into<String>) -> Self {
        self.household = household.into();
        self
    }

    pub fn household(&self) -> &str {
        &self.household
    }

    pub fn phantom_threshold_w(&self) -> f64 {
        self.phantom_threshold_w
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Validate `input` and append the resulting device.
    ///
    /// On failure the collection is left untouched.
    pub fn add_device(&mut self, input: NewDevice) -> Result<&Device> {
        let household_ctx = LogContext::new().with_household(&self.household);
        if let Err(err) = input.validate() {
            log_fleet_event(
                Some(&household_ctx),
                "fleet.add",
                &err.to_string(),
                EventOutcome::Rejected,
            );
            return Err(err.into());
        }
        let Some(next) = self.next_id else {
            log_fleet_event(
                Some(&household_ctx),
                "fleet.add",
                "device id space exhausted",
                EventOutcome::Rejected,
            );
            return Err(EngineError::IdsExhausted);
        };
        self.next_id = next.checked_add(1);
        let id = next.to_string();

        let daily_consumption = daily_consumption_kwh(input.current_power);
        let device = Device {
            has_phantom_load: is_phantom_load(
                input.current_power,
                input.status,
                self.phantom_threshold_w,
            ),
            id,
            name: input.name.trim().to_owned(),
            device_type: input.device_type.trim().to_owned(),
            location: input.location.trim().to_owned(),
            status: input.status,
            current_power: input.current_power,
            average_power: input.average_power,
            daily_consumption,
            monthly_consumption: monthly_consumption_kwh(daily_consumption),
            is_anomaly: false,
            last_update: Utc::now(),
        };

        let ctx = household_ctx.with_device(&device.id);
        log_fleet_event(
            Some(&ctx),
            "fleet.add",
            &format!("added {} ({})", device.name, device.location),
            EventOutcome::Applied,
        );
        self.devices.push(device);
        Ok(&self.devices[self.devices.len() - 1])
    }

    /// Remove a device by id, clearing the selection if it pointed there.
    /// Unknown ids leave the fleet unchanged.
    pub fn remove_device(&mut self, id: &str) -> Option<Device> {
        let index = self.devices.iter().position(|d| d.id == id)?;
        let removed = self.devices.remove(index);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        let ctx = LogContext::new()
            .with_household(&self.household)
            .with_device(id);
        log_fleet_event(
            Some(&ctx),
            "fleet.remove",
            &format!("removed {}", removed.name),
            EventOutcome::Applied,
        );
        Some(removed)
    }

    /// Select a device for the detail view. Returns `false` for unknown ids.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.selected = Some(id.to_owned());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Device> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Perturb every reading once and re-run classification.
    pub fn refresh_simulate(&mut self, simulator: &mut RefreshSimulator) -> RefreshReport {
        let report = simulator.refresh(&mut self.devices, self.phantom_threshold_w, Utc::now());
        tracing::debug!(
            household = %self.household,
            refreshed = report.refreshed,
            anomalies_raised = report.anomalies_raised.len(),
            anomalies_cleared = report.anomalies_cleared.len(),
            "fleet refreshed"
        );
        report
    }

    pub fn metrics(&self, cost_per_unit: f64) -> DashboardMetrics {
        compute_metrics(&self.devices, cost_per_unit)
    }

    pub fn filter(&self, filter: &DeviceFilter) -> Vec<&Device> {
        filter.apply(&self.devices)
    }
}

impl Default for DeviceFleet {
    fn default() -> Self {
        Self::seeded()
    }
}
