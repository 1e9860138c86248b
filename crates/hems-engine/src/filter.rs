//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::model::Device;

/// Search criteria applied to the device list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFilter {
    /// Matched case-insensitively against name and location.
    #[serde(default)]
    pub search_term: String,
    /// Exact device type, when set.
    #[serde(default)]
    pub device_type: Option<String>,
    /// Exact location, when set.
    #[serde(default)]
    pub location: Option<String>,
}

impl DeviceFilter {
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Whether the type or location selector narrows the list.
    pub fn has_selectors(&self) -> bool {
        self.device_type.is_some() || self.location.is_some()
    }

    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.has_selectors()
    }

    pub fn clear_selectors(&mut self) {
        self.device_type = None;
        self.location = None;
    }

    pub fn matches(&self, device: &Device) -> bool {
        let needle = self.search_term.to_lowercase();
        let text_match = device.name.to_lowercase().contains(&needle)
            || device.location.to_lowercase().contains(&needle);
        let type_match = self
            .device_type
            .as_deref()
            .map_or(true, |t| device.device_type == t);
        let location_match = self
            .location
            .as_deref()
            .map_or(true, |l| device.location == l);
        text_match && type_match && location_match
    }

    /// Order-preserving subsequence of `devices` matching every criterion.
    pub fn apply<'a>(&self, devices: &'a [Device]) -> Vec<&'a Device> {
        devices.iter().filter(|d| self.matches(d)).collect()
    }
}

/// Devices whose name or location contains `search_term` (case-insensitive) and
/// which match the optional type and location selectors exactly.
pub fn filter_devices<'a>(
    devices: &'a [Device],
    search_term: &str,
    type_filter: Option<&str>,
    location_filter: Option<&str>,
) -> Vec<&'a Device> {
    DeviceFilter {
        search_term: search_term.to_owned(),
        device_type: type_filter.map(str::to_owned),
        location: location_filter.map(str::to_owned),
    }
    .apply(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_devices;

    fn ids(devices: &[&Device]) -> Vec<String> {
        devices.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let devices = sample_devices();
        assert_eq!(ids(&filter_devices(&devices, "tV", None, None)), ["1"]);
    }

    #[test]
    fn search_covers_location() {
        let devices = sample_devices();
        assert_eq!(ids(&filter_devices(&devices, "cozinha", None, None)), ["2", "4"]);
    }

    #[test]
    fn selectors_combine_with_search() {
        let devices = sample_devices();
        let hits = filter_devices(&devices, "", Some("Eletrodoméstico"), Some("Cozinha"));
        assert_eq!(ids(&hits), ["2", "4"]);
        let hits = filter_devices(&devices, "micro", Some("Eletrodoméstico"), None);
        assert_eq!(ids(&hits), ["4"]);
    }

    #[test]
    fn no_match_is_an_empty_list() {
        let devices = sample_devices();
        assert!(filter_devices(&devices, "garage", None, None).is_empty());
        assert!(filter_devices(&devices, "", Some("Outros"), None).is_empty());
    }

    #[test]
    fn selectors_match_exactly() {
        let devices = sample_devices();
        assert!(filter_devices(&devices, "", None, Some("cozinha")).is_empty());
    }

    #[test]
    fn filter_state_reports_activity() {
        let mut filter = DeviceFilter::new("").with_location("Geral");
        assert!(filter.is_active());
        filter.clear_selectors();
        assert!(!filter.is_active());
    }
}
