//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use crate::model::{Device, DeviceStatus};

/// Standby draw below this many watts (and above zero) counts as phantom load.
pub const PHANTOM_LOAD_THRESHOLD_W: f64 = 20.0;

/// A device nominally in standby that still draws a small, non-zero load.
pub fn is_phantom_load(current_power: f64, status: DeviceStatus, threshold_w: f64) -> bool {
    status == DeviceStatus::Standby && current_power > 0.0 && current_power < threshold_w
}

/// Current draw above `ratio` times the baseline. A zero baseline never flags.
pub fn exceeds_baseline(device: &Device, ratio: f64) -> bool {
    device.average_power > 0.0 && device.current_power > device.average_power * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_devices;

    #[test]
    fn phantom_requires_standby_and_small_draw() {
        let t = PHANTOM_LOAD_THRESHOLD_W;
        assert!(is_phantom_load(10.0, DeviceStatus::Standby, t));
        assert!(!is_phantom_load(120.0, DeviceStatus::Standby, t));
        assert!(!is_phantom_load(20.0, DeviceStatus::Standby, t));
        assert!(!is_phantom_load(0.0, DeviceStatus::Standby, t));
        assert!(!is_phantom_load(10.0, DeviceStatus::Online, t));
    }

    #[test]
    fn baseline_rule_on_seed() {
        let devices = sample_devices();
        let flagged: Vec<_> = devices
            .iter()
            .filter(|d| exceeds_baseline(d, 1.22))
            .map(|d| d.id.as_str())
            .collect();
        // 350 / 280 = 1.25 and 60 / 45 = 1.33; the fridge runs at 1.2.
        assert_eq!(flagged, ["5", "6"]);

        let mut idle = devices[0].clone();
        idle.average_power = 0.0;
        assert!(!exceeds_baseline(&idle, 1.3));
    }
}
