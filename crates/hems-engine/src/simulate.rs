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
use hems_common::config::{AnomalyPolicy, DetectionConfig, SimulationConfig};
use rand::prelude::*;
use serde::Serialize;

use crate::{
    classify::{exceeds_baseline, is_phantom_load},
    model::Device,
};

/// Lowest draw a refreshed device can report, in watts.
pub const MIN_REFRESH_POWER_W: f64 = 1.0;

/// Changes applied by one refresh pass.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub anomalies_raised: Vec<String>,
    pub anomalies_cleared: Vec<String>,
    pub phantom_raised: Vec<String>,
    pub phantom_cleared: Vec<String>,
}

/// Perturbs device readings to imitate live telemetry.
#[derive(Debug)]
pub struct RefreshSimulator {
    rng: StdRng,
    variation: f64,
    detection: DetectionConfig,
}

impl RefreshSimulator {
    /// Build from configuration; entropy-seeded when no seed is configured.
    pub fn new(simulation: &SimulationConfig, detection: &DetectionConfig) -> Self {
        let rng = match simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            variation: simulation.variation.abs(),
            detection: detection.clone(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(
            &SimulationConfig {
                seed: Some(seed),
                ..SimulationConfig::default()
            },
            &DetectionConfig::default(),
        )
    }

    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }

    /// Apply one refresh to every device.
    ///
    /// Each reading moves by a uniform factor in `[-variation, variation]`, is
    /// rounded to whole watts and floored at [`MIN_REFRESH_POWER_W`]; both
    /// consumption fields follow the new draw. Phantom load, when recomputed,
    /// uses `phantom_threshold_w` from the owning fleet.
    pub fn refresh(
        &mut self,
        devices: &mut [Device],
        phantom_threshold_w: f64,
        now: DateTime<Utc>,
    ) -> RefreshReport {
        let mut report = RefreshReport::default();
        for device in devices.iter_mut() {
            let factor = 1.0 + self.rng.gen_range(-self.variation..=self.variation);
            let power = (device.current_power * factor)
                .round()
                .max(MIN_REFRESH_POWER_W);
            device.apply_power(power, now);

            let was_anomaly = device.is_anomaly;
            device.is_anomaly = self.evaluate_anomaly(device);
            match (was_anomaly, device.is_anomaly) {
                (false, true) => report.anomalies_raised.push(device.id.clone()),
                (true, false) => report.anomalies_cleared.push(device.id.clone()),
                _ => {}
            }

            if self.detection.recompute_phantom_on_refresh {
                let was_phantom = device.has_phantom_load;
                device.has_phantom_load =
                    is_phantom_load(device.current_power, device.status, phantom_threshold_w);
                match (was_phantom, device.has_phantom_load) {
                    (false, true) => report.phantom_raised.push(device.id.clone()),
                    (true, false) => report.phantom_cleared.push(device.id.clone()),
                    _ => {}
                }
            }
            report.refreshed += 1;
        }
        report
    }

    fn evaluate_anomaly(&mut self, device: &Device) -> bool {
        match self.detection.anomaly {
            AnomalyPolicy::Threshold { ratio } => exceeds_baseline(device, ratio),
            // Sticky: a random draw only ever raises the flag.
            AnomalyPolicy::Random { probability } => {
                device.is_anomaly || self.rng.gen_bool(probability.clamp(0.0, 1.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::PHANTOM_LOAD_THRESHOLD_W, seed::sample_devices};

    const T: f64 = PHANTOM_LOAD_THRESHOLD_W;

    #[test]
    fn refreshed_power_stays_within_bounds() {
        let mut devices = sample_devices();
        let before: Vec<f64> = devices.iter().map(|d| d.current_power).collect();
        let mut sim = RefreshSimulator::seeded(42);
        sim.refresh(&mut devices, T, Utc::now());
        for (device, old) in devices.iter().zip(before) {
            assert!(device.current_power >= MIN_REFRESH_POWER_W);
            assert!(device.current_power <= (old * 1.1).round().max(1.0));
            assert!(device.current_power >= (old * 0.9).round().max(1.0));
            assert_eq!(device.current_power.fract(), 0.0);
            assert_eq!(device.monthly_consumption, device.daily_consumption * 30.0);
        }
    }

    #[test]
    fn same_seed_same_readings() {
        let mut a = sample_devices();
        let mut b = sample_devices();
        let now = Utc::now();
        RefreshSimulator::seeded(7).refresh(&mut a, T, now);
        RefreshSimulator::seeded(7).refresh(&mut b, T, now);
        let power = |ds: &[Device]| ds.iter().map(|d| d.current_power).collect::<Vec<_>>();
        assert_eq!(power(&a), power(&b));
    }

    #[test]
    fn tiny_loads_floor_at_one_watt() {
        let mut devices = sample_devices();
        for device in &mut devices {
            device.current_power = 0.0;
        }
        let mut sim = RefreshSimulator::seeded(1);
        for _ in 0..5 {
            sim.refresh(&mut devices, T, Utc::now());
        }
        assert!(devices.iter().all(|d| d.current_power >= 1.0));
    }

    #[test]
    fn random_policy_never_clears() {
        let detection = DetectionConfig {
            anomaly: AnomalyPolicy::Random { probability: 0.0 },
            ..DetectionConfig::default()
        };
        let mut devices = sample_devices();
        let mut sim = RefreshSimulator::seeded(3).with_detection(detection);
        let report = sim.refresh(&mut devices, T, Utc::now());
        assert!(report.anomalies_raised.is_empty());
        assert!(report.anomalies_cleared.is_empty());
        assert!(devices[1].is_anomaly && devices[4].is_anomaly);

        let detection = DetectionConfig {
            anomaly: AnomalyPolicy::Random { probability: 1.0 },
            ..DetectionConfig::default()
        };
        let mut sim = RefreshSimulator::seeded(3).with_detection(detection);
        sim.refresh(&mut devices, T, Utc::now());
        assert!(devices.iter().all(|d| d.is_anomaly));
    }

    #[test]
    fn threshold_policy_tracks_baseline() {
        let mut devices = sample_devices();
        devices[2].current_power = 5000.0;
        devices[1].current_power = 100.0;
        let mut sim = RefreshSimulator::seeded(11);
        let report = sim.refresh(&mut devices, T, Utc::now());
        assert!(devices[2].is_anomaly);
        assert!(report.anomalies_raised.contains(&"3".to_owned()));
        assert!(!devices[1].is_anomaly);
        assert!(report.anomalies_cleared.contains(&"2".to_owned()));
    }

    #[test]
    fn phantom_load_follows_refresh_when_enabled() {
        let mut devices = sample_devices();
        devices[0].current_power = 500.0;
        let mut sim = RefreshSimulator::seeded(5);
        let report = sim.refresh(&mut devices, T, Utc::now());
        assert!(!devices[0].has_phantom_load);
        assert_eq!(report.phantom_cleared, ["1"]);
    }

    #[test]
    fn phantom_load_frozen_in_legacy_mode() {
        let detection = DetectionConfig {
            recompute_phantom_on_refresh: false,
            ..DetectionConfig::default()
        };
        let mut devices = sample_devices();
        devices[0].current_power = 500.0;
        let mut sim = RefreshSimulator::seeded(5).with_detection(detection);
        let report = sim.refresh(&mut devices, T, Utc::now());
        assert!(devices[0].has_phantom_load);
        assert!(report.phantom_cleared.is_empty());
    }
}
