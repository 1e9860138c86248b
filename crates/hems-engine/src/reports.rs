//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{errors::Result, metrics::DashboardMetrics};

pub const METRICS_REPORT_FILE: &str = "dashboard_metrics.json";

#[derive(Debug)]
pub struct MetricsExporter<'a> {
    metrics: &'a DashboardMetrics,
    generated_at: DateTime<Utc>,
}

impl<'a> MetricsExporter<'a> {
    pub fn new(metrics: &'a DashboardMetrics) -> Self {
        Self {
            metrics,
            generated_at: Utc::now(),
        }
    }

    /// Write the report into `output_dir`, creating it when missing.
    pub fn export(&self, output_dir: &Path) -> Result<PathBuf> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }
        let generated_at = self.generated_at.to_rfc3339();
        let envelope = ReportEnvelope {
            generated_at: &generated_at,
            cost_per_unit: self.metrics.cost_per_unit,
            schema: dashboard_metrics_schema(),
            data: self.metrics,
        };
        let path = output_dir.join(METRICS_REPORT_FILE);
        let serialized = serde_json::to_string_pretty(&envelope)?;
        fs::write(&path, serialized)?;
        info!(path = %path.display(), "dashboard metrics exported");
        Ok(path)
    }
}

impl DashboardMetrics {
    pub fn exporter(&self) -> MetricsExporter<'_> {
        MetricsExporter::new(self)
    }
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a, T: Serialize> {
    generated_at: &'a str,
    cost_per_unit: f64,
    schema: serde_json::Value,
    data: &'a T,
}

fn dashboard_metrics_schema() -> serde_json::Value {
    let number = json!({"type": "number"});
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "DashboardMetrics",
        "type": "object",
        "properties": {
            "cost_per_unit": number,
            "device_count": {"type": "integer"},
            "total_current_power": number,
            "total_daily_consumption": number,
            "total_monthly_consumption": number,
            "online_count": {"type": "integer"},
            "anomaly_devices": {"type": "array"},
            "phantom_load_devices": {"type": "array"},
            "efficient_count": {"type": "integer"},
            "estimated_monthly_cost": number,
            "daily_cost": number,
            "phantom_load_cost": number,
            "phantom_cost_share": number,
            "device_costs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "daily_cost": number,
                        "monthly_cost": number,
                        "percent_of_total": number,
                        "consumption_ratio": number
                    },
                    "required": ["id", "daily_cost", "monthly_cost", "percent_of_total", "consumption_ratio"]
                }
            },
            "power_by_type": {"type": "array"},
            "devices_by_location": {"type": "array"}
        },
        "required": [
            "total_current_power",
            "total_monthly_consumption",
            "estimated_monthly_cost",
            "phantom_load_cost"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metrics::compute_metrics, seed::sample_devices};

    #[test]
    fn export_writes_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = compute_metrics(&sample_devices(), 0.65);
        let path = metrics
            .exporter()
            .export(&dir.path().join("reports"))
            .unwrap();
        let raw = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schema"]["title"], "DashboardMetrics");
        assert_eq!(value["data"]["total_current_power"], 1813.0);
        assert_eq!(value["data"]["anomaly_devices"][0]["id"], "2");
        assert!(value["generated_at"].is_string());
    }
}
