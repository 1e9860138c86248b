//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
pub mod category;
pub mod classify;
pub mod errors;
pub mod filter;
pub mod fleet;
pub mod format;
pub mod io;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod reports;
pub mod seed;
pub mod simulate;

pub use category::{DeviceCategory, DEVICE_TYPES, LOCATIONS};
pub use errors::{EngineError, Result, ValidationError};
pub use filter::{filter_devices, DeviceFilter};
pub use fleet::DeviceFleet;
pub use metrics::{compute_metrics, DashboardMetrics, DeviceCost, LocationShare, TypeShare};
pub use model::{Device, DeviceField, DeviceStatus, NewDevice};
pub use notify::{Notification, NotificationCenter, NotificationKind};
pub use reports::MetricsExporter;
pub use seed::sample_devices;
pub use simulate::{RefreshReport, RefreshSimulator};
