//! ---
//! hems_section: "01-core-functionality"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Shared primitives and utilities for the monitoring runtime."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
//! Core shared primitives for the HEMS workspace.
//! This crate exposes configuration loading and tracing setup consumed by the
//! engine and the operator CLI.

pub mod config;
pub mod logging;

pub use config::{
    AnomalyPolicy, AppConfig, DetectionConfig, LoadedAppConfig, LoggingConfig, NotificationConfig,
    PricingConfig, SimulationConfig,
};
pub use logging::{init_tracing, LogFormat};
