//! ---
//! hems_section: "03-logging"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Structured logging adapters and context helpers."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Context-enriched logging for the monitoring engine and CLI.

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for tests and development.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Household (dashboard instance) the event belongs to.
    pub household: Option<&'a str>,
    /// Device identifier associated with the log event.
    pub device: Option<&'a str>,
    /// Refresh tick.
    pub tick: Option<u64>,
    /// Operating mode (seed, file, simulation).
    pub mode: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a household identifier.
    pub fn with_household(mut self, household: &'a str) -> Self {
        self.household = Some(household);
        self
    }

    /// Attach a device identifier.
    pub fn with_device(mut self, device: &'a str) -> Self {
        self.device = Some(device);
        self
    }

    /// Attach a refresh tick.
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attach an operating mode descriptor.
    pub fn with_mode(mut self, mode: &'a str) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Outcome of a fleet mutation reported through [`log_fleet_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The mutation was applied.
    Applied,
    /// The mutation was refused and the collection left untouched.
    Rejected,
}

impl EventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            EventOutcome::Applied => "applied",
            EventOutcome::Rejected => "rejected",
        }
    }
}

/// Emit a standardized fleet mutation event.
///
/// Applied events log at `INFO`, rejected ones at `WARN`.
pub fn log_fleet_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: EventOutcome,
) {
    let ctx = context.cloned().unwrap_or_default();
    match outcome {
        EventOutcome::Applied => tracing::info!(
            event,
            outcome = outcome.as_str(),
            household = ctx.household.unwrap_or(""),
            device = ctx.device.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            mode = ctx.mode.unwrap_or(""),
            message = %message
        ),
        EventOutcome::Rejected => tracing::warn!(
            event,
            outcome = outcome.as_str(),
            household = ctx.household.unwrap_or(""),
            device = ctx.device.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            mode = ctx.mode.unwrap_or(""),
            message = %message
        ),
    }
}
