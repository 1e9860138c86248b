//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
//! Display formatting with the dashboard's rounding rules.
//!
//! Every helper renders non-finite input as [`NOT_AVAILABLE`].

pub const NOT_AVAILABLE: &str = "N/A";

fn fixed(value: f64, decimals: usize) -> Option<String> {
    value.is_finite().then(|| format!("{:.*}", decimals, value))
}

/// Whole watts, e.g. `1813W`.
pub fn format_watts(watts: f64) -> String {
    fixed(watts, 0)
        .map(|v| format!("{v}W"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

/// Energy with one decimal, e.g. `20.6 kWh`.
pub fn format_kwh(kwh: f64) -> String {
    fixed(kwh, 1)
        .map(|v| format!("{v} kWh"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

/// Money with two decimals behind the currency symbol, e.g. `R$ 401.70`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    fixed(amount, 2)
        .map(|v| format!("{symbol} {v}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

pub fn format_percent(percent: f64, decimals: usize) -> String {
    fixed(percent, decimals)
        .map(|v| format!("{v}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}
