//! ---
//! hems_section: "05-operator-interfaces"
//! hems_subsection: "binary"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Operator CLI for inspecting and simulating the household dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
//! Plain-text rendering of engine output.

use hems_engine::{
    format::{format_currency, format_kwh, format_percent, format_watts},
    DashboardMetrics, Device, Notification,
};

pub fn summary(metrics: &DashboardMetrics, currency: &str) {
    println!("Current power:    {}", format_watts(metrics.total_current_power));
    println!(
        "Devices online:   {}/{}",
        metrics.online_count, metrics.device_count
    );
    println!("Daily usage:      {}", format_kwh(metrics.total_daily_consumption));
    println!("Monthly usage:    {}", format_kwh(metrics.total_monthly_consumption));
    println!(
        "Estimated cost:   {}",
        format_currency(metrics.estimated_monthly_cost, currency)
    );
    println!("Daily cost:       {}", format_currency(metrics.daily_cost, currency));
    println!(
        "Phantom load:     {} ({} of bill)",
        format_currency(metrics.phantom_load_cost, currency),
        format_percent(metrics.phantom_cost_share, 1)
    );
    println!(
        "Alerts:           {} ({} anomalies, {} phantom loads, {} efficient)",
        metrics.alert_count(),
        metrics.anomaly_devices.len(),
        metrics.phantom_load_devices.len(),
        metrics.efficient_count
    );
    for device in &metrics.anomaly_devices {
        println!(
            "  ! {} in {} at {} of baseline",
            device.name,
            device.location,
            format_percent(device.consumption_ratio(), 0)
        );
    }
    for device in &metrics.phantom_load_devices {
        println!(
            "  ~ {} in {} draws {} on standby",
            device.name,
            device.location,
            format_watts(device.current_power)
        );
    }
}

pub fn device_table(devices: &[&Device], cost_per_unit: f64, currency: &str) {
    if devices.is_empty() {
        println!("No devices match.");
        return;
    }
    for device in devices {
        println!(
            "{:>4}  {:<24} {:<18} {:<16} {:<8} {:>7} {:>6} {:>12}",
            device.id,
            device.name,
            device.location,
            device.device_type,
            device.status,
            format_watts(device.current_power),
            format_percent(device.consumption_ratio(), 0),
            format_currency(device.monthly_cost(cost_per_unit), currency)
        );
    }
}

pub fn cost_breakdown(metrics: &DashboardMetrics, currency: &str) {
    for cost in metrics.cost_breakdown() {
        println!(
            "{:<24} {:>10} {:>10}/day {:>12} {:>6}",
            cost.name,
            format_kwh(cost.monthly_consumption),
            format_currency(cost.daily_cost, currency),
            format_currency(cost.monthly_cost, currency),
            format_percent(cost.percent_of_total, 1)
        );
    }
    println!(
        "Phantom load: {} ({} of bill)",
        format_currency(metrics.phantom_load_cost, currency),
        format_percent(metrics.phantom_cost_share, 1)
    );
    println!(
        "Total: {}",
        format_currency(metrics.estimated_monthly_cost, currency)
    );
}

pub fn device_detail(device: &Device, cost_per_unit: f64, currency: &str) {
    println!("Added device {}: {}", device.id, device.name);
    println!("  type:     {} ({})", device.device_type, device.category().icon_asset());
    println!("  location: {}", device.location);
    println!("  status:   {}", device.status);
    println!("  power:    {}", format_watts(device.current_power));
    println!("  daily:    {}", format_kwh(device.daily_consumption));
    println!(
        "  daily:    {}/day",
        format_currency(device.daily_cost(cost_per_unit), currency)
    );
    println!(
        "  monthly:  {} ({})",
        format_kwh(device.monthly_consumption),
        format_currency(device.monthly_cost(cost_per_unit), currency)
    );
    if device.has_phantom_load {
        println!("  phantom load detected");
    }
}

pub fn notifications(visible: &[Notification]) {
    for notification in visible {
        match &notification.description {
            Some(description) => {
                println!("[{}] {}: {}", notification.kind, notification.title, description)
            }
            None => println!("[{}] {}", notification.kind, notification.title),
        }
    }
}
