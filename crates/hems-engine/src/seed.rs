//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
use chrono::Utc;

use crate::model::{Device, DeviceStatus};

struct SeedRow {
    id: &'static str,
    name: &'static str,
    device_type: &'static str,
    status: DeviceStatus,
    current_power: f64,
    average_power: f64,
    daily_consumption: f64,
    monthly_consumption: f64,
    location: &'static str,
    is_anomaly: bool,
    has_phantom_load: bool,
}

// Consumption figures are recorded values, not derived from current_power.
const SEED: [SeedRow; 6] = [
    SeedRow {
        id: "1",
        name: "Smart TV Samsung",
        device_type: "Entretenimento",
        status: DeviceStatus::Standby,
        current_power: 15.0,
        average_power: 120.0,
        daily_consumption: 2.8,
        monthly_consumption: 84.0,
        location: "Sala de Estar",
        is_anomaly: false,
        has_phantom_load: true,
    },
    SeedRow {
        id: "2",
        name: "Geladeira Frost Free",
        device_type: "Eletrodoméstico",
        status: DeviceStatus::Online,
        current_power: 180.0,
        average_power: 150.0,
        daily_consumption: 3.6,
        monthly_consumption: 108.0,
        location: "Cozinha",
        is_anomaly: true,
        has_phantom_load: false,
    },
    SeedRow {
        id: "3",
        name: "Ar Condicionado",
        device_type: "Climatização",
        status: DeviceStatus::Online,
        current_power: 1200.0,
        average_power: 1100.0,
        daily_consumption: 8.8,
        monthly_consumption: 264.0,
        location: "Quarto Principal",
        is_anomaly: false,
        has_phantom_load: false,
    },
    SeedRow {
        id: "4",
        name: "Micro-ondas",
        device_type: "Eletrodoméstico",
        status: DeviceStatus::Standby,
        current_power: 8.0,
        average_power: 45.0,
        daily_consumption: 0.3,
        monthly_consumption: 9.0,
        location: "Cozinha",
        is_anomaly: false,
        has_phantom_load: true,
    },
    SeedRow {
        id: "5",
        name: "Computador Desktop",
        device_type: "Eletrônicos",
        status: DeviceStatus::Online,
        current_power: 350.0,
        average_power: 280.0,
        daily_consumption: 4.2,
        monthly_consumption: 126.0,
        location: "Escritório",
        is_anomaly: true,
        has_phantom_load: false,
    },
    SeedRow {
        id: "6",
        name: "Lâmpadas LED",
        device_type: "Iluminação",
        status: DeviceStatus::Online,
        current_power: 60.0,
        average_power: 45.0,
        daily_consumption: 0.9,
        monthly_consumption: 27.0,
        location: "Geral",
        is_anomaly: false,
        has_phantom_load: false,
    },
];

/// The six sample devices the dashboard starts with, stamped with the current time.
pub fn sample_devices() -> Vec<Device> {
    let now = Utc::now();
    SEED.iter()
        .map(|row| Device {
            id: row.id.to_owned(),
            name: row.name.to_owned(),
            device_type: row.device_type.to_owned(),
            location: row.location.to_owned(),
            status: row.status,
            current_power: row.current_power,
            average_power: row.average_power,
            daily_consumption: row.daily_consumption,
            monthly_consumption: row.monthly_consumption,
            is_anomaly: row.is_anomaly,
            has_phantom_load: row.has_phantom_load,
            last_update: now,
        })
        .collect()
}
