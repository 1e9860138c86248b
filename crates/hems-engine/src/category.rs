//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
//! Closed set of device categories and their display assets.
//!
//! Device types stay free text on [`crate::model::Device`]; the UI resolves a
//! category (and from it an icon) through [`DeviceCategory::from_type_label`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Device type labels offered by the add-device form.
pub const DEVICE_TYPES: [&str; 6] = [
    "Eletrodoméstico",
    "Entretenimento",
    "Climatização",
    "Eletrônicos",
    "Iluminação",
    "Outros",
];

/// Locations offered by the add-device form.
pub const LOCATIONS: [&str; 8] = [
    "Sala de Estar",
    "Cozinha",
    "Quarto Principal",
    "Quarto de Hóspedes",
    "Escritório",
    "Banheiro",
    "Área Externa",
    "Geral",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceCategory {
    Appliance,
    Entertainment,
    Climate,
    Electronics,
    Lighting,
    Other,
}

impl DeviceCategory {
    /// Resolve a free-text device type. Unknown labels map to [`DeviceCategory::Other`].
    pub fn from_type_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "eletrodoméstico" | "appliance" => DeviceCategory::Appliance,
            "entretenimento" | "entertainment" => DeviceCategory::Entertainment,
            "climatização" | "climate" => DeviceCategory::Climate,
            "eletrônicos" | "electronics" => DeviceCategory::Electronics,
            "iluminação" | "lighting" => DeviceCategory::Lighting,
            _ => DeviceCategory::Other,
        }
    }

    /// Identifier of the icon asset the UI renders for this category.
    pub fn icon_asset(&self) -> &'static str {
        match self {
            DeviceCategory::Appliance => "refrigerator",
            DeviceCategory::Entertainment => "tv",
            DeviceCategory::Climate => "thermometer",
            DeviceCategory::Electronics => "smartphone",
            DeviceCategory::Lighting => "lightbulb",
            DeviceCategory::Other => "power",
        }
    }
}
