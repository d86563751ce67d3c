//! Dump settings: which raw categories feed which derivation.
//!
//! Read from an optional `settings.{ron,toml,json}` beside the dump. Every
//! field has a default matching the vanilla category names, so a partial
//! file only overrides what it names.

use serde::Deserialize;
use std::path::Path;

use crate::loader::{DataLoadError, deserialize_file, find_data_file};

/// Base name of the optional settings file.
pub const SETTINGS_BASE_NAME: &str = "settings";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DumpSettings {
    /// Categories whose records are production machines.
    #[serde(default = "default_machine_categories")]
    pub machine_categories: Vec<String>,
    /// Category holding the rockets that silos reference.
    #[serde(default = "default_rocket_category")]
    pub rocket_category: String,
    #[serde(default = "default_beacon_category")]
    pub beacon_category: String,
    #[serde(default = "default_belt_categories")]
    pub belt_categories: Vec<String>,
    #[serde(default = "default_cargo_wagon_category")]
    pub cargo_wagon_category: String,
    #[serde(default = "default_fluid_wagon_category")]
    pub fluid_wagon_category: String,
    #[serde(default = "default_pump_category")]
    pub pump_category: String,
    /// Keep records flagged `hidden`.
    #[serde(default)]
    pub include_hidden: bool,
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn default_machine_categories() -> Vec<String> {
    strings(&[
        "assembling-machine",
        "furnace",
        "rocket-silo",
        "boiler",
        "reactor",
        "offshore-pump",
        "mining-drill",
        "lab",
        "asteroid-collector",
        "burner-generator",
        "generator",
        "agricultural-tower",
    ])
}

fn default_rocket_category() -> String {
    "rocket-silo-rocket".to_string()
}

fn default_beacon_category() -> String {
    "beacon".to_string()
}

fn default_belt_categories() -> Vec<String> {
    strings(&["transport-belt", "underground-belt", "splitter"])
}

fn default_cargo_wagon_category() -> String {
    "cargo-wagon".to_string()
}

fn default_fluid_wagon_category() -> String {
    "fluid-wagon".to_string()
}

fn default_pump_category() -> String {
    "pump".to_string()
}

impl Default for DumpSettings {
    fn default() -> Self {
        Self {
            machine_categories: default_machine_categories(),
            rocket_category: default_rocket_category(),
            beacon_category: default_beacon_category(),
            belt_categories: default_belt_categories(),
            cargo_wagon_category: default_cargo_wagon_category(),
            fluid_wagon_category: default_fluid_wagon_category(),
            pump_category: default_pump_category(),
            include_hidden: false,
        }
    }
}

/// Load settings from `dir`, falling back to defaults when no file exists.
pub fn load_settings(dir: &Path) -> Result<DumpSettings, DataLoadError> {
    match find_data_file(dir, SETTINGS_BASE_NAME)? {
        Some(path) => deserialize_file(&path),
        None => Ok(DumpSettings::default()),
    }
}
