//! Catalog assembly: decode a raw dump, derive every machine, reshape the
//! remaining entity categories.

use protolab_core::entity::{
    BeaconSummary, BeltSummary, PumpSummary, WagonSummary, derive_beacon, derive_belt,
    derive_cargo_wagon, derive_fluid_wagon, derive_pump,
};
use protolab_core::{
    LaunchTiming, MachineKind, MachinePrototype, MachineSummary, RocketPrototype, derive_machine,
    launch_timing,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::loader::{
    DataLoadError, check_duplicate, deserialize_file, require_data_file, resolve_name,
};
use crate::settings::{DumpSettings, load_settings};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Base name of the required dump file.
pub const DUMP_BASE_NAME: &str = "data-raw";

/// A raw dump: category, then prototype name, then the untyped record.
pub type RawDump = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

// ===========================================================================
// Output
// ===========================================================================

/// A derived summary tagged with the prototype it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<T> {
    pub name: String,
    #[serde(flatten)]
    pub summary: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineEntry {
    pub name: String,
    pub category: String,
    #[serde(flatten)]
    pub summary: MachineSummary,
    /// Present for rocket silos only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silo: Option<LaunchTiming>,
}

/// Every derived entity of one dump, each section sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub machines: Vec<MachineEntry>,
    pub beacons: Vec<Entry<BeaconSummary>>,
    pub belts: Vec<Entry<BeltSummary>>,
    pub pumps: Vec<Entry<PumpSummary>>,
    pub cargo_wagons: Vec<Entry<WagonSummary>>,
    pub fluid_wagons: Vec<Entry<WagonSummary>>,
}

impl Catalog {
    pub fn machine(&self, name: &str) -> Option<&MachineEntry> {
        self.machines.iter().find(|entry| entry.name == name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ===========================================================================
// Decoding
// ===========================================================================

fn is_hidden(record: &serde_json::Value) -> bool {
    record
        .get("hidden")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

/// Decode every record of one category, skipping hidden ones unless asked.
fn decode_category<T: DeserializeOwned>(
    dump: &RawDump,
    category: &str,
    include_hidden: bool,
) -> Result<Vec<(String, T)>, DataLoadError> {
    let Some(records) = dump.get(category) else {
        return Ok(Vec::new());
    };

    let mut decoded = Vec::with_capacity(records.len());
    for (name, record) in records {
        if !include_hidden && is_hidden(record) {
            debug!(target: "protolab::catalog", category, name = %name, "skipping hidden prototype");
            continue;
        }
        let value = T::deserialize(record).map_err(|e| DataLoadError::InvalidPrototype {
            category: category.to_string(),
            name: name.clone(),
            detail: e.to_string(),
        })?;
        decoded.push((name.clone(), value));
    }
    Ok(decoded)
}

fn decode_entries<P, S>(
    dump: &RawDump,
    categories: &[String],
    include_hidden: bool,
    derive: impl Fn(&P) -> S,
) -> Result<Vec<Entry<S>>, DataLoadError>
where
    P: DeserializeOwned,
{
    let mut entries = Vec::new();
    for category in categories {
        for (name, proto) in decode_category::<P>(dump, category, include_hidden)? {
            entries.push(Entry {
                name,
                summary: derive(&proto),
            });
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

// ===========================================================================
// Machines
// ===========================================================================

struct MachineRecord {
    category: String,
    proto: MachinePrototype,
}

fn collect_machines(
    dump: &RawDump,
    settings: &DumpSettings,
    source: &Path,
) -> Result<BTreeMap<String, MachineRecord>, DataLoadError> {
    let mut machines = BTreeMap::new();
    for category in &settings.machine_categories {
        for (name, proto) in
            decode_category::<MachinePrototype>(dump, category, settings.include_hidden)?
        {
            check_duplicate(&machines, &name, source)?;
            machines.insert(name, MachineRecord {
                category: category.clone(),
                proto,
            });
        }
    }
    Ok(machines)
}

fn derive_entry(
    name: &str,
    record: &MachineRecord,
    rockets: &BTreeMap<String, RocketPrototype>,
    source: &Path,
) -> Result<MachineEntry, DataLoadError> {
    let summary = derive_machine(&record.proto);
    let silo = match (summary.kind, record.proto.rocket_entity.as_deref()) {
        (MachineKind::RocketSilo, Some(rocket_name)) => {
            let rocket = resolve_name(rockets, rocket_name, source, "rocket")?;
            Some(launch_timing(&record.proto, rocket)?)
        }
        _ => None,
    };
    Ok(MachineEntry {
        name: name.to_string(),
        category: record.category.clone(),
        summary,
        silo,
    })
}

#[cfg(not(feature = "parallel"))]
fn derive_all(
    machines: &BTreeMap<String, MachineRecord>,
    rockets: &BTreeMap<String, RocketPrototype>,
    source: &Path,
) -> Result<Vec<MachineEntry>, DataLoadError> {
    machines
        .iter()
        .map(|(name, record)| derive_entry(name, record, rockets, source))
        .collect()
}

#[cfg(feature = "parallel")]
fn derive_all(
    machines: &BTreeMap<String, MachineRecord>,
    rockets: &BTreeMap<String, RocketPrototype>,
    source: &Path,
) -> Result<Vec<MachineEntry>, DataLoadError> {
    let records: Vec<(&String, &MachineRecord)> = machines.iter().collect();
    records
        .par_iter()
        .map(|(name, record)| derive_entry(name, record, rockets, source))
        .collect()
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// Build a catalog from an already-decoded dump.
///
/// `source` names the dump file in error messages.
pub fn build_catalog(
    dump: &RawDump,
    settings: &DumpSettings,
    source: &Path,
) -> Result<Catalog, DataLoadError> {
    let machines = collect_machines(dump, settings, source)?;
    let rockets: BTreeMap<String, RocketPrototype> =
        decode_category::<RocketPrototype>(dump, &settings.rocket_category, true)?
            .into_iter()
            .collect();

    let catalog = Catalog {
        machines: derive_all(&machines, &rockets, source)?,
        beacons: decode_entries(
            dump,
            std::slice::from_ref(&settings.beacon_category),
            settings.include_hidden,
            derive_beacon,
        )?,
        belts: decode_entries(
            dump,
            &settings.belt_categories,
            settings.include_hidden,
            derive_belt,
        )?,
        pumps: decode_entries(
            dump,
            std::slice::from_ref(&settings.pump_category),
            settings.include_hidden,
            derive_pump,
        )?,
        cargo_wagons: decode_entries(
            dump,
            std::slice::from_ref(&settings.cargo_wagon_category),
            settings.include_hidden,
            derive_cargo_wagon,
        )?,
        fluid_wagons: decode_entries(
            dump,
            std::slice::from_ref(&settings.fluid_wagon_category),
            settings.include_hidden,
            derive_fluid_wagon,
        )?,
    };

    info!(
        target: "protolab::catalog",
        source = %source.display(),
        machines = catalog.machines.len(),
        beacons = catalog.beacons.len(),
        belts = catalog.belts.len(),
        pumps = catalog.pumps.len(),
        cargo_wagons = catalog.cargo_wagons.len(),
        fluid_wagons = catalog.fluid_wagons.len(),
        "built catalog"
    );
    Ok(catalog)
}

/// Load settings and the dump from `dir` and build its catalog.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let settings = load_settings(dir)?;
    let path = require_data_file(dir, DUMP_BASE_NAME)?;
    let dump: RawDump = deserialize_file(&path)?;
    build_catalog(&dump, &settings, &path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use protolab_core::LaunchError;
    use serde_json::json;

    fn dump(value: serde_json::Value) -> RawDump {
        serde_json::from_value(value).unwrap()
    }

    fn build(value: serde_json::Value) -> Result<Catalog, DataLoadError> {
        build_catalog(&dump(value), &DumpSettings::default(), Path::new("data-raw.json"))
    }

    fn vanilla_silo() -> serde_json::Value {
        json!({
            "name": "rocket-silo",
            "collision_box": [[-4.4, -4.4], [4.4, 4.4]],
            "crafting_speed": 1,
            "energy_usage": "250kW",
            "energy_source": {"type": "electric"},
            "module_slots": 4,
            "rocket_entity": "rocket-silo-rocket",
            "rocket_parts_required": 50,
            "light_blinking_speed": 1.0 / 180.0,
            "door_opening_speed": 1.0 / 255.0,
            "rocket_rising_delay": 30,
            "launch_wait_time": 120
        })
    }

    fn vanilla_rocket() -> serde_json::Value {
        json!({
            "name": "rocket-silo-rocket",
            "rising_speed": 1.0 / 720.0,
            "engine_starting_speed": 1.0 / 330.0,
            "flying_speed": 1.0 / 2000.0,
            "flying_acceleration": 0.01
        })
    }

    // -----------------------------------------------------------------------
    // Machines
    // -----------------------------------------------------------------------

    #[test]
    fn machines_sorted_across_categories() {
        let catalog = build(json!({
            "furnace": {
                "stone-furnace": {
                    "name": "stone-furnace",
                    "crafting_speed": 1,
                    "source_inventory_size": 1,
                    "energy_usage": "90kW",
                    "energy_source": {"type": "burner"}
                }
            },
            "assembling-machine": {
                "assembling-machine-1": {
                    "name": "assembling-machine-1",
                    "crafting_speed": 0.5,
                    "energy_usage": "75kW",
                    "energy_source": {"type": "electric"}
                }
            }
        }))
        .unwrap();

        let names: Vec<&str> = catalog.machines.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["assembling-machine-1", "stone-furnace"]);
        assert_eq!(catalog.machines[1].category, "furnace");
        assert_eq!(catalog.machines[1].summary.kind, MachineKind::Furnace);
        assert_eq!(catalog.machines[0].summary.drain, Some(2.5));
        assert!(catalog.machines.iter().all(|m| m.silo.is_none()));
    }

    #[test]
    fn unconfigured_categories_are_ignored() {
        let catalog = build(json!({
            "inserter": {"inserter": {"name": "inserter"}}
        }))
        .unwrap();
        assert_eq!(catalog, Catalog::default());
    }

    #[test]
    fn hidden_machines_are_skipped() {
        let raw = json!({
            "assembling-machine": {
                "secret": {"name": "secret", "crafting_speed": 1, "hidden": true},
                "visible": {"name": "visible", "crafting_speed": 1}
            }
        });
        let catalog = build(raw.clone()).unwrap();
        assert_eq!(catalog.machines.len(), 1);
        assert!(catalog.machine("secret").is_none());

        let settings = DumpSettings {
            include_hidden: true,
            ..Default::default()
        };
        let catalog = build_catalog(&dump(raw), &settings, Path::new("data-raw.json")).unwrap();
        assert!(catalog.machine("secret").is_some());
    }

    #[test]
    fn duplicate_machine_names_across_categories() {
        let result = build(json!({
            "assembling-machine": {"twin": {"name": "twin", "crafting_speed": 1}},
            "furnace": {"twin": {"name": "twin", "crafting_speed": 1, "source_inventory_size": 1}}
        }));
        assert!(matches!(
            result,
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "twin"
        ));
    }

    #[test]
    fn invalid_record_names_category_and_prototype() {
        let result = build(json!({
            "lab": {"lab": {"name": "lab", "researching_speed": "fast"}}
        }));
        match result {
            Err(DataLoadError::InvalidPrototype { category, name, .. }) => {
                assert_eq!(category, "lab");
                assert_eq!(name, "lab");
            }
            other => panic!("expected InvalidPrototype, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Rocket silos
    // -----------------------------------------------------------------------

    #[test]
    fn silo_gets_launch_timing() {
        let catalog = build(json!({
            "rocket-silo": {"rocket-silo": vanilla_silo()},
            "rocket-silo-rocket": {"rocket-silo-rocket": vanilla_rocket()}
        }))
        .unwrap();

        let silo = catalog.machine("rocket-silo").unwrap();
        assert_eq!(silo.summary.kind, MachineKind::RocketSilo);
        assert_eq!(silo.silo, Some(LaunchTiming {
            parts: 50,
            launch: 2333,
        }));
    }

    #[test]
    fn hidden_rocket_still_resolves() {
        let mut rocket = vanilla_rocket();
        rocket["hidden"] = json!(true);
        let catalog = build(json!({
            "rocket-silo": {"rocket-silo": vanilla_silo()},
            "rocket-silo-rocket": {"rocket-silo-rocket": rocket}
        }))
        .unwrap();
        assert!(catalog.machine("rocket-silo").unwrap().silo.is_some());
    }

    #[test]
    fn missing_rocket_is_unresolved() {
        let result = build(json!({
            "rocket-silo": {"rocket-silo": vanilla_silo()}
        }));
        assert!(matches!(
            result,
            Err(DataLoadError::UnresolvedRef {
                expected_kind: "rocket",
                ..
            })
        ));
    }

    #[test]
    fn silo_missing_speed_is_a_launch_error() {
        let mut silo = vanilla_silo();
        silo.as_object_mut().unwrap().remove("door_opening_speed");
        let result = build(json!({
            "rocket-silo": {"rocket-silo": silo},
            "rocket-silo-rocket": {"rocket-silo-rocket": vanilla_rocket()}
        }));
        assert!(matches!(result, Err(DataLoadError::Launch(_))));
    }

    #[test]
    fn stalled_rocket_is_a_launch_error() {
        let mut rocket = vanilla_rocket();
        rocket["rising_speed"] = json!(0);
        let result = build(json!({
            "rocket-silo": {"rocket-silo": vanilla_silo()},
            "rocket-silo-rocket": {"rocket-silo-rocket": rocket}
        }));
        assert!(matches!(
            result,
            Err(DataLoadError::Launch(LaunchError::InvalidField {
                field: "rising_speed",
                ..
            }))
        ));
    }

    // -----------------------------------------------------------------------
    // Other entities
    // -----------------------------------------------------------------------

    #[test]
    fn reshaped_entities() {
        let catalog = build(json!({
            "beacon": {
                "beacon": {
                    "name": "beacon",
                    "collision_box": [[-1.2, -1.2], [1.2, 1.2]],
                    "energy_source": {"type": "electric"},
                    "energy_usage": "480kW",
                    "distribution_effectivity": 1.5,
                    "module_slots": 2,
                    "supply_area_distance": 3
                }
            },
            "transport-belt": {"fast-transport-belt": {"name": "fast-transport-belt", "speed": 0.0625}},
            "splitter": {"splitter": {"name": "splitter", "speed": 0.03125}},
            "pump": {"pump": {"name": "pump", "pumping_speed": 20}},
            "cargo-wagon": {
                "cargo-wagon": {
                    "name": "cargo-wagon",
                    "collision_box": [[-0.6, -2.4], [0.6, 2.4]],
                    "inventory_size": 40
                }
            },
            "fluid-wagon": {
                "fluid-wagon": {
                    "name": "fluid-wagon",
                    "collision_box": [[-0.6, -2.4], [0.6, 2.4]],
                    "capacity": 100000
                }
            }
        }))
        .unwrap();

        assert_eq!(catalog.beacons[0].summary.effectivity, Some(1.5));
        let belts: Vec<(&str, f64)> = catalog
            .belts
            .iter()
            .map(|b| (b.name.as_str(), b.summary.speed))
            .collect();
        assert_eq!(belts, [("fast-transport-belt", 30.0), ("splitter", 15.0)]);
        assert_eq!(catalog.pumps[0].summary.flow, 1200.0);
        assert_eq!(catalog.cargo_wagons[0].summary.capacity, 40.0);
        assert_eq!(catalog.fluid_wagons[0].summary.capacity, 100_000.0);
    }

    #[test]
    fn catalog_json_shape() {
        let catalog = build(json!({
            "assembling-machine": {
                "assembling-machine-2": {
                    "name": "assembling-machine-2",
                    "collision_box": [[-1.2, -1.2], [1.2, 1.2]],
                    "crafting_speed": 0.75,
                    "energy_usage": "150kW",
                    "energy_source": {"type": "electric", "emissions_per_minute": {"pollution": 3}},
                    "module_slots": 2
                }
            },
            "pump": {"pump": {"name": "pump", "pumping_speed": 20}}
        }))
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "machines": [{
                    "name": "assembling-machine-2",
                    "category": "assembling-machine",
                    "type": "Electric",
                    "usage": 150.0,
                    "drain": 5.0,
                    "pollution": 3.0,
                    "speed": 0.75,
                    "modules": 2,
                    "size": [3.0, 3.0]
                }],
                "beacons": [],
                "belts": [],
                "pumps": [{"name": "pump", "flow": 1200.0}],
                "cargoWagons": [],
                "fluidWagons": []
            })
        );
    }
}
