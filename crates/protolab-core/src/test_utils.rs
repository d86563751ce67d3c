//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. Each builder
//! returns a record shaped like the vanilla prototype of that kind, carrying
//! exactly the marker fields the classifier looks for.

use crate::effect::{AllowedEffects, EffectType, EffectValues};
use crate::power::PowerValue;
use crate::prototype::*;
use std::collections::BTreeMap;

// ===========================================================================
// Building blocks
// ===========================================================================

pub fn geometry(left: f64, top: f64, right: f64, bottom: f64) -> EntityGeometry {
    EntityGeometry {
        collision_box: Some(BoundingBox::new(left, top, right, bottom)),
        ..Default::default()
    }
}

pub fn power(text: &str) -> Option<PowerValue> {
    Some(PowerValue::from(text))
}

pub fn electric() -> EnergySource {
    EnergySource::new(EnergySourceType::Electric)
}

pub fn burner() -> EnergySource {
    EnergySource::new(EnergySourceType::Burner)
}

/// An energy source emitting the given pollutants per minute.
pub fn emitting(mut source: EnergySource, emissions: &[(&str, f64)]) -> EnergySource {
    let map: BTreeMap<String, f64> = emissions
        .iter()
        .map(|(name, amount)| (name.to_string(), *amount))
        .collect();
    source.emissions_per_minute = Some(map);
    source
}

pub fn all_effects() -> Option<AllowedEffects> {
    Some(AllowedEffects::Many(EffectType::ALL.to_vec()))
}

pub fn receiver_with(values: EffectValues) -> Option<EffectReceiver> {
    Some(EffectReceiver {
        base_effect: Some(values),
    })
}

// ===========================================================================
// Machines, one per kind
// ===========================================================================

pub fn assembler() -> MachinePrototype {
    MachinePrototype {
        name: "assembling-machine-2".to_string(),
        geometry: geometry(-1.2, -1.2, 1.2, 1.2),
        energy_source: Some(emitting(electric(), &[("pollution", 3.0)])),
        energy_usage: power("150kW"),
        crafting_speed: Some(0.75),
        module_slots: Some(2),
        allowed_effects: all_effects(),
        ..Default::default()
    }
}

pub fn furnace() -> MachinePrototype {
    MachinePrototype {
        name: "stone-furnace".to_string(),
        geometry: geometry(-0.7, -0.7, 0.7, 0.7),
        energy_source: Some(emitting(burner(), &[("pollution", 2.0)])),
        energy_usage: power("90kW"),
        crafting_speed: Some(1.0),
        source_inventory_size: Some(1),
        allowed_effects: all_effects(),
        ..Default::default()
    }
}

pub fn rocket_silo() -> MachinePrototype {
    MachinePrototype {
        name: "rocket-silo".to_string(),
        geometry: geometry(-4.4, -4.4, 4.4, 4.4),
        energy_source: Some(electric()),
        energy_usage: power("250kW"),
        crafting_speed: Some(1.0),
        module_slots: Some(4),
        allowed_effects: all_effects(),
        rocket_entity: Some("rocket-silo-rocket".to_string()),
        rocket_parts_required: Some(50),
        light_blinking_speed: Some(1.0 / 180.0),
        door_opening_speed: Some(1.0 / 255.0),
        rocket_rising_delay: Some(30.0),
        launch_wait_time: Some(120.0),
        ..Default::default()
    }
}

pub fn boiler() -> MachinePrototype {
    MachinePrototype {
        name: "boiler".to_string(),
        geometry: geometry(-1.29, -0.79, 1.29, 0.79),
        energy_source: Some(emitting(burner(), &[("pollution", 30.0)])),
        energy_consumption: power("1.8MW"),
        target_temperature: Some(165.0),
        ..Default::default()
    }
}

pub fn offshore_pump() -> MachinePrototype {
    MachinePrototype {
        name: "offshore-pump".to_string(),
        geometry: geometry(-0.6, -1.05, 0.6, 0.3),
        energy_source: Some(electric()),
        pumping_speed: Some(20.0),
        ..Default::default()
    }
}

pub fn reactor() -> MachinePrototype {
    MachinePrototype {
        name: "nuclear-reactor".to_string(),
        geometry: geometry(-2.2, -2.2, 2.2, 2.2),
        energy_source: Some(burner()),
        consumption: power("40MW"),
        ..Default::default()
    }
}

pub fn asteroid_collector() -> MachinePrototype {
    MachinePrototype {
        name: "asteroid-collector".to_string(),
        geometry: geometry(-1.4, -1.4, 1.4, 1.4),
        energy_source: Some(electric()),
        energy_usage: power("800kW"),
        collection_radius: Some(7.0),
        ..Default::default()
    }
}

pub fn lab() -> MachinePrototype {
    MachinePrototype {
        name: "lab".to_string(),
        geometry: geometry(-1.2, -1.2, 1.2, 1.2),
        energy_source: Some(electric()),
        energy_usage: power("60kW"),
        researching_speed: Some(1.0),
        inputs: Some(vec![
            "automation-science-pack".to_string(),
            "logistic-science-pack".to_string(),
        ]),
        module_slots: Some(2),
        allowed_effects: all_effects(),
        ..Default::default()
    }
}

pub fn mining_drill() -> MachinePrototype {
    MachinePrototype {
        name: "electric-mining-drill".to_string(),
        geometry: geometry(-1.4, -1.4, 1.4, 1.4),
        energy_source: Some(emitting(electric(), &[("pollution", 10.0)])),
        energy_usage: power("90kW"),
        mining_speed: Some(0.5),
        module_slots: Some(3),
        allowed_effects: all_effects(),
        ..Default::default()
    }
}

/// A machine with no kind marker.
pub fn generator() -> MachinePrototype {
    MachinePrototype {
        name: "burner-generator".to_string(),
        geometry: geometry(-1.2, -2.2, 1.2, 2.2),
        energy_source: Some(burner()),
        energy_usage: power("5MW"),
        ..Default::default()
    }
}

/// Every builder above, in kind order.
pub fn all_machines() -> Vec<MachinePrototype> {
    vec![
        boiler(),
        offshore_pump(),
        reactor(),
        asteroid_collector(),
        assembler(),
        rocket_silo(),
        furnace(),
        lab(),
        mining_drill(),
        generator(),
    ]
}

// ===========================================================================
// Rockets
// ===========================================================================

pub fn rocket() -> RocketPrototype {
    RocketPrototype {
        name: "rocket-silo-rocket".to_string(),
        rising_speed: 1.0 / 720.0,
        engine_starting_speed: 1.0 / 330.0,
        flying_speed: 1.0 / 2000.0,
        flying_acceleration: 0.01,
    }
}
