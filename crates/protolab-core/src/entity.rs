//! Non-machine entities.
//!
//! Beacons, belts, pumps and wagons need no classification; each is a direct
//! reshape of a few raw fields into the summary a calculator reads.

use crate::effect::{AllowedEffects, EffectType, effects_to_disallowed_list};
use crate::footprint::{Size, entity_size};
use crate::machine::EnergyCategory;
use crate::power::{PowerValue, TICKS_PER_SECOND, power_to_rate};
use crate::prototype::{EnergySource, EntityGeometry};
use serde::{Deserialize, Serialize};

/// Items per second carried by a belt lane pair at raw speed 1.
pub const BELT_ITEMS_PER_SPEED: f64 = 480.0;

// ===========================================================================
// Beacons
// ===========================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BeaconPrototype {
    pub name: String,
    #[serde(flatten)]
    pub geometry: EntityGeometry,
    #[serde(default)]
    pub energy_source: Option<EnergySource>,
    #[serde(default)]
    pub energy_usage: Option<PowerValue>,
    #[serde(default)]
    pub distribution_effectivity: Option<f64>,
    #[serde(default)]
    pub module_slots: Option<u32>,
    #[serde(default)]
    pub supply_area_distance: Option<f64>,
    /// Effectivity multiplier by number of beacons in range.
    #[serde(default)]
    pub profile: Option<Vec<f64>>,
    #[serde(default)]
    pub allowed_effects: Option<AllowedEffects>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconSummary {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub energy_type: Option<EnergyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disallowed_effects: Option<Vec<EffectType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effectivity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Vec<f64>>,
    pub size: Size,
}

pub fn derive_beacon(proto: &BeaconPrototype) -> BeaconSummary {
    BeaconSummary {
        energy_type: EnergyCategory::of(proto.energy_source.as_ref()),
        usage: power_to_rate(proto.energy_usage.as_ref()),
        disallowed_effects: effects_to_disallowed_list(proto.allowed_effects.as_ref(), true),
        effectivity: proto.distribution_effectivity,
        modules: proto.module_slots,
        range: proto.supply_area_distance,
        profile: proto.profile.clone(),
        size: entity_size(&proto.geometry),
    }
}

// ===========================================================================
// Belts and pumps
// ===========================================================================

/// Transport belts, underground belts and splitters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BeltPrototype {
    pub name: String,
    /// Tiles moved per tick.
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeltSummary {
    /// Items per second.
    pub speed: f64,
}

pub fn derive_belt(proto: &BeltPrototype) -> BeltSummary {
    BeltSummary {
        speed: proto.speed * BELT_ITEMS_PER_SPEED,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PumpPrototype {
    pub name: String,
    /// Fluid units per tick.
    pub pumping_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PumpSummary {
    /// Fluid units per second.
    pub flow: f64,
}

pub fn derive_pump(proto: &PumpPrototype) -> PumpSummary {
    PumpSummary {
        flow: proto.pumping_speed * TICKS_PER_SECOND,
    }
}

// ===========================================================================
// Wagons
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CargoWagonPrototype {
    pub name: String,
    #[serde(flatten)]
    pub geometry: EntityGeometry,
    pub inventory_size: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FluidWagonPrototype {
    pub name: String,
    #[serde(flatten)]
    pub geometry: EntityGeometry,
    pub capacity: f64,
}

/// Capacity is item stacks for cargo wagons and fluid units for fluid wagons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WagonSummary {
    pub capacity: f64,
    pub size: Size,
}

pub fn derive_cargo_wagon(proto: &CargoWagonPrototype) -> WagonSummary {
    WagonSummary {
        capacity: f64::from(proto.inventory_size),
        size: entity_size(&proto.geometry),
    }
}

pub fn derive_fluid_wagon(proto: &FluidWagonPrototype) -> WagonSummary {
    WagonSummary {
        capacity: proto.capacity,
        size: entity_size(&proto.geometry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prototype::EnergySourceType;

    fn beacon() -> BeaconPrototype {
        serde_json::from_str(
            r#"{
                "name": "beacon",
                "collision_box": [[-1.2, -1.2], [1.2, 1.2]],
                "energy_source": {"type": "electric", "usage_priority": "secondary-input"},
                "energy_usage": "480kW",
                "distribution_effectivity": 1.5,
                "module_slots": 2,
                "supply_area_distance": 3,
                "profile": [1, 0.7071, 0.5773],
                "allowed_effects": ["consumption", "speed", "pollution"]
            }"#,
        )
        .unwrap()
    }

    // -----------------------------------------------------------------------
    // Beacons
    // -----------------------------------------------------------------------

    #[test]
    fn beacon_fields_are_copied() {
        let summary = derive_beacon(&beacon());
        assert_eq!(summary.energy_type, Some(EnergyCategory::Electric));
        assert_eq!(summary.usage, Some(480.0));
        assert_eq!(summary.effectivity, Some(1.5));
        assert_eq!(summary.modules, Some(2));
        assert_eq!(summary.range, Some(3.0));
        assert_eq!(summary.profile, Some(vec![1.0, 0.7071, 0.5773]));
        assert_eq!(summary.size, Size(3.0, 3.0));
        assert_eq!(
            summary.disallowed_effects,
            Some(vec![EffectType::Productivity, EffectType::Quality])
        );
    }

    #[test]
    fn beacon_without_declaration_disallows_productivity() {
        let mut proto = beacon();
        proto.allowed_effects = None;
        assert_eq!(
            derive_beacon(&proto).disallowed_effects,
            Some(vec![EffectType::Productivity])
        );
    }

    #[test]
    fn bare_beacon_omits_everything_but_size() {
        let proto = BeaconPrototype {
            name: "empty".to_string(),
            energy_source: Some(EnergySource::new(EnergySourceType::Void)),
            allowed_effects: Some(AllowedEffects::Many(EffectType::ALL.to_vec())),
            ..Default::default()
        };
        let json = serde_json::to_value(derive_beacon(&proto)).unwrap();
        assert_eq!(json, serde_json::json!({"size": [0.0, 0.0]}));
    }

    // -----------------------------------------------------------------------
    // Belts and pumps
    // -----------------------------------------------------------------------

    #[test]
    fn belt_speed_in_items_per_second() {
        let belt: BeltPrototype =
            serde_json::from_str(r#"{"name": "transport-belt", "speed": 0.03125}"#).unwrap();
        assert_eq!(derive_belt(&belt).speed, 15.0);
    }

    #[test]
    fn pump_flow_per_second() {
        let pump: PumpPrototype =
            serde_json::from_str(r#"{"name": "pump", "pumping_speed": 20}"#).unwrap();
        assert_eq!(derive_pump(&pump).flow, 1200.0);
    }

    // -----------------------------------------------------------------------
    // Wagons
    // -----------------------------------------------------------------------

    #[test]
    fn cargo_wagon_capacity_and_size() {
        let wagon: CargoWagonPrototype = serde_json::from_str(
            r#"{
                "name": "cargo-wagon",
                "collision_box": [[-0.6, -2.4], [0.6, 2.4]],
                "inventory_size": 40
            }"#,
        )
        .unwrap();
        let summary = derive_cargo_wagon(&wagon);
        assert_eq!(summary.capacity, 40.0);
        assert_eq!(summary.size, Size(2.0, 5.0));
    }

    #[test]
    fn fluid_wagon_off_grid_size() {
        let wagon: FluidWagonPrototype = serde_json::from_str(
            r#"{
                "name": "fluid-wagon",
                "collision_box": [[-0.5, -2.0], [0.5, 2.0]],
                "flags": ["placeable-off-grid"],
                "capacity": 50000
            }"#,
        )
        .unwrap();
        let summary = derive_fluid_wagon(&wagon);
        assert_eq!(summary.capacity, 50000.0);
        assert_eq!(summary.size, Size(1.0, 4.0));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let result = serde_json::from_str::<CargoWagonPrototype>(r#"{"name": "cargo-wagon"}"#);
        assert!(result.is_err());
    }
}
