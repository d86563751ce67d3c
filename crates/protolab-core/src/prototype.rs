//! Serde structs for raw prototype records.
//!
//! Records come from a game data dump whose shape varies by entity kind. The
//! structs here accept the union of the fields the deriver reads and ignore
//! everything else. Geometry is normalized while deserializing: corners given
//! as `[x, y]` pairs or `{x, y}` objects, boxes given as corner pairs or
//! `{left_top, right_bottom}` objects all land in one [`BoundingBox`].

use crate::effect::{AllowedEffects, EffectValues};
use crate::power::PowerValue;
use serde::Deserialize;
use std::collections::BTreeMap;

// ===========================================================================
// Geometry
// ===========================================================================

/// Flag marking an entity that is not aligned to the tile grid.
pub const OFF_GRID_FLAG: &str = "placeable-off-grid";

/// A 2D point in tile units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "RawPoint")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Pair(f64, f64),
    Object { x: f64, y: f64 },
}

impl From<RawPoint> for Point {
    fn from(raw: RawPoint) -> Self {
        match raw {
            RawPoint::Pair(x, y) | RawPoint::Object { x, y } => Point { x, y },
        }
    }
}

/// An axis-aligned box relative to the entity origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "RawBoundingBox")]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_corners(left_top: Point, right_bottom: Point) -> Self {
        Self::new(left_top.x, left_top.y, right_bottom.x, right_bottom.y)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBoundingBox {
    Corners(Point, Point),
    /// Corner pair followed by an orientation, which the footprint ignores.
    Oriented(Point, Point, f64),
    Object {
        left_top: Point,
        right_bottom: Point,
    },
}

impl From<RawBoundingBox> for BoundingBox {
    fn from(raw: RawBoundingBox) -> Self {
        match raw {
            RawBoundingBox::Corners(left_top, right_bottom)
            | RawBoundingBox::Oriented(left_top, right_bottom, _)
            | RawBoundingBox::Object {
                left_top,
                right_bottom,
            } => BoundingBox::from_corners(left_top, right_bottom),
        }
    }
}

/// Geometry fields shared by every placeable entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntityGeometry {
    #[serde(default)]
    pub collision_box: Option<BoundingBox>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub tile_width: Option<u32>,
    #[serde(default)]
    pub tile_height: Option<u32>,
}

impl EntityGeometry {
    pub fn is_off_grid(&self) -> bool {
        self.flags.iter().any(|flag| flag == OFF_GRID_FLAG)
    }
}

// ===========================================================================
// Energy
// ===========================================================================

/// How a machine is powered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySourceType {
    Electric,
    Burner,
    Fluid,
    Heat,
    Void,
    #[serde(other)]
    Unknown,
}

/// The `energy_source` sub-record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnergySource {
    #[serde(rename = "type")]
    pub kind: EnergySourceType,
    #[serde(default)]
    pub drain: Option<PowerValue>,
    /// Emissions keyed by pollutant name.
    #[serde(default)]
    pub emissions_per_minute: Option<BTreeMap<String, f64>>,
}

impl EnergySource {
    pub fn new(kind: EnergySourceType) -> Self {
        Self {
            kind,
            drain: None,
            emissions_per_minute: None,
        }
    }
}

/// The `effect_receiver` sub-record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EffectReceiver {
    #[serde(default)]
    pub base_effect: Option<EffectValues>,
}

// ===========================================================================
// Machines
// ===========================================================================

/// A raw production-machine record.
///
/// Which fields are populated depends on the machine kind; see
/// [`crate::kind::classify`] for the markers that tell the kinds apart.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MachinePrototype {
    pub name: String,
    #[serde(flatten)]
    pub geometry: EntityGeometry,

    // -- Energy --
    #[serde(default)]
    pub energy_source: Option<EnergySource>,
    #[serde(default)]
    pub energy_usage: Option<PowerValue>,
    /// Boilers.
    #[serde(default)]
    pub energy_consumption: Option<PowerValue>,
    /// Reactors.
    #[serde(default)]
    pub consumption: Option<PowerValue>,

    // -- Speed --
    #[serde(default)]
    pub crafting_speed: Option<f64>,
    #[serde(default)]
    pub researching_speed: Option<f64>,
    #[serde(default)]
    pub mining_speed: Option<f64>,
    #[serde(default)]
    pub pumping_speed: Option<f64>,

    // -- Kind markers --
    #[serde(default)]
    pub target_temperature: Option<f64>,
    #[serde(default)]
    pub collection_radius: Option<f64>,
    #[serde(default)]
    pub source_inventory_size: Option<u32>,
    /// Science packs a lab accepts.
    #[serde(default)]
    pub inputs: Option<Vec<String>>,

    // -- Modules --
    #[serde(default)]
    pub module_slots: Option<u32>,
    #[serde(default)]
    pub allowed_effects: Option<AllowedEffects>,
    #[serde(default)]
    pub effect_receiver: Option<EffectReceiver>,

    // -- Rocket silo --
    /// Name of the companion rocket record.
    #[serde(default)]
    pub rocket_entity: Option<String>,
    #[serde(default)]
    pub rocket_parts_required: Option<u32>,
    #[serde(default)]
    pub light_blinking_speed: Option<f64>,
    #[serde(default)]
    pub door_opening_speed: Option<f64>,
    #[serde(default)]
    pub rocket_rising_delay: Option<f64>,
    #[serde(default)]
    pub launch_wait_time: Option<f64>,
}

/// The companion rocket record a silo launches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RocketPrototype {
    pub name: String,
    pub rising_speed: f64,
    pub engine_starting_speed: f64,
    pub flying_speed: f64,
    pub flying_acceleration: f64,
}
