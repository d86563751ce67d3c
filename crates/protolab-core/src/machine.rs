//! Per-attribute machine derivation.
//!
//! Each attribute has its own function taking the raw record and its
//! [`MachineKind`]. A function returns `None` exactly when the attribute does
//! not apply to that kind (or the raw field it reads is absent); zero is a
//! value, never a stand-in for absent.
//!
//! | attribute            | absent for                                        |
//! |----------------------|---------------------------------------------------|
//! | energy type          | OffshorePump                                      |
//! | usage                | OffshorePump, AsteroidCollector                   |
//! | drain                | OffshorePump, non-electric sources                |
//! | pollution            | OffshorePump                                      |
//! | modules, disallowed effects, base effect | Boiler, OffshorePump, Reactor, AsteroidCollector |

use crate::effect::{BaseEffect, EffectType, effects_to_disallowed_list};
use crate::footprint::{Size, entity_size};
use crate::kind::{MachineKind, classify};
use crate::power::power_to_rate;
use crate::prototype::{EnergySource, EnergySourceType, MachinePrototype};
use serde::Serialize;

/// Idle drain estimate when none is declared: usage divided by this ratio.
pub const DRAIN_USAGE_RATIO: f64 = 30.0;

/// The only pollutant modelled.
pub const POLLUTANT: &str = "pollution";

/// Energy category of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnergyCategory {
    Burner,
    Electric,
}

impl EnergyCategory {
    /// Burner and fluid sources burn fuel; electric sources draw from the grid.
    pub fn of(source: Option<&EnergySource>) -> Option<Self> {
        match source?.kind {
            EnergySourceType::Burner | EnergySourceType::Fluid => Some(EnergyCategory::Burner),
            EnergySourceType::Electric => Some(EnergyCategory::Electric),
            _ => None,
        }
    }
}

// ===========================================================================
// Attribute derivers
// ===========================================================================

pub fn energy_type(proto: &MachinePrototype, kind: MachineKind) -> Option<EnergyCategory> {
    if kind == MachineKind::OffshorePump {
        return None;
    }
    EnergyCategory::of(proto.energy_source.as_ref())
}

/// Active power usage in kW.
pub fn usage(proto: &MachinePrototype, kind: MachineKind) -> Option<f64> {
    match kind {
        MachineKind::OffshorePump | MachineKind::AsteroidCollector => None,
        MachineKind::Boiler => power_to_rate(proto.energy_consumption.as_ref()),
        MachineKind::Reactor => power_to_rate(proto.consumption.as_ref()),
        _ => power_to_rate(proto.energy_usage.as_ref()),
    }
}

/// Idle power draw in kW.
pub fn drain(proto: &MachinePrototype, kind: MachineKind) -> Option<f64> {
    if kind == MachineKind::OffshorePump {
        return None;
    }
    let source = proto.energy_source.as_ref()?;
    if source.kind != EnergySourceType::Electric {
        return None;
    }
    if source.drain.is_some() {
        return power_to_rate(source.drain.as_ref());
    }
    if kind.has_drain_fallback() {
        usage(proto, kind).map(|usage| usage / DRAIN_USAGE_RATIO)
    } else {
        None
    }
}

/// Pollution emitted per minute.
pub fn pollution(proto: &MachinePrototype, kind: MachineKind) -> Option<f64> {
    if kind == MachineKind::OffshorePump {
        return None;
    }
    proto
        .energy_source
        .as_ref()?
        .emissions_per_minute
        .as_ref()?
        .get(POLLUTANT)
        .copied()
}

pub fn speed(proto: &MachinePrototype, kind: MachineKind) -> Option<f64> {
    match kind {
        // The pumping rate belongs to the fluid recipe, not the machine.
        MachineKind::Reactor | MachineKind::AsteroidCollector | MachineKind::OffshorePump => {
            Some(1.0)
        }
        MachineKind::Boiler => Some(power_to_rate(proto.energy_consumption.as_ref()).unwrap_or(1.0)),
        MachineKind::Lab => Some(proto.researching_speed.unwrap_or(1.0)),
        MachineKind::MiningDrill => proto.mining_speed,
        _ => proto.crafting_speed,
    }
}

pub fn modules(proto: &MachinePrototype, kind: MachineKind) -> Option<u32> {
    if kind.suppresses_modules() {
        return None;
    }
    proto.module_slots
}

pub fn disallowed_effects(proto: &MachinePrototype, kind: MachineKind) -> Option<Vec<EffectType>> {
    if kind.suppresses_modules() {
        return None;
    }
    effects_to_disallowed_list(proto.allowed_effects.as_ref(), false)
}

pub fn base_effect(proto: &MachinePrototype, kind: MachineKind) -> Option<BaseEffect> {
    if kind.suppresses_modules() {
        return None;
    }
    let values = proto.effect_receiver.as_ref()?.base_effect.as_ref()?;
    let effect = EffectType::ALL
        .into_iter()
        .filter_map(|effect| {
            values
                .get(effect)
                .filter(|magnitude| *magnitude != 0.0 && !magnitude.is_nan())
                .map(|magnitude| (effect, magnitude))
        })
        .collect();
    Some(effect)
}

// ===========================================================================
// Summary
// ===========================================================================

/// All derived attributes of one machine. Absent attributes are omitted when
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSummary {
    #[serde(skip)]
    pub kind: MachineKind,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub energy_type: Option<EnergyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pollution: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disallowed_effects: Option<Vec<EffectType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_effect: Option<BaseEffect>,
    pub size: Size,
}

/// Classify a prototype once and derive every attribute for its kind.
pub fn derive_machine(proto: &MachinePrototype) -> MachineSummary {
    let kind = classify(proto);
    MachineSummary {
        kind,
        energy_type: energy_type(proto, kind),
        usage: usage(proto, kind),
        drain: drain(proto, kind),
        pollution: pollution(proto, kind),
        speed: speed(proto, kind),
        modules: modules(proto, kind),
        disallowed_effects: disallowed_effects(proto, kind),
        base_effect: base_effect(proto, kind),
        size: entity_size(&proto.geometry),
    }
}
