//! Machine-kind classification.
//!
//! Kinds are told apart by the fields a record carries, not by a type tag.
//! Some kinds share fields (a rocket silo and a furnace both have a crafting
//! speed), so the markers are tested in a fixed priority order and the first
//! match wins. A record with no marker is [`MachineKind::Generic`].

use crate::prototype::MachinePrototype;
use serde::Serialize;
use tracing::trace;

/// The closed set of machine kinds with distinct derivation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MachineKind {
    Boiler,
    OffshorePump,
    Reactor,
    AsteroidCollector,
    AssemblingMachine,
    RocketSilo,
    Furnace,
    Lab,
    MiningDrill,
    Generic,
}

impl MachineKind {
    /// Kinds for which module slots, disallowed effects and base effect are
    /// meaningless.
    pub fn suppresses_modules(self) -> bool {
        matches!(
            self,
            MachineKind::Boiler
                | MachineKind::OffshorePump
                | MachineKind::Reactor
                | MachineKind::AsteroidCollector
        )
    }

    /// Kinds whose drain falls back to a fraction of usage when the energy
    /// source declares none.
    pub fn has_drain_fallback(self) -> bool {
        matches!(
            self,
            MachineKind::AssemblingMachine | MachineKind::RocketSilo | MachineKind::Furnace
        )
    }
}

/// Classify a raw prototype into exactly one machine kind.
pub fn classify(proto: &MachinePrototype) -> MachineKind {
    let kind = if proto.rocket_entity.is_some() {
        MachineKind::RocketSilo
    } else if proto.target_temperature.is_some() || proto.energy_consumption.is_some() {
        MachineKind::Boiler
    } else if proto.pumping_speed.is_some() {
        MachineKind::OffshorePump
    } else if proto.consumption.is_some() {
        MachineKind::Reactor
    } else if proto.collection_radius.is_some() {
        MachineKind::AsteroidCollector
    } else if proto.source_inventory_size.is_some() {
        MachineKind::Furnace
    } else if proto.crafting_speed.is_some() {
        MachineKind::AssemblingMachine
    } else if proto.inputs.is_some() || proto.researching_speed.is_some() {
        MachineKind::Lab
    } else if proto.mining_speed.is_some() {
        MachineKind::MiningDrill
    } else {
        MachineKind::Generic
    };
    trace!(target: "protolab::classify", name = %proto.name, ?kind, "classified prototype");
    kind
}
