//! Protolab Core -- derives normalized machine attributes from raw game
//! prototype records.
//!
//! Raw records differ in shape per entity kind. This crate turns them into
//! comparable numbers (power draw, speed, module capacity, footprint) that a
//! downstream production calculator can use without knowing per-kind quirks.
//!
//! # Derivation Pipeline
//!
//! 1. **Classify** -- [`kind::classify`] tags a record with exactly one
//!    [`kind::MachineKind`], testing capability markers in priority order.
//! 2. **Derive** -- each attribute in [`machine`] applies its own per-kind
//!    rule, returning `None` where the attribute does not apply.
//! 3. **Measure** -- [`footprint::entity_size`] counts occupied grid tiles.
//! 4. **Launch** -- for rocket silos only, [`silo::launch_timing`] sums the
//!    launch phases into a tick estimate.
//!
//! ```rust,ignore
//! let proto: MachinePrototype = serde_json::from_str(raw)?;
//! let summary = derive_machine(&proto);
//! if summary.kind == MachineKind::RocketSilo {
//!     let timing = launch_timing(&proto, &rocket)?;
//! }
//! ```
//!
//! # Key Types
//!
//! - [`prototype::MachinePrototype`] -- Raw machine record, geometry encodings
//!   normalized on deserialize.
//! - [`machine::MachineSummary`] -- All derived attributes of one machine.
//! - [`silo::LaunchTiming`] -- Parts per launch and launch duration in ticks.
//! - [`entity`] -- Reshapes for beacons, belts, pumps and wagons.
//!
//! Every function here is pure; nothing is cached and no I/O happens.

pub mod effect;
pub mod entity;
pub mod footprint;
pub mod kind;
pub mod machine;
pub mod power;
pub mod prototype;
pub mod silo;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use kind::{MachineKind, classify};
pub use machine::{MachineSummary, derive_machine};
pub use prototype::{MachinePrototype, RocketPrototype};
pub use silo::{LaunchError, LaunchTiming, launch_timing};
