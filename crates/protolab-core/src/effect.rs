//! Module effects: the closed effect set, allowed-effect declarations, and
//! base effects a machine carries without any modules inserted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A module-driven modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    Consumption,
    Pollution,
    Productivity,
    Quality,
    Speed,
}

impl EffectType {
    /// Every effect, in canonical order.
    pub const ALL: [EffectType; 5] = [
        EffectType::Consumption,
        EffectType::Pollution,
        EffectType::Productivity,
        EffectType::Quality,
        EffectType::Speed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectType::Consumption => "consumption",
            EffectType::Pollution => "pollution",
            EffectType::Productivity => "productivity",
            EffectType::Quality => "quality",
            EffectType::Speed => "speed",
        }
    }
}

/// The `allowed_effects` declaration of a prototype: a single effect name or
/// a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AllowedEffects {
    One(EffectType),
    Many(Vec<EffectType>),
}

impl AllowedEffects {
    pub fn contains(&self, effect: EffectType) -> bool {
        match self {
            AllowedEffects::One(allowed) => *allowed == effect,
            AllowedEffects::Many(allowed) => allowed.contains(&effect),
        }
    }
}

/// Raw per-effect magnitudes, e.g. `effect_receiver.base_effect`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct EffectValues {
    #[serde(default)]
    pub consumption: Option<f64>,
    #[serde(default)]
    pub pollution: Option<f64>,
    #[serde(default)]
    pub productivity: Option<f64>,
    #[serde(default)]
    pub quality: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
}

impl EffectValues {
    pub fn get(&self, effect: EffectType) -> Option<f64> {
        match effect {
            EffectType::Consumption => self.consumption,
            EffectType::Pollution => self.pollution,
            EffectType::Productivity => self.productivity,
            EffectType::Quality => self.quality,
            EffectType::Speed => self.speed,
        }
    }
}

/// Derived base effect: only the effects with a non-zero magnitude.
pub type BaseEffect = BTreeMap<EffectType, f64>;

/// Map an allowed-effects declaration to the list of effects it rules out.
///
/// Without a declaration a machine allows every effect while a beacon allows
/// everything except productivity. Returns `None` when nothing is disallowed.
pub fn effects_to_disallowed_list(
    allowed: Option<&AllowedEffects>,
    is_beacon: bool,
) -> Option<Vec<EffectType>> {
    let disallowed: Vec<EffectType> = match allowed {
        Some(allowed) => EffectType::ALL
            .into_iter()
            .filter(|effect| !allowed.contains(*effect))
            .collect(),
        None if is_beacon => vec![EffectType::Productivity],
        None => Vec::new(),
    };

    (!disallowed.is_empty()).then_some(disallowed)
}
