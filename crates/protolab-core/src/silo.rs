//! Rocket launch timing.
//!
//! A launch cycle is a fixed sequence of animation phases. Most phases run a
//! progress value from 0 to 1 at a constant per-tick speed, which takes
//! `1 / speed` ticks plus one tick to switch state. The flight phase instead
//! accelerates the rocket; its duration has a closed form in the rocket's
//! acceleration and top speed.
//!
//! Silo fields drive the door and light phases; the companion rocket record
//! drives rising, engine start-up and flight.

use crate::kind::{MachineKind, classify};
use crate::prototype::{MachinePrototype, RocketPrototype};
use serde::Serialize;
use tracing::debug;

/// Ticks the silo inserter needs to swing a satellite into the rocket.
/// An estimate; nothing in the data describes it.
pub const SATELLITE_SWING_TICKS: f64 = 14.0;

/// Fraction of top flying speed at which the rocket counts as launched.
pub const FLYING_SPEED_THRESHOLD: f64 = 0.5;

pub const DEFAULT_ROCKET_RISING_DELAY: f64 = 30.0;
pub const DEFAULT_LAUNCH_WAIT_TIME: f64 = 120.0;

/// Derived launch data for a rocket silo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaunchTiming {
    /// Rocket parts consumed per launch.
    pub parts: u32,
    /// Ticks from launch command to doors closed, rounded to nearest.
    pub launch: u64,
}

/// Errors from launch timing. Each indicates a caller contract violation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LaunchError {
    #[error("'{name}' is classified as {kind:?}, not a rocket silo")]
    NotRocketSilo { name: String, kind: MachineKind },
    #[error("rocket silo '{name}' is missing required field '{field}'")]
    MissingField { name: String, field: &'static str },
    /// A speed or acceleration that is zero, negative or not finite.
    #[error("'{name}' has non-positive or non-finite '{field}' ({value})")]
    InvalidField {
        name: String,
        field: &'static str,
        value: f64,
    },
}

/// Duration of each launch phase, in ticks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchPhases {
    pub lights_blinking_open: f64,
    pub doors_opening: f64,
    pub doors_opened: f64,
    pub rocket_rising: f64,
    pub rocket_ready: f64,
    pub launch_starting: f64,
    pub engine_starting: f64,
    pub rocket_flying: f64,
    pub lights_blinking_close: f64,
    pub doors_closing: f64,
}

impl LaunchPhases {
    pub fn as_array(&self) -> [f64; 10] {
        [
            self.lights_blinking_open,
            self.doors_opening,
            self.doors_opened,
            self.rocket_rising,
            self.rocket_ready,
            self.launch_starting,
            self.engine_starting,
            self.rocket_flying,
            self.lights_blinking_close,
            self.doors_closing,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Total rounded half-up to whole ticks.
    pub fn total_ticks(&self) -> u64 {
        (self.total() + 0.5).floor() as u64
    }
}

/// Ticks for a progress animation running at `speed` per tick.
fn animation_ticks(speed: f64) -> f64 {
    1.0 / speed + 1.0
}

/// Ticks for a rocket to reach [`FLYING_SPEED_THRESHOLD`] of `max_speed`
/// when its speed grows by `acceleration` of itself each tick.
pub fn flying_ticks(acceleration: f64, max_speed: f64) -> f64 {
    (1.0 + FLYING_SPEED_THRESHOLD * acceleration / max_speed).ln() / (1.0 + acceleration).ln()
}

fn require<T>(
    silo: &MachinePrototype,
    value: Option<T>,
    field: &'static str,
) -> Result<T, LaunchError> {
    value.ok_or_else(|| LaunchError::MissingField {
        name: silo.name.clone(),
        field,
    })
}

/// Rates divide into durations, so they must be finite and above zero.
fn positive(name: &str, value: f64, field: &'static str) -> Result<f64, LaunchError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LaunchError::InvalidField {
            name: name.to_string(),
            field,
            value,
        })
    }
}

fn ensure_silo(silo: &MachinePrototype) -> Result<(), LaunchError> {
    match classify(silo) {
        MachineKind::RocketSilo => Ok(()),
        kind => Err(LaunchError::NotRocketSilo {
            name: silo.name.clone(),
            kind,
        }),
    }
}

/// Compute every phase of one launch cycle.
pub fn launch_phases(
    silo: &MachinePrototype,
    rocket: &RocketPrototype,
) -> Result<LaunchPhases, LaunchError> {
    ensure_silo(silo)?;

    let light_blinking_speed = positive(
        &silo.name,
        require(silo, silo.light_blinking_speed, "light_blinking_speed")?,
        "light_blinking_speed",
    )?;
    let door_opening_speed = positive(
        &silo.name,
        require(silo, silo.door_opening_speed, "door_opening_speed")?,
        "door_opening_speed",
    )?;
    let rising_speed = positive(&rocket.name, rocket.rising_speed, "rising_speed")?;
    let engine_starting_speed = positive(
        &rocket.name,
        rocket.engine_starting_speed,
        "engine_starting_speed",
    )?;
    let flying_speed = positive(&rocket.name, rocket.flying_speed, "flying_speed")?;
    let flying_acceleration = positive(
        &rocket.name,
        rocket.flying_acceleration,
        "flying_acceleration",
    )?;
    let rising_delay = silo.rocket_rising_delay.unwrap_or(DEFAULT_ROCKET_RISING_DELAY);
    let launch_wait = silo.launch_wait_time.unwrap_or(DEFAULT_LAUNCH_WAIT_TIME);

    Ok(LaunchPhases {
        lights_blinking_open: animation_ticks(light_blinking_speed),
        doors_opening: animation_ticks(door_opening_speed),
        doors_opened: rising_delay + 1.0,
        rocket_rising: animation_ticks(rising_speed),
        rocket_ready: SATELLITE_SWING_TICKS,
        launch_starting: launch_wait + 1.0,
        engine_starting: animation_ticks(engine_starting_speed),
        rocket_flying: flying_ticks(flying_acceleration, flying_speed),
        lights_blinking_close: animation_ticks(light_blinking_speed),
        doors_closing: animation_ticks(door_opening_speed),
    })
}

/// Derive the launch timing of a rocket silo and the rocket it launches.
pub fn launch_timing(
    silo: &MachinePrototype,
    rocket: &RocketPrototype,
) -> Result<LaunchTiming, LaunchError> {
    let phases = launch_phases(silo, rocket)?;
    let parts = require(silo, silo.rocket_parts_required, "rocket_parts_required")?;
    let launch = phases.total_ticks();
    debug!(
        target: "protolab::silo",
        silo = %silo.name,
        rocket = %rocket.name,
        flying = phases.rocket_flying,
        total = phases.total(),
        launch,
        "computed launch timing"
    );
    Ok(LaunchTiming { parts, launch })
}
