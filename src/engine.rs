//! Beacon derivation: turn continuous telemetry into discrete beacons.
//!
//! The ATS device only understands track-side beacons passed at a point.
//! The simulator publishes continuous state instead. Each [`tick`] compares
//! one snapshot against what the previous tick left in [`TickState`] and
//! emits the beacons the device would have received in between.
//!
//! Rules run in a fixed order, each in its own module:
//!
//! ```text
//! startup → gradient → tasc → signal → speed_limit → schedule
//! ```
//!
//! The order matters: the speed-limit rule cross-checks upcoming limits
//! against the signals the signal rule just looked at.

mod gradient;
mod schedule;
mod signal;
mod speed_limit;
mod startup;
mod state;
mod tasc;

use tracing::trace;

use crate::model::{BeaconRecord, SignalReport, TelemetrySnapshot};

pub use state::TickState;

/// Errors that abort a tick.
///
/// Both indicate input the bridge cannot interpret safely. No beacons are
/// emitted and no state is changed by a failed tick.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("diagram name {dia_name:?} contains no digit to derive the direction from")]
    MissingDirectionDigit { dia_name: String },

    #[error("signal {signal} shows unknown aspect {aspect:?}")]
    UnknownAspect { signal: String, aspect: String },
}

pub type Result<T> = core::result::Result<T, EngineError>;

/// Run-wide constants sent to the device or used to place emulated beacons.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Stopping tolerance for TASC, in centimeters.
    pub stop_tolerance_cm: i32,

    /// Maximum service speed, in km/h.
    pub max_service_speed: i32,

    /// Distances before a stop at which TASC proximity beacons are emulated.
    /// Strictly descending.
    pub tasc_thresholds: Vec<f32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            stop_tolerance_cm: 200,
            max_service_speed: 110,
            tasc_thresholds: vec![900.0, 700.0, 500.0, 300.0, 10.0],
        }
    }
}

/// Derive this tick's beacons, in the order they should reach the device.
pub fn tick(
    state: &mut TickState,
    settings: &EngineSettings,
    snapshot: &TelemetrySnapshot,
    signals: &[SignalReport],
) -> Result<Vec<BeaconRecord>> {
    // Validate signals before any rule touches the state.
    let visible = signal::deduplicate(signals)?;

    let mut out = Vec::new();
    if state.first_tick {
        startup::announce(state, settings, snapshot, &mut out)?;
    }
    gradient::derive(state, snapshot, &mut out);
    tasc::derive(state, settings, snapshot, &mut out);
    signal::derive(state, snapshot, &visible, &mut out);
    speed_limit::derive(state, snapshot, &visible, &mut out);
    schedule::derive(state, snapshot, &mut out);

    trace!(emitted = out.len(), "tick");
    Ok(out)
}
