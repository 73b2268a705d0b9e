//! TASC proximity beacons.
//!
//! TASC brakes the train to its stopping position from a handful of
//! track-side markers ahead of each stop. The simulator exposes a continuous
//! distance-to-stop instead, so a marker is emulated whenever that distance
//! crosses one of the configured thresholds between two ticks.

use crate::model::{BeaconKind, BeaconRecord, TelemetrySnapshot};

use super::{EngineSettings, state::TickState};

/// Emit one proximity beacon per threshold crossed since the previous tick.
pub(super) fn derive(
    state: &mut TickState,
    settings: &EngineSettings,
    snapshot: &TelemetrySnapshot,
    out: &mut Vec<BeaconRecord>,
) {
    let previous = state.previous_stop_distance;
    let current = snapshot.next_stop_distance;
    state.previous_stop_distance = current;

    if !snapshot.next_stop_type.is_scheduled_stop() {
        return;
    }

    // Thresholds are descending, so crossings come out farthest first.
    for &threshold in &settings.tasc_thresholds {
        if previous >= threshold && current < threshold {
            out.push(BeaconRecord::new(
                BeaconKind::TascProximity,
                (current * 1000.0) as i32,
            ));
        }
    }
}
