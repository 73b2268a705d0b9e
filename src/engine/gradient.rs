//! Gradient beacons.

use crate::model::{BeaconKind, BeaconRecord, TelemetrySnapshot};

use super::state::TickState;

/// Announce the gradient whenever its whole-permille value changes.
pub(super) fn derive(state: &mut TickState, snapshot: &TelemetrySnapshot, out: &mut Vec<BeaconRecord>) {
    let gradient = snapshot.gradient as i32;
    if gradient == state.previous_gradient {
        return;
    }
    out.push(BeaconRecord::new(BeaconKind::Gradient, gradient));
    state.previous_gradient = gradient;
}
