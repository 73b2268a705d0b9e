//! Schedule beacons: timetable data for the next checkpoint.

use jiff::SignedDuration;
use tracing::debug;

use crate::model::{BeaconKind, BeaconRecord, StopType, TelemetrySnapshot, packed_payload};

use super::state::TickState;

/// A station matches the checkpoint when their positions agree this closely.
const CHECKPOINT_MATCH_M: f32 = 100.0;

/// Added to the distance payload when the checkpoint is passed without stopping.
const PASSING_MARKER: i32 = 999;

/// When the timetable advances, announce the arrival time and distance of the
/// station the next checkpoint refers to.
pub(super) fn derive(state: &mut TickState, snapshot: &TelemetrySnapshot, out: &mut Vec<BeaconRecord>) {
    if snapshot.station_index == state.previous_station_index {
        return;
    }
    state.previous_station_index = snapshot.station_index;

    let checkpoint = snapshot.next_checkpoint_distance;
    let Some(station) = snapshot
        .stations
        .iter()
        .skip(snapshot.station_index)
        .find(|station| {
            (station.total_length - snapshot.total_length - checkpoint).abs() < CHECKPOINT_MATCH_M
        })
    else {
        return;
    };

    let marker = if station.stop_type == StopType::Passing {
        PASSING_MARKER
    } else {
        0
    };
    debug!(station = %station.name, checkpoint, "next checkpoint");
    out.push(BeaconRecord::new(
        BeaconKind::ScheduleArrival,
        whole_seconds(station.arrival_time),
    ));
    out.push(BeaconRecord::new(
        BeaconKind::ScheduleDistance,
        packed_payload(checkpoint, marker),
    ));
}

fn whole_seconds(offset: SignedDuration) -> i32 {
    i32::try_from(offset.as_secs()).unwrap_or(if offset.is_negative() { i32::MIN } else { i32::MAX })
}
