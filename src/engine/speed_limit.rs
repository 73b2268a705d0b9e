//! Speed-limit beacons.
//!
//! The current limit is forwarded as soon as it changes. The upcoming limit
//! is noisier: the simulator briefly shows limits that never materialize, and
//! limits imposed by signals show up here too even though the signal beacons
//! already cover them. An upcoming limit is therefore only announced after it
//! has held still for [`CONFIRMATION_TICKS`] ticks and no visible signal
//! accounts for it.

use tracing::{debug, trace};

use crate::model::{BeaconKind, BeaconRecord, TelemetrySnapshot, packed_payload};

use super::{
    signal::{SAME_POSITION_M, VisibleSignal},
    state::{LocationOverride, TickState},
};

/// Unchanged ticks after which an upcoming limit is announced.
const CONFIRMATION_TICKS: u32 = 3;

/// A limit the simulator publishes too late to brake for, announced from a
/// fixed offset before the next stop instead.
struct FixedLimit {
    /// Next stop the limit precedes.
    stop_name: &'static str,

    /// Announce once the next stop is closer than this.
    trigger_distance: f32,

    /// Distance between the limit and the stop.
    offset_from_stop: f32,

    speed: i32,
}

const ENOHARA_APPROACH: FixedLimit = FixedLimit {
    stop_name: "江ノ原",
    trigger_distance: 1500.0,
    offset_from_stop: 923.0,
    speed: 65,
};

pub(super) fn derive(
    state: &mut TickState,
    snapshot: &TelemetrySnapshot,
    visible: &[VisibleSignal<'_>],
    out: &mut Vec<BeaconRecord>,
) {
    announce_current_limit(state, snapshot, out);
    announce_fixed_limit(state, snapshot, out);
    announce_next_limit(state, snapshot, visible, out);
}

#[allow(clippy::float_cmp)] // Any change at all is news.
fn announce_current_limit(
    state: &mut TickState,
    snapshot: &TelemetrySnapshot,
    out: &mut Vec<BeaconRecord>,
) {
    if snapshot.speed_limit == state.previous_speed_limit {
        return;
    }
    debug!(limit = snapshot.speed_limit, "current speed limit");
    out.push(BeaconRecord::new(
        BeaconKind::SpeedLimit,
        snapshot.speed_limit as i32,
    ));
    state.previous_speed_limit = snapshot.speed_limit;
}

fn announce_fixed_limit(
    state: &mut TickState,
    snapshot: &TelemetrySnapshot,
    out: &mut Vec<BeaconRecord>,
) {
    let limit = &ENOHARA_APPROACH;
    if state.location_override != LocationOverride::Armed
        || snapshot.next_stop_name != limit.stop_name
        || snapshot.next_stop_distance >= limit.trigger_distance
    {
        return;
    }
    let distance = snapshot.next_stop_distance - limit.offset_from_stop;
    debug!(stop = limit.stop_name, distance, speed = limit.speed, "fixed speed limit");
    out.push(BeaconRecord::new(
        BeaconKind::SpeedLimit,
        packed_payload(distance, limit.speed),
    ));
    state.location_override = LocationOverride::Applied;
}

#[allow(clippy::float_cmp)] // Debounce on exact repeats of the published value.
fn announce_next_limit(
    state: &mut TickState,
    snapshot: &TelemetrySnapshot,
    visible: &[VisibleSignal<'_>],
    out: &mut Vec<BeaconRecord>,
) {
    let limit = snapshot.next_speed_limit;

    if limit == state.previous_next_speed_limit {
        state.unchanged_next_limit_ticks = state.unchanged_next_limit_ticks.saturating_add(1);
        // Zero means "no limit" to the device and would lift an active one.
        if state.unchanged_next_limit_ticks != CONFIRMATION_TICKS || limit <= 0.0 {
            return;
        }
        let payload = packed_payload(snapshot.next_speed_limit_distance, limit as i32);
        debug!(limit, distance = snapshot.next_speed_limit_distance, "next speed limit");
        out.push(BeaconRecord::new(BeaconKind::SpeedLimit, payload));
        return;
    }

    if limit <= 0.0 {
        state.previous_next_speed_limit = limit;
        return;
    }

    match signal_source(visible, snapshot.next_speed_limit_distance) {
        LimitSource::Signal => {
            trace!(limit, "next speed limit comes from a signal");
            state.previous_next_speed_limit = limit;
            // Count it as already settled so repeats never flush it.
            state.unchanged_next_limit_ticks =
                state.unchanged_next_limit_ticks.max(CONFIRMATION_TICKS);
        }
        LimitSource::Pending => {
            trace!(limit, "signal restrictions not received yet, deferring");
        }
        LimitSource::Track => {
            state.previous_next_speed_limit = limit;
            state.unchanged_next_limit_ticks = 0;
        }
    }
}

/// Where an upcoming limit comes from, judged against the signals in sight.
#[derive(Debug, PartialEq, Eq)]
enum LimitSource {
    /// A signal's restriction sits at the limit's position.
    Signal,

    /// A signal in sight has not published its restrictions yet.
    Pending,

    /// A fixed track-side limit.
    Track,
}

/// Walk signals nearest first. The first one with a restriction at `distance`
/// claims the limit; a signal without any restriction data stops the walk,
/// since its restrictions may still turn out to match.
fn signal_source(visible: &[VisibleSignal<'_>], distance: f32) -> LimitSource {
    for signal in visible {
        let mut restrictions = signal
            .report
            .sub_beacons
            .iter()
            .filter(|sub| sub.kind.is_signal_sourced())
            .peekable();
        if restrictions.peek().is_none() {
            return LimitSource::Pending;
        }
        if restrictions.any(|sub| (sub.distance - distance).abs() < SAME_POSITION_M) {
            return LimitSource::Signal;
        }
    }
    LimitSource::Track
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::engine::signal::deduplicate;
    use crate::model::{SignalReport, SubBeacon, SubBeaconKind};

    fn limits(next: f32, next_distance: f32) -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed_limit: 110.0,
            next_speed_limit: next,
            next_speed_limit_distance: next_distance,
            ..TelemetrySnapshot::default()
        }
    }

    fn signal(kind: Option<SubBeaconKind>, restriction_distance: f32) -> SignalReport {
        SignalReport {
            name: "S1".to_string(),
            aspect: "Y".to_string(),
            distance: 700.0,
            sub_beacons: kind
                .map(|kind| SubBeacon {
                    kind,
                    distance: restriction_distance,
                    speed: 55.0,
                })
                .into_iter()
                .collect(),
        }
    }

    fn restricting(name: &str, distance: f32, restriction_distances: &[f32]) -> SignalReport {
        SignalReport {
            name: name.to_string(),
            aspect: "YG".to_string(),
            distance,
            sub_beacons: restriction_distances
                .iter()
                .map(|&distance| SubBeacon {
                    kind: SubBeaconKind::SignalRestriction,
                    distance,
                    speed: 80.0,
                })
                .collect(),
        }
    }

    fn run(state: &mut TickState, snapshot: &TelemetrySnapshot, reports: &[SignalReport]) -> Vec<BeaconRecord> {
        let visible = deduplicate(reports).unwrap();
        let mut out = Vec::new();
        derive(state, snapshot, &visible, &mut out);
        out
    }

    fn next_limit_payloads(out: &[BeaconRecord]) -> Vec<i32> {
        out.iter()
            .filter(|b| b.kind == BeaconKind::SpeedLimit && b.payload > 1000)
            .map(|b| b.payload)
            .collect()
    }

    #[test]
    fn current_limit_on_change_only() {
        let mut state = TickState::new();
        let out = run(&mut state, &limits(0.0, 0.0), &[]);
        assert_eq!(out, [BeaconRecord::new(BeaconKind::SpeedLimit, 110)]);

        assert!(run(&mut state, &limits(0.0, 0.0), &[]).is_empty());

        let mut slower = limits(0.0, 0.0);
        slower.speed_limit = 75.0;
        assert_eq!(run(&mut state, &slower, &[])[0].payload, 75);
    }

    #[test]
    fn next_limit_confirmed_on_third_unchanged_tick() {
        let mut state = TickState::new();
        // Tick 0: the value appears and the counter starts.
        assert!(next_limit_payloads(&run(&mut state, &limits(60.0, 800.0), &[])).is_empty());
        // Ticks 1 and 2: still waiting.
        assert!(next_limit_payloads(&run(&mut state, &limits(60.0, 790.0), &[])).is_empty());
        assert!(next_limit_payloads(&run(&mut state, &limits(60.0, 780.0), &[])).is_empty());
        // Tick 3: confirmed, with the distance of this tick.
        assert_eq!(
            next_limit_payloads(&run(&mut state, &limits(60.0, 770.0), &[])),
            [770_060]
        );
        // Never again while the value holds.
        for distance in [760.0, 750.0, 740.0, 730.0] {
            assert!(next_limit_payloads(&run(&mut state, &limits(60.0, distance), &[])).is_empty());
        }
    }

    #[test]
    fn changed_value_restarts_confirmation() {
        let mut state = TickState::new();
        for distance in [800.0, 790.0, 780.0, 770.0] {
            run(&mut state, &limits(60.0, distance), &[]);
        }

        assert!(next_limit_payloads(&run(&mut state, &limits(45.0, 500.0), &[])).is_empty());
        assert!(next_limit_payloads(&run(&mut state, &limits(45.0, 490.0), &[])).is_empty());
        assert!(next_limit_payloads(&run(&mut state, &limits(45.0, 480.0), &[])).is_empty());
        assert_eq!(
            next_limit_payloads(&run(&mut state, &limits(45.0, 470.0), &[])),
            [470_045]
        );
    }

    #[test]
    fn flicker_never_confirms() {
        let mut state = TickState::new();
        for i in 0..12u8 {
            let distance = 900.0 - f32::from(i);
            let value = if i % 2 == 0 { 60.0 } else { 70.0 };
            let out = run(&mut state, &limits(value, distance), &[]);
            assert!(next_limit_payloads(&out).is_empty());
        }
    }

    #[test]
    fn non_positive_next_limit_never_announced() {
        let mut state = TickState::new();
        for _ in 0..6 {
            let out = run(&mut state, &limits(0.0, 300.0), &[]);
            assert!(next_limit_payloads(&out).is_empty());
            assert!(out.iter().all(|b| b.payload == 110));
        }
        assert_eq!(state.previous_next_speed_limit, 0.0);
    }

    #[test]
    fn signal_restriction_claims_limit() {
        let mut state = TickState::new();
        let reports = [signal(Some(SubBeaconKind::SignalRestriction), 650.4)];
        for distance in [650.0, 640.0, 630.0, 620.0, 610.0] {
            let out = run(&mut state, &limits(55.0, distance), &reports);
            assert!(next_limit_payloads(&out).is_empty());
        }
        assert_eq!(state.previous_next_speed_limit, 55.0);
    }

    #[test]
    fn stop_if_restricting_also_claims_limit() {
        let mut state = TickState::new();
        let reports = [signal(Some(SubBeaconKind::StopIfRestricting), 400.0)];
        run(&mut state, &limits(25.0, 400.5), &reports);
        assert_eq!(state.previous_next_speed_limit, 25.0);
        assert_eq!(state.unchanged_next_limit_ticks, CONFIRMATION_TICKS);
    }

    #[test]
    fn signal_claim_leaves_counter_alone() {
        let mut state = TickState::new();
        for distance in [800.0, 790.0, 780.0, 770.0, 760.0] {
            run(&mut state, &limits(60.0, distance), &[]);
        }
        assert_eq!(state.unchanged_next_limit_ticks, 4);

        let reports = [signal(Some(SubBeaconKind::SignalRestriction), 500.0)];
        run(&mut state, &limits(55.0, 500.0), &reports);
        assert_eq!(state.previous_next_speed_limit, 55.0);
        assert_eq!(state.unchanged_next_limit_ticks, 4);
    }

    #[test]
    fn missing_restriction_data_defers() {
        let mut state = TickState::new();
        run(&mut state, &limits(0.0, 0.0), &[]);

        let bare = [signal(None, 0.0)];
        run(&mut state, &limits(55.0, 500.0), &bare);
        assert_eq!(state.previous_next_speed_limit, 0.0);

        // Data arrives and the limit turns out to be the signal's.
        let reports = [signal(Some(SubBeaconKind::SignalRestriction), 500.0)];
        run(&mut state, &limits(55.0, 499.5), &reports);
        assert_eq!(state.previous_next_speed_limit, 55.0);
    }

    #[test]
    fn other_sub_beacons_do_not_count_as_restriction_data() {
        let mut state = TickState::new();
        let reports = [signal(Some(SubBeaconKind::Other), 500.0)];
        run(&mut state, &limits(55.0, 500.0), &reports);
        assert_eq!(state.previous_next_speed_limit, -1.0);
    }

    #[test]
    fn unrelated_restriction_makes_it_a_track_limit() {
        let mut state = TickState::new();
        let reports = [signal(Some(SubBeaconKind::SignalRestriction), 900.0)];
        let mut flushed = Vec::new();
        for distance in [500.0, 490.0, 480.0, 470.0] {
            flushed.extend(next_limit_payloads(&run(&mut state, &limits(45.0, distance), &reports)));
        }
        assert_eq!(flushed, [470_045]);
    }

    #[test]
    fn farther_signal_can_claim_limit() {
        let mut state = TickState::new();
        // Listed far first; the walk still starts at the nearest.
        let reports = [
            restricting("S2", 800.0, &[450.0]),
            restricting("S1", 300.0, &[900.0]),
        ];
        let mut flushed = Vec::new();
        for distance in [450.0, 449.8, 449.6, 449.4, 449.2] {
            flushed.extend(next_limit_payloads(&run(&mut state, &limits(80.0, distance), &reports)));
        }
        assert!(flushed.is_empty());
        assert_eq!(state.previous_next_speed_limit, 80.0);
        assert_eq!(state.unchanged_next_limit_ticks, CONFIRMATION_TICKS + 4);
    }

    #[test]
    fn farther_signal_without_data_defers() {
        let mut state = TickState::new();
        run(&mut state, &limits(0.0, 0.0), &[]);

        let reports = [
            restricting("S1", 300.0, &[900.0]),
            restricting("S2", 800.0, &[]),
        ];
        run(&mut state, &limits(80.0, 450.0), &reports);
        assert_eq!(state.previous_next_speed_limit, 0.0);

        // S2 publishes a restriction elsewhere: a track limit after all.
        let reports = [
            restricting("S1", 300.0, &[900.0]),
            restricting("S2", 800.0, &[1200.0]),
        ];
        run(&mut state, &limits(80.0, 450.0), &reports);
        assert_eq!(state.previous_next_speed_limit, 80.0);
        assert_eq!(state.unchanged_next_limit_ticks, 0);
    }

    #[test]
    fn far_next_limit_saturates_payload() {
        let mut state = TickState::new();
        let mut flushed = Vec::new();
        for _ in 0..4 {
            flushed.extend(next_limit_payloads(&run(&mut state, &limits(60.0, 1.0e7), &[])));
        }
        assert_eq!(flushed, [i32::MAX]);
    }

    fn approaching(dia_stop: &str, distance: f32) -> TelemetrySnapshot {
        TelemetrySnapshot {
            speed_limit: 110.0,
            next_stop_name: dia_stop.to_string(),
            next_stop_distance: distance,
            ..TelemetrySnapshot::default()
        }
    }

    #[test]
    fn fixed_limit_fires_once_when_armed() {
        let mut state = TickState::new();
        state.location_override = LocationOverride::Armed;

        assert_eq!(run(&mut state, &approaching("江ノ原", 1600.0), &[]).len(), 1);

        let out = run(&mut state, &approaching("江ノ原", 1480.0), &[]);
        assert_eq!(out, [BeaconRecord::new(BeaconKind::SpeedLimit, 557_065)]);
        assert_eq!(state.location_override, LocationOverride::Applied);

        assert!(run(&mut state, &approaching("江ノ原", 1470.0), &[]).is_empty());
    }

    #[test]
    fn fixed_limit_needs_matching_stop() {
        let mut state = TickState::new();
        state.location_override = LocationOverride::Armed;
        run(&mut state, &approaching("新野崎", 1000.0), &[]);
        assert_eq!(state.location_override, LocationOverride::Armed);
    }

    #[test]
    fn fixed_limit_suppressed() {
        let mut state = TickState::new();
        state.location_override = LocationOverride::Suppressed;
        run(&mut state, &approaching("江ノ原", 1000.0), &[]);
        let out = run(&mut state, &approaching("江ノ原", 900.0), &[]);
        assert!(out.is_empty());
        assert_eq!(state.location_override, LocationOverride::Suppressed);
    }
}
