//! Signal beacons: announce the nearest signal whose aspect is news.
//!
//! The simulator reports every signal in sight, sometimes several times per
//! physical location with disagreeing aspects while a block clears. Reports
//! within a meter of each other are merged, keeping the most permissive
//! aspect, and only the nearest location is considered each tick.
//!
//! Each signal's absolute position is locked the first time it is confirmed.
//! The device identifies a block by the distance to its signal, so every
//! later announcement derives that distance from the lock rather than from
//! the tick's reported distance, which jitters as the train approaches.

use tracing::debug;

use crate::catalog::{self, SignalAspect};
use crate::model::{
    BeaconKind, BeaconRecord, SignalReport, SubBeaconKind, TelemetrySnapshot, packed_payload,
};

use super::{
    EngineError, Result,
    state::{Sighting, TickState},
};

/// Reports closer together than this describe the same location.
pub(super) const SAME_POSITION_M: f32 = 1.0;

/// Restrictions are announced this far ahead of where the simulator places them.
/// Enforcement from the reported position was observed to come too late.
const RESTRICTION_LEAD_M: f32 = 150.0;

/// A signal location ahead and the aspect that represents it.
#[derive(Debug, Clone, Copy)]
pub(super) struct VisibleSignal<'a> {
    pub report: &'a SignalReport,
    pub aspect: &'static SignalAspect,
}

/// Merge reports by location and order them nearest first.
///
/// Fails on an aspect missing from the catalog: announcing a guessed speed
/// limit is worse than announcing nothing.
pub(super) fn deduplicate(reports: &[SignalReport]) -> Result<Vec<VisibleSignal<'_>>> {
    let mut visible: Vec<VisibleSignal<'_>> = Vec::with_capacity(reports.len());
    for report in reports {
        let aspect =
            catalog::lookup(&report.aspect).ok_or_else(|| EngineError::UnknownAspect {
                signal: report.name.clone(),
                aspect: report.aspect.clone(),
            })?;
        let candidate = VisibleSignal { report, aspect };

        match visible
            .iter()
            .position(|kept| (kept.report.distance - report.distance).abs() < SAME_POSITION_M)
        {
            None => visible.push(candidate),
            Some(i) if aspect.speed_limit_kph > visible[i].aspect.speed_limit_kph => {
                visible[i] = candidate;
            }
            Some(_) => {}
        }
    }
    visible.sort_by(|a, b| a.report.distance.total_cmp(&b.report.distance));
    Ok(visible)
}

/// Announce the nearest signal if its aspect has not been confirmed yet.
///
/// Signals beyond the nearest wait for later ticks: at most one signal is
/// announced per tick.
pub(super) fn derive(
    state: &mut TickState,
    snapshot: &TelemetrySnapshot,
    visible: &[VisibleSignal<'_>],
    out: &mut Vec<BeaconRecord>,
) {
    let Some(nearest) = visible.first() else {
        return;
    };
    let report = nearest.report;

    let locked_position = match state.ledger.sight(&report.name, &report.aspect) {
        Sighting::Unchanged => return,
        Sighting::Unseen => snapshot.total_length + report.distance,
        Sighting::AspectChanged { locked_position } => locked_position,
    };
    state
        .ledger
        .confirm(&report.name, &report.aspect, locked_position);

    let ordinal = nearest.aspect.ordinal;
    let distance = locked_position - snapshot.total_length;
    debug!(signal = %report.name, aspect = %report.aspect, distance, "signal confirmed");

    out.push(BeaconRecord::at_signal(
        BeaconKind::SignalAhead,
        0,
        ordinal,
        distance,
    ));
    for sub in report
        .sub_beacons
        .iter()
        .filter(|sub| sub.kind == SubBeaconKind::StopIfRestricting)
    {
        let start = (sub.distance - RESTRICTION_LEAD_M).max(0.0);
        out.push(BeaconRecord::at_signal(
            BeaconKind::SignalRestriction,
            packed_payload(start, sub.speed as i32),
            ordinal,
            distance,
        ));
    }
}
