//! Output formatting for CLI display.

use std::fmt::Write;

use crate::catalog::ASPECTS;
use crate::model::BeaconKind;

use super::replay::ReplaySummary;

/// Short human-readable name of a beacon type.
pub(super) fn format_kind(kind: BeaconKind) -> &'static str {
    match kind {
        BeaconKind::SpeedLimit => "speed limit",
        BeaconKind::MaxServiceSpeed => "max service speed",
        BeaconKind::Gradient => "gradient",
        BeaconKind::AspectTableEntry => "aspect table",
        BeaconKind::SignalAhead => "signal",
        BeaconKind::SignalRestriction => "signal restriction",
        BeaconKind::ScheduleArrival => "arrival time",
        BeaconKind::ScheduleDistance => "checkpoint distance",
        BeaconKind::TascProximity => "TASC proximity",
        BeaconKind::StopTolerance => "stop tolerance",
    }
}

/// The aspect catalog as a table, one aspect per line.
pub(super) fn format_catalog() -> String {
    let mut out = String::from("aspect  label      limit  ordinal  1011 payload\n");
    for aspect in &ASPECTS {
        let _ = writeln!(
            out,
            "{:<6}  {:<9}  {:>5}  {:>7}  {:>12}",
            aspect.name,
            aspect.label,
            aspect.speed_limit_kph,
            aspect.ordinal,
            aspect.table_payload()
        );
    }
    out
}

/// Frame counts followed by beacon counts per type.
pub(super) fn format_replay_summary(summary: &ReplaySummary) -> String {
    let total: usize = summary.beacons.values().sum();
    let mut out = format!(
        "Frames: {} processed, {} not driving, {} stalled\n",
        summary.processed, summary.not_driving, summary.stalled
    );
    let _ = writeln!(out, "Beacons: {total}");
    for (kind, count) in &summary.beacons {
        let _ = writeln!(out, "  {} {:<20} {count}", kind.code(), format_kind(*kind));
    }
    out
}
