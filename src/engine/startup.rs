//! Startup beacons: sent once at the beginning of each run.

use tracing::debug;

use crate::catalog::ASPECTS;
use crate::model::{BeaconKind, BeaconRecord, TelemetrySnapshot};

use super::{EngineError, EngineSettings, Result, state::LocationOverride, state::TickState};

/// Direction of travel, encoded in the parity of the diagram's last digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    /// Even train number.
    Up,
    /// Odd train number.
    Down,
}

impl Direction {
    /// Reads the last decimal digit of the diagram name, scanning from its end.
    pub(super) fn from_dia_name(dia_name: &str) -> Option<Self> {
        let digit = dia_name.chars().rev().find_map(|c| c.to_digit(10))?;
        Some(if digit % 2 == 0 { Self::Up } else { Self::Down })
    }
}

/// Configure the device for a new run and decide the run's direction.
pub(super) fn announce(
    state: &mut TickState,
    settings: &EngineSettings,
    snapshot: &TelemetrySnapshot,
    out: &mut Vec<BeaconRecord>,
) -> Result<()> {
    let direction = Direction::from_dia_name(&snapshot.dia_name).ok_or_else(|| {
        EngineError::MissingDirectionDigit {
            dia_name: snapshot.dia_name.clone(),
        }
    })?;

    out.push(BeaconRecord::new(
        BeaconKind::StopTolerance,
        settings.stop_tolerance_cm,
    ));
    out.extend(
        ASPECTS
            .iter()
            .map(|aspect| BeaconRecord::new(BeaconKind::AspectTableEntry, aspect.table_payload())),
    );
    out.push(BeaconRecord::new(
        BeaconKind::MaxServiceSpeed,
        settings.max_service_speed,
    ));

    // The fixed-location limit only applies to up trains.
    state.location_override = match direction {
        Direction::Up => LocationOverride::Armed,
        Direction::Down => LocationOverride::Suppressed,
    };
    state.first_tick = false;

    debug!(dia = %snapshot.dia_name, ?direction, "run configured");
    Ok(())
}
