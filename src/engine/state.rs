//! Tick state: what the engine remembers between ticks.

use std::collections::HashMap;

/// The engine's memory of the previous tick.
///
/// Created fresh for each run and threaded through every [`tick`](super::tick)
/// by exclusive reference. Nothing in here is recomputed retroactively: each
/// field holds exactly what the previous tick left behind.
#[derive(Debug)]
pub struct TickState {
    /// Set until the run's startup beacons have been sent.
    pub(super) first_tick: bool,

    pub(super) previous_gradient: i32,
    pub(super) previous_stop_distance: f32,
    pub(super) previous_speed_limit: f32,
    pub(super) previous_next_speed_limit: f32,

    /// Consecutive ticks the pending next limit has been unchanged.
    pub(super) unchanged_next_limit_ticks: u32,

    pub(super) previous_station_index: usize,
    pub(super) location_override: LocationOverride,
    pub(super) ledger: SignalLedger,
}

impl TickState {
    pub fn new() -> Self {
        Self {
            first_tick: true,
            previous_gradient: 0,
            previous_stop_distance: 0.0,
            previous_speed_limit: -1.0,
            previous_next_speed_limit: -1.0,
            unchanged_next_limit_ticks: 0,
            previous_station_index: 0,
            location_override: LocationOverride::Suppressed,
            ledger: SignalLedger::default(),
        }
    }

    /// Forget everything and re-arm the startup beacons.
    ///
    /// Call once per run boundary: a train was selected or the diagram was reloaded.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Signals confirmed so far this run.
    pub fn ledger(&self) -> &SignalLedger {
        &self.ledger
    }
}

impl Default for TickState {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the fixed-location speed limit still needs to be announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LocationOverride {
    /// Not applicable to this run's direction.
    Suppressed,

    /// Waiting for the train to approach the location.
    Armed,

    /// Already announced this run.
    Applied,
}

/// A signal whose aspect has been announced to the device.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedSignal {
    pub aspect: String,

    /// Absolute position of the signal, fixed when it was first confirmed.
    pub locked_position: f32,
}

/// What the ledger knows about a signal being sighted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Sighting {
    /// Never confirmed this run.
    Unseen,

    /// Confirmed with the same aspect.
    Unchanged,

    /// Confirmed with a different aspect; the position stays locked.
    AspectChanged { locked_position: f32 },
}

/// Signals confirmed this run, keyed by track-side name.
#[derive(Debug, Default)]
pub struct SignalLedger {
    confirmed: HashMap<String, ConfirmedSignal>,
}

impl SignalLedger {
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&ConfirmedSignal> {
        self.confirmed.get(name)
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }

    pub(super) fn sight(&self, name: &str, aspect: &str) -> Sighting {
        match self.confirmed.get(name) {
            None => Sighting::Unseen,
            Some(entry) if entry.aspect == aspect => Sighting::Unchanged,
            Some(entry) => Sighting::AspectChanged {
                locked_position: entry.locked_position,
            },
        }
    }

    pub(super) fn confirm(&mut self, name: &str, aspect: &str, locked_position: f32) {
        self.confirmed.insert(
            name.to_string(),
            ConfirmedSignal {
                aspect: aspect.to_string(),
                locked_position,
            },
        );
    }
}
