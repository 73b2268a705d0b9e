//! Signal reports: the visible signals ahead of the train.

use serde::{Deserialize, Serialize};

/// A signal visible ahead of the train during one cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    /// Track-side identifier, unique per physical signal.
    pub name: String,

    /// Displayed aspect, as a catalog name (e.g. `"YG"`).
    pub aspect: String,

    /// Distance from the train. Negative once the signal has been passed.
    pub distance: f32,

    /// Beacons attached to this signal, nearest first.
    #[serde(default)]
    pub sub_beacons: Vec<SubBeacon>,
}

/// A beacon attached to a signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubBeacon {
    pub kind: SubBeaconKind,
    pub distance: f32,
    pub speed: f32,
}

/// What a signal's sub-beacon enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubBeaconKind {
    /// Speed restriction applied only when the signal shows a restricting aspect.
    StopIfRestricting,

    /// Speed restriction derived from the signal's aspect.
    SignalRestriction,

    #[serde(other)]
    Other,
}

impl SubBeaconKind {
    /// Whether the restriction originates from the signal itself.
    pub fn is_signal_sourced(self) -> bool {
        matches!(self, Self::StopIfRestricting | Self::SignalRestriction)
    }
}
