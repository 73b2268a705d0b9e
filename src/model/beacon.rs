//! Beacon records: the wire contract with the ATS device.

use serde::{Deserialize, Serialize};

/// A beacon passed to the ATS device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeaconRecord {
    /// Beacon type, serialized as its numeric code.
    #[serde(rename = "type")]
    pub kind: BeaconKind,

    /// Type-specific integer payload.
    pub payload: i32,

    /// Aspect ordinal of the signal the beacon belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<u8>,

    /// Distance to the signal the beacon belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

impl BeaconRecord {
    /// A beacon that only carries a payload.
    pub fn new(kind: BeaconKind, payload: i32) -> Self {
        Self {
            kind,
            payload,
            signal: None,
            distance: None,
        }
    }

    /// A beacon tied to a signal ahead.
    pub fn at_signal(kind: BeaconKind, payload: i32, signal: u8, distance: f32) -> Self {
        Self {
            kind,
            payload,
            signal: Some(signal),
            distance: Some(distance),
        }
    }
}

/// Beacon type codes understood by the ATS device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum BeaconKind {
    /// Current or upcoming speed limit.
    SpeedLimit,
    /// Maximum service speed.
    MaxServiceSpeed,
    /// Gradient in permille.
    Gradient,
    /// Signal aspect table entry.
    AspectTableEntry,
    /// Signal ahead.
    SignalAhead,
    /// Speed restriction attached to a signal.
    SignalRestriction,
    /// Scheduled arrival time.
    ScheduleArrival,
    /// Distance to the scheduled checkpoint.
    ScheduleDistance,
    /// Distance to the stopping position, fed to TASC.
    TascProximity,
    /// Stopping tolerance, fed to TASC.
    StopTolerance,
}

impl BeaconKind {
    pub const ALL: [Self; 10] = [
        Self::SpeedLimit,
        Self::MaxServiceSpeed,
        Self::Gradient,
        Self::AspectTableEntry,
        Self::SignalAhead,
        Self::SignalRestriction,
        Self::ScheduleArrival,
        Self::ScheduleDistance,
        Self::TascProximity,
        Self::StopTolerance,
    ];

    pub fn code(self) -> u16 {
        match self {
            Self::SpeedLimit => 1006,
            Self::MaxServiceSpeed => 1007,
            Self::Gradient => 1008,
            Self::AspectTableEntry => 1011,
            Self::SignalAhead => 1012,
            Self::SignalRestriction => 1016,
            Self::ScheduleArrival => 1028,
            Self::ScheduleDistance => 1029,
            Self::TascProximity => 1030,
            Self::StopTolerance => 1031,
        }
    }
}

/// Pack a distance in whole meters and a small value into one payload, as
/// `distance * 1000 + value`. Saturates at the `i32` bounds instead of
/// overflowing when the distance is out of range.
pub fn packed_payload(distance: f32, value: i32) -> i32 {
    (distance as i32).saturating_mul(1000).saturating_add(value)
}

/// A numeric code with no matching beacon type.
#[derive(Debug, thiserror::Error)]
#[error("unknown beacon type code: {0}")]
pub struct UnknownBeaconCode(pub u16);

impl From<BeaconKind> for u16 {
    fn from(kind: BeaconKind) -> Self {
        kind.code()
    }
}

impl TryFrom<u16> for BeaconKind {
    type Error = UnknownBeaconCode;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(UnknownBeaconCode(code))
    }
}
