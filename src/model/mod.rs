//! Core data model for the bridge.
//!
//! These types describe what crosses the bridge's boundaries:
//! frames and telemetry read from the simulator, signal reports,
//! and the beacon records handed to the ATS device.

mod beacon;
mod frame;
mod signal;
mod telemetry;

pub use beacon::{BeaconKind, BeaconRecord, packed_payload};
pub use frame::{Frame, GameScreen};
pub use signal::{SignalReport, SubBeaconKind};
pub use telemetry::{StopType, TelemetrySnapshot};

// Only constructed directly by tests; everywhere else they arrive via serde.
#[cfg(test)]
pub use signal::SubBeacon;
#[cfg(test)]
pub use telemetry::Station;
