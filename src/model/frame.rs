//! Frames: what the simulator exposes in one polling cycle.

use serde::{Deserialize, Serialize};

use super::{signal::SignalReport, telemetry::TelemetrySnapshot};

/// Everything read from the simulator in one cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Which screen the game is showing.
    pub screen: GameScreen,

    pub snapshot: TelemetrySnapshot,

    /// Signals visible ahead of the train.
    #[serde(default)]
    pub signals: Vec<SignalReport>,
}

/// The game screen at the time of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameScreen {
    /// Driving.
    MainGame,

    /// Loading a run, either freshly selected or restarted.
    Loading,

    /// Driving, paused.
    Paused,

    /// Anything outside a run: title, menus, results.
    #[serde(other)]
    Menu,
}
