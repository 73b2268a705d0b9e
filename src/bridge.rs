//! The bridge: gate frames into the engine and forward its beacons.
//!
//! The engine assumes every call is a fresh tick of a running simulation.
//! The bridge makes that true. It resets the engine at run boundaries and
//! holds back frames in which the simulation did not advance.

use tracing::{debug, info};

use crate::engine::{self, EngineError, EngineSettings, TickState};
use crate::model::{Frame, GameScreen};
use crate::sink::{BeaconSink, SinkError};

/// Errors that stop a replay or session.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to deliver beacon: {0}")]
    Sink(#[from] SinkError),
}

/// What happened to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The engine ran and this many beacons were delivered.
    Processed { emitted: usize },

    /// The frame was not passed to the engine.
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not driving: loading, paused, or in a menu.
    NotDriving,

    /// Speed unchanged and non-zero: the simulation did not advance.
    Stalled,
}

/// Why the engine state was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunBoundary {
    /// First frame seen.
    Startup,

    /// A train was selected from outside a run.
    TrainSelected,

    /// The run was restarted from the pause menu.
    DiagramReloaded,
}

pub struct Bridge<S> {
    settings: EngineSettings,
    state: TickState,
    sink: S,
    previous_screen: Option<GameScreen>,
    previous_speed: f32,
}

impl<S: BeaconSink> Bridge<S> {
    pub fn new(settings: EngineSettings, sink: S) -> Self {
        Self {
            settings,
            state: TickState::new(),
            sink,
            previous_screen: None,
            previous_speed: 0.0,
        }
    }

    /// Feed one frame through the gate and, if it passes, the engine.
    pub fn step(&mut self, frame: &Frame) -> Result<Step, BridgeError> {
        if let Some(boundary) = self.run_boundary(frame.screen) {
            info!(?boundary, dia = %frame.snapshot.dia_name, "new run");
            let ledger = self.state.ledger();
            if !ledger.is_empty() {
                debug!(signals = ledger.len(), "forgetting confirmed signals");
            }
            self.state.reset();
            self.previous_speed = 0.0;
        }

        let skip = self.gate(frame);
        self.previous_screen = Some(frame.screen);
        self.previous_speed = frame.snapshot.speed;
        if let Some(reason) = skip {
            return Ok(Step::Skipped(reason));
        }

        let beacons = engine::tick(
            &mut self.state,
            &self.settings,
            &frame.snapshot,
            &frame.signals,
        )?;
        for beacon in &beacons {
            self.sink.send(beacon)?;
        }
        Ok(Step::Processed {
            emitted: beacons.len(),
        })
    }

    /// Consumes the bridge, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn run_boundary(&self, screen: GameScreen) -> Option<RunBoundary> {
        let Some(previous) = self.previous_screen else {
            return Some(RunBoundary::Startup);
        };
        // Loading straight out of a running game keeps the run.
        match (previous, screen) {
            (GameScreen::Paused, GameScreen::Loading) => Some(RunBoundary::DiagramReloaded),
            (GameScreen::Menu, GameScreen::Loading) => Some(RunBoundary::TrainSelected),
            _ => None,
        }
    }

    #[allow(clippy::float_cmp)] // An exactly repeated speed means a repeated frame.
    fn gate(&self, frame: &Frame) -> Option<SkipReason> {
        if frame.screen != GameScreen::MainGame {
            return Some(SkipReason::NotDriving);
        }
        let speed = frame.snapshot.speed;
        if speed != 0.0 && speed == self.previous_speed {
            debug!(speed, "simulation stalled, skipping frame");
            return Some(SkipReason::Stalled);
        }
        None
    }
}
