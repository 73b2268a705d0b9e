//! Beacon sinks: where derived beacons go.
//!
//! The ATS device consumes beacons one at a time, in order. A sink is
//! whatever stands in for it: the device binding itself, a JSONL log of
//! what would have been sent, or a plain recorder for tests.

use std::io::{self, Write};

use crate::model::BeaconRecord;

/// Errors that can occur while delivering a beacon.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, SinkError>;

/// Accepts beacons in the order they are derived.
pub trait BeaconSink {
    fn send(&mut self, record: &BeaconRecord) -> Result<()>;
}

/// Writes each beacon as one line of JSON.
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> BeaconSink for JsonlSink<W> {
    fn send(&mut self, record: &BeaconRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Keeps every beacon in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<BeaconRecord>,
}

#[cfg(test)]
impl BeaconSink for RecordingSink {
    fn send(&mut self, record: &BeaconRecord) -> Result<()> {
        self.records.push(*record);
        Ok(())
    }
}
