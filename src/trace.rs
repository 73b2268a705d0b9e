//! Recorded traces: frames captured from the simulator, one per line.
//!
//! ```text
//! {"screen":"loading","snapshot":{...},"signals":[]}
//! {"screen":"mainGame","snapshot":{...},"signals":[{...}]}
//! ```
//!
//! Replaying a trace through the bridge reproduces the beacons a live
//! session would have sent.

use std::{
    fs,
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use crate::model::Frame;

/// Errors that can occur while reading a trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("trace not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

pub type Result<T> = core::result::Result<T, TraceError>;

/// Loads every frame of the trace at `path`.
pub fn read_trace(path: &Path) -> Result<Vec<Frame>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TraceError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    read_frames(io::BufReader::new(file))
}

/// Parses frames from JSONL, skipping blank lines.
pub fn read_frames(reader: impl BufRead) -> Result<Vec<Frame>> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = serde_json::from_str(&line).map_err(|source| TraceError::Json {
            line: index + 1,
            source,
        })?;
        frames.push(frame);
    }
    Ok(frames)
}
