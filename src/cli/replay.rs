//! Replay command: run a recorded trace through the bridge.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::bridge::{Bridge, SkipReason, Step};
use crate::config::Config;
use crate::model::{BeaconKind, BeaconRecord};
use crate::sink::{self, BeaconSink, JsonlSink};
use crate::trace;

use super::format::format_replay_summary;

/// Frame and beacon counts for one replay.
#[derive(Debug, Default)]
pub(super) struct ReplaySummary {
    pub processed: usize,
    pub not_driving: usize,
    pub stalled: usize,
    pub beacons: BTreeMap<BeaconKind, usize>,
}

/// Counts beacons by kind on their way to the inner sink.
struct Tally<S> {
    inner: S,
    counts: BTreeMap<BeaconKind, usize>,
}

impl<S: BeaconSink> BeaconSink for Tally<S> {
    fn send(&mut self, record: &BeaconRecord) -> sink::Result<()> {
        self.inner.send(record)?;
        *self.counts.entry(record.kind).or_default() += 1;
        Ok(())
    }
}

pub(super) fn cmd_replay(
    config: &Config,
    trace_path: &Path,
    out: Option<&Path>,
) -> Result<(), String> {
    let frames = trace::read_trace(trace_path).map_err(|e| format!("failed to read trace: {e}"))?;

    let writer: Box<dyn Write> = match out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).map_err(|e| format!("failed to create {}: {e}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let sink = Tally {
        inner: JsonlSink::new(writer),
        counts: BTreeMap::new(),
    };
    let mut bridge = Bridge::new(config.engine_settings(), sink);

    let mut summary = ReplaySummary::default();
    for (index, frame) in frames.iter().enumerate() {
        let step = bridge
            .step(frame)
            .map_err(|e| format!("frame {}: {e}", index + 1))?;
        match step {
            Step::Processed { .. } => summary.processed += 1,
            Step::Skipped(SkipReason::NotDriving) => summary.not_driving += 1,
            Step::Skipped(SkipReason::Stalled) => summary.stalled += 1,
        }
    }

    let tally = bridge.into_sink();
    tally
        .inner
        .into_inner()
        .map_err(|e| format!("failed to write beacons: {e}"))?;
    summary.beacons = tally.counts;

    eprint!("{}", format_replay_summary(&summary));
    if let Some(path) = out {
        eprintln!("Beacons → {}", path.display());
    }
    Ok(())
}
