//! Telemetry: the per-cycle snapshot of train motion and timetable state.

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

/// One cycle's worth of train state, as published by the simulator.
///
/// Distances are in meters, speeds in km/h. `total_length` is the distance
/// the train has run since the start of the diagram and is the absolute
/// coordinate that signal positions are locked against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// Diagram (train number) identifier. Its last digit encodes direction.
    pub dia_name: String,

    /// Distance run since the start of the diagram.
    pub total_length: f32,

    /// Current speed.
    pub speed: f32,

    /// Current gradient in permille.
    pub gradient: f32,

    /// Speed limit in force at the train's position.
    pub speed_limit: f32,

    /// Upcoming speed limit, or a non-positive value when there is none.
    pub next_speed_limit: f32,

    /// Distance to where `next_speed_limit` takes effect.
    pub next_speed_limit_distance: f32,

    /// How the train calls at the next stop.
    pub next_stop_type: StopType,

    /// Distance to the stopping position at the next stop.
    pub next_stop_distance: f32,

    /// Name of the next stop.
    pub next_stop_name: String,

    /// Index into `stations` of the current timetable entry.
    pub station_index: usize,

    /// Timetable for the run.
    #[serde(default)]
    pub stations: Vec<Station>,

    /// Distance to the next timetable checkpoint shown to the driver.
    pub next_checkpoint_distance: f32,
}

/// A timetable entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,

    /// Absolute position of the station along the diagram.
    pub total_length: f32,

    /// Scheduled arrival (or passing) time, measured from the midnight the
    /// operating day starts at. Runs past midnight go beyond 24 hours.
    #[serde(with = "clock")]
    pub arrival_time: SignedDuration,

    pub stop_type: StopType,
}

/// How a train calls at a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopType {
    /// Passenger stop.
    Stop,

    /// Operational stop without passenger service.
    OperationalStop,

    /// Passes through without stopping.
    Passing,

    /// No stop information.
    #[default]
    None,
}

impl StopType {
    /// Whether the train comes to a halt, with or without passengers.
    pub fn is_scheduled_stop(self) -> bool {
        matches!(self, Self::Stop | Self::OperationalStop)
    }
}

/// Arrival times written as `H:MM:SS`, where the hours may exceed 23.
mod clock {
    use jiff::SignedDuration;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(offset: &SignedDuration, serializer: S) -> Result<S::Ok, S::Error> {
        let secs = offset.as_secs();
        serializer.collect_str(&format_args!(
            "{}:{:02}:{:02}",
            secs / 3600,
            secs % 3600 / 60,
            secs % 60
        ))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SignedDuration, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| D::Error::custom(format!("invalid arrival time {text:?}, expected H:MM:SS")))
    }

    fn parse(text: &str) -> Option<SignedDuration> {
        let mut fields = text.split(':').map(|field| field.parse::<u32>().ok());
        let (Some(Some(hours)), Some(Some(minutes)), Some(Some(seconds)), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return None;
        };
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        let total = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
        Some(SignedDuration::from_secs(total))
    }
}
