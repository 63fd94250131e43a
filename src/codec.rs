use crate::dlog;
use crate::error::{CodecError, ModelError};
use crate::store::KeyValueStore;
use crate::types::{Activity, Detail, Position, Workout, WorkoutKind};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Key the workout collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "workouts";

/// One workout as it appears in the stored blob.
///
/// `description`, `pace` and `speed` are written for readers of the blob but
/// never read back: they are derived again from the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub date: DateTime<FixedOffset>,
    pub position: Position,
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default, skip_deserializing)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(w: &Workout) -> Self {
        let (cadence, pace, elevation, speed) = match w.detail() {
            Detail::Running { cadence, pace } => (Some(cadence), Some(pace), None, None),
            Detail::Cycling {
                elevation_gain,
                speed,
            } => (None, None, Some(elevation_gain), Some(speed)),
        };

        Self {
            id: w.id().to_string(),
            date: *w.date(),
            position: w.position(),
            distance: w.distance(),
            duration: w.duration(),
            kind: w.kind(),
            description: w.description().to_string(),
            cadence,
            pace,
            elevation,
            speed,
        }
    }
}

/// Rebuilds the variant named by `type`, re-deriving metric and description.
impl TryFrom<WorkoutRecord> for Workout {
    type Error = ModelError;

    fn try_from(r: WorkoutRecord) -> Result<Self, Self::Error> {
        let activity = match r.kind {
            WorkoutKind::Running => Activity::Running {
                cadence: r.cadence.ok_or(ModelError::Missing("cadence"))?,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain: r.elevation.ok_or(ModelError::Missing("elevation"))?,
            },
        };

        Self::new(
            r.id.into(),
            r.date,
            r.position,
            r.distance,
            r.duration,
            activity,
        )
    }
}

pub fn encode(workouts: &[Workout]) -> Result<String, CodecError> {
    let records: Vec<WorkoutRecord> = workouts.iter().map(WorkoutRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parses a stored blob. Each record is decoded on its own: one that is
/// malformed or no longer makes a valid workout is skipped with a warning and
/// the rest are kept. Only a blob that isn't a JSON list is an error.
pub fn decode(blob: &str) -> Result<Vec<Workout>, CodecError> {
    let values: Vec<JsonValue> = serde_json::from_str(blob)?;
    let total = values.len();

    let mut out = Vec::with_capacity(total);
    for (idx, v) in values.into_iter().enumerate() {
        let id = v.get("id").and_then(JsonValue::as_str).unwrap_or("?").to_string();
        let record = match serde_json::from_value::<WorkoutRecord>(v) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(idx, id = %id, err = %e, "skipping malformed stored workout");
                continue;
            }
        };
        match Workout::try_from(record) {
            Ok(w) => out.push(w),
            Err(e) => tracing::warn!(idx, id = %id, err = %e, "skipping stored workout"),
        }
    }

    dlog!("decoded records={} kept={}", total, out.len());
    Ok(out)
}

/// Reads and writes the whole workout collection under one key.
#[derive(Debug, Clone)]
pub struct Codec {
    key: String,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl Codec {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrites the stored blob with `workouts`.
    pub fn save<S>(&self, store: &mut S, workouts: &[Workout]) -> Result<(), CodecError>
    where
        S: KeyValueStore + ?Sized,
    {
        let blob = encode(workouts)?;
        store.set(&self.key, &blob)?;
        dlog!("saved key={} workouts={}", self.key, workouts.len());
        Ok(())
    }

    /// Stored workouts in creation order; empty when nothing is stored.
    pub fn load<S>(&self, store: &S) -> Result<Vec<Workout>, CodecError>
    where
        S: KeyValueStore + ?Sized,
    {
        match store.get(&self.key)? {
            Some(blob) => decode(&blob),
            None => Ok(Vec::new()),
        }
    }

    pub fn reset<S>(&self, store: &mut S) -> Result<(), CodecError>
    where
        S: KeyValueStore + ?Sized,
    {
        store.remove(&self.key)?;
        Ok(())
    }
}
