use crate::types::WorkoutId;
use thiserror::Error;

/// Message shown for every rejected form submission.
pub const INVALID_INPUT_MESSAGE: &str = "All values should be positive numbers";

/// Message shown when no location fix could be obtained.
pub const LOCATION_UNAVAILABLE_MESSAGE: &str = "Could not get your position";

/// A workout could not be built from the given values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{0} is not a number")]
    NotANumber(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{0} is too large to represent")]
    OutOfRange(&'static str),
    #[error("{0} is missing")]
    Missing(&'static str),
    #[error("unknown workout type: {0:?}")]
    UnknownKind(String),
    #[error("expected LAT,LNG in degrees, got {0:?}")]
    BadPosition(String),
}

/// Raw form values failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{0} is not a number")]
    NotANumber(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("stored workouts are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures reported by the session controller. None of them end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not get your position")]
    LocationUnavailable,
    #[error("All values should be positive numbers")]
    InvalidInput(#[source] InputError),
    #[error("the map is not ready yet (no location fix)")]
    NotReady,
    #[error("the workout form is not open")]
    FormNotOpen,
    #[error("no workout with id {0}")]
    UnknownWorkout(WorkoutId),
    #[error(transparent)]
    Model(#[from] ModelError),
}
