use crate::error::InputError;
use crate::types::{Activity, WorkoutKind};

/// Raw text of the workout form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl FormInput {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }
}

/// Validated numbers, ready to build a workout from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub distance: f64,
    pub duration: f64,
    pub activity: Activity,
}

/// Coerces a form field to a number. Anything that isn't one becomes NaN.
///
/// Blank fields count as not a number.
pub fn parse_number(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return f64::NAN;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

pub fn check_numbers(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

pub fn check_positive(values: &[f64]) -> bool {
    values.iter().all(|&v| v > 0.0)
}

/// Checks the fields the selected workout type needs.
///
/// Every field must be a number. Distance and duration must be positive, and
/// so must a run's cadence. A ride's elevation gain may be zero or negative.
pub fn validate(kind: WorkoutKind, form: &FormInput) -> Result<Measurements, InputError> {
    let distance = parse_number(&form.distance);
    let duration = parse_number(&form.duration);

    let (name, extra) = match kind {
        WorkoutKind::Running => ("cadence", parse_number(&form.cadence)),
        WorkoutKind::Cycling => ("elevation", parse_number(&form.elevation)),
    };

    let fields = [("distance", distance), ("duration", duration), (name, extra)];
    if !check_numbers(&[distance, duration, extra]) {
        let (field, _) = fields
            .iter()
            .find(|(_, v)| !v.is_finite())
            .copied()
            .unwrap_or(fields[0]);
        return Err(InputError::NotANumber(field));
    }

    let required: &[(&'static str, f64)] = match kind {
        WorkoutKind::Running => &fields,
        WorkoutKind::Cycling => &fields[..2],
    };
    let values: Vec<f64> = required.iter().map(|&(_, v)| v).collect();
    if !check_positive(&values) {
        let (field, _) = required
            .iter()
            .find(|&&(_, v)| v <= 0.0)
            .copied()
            .unwrap_or(fields[0]);
        return Err(InputError::NotPositive(field));
    }

    let activity = match kind {
        WorkoutKind::Running => Activity::Running { cadence: extra },
        WorkoutKind::Cycling => Activity::Cycling {
            elevation_gain: extra,
        },
    };

    Ok(Measurements {
        distance,
        duration,
        activity,
    })
}
