use crate::error::ModelError;
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Number of trailing timestamp digits kept in a workout id.
const ID_DIGITS: u64 = 10_000_000_000;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Position {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.lat, p.lng]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// Parses `"LAT,LNG"`, as typed on the command line.
impl FromStr for Position {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ModelError::BadPosition(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(bad)?;
        let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
        let lng: f64 = lng.trim().parse().map_err(|_| bad())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(bad());
        }
        Ok(Self { lat, lng })
    }
}

/// The persisted type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }

    /// CSS-style class the map uses for this kind's marker popup.
    pub fn popup_class(self) -> String {
        format!("{}-popup", self.as_str())
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            _ => Err(ModelError::UnknownKind(s.to_string())),
        }
    }
}

/// Type-specific input supplied when a workout is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Running { cadence: f64 },
    Cycling { elevation_gain: f64 },
}

impl Activity {
    pub const fn kind(self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Type-specific payload, including the derived metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detail {
    /// `pace` is min/km.
    Running { cadence: f64, pace: f64 },
    /// `speed` is km/h; `elevation_gain` may be zero or negative.
    Cycling { elevation_gain: f64, speed: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for WorkoutId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Hands out ids from the millisecond clock, never repeating within a session.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Option<i64>,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self { last: None }
    }

    pub fn next_id(&mut self) -> WorkoutId {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Id for a reading of `now_ms`; bumps past the previous id if the clock stalled.
    pub fn next_at(&mut self, now_ms: i64) -> WorkoutId {
        let ms = match self.last {
            Some(last) if now_ms <= last => last + 1,
            _ => now_ms,
        };
        self.last = Some(ms);
        WorkoutId(format!("{:010}", ms.unsigned_abs() % ID_DIGITS))
    }
}

/// One recorded workout. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    date: DateTime<FixedOffset>,
    position: Position,
    distance: f64,
    duration: f64,
    description: String,
    detail: Detail,
}

impl Workout {
    /// Builds a workout and derives its metric and description.
    ///
    /// `distance` (km), `duration` (min) and a running `cadence` must be
    /// positive finite numbers. Cycling elevation gain only has to be finite.
    pub fn new(
        id: WorkoutId,
        date: DateTime<FixedOffset>,
        position: Position,
        distance: f64,
        duration: f64,
        activity: Activity,
    ) -> Result<Self, ModelError> {
        require_positive("distance", distance)?;
        require_positive("duration", duration)?;

        let detail = match activity {
            Activity::Running { cadence } => {
                require_positive("cadence", cadence)?;
                Detail::Running {
                    cadence,
                    pace: pace(distance, duration),
                }
            }
            Activity::Cycling { elevation_gain } => {
                if !elevation_gain.is_finite() {
                    return Err(ModelError::NotANumber("elevation"));
                }
                Detail::Cycling {
                    elevation_gain,
                    speed: speed(distance, duration),
                }
            }
        };

        let metric = match detail {
            Detail::Running { pace, .. } => pace,
            Detail::Cycling { speed, .. } => speed,
        };
        if !metric.is_finite() {
            return Err(ModelError::OutOfRange(match activity.kind() {
                WorkoutKind::Running => "pace",
                WorkoutKind::Cycling => "speed",
            }));
        }

        let description = describe(activity.kind(), &date);

        Ok(Self {
            id,
            date,
            position,
            distance,
            duration,
            description,
            detail,
        })
    }

    pub const fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub const fn date(&self) -> &DateTime<FixedOffset> {
        &self.date
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn detail(&self) -> Detail {
        self.detail
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self.detail {
            Detail::Running { .. } => WorkoutKind::Running,
            Detail::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    pub const fn activity(&self) -> Activity {
        match self.detail {
            Detail::Running { cadence, .. } => Activity::Running { cadence },
            Detail::Cycling { elevation_gain, .. } => Activity::Cycling { elevation_gain },
        }
    }

    /// Pace in min/km for runs, speed in km/h for rides.
    pub const fn metric(&self) -> f64 {
        match self.detail {
            Detail::Running { pace, .. } => pace,
            Detail::Cycling { speed, .. } => speed,
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ModelError> {
    if !value.is_finite() {
        return Err(ModelError::NotANumber(field));
    }
    if value <= 0.0 {
        return Err(ModelError::NotPositive(field));
    }
    Ok(())
}

/// Rounds to one decimal on the exact binary value, so `0.15` (stored just
/// below the half) gives `0.1`. Exact halves such as `0.25` round up.
fn round1(x: f64) -> f64 {
    // exact one-decimal ties are odd multiples of 0.05, i.e. odd quarters
    let quarters = x * 4.0;
    let tie = quarters.fract() == 0.0 && quarters % 2.0 != 0.0;
    let text = if tie {
        format!("{:.1}", x + 0.05)
    } else {
        format!("{x:.1}")
    };
    text.parse().unwrap_or(x)
}

/// Minutes per km, one decimal.
pub fn pace(distance: f64, duration: f64) -> f64 {
    round1(duration / distance)
}

/// Km per hour, one decimal.
pub fn speed(distance: f64, duration: f64) -> f64 {
    round1(distance / (duration / 60.0))
}

/// `"running on March 5"`, in the offset the date was recorded in.
pub fn describe(kind: WorkoutKind, date: &DateTime<FixedOffset>) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{kind} on {month} {}", date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(m: u32, d: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, m, d, 9, 30, 0)
            .unwrap()
    }

    fn run(distance: f64, duration: f64, cadence: f64) -> Result<Workout, ModelError> {
        Workout::new(
            "1".into(),
            date(3, 5),
            Position::new(51.5, -0.1),
            distance,
            duration,
            Activity::Running { cadence },
        )
    }

    fn ride(distance: f64, duration: f64, elevation_gain: f64) -> Result<Workout, ModelError> {
        Workout::new(
            "2".into(),
            date(12, 31),
            Position::new(48.85, 2.35),
            distance,
            duration,
            Activity::Cycling { elevation_gain },
        )
    }

    #[test]
    fn running_pace_is_minutes_per_km() {
        let w = run(5.0, 30.0, 170.0).unwrap();
        assert_eq!(w.kind(), WorkoutKind::Running);
        assert!((w.metric() - 6.0).abs() < f64::EPSILON);
        assert_eq!(
            w.detail(),
            Detail::Running {
                cadence: 170.0,
                pace: 6.0
            }
        );
    }

    #[test]
    fn pace_rounds_to_one_decimal() {
        let w = run(3.0, 20.0, 160.0).unwrap();
        assert!((w.metric() - 6.7).abs() < 1e-9);
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = ride(20.0, 60.0, 150.0).unwrap();
        assert!((w.metric() - 20.0).abs() < f64::EPSILON);

        let w = ride(27.0, 95.0, 0.0).unwrap();
        assert!((w.metric() - 17.1).abs() < 1e-9);
    }

    #[test]
    fn rounding_follows_the_stored_binary_value() {
        assert!((round1(0.15) - 0.1).abs() < 1e-12);
        assert!((round1(0.25) - 0.3).abs() < 1e-12);
        assert!((round1(0.35) - 0.3).abs() < 1e-12);
        assert!((round1(2.75) - 2.8).abs() < 1e-12);
        assert!((round1(6.04) - 6.0).abs() < 1e-12);
        assert!((round1(1e300) - 1e300).abs() <= 1e300 * f64::EPSILON);
    }

    #[test]
    fn rejects_metrics_that_overflow() {
        assert_eq!(
            run(1e-300, 1e300, 170.0).unwrap_err(),
            ModelError::OutOfRange("pace")
        );
        assert_eq!(
            ride(1e300, 1e-300, 0.0).unwrap_err(),
            ModelError::OutOfRange("speed")
        );
    }

    #[test]
    fn cycling_accepts_flat_and_downhill() {
        assert!(ride(10.0, 30.0, 0.0).is_ok());
        assert!(ride(10.0, 30.0, -120.0).is_ok());
    }

    #[test]
    fn rejects_non_positive_core_fields() {
        assert_eq!(
            run(0.0, 30.0, 170.0).unwrap_err(),
            ModelError::NotPositive("distance")
        );
        assert_eq!(
            run(5.0, -1.0, 170.0).unwrap_err(),
            ModelError::NotPositive("duration")
        );
        assert_eq!(
            run(5.0, 30.0, 0.0).unwrap_err(),
            ModelError::NotPositive("cadence")
        );
        assert_eq!(
            ride(f64::NAN, 30.0, 10.0).unwrap_err(),
            ModelError::NotANumber("distance")
        );
    }

    #[test]
    fn description_uses_month_table_and_day() {
        assert_eq!(run(5.0, 30.0, 170.0).unwrap().description(), "running on March 5");
        assert_eq!(
            ride(20.0, 60.0, 10.0).unwrap().description(),
            "cycling on December 31"
        );
    }

    #[test]
    fn ids_never_repeat_when_clock_stalls() {
        let mut ids = IdGenerator::new();
        let a = ids.next_at(1_700_000_000_123);
        let b = ids.next_at(1_700_000_000_123);
        let c = ids.next_at(1_700_000_000_100);
        assert_eq!(a.as_str(), "0000000123");
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(c.as_str(), "0000000125");
    }

    #[test]
    fn id_keeps_last_ten_digits() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_at(1_712_345_678_901).as_str(), "2345678901");
    }

    #[test]
    fn parses_position_from_cli_text() {
        let p: Position = "51.5, -0.12".parse().unwrap();
        assert_eq!(p, Position::new(51.5, -0.12));
        assert!("51.5".parse::<Position>().is_err());
        assert!("91,0".parse::<Position>().is_err());
        assert!("a,b".parse::<Position>().is_err());
    }

    #[test]
    fn parses_kind_case_insensitively() {
        assert_eq!("Running".parse::<WorkoutKind>().unwrap(), WorkoutKind::Running);
        assert_eq!("cycling".parse::<WorkoutKind>().unwrap(), WorkoutKind::Cycling);
        assert!("swimming".parse::<WorkoutKind>().is_err());
        assert_eq!(WorkoutKind::Cycling.popup_class(), "cycling-popup");
    }
}
