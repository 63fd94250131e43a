use crate::provider::MapProvider;
use crate::types::{Detail, Position, Workout, WorkoutKind};
use std::fmt;
use std::io::Write;
use std::time::Duration;

/// Draws the session as text lines. The sidebar list is kept newest first and
/// printed on demand.
pub struct TerminalMap<W: Write> {
    out: W,
    sidebar: Vec<String>,
    markers: usize,
}

impl<W: Write> TerminalMap<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            sidebar: Vec::new(),
            markers: 0,
        }
    }

    pub fn sidebar(&self) -> &[String] {
        &self.sidebar
    }

    pub const fn marker_count(&self) -> usize {
        self.markers
    }

    pub fn print_sidebar(&mut self) {
        if self.sidebar.is_empty() {
            self.line(format_args!("(no workouts yet)"));
            return;
        }
        let rows = std::mem::take(&mut self.sidebar);
        for row in &rows {
            self.line(format_args!("{row}"));
        }
        self.sidebar = rows;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}") {
            tracing::warn!(err = %e, "terminal write failed");
        }
    }
}

fn fields_for(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "distance (km), duration (min), cadence (spm)",
        WorkoutKind::Cycling => "distance (km), duration (min), elevation gain (m)",
    }
}

/// One sidebar row.
pub fn format_entry(w: &Workout) -> String {
    let (icon, metric, extra) = match w.detail() {
        Detail::Running { cadence, pace } => {
            ("🏃", format!("{pace:.1} min/km"), format!("{cadence} spm"))
        }
        Detail::Cycling {
            elevation_gain,
            speed,
        } => ("🚴", format!("{speed:.1} km/h"), format!("{elevation_gain} m")),
    };
    format!(
        "[{}] {icon} {} | {} km | {} min | {metric} | {extra}",
        w.id(),
        w.description(),
        w.distance(),
        w.duration(),
    )
}

impl<W: Write> MapProvider for TerminalMap<W> {
    fn init_view(&mut self, center: Position, zoom: u8) {
        self.line(format_args!("map centred on {center} (zoom {zoom})"));
    }

    fn add_marker(&mut self, position: Position, popup: &str, style_class: &str) {
        self.markers += 1;
        self.line(format_args!("marker {position} [{style_class}] {popup}"));
    }

    fn set_view(&mut self, position: Position, zoom: u8, animate: bool) {
        let how = if animate { "pan" } else { "jump" };
        self.line(format_args!("map {how} to {position} (zoom {zoom})"));
    }

    fn add_list_entry(&mut self, workout: &Workout) {
        self.sidebar.insert(0, format_entry(workout));
    }

    fn clear(&mut self) {
        self.sidebar.clear();
        self.markers = 0;
        self.line(format_args!("map cleared"));
    }

    fn show_form(&mut self, kind: WorkoutKind) {
        self.line(format_args!("form open ({kind}): {}", fields_for(kind)));
    }

    fn show_fields_for(&mut self, kind: WorkoutKind) {
        self.line(format_args!("form fields ({kind}): {}", fields_for(kind)));
    }

    fn hide_form(&mut self, reveal_after: Duration) {
        self.line(format_args!(
            "form hidden ({} ms)",
            reveal_after.as_millis()
        ));
    }

    fn clear_form(&mut self) {}

    fn alert(&mut self, message: &str) {
        self.line(format_args!("alert: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Activity;
    use chrono::{FixedOffset, TimeZone};

    fn workout(id: &str, activity: Activity) -> Workout {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 14, 7, 0, 0)
            .unwrap();
        Workout::new(id.into(), date, Position::new(1.0, 2.0), 20.0, 60.0, activity).unwrap()
    }

    #[test]
    fn formats_running_and_cycling_rows() {
        let run = workout("0000000001", Activity::Running { cadence: 170.0 });
        assert_eq!(
            format_entry(&run),
            "[0000000001] 🏃 running on July 14 | 20 km | 60 min | 3.0 min/km | 170 spm"
        );

        let ride = workout(
            "0000000002",
            Activity::Cycling {
                elevation_gain: -15.0,
            },
        );
        assert_eq!(
            format_entry(&ride),
            "[0000000002] 🚴 cycling on July 14 | 20 km | 60 min | 20.0 km/h | -15 m"
        );
    }

    #[test]
    fn sidebar_lists_newest_first() {
        let mut map = TerminalMap::new(Vec::new());
        map.add_list_entry(&workout("1", Activity::Running { cadence: 170.0 }));
        map.add_list_entry(&workout("2", Activity::Running { cadence: 170.0 }));
        assert!(map.sidebar()[0].starts_with("[2]"));
        assert!(map.sidebar()[1].starts_with("[1]"));

        map.print_sidebar();
        let text = String::from_utf8(map.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[2]"));
    }

    #[test]
    fn writes_markers_and_alerts() {
        let mut map = TerminalMap::new(Vec::new());
        map.add_marker(Position::new(1.0, 2.0), "running on July 14", "running-popup");
        map.alert("All values should be positive numbers");
        assert_eq!(map.marker_count(), 1);

        let text = String::from_utf8(map.into_inner()).unwrap();
        assert!(text.contains("marker 1.00000,2.00000 [running-popup] running on July 14"));
        assert!(text.contains("alert: All values should be positive numbers"));
    }
}
