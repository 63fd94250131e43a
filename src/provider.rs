use crate::error::SessionError;
use crate::types::{Position, Workout, WorkoutKind};
use std::time::Duration;

/// One-shot source of the user's current position.
pub trait LocationProvider {
    /// Resolves the position once; `Err(LocationUnavailable)` if it can't.
    fn current_position(&mut self) -> Result<Position, SessionError>;
}

/// Everything the session draws: the map itself, the sidebar list, the form,
/// and the alert channel.
pub trait MapProvider {
    fn init_view(&mut self, center: Position, zoom: u8);
    fn add_marker(&mut self, position: Position, popup: &str, style_class: &str);
    fn set_view(&mut self, position: Position, zoom: u8, animate: bool);

    /// Adds a row for `workout` to the sidebar list.
    fn add_list_entry(&mut self, workout: &Workout);
    /// Drops every marker and list row.
    fn clear(&mut self);

    fn show_form(&mut self, kind: WorkoutKind);
    /// Swaps the visible type-specific input group.
    fn show_fields_for(&mut self, kind: WorkoutKind);
    /// Hides the form now; it only becomes visible again after `reveal_after`.
    fn hide_form(&mut self, reveal_after: Duration);
    fn clear_form(&mut self);

    fn alert(&mut self, message: &str);
}

/// Lets a caller lend its map to a session and keep using it afterwards.
impl<M: MapProvider + ?Sized> MapProvider for &mut M {
    fn init_view(&mut self, center: Position, zoom: u8) {
        (**self).init_view(center, zoom);
    }

    fn add_marker(&mut self, position: Position, popup: &str, style_class: &str) {
        (**self).add_marker(position, popup, style_class);
    }

    fn set_view(&mut self, position: Position, zoom: u8, animate: bool) {
        (**self).set_view(position, zoom, animate);
    }

    fn add_list_entry(&mut self, workout: &Workout) {
        (**self).add_list_entry(workout);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn show_form(&mut self, kind: WorkoutKind) {
        (**self).show_form(kind);
    }

    fn show_fields_for(&mut self, kind: WorkoutKind) {
        (**self).show_fields_for(kind);
    }

    fn hide_form(&mut self, reveal_after: Duration) {
        (**self).hide_form(reveal_after);
    }

    fn clear_form(&mut self) {
        (**self).clear_form();
    }

    fn alert(&mut self, message: &str) {
        (**self).alert(message);
    }
}

/// Location fix known up front, e.g. from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    position: Option<Position>,
}

impl FixedLocation {
    pub const fn new(position: Option<Position>) -> Self {
        Self { position }
    }
}

impl LocationProvider for FixedLocation {
    fn current_position(&mut self) -> Result<Position, SessionError> {
        self.position.ok_or(SessionError::LocationUnavailable)
    }
}
