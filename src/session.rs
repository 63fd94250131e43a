//! The click-to-record controller.
//!
//! A session waits for a location fix, then alternates between a closed and
//! an open workout form. Every successful submission appends one workout,
//! renders it, and writes the whole collection back to the store.

use crate::codec::{Codec, DEFAULT_STORAGE_KEY};
use crate::dlog;
use crate::error::{INVALID_INPUT_MESSAGE, LOCATION_UNAVAILABLE_MESSAGE, SessionError};
use crate::provider::{LocationProvider, MapProvider};
use crate::store::KeyValueStore;
use crate::types::{IdGenerator, Position, Workout, WorkoutId, WorkoutKind};
use crate::validate::{FormInput, validate};
use chrono::Local;
use std::time::Duration;

pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_FORM_REVEAL_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Zoom used for the initial view and when focusing a workout.
    pub zoom: u8,
    /// How long the form stays hidden after a successful submission.
    pub form_reveal_delay: Duration,
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            form_reveal_delay: DEFAULT_FORM_REVEAL_DELAY,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Where the session is, as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingLocation,
    /// Map ready, form hidden.
    FormClosed,
    FormOpen,
}

#[derive(Debug)]
enum Phase {
    AwaitingLocation { requested: bool },
    Ready { form: Form },
}

#[derive(Debug)]
enum Form {
    Closed,
    Open {
        click: Position,
        kind: WorkoutKind,
        draft: FormInput,
    },
}

pub struct Session<L, M, S> {
    config: SessionConfig,
    codec: Codec,
    location: L,
    map: M,
    store: S,
    phase: Phase,
    workouts: Vec<Workout>,
    ids: IdGenerator,
}

impl<L, M, S> Session<L, M, S>
where
    L: LocationProvider,
    M: MapProvider,
    S: KeyValueStore,
{
    pub fn new(config: SessionConfig, location: L, map: M, store: S) -> Self {
        let codec = Codec::new(config.storage_key.clone());
        Self {
            config,
            codec,
            location,
            map,
            store,
            phase: Phase::AwaitingLocation { requested: false },
            workouts: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    pub const fn state(&self) -> SessionState {
        match self.phase {
            Phase::AwaitingLocation { .. } => SessionState::AwaitingLocation,
            Phase::Ready { form: Form::Closed } => SessionState::FormClosed,
            Phase::Ready {
                form: Form::Open { .. },
            } => SessionState::FormOpen,
        }
    }

    /// Workouts in creation order.
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn workout(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// What the user last typed into the open form, kept after a rejected submit.
    pub const fn form_draft(&self) -> Option<&FormInput> {
        match &self.phase {
            Phase::Ready {
                form: Form::Open { draft, .. },
            } => Some(draft),
            _ => None,
        }
    }

    /// Asks for the location fix. On success the map is initialised and the
    /// stored workouts are loaded and drawn.
    ///
    /// The fix is requested once per session; after a failure the session stays
    /// in `AwaitingLocation` until [`Session::reset`].
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Ready { .. } => {
                dlog!("start ignored: map already ready");
                return Ok(());
            }
            Phase::AwaitingLocation { requested: true } => {
                dlog!("start ignored: location already requested");
                return Err(SessionError::LocationUnavailable);
            }
            Phase::AwaitingLocation { requested: false } => {}
        }

        self.phase = Phase::AwaitingLocation { requested: true };

        match self.location.current_position() {
            Ok(center) => {
                self.location_acquired(center);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(err = %e, "no location fix");
                self.map.alert(LOCATION_UNAVAILABLE_MESSAGE);
                Err(SessionError::LocationUnavailable)
            }
        }
    }

    fn location_acquired(&mut self, center: Position) {
        self.map.init_view(center, self.config.zoom);
        self.phase = Phase::Ready { form: Form::Closed };

        let restored = match self.codec.load(&self.store) {
            Ok(ws) => ws,
            Err(e) => {
                tracing::warn!(err = %e, key = self.codec.key(), "could not load stored workouts");
                Vec::new()
            }
        };

        for w in &restored {
            render(&mut self.map, w);
        }
        self.workouts = restored;
        if !self.workouts.is_empty() {
            self.persist();
        }

        tracing::info!(
            center = %center,
            workouts = self.workouts.len(),
            "map ready"
        );
    }

    /// Opens the form for a workout at `at`. `kind` is the type currently
    /// selected in the form.
    pub fn map_clicked(&mut self, at: Position, kind: WorkoutKind) -> Result<(), SessionError> {
        let Phase::Ready { form } = &mut self.phase else {
            return Err(SessionError::NotReady);
        };

        match form {
            Form::Closed => {
                *form = Form::Open {
                    click: at,
                    kind,
                    draft: FormInput::default(),
                };
                self.map.show_form(kind);
                dlog!("form opened at={} kind={}", at, kind);
            }
            Form::Open {
                click,
                kind: selected,
                ..
            } => {
                *click = at;
                if *selected != kind {
                    *selected = kind;
                    self.map.show_fields_for(kind);
                }
                dlog!("form moved at={} kind={}", at, kind);
            }
        }

        Ok(())
    }

    /// Switches the open form between running and cycling fields.
    pub fn select_kind(&mut self, kind: WorkoutKind) -> Result<(), SessionError> {
        let Phase::Ready { form } = &mut self.phase else {
            return Err(SessionError::NotReady);
        };
        let Form::Open { kind: selected, .. } = form else {
            return Err(SessionError::FormNotOpen);
        };

        *selected = kind;
        self.map.show_fields_for(kind);
        Ok(())
    }

    /// Validates the form and records the workout.
    ///
    /// On rejection the user sees one uniform alert, nothing is created or
    /// stored, and the form stays open holding `input` as typed.
    pub fn submit(&mut self, input: FormInput) -> Result<&Workout, SessionError> {
        let Phase::Ready { form } = &mut self.phase else {
            return Err(SessionError::NotReady);
        };
        let Form::Open { click, kind, draft } = form else {
            return Err(SessionError::FormNotOpen);
        };
        let (click, kind) = (*click, *kind);

        let built = validate(kind, &input)
            .map_err(SessionError::InvalidInput)
            .and_then(|m| {
                Workout::new(
                    self.ids.next_id(),
                    Local::now().fixed_offset(),
                    click,
                    m.distance,
                    m.duration,
                    m.activity,
                )
                .map_err(SessionError::from)
            });
        let workout = match built {
            Ok(w) => w,
            Err(e) => {
                dlog!("submit rejected kind={} err={}", kind, e);
                *draft = input;
                self.map.alert(INVALID_INPUT_MESSAGE);
                return Err(e);
            }
        };

        render(&mut self.map, &workout);
        tracing::info!(
            id = %workout.id(),
            kind = %kind,
            distance = workout.distance(),
            duration = workout.duration(),
            metric = workout.metric(),
            "workout created"
        );
        self.workouts.push(workout);
        self.persist();

        self.map.clear_form();
        self.map.hide_form(self.config.form_reveal_delay);
        self.phase = Phase::Ready { form: Form::Closed };

        let last = self.workouts.len() - 1;
        Ok(&self.workouts[last])
    }

    /// Centres the map on a listed workout. Never changes state.
    pub fn list_entry_clicked(&mut self, id: &WorkoutId) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Ready { .. }) {
            return Err(SessionError::NotReady);
        }
        let position = self
            .workout(id)
            .map(Workout::position)
            .ok_or_else(|| SessionError::UnknownWorkout(id.clone()))?;

        self.map.set_view(position, self.config.zoom, true);
        Ok(())
    }

    /// Removes everything stored and starts over, as a fresh page load would.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.codec.reset(&mut self.store) {
            tracing::warn!(err = %e, key = self.codec.key(), "could not clear stored workouts");
        }
        self.workouts.clear();
        self.map.clear();
        self.phase = Phase::AwaitingLocation { requested: false };
        tracing::info!("session reset");

        self.start()
    }

    fn persist(&mut self) {
        if let Err(e) = self.codec.save(&mut self.store, &self.workouts) {
            tracing::warn!(err = %e, key = self.codec.key(), "could not store workouts");
        }
    }
}

fn render<M: MapProvider>(map: &mut M, w: &Workout) {
    map.add_marker(w.position(), w.description(), &w.kind().popup_class());
    map.add_list_entry(w);
}
