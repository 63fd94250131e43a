//! Record running and cycling workouts at map locations.
//!
//! The hosting shell wires three collaborators into a [`Session`]: a
//! [`LocationProvider`] for the initial fix, a [`MapProvider`] that draws
//! markers, the sidebar and the form, and a [`KeyValueStore`] that keeps the
//! workout collection between sessions.

pub mod cli;
pub mod codec;
pub mod error;
pub mod provider;
pub mod render;
pub mod session;
pub mod store;
pub mod types;
pub mod utils;
pub mod validate;

pub use codec::Codec;
pub use error::SessionError;
pub use provider::{FixedLocation, LocationProvider, MapProvider};
pub use session::{Session, SessionConfig, SessionState};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use types::{Activity, Detail, Position, Workout, WorkoutId, WorkoutKind};
pub use validate::FormInput;
