use crate::types::{Position, WorkoutKind};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB: &str = "runmap.sqlite";

#[derive(Parser, Debug)]
#[command(
    name = "runmap",
    about = "Mark running and cycling workouts on a map and keep them between sessions"
)]
pub struct Cli {
    /// SQLite file holding the stored workouts.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB, global = true)]
    pub db: PathBuf,

    /// Your current position as LAT,LNG. Without it no location fix is available.
    #[arg(long, value_name = "LAT,LNG", global = true)]
    pub home: Option<Position>,

    /// Map zoom level.
    #[arg(long, default_value_t = crate::session::DEFAULT_ZOOM, global = true)]
    pub zoom: u8,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Click the map at a position and submit a workout there.
    Add {
        /// Where the workout happened, as LAT,LNG.
        #[arg(long, value_name = "LAT,LNG")]
        at: Position,

        /// running or cycling
        #[arg(long = "type", value_name = "TYPE", default_value = "running")]
        kind: WorkoutKind,

        /// Distance in km.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        distance: String,

        /// Duration in minutes.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        duration: String,

        /// Steps per minute (running).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        cadence: String,

        /// Elevation gain in meters (cycling).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },

    /// Show every stored workout, newest first.
    List,

    /// Centre the map on a stored workout.
    Focus {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Remove every stored workout and start over.
    Reset,
}
