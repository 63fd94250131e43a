#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result};
use clap::Parser;
use runmap::cli::{Cli, Cmd};
use runmap::render::{TerminalMap, format_entry};
use runmap::{
    FixedLocation, FormInput, KeyValueStore, LocationProvider, MapProvider, Session,
    SessionConfig, SqliteStore, WorkoutId, utils,
};
use std::io;

#[macro_use]
extern crate runmap;

const NO_FIX: &str = "no map without a location fix (pass --home)";

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let mut store = SqliteStore::open(&cli.db)?;
    let config = SessionConfig {
        zoom: cli.zoom,
        ..SessionConfig::default()
    };
    dlog!("db={} home={:?} zoom={}", cli.db.display(), cli.home, cli.zoom);

    let mut map = TerminalMap::new(io::stdout());
    let list = matches!(cli.cmd, Cmd::List);
    {
        let mut session = Session::new(config, FixedLocation::new(cli.home), &mut map, &mut store);
        run(&mut session, cli.cmd)?;
    }
    if list {
        map.print_sidebar();
    }

    Ok(())
}

fn run<L, M, S>(session: &mut Session<L, M, S>, cmd: Cmd) -> Result<()>
where
    L: LocationProvider,
    M: MapProvider,
    S: KeyValueStore,
{
    match cmd {
        Cmd::Add {
            at,
            kind,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            session.start().context(NO_FIX)?;
            session.map_clicked(at, kind)?;
            let input = FormInput {
                distance,
                duration,
                cadence,
                elevation,
            };
            let workout = session.submit(input)?;
            println!("{}", format_entry(workout));
        }
        Cmd::List => {
            session.start().context(NO_FIX)?;
        }
        Cmd::Focus { id } => {
            session.start().context(NO_FIX)?;
            session.list_entry_clicked(&WorkoutId::from(id))?;
        }
        Cmd::Reset => {
            if let Err(e) = session.reset() {
                tracing::info!(err = %e, "stored workouts cleared; map not restarted");
            }
            println!("stored workouts cleared");
        }
    }

    Ok(())
}
