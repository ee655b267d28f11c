/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

extern crate pretty_env_logger;

use std::env::{set_var, var};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use helion::prelude::*;
use helion::system::SimulationError;
use log::info;
use snafu::prelude::*;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const LOG_VAR: &str = "HELION_LOG";

#[derive(Parser)]
#[command(name = "helion", about = "Propagate and inspect the HELION Solar System simulation")]
struct Args {
    #[command(subcommand)]
    action: Actions,
}

#[derive(Subcommand)]
enum Actions {
    /// Prints the heliocentric state of every body at the provided UTC epoch
    Show {
        /// UTC epoch, e.g. "2000-01-01T12:00:00 UTC"
        epoch: String,
    },
    /// Propagates from the provided epoch by a signed number of hours and prints the result
    Advance {
        /// UTC epoch, e.g. "2000-01-01T12:00:00 UTC"
        epoch: String,
        /// Number of Δt = 3600 s steps; negative steps backward in time
        hours: i64,
        /// Enables the first-order relativistic correction
        #[arg(long)]
        relativity: bool,
        /// Saves the final simulation state to this file
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Resumes a saved simulation and prints its state
    Resume { snapshot: PathBuf },
}

#[derive(Debug, Snafu)]
enum CliErrors {
    #[snafu(display("could not parse {epoch} as an epoch (try \"2000-01-01T12:00:00 UTC\")"))]
    EpochParsing { epoch: String },
    #[snafu(display("{source}"))]
    CliSimulation { source: SimulationError },
    #[snafu(display("{source}"))]
    CliSnapshot {
        source: helion::system::snapshot::SnapshotError,
    },
}

#[derive(Tabled)]
struct BodyRow {
    #[tabled(rename = "Body")]
    name: String,
    #[tabled(rename = "X (km)")]
    x_km: String,
    #[tabled(rename = "Y (km)")]
    y_km: String,
    #[tabled(rename = "Z (km)")]
    z_km: String,
    #[tabled(rename = "Speed (km/s)")]
    speed_km_s: String,
}

fn state_table(solar: &SolarSystem) -> Table {
    let rows: Vec<BodyRow> = solar
        .system
        .iter()
        .map(|(name, particle)| BodyRow {
            name: name.clone(),
            x_km: format!("{:.1}", particle.position_m.x / 1e3),
            y_km: format!("{:.1}", particle.position_m.y / 1e3),
            z_km: format!("{:.1}", particle.position_m.z / 1e3),
            speed_km_s: format!("{:.4}", particle.velocity_m_s.norm() / 1e3),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table
}

fn parse_epoch(epoch: &str) -> Result<Epoch, CliErrors> {
    Epoch::from_str(epoch).map_err(|_| CliErrors::EpochParsing {
        epoch: epoch.to_string(),
    })
}

fn main() -> Result<(), CliErrors> {
    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "INFO");
    }
    let _ = pretty_env_logger::try_init_custom_env(LOG_VAR);

    let cli = Args::parse();
    match cli.action {
        Actions::Show { epoch } => {
            let epoch = parse_epoch(&epoch)?;
            let solar = SolarSystem::try_new(epoch).context(CliSimulationSnafu)?;
            println!("{}", state_table(&solar));
        }
        Actions::Advance {
            epoch,
            hours,
            relativity,
            snapshot,
        } => {
            let epoch = parse_epoch(&epoch)?;
            let mut solar = SolarSystem::try_new(epoch).context(CliSimulationSnafu)?;
            solar
                .set_general_relativity(relativity)
                .context(CliSimulationSnafu)?;
            if hours >= 0 {
                solar.advance_forward(hours as usize);
            } else {
                solar.advance_backward(hours.unsigned_abs() as usize);
            }
            info!("propagated to {}", solar.epoch());
            println!("{}", state_table(&solar));
            if let Some(path) = snapshot {
                solar.save_state(path).context(CliSimulationSnafu)?;
            }
        }
        Actions::Resume { snapshot } => {
            let snap = SimulationSnapshot::load(&snapshot).context(CliSnapshotSnafu)?;
            let solar = SolarSystem::from_snapshot(&snap).context(CliSimulationSnafu)?;
            info!("resumed {snap}");
            println!("{}", state_table(&solar));
        }
    }
    Ok(())
}
