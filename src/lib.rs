/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

extern crate hifitime;
extern crate log;

pub mod bodies;
pub mod constants;
pub mod dynamics;
pub mod ephemeris;
pub mod errors;
pub mod math;
pub mod propagation;
pub mod system;

/// Re-export of hifitime
pub mod time {
    pub use core::str::FromStr;
    pub use hifitime::*;
}

pub mod prelude {
    pub use crate::bodies::Constants;
    pub use crate::dynamics::{GravityModel, Particle};
    pub use crate::ephemeris::{kepler::KeplerEphemeris, Ephemeris, EphemerisError};
    pub use crate::errors::InputOutputError;
    pub use crate::propagation::{subsystem::MoonSystem, ParticleSystem};
    pub use crate::system::{snapshot::SimulationSnapshot, SimulationError, SolarSystem};
    pub use crate::time::*;
    pub use std::fs::File;
}

/// Memory maps a file and **copies** the data on the heap prior to returning a pointer to this heap data.
#[macro_export]
macro_rules! file2heap {
    ($filename:tt) => {
        match File::open($filename) {
            Err(e) => Err($crate::errors::InputOutputError::IOError { kind: e.kind() }),
            Ok(file) => unsafe {
                use bytes::Bytes;
                use memmap2::MmapOptions;
                match MmapOptions::new().map(&file) {
                    Err(_) => Err($crate::errors::InputOutputError::IOUnknownError),
                    Ok(mmap) => {
                        let bytes = Bytes::copy_from_slice(&mmap);
                        Ok(bytes)
                    }
                }
            },
        }
    };
}
