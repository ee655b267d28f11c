/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::errors::MathError;
use crate::math::Vector3;
use hifitime::Epoch;
use snafu::prelude::*;

pub mod kepler;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EphemerisError {
    #[snafu(display(
        "epoch {epoch} is outside the ephemeris validity window [{start}, {end}]"
    ))]
    OutOfValidityWindow {
        epoch: Epoch,
        start: Epoch,
        end: Epoch,
    },
    #[snafu(display("body {name} is not present in the ephemeris"))]
    UnknownBody { name: String },
    #[snafu(display("ephemeris computation failed: {source}"))]
    EphemMath { source: MathError },
}

/// A read-only table of position and velocity at a date, in the heliocentric ecliptic
/// J2000 frame, in meters and meters per second.
pub trait Ephemeris {
    /// Returns the position and velocity of the named body at the provided instant.
    fn state_m(&self, name: &str, epoch: Epoch) -> Result<(Vector3, Vector3), EphemerisError>;

    /// First instant served by this provider.
    fn first_valid_epoch(&self) -> Epoch;

    /// Last instant served by this provider.
    fn last_valid_epoch(&self) -> Epoch;

    /// Whether the provided instant lies within the validity window.
    fn covers(&self, epoch: Epoch) -> bool {
        epoch >= self.first_valid_epoch() && epoch <= self.last_valid_epoch()
    }
}
