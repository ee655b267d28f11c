/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use super::{Ephemeris, EphemerisError, UnknownBodySnafu};
use crate::bodies::Constants;
use crate::constants::{
    DAYS_PER_JULIAN_CENTURY, EPHEMERIS_FIRST_JDE, EPHEMERIS_LAST_JDE, JDE_J2000,
};
use crate::errors::MathError;
use crate::math::{rotate_about_x, rotate_about_z, Vector3};
use hifitime::Epoch;
use indexmap::IndexMap;
use snafu::OptionExt;

/// Convergence tolerance of the Kepler solver, in radians.
const KEPLER_TOL_RAD: f64 = 1e-12;
const KEPLER_MAX_ITER: usize = 50;

/// Mean Keplerian elements at J2000 with secular rates per Julian century, in the ecliptic
/// frame of the center body. The layout follows the JPL approximate ephemerides (Standish):
/// semi-major axis, eccentricity, inclination, mean longitude, longitude of perihelion and
/// longitude of the ascending node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeanElements {
    pub sma_m: f64,
    pub sma_rate_m_cy: f64,
    pub ecc: f64,
    pub ecc_rate_cy: f64,
    pub inc_deg: f64,
    pub inc_rate_deg_cy: f64,
    pub mean_longitude_deg: f64,
    pub mean_longitude_rate_deg_cy: f64,
    pub long_peri_deg: f64,
    pub long_peri_rate_deg_cy: f64,
    pub long_node_deg: f64,
    pub long_node_rate_deg_cy: f64,
}

impl MeanElements {
    /// Propagates the elements to `centuries` past J2000 and solves for the Cartesian
    /// state around a center of parameter μ.
    pub fn state_m(&self, mu_m3_s2: f64, centuries: f64) -> Result<(Vector3, Vector3), MathError> {
        let sma = self.sma_m + centuries * self.sma_rate_m_cy;
        let ecc = self.ecc + centuries * self.ecc_rate_cy;
        let inc = (self.inc_deg + centuries * self.inc_rate_deg_cy).to_radians();
        let mean_longitude =
            self.mean_longitude_deg + centuries * self.mean_longitude_rate_deg_cy;
        let long_peri = self.long_peri_deg + centuries * self.long_peri_rate_deg_cy;
        let long_node =
            (self.long_node_deg + centuries * self.long_node_rate_deg_cy).to_radians();

        let arg_peri = long_peri.to_radians() - long_node;
        let mean_anomaly = (mean_longitude - long_peri).rem_euclid(360.0).to_radians();

        let ecc_anomaly = solve_kepler(mean_anomaly, ecc)?;
        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let radius = sma * (1.0 - ecc * cos_e);

        // Perifocal state: periapsis along +x, motion counterclockwise.
        let pos_pqw = Vector3::new(
            sma * (cos_e - ecc),
            sma * (1.0 - ecc * ecc).sqrt() * sin_e,
            0.0,
        );
        let e_dot = (mu_m3_s2 / sma.powi(3)).sqrt() / (1.0 - ecc * cos_e);
        let vel_pqw = Vector3::new(
            -sma * sin_e * e_dot,
            sma * (1.0 - ecc * ecc).sqrt() * cos_e * e_dot,
            0.0,
        );
        debug_assert!(radius > 0.0);

        // Perifocal -> ecliptic: argument of periapsis, inclination, node longitude.
        let to_ecliptic = |v: &Vector3| {
            rotate_about_z(&rotate_about_x(&rotate_about_z(v, arg_peri), inc), long_node)
        };
        Ok((to_ecliptic(&pos_pqw), to_ecliptic(&vel_pqw)))
    }
}

/// Solves Kepler's equation E - e sin E = M by Newton iteration.
pub fn solve_kepler(mean_anomaly_rad: f64, ecc: f64) -> Result<f64, MathError> {
    // Near-parabolic orbits converge poorly from E = M; start from π instead.
    let mut ecc_anomaly = if ecc > 0.8 {
        core::f64::consts::PI
    } else {
        mean_anomaly_rad + ecc * mean_anomaly_rad.sin()
    };
    for _ in 0..KEPLER_MAX_ITER {
        let delta = (mean_anomaly_rad - (ecc_anomaly - ecc * ecc_anomaly.sin()))
            / (1.0 - ecc * ecc_anomaly.cos());
        ecc_anomaly += delta;
        if delta.abs() < KEPLER_TOL_RAD {
            return Ok(ecc_anomaly);
        }
    }
    Err(MathError::MaxIterationsReached {
        iter: KEPLER_MAX_ITER,
        action: "solving Kepler's equation",
    })
}

struct KeplerRecord {
    center: Option<String>,
    elements: MeanElements,
    mu_m3_s2: f64,
}

/// The built-in approximate ephemeris: mean Keplerian elements propagated analytically.
///
/// Planetary elements come from the JPL approximate ephemerides; the validity window is
/// 3000 BC to AD 3000. Moons are laid out around their host, so a moon query returns the
/// host's heliocentric state plus the moon's planetocentric one.
pub struct KeplerEphemeris {
    records: IndexMap<String, KeplerRecord>,
    first: Epoch,
    last: Epoch,
}

impl KeplerEphemeris {
    /// Builds the provider from the body catalogue. The gravitational parameter of each
    /// orbit is the sum of the center's and the body's, as for the reduced two-body
    /// problem.
    pub fn from_constants(constants: &Constants) -> Self {
        let mut records = IndexMap::new();
        for body in constants.iter() {
            let Some(elements) = body.elements else {
                continue;
            };
            let center_name = body.center.unwrap_or(crate::constants::celestial_bodies::SUN);
            let center_mu = constants
                .get(center_name)
                .map(|c| c.mu_m3_s2)
                .unwrap_or(0.0);
            records.insert(
                body.name.to_string(),
                KeplerRecord {
                    center: body.center.map(str::to_string),
                    elements,
                    mu_m3_s2: center_mu + body.mu_m3_s2,
                },
            );
        }
        Self {
            records,
            first: Epoch::from_jde_utc(EPHEMERIS_FIRST_JDE),
            last: Epoch::from_jde_utc(EPHEMERIS_LAST_JDE),
        }
    }
}

impl Ephemeris for KeplerEphemeris {
    fn state_m(&self, name: &str, epoch: Epoch) -> Result<(Vector3, Vector3), EphemerisError> {
        if !self.covers(epoch) {
            return Err(EphemerisError::OutOfValidityWindow {
                epoch,
                start: self.first,
                end: self.last,
            });
        }
        // The frame is heliocentric: the Sun is its origin.
        if name == crate::constants::celestial_bodies::SUN {
            return Ok((Vector3::zeros(), Vector3::zeros()));
        }
        let record = self
            .records
            .get(name)
            .with_context(|| UnknownBodySnafu { name })?;

        let centuries = (epoch.to_jde_utc_days() - JDE_J2000) / DAYS_PER_JULIAN_CENTURY;
        let (local_pos, local_vel) = record
            .elements
            .state_m(record.mu_m3_s2, centuries)
            .map_err(|source| EphemerisError::EphemMath { source })?;

        match &record.center {
            None => Ok((local_pos, local_vel)),
            Some(center) => {
                let (center_pos, center_vel) = self.state_m(center, epoch)?;
                Ok((center_pos + local_pos, center_vel + local_vel))
            }
        }
    }

    fn first_valid_epoch(&self) -> Epoch {
        self.first
    }

    fn last_valid_epoch(&self) -> Epoch {
        self.last
    }
}
