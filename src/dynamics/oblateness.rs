/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::constants::{DAYS_PER_JULIAN_CENTURY, OBLIQUITY_J2000_DEG};
use crate::errors::{PhysicsResult, TooFewZonalCoefficientsSnafu, TooManyZonalCoefficientsSnafu};
use crate::math::legendre::{legendre_derivatives, legendre_polynomials, MAX_LEGENDRE_DEGREE};
use crate::math::rotation::{pole_rotation, r1};
use crate::math::Vector3;
use hifitime::Epoch;
use snafu::ensure;

/// Capacity of the zonal coefficient storage, J_0 through J_{MAX_LEGENDRE_DEGREE}.
pub const MAX_ZONAL_COEFFS: usize = MAX_LEGENDRE_DEGREE + 1;

/// Below this cosine of latitude, the longitude angles are undefined and pinned to (1, 0).
const LATITUDE_SINGULARITY_TOL: f64 = f64::EPSILON;

/// The zonal coefficients J_0..J_nmax of an axially symmetric gravity field.
///
/// J_0 and J_1 are placeholders so that the index matches the degree; physical data starts
/// at J_2.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZonalHarmonics {
    count: u8,
    coeffs: [f64; MAX_ZONAL_COEFFS],
}

impl ZonalHarmonics {
    /// Builds the zonal set from a J_0..J_nmax slice. At least three entries are required
    /// (J_2 is the first physical coefficient) and at most [`MAX_ZONAL_COEFFS`] are supported.
    pub fn try_new(data: &[f64]) -> PhysicsResult<Self> {
        ensure!(data.len() >= 3, TooFewZonalCoefficientsSnafu { count: data.len() });
        ensure!(
            data.len() <= MAX_ZONAL_COEFFS,
            TooManyZonalCoefficientsSnafu {
                count: data.len(),
                max: MAX_ZONAL_COEFFS
            }
        );
        let mut coeffs = [0.0; MAX_ZONAL_COEFFS];
        coeffs[..data.len()].copy_from_slice(data);
        Ok(Self {
            count: data.len() as u8,
            coeffs,
        })
    }

    /// Highest degree of the stored coefficients.
    pub fn degree(&self) -> usize {
        self.count as usize - 1
    }

    /// Returns J_n, or zero beyond the stored degree.
    pub fn j(&self, n: usize) -> f64 {
        if n <= self.degree() {
            self.coeffs[n]
        } else {
            0.0
        }
    }
}

/// Linear motion of a body's north pole: right ascension and declination at the reference
/// epoch, and their rates in degrees per Julian century of 36525 days.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PoleMotion {
    /// Reference epoch T_0 as a Julian date.
    pub epoch_jde: f64,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub ra_rate_deg_cy: f64,
    pub dec_rate_deg_cy: f64,
}

impl PoleMotion {
    /// Pole direction (α, δ) at the provided instant, in radians.
    pub fn pole_at(&self, epoch: Epoch) -> (f64, f64) {
        let centuries = (epoch.to_jde_utc_days() - self.epoch_jde) / DAYS_PER_JULIAN_CENTURY;
        (
            (self.ra_deg + centuries * self.ra_rate_deg_cy).to_radians(),
            (self.dec_deg + centuries * self.dec_rate_deg_cy).to_radians(),
        )
    }
}

/// Gravity of an oblate body: a zonal-harmonic expansion around the point-mass field,
/// oriented by a time-varying pole.
///
/// The pole (α, δ) is cached at construction at its T_0 value; only the moon sub-systems
/// refresh it, via [`OblateGravity::update_pole`].
#[derive(Copy, Clone, Debug)]
pub struct OblateGravity {
    /// μ of the oblate field. Defaults to the body's μ but may be set separately.
    pub mu_m3_s2: f64,
    pub eq_radius_m: f64,
    pub zonal: ZonalHarmonics,
    pub pole: PoleMotion,
    /// Obliquity of the ecliptic used by the frame chain, in radians.
    pub obliquity_rad: f64,
    ra_rad: f64,
    dec_rad: f64,
}

impl OblateGravity {
    pub fn try_new(
        mu_m3_s2: f64,
        eq_radius_m: f64,
        zonal_coefficients: &[f64],
        pole: PoleMotion,
    ) -> PhysicsResult<Self> {
        let zonal = ZonalHarmonics::try_new(zonal_coefficients)?;
        Ok(Self {
            mu_m3_s2,
            eq_radius_m,
            zonal,
            pole,
            obliquity_rad: OBLIQUITY_J2000_DEG.to_radians(),
            ra_rad: pole.ra_deg.to_radians(),
            dec_rad: pole.dec_deg.to_radians(),
        })
    }

    /// Currently cached pole direction in radians.
    pub fn pole_ra_dec_rad(&self) -> (f64, f64) {
        (self.ra_rad, self.dec_rad)
    }

    /// Recomputes the cached pole direction for the provided instant.
    pub fn update_pole(&mut self, epoch: Epoch) {
        let (ra_rad, dec_rad) = self.pole.pole_at(epoch);
        self.ra_rad = ra_rad;
        self.dec_rad = dec_rad;
    }

    /// Transforms a vector from the ecliptic frame to this body's equatorial frame, going
    /// through the Earth equatorial frame.
    pub fn ecliptic_to_equatorial(&self, v: &Vector3) -> Vector3 {
        pole_rotation(self.ra_rad, self.dec_rad) * (r1(-self.obliquity_rad) * v)
    }

    /// Transforms a vector from this body's equatorial frame back to the ecliptic frame.
    pub fn equatorial_to_ecliptic(&self, v: &Vector3) -> Vector3 {
        r1(self.obliquity_rad) * (pole_rotation(self.ra_rad, self.dec_rad).transpose() * v)
    }

    /// The zonal perturbation beyond the point-mass field, at a position expressed in the
    /// body equatorial frame. Returns the zero vector (to round-off) when all J_n vanish.
    ///
    /// The accumulation runs over the local (radial, east, north) triad; the east component
    /// is identically zero for an axially symmetric field.
    pub fn zonal_perturbation(&self, r_eq: &Vector3) -> Vector3 {
        let r = r_eq.norm();
        let xi = r_eq.z / r;
        let nmax = self.zonal.degree();

        let p = legendre_polynomials(xi, nmax);
        let dp = legendre_derivatives(xi, nmax, &p);

        let sin_lat = xi;
        let cos_lat = (1.0 - xi * xi).max(0.0).sqrt();
        let (cos_lon, sin_lon) = if cos_lat <= LATITUDE_SINGULARITY_TOL {
            (1.0, 0.0)
        } else {
            (r_eq.x / (cos_lat * r), r_eq.y / (cos_lat * r))
        };

        let rho = self.eq_radius_m / r;
        let mut rho_n = rho * rho;
        let mut radial = 0.0;
        let mut northward = 0.0;
        for n in 2..=nmax {
            let jn = self.zonal.j(n);
            radial += rho_n * jn * (n + 1) as f64 * p[n];
            northward += -rho_n * cos_lat * jn * dp[n];
            rho_n *= rho;
        }
        radial /= r * r;
        northward /= r * r;

        self.mu_m3_s2
            * Vector3::new(
                radial * cos_lat * cos_lon - northward * sin_lat * cos_lon,
                radial * cos_lat * sin_lon - northward * sin_lat * sin_lon,
                radial * sin_lat + northward * cos_lat,
            )
    }

    /// Complete acceleration of this field at a position relative to the body, expressed in
    /// the ecliptic frame.
    ///
    /// The central term is applied here (the perturbation minus μ·r̂/r²): call sites replace
    /// the Newtonian point force with this result, they never add both.
    pub fn acceleration_m_s2(&self, rel_pos_ecl: &Vector3) -> Vector3 {
        let r_eq = self.ecliptic_to_equatorial(rel_pos_ecl);
        let r = r_eq.norm();
        let total_eq = self.zonal_perturbation(&r_eq) - self.mu_m3_s2 * r_eq / r.powi(3);
        self.equatorial_to_ecliptic(&total_eq)
    }
}
