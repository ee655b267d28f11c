/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::constants::{GRAVITATIONAL_CONSTANT, OBLATENESS_RANGE_M};
use crate::math::Vector3;

pub mod oblateness;
pub mod relativity;

pub use oblateness::{OblateGravity, PoleMotion, ZonalHarmonics};

/// Newtonian acceleration exerted at `target_pos` by an attractor of parameter μ at `attractor_pos`.
pub fn newtonian_gravity_m_s2(attractor_pos: &Vector3, mu_m3_s2: f64, target_pos: &Vector3) -> Vector3 {
    let rel = attractor_pos - target_pos;
    let dist = rel.norm();
    mu_m3_s2 * rel / dist.powi(3)
}

/// The acceleration strategy of an attractor: a point mass, or an oblate body whose zonal
/// field replaces the point force inside the oblateness range.
#[derive(Copy, Clone, Debug)]
pub enum GravityModel {
    PointMass,
    Oblate(OblateGravity),
}

impl GravityModel {
    /// Returns whether this strategy carries oblateness data.
    pub const fn is_oblate(&self) -> bool {
        matches!(self, Self::Oblate(_))
    }
}

/// Snapshot of a massive particle taken before an acceleration evaluation. The strategy is
/// resolved per attractor, once per evaluation, without dynamic dispatch.
#[derive(Copy, Clone, Debug)]
pub struct Attractor {
    /// Index of the source particle in its system, used to skip self-attraction.
    pub index: usize,
    pub position_m: Vector3,
    pub velocity_m_s: Vector3,
    pub mu_m3_s2: f64,
    pub model: GravityModel,
}

impl Attractor {
    /// Acceleration exerted by this attractor at the provided position.
    ///
    /// Oblate attractors use their zonal field only within [`OBLATENESS_RANGE_M`]; beyond
    /// that range the plain Newtonian form applies.
    pub fn acceleration_at(&self, target_pos: &Vector3) -> Vector3 {
        if let GravityModel::Oblate(oblate) = &self.model {
            if (target_pos - self.position_m).norm() <= OBLATENESS_RANGE_M {
                return oblate.acceleration_m_s2(&(target_pos - self.position_m));
            }
        }
        newtonian_gravity_m_s2(&self.position_m, self.mu_m3_s2, target_pos)
    }
}

/// The per-particle scratch of one Runge-Kutta stage: the state derivative evaluated at the
/// sub-step, i.e. the sub-step velocity and the sub-step acceleration.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct RkStage {
    pub d_pos: Vector3,
    pub d_vel: Vector3,
}

/// A massive point: position, velocity and the acceleration scratch of the current
/// evaluation, plus the Runge-Kutta stage buffers.
///
/// μ is carried independently of the mass so that a test particle may have zero mass and
/// still feel gravity. Setting the mass refreshes μ = G·m; setting μ directly leaves the
/// recorded mass untouched.
#[derive(Clone, Debug)]
pub struct Particle {
    mass_kg: f64,
    mu_m3_s2: f64,
    pub position_m: Vector3,
    pub velocity_m_s: Vector3,
    pub acceleration_m_s2: Vector3,
    pub(crate) stages: [RkStage; 4],
    pub model: GravityModel,
}

impl Particle {
    /// Creates a new particle at the provided state; μ is derived from the mass.
    pub fn new(mass_kg: f64, position_m: Vector3, velocity_m_s: Vector3) -> Self {
        Self {
            mass_kg,
            mu_m3_s2: GRAVITATIONAL_CONSTANT * mass_kg,
            position_m,
            velocity_m_s,
            acceleration_m_s2: Vector3::zeros(),
            stages: [RkStage::default(); 4],
            model: GravityModel::PointMass,
        }
    }

    /// Creates a massless test particle: it feels every attractor but attracts nothing.
    pub fn massless(position_m: Vector3, velocity_m_s: Vector3) -> Self {
        Self::new(0.0, position_m, velocity_m_s)
    }

    /// Attaches the oblate acceleration strategy to this particle.
    pub fn with_oblateness(mut self, oblateness: OblateGravity) -> Self {
        self.model = GravityModel::Oblate(oblateness);
        self
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn mu_m3_s2(&self) -> f64 {
        self.mu_m3_s2
    }

    /// Sets the mass and refreshes μ = G·m.
    pub fn set_mass_kg(&mut self, mass_kg: f64) {
        self.mass_kg = mass_kg;
        self.mu_m3_s2 = GRAVITATIONAL_CONSTANT * mass_kg;
    }

    /// Overrides μ without touching the recorded mass.
    pub fn set_mu_m3_s2(&mut self, mu_m3_s2: f64) {
        self.mu_m3_s2 = mu_m3_s2;
    }

    /// Total Newtonian acceleration of this particle against the provided attractor
    /// snapshot, skipping its own entry.
    pub fn newtonian_acceleration_m_s2(&self, attractors: &[Attractor], self_index: usize) -> Vector3 {
        let mut total = Vector3::zeros();
        for attractor in attractors {
            if attractor.index == self_index {
                continue;
            }
            total += attractor.acceleration_at(&self.position_m);
        }
        total
    }

    /// Post-Newtonian correction summed one-sidedly over the attractors. Must only be
    /// evaluated once every particle's Newtonian acceleration has been assigned.
    pub fn relativistic_correction_m_s2(&self, attractors: &[Attractor], self_index: usize) -> Vector3 {
        let mut total = Vector3::zeros();
        for attractor in attractors {
            if attractor.index == self_index {
                continue;
            }
            total += relativity::post_newtonian_m_s2(
                attractor.mu_m3_s2,
                &(self.position_m - attractor.position_m),
                &(self.velocity_m_s - attractor.velocity_m_s),
            );
        }
        total
    }
}

#[cfg(test)]
mod dynamics_ut {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn newton_points_at_the_attractor() {
        let mu = 3.986004418e14;
        let acc = newtonian_gravity_m_s2(&Vector3::zeros(), mu, &Vector3::new(7.0e6, 0.0, 0.0));
        // LEO-ish magnitude, pulling towards the origin
        assert_relative_eq!(acc.x, -mu / 49.0e12, epsilon = 1e-9);
        assert_relative_eq!(acc.y, 0.0);
        assert_relative_eq!(acc.z, 0.0);
    }

    #[test]
    fn mass_and_mu_coupling() {
        let mut p = Particle::new(5.972e24, Vector3::zeros(), Vector3::zeros());
        assert_relative_eq!(p.mu_m3_s2(), GRAVITATIONAL_CONSTANT * 5.972e24);

        // Overriding μ keeps the mass
        p.set_mu_m3_s2(3.986004418e14);
        assert_relative_eq!(p.mass_kg(), 5.972e24);
        assert_relative_eq!(p.mu_m3_s2(), 3.986004418e14);

        // Setting the mass refreshes μ
        p.set_mass_kg(1.0e3);
        assert_relative_eq!(p.mu_m3_s2(), GRAVITATIONAL_CONSTANT * 1.0e3);
    }

    #[test]
    fn attractor_skips_itself() {
        let p = Particle::new(1.0e20, Vector3::zeros(), Vector3::zeros());
        let snapshot = [Attractor {
            index: 0,
            position_m: Vector3::zeros(),
            velocity_m_s: Vector3::zeros(),
            mu_m3_s2: p.mu_m3_s2(),
            model: GravityModel::PointMass,
        }];
        assert_eq!(p.newtonian_acceleration_m_s2(&snapshot, 0), Vector3::zeros());
    }
}
