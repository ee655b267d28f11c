/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::dynamics::{Attractor, Particle, RkStage};
use crate::math::Vector3;
use indexmap::IndexMap;
use log::warn;

pub mod subsystem;

/// An ordered mapping from body name to [`Particle`], with the fourth-order Runge-Kutta
/// step, drift correction, and the massive/massless sub-views.
///
/// Iteration order is insertion order, everywhere: the acceleration sums run in that fixed
/// order so that a given build is bit-for-bit deterministic (a requirement of the
/// reversibility contract). There is no deletion.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    pub(crate) particles: IndexMap<String, Particle>,
    /// When enabled, every acceleration evaluation is augmented with the first-order
    /// post-Newtonian correction.
    pub use_general_relativity: bool,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a particle under the provided name. Re-inserting an existing name replaces
    /// the particle but keeps its original position in the iteration order.
    pub fn insert(&mut self, name: &str, particle: Particle) {
        self.particles.insert(name.to_string(), particle);
    }

    pub fn get(&self, name: &str) -> Option<&Particle> {
        self.particles.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Particle> {
        self.particles.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Particle)> {
        self.particles.iter()
    }

    /// Sub-view over the particles that attract others (mass > 0), in insertion order.
    pub fn massive(&self) -> impl Iterator<Item = (&String, &Particle)> {
        self.particles.iter().filter(|(_, p)| p.mass_kg() > 0.0)
    }

    /// Sub-view over the test particles (mass = 0), in insertion order.
    pub fn massless(&self) -> impl Iterator<Item = (&String, &Particle)> {
        self.particles.iter().filter(|(_, p)| p.mass_kg() == 0.0)
    }

    /// Vector sum of the current acceleration of every particle.
    pub fn total_acceleration_m_s2(&self) -> Vector3 {
        self.particles
            .values()
            .fold(Vector3::zeros(), |acc, p| acc + p.acceleration_m_s2)
    }

    /// Snapshot of the massive particles, taken once per acceleration evaluation. The
    /// stored index is the particle's position in the system, used to skip self-attraction.
    pub(crate) fn attractor_snapshot(&self) -> Vec<Attractor> {
        self.particles
            .values()
            .enumerate()
            .filter(|(_, p)| p.mass_kg() > 0.0)
            .map(|(index, p)| Attractor {
                index,
                position_m: p.position_m,
                velocity_m_s: p.velocity_m_s,
                mu_m3_s2: p.mu_m3_s2(),
                model: p.model,
            })
            .collect()
    }

    /// Assigns the acceleration of every particle in the current configuration.
    ///
    /// Two phases: the Newtonian field first for every particle, then, when enabled, the
    /// post-Newtonian pass. The relativistic term must not run interleaved with the
    /// Newtonian assignments since it depends on the completed Newtonian field.
    pub fn evaluate_accelerations(&mut self) {
        let attractors = self.attractor_snapshot();
        for (index, particle) in self.particles.values_mut().enumerate() {
            particle.acceleration_m_s2 =
                particle.newtonian_acceleration_m_s2(&attractors, index);
        }
        if self.use_general_relativity {
            for (index, particle) in self.particles.values_mut().enumerate() {
                let correction = particle.relativistic_correction_m_s2(&attractors, index);
                particle.acceleration_m_s2 += correction;
            }
        }
    }

    /// One classical fourth-order Runge-Kutta step of signed duration `h_s` seconds,
    /// evaluating accelerations with [`ParticleSystem::evaluate_accelerations`].
    pub fn rk4_step(&mut self, h_s: f64) {
        self.rk4_step_with(h_s, Self::evaluate_accelerations)
    }

    /// One classical fourth-order Runge-Kutta step of signed duration `h_s` seconds, with a
    /// caller-provided acceleration evaluation (the sub-system policy hook).
    ///
    /// Each stage advances every particle from its saved initial state using the previous
    /// stage, then re-evaluates the accelerations of the whole set at the sub-step
    /// configuration.
    pub fn rk4_step_with(&mut self, h_s: f64, mut evaluate: impl FnMut(&mut Self)) {
        let initial: Vec<(Vector3, Vector3)> = self
            .particles
            .values()
            .map(|p| (p.position_m, p.velocity_m_s))
            .collect();

        // k1: derivatives in the current configuration
        evaluate(self);
        for particle in self.particles.values_mut() {
            particle.stages[0] = RkStage {
                d_pos: particle.velocity_m_s,
                d_vel: particle.acceleration_m_s2,
            };
        }

        // k2 and k3: half-step advances from the initial state using the previous stage
        for stage in 1..=2 {
            for (index, particle) in self.particles.values_mut().enumerate() {
                let (pos0, vel0) = initial[index];
                let prev = particle.stages[stage - 1];
                particle.position_m = pos0 + 0.5 * h_s * prev.d_pos;
                particle.velocity_m_s = vel0 + 0.5 * h_s * prev.d_vel;
            }
            evaluate(self);
            for particle in self.particles.values_mut() {
                particle.stages[stage] = RkStage {
                    d_pos: particle.velocity_m_s,
                    d_vel: particle.acceleration_m_s2,
                };
            }
        }

        // k4: full-step advance using k3
        for (index, particle) in self.particles.values_mut().enumerate() {
            let (pos0, vel0) = initial[index];
            let prev = particle.stages[2];
            particle.position_m = pos0 + h_s * prev.d_pos;
            particle.velocity_m_s = vel0 + h_s * prev.d_vel;
        }
        evaluate(self);
        for particle in self.particles.values_mut() {
            particle.stages[3] = RkStage {
                d_pos: particle.velocity_m_s,
                d_vel: particle.acceleration_m_s2,
            };
        }

        // Combine: y <- y0 + h/6 (k1 + 2 k2 + 2 k3 + k4)
        let sixth = h_s / 6.0;
        for (index, particle) in self.particles.values_mut().enumerate() {
            let (pos0, vel0) = initial[index];
            let [k1, k2, k3, k4] = particle.stages;
            particle.position_m =
                pos0 + sixth * (k1.d_pos + 2.0 * k2.d_pos + 2.0 * k3.d_pos + k4.d_pos);
            particle.velocity_m_s =
                vel0 + sixth * (k1.d_vel + 2.0 * k2.d_vel + 2.0 * k3.d_vel + k4.d_vel);
        }
    }

    /// Drift correction: subtracts the reference particle's position and velocity from
    /// every particle, pinning the reference at the origin.
    pub fn recentre_on(&mut self, reference: &str) {
        let Some(r) = self.particles.get(reference) else {
            warn!("cannot recentre on {reference}: no such particle");
            return;
        };
        let (ref_pos, ref_vel) = (r.position_m, r.velocity_m_s);
        for particle in self.particles.values_mut() {
            particle.position_m -= ref_pos;
            particle.velocity_m_s -= ref_vel;
        }
    }
}

#[cfg(test)]
mod propagation_ut {
    use super::*;
    use crate::dynamics::Particle;
    use approx::assert_relative_eq;

    const MU_EARTH: f64 = 3.986004418e14;

    /// Earth at the origin with a spacecraft on a circular equatorial orbit.
    fn two_body() -> ParticleSystem {
        let mut system = ParticleSystem::new();
        let mut earth = Particle::new(5.9722e24, Vector3::zeros(), Vector3::zeros());
        earth.set_mu_m3_s2(MU_EARTH);
        system.insert("Earth", earth);

        let r = 7.0e6;
        let v = (MU_EARTH / r).sqrt();
        system.insert(
            "sc",
            Particle::massless(Vector3::new(r, 0.0, 0.0), Vector3::new(0.0, v, 0.0)),
        );
        system
    }

    fn specific_energy(system: &ParticleSystem) -> f64 {
        let sc = system.get("sc").unwrap();
        let earth = system.get("Earth").unwrap();
        let r = (sc.position_m - earth.position_m).norm();
        0.5 * (sc.velocity_m_s - earth.velocity_m_s).norm_squared() - MU_EARTH / r
    }

    #[test]
    fn circular_orbit_conserves_energy() {
        let mut system = two_body();
        let e0 = specific_energy(&system);
        let period = 2.0 * core::f64::consts::PI * (7.0e6_f64.powi(3) / MU_EARTH).sqrt();
        let steps = (period / 10.0).ceil() as usize;
        for _ in 0..steps {
            system.rk4_step(10.0);
        }
        let ef = specific_energy(&system);
        assert!(
            ((ef - e0) / e0).abs() < 1e-10,
            "energy drift {:.2e} over one period",
            ((ef - e0) / e0).abs()
        );
    }

    #[test]
    fn forward_then_backward_returns_home() {
        let mut system = two_body();
        let start = system.get("sc").unwrap().position_m;
        for _ in 0..100 {
            system.rk4_step(10.0);
        }
        for _ in 0..100 {
            system.rk4_step(-10.0);
        }
        let end = system.get("sc").unwrap().position_m;
        assert!(
            (end - start).norm() < 1e-2,
            "round trip error {:.3e} m",
            (end - start).norm()
        );
    }

    #[test]
    fn recentre_pins_the_reference() {
        let mut system = two_body();
        system.get_mut("Earth").unwrap().velocity_m_s = Vector3::new(10.0, -3.0, 0.5);
        system.rk4_step(60.0);
        system.recentre_on("Earth");
        let earth = system.get("Earth").unwrap();
        assert_eq!(earth.position_m, Vector3::zeros());
        assert_eq!(earth.velocity_m_s, Vector3::zeros());
    }

    #[test]
    fn sub_views_partition_the_system() {
        let system = two_body();
        assert_eq!(system.massive().count(), 1);
        assert_eq!(system.massless().count(), 1);
        assert_eq!(system.len(), 2);
        // Insertion order is preserved.
        let names: Vec<&String> = system.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["Earth", "sc"]);
    }

    #[test]
    fn massless_particles_do_not_attract() {
        let mut system = two_body();
        system.evaluate_accelerations();
        let earth_acc = system.get("Earth").unwrap().acceleration_m_s2;
        assert_relative_eq!(earth_acc.norm(), 0.0);
    }
}
