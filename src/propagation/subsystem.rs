/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use super::ParticleSystem;
use crate::constants::celestial_bodies::{GIANTS, SUN};
use crate::constants::STEP_S;
use crate::dynamics::{newtonian_gravity_m_s2, GravityModel, OblateGravity, Particle};
use crate::math::Vector3;
use crate::system::{NotOblateSnafu, PhysicsSnafu, SimulationError, SolarSystem, UnknownBodySnafu};
use hifitime::{Duration, Epoch};
use log::info;
use snafu::prelude::*;

/// Read-only sample of the external perturbers, taken from the Solar System frame once per
/// step. The sub-system observes the enclosing simulation, it never drives it.
struct ExternalField {
    host_pos_m: Vector3,
    attractors: Vec<(Vector3, f64)>,
}

impl ExternalField {
    fn sample(solar: &SolarSystem, host: &str, externals: &[String]) -> Self {
        let host_pos_m = solar
            .state_of(host)
            .map(|(pos, _)| pos)
            .unwrap_or_default();
        let attractors = externals
            .iter()
            .filter_map(|name| {
                let (pos, _) = solar.state_of(name)?;
                let mu = solar.system.get(name)?.mu_m3_s2();
                Some((pos, mu))
            })
            .collect();
        Self {
            host_pos_m,
            attractors,
        }
    }

    /// Tidal difference a_ext(moon) − a_ext(host) for a moon at the provided host-relative
    /// position, with every term evaluated in the Solar System frame.
    fn tidal_m_s2(&self, local_pos_m: &Vector3, host_local_pos_m: &Vector3) -> Vector3 {
        let moon_pos_m = self.host_pos_m + (local_pos_m - host_local_pos_m);
        let mut total = Vector3::zeros();
        for (pos, mu) in &self.attractors {
            total += newtonian_gravity_m_s2(pos, *mu, &moon_pos_m)
                - newtonian_gravity_m_s2(pos, *mu, &self.host_pos_m);
        }
        total
    }
}

/// A particle system rooted at an oblate host planet: the host sits at the origin (first
/// insertion, zero velocity) and its moons orbit it.
///
/// Coupling with the enclosing [`SolarSystem`] is one-way: the Sun and the non-host giant
/// planets are read at every step to apply the tidal difference acceleration on each moon.
/// The host itself receives no external perturbation here; its heliocentric motion is
/// re-synchronized by the top-level advance.
pub struct MoonSystem {
    host: String,
    pub system: ParticleSystem,
    externals: Vec<String>,
    epoch: Epoch,
}

impl MoonSystem {
    /// Builds the sub-system of the provided giant planet from the current state of the
    /// Solar System: the host at the origin with its oblate strategy, every catalogued
    /// moon host-relative.
    pub fn try_new(host: &str, solar: &SolarSystem) -> Result<Self, SimulationError> {
        let constants = solar.constants();
        let body = constants
            .get(host)
            .with_context(|| UnknownBodySnafu { name: host })?;
        let oblateness = body
            .oblateness
            .with_context(|| NotOblateSnafu { name: host })?;
        let mut model = OblateGravity::try_new(
            oblateness.oblate_mu_m3_s2,
            oblateness.eq_radius_m,
            oblateness.zonal,
            oblateness.pole,
        )
        .context(PhysicsSnafu {
            action: "building the host oblateness",
        })?;
        model.update_pole(solar.epoch());

        let (host_pos, host_vel) = solar
            .state_of(host)
            .with_context(|| UnknownBodySnafu { name: host })?;

        let mut system = ParticleSystem::new();
        let mut host_particle =
            Particle::new(body.mass_kg, Vector3::zeros(), Vector3::zeros())
                .with_oblateness(model);
        host_particle.set_mu_m3_s2(body.mu_m3_s2);
        system.insert(host, host_particle);

        for moon in constants.moons_of(host) {
            let (pos, vel) = solar
                .state_of(moon.name)
                .with_context(|| UnknownBodySnafu { name: moon.name })?;
            let mut particle = Particle::new(moon.mass_kg, pos - host_pos, vel - host_vel);
            particle.set_mu_m3_s2(moon.mu_m3_s2);
            system.insert(moon.name, particle);
        }

        let externals: Vec<String> = core::iter::once(SUN)
            .chain(GIANTS)
            .filter(|name| *name != host)
            .map(String::from)
            .collect();

        info!(
            "{host} sub-system built with {} moons at {}",
            system.len() - 1,
            solar.epoch()
        );
        Ok(Self {
            host: host.to_string(),
            system,
            externals,
            epoch: solar.epoch(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Names of the external perturbers read from the Solar System.
    pub fn externals(&self) -> &[String] {
        &self.externals
    }

    /// Host-relative position and velocity of a body of this sub-system.
    pub fn state_of(&self, name: &str) -> Option<(Vector3, Vector3)> {
        self.system
            .get(name)
            .map(|p| (p.position_m, p.velocity_m_s))
    }

    /// Advances by `steps` steps of +Δt.
    pub fn advance_forward(&mut self, solar: &SolarSystem, steps: usize) {
        for _ in 0..steps {
            self.step(solar, STEP_S);
        }
    }

    /// Advances by `steps` steps of −Δt (backward in time).
    pub fn advance_backward(&mut self, solar: &SolarSystem, steps: usize) {
        for _ in 0..steps {
            self.step(solar, -STEP_S);
        }
    }

    /// One integration step of signed duration `h_s`, followed by the drift correction on
    /// the host.
    ///
    /// The acceleration policy: the host feels plain Newton from its moons; each moon
    /// feels the analytic oblate acceleration from the host (never the point force on top
    /// of it), Newton from the other moons, and the tidal difference from the external
    /// attractors.
    pub fn step(&mut self, solar: &SolarSystem, h_s: f64) {
        // The pole is recomputed from the sub-system clock, unlike the top-level system
        // which keeps its construction-time pole.
        let epoch = self.epoch;
        if let Some(host) = self.system.get_mut(&self.host) {
            if let GravityModel::Oblate(model) = &mut host.model {
                model.update_pole(epoch);
            }
        }

        let field = ExternalField::sample(solar, &self.host, &self.externals);
        self.system.rk4_step_with(h_s, |sys| {
            sys.evaluate_accelerations();
            let host_local = sys
                .particles
                .get_index(0)
                .map(|(_, p)| p.position_m)
                .unwrap_or_default();
            for (index, particle) in sys.particles.values_mut().enumerate() {
                if index == 0 {
                    continue;
                }
                particle.acceleration_m_s2 +=
                    field.tidal_m_s2(&particle.position_m, &host_local);
            }
        });
        self.system.recentre_on(&self.host);
        self.epoch += Duration::from_seconds(h_s);
    }
}

#[cfg(test)]
mod subsystem_ut {
    use super::*;
    use crate::constants::celestial_bodies::{EARTH, IO, JUPITER, SATURN, TITAN};
    use hifitime::Epoch;

    #[test]
    fn host_is_first_and_pinned() {
        let solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
        let mut galilean = MoonSystem::try_new(JUPITER, &solar).unwrap();
        assert_eq!(galilean.system.iter().next().unwrap().0, JUPITER);
        assert_eq!(galilean.system.len(), 5);

        galilean.advance_forward(&solar, 5);
        let (host_pos, host_vel) = galilean.state_of(JUPITER).unwrap();
        assert_eq!(host_pos, Vector3::zeros());
        assert_eq!(host_vel, Vector3::zeros());

        // Io stays on its orbit.
        let (io_pos, _) = galilean.state_of(IO).unwrap();
        let r = io_pos.norm();
        assert!((4.1e8..4.4e8).contains(&r), "Io at {r:.3e} m");
    }

    #[test]
    fn externals_exclude_the_host() {
        let solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
        let saturnian = MoonSystem::try_new(SATURN, &solar).unwrap();
        assert!(saturnian.externals().iter().all(|n| n.as_str() != SATURN));
        assert!(saturnian.externals().iter().any(|n| n.as_str() == SUN));
        assert!(saturnian.externals().iter().any(|n| n.as_str() == JUPITER));
        assert_eq!(saturnian.externals().len(), 4);
        assert!(saturnian.state_of(TITAN).is_some());
    }

    #[test]
    fn non_oblate_hosts_are_refused() {
        let solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
        assert!(matches!(
            MoonSystem::try_new(EARTH, &solar),
            Err(SimulationError::NotOblate { .. })
        ));
    }

    #[test]
    fn clock_follows_signed_steps() {
        let solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
        let mut galilean = MoonSystem::try_new(JUPITER, &solar).unwrap();
        let start = galilean.epoch();
        galilean.advance_forward(&solar, 4);
        galilean.advance_backward(&solar, 1);
        assert_eq!(galilean.epoch(), start + Duration::from_seconds(3.0 * 3600.0));
    }
}
