/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::bodies::Constants;
use crate::constants::celestial_bodies::SUN;
use crate::constants::STEP_S;
use crate::dynamics::{OblateGravity, Particle};
use crate::ephemeris::{kepler::KeplerEphemeris, Ephemeris, EphemerisError};
use crate::errors::PhysicsError;
use crate::math::Vector3;
use crate::propagation::ParticleSystem;
use hifitime::{Duration, Epoch};
use indexmap::IndexMap;
use log::{info, warn};
use snafu::prelude::*;

pub mod snapshot;

use snapshot::SnapshotError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SimulationError {
    #[snafu(display("{action} encountered an ephemeris error: {source}"))]
    Ephemeris {
        action: &'static str,
        source: EphemerisError,
    },
    #[snafu(display("{action} encountered a physics error: {source}"))]
    Physics {
        action: &'static str,
        source: PhysicsError,
    },
    #[snafu(display(
        "the relativistic correction may only be toggled right after initialization"
    ))]
    RelativityLocked,
    #[snafu(display("body {name} is not defined in this simulation"))]
    UnknownBody { name: String },
    #[snafu(display("body {name} carries no oblateness parameters"))]
    NotOblate { name: String },
    #[snafu(display("when {action}, {source}"))]
    Snapshot {
        action: &'static str,
        source: SnapshotError,
    },
}

/// A sampled Keplerian orbit of a body around its center, for the visualization consumer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrbitTrace {
    pub points_m: Vec<Vector3>,
}

impl OrbitTrace {
    /// Number of points sampled along one revolution.
    pub const SAMPLES: usize = 180;

    /// Samples the osculating orbit of the provided relative state over one revolution of
    /// eccentric anomaly. Unbound or degenerate states yield an empty trace.
    pub fn sample(rel_pos_m: &Vector3, rel_vel_m_s: &Vector3, mu_m3_s2: f64) -> Self {
        let r = rel_pos_m.norm();
        if r < f64::EPSILON || mu_m3_s2 < f64::EPSILON {
            return Self::default();
        }
        let energy = 0.5 * rel_vel_m_s.norm_squared() - mu_m3_s2 / r;
        if energy >= 0.0 {
            // Hyperbolic relative motion has no closed trace.
            return Self::default();
        }
        let sma = -0.5 * mu_m3_s2 / energy;
        let h_vec = rel_pos_m.cross(rel_vel_m_s);
        if h_vec.norm() < f64::EPSILON {
            return Self::default();
        }
        let e_vec = rel_vel_m_s.cross(&h_vec) / mu_m3_s2 - rel_pos_m / r;
        let ecc = e_vec.norm();

        // In-plane basis: periapsis direction and its quadrature. A circular orbit has no
        // periapsis, so the current radial direction and the in-plane component of the
        // velocity serve instead.
        let (p_hat, q_hat) = if ecc > 1e-9 {
            let p_hat = e_vec / ecc;
            (p_hat, h_vec.normalize().cross(&p_hat))
        } else {
            let p_hat = rel_pos_m / r;
            (p_hat, crate::math::perp_vector(rel_vel_m_s, &p_hat).normalize())
        };

        let b = sma * (1.0 - ecc * ecc).max(0.0).sqrt();
        let mut points_m = Vec::with_capacity(Self::SAMPLES);
        for k in 0..Self::SAMPLES {
            let ecc_anomaly = core::f64::consts::TAU * k as f64 / Self::SAMPLES as f64;
            let (sin_e, cos_e) = ecc_anomaly.sin_cos();
            points_m.push(sma * (cos_e - ecc) * p_hat + b * sin_e * q_hat);
        }
        Self { points_m }
    }
}

/// The top-level simulation: the catalogue of bodies, the particle system, the clock and
/// the sampled orbit traces.
///
/// The driver owns its ephemeris and advances in fixed steps of [`STEP_S`] seconds, each
/// followed by a drift correction on the Sun. Batch operations publish a consistent state
/// after every step, so a caller may cancel between steps but never observes a
/// half-updated particle map.
pub struct SolarSystem {
    constants: Constants,
    ephemeris: KeplerEphemeris,
    pub system: ParticleSystem,
    epoch: Epoch,
    /// Set once the system has stepped away from the last initialization.
    stepped: bool,
    traces: IndexMap<String, OrbitTrace>,
}

impl SolarSystem {
    /// Builds the Solar System at the provided instant: every catalogue body is created
    /// with its mass and μ, the giants carry their oblate strategy, and all states come
    /// from the ephemeris. Fails if the instant is outside the ephemeris window.
    pub fn try_new(epoch: Epoch) -> Result<Self, SimulationError> {
        let constants = Constants::builtin();
        let ephemeris = KeplerEphemeris::from_constants(&constants);

        let mut system = ParticleSystem::new();
        for body in constants.iter() {
            let mut particle = Particle::new(body.mass_kg, Vector3::zeros(), Vector3::zeros());
            particle.set_mu_m3_s2(body.mu_m3_s2);
            if let Some(oblateness) = &body.oblateness {
                let model = OblateGravity::try_new(
                    oblateness.oblate_mu_m3_s2,
                    oblateness.eq_radius_m,
                    oblateness.zonal,
                    oblateness.pole,
                )
                .context(PhysicsSnafu {
                    action: "building the oblate attractors",
                })?;
                particle = particle.with_oblateness(model);
            }
            system.insert(body.name, particle);
        }

        let mut me = Self {
            constants,
            ephemeris,
            system,
            epoch,
            stepped: false,
            traces: IndexMap::new(),
        };
        me.initialize(epoch)?;
        info!(
            "Solar System initialized at {} with {} bodies",
            me.epoch,
            me.system.len()
        );
        Ok(me)
    }

    /// Resets the clock and overwrites every particle's position and velocity from the
    /// ephemeris. When the instant is outside the validity window, the error is surfaced
    /// and the simulation is left exactly as it was.
    pub fn initialize(&mut self, epoch: Epoch) -> Result<(), SimulationError> {
        // Gather every state before mutating anything, so a failure leaves the prior
        // timestamp and particles untouched.
        let mut states = Vec::with_capacity(self.system.len());
        for (name, _) in self.system.iter() {
            let state = self
                .ephemeris
                .state_m(name, epoch)
                .context(EphemerisSnafu {
                    action: "initializing the simulation",
                })?;
            states.push(state);
        }
        for (index, particle) in self.system.particles.values_mut().enumerate() {
            let (pos, vel) = states[index];
            particle.position_m = pos;
            particle.velocity_m_s = vel;
            particle.acceleration_m_s2 = Vector3::zeros();
        }
        self.epoch = epoch;
        self.stepped = false;
        self.refresh_traces();
        Ok(())
    }

    /// Current simulation timestamp (UTC).
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn ephemeris(&self) -> &KeplerEphemeris {
        &self.ephemeris
    }

    /// Position and velocity of a body in the current simulation state.
    pub fn state_of(&self, name: &str) -> Option<(Vector3, Vector3)> {
        self.system
            .get(name)
            .map(|p| (p.position_m, p.velocity_m_s))
    }

    /// The sampled orbit of a body around its center body.
    pub fn orbit_trace(&self, name: &str) -> Option<&OrbitTrace> {
        self.traces.get(name)
    }

    /// Enables or disables the relativistic correction. Only permitted right after an
    /// initialization, before any step.
    pub fn set_general_relativity(&mut self, enabled: bool) -> Result<(), SimulationError> {
        ensure!(!self.stepped, RelativityLockedSnafu);
        self.system.use_general_relativity = enabled;
        Ok(())
    }

    /// Advances the simulation by `steps` steps of +Δt, with drift correction on the Sun
    /// after every step.
    pub fn advance_forward(&mut self, steps: usize) {
        self.advance(steps, STEP_S)
    }

    /// Advances the simulation by `steps` steps of −Δt (backward in time).
    pub fn advance_backward(&mut self, steps: usize) {
        self.advance(steps, -STEP_S)
    }

    fn advance(&mut self, steps: usize, h_s: f64) {
        for _ in 0..steps {
            self.system.rk4_step(h_s);
            self.system.recentre_on(SUN);
        }
        self.epoch += Duration::from_seconds(steps as f64 * h_s);
        self.stepped = true;
        self.refresh_traces();
    }

    /// Takes a single step of the provided signed duration, clamped to [−Δt, +Δt], and
    /// advances the clock by the clamped amount.
    pub fn single_step(&mut self, step_s: i64) {
        let clamped = step_s.clamp(-(STEP_S as i64), STEP_S as i64);
        if clamped != step_s {
            warn!("single step of {step_s} s clamped to {clamped} s");
        }
        if clamped == 0 {
            return;
        }
        self.system.rk4_step(clamped as f64);
        self.system.recentre_on(SUN);
        self.epoch += Duration::from_seconds(clamped as f64);
        self.stepped = true;
        self.refresh_traces();
    }

    /// Recomputes the sampled orbit of every body around its center body: the Sun for the
    /// planets and small bodies, the host planet for the moons.
    fn refresh_traces(&mut self) {
        let mut traces = IndexMap::with_capacity(self.system.len());
        for (name, particle) in self.system.iter() {
            if name == SUN {
                continue;
            }
            let center_name = self.constants.planet_of(name).unwrap_or(SUN);
            let Some(center) = self.system.get(center_name) else {
                continue;
            };
            let mu = center.mu_m3_s2() + particle.mu_m3_s2();
            let trace = OrbitTrace::sample(
                &(particle.position_m - center.position_m),
                &(particle.velocity_m_s - center.velocity_m_s),
                mu,
            );
            traces.insert(name.clone(), trace);
        }
        self.traces = traces;
    }
}
