/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use helion::constants::celestial_bodies::{EARTH, MERCURY, MOON, SUN};
use helion::ephemeris::EphemerisError;
use helion::math::Vector3;
use helion::prelude::*;
use helion::system::SimulationError;

/// Over one Julian year of hourly steps, Earth's heliocentric distance stays within its
/// perihelion/aphelion bracket.
#[test]
fn earth_stays_on_its_orbit_for_a_year() {
    let mut solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
    // Perihelion is near 1.471e11 m and aphelion near 1.521e11 m; the bracket leaves room
    // for the monthly barycentric wobble and the planetary perturbations.
    for hour in 0..8766 {
        solar.advance_forward(1);
        let (pos, _) = solar.state_of(EARTH).unwrap();
        let r = pos.norm();
        assert!(
            (1.47e11..=1.522e11).contains(&r),
            "hour {hour}: Earth at {r:.4e} m"
        );
    }
}

/// After one day of propagation, the Moon's geocentric distance agrees with the ephemeris
/// to 5e7 m.
#[test]
fn moon_tracks_the_ephemeris_over_a_day() {
    let start = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
    let mut solar = SolarSystem::try_new(start).unwrap();
    solar.advance_forward(24);

    let (moon, _) = solar.state_of(MOON).unwrap();
    let (earth, _) = solar.state_of(EARTH).unwrap();
    let simulated = (moon - earth).norm();

    let target = Epoch::from_gregorian_utc_at_noon(2000, 1, 2);
    assert_eq!(solar.epoch(), target);
    let (moon_eph, _) = solar.ephemeris().state_m(MOON, target).unwrap();
    let (earth_eph, _) = solar.ephemeris().state_m(EARTH, target).unwrap();
    let expected = (moon_eph - earth_eph).norm();

    assert!(
        (simulated - expected).abs() < 5.0e7,
        "geocentric distance {simulated:.4e} vs ephemeris {expected:.4e}"
    );
}

/// Initializing outside the ephemeris window fails with the out-of-range error and leaves
/// the prior timestamp untouched.
#[test]
fn initialization_outside_the_window_fails() {
    let start = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
    let mut solar = SolarSystem::try_new(start).unwrap();
    let before = solar.epoch();

    let year_4000 = Epoch::from_gregorian_utc_at_noon(4000, 1, 1);
    let err = solar.initialize(year_4000).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Ephemeris {
            source: EphemerisError::OutOfValidityWindow { .. },
            ..
        }
    ));
    assert_eq!(solar.epoch(), before);

    // Construction at that date fails the same way.
    assert!(SolarSystem::try_new(year_4000).is_err());
}

/// Longitude of perihelion of the osculating orbit, in degrees.
fn perihelion_direction(system: &ParticleSystem, mu_sun: f64) -> Vector3 {
    let mercury = system.get(MERCURY).unwrap();
    let sun = system.get(SUN).unwrap();
    let r = mercury.position_m - sun.position_m;
    let v = mercury.velocity_m_s - sun.velocity_m_s;
    let h = r.cross(&v);
    v.cross(&h) / mu_sun - r / r.norm()
}

/// With the relativistic correction enabled, Mercury's perihelion advances by 43 ± 5
/// arc-seconds per century beyond the Newtonian run.
///
/// The measurement uses the Sun-Mercury two-body problem so that the planetary
/// contribution (about ten times larger) does not drown the signal.
#[test]
fn mercury_perihelion_advance_under_relativity() {
    let epoch = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
    let constants = Constants::builtin();
    let ephemeris = KeplerEphemeris::from_constants(&constants);
    let mu_sun = constants.get(SUN).unwrap().mu_m3_s2;

    let build = |relativity: bool| -> ParticleSystem {
        let mut system = ParticleSystem::new();
        let mut sun = Particle::new(constants.get(SUN).unwrap().mass_kg, Vector3::zeros(), Vector3::zeros());
        sun.set_mu_m3_s2(mu_sun);
        system.insert(SUN, sun);

        let body = constants.get(MERCURY).unwrap();
        let (pos, vel) = ephemeris.state_m(MERCURY, epoch).unwrap();
        let mut mercury = Particle::new(body.mass_kg, pos, vel);
        mercury.set_mu_m3_s2(body.mu_m3_s2);
        system.insert(MERCURY, mercury);

        system.use_general_relativity = relativity;
        system
    };

    // One Julian century of hourly steps.
    let steps = 876_600;
    let mut newtonian = build(false);
    let mut relativistic = build(true);
    let e_start_newton = perihelion_direction(&newtonian, mu_sun);
    let e_start_gr = perihelion_direction(&relativistic, mu_sun);
    for _ in 0..steps {
        newtonian.rk4_step(3600.0);
        newtonian.recentre_on(SUN);
        relativistic.rk4_step(3600.0);
        relativistic.recentre_on(SUN);
    }

    let drift_newton_arcsec =
        helion::math::angle_between_deg(&e_start_newton, &perihelion_direction(&newtonian, mu_sun))
            * 3600.0;
    let drift_gr_arcsec =
        helion::math::angle_between_deg(&e_start_gr, &perihelion_direction(&relativistic, mu_sun))
            * 3600.0;

    let advance = drift_gr_arcsec - drift_newton_arcsec;
    assert!(
        (38.0..=48.0).contains(&advance),
        "perihelion advance {advance:.2} arcsec/century (Newton drift {drift_newton_arcsec:.2})"
    );
}
