/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use helion::constants::celestial_bodies::{CALLISTO, IO, JUPITER, NEPTUNE, TRITON};
use helion::prelude::*;

/// Io's orbital period, measured between two consecutive passages through its initial
/// position direction, lies within 1% of 1.769 days.
#[test]
fn io_period_in_the_galilean_subsystem() {
    let solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
    let mut galilean = MoonSystem::try_new(JUPITER, &solar).unwrap();

    let (r0, v0) = galilean.state_of(IO).unwrap();
    let plane_normal = r0.cross(&v0).normalize();

    let step_s = 3600.0;
    let mut unwrapped_rad = 0.0;
    let mut previous = r0;
    // Linear interpolation of the unwrapped angle at the 2π and 4π crossings.
    let mut first_passage_s = None;
    let mut second_passage_s = None;

    for step in 1..=1000 {
        galilean.step(&solar, step_s);
        let (r, _) = galilean.state_of(IO).unwrap();
        let delta = {
            let cross = previous.cross(&r);
            let sign = if cross.dot(&plane_normal) >= 0.0 { 1.0 } else { -1.0 };
            sign * cross.norm().atan2(previous.dot(&r)).abs()
        };
        let before = unwrapped_rad;
        unwrapped_rad += delta;
        previous = r;

        for (target, slot) in [
            (core::f64::consts::TAU, &mut first_passage_s),
            (2.0 * core::f64::consts::TAU, &mut second_passage_s),
        ] {
            if slot.is_none() && before < target && unwrapped_rad >= target {
                let fraction = (target - before) / (unwrapped_rad - before);
                *slot = Some((step as f64 - 1.0 + fraction) * step_s);
            }
        }
    }

    let period_s = second_passage_s.expect("second passage not reached")
        - first_passage_s.expect("first passage not reached");
    let expected_s = 1.769 * 86_400.0;
    let relative = (period_s - expected_s).abs() / expected_s;
    assert!(
        relative < 0.01,
        "Io period {:.4} d, {relative:.4} off",
        period_s / 86_400.0
    );
}

/// The outer moons stay bound through a backward run as well.
#[test]
fn triton_survives_a_round_trip() {
    let solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
    let mut neptunian = MoonSystem::try_new(NEPTUNE, &solar).unwrap();

    let (start, _) = neptunian.state_of(TRITON).unwrap();
    neptunian.advance_forward(&solar, 48);
    neptunian.advance_backward(&solar, 48);
    let (end, _) = neptunian.state_of(TRITON).unwrap();
    // Two days at 3600 s is about 14 steps per radian of Triton's orbit; the round trip
    // closes to a few meters on a 3.5e8 m orbit.
    assert!(
        (end - start).norm() < 100.0,
        "Triton {:.3e} m off after the round trip",
        (end - start).norm()
    );
}

/// The tidal coupling to the Sun keeps Callisto's orbit bounded over a month.
#[test]
fn callisto_remains_bound_with_external_perturbers() {
    let solar = SolarSystem::try_new(Epoch::from_gregorian_utc_at_noon(2000, 1, 1)).unwrap();
    let mut galilean = MoonSystem::try_new(JUPITER, &solar).unwrap();

    let (r0, _) = galilean.state_of(CALLISTO).unwrap();
    let initial_radius = r0.norm();
    galilean.advance_forward(&solar, 720);
    let (r1, _) = galilean.state_of(CALLISTO).unwrap();
    let final_radius = r1.norm();
    assert!(
        (final_radius / initial_radius - 1.0).abs() < 0.05,
        "Callisto drifted from {initial_radius:.4e} to {final_radius:.4e} m"
    );
}
