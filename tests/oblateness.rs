/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use helion::constants::{JDE_J2000, OBLATENESS_RANGE_M};
use helion::dynamics::{OblateGravity, PoleMotion};
use helion::math::Vector3;
use helion::prelude::*;

fn oblate_model(ra_deg: f64, dec_deg: f64) -> OblateGravity {
    OblateGravity::try_new(
        1.26686534e17,
        7.1492e7,
        &[0.0, 0.0, 1.4736e-2, 0.0, -5.87e-4, 0.0, 3.4e-5],
        PoleMotion {
            epoch_jde: JDE_J2000,
            ra_deg,
            dec_deg,
            ra_rate_deg_cy: 0.0,
            dec_rate_deg_cy: 0.0,
        },
    )
    .unwrap()
}

/// For fixed (α, δ, ε), the ecliptic → equatorial → ecliptic chain is the identity to
/// within 1e-10 relative error.
#[test]
fn frame_transform_inversion() {
    // A crude deterministic scatter of directions and magnitudes.
    let mut vectors = Vec::new();
    for k in 0..50_u32 {
        let kf = f64::from(k);
        let theta = 0.7 + 2.1 * kf;
        let phi = -1.3 + 0.37 * kf;
        let mag = 1.0e3 * 10_f64.powf(1.0 + (kf % 9.0));
        vectors.push(
            mag * Vector3::new(
                theta.cos() * phi.cos(),
                theta.sin() * phi.cos(),
                phi.sin(),
            ),
        );
    }

    for (ra_deg, dec_deg, obliquity_deg) in [
        (268.056595, 64.495303, 23.43929_f64),
        (40.589, 83.537, 23.43929),
        (257.311, -15.175, 23.43929),
        (299.36, 43.46, 20.0),
        (0.0, 90.0, 0.0),
        (123.4, -56.7, 5.0),
    ] {
        let mut model = oblate_model(ra_deg, dec_deg);
        model.obliquity_rad = obliquity_deg.to_radians();
        for v in &vectors {
            let round_trip = model.equatorial_to_ecliptic(&model.ecliptic_to_equatorial(v));
            let error = (round_trip - v).norm() / v.norm();
            assert!(
                error < 1e-10,
                "relative error {error:.3e} for pole ({ra_deg}, {dec_deg}), eps {obliquity_deg}"
            );
        }
    }
}

/// Beyond the oblateness range, an oblate attractor produces exactly the Newtonian
/// acceleration; inside it, the zonal terms show up.
#[test]
fn oblateness_is_distance_gated() {
    let model = oblate_model(268.056595, 64.495303);

    let build = |oblate: bool| -> ParticleSystem {
        let mut system = ParticleSystem::new();
        let mut planet = Particle::new(1.89819e27, Vector3::zeros(), Vector3::zeros());
        planet.set_mu_m3_s2(1.26686534e17);
        if oblate {
            planet = planet.with_oblateness(model);
        }
        system.insert("planet", planet);
        system
    };

    for (distance, expect_equal) in [
        (OBLATENESS_RANGE_M * 1.2, true),
        (OBLATENESS_RANGE_M * 10.0, true),
        (OBLATENESS_RANGE_M * 0.5, false),
        (4.2e8, false),
    ] {
        let target_pos = Vector3::new(0.6 * distance, 0.64 * distance, 0.48 * distance);
        let target_pos = target_pos * (distance / target_pos.norm());

        let mut with_oblate = build(true);
        with_oblate.insert("target", Particle::massless(target_pos, Vector3::zeros()));
        with_oblate.evaluate_accelerations();
        let acc_oblate = with_oblate.get("target").unwrap().acceleration_m_s2;

        let mut point_mass = build(false);
        point_mass.insert("target", Particle::massless(target_pos, Vector3::zeros()));
        point_mass.evaluate_accelerations();
        let acc_newton = point_mass.get("target").unwrap().acceleration_m_s2;

        if expect_equal {
            // Same code path beyond the gate: bit-for-bit identical.
            assert_eq!(
                acc_oblate, acc_newton,
                "acceleration mismatch at {distance:.3e} m"
            );
        } else {
            let rel = (acc_oblate - acc_newton).norm() / acc_newton.norm();
            assert!(
                rel > 1e-12,
                "zonal terms invisible at {distance:.3e} m (rel {rel:.3e})"
            );
        }
    }
}
