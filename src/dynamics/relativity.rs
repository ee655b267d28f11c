/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::constants::SPEED_OF_LIGHT_M_S;
use crate::math::Vector3;

/// First-order post-Newtonian correction of the two-body acceleration:
///
/// a = μ/(c²r³) · [ (4μ/r − v²)·r⃗ + 4(r⃗·v⃗)·v⃗ ]
///
/// where r⃗ and v⃗ are the position and velocity of the particle relative to the attractor.
/// For Mercury around the Sun this term drives the 43″/century apsidal advance.
pub fn post_newtonian_m_s2(mu_m3_s2: f64, rel_pos_m: &Vector3, rel_vel_m_s: &Vector3) -> Vector3 {
    let r = rel_pos_m.norm();
    let factor = mu_m3_s2 / (SPEED_OF_LIGHT_M_S.powi(2) * r.powi(3));
    factor
        * ((4.0 * mu_m3_s2 / r - rel_vel_m_s.norm_squared()) * rel_pos_m
            + 4.0 * rel_pos_m.dot(rel_vel_m_s) * rel_vel_m_s)
}
