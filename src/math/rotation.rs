/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use super::Matrix3;
use core::f64::consts::FRAC_PI_2;

/// Build a 3x3 rotation matrix around the X axis
pub fn r1(angle_rad: f64) -> Matrix3 {
    let (s, c) = angle_rad.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Build a 3x3 rotation matrix around the Y axis
pub fn r2(angle_rad: f64) -> Matrix3 {
    let (s, c) = angle_rad.sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Build a 3x3 rotation matrix around the Z axis
pub fn r3(angle_rad: f64) -> Matrix3 {
    let (s, c) = angle_rad.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Builds the rotation from the Earth equatorial frame to the equatorial frame of a body
/// whose north pole points at (α, δ), per Emelyanov & Samorodov (2015), eq. 1.
///
/// The rows of the returned matrix are the body axes expressed in the parent frame: the
/// third row is the pole direction itself. The transpose inverts the rotation.
pub fn pole_rotation(right_asc_rad: f64, declination_rad: f64) -> Matrix3 {
    r1(FRAC_PI_2 - declination_rad) * r3(right_asc_rad + FRAC_PI_2)
}
