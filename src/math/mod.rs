/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

// Vector3 is nalgebra's Vector3 with a 64-bit floating point representation.
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Vector6 = nalgebra::Vector6<f64>;
pub type Matrix3 = nalgebra::Matrix3<f64>;

pub mod legendre;
pub mod rotation;

/// Projection of `a` onto the direction of `b`.
pub fn project_vector(a: &Vector3, b: &Vector3) -> Vector3 {
    b * (a.dot(b) / b.dot(b))
}

/// Component of `a` orthogonal to `b`. A zero `b` has no direction to remove, so `a` is
/// returned unchanged.
pub fn perp_vector(a: &Vector3, b: &Vector3) -> Vector3 {
    if b.norm_squared() < f64::EPSILON {
        return *a;
    }
    a - project_vector(a, b)
}

/// Returns the unit vector pointing from `from` towards `to`.
pub fn direction_to(from: &Vector3, to: &Vector3) -> Vector3 {
    (to - from).normalize()
}

/// Returns the angle between the two vectors in degrees, in [0, 180].
pub fn angle_between_deg(a: &Vector3, b: &Vector3) -> f64 {
    let cos_angle = (a.dot(b) / (a.norm() * b.norm())).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Rotates the vector around the X axis by the provided angle, returning a new vector.
pub fn rotate_about_x(v: &Vector3, angle_rad: f64) -> Vector3 {
    let (s, c) = angle_rad.sin_cos();
    Vector3::new(v.x, c * v.y - s * v.z, s * v.y + c * v.z)
}

/// Rotates the vector around the Y axis by the provided angle, returning a new vector.
pub fn rotate_about_y(v: &Vector3, angle_rad: f64) -> Vector3 {
    let (s, c) = angle_rad.sin_cos();
    Vector3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

/// Rotates the vector around the Z axis by the provided angle, returning a new vector.
pub fn rotate_about_z(v: &Vector3, angle_rad: f64) -> Vector3 {
    let (s, c) = angle_rad.sin_cos();
    Vector3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z)
}

#[cfg(test)]
mod math_ut {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn axis_rotations() {
        // Rotating X about Z by half pi yields Y.
        let v = rotate_about_z(&Vector3::x(), FRAC_PI_2);
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-15);
        // Rotating Y about X by half pi yields Z.
        let v = rotate_about_x(&Vector3::y(), FRAC_PI_2);
        assert_relative_eq!(v, Vector3::z(), epsilon = 1e-15);
        // Rotating Z about Y by half pi yields X.
        let v = rotate_about_y(&Vector3::z(), FRAC_PI_2);
        assert_relative_eq!(v, Vector3::x(), epsilon = 1e-15);
    }

    #[test]
    fn angles_and_directions() {
        assert_relative_eq!(angle_between_deg(&Vector3::x(), &Vector3::y()), 90.0);
        assert_relative_eq!(
            angle_between_deg(&Vector3::x(), &(-Vector3::x())),
            180.0,
            epsilon = 1e-12
        );
        let dir = direction_to(&Vector3::zeros(), &Vector3::new(0.0, 0.0, 12.5));
        assert_relative_eq!(dir, Vector3::z());
    }

    #[test]
    fn projection_and_perpendicular_split_a_vector() {
        let a = Vector3::new(3.0, -2.0, 7.5);
        let b = Vector3::new(0.5, 0.5, 0.0);
        let along = project_vector(&a, &b);
        let across = perp_vector(&a, &b);
        assert_relative_eq!(along + across, a, epsilon = 1e-14);
        assert_relative_eq!(across.dot(&b), 0.0, epsilon = 1e-14);
        // Without a reference direction there is nothing to remove.
        assert_eq!(perp_vector(&a, &Vector3::zeros()), a);
    }
}
