/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

/// Universal gravitational constant in m^3/(kg s^2), 2018 CODATA value.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11;

/// Speed of light in meters per second (m/s), IAU recommended value.
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// One astronomical unit in meters, IAU 2012 definition.
pub const AU_M: f64 = 1.495_978_707e11;

/// Mean obliquity of the ecliptic at J2000 in degrees.
pub const OBLIQUITY_J2000_DEG: f64 = 23.43929;

/// Number of days per Julian century, used by all pole-motion rates.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Julian date of the J2000 reference epoch (2000-01-01 12:00 TT, used here as the pole epoch).
pub const JDE_J2000: f64 = 2_451_545.0;

/// Fixed integration step of the Solar System driver, in seconds.
pub const STEP_S: f64 = 3_600.0;

/// Beyond this planetocentric distance, an oblate attractor degrades to a point mass.
pub const OBLATENESS_RANGE_M: f64 = 5.0e9;

/// Earliest Julian date served by the built-in ephemeris (3000 BC).
pub const EPHEMERIS_FIRST_JDE: f64 = 625_673.5;

/// Latest Julian date served by the built-in ephemeris (AD 3000).
pub const EPHEMERIS_LAST_JDE: f64 = 2_816_787.5;

/// The body names used as keys throughout the toolkit.
pub mod celestial_bodies {
    pub const SUN: &str = "Sun";
    pub const MERCURY: &str = "Mercury";
    pub const VENUS: &str = "Venus";
    pub const EARTH: &str = "Earth";
    pub const MOON: &str = "Moon";
    pub const MARS: &str = "Mars";
    pub const JUPITER: &str = "Jupiter";
    pub const SATURN: &str = "Saturn";
    pub const URANUS: &str = "Uranus";
    pub const NEPTUNE: &str = "Neptune";
    pub const PLUTO: &str = "Pluto";
    pub const IO: &str = "Io";
    pub const EUROPA: &str = "Europa";
    pub const GANYMEDE: &str = "Ganymede";
    pub const CALLISTO: &str = "Callisto";
    pub const TITAN: &str = "Titan";
    pub const RHEA: &str = "Rhea";
    pub const TITANIA: &str = "Titania";
    pub const OBERON: &str = "Oberon";
    pub const TRITON: &str = "Triton";
    pub const CERES: &str = "Ceres";
    pub const VESTA: &str = "Vesta";
    pub const HALLEY: &str = "1P/Halley";

    /// The giant planets, i.e. the oblate attractors and the external perturbers of every moon system.
    pub const GIANTS: [&str; 4] = [JUPITER, SATURN, URANUS, NEPTUNE];
}
