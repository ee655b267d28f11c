/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::constants::celestial_bodies::*;
use crate::constants::{AU_M, JDE_J2000, OBLIQUITY_J2000_DEG};
use crate::dynamics::PoleMotion;
use crate::ephemeris::kepler::MeanElements;

/// The role of a body in the simulation, which drives where the driver files it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyRole {
    Star,
    Planet,
    Moon,
    MinorBody,
}

/// Oblateness parameters of a body: the zonal field, the reference ellipsoid and the pole.
#[derive(Copy, Clone, Debug)]
pub struct OblatenessConstants {
    /// μ used by the oblate field; equal to the body μ unless stated otherwise.
    pub oblate_mu_m3_s2: f64,
    pub eq_radius_m: f64,
    pub flattening: f64,
    /// J_0..J_nmax; the first two entries are placeholders.
    pub zonal: &'static [f64],
    pub pole: PoleMotion,
}

/// Catalogue entry for one body. Mass and μ are recorded independently: μ carries the
/// precise value, the mass is informative.
#[derive(Copy, Clone, Debug)]
pub struct BodyConstants {
    pub name: &'static str,
    pub role: BodyRole,
    /// Center of the body's orbit; `None` means heliocentric.
    pub center: Option<&'static str>,
    pub mass_kg: f64,
    pub mu_m3_s2: f64,
    pub diameter_m: f64,
    /// Mean Keplerian elements, absent for the Sun.
    pub elements: Option<MeanElements>,
    pub oblateness: Option<OblatenessConstants>,
}

#[allow(clippy::too_many_arguments)]
const fn planet_elements(
    sma_au: f64,
    sma_rate_au_cy: f64,
    ecc: f64,
    ecc_rate_cy: f64,
    inc_deg: f64,
    inc_rate_deg_cy: f64,
    mean_longitude_deg: f64,
    mean_longitude_rate_deg_cy: f64,
    long_peri_deg: f64,
    long_peri_rate_deg_cy: f64,
    long_node_deg: f64,
    long_node_rate_deg_cy: f64,
) -> MeanElements {
    MeanElements {
        sma_m: sma_au * AU_M,
        sma_rate_m_cy: sma_rate_au_cy * AU_M,
        ecc,
        ecc_rate_cy,
        inc_deg,
        inc_rate_deg_cy,
        mean_longitude_deg,
        mean_longitude_rate_deg_cy,
        long_peri_deg,
        long_peri_rate_deg_cy,
        long_node_deg,
        long_node_rate_deg_cy,
    }
}

/// Planetocentric elements for a moon: fixed apart from the mean longitude, whose rate
/// derives from the orbital period.
const fn moon_elements(
    sma_m: f64,
    ecc: f64,
    inc_deg: f64,
    mean_longitude_deg: f64,
    period_days: f64,
    long_peri_deg: f64,
    long_node_deg: f64,
) -> MeanElements {
    MeanElements {
        sma_m,
        sma_rate_m_cy: 0.0,
        ecc,
        ecc_rate_cy: 0.0,
        inc_deg,
        inc_rate_deg_cy: 0.0,
        mean_longitude_deg,
        mean_longitude_rate_deg_cy: 360.0 * 36_525.0 / period_days,
        long_peri_deg,
        long_peri_rate_deg_cy: 0.0,
        long_node_deg,
        long_node_rate_deg_cy: 0.0,
    }
}

// Mean planetary elements and rates from the JPL approximate ephemerides (Standish).
static PLANET_TABLE: [(&str, MeanElements); 9] = [
    (
        MERCURY,
        planet_elements(
            0.38709927, 0.00000037, 0.20563593, 0.00001906, 7.00497902, -0.00594749,
            252.25032350, 149472.67411175, 77.45779628, 0.16047689, 48.33076593, -0.12534081,
        ),
    ),
    (
        VENUS,
        planet_elements(
            0.72333566, 0.00000390, 0.00677672, -0.00004107, 3.39467605, -0.00078890,
            181.97909950, 58517.81538729, 131.60246718, 0.00268329, 76.67984255, -0.27769418,
        ),
    ),
    (
        // Earth-Moon barycenter elements; the barycentric offset is far below every
        // tolerance this provider is used for.
        EARTH,
        planet_elements(
            1.00000261, 0.00000562, 0.01671123, -0.00004392, -0.00001531, -0.01294668,
            100.46457166, 35999.37244981, 102.93768193, 0.32327364, 0.0, 0.0,
        ),
    ),
    (
        MARS,
        planet_elements(
            1.52371034, 0.00001847, 0.09339410, 0.00007882, 1.84969142, -0.00813131,
            -4.55343205, 19140.30268499, -23.94362959, 0.44441088, 49.55953891, -0.29257343,
        ),
    ),
    (
        JUPITER,
        planet_elements(
            5.20288700, -0.00011607, 0.04838624, -0.00013253, 1.30439695, -0.00183714,
            34.39644051, 3034.74612775, 14.72847983, 0.21252668, 100.47390909, 0.20469106,
        ),
    ),
    (
        SATURN,
        planet_elements(
            9.53667594, -0.00125060, 0.05386179, -0.00050991, 2.48599187, 0.00193609,
            49.95424423, 1222.49362201, 92.59887831, -0.41897216, 113.66242448, -0.28867794,
        ),
    ),
    (
        URANUS,
        planet_elements(
            19.18916464, -0.00196176, 0.04725744, -0.00004397, 0.77263783, -0.00242939,
            313.23810451, 428.48202785, 170.95427630, 0.40805281, 74.01692503, 0.04240589,
        ),
    ),
    (
        NEPTUNE,
        planet_elements(
            30.06992276, 0.00026291, 0.00859048, 0.00005105, 1.77004347, 0.00035372,
            -55.12002969, 218.45945325, 44.96476227, -0.32241464, 131.78422574, -0.00508664,
        ),
    ),
    (
        PLUTO,
        planet_elements(
            39.48211675, -0.00031596, 0.24882730, 0.00005170, 17.14001206, 0.00004818,
            238.92903833, 145.20780515, 224.06891629, -0.04062942, 110.30393684, -0.01183482,
        ),
    ),
];

static JUPITER_OBLATENESS: OblatenessConstants = OblatenessConstants {
    oblate_mu_m3_s2: 1.26686534e17,
    eq_radius_m: 7.1492e7,
    flattening: 0.06487,
    zonal: &[0.0, 0.0, 1.4736e-2, 0.0, -5.87e-4, 0.0, 3.4e-5],
    pole: PoleMotion {
        epoch_jde: JDE_J2000,
        ra_deg: 268.056595,
        dec_deg: 64.495303,
        ra_rate_deg_cy: -0.006499,
        dec_rate_deg_cy: 0.002413,
    },
};

static SATURN_OBLATENESS: OblatenessConstants = OblatenessConstants {
    oblate_mu_m3_s2: 3.7931187e16,
    eq_radius_m: 6.0268e7,
    flattening: 0.09796,
    zonal: &[0.0, 0.0, 1.629071e-2, 0.0, -9.3583e-4, 0.0, 8.614e-5],
    pole: PoleMotion {
        epoch_jde: JDE_J2000,
        ra_deg: 40.589,
        dec_deg: 83.537,
        ra_rate_deg_cy: -0.036,
        dec_rate_deg_cy: -0.004,
    },
};

static URANUS_OBLATENESS: OblatenessConstants = OblatenessConstants {
    oblate_mu_m3_s2: 5.793939e15,
    eq_radius_m: 2.5559e7,
    flattening: 0.02293,
    zonal: &[0.0, 0.0, 3.34343e-3, 0.0, -2.885e-5],
    pole: PoleMotion {
        epoch_jde: JDE_J2000,
        ra_deg: 257.311,
        dec_deg: -15.175,
        ra_rate_deg_cy: 0.0,
        dec_rate_deg_cy: 0.0,
    },
};

static NEPTUNE_OBLATENESS: OblatenessConstants = OblatenessConstants {
    oblate_mu_m3_s2: 6.836529e15,
    eq_radius_m: 2.4764e7,
    flattening: 0.01708,
    zonal: &[0.0, 0.0, 3.411e-3, 0.0, -3.5e-5],
    pole: PoleMotion {
        epoch_jde: JDE_J2000,
        ra_deg: 299.36,
        dec_deg: 43.46,
        ra_rate_deg_cy: 0.0,
        dec_rate_deg_cy: 0.0,
    },
};

/// The immutable catalogue of Solar System parameters: masses, gravitational parameters,
/// diameters, oblateness data, mean elements, the planet and moon lists and the
/// moon-to-planet mapping. Built once and passed by reference afterwards.
#[derive(Clone, Debug)]
pub struct Constants {
    bodies: Vec<BodyConstants>,
}

impl Constants {
    /// Earth's axial tilt (obliquity of the ecliptic at J2000), in degrees.
    pub const EARTH_AXIAL_TILT_DEG: f64 = OBLIQUITY_J2000_DEG;

    /// Builds the built-in catalogue: the Sun, the eight planets and Pluto, the major
    /// moons of Earth and of the four giants, and a few well-observed small bodies.
    pub fn builtin() -> Self {
        let mut bodies = vec![BodyConstants {
            name: SUN,
            role: BodyRole::Star,
            center: None,
            mass_kg: 1.98847e30,
            mu_m3_s2: 1.32712440018e20,
            diameter_m: 1.3914e9,
            elements: None,
            oblateness: None,
        }];

        let planet_data: [(f64, f64, f64, Option<OblatenessConstants>); 9] = [
            (3.3011e23, 2.2032e13, 4.879e6, None),
            (4.8675e24, 3.24859e14, 1.2104e7, None),
            (5.97219e24, 3.986004418e14, 1.2742e7, None),
            (6.4171e23, 4.282837e13, 6.779e6, None),
            (1.89819e27, 1.26686534e17, 1.39822e8, Some(JUPITER_OBLATENESS)),
            (5.6834e26, 3.7931187e16, 1.16464e8, Some(SATURN_OBLATENESS)),
            (8.6813e25, 5.793939e15, 5.0724e7, Some(URANUS_OBLATENESS)),
            (1.02409e26, 6.836529e15, 4.9244e7, Some(NEPTUNE_OBLATENESS)),
            (1.303e22, 8.71e11, 2.3766e6, None),
        ];
        for ((name, elements), (mass_kg, mu_m3_s2, diameter_m, oblateness)) in
            PLANET_TABLE.iter().zip(planet_data)
        {
            let role = if *name == PLUTO {
                BodyRole::MinorBody
            } else {
                BodyRole::Planet
            };
            bodies.push(BodyConstants {
                name: *name,
                role,
                center: None,
                mass_kg,
                mu_m3_s2,
                diameter_m,
                elements: Some(*elements),
                oblateness,
            });
        }

        // Moons: (name, host, mass, μ, diameter, elements). Mean longitudes are phases at
        // J2000; the node and perigee rates matter only for the Moon.
        let moons: [(&str, &str, f64, f64, f64, MeanElements); 10] = [
            (
                MOON,
                EARTH,
                7.342e22,
                4.9048695e12,
                3.4748e6,
                MeanElements {
                    sma_m: 3.84400e8,
                    sma_rate_m_cy: 0.0,
                    ecc: 0.0549,
                    ecc_rate_cy: 0.0,
                    inc_deg: 5.145,
                    inc_rate_deg_cy: 0.0,
                    mean_longitude_deg: 218.3164477,
                    mean_longitude_rate_deg_cy: 481_267.88123421,
                    long_peri_deg: 83.3532465,
                    long_peri_rate_deg_cy: 4_069.0137287,
                    long_node_deg: 125.0445479,
                    long_node_rate_deg_cy: -1_934.1362891,
                },
            ),
            (
                IO,
                JUPITER,
                8.9319e22,
                5.959916e12,
                3.6432e6,
                moon_elements(4.21800e8, 0.0041, 2.21, 342.02, 1.769138, 84.13, 100.47),
            ),
            (
                EUROPA,
                JUPITER,
                4.7998e22,
                3.202739e12,
                3.1216e6,
                moon_elements(6.71100e8, 0.0094, 2.71, 171.02, 3.551181, 88.97, 100.47),
            ),
            (
                GANYMEDE,
                JUPITER,
                1.4819e23,
                9.887834e12,
                5.2624e6,
                moon_elements(1.070400e9, 0.0013, 2.17, 317.54, 7.154553, 192.42, 100.47),
            ),
            (
                CALLISTO,
                JUPITER,
                1.0759e23,
                7.179289e12,
                4.8206e6,
                moon_elements(1.882700e9, 0.0074, 2.05, 181.41, 16.689017, 52.64, 100.47),
            ),
            (
                TITAN,
                SATURN,
                1.3452e23,
                8.978138e12,
                5.1496e6,
                moon_elements(1.221870e9, 0.0288, 27.2, 15.15, 15.945421, 164.0, 169.2),
            ),
            (
                RHEA,
                SATURN,
                2.3065e21,
                1.53938e11,
                1.5276e6,
                moon_elements(5.27108e8, 0.0013, 27.1, 202.5, 4.518212, 244.7, 169.5),
            ),
            (
                TITANIA,
                URANUS,
                3.400e21,
                2.269e11,
                1.5768e6,
                moon_elements(4.35910e8, 0.0011, 97.8, 24.6, 8.705872, 284.4, 167.6),
            ),
            (
                OBERON,
                URANUS,
                3.076e21,
                2.053e11,
                1.5228e6,
                moon_elements(5.83520e8, 0.0014, 97.9, 283.1, 13.463239, 104.4, 167.6),
            ),
            (
                TRITON,
                NEPTUNE,
                2.139e22,
                1.4276e12,
                2.7068e6,
                moon_elements(3.54759e8, 0.000016, 130.1, 63.0, 5.876854, 0.0, 213.2),
            ),
        ];
        for (name, host, mass_kg, mu_m3_s2, diameter_m, elements) in moons {
            bodies.push(BodyConstants {
                name,
                role: BodyRole::Moon,
                center: Some(host),
                mass_kg,
                mu_m3_s2,
                diameter_m,
                elements: Some(elements),
                oblateness: None,
            });
        }

        // A few well-observed small bodies on heliocentric orbits.
        let minor: [(&str, f64, f64, f64, MeanElements); 3] = [
            (
                CERES,
                9.383e20,
                6.26325e10,
                9.39e5,
                planet_elements(
                    2.7675, 0.0, 0.0758, 0.0, 10.594, 0.0, 249.5, 7_819.3, 153.51, 0.0,
                    80.39, 0.0,
                ),
            ),
            (
                VESTA,
                2.590e20,
                1.72883e10,
                5.25e5,
                planet_elements(
                    2.3617, 0.0, 0.0887, 0.0, 7.14, 0.0, 100.2, 9_917.8, 254.54, 0.0,
                    103.81, 0.0,
                ),
            ),
            (
                HALLEY,
                2.2e14,
                1.469e4,
                1.1e4,
                planet_elements(
                    17.834, 0.0, 0.96714, 0.0, 162.26, 0.0, 236.2, 478.2, 169.75, 0.0,
                    58.42, 0.0,
                ),
            ),
        ];
        for (name, mass_kg, mu_m3_s2, diameter_m, elements) in minor {
            bodies.push(BodyConstants {
                name,
                role: BodyRole::MinorBody,
                center: None,
                mass_kg,
                mu_m3_s2,
                diameter_m,
                elements: Some(elements),
                oblateness: None,
            });
        }

        Self { bodies }
    }

    pub fn get(&self, name: &str) -> Option<&BodyConstants> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyConstants> {
        self.bodies.iter()
    }

    /// The planets, in heliocentric distance order.
    pub fn planets(&self) -> impl Iterator<Item = &BodyConstants> {
        self.bodies.iter().filter(|b| b.role == BodyRole::Planet)
    }

    pub fn moons(&self) -> impl Iterator<Item = &BodyConstants> {
        self.bodies.iter().filter(|b| b.role == BodyRole::Moon)
    }

    /// The moons of the provided host, in catalogue order.
    pub fn moons_of<'a>(&'a self, host: &'a str) -> impl Iterator<Item = &'a BodyConstants> {
        self.moons().filter(move |b| b.center == Some(host))
    }

    /// The host planet of a moon, if the name designates a moon.
    pub fn planet_of(&self, moon: &str) -> Option<&'static str> {
        self.get(moon).and_then(|b| b.center)
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self::builtin()
    }
}
