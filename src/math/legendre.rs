/*
 * HELION Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

/// Highest zonal degree supported by the oblateness model (inclusive).
pub const MAX_LEGENDRE_DEGREE: usize = 15;

/// Evaluates the Legendre polynomials P_0(ξ) through P_nmax(ξ) by the Bonnet recurrence
/// n P_n = (2n - 1) ξ P_{n-1} - (n - 1) P_{n-2}.
///
/// Only entries 0..=nmax of the returned array are meaningful.
pub fn legendre_polynomials(xi: f64, nmax: usize) -> [f64; MAX_LEGENDRE_DEGREE + 1] {
    debug_assert!(nmax <= MAX_LEGENDRE_DEGREE);
    let mut p = [0.0; MAX_LEGENDRE_DEGREE + 1];
    p[0] = 1.0;
    if nmax == 0 {
        return p;
    }
    p[1] = xi;
    for n in 2..=nmax {
        let nf = n as f64;
        p[n] = ((2.0 * nf - 1.0) * xi * p[n - 1] - (nf - 1.0) * p[n - 2]) / nf;
    }
    p
}

/// Evaluates the derivatives P'_0(ξ) through P'_nmax(ξ) from the polynomials themselves,
/// using (ξ² - 1) P'_n = n (ξ P_n - P_{n-1}).
///
/// At ξ = ±1 the recurrence divides by zero; both closed forms and the zonal accumulation
/// only ever multiply P'_n by cos(latitude), which vanishes there, so the derivative is
/// pinned to zero for n ≥ 2 at the singular points.
pub fn legendre_derivatives(
    xi: f64,
    nmax: usize,
    p: &[f64; MAX_LEGENDRE_DEGREE + 1],
) -> [f64; MAX_LEGENDRE_DEGREE + 1] {
    debug_assert!(nmax <= MAX_LEGENDRE_DEGREE);
    let mut dp = [0.0; MAX_LEGENDRE_DEGREE + 1];
    if nmax == 0 {
        return dp;
    }
    dp[1] = 1.0;
    let denom = xi * xi - 1.0;
    if denom.abs() < f64::EPSILON {
        return dp;
    }
    for n in 2..=nmax {
        let nf = n as f64;
        dp[n] = nf * (xi * p[n] - p[n - 1]) / denom;
    }
    dp
}
