/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Kepler's equation, solved by Newton iteration, shared by the Keplerian
//! element conversions and the analytical ephemeris fallback. Ported from
//! the GTDS MathSpec-derived mean/true/eccentric anomaly routines rather
//! than rewritten against a textbook form, so the iteration counts and
//! singularity guards match the source's observed behavior exactly.

use core::f64::consts::{PI, TAU};

use crate::errors::{DomainSnafu, MathError, MaxIterationsReachedSnafu};

/// Mean anomaly residual below which the Newton iteration is considered
/// converged.
const MA_EPSILON: f64 = 1e-12;

const MAX_ITER: usize = 1000;

/// Solves Kepler's equation for the true anomaly given the mean anomaly
/// and eccentricity, dispatching on the elliptical/hyperbolic regime.
pub fn mean_to_true_anomaly_rad(ma_rad: f64, ecc: f64) -> Result<f64, MathError> {
    let rm = ma_rad.rem_euclid(TAU);

    if ecc <= 1.0 {
        let mut e2 = rm + ecc * rm.sin();
        let mut iter = 0;
        loop {
            let e1 = e2 - (e2 - ecc * e2.sin() - rm) / (1.0 - ecc * e2.cos());
            let normalized_anomaly = (e1 - e2).abs();
            if normalized_anomaly < MA_EPSILON {
                e2 = e1;
                break;
            }
            e2 = e1;
            iter += 1;
            if iter > MAX_ITER {
                return MaxIterationsReachedSnafu {
                    iter: MAX_ITER,
                    action: "solving Kepler's equation for the eccentric anomaly",
                }
                .fail();
            }
            if !e2.is_finite() {
                return DomainSnafu {
                    value: e2,
                    msg: "eccentric anomaly iteration diverged to a non-finite value",
                }
                .fail();
            }
        }
        let e = e2.rem_euclid(TAU);

        if (e - PI).abs() < 1e-8 {
            return Ok(e);
        }

        let ta = 2.0 * (((1.0 + ecc) / (1.0 - ecc)).sqrt() * (e / 2.0).tan()).atan();
        Ok(ta)
    } else {
        let mut f2 = 0.0_f64;
        let mut iter = 0;
        loop {
            let f1 = f2 - (ecc * f2.sinh() - f2 - rm) / (ecc * f2.cosh() - 1.0);
            let delta = (f1 - f2).abs();
            f2 = f1;
            if delta < MA_EPSILON {
                break;
            }
            iter += 1;
            if iter > MAX_ITER {
                return MaxIterationsReachedSnafu {
                    iter: MAX_ITER,
                    action: "solving the hyperbolic Kepler equation for the hyperbolic anomaly",
                }
                .fail();
            }
            if !f2.is_finite() {
                return DomainSnafu {
                    value: f2,
                    msg: "hyperbolic anomaly iteration diverged to a non-finite value",
                }
                .fail();
            }
        }
        let ta = 2.0 * (((ecc + 1.0) / (ecc - 1.0)).sqrt() * (f2 / 2.0).tanh()).atan();
        Ok(ta)
    }
}

/// Solves for the eccentric (or hyperbolic) anomaly given the true anomaly.
pub fn true_to_eccentric_anomaly_rad(nu_rad: f64, ecc: f64) -> Result<f64, MathError> {
    if ecc < 0.0 {
        return DomainSnafu {
            value: ecc,
            msg: "eccentricity cannot be negative",
        }
        .fail();
    }

    if ecc < 1.0 {
        let e_num = (1.0 - ecc * ecc).sqrt() * nu_rad.sin();
        let e_den = ecc + nu_rad.cos();
        Ok(e_num.atan2(e_den))
    } else {
        if (ecc + 1.0).abs() < f64::EPSILON {
            return crate::errors::DivisionByZeroSnafu {
                action: "computing hyperbolic eccentric anomaly, (e + 1.0) is zero",
            }
            .fail();
        }
        let factor_sqrt = (ecc - 1.0) / (ecc + 1.0);
        if factor_sqrt < 0.0 {
            return DomainSnafu {
                value: factor_sqrt,
                msg: "argument for sqrt in hyperbolic case is negative",
            }
            .fail();
        }
        let tan_nu_half = (nu_rad / 2.0).tan();
        let atanh_arg = (factor_sqrt.sqrt() * tan_nu_half).clamp(-1.0 + f64::EPSILON, 1.0 - f64::EPSILON);
        Ok(2.0 * atanh_arg.atanh())
    }
}

/// Equation-of-center series approximation of the true anomaly from the
/// mean anomaly, accurate to `O(e^6)`. Used by the analytical-ephemeris
/// fallback as a cheap default in place of the exact Newton solve above
/// ([`mean_to_true_anomaly_rad`]), which remains available for callers
/// that request exact accuracy.
pub fn mean_to_true_anomaly_series_rad(ma_rad: f64, ecc: f64) -> f64 {
    let e = ecc;
    let e2 = e * e;
    let e3 = e2 * e;
    let e4 = e3 * e;
    let e5 = e4 * e;

    let c1 = 2.0 * e - e3 / 4.0 + 5.0 * e5 / 96.0;
    let c2 = 5.0 * e2 / 4.0 - 11.0 * e4 / 24.0;
    let c3 = 13.0 * e3 / 12.0 - 43.0 * e5 / 64.0;
    let c4 = 103.0 * e4 / 96.0;
    let c5 = 1097.0 * e5 / 960.0;

    ma_rad
        + c1 * ma_rad.sin()
        + c2 * (2.0 * ma_rad).sin()
        + c3 * (3.0 * ma_rad).sin()
        + c4 * (4.0 * ma_rad).sin()
        + c5 * (5.0 * ma_rad).sin()
}

/// Converts a true anomaly into a mean anomaly, wrapped to `[0, 2*pi)`.
pub fn true_to_mean_anomaly_rad(nu_rad: f64, ecc: f64) -> Result<f64, MathError> {
    let e_rad = true_to_eccentric_anomaly_rad(nu_rad, ecc)?;
    let m_rad = if ecc < 1.0 {
        e_rad - ecc * e_rad.sin()
    } else {
        ecc * e_rad.sinh() - e_rad
    };
    Ok(m_rad.rem_euclid(TAU))
}

#[cfg(test)]
mod kepler_ut {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_true_roundtrip_elliptical() {
        let ma = 1.2;
        let ecc = 0.34;
        let ta = mean_to_true_anomaly_rad(ma, ecc).unwrap();
        let back = true_to_mean_anomaly_rad(ta, ecc).unwrap();
        assert_relative_eq!(back, ma, epsilon = 1e-9);
    }

    #[test]
    fn mean_true_roundtrip_hyperbolic() {
        let ma = 2.5;
        let ecc = 1.5;
        let ta = mean_to_true_anomaly_rad(ma, ecc).unwrap();
        let back = true_to_mean_anomaly_rad(ta, ecc).unwrap();
        assert_relative_eq!(back, ma, epsilon = 1e-6);
    }

    #[test]
    fn circular_orbit_mean_equals_true() {
        let ta = mean_to_true_anomaly_rad(0.7, 0.0).unwrap();
        assert_relative_eq!(ta, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn equation_of_center_matches_exact_solve_for_low_eccentricity() {
        let ma = 1.1;
        let ecc = 0.05;
        let exact = mean_to_true_anomaly_rad(ma, ecc).unwrap();
        let series = mean_to_true_anomaly_series_rad(ma, ecc);
        assert_relative_eq!(series, exact, epsilon = 1e-9);
    }
}
