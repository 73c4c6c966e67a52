/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Classical (osculating) Keplerian element set. The Cartesian<->Keplerian
//! conversion is GMAT's `StateConversionUtil::ComputeKeplToCart`/its
//! inverse, ported from the teacher's `Orbit::try_keplerian` and the
//! `sma_km`/`ecc`/`inc_deg`/`raan_deg`/`aop_deg`/`ta_deg` accessors rather
//! than rewritten against a textbook formulation.

use core::f64::consts::{PI, TAU};
use core::marker::PhantomData;

use hifitime::{Epoch, TimeUnits};
use log::warn;
use snafu::ensure;

use crate::errors::{
    HyperbolicTrueAnomalySnafu, NonFiniteValueSnafu, ParabolicEccentricitySnafu, PhysicsResult,
};
use crate::frames::FrameTag;
use crate::math::kepler::{mean_to_true_anomaly_rad, true_to_mean_anomaly_rad};
use crate::math::units::{Angle, GravParam, Length, Unitless};
use crate::math::vector::Vector;
use crate::math::Vector3;

use super::cartesian::Cartesian;

/// Below this eccentricity, the orbit is treated as circular for the
/// purposes of the parabolic-eccentricity guard: matches the source's
/// `ECC_EPSILON`.
pub const ECC_EPSILON: f64 = 1e-11;

/// How [`Keplerian::try_from_cartesian`] resolves the RAAN/AOP
/// singularity that appears when the orbital-momentum vector lies
/// along the reference pole and the node line is undefined: equatorial
/// prograde orbits snap at inclination near 0, equatorial retrograde
/// orbits snap near pi. Both share the same underlying degeneracy (the
/// node vector's norm vanishing), so which canonical RAAN/AOP value
/// (0 here; the source picks 0 unconditionally) a caller should expect
/// is a policy rather than a fixed constant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InclinationSnapPolicy {
    /// Snap RAAN and AOP to 0 whenever the node line is undefined,
    /// regardless of whether the singularity was approached from
    /// inclination near 0 or near pi. Matches the source's behavior.
    #[default]
    SnapNearPi,
    /// Same snap, but only applied near equatorial-prograde geometry
    /// (inclination near 0); near-retrograde (inclination near pi)
    /// orbits instead keep whatever RAAN/AOP the node-vector formula
    /// produces, even though it is numerically noisy there. Exists for
    /// callers who have independently verified their retrograde case
    /// needs the unsnapped value.
    SnapNearZero,
}

#[derive(Copy, Clone, Debug)]
pub struct Keplerian<F: FrameTag> {
    pub sma: Length,
    pub ecc: Unitless,
    pub inc: Angle,
    pub raan: Angle,
    pub aop: Angle,
    pub ta: Angle,
    pub epoch: Epoch,
    pub mu: GravParam,
    _frame: PhantomData<F>,
}

impl<F: FrameTag> Keplerian<F> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sma: Length,
        ecc: Unitless,
        inc: Angle,
        raan: Angle,
        aop: Angle,
        ta: Angle,
        epoch: Epoch,
        mu: GravParam,
    ) -> Self {
        Self {
            sma,
            ecc,
            inc,
            raan,
            aop,
            ta,
            epoch,
            mu,
            _frame: PhantomData,
        }
    }

    /// Mean anomaly, derived from the true anomaly by solving Kepler's
    /// equation in reverse.
    pub fn mean_anomaly(&self) -> PhysicsResult<Angle> {
        let ma = true_to_mean_anomaly_rad(self.ta.value(), self.ecc.value())
            .map_err(|source| crate::errors::PhysicsError::AppliedMath { source })?;
        Ok(Angle::new(ma))
    }

    /// The orbital period. Undefined (and not computed) for hyperbolic
    /// orbits.
    pub fn period_s(&self) -> f64 {
        TAU * (self.sma.value().powi(3) / self.mu.value()).sqrt()
    }

    /// Advances this element set by `dt_s` seconds under pure two-body
    /// dynamics: the mean anomaly is propagated linearly and converted
    /// back to a true anomaly via Kepler's equation. Everything else is
    /// held fixed, matching the analytical-ephemeris fallback's
    /// assumptions.
    pub fn propagated_by(&self, dt_s: f64) -> Self {
        let ma0 = self.mean_anomaly().unwrap_or(Angle::new(0.0));
        let n = (self.mu.value() / self.sma.value().abs().powi(3)).sqrt();
        let ma1 = (ma0.value() + n * dt_s).rem_euclid(TAU);
        let ta1 = mean_to_true_anomaly_rad(ma1, self.ecc.value()).unwrap_or(ma1);
        Self {
            ta: Angle::new(ta1),
            epoch: self.epoch + dt_s.seconds(),
            ..*self
        }
    }

    /// Converts this element set to the equivalent Cartesian state, per
    /// GMAT's `ComputeKeplToCart`.
    pub fn to_cartesian(&self) -> PhysicsResult<Cartesian<F>> {
        let mu = self.mu.value();
        let ecc = if self.ecc.value() < 0.0 {
            warn!("eccentricity cannot be negative: sign of eccentricity changed");
            -self.ecc.value()
        } else {
            self.ecc.value()
        };
        let sma = self.sma.value();

        ensure!(
            (1.0 - ecc).abs() >= ECC_EPSILON,
            ParabolicEccentricitySnafu { limit: ECC_EPSILON }
        );
        if ecc > 1.0 {
            let ta_deg = self.ta.wrapped_positive().to_degrees();
            ensure!(
                ta_deg <= (PI - (1.0 / ecc).acos()).to_degrees(),
                HyperbolicTrueAnomalySnafu { ta_deg }
            );
        }

        let inc = self.inc.value();
        let raan = self.raan.value();
        let aop = self.aop.value();
        let ta = self.ta.value();
        let p = sma * (1.0 - ecc * ecc);

        ensure!(
            (1.0 + ecc * ta.cos()).is_finite(),
            NonFiniteValueSnafu {
                action: "computing radius of orbit"
            }
        );

        let radius = p / (1.0 + ecc * ta.cos());
        let (sin_aop_ta, cos_aop_ta) = (aop + ta).sin_cos();
        let (sin_inc, cos_inc) = inc.sin_cos();
        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_aop, cos_aop) = aop.sin_cos();

        let x = radius * (cos_aop_ta * cos_raan - cos_inc * sin_aop_ta * sin_raan);
        let y = radius * (cos_aop_ta * sin_raan + cos_inc * sin_aop_ta * cos_raan);
        let z = radius * sin_aop_ta * sin_inc;

        let sqrt_gm_p = (mu / p).sqrt();
        let cos_ta_ecc = ta.cos() + ecc;
        let sin_ta = ta.sin();

        let vx = sqrt_gm_p * cos_ta_ecc * (-sin_aop * cos_raan - cos_inc * sin_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * cos_raan - cos_inc * sin_raan * sin_aop);
        let vy = sqrt_gm_p * cos_ta_ecc * (-sin_aop * sin_raan + cos_inc * cos_raan * cos_aop)
            - sqrt_gm_p * sin_ta * (cos_aop * sin_raan + cos_inc * cos_raan * sin_aop);
        let vz = sqrt_gm_p * (cos_ta_ecc * sin_inc * cos_aop - sin_ta * sin_inc * sin_aop);

        Ok(Cartesian::new(
            Vector::from_raw(Vector3::new(x, y, z)),
            Vector::from_raw(Vector3::new(vx, vy, vz)),
            self.epoch,
            self.mu,
        ))
    }

    /// Derives the classical elements from a Cartesian state, per GMAT's
    /// inverse conversion (the `sma_km`/`ecc`/`inc_deg`/... accessors on
    /// the source's `Orbit`), snapping RAAN/AOP at the node-line
    /// singularity per the default [`InclinationSnapPolicy`].
    pub fn try_from_cartesian(cart: &Cartesian<F>) -> PhysicsResult<Self> {
        Self::try_from_cartesian_with_policy(cart, InclinationSnapPolicy::default())
    }

    /// As [`Self::try_from_cartesian`], with explicit control over how
    /// the equatorial-orbit RAAN/AOP singularity is resolved.
    pub fn try_from_cartesian_with_policy(
        cart: &Cartesian<F>,
        policy: InclinationSnapPolicy,
    ) -> PhysicsResult<Self> {
        let h = cart.hvec()?;
        let hmag = h.norm();
        let e = cart.evec()?;
        let ecc = e.norm();
        let energy = cart.energy_km2_s2()?;
        let sma = -cart.mu.value() / (2.0 * energy);

        let inc = (h[2] / hmag).acos();

        let node = Vector3::new(0.0, 0.0, 1.0).cross(&h);
        let node_is_singular = node.norm() <= f64::EPSILON;
        let near_pi = (inc - PI).abs() < 1e-8;
        let use_unsnapped = node_is_singular && policy == InclinationSnapPolicy::SnapNearZero && near_pi;

        if node_is_singular {
            warn!(
                "node line undefined at inclination {inc} rad ({policy:?}): RAAN/AOP {}",
                if use_unsnapped {
                    "computed from the eccentricity vector instead of snapped to 0"
                } else {
                    "snapped to 0"
                }
            );
        }

        let raan = if node.norm() <= f64::EPSILON {
            0.0
        } else {
            let cos_raan = (node[0] / node.norm()).clamp(-1.0, 1.0);
            let raan = cos_raan.acos();
            if node[1] < 0.0 {
                TAU - raan
            } else {
                raan
            }
        };

        let aop = if node_is_singular {
            if use_unsnapped && ecc > f64::EPSILON {
                let lon_peri = e[1].atan2(e[0]);
                if inc > core::f64::consts::FRAC_PI_2 {
                    (TAU - lon_peri).rem_euclid(TAU)
                } else {
                    lon_peri.rem_euclid(TAU)
                }
            } else {
                0.0
            }
        } else if ecc <= f64::EPSILON {
            0.0
        } else {
            let cos_aop = (node.dot(&e) / (node.norm() * ecc)).clamp(-1.0, 1.0);
            let aop = cos_aop.acos();
            if e[2] < 0.0 {
                TAU - aop
            } else {
                aop
            }
        };

        let ta = if ecc <= f64::EPSILON {
            if node.norm() <= f64::EPSILON {
                cart.radius.raw()[0].atan2(cart.radius.raw()[1])
            } else {
                let cos_u = (node.dot(&cart.radius.raw()) / (node.norm() * cart.rmag().value()))
                    .clamp(-1.0, 1.0);
                let u = cos_u.acos();
                if cart.radius.raw()[2] < 0.0 {
                    TAU - u
                } else {
                    u
                }
            }
        } else {
            let cos_nu = (e.dot(&cart.radius.raw()) / (ecc * cart.rmag().value())).clamp(-1.0, 1.0);
            let nu = cos_nu.acos();
            if cart.radius.raw().dot(&cart.velocity.raw()) < 0.0 {
                TAU - nu
            } else {
                nu
            }
        };

        Ok(Self::new(
            Length::new(sma),
            Unitless::new(ecc),
            Angle::new(inc),
            Angle::new(raan),
            Angle::new(aop),
            Angle::new(ta),
            cart.epoch,
            cart.mu,
        ))
    }
}

#[cfg(test)]
mod keplerian_ut {
    use super::*;
    use crate::frames::EarthInertial;
    use approx::assert_relative_eq;

    fn leo() -> Keplerian<EarthInertial> {
        Keplerian::new(
            Length::new(7000.0),
            Unitless::new(0.001),
            Angle::from_degrees(51.6),
            Angle::from_degrees(30.0),
            Angle::from_degrees(15.0),
            Angle::from_degrees(0.0),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            GravParam::new(398_600.435_436),
        )
    }

    #[test]
    fn keplerian_to_cartesian_and_back_roundtrips() {
        let kep = leo();
        let cart = kep.to_cartesian().unwrap();
        let back = Keplerian::try_from_cartesian(&cart).unwrap();
        assert_relative_eq!(back.sma.value(), kep.sma.value(), epsilon = 1e-6);
        assert_relative_eq!(back.ecc.value(), kep.ecc.value(), epsilon = 1e-9);
        assert_relative_eq!(back.inc.value(), kep.inc.value(), epsilon = 1e-9);
    }

    #[test]
    fn propagation_advances_mean_anomaly() {
        let kep = leo();
        let period = kep.period_s();
        let quarter_orbit = kep.propagated_by(period / 4.0);
        let ma0 = kep.mean_anomaly().unwrap().value();
        let ma1 = quarter_orbit.mean_anomaly().unwrap().value();
        let delta = (ma1 - ma0).rem_euclid(TAU);
        assert_relative_eq!(delta, core::f64::consts::FRAC_PI_2, epsilon = 1e-3);
    }

    #[test]
    fn parabolic_eccentricity_is_rejected() {
        let mut kep = leo();
        kep.ecc = Unitless::new(1.0);
        assert!(kep.to_cartesian().is_err());
    }

    #[test]
    fn equatorial_orbit_raan_snaps_to_zero_by_default() {
        let equatorial = Keplerian::new(
            Length::new(7000.0),
            Unitless::new(0.01),
            Angle::from_degrees(0.0),
            Angle::from_degrees(123.0),
            Angle::from_degrees(45.0),
            Angle::from_degrees(10.0),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            GravParam::new(398_600.435_436),
        );
        let cart = equatorial.to_cartesian().unwrap();
        let back = Keplerian::try_from_cartesian(&cart).unwrap();
        assert_relative_eq!(back.raan.value(), 0.0, epsilon = 1e-9);
    }
}
