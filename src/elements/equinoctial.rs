/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Modified equinoctial elements, singular only for retrograde
//! (inclination = 180 deg) orbits rather than also at zero eccentricity
//! or zero inclination like the classical set. Ported from the
//! teacher's `orbit_equinoctial` module.

use core::f64::consts::TAU;
use core::marker::PhantomData;

use hifitime::Epoch;

use crate::errors::PhysicsResult;
use crate::frames::FrameTag;
use crate::math::units::{Angle, GravParam, Length, Unitless};

use super::keplerian::Keplerian;

#[derive(Copy, Clone, Debug)]
pub struct Equinoctial<F: FrameTag> {
    pub sma: Length,
    pub h: Unitless,
    pub k: Unitless,
    pub p: Unitless,
    pub q: Unitless,
    pub mean_lon: Angle,
    pub epoch: Epoch,
    pub mu: GravParam,
    _frame: PhantomData<F>,
}

impl<F: FrameTag> Equinoctial<F> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sma: Length,
        h: Unitless,
        k: Unitless,
        p: Unitless,
        q: Unitless,
        mean_lon: Angle,
        epoch: Epoch,
        mu: GravParam,
    ) -> Self {
        Self {
            sma,
            h,
            k,
            p,
            q,
            mean_lon,
            epoch,
            mu,
            _frame: PhantomData,
        }
    }

    /// Converts a classical Keplerian element set to modified
    /// equinoctial elements.
    pub fn from_keplerian(kep: &Keplerian<F>) -> PhysicsResult<Self> {
        let ecc = kep.ecc.value();
        let inc = kep.inc.value();
        let raan = kep.raan.value();
        let aop = kep.aop.value();
        let ma = kep.mean_anomaly()?.value();

        let h = ecc * (aop + raan).sin();
        let k = ecc * (aop + raan).cos();
        let p = (inc / 2.0).tan() * raan.sin();
        let q = (inc / 2.0).tan() * raan.cos();
        let mean_lon = (aop + raan + ma).rem_euclid(TAU);

        Ok(Self::new(
            kep.sma,
            Unitless::new(h),
            Unitless::new(k),
            Unitless::new(p),
            Unitless::new(q),
            Angle::new(mean_lon),
            kep.epoch,
            kep.mu,
        ))
    }

    /// Converts back to the classical Keplerian element set, per the
    /// source's `equinoctial_to_keplerian`.
    pub fn to_keplerian(&self) -> PhysicsResult<Keplerian<F>> {
        let h = self.h.value();
        let k = self.k.value();
        let p = self.p.value();
        let q = self.q.value();
        let mean_lon = self.mean_lon.value();

        let ecc = (h * h + k * k).sqrt();
        let inc = 2.0 * (p * p + q * q).sqrt().atan();

        let raan = if p.abs() < f64::EPSILON && q.abs() < f64::EPSILON {
            0.0
        } else {
            p.atan2(q)
        };

        let aop_plus_raan = if h.abs() < f64::EPSILON && k.abs() < f64::EPSILON {
            0.0
        } else {
            h.atan2(k)
        };
        let aop = (aop_plus_raan - raan).rem_euclid(TAU);

        let ma = (mean_lon - aop_plus_raan).rem_euclid(TAU);
        let ta = crate::math::kepler::mean_to_true_anomaly_rad(ma, ecc)
            .map_err(|source| crate::errors::PhysicsError::AppliedMath { source })?;

        Ok(Keplerian::new(
            self.sma,
            Unitless::new(ecc),
            Angle::new(inc),
            Angle::new(raan.rem_euclid(TAU)),
            Angle::new(aop),
            Angle::new(ta),
            self.epoch,
            self.mu,
        ))
    }
}

#[cfg(test)]
mod equinoctial_ut {
    use super::*;
    use crate::frames::EarthInertial;
    use approx::assert_relative_eq;

    fn leo_kep() -> Keplerian<EarthInertial> {
        Keplerian::new(
            Length::new(7000.0),
            Unitless::new(0.001),
            Angle::from_degrees(51.6),
            Angle::from_degrees(30.0),
            Angle::from_degrees(15.0),
            Angle::from_degrees(10.0),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            GravParam::new(398_600.435_436),
        )
    }

    #[test]
    fn keplerian_roundtrips_through_equinoctial() {
        let kep = leo_kep();
        let equi = Equinoctial::from_keplerian(&kep).unwrap();
        let back = equi.to_keplerian().unwrap();
        assert_relative_eq!(back.sma.value(), kep.sma.value(), epsilon = 1e-6);
        assert_relative_eq!(back.ecc.value(), kep.ecc.value(), epsilon = 1e-9);
        assert_relative_eq!(back.inc.value(), kep.inc.value(), epsilon = 1e-8);
    }

    #[test]
    fn circular_equatorial_orbit_has_near_zero_pq() {
        let kep = Keplerian::new(
            Length::new(7000.0),
            Unitless::new(0.0),
            Angle::from_degrees(0.0),
            Angle::from_degrees(0.0),
            Angle::from_degrees(0.0),
            Angle::from_degrees(45.0),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            GravParam::new(398_600.435_436),
        );
        let equi = Equinoctial::from_keplerian(&kep).unwrap();
        assert_relative_eq!(equi.p.value(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(equi.q.value(), 0.0, epsilon = 1e-9);
    }
}
