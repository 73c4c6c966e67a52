/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Cartesian position/velocity element set, generalizing the teacher's
//! `CartesianState` (hard-coded km/km-s-1, runtime [`crate::frames::FrameUid`])
//! to a compile-time [`FrameTag`] and the [`crate::math::vector::Vector`]
//! dimensioned type.

use core::marker::PhantomData;

use hifitime::Epoch;

use crate::errors::{PhysicsResult, RadiusSnafu, VelocitySnafu};
use crate::frames::{FrameTag, Ric};
use crate::math::rotation::dcm::DirectionCosineMatrix;
use crate::math::units::{GravParam, Length, Velocity};
use crate::math::vector::Vector;
use crate::math::Vector3;

/// A Cartesian position/velocity state about a body with gravitational
/// parameter `mu`, expressed in frame `F`.
#[derive(Copy, Clone, Debug)]
pub struct Cartesian<F: FrameTag> {
    pub radius: Vector<Length, F>,
    pub velocity: Vector<Velocity, F>,
    pub epoch: Epoch,
    pub mu: GravParam,
    _frame: PhantomData<F>,
}

impl<F: FrameTag> Cartesian<F> {
    pub fn new(radius: Vector<Length, F>, velocity: Vector<Velocity, F>, epoch: Epoch, mu: GravParam) -> Self {
        Self {
            radius,
            velocity,
            epoch,
            mu,
            _frame: PhantomData,
        }
    }

    pub fn rmag(&self) -> Length {
        self.radius.norm()
    }

    pub fn vmag(&self) -> Velocity {
        self.velocity.norm()
    }

    pub fn r_hat(&self) -> Vector3 {
        self.radius.unit().raw()
    }

    pub fn v_hat(&self) -> Vector3 {
        self.velocity.unit().raw()
    }

    /// The specific orbital momentum vector, `r x v`. Not itself a
    /// dimensioned [`Vector`]: this crate carries no `km^2/s` newtype, so
    /// its raw `nalgebra` value is in km^2/s.
    pub fn hvec(&self) -> PhysicsResult<Vector3> {
        if self.rmag().value() <= f64::EPSILON {
            return RadiusSnafu {
                action: "cannot compute orbital momentum vector with zero radius",
            }
            .fail();
        }
        if self.vmag().value() <= f64::EPSILON {
            return VelocitySnafu {
                action: "cannot compute orbital momentum vector with zero velocity",
            }
            .fail();
        }
        Ok(self.radius.raw().cross(&self.velocity.raw()))
    }

    pub fn hmag(&self) -> PhysicsResult<f64> {
        Ok(self.hvec()?.norm())
    }

    /// The eccentricity vector (no unit, points toward periapsis).
    pub fn evec(&self) -> PhysicsResult<Vector3> {
        if self.rmag().value() <= f64::EPSILON {
            return RadiusSnafu {
                action: "cannot compute eccentricity vector with zero radial state",
            }
            .fail();
        }
        let r = self.radius.raw();
        let v = self.velocity.raw();
        let mu = self.mu.value();
        Ok(((v.norm().powi(2) - mu / r.norm()) * r - r.dot(&v) * v) / mu)
    }

    pub fn energy_km2_s2(&self) -> PhysicsResult<f64> {
        if self.rmag().value() <= f64::EPSILON {
            return RadiusSnafu {
                action: "cannot compute energy with zero radial state",
            }
            .fail();
        }
        Ok(self.vmag().value().powi(2) / 2.0 - self.mu.value() / self.rmag().value())
    }

    /// Propagates this state by `dt` under pure two-body dynamics, used to
    /// build the finite-difference neighbors for [`Self::ric_dcm`] and as
    /// the fallback when no force model is attached.
    pub fn at_epoch(&self, new_epoch: Epoch) -> PhysicsResult<Self> {
        let kep = crate::elements::keplerian::Keplerian::try_from_cartesian(self)?;
        let dt = new_epoch - self.epoch;
        let propagated = kep.propagated_by(dt.to_seconds());
        propagated.to_cartesian()
    }

    /// The rotation from the radial/in-track/cross-track frame centered
    /// on this state into `F`, built from the instantaneous geometry
    /// rather than a registered [`crate::frames::Rotation`] provider,
    /// since RIC's orientation depends on the state itself. Does not
    /// account for the transport theorem: most astrodynamics tools treat
    /// the RIC rotation as static over an instant, per the source this is
    /// ported from.
    pub fn ric_dcm(&self) -> PhysicsResult<DirectionCosineMatrix<Ric, F>> {
        let r_hat = self.r_hat();
        let c_hat = self.hvec()? / self.hmag()?;
        let i_hat = c_hat.cross(&r_hat);
        Ok(DirectionCosineMatrix::from_orthonormal_columns(
            r_hat, i_hat, c_hat,
        ))
    }
}

impl<F: FrameTag> PartialEq for Cartesian<F> {
    fn eq(&self, other: &Self) -> bool {
        self.radius == other.radius && self.velocity == other.velocity && self.epoch == other.epoch
    }
}

#[cfg(test)]
mod cartesian_ut {
    use super::*;
    use crate::frames::EarthInertial;
    use approx::assert_relative_eq;
    use hifitime::Epoch;

    fn leo() -> Cartesian<EarthInertial> {
        Cartesian::new(
            Vector::new(7000.0.into(), 0.0.into(), 0.0.into()),
            Vector::new(0.0.into(), 7.546_049_1.into(), 0.0.into()),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            GravParam::new(398_600.435_436),
        )
    }

    #[test]
    fn circular_leo_has_near_zero_eccentricity() {
        let orbit = leo();
        let ecc = orbit.evec().unwrap().norm();
        assert_relative_eq!(ecc, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn momentum_is_orthogonal_to_radius_and_velocity() {
        let orbit = leo();
        let h = orbit.hvec().unwrap();
        assert_relative_eq!(h.dot(&orbit.radius.raw()), 0.0, epsilon = 1e-6);
        assert_relative_eq!(h.dot(&orbit.velocity.raw()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn ric_dcm_is_orthonormal() {
        let orbit = leo();
        let dcm = orbit.ric_dcm().unwrap();
        assert!(dcm.is_valid(1e-6, 1e-6));
    }
}
