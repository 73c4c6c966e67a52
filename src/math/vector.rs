/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! A 3-component vector carrying both a dimensioned value type and a
//! phantom frame tag, generalizing the teacher's frame-tagged
//! `CartesianState` (which hard-codes km/km-s-1 and a runtime `Frame`)
//! to an arbitrary [`Dimension`] and a compile-time [`FrameTag`].
//! `Vector<Length, EarthInertial>` and `Vector<Length, MarsInertial>`
//! are distinct Rust types: adding them, or comparing them for
//! equality, is a compile error rather than a runtime frame check.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::errors::{DomainSnafu, MathError};
use crate::frames::{FrameTag, Rotation};
use crate::math::units::{Dimension, Unitless};
use crate::math::Vector3;
use crate::time::Epoch;

/// A dimensioned, frame-tagged 3-vector.
///
/// `cross` and `dot` do not model a distinct `Value^2` dimension type —
/// this crate does not carry e.g. a `LengthSquared` newtype — so both
/// return components/scalars in the same underlying unit as `V`,
/// leaving the squared-dimension bookkeeping to the caller. Everywhere
/// else the unit discipline is exact.
#[derive(Copy, Clone, Debug)]
pub struct Vector<V, F> {
    raw: Vector3,
    _value: PhantomData<V>,
    _frame: PhantomData<F>,
}

impl<V: Dimension, F: FrameTag> Vector<V, F> {
    pub fn new(x: V, y: V, z: V) -> Self {
        Self {
            raw: Vector3::new(x.raw(), y.raw(), z.raw()),
            _value: PhantomData,
            _frame: PhantomData,
        }
    }

    pub fn zero() -> Self {
        Self::new(V::from(0.0), V::from(0.0), V::from(0.0))
    }

    pub fn x(&self) -> V {
        V::from(self.raw.x)
    }

    pub fn y(&self) -> V {
        V::from(self.raw.y)
    }

    pub fn z(&self) -> V {
        V::from(self.raw.z)
    }

    /// The raw `nalgebra` vector backing this value, in `V`'s internal
    /// unit. Used at the seams with force models and the integrator,
    /// which operate on bare `f64` state vectors.
    pub fn raw(&self) -> Vector3 {
        self.raw
    }

    pub fn from_raw(raw: Vector3) -> Self {
        Self {
            raw,
            _value: PhantomData,
            _frame: PhantomData,
        }
    }

    /// Dot product. See the struct-level note on squared dimensions.
    pub fn dot(&self, other: &Self) -> f64 {
        self.raw.dot(&other.raw)
    }

    /// Cross product. See the struct-level note on squared dimensions.
    pub fn cross(&self, other: &Self) -> Self {
        Self::from_raw(self.raw.cross(&other.raw))
    }

    pub fn norm(&self) -> V {
        V::from(self.raw.norm())
    }

    /// The unit vector in this vector's direction, or the zero vector
    /// if its norm is zero.
    pub fn unit(&self) -> Vector<Unitless, F> {
        let norm = self.raw.norm();
        if norm <= f64::EPSILON {
            Vector::zero()
        } else {
            Vector::from_raw(self.raw / norm)
        }
    }

    /// The angle between this vector and `other`. Fails if either
    /// vector is zero-magnitude: direction is undefined there, and the
    /// caller is expected to have guarded against degenerate geometry
    /// before asking for an angle.
    pub fn offset_angle_rad(&self, other: &Self) -> Result<f64, MathError> {
        let denom = self.raw.norm() * other.raw.norm();
        if denom <= f64::EPSILON {
            return DomainSnafu {
                value: denom,
                msg: "offset_angle requires both vectors to have nonzero magnitude",
            }
            .fail();
        }
        let cos_theta = (self.raw.dot(&other.raw) / denom).clamp(-1.0, 1.0);
        Ok(cos_theta.acos())
    }

    /// Rotates this vector into frame `F2`, using the statically
    /// registered [`Rotation`] provider. Same-origin only: if `F` and
    /// `F2` differ in origin as well as axes, compose with an explicit
    /// translation (e.g. an ephemeris-derived offset) yourself — this
    /// type cannot infer which translation is semantically correct.
    pub fn in_frame<F2: FrameTag>(&self, date: Epoch) -> Vector<V, F2>
    where
        F: Rotation<F2>,
    {
        let dcm = F::dcm(date);
        Vector::from_raw(dcm.rot_mat * self.raw)
    }

    /// Translates this vector by an offset expressed in the same frame
    /// and unit, e.g. composing an ephemeris-derived body-to-body
    /// offset after a rotation via [`Self::in_frame`].
    pub fn translated(&self, offset: Self) -> Self {
        Self::from_raw(self.raw + offset.raw)
    }
}

impl<V: Dimension, F: FrameTag> Default for Vector<V, F> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<V: Dimension, F: FrameTag> PartialEq for Vector<V, F> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<V: Dimension, F: FrameTag> Add for Vector<V, F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_raw(self.raw + rhs.raw)
    }
}

impl<V: Dimension, F: FrameTag> Sub for Vector<V, F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_raw(self.raw - rhs.raw)
    }
}

impl<V: Dimension, F: FrameTag> Neg for Vector<V, F> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::from_raw(-self.raw)
    }
}

impl<V: Dimension, F: FrameTag> Mul<f64> for Vector<V, F> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::from_raw(self.raw * rhs)
    }
}

impl<V: Dimension, F: FrameTag> Div<f64> for Vector<V, F> {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::from_raw(self.raw / rhs)
    }
}

impl<V: Dimension, F: FrameTag> fmt::Display for Vector<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}, {}, {})", F::NAME, self.raw.x, self.raw.y, self.raw.z)
    }
}

#[cfg(test)]
mod vector_ut {
    use super::*;
    use crate::frames::EarthInertial;
    use crate::math::units::Length;
    use approx::assert_relative_eq;

    #[test]
    fn add_and_negate_cancel() {
        let v: Vector<Length, EarthInertial> = Vector::new(1.0.into(), 2.0.into(), 3.0.into());
        let zero = v + (-v);
        assert_eq!(zero, Vector::zero());
    }

    #[test]
    fn unit_has_norm_one() {
        let v: Vector<Length, EarthInertial> = Vector::new(3.0.into(), 4.0.into(), 0.0.into());
        let u = v.unit();
        assert_relative_eq!(u.raw().norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cross_is_orthogonal_to_operands() {
        let a: Vector<Length, EarthInertial> = Vector::new(1.0.into(), 0.0.into(), 0.0.into());
        let b: Vector<Length, EarthInertial> = Vector::new(0.0.into(), 1.0.into(), 0.0.into());
        let c = a.cross(&b);
        assert_relative_eq!(c.dot(&a), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.dot(&b), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn offset_angle_rejects_zero_vector() {
        let a: Vector<Length, EarthInertial> = Vector::zero();
        let b: Vector<Length, EarthInertial> = Vector::new(1.0.into(), 0.0.into(), 0.0.into());
        assert!(a.offset_angle_rad(&b).is_err());
    }
}
