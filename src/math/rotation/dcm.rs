/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! A direction-cosine matrix tagged at compile time by its source and
//! destination frames, generalizing the teacher's `DCM` (which tags
//! `from`/`to` with runtime [`crate::NaifId`]s and checks them with
//! `ensure!` at multiplication time) to zero-sized
//! [`crate::frames::FrameTag`] types checked by the compiler: composing
//! two DCMs whose frames don't chain is a type error, not a runtime
//! `PhysicsError`.

use core::fmt;
use core::marker::PhantomData;
use core::ops::Mul;

use crate::frames::FrameTag;
use crate::math::rotation::{r1, r2, r3};
use crate::math::{Matrix3, Vector3, Vector6};

/// A rotation from frame `From` to frame `To`, with an optional time
/// derivative (needed to rotate a full Cartesian state, per the
/// transport theorem, rather than only a position).
#[derive(Copy, Clone, Debug)]
pub struct DirectionCosineMatrix<From, To> {
    pub rot_mat: Matrix3,
    pub rot_mat_dt: Option<Matrix3>,
    _from: PhantomData<From>,
    _to: PhantomData<To>,
}

impl<From: FrameTag, To: FrameTag> DirectionCosineMatrix<From, To> {
    fn from_rot_mat(rot_mat: Matrix3) -> Self {
        Self {
            rot_mat,
            rot_mat_dt: None,
            _from: PhantomData,
            _to: PhantomData,
        }
    }

    /// Rotation about the X axis.
    pub fn r1(angle_rad: f64) -> Self {
        Self::from_rot_mat(r1(angle_rad))
    }

    /// Rotation about the Y axis.
    pub fn r2(angle_rad: f64) -> Self {
        Self::from_rot_mat(r2(angle_rad))
    }

    /// Rotation about the Z axis.
    pub fn r3(angle_rad: f64) -> Self {
        Self::from_rot_mat(r3(angle_rad))
    }

    /// A composite X-Z-X Euler-angle rotation, e.g. for a 1-3-1 Euler
    /// sequence.
    pub fn xzx(alpha_rad: f64, beta_rad: f64, gamma_rad: f64) -> Self {
        Self::from_rot_mat(r1(gamma_rad) * r3(beta_rad) * r1(alpha_rad))
    }

    /// A composite 3-1-3 Euler-angle rotation (Ω, i, ω), used to
    /// assemble the perifocal-to-inertial rotation in the Keplerian
    /// conversion.
    pub fn zxz(raan_rad: f64, inc_rad: f64, aop_rad: f64) -> Self {
        Self::from_rot_mat(r3(-raan_rad) * r1(-inc_rad) * r3(-aop_rad))
    }

    /// Builds a DCM directly from three orthonormal row vectors.
    pub fn from_orthonormal_rows(row_x: Vector3, row_y: Vector3, row_z: Vector3) -> Self {
        Self::from_rot_mat(Matrix3::from_rows(&[
            row_x.transpose(),
            row_y.transpose(),
            row_z.transpose(),
        ]))
    }

    /// Builds a DCM directly from three orthonormal column vectors, e.g.
    /// the basis vectors of a state-dependent frame (RIC, VNC) expressed
    /// in `To`.
    pub fn from_orthonormal_columns(col_x: Vector3, col_y: Vector3, col_z: Vector3) -> Self {
        Self::from_rot_mat(Matrix3::from_columns(&[col_x, col_y, col_z]))
    }

    pub fn identity() -> Self {
        Self::from_rot_mat(Matrix3::identity())
    }

    pub fn is_identity(&self) -> bool {
        (self.rot_mat - Matrix3::identity()).norm() < 1e-8
    }

    /// Validity per SPICE's `rotation.req`: columns are unit vectors
    /// and the determinant of the unitized matrix is 1.
    pub fn is_valid(&self, unit_tol: f64, det_tol: f64) -> bool {
        for col in self.rot_mat.column_iter() {
            if (col.norm() - 1.0).abs() > unit_tol {
                return false;
            }
        }
        (self.rot_mat.determinant() - 1.0).abs() < det_tol
    }

    pub fn with_time_derivative(mut self, rot_mat_dt: Matrix3) -> Self {
        self.rot_mat_dt = Some(rot_mat_dt);
        self
    }

    /// The 6x6 state-rotation matrix, applying the transport theorem if
    /// a time derivative is present.
    pub fn state_dcm(&self) -> crate::math::Matrix6 {
        let mut full = crate::math::Matrix6::zeros();
        for i in 0..6 {
            for j in 0..6 {
                if (i < 3 && j < 3) || (i >= 3 && j >= 3) {
                    full[(i, j)] = self.rot_mat[(i % 3, j % 3)];
                } else if i >= 3 && j < 3 {
                    full[(i, j)] = self
                        .rot_mat_dt
                        .map(|dt| dt[(i - 3, j)])
                        .unwrap_or(0.0);
                }
            }
        }
        full
    }

    pub fn transpose(&self) -> DirectionCosineMatrix<To, From> {
        DirectionCosineMatrix {
            rot_mat: self.rot_mat.transpose(),
            rot_mat_dt: self.rot_mat_dt.map(|dt| dt.transpose()),
            _from: PhantomData,
            _to: PhantomData,
        }
    }

    /// Composes this rotation with another whose destination frame
    /// matches this one's source frame — `other: Middle -> From`,
    /// `self: From -> To`, yielding `Middle -> To`. The frame chain is
    /// enforced by the type signature; there is no runtime check to
    /// fail.
    pub fn mul_unchecked<Middle: FrameTag>(
        &self,
        other: DirectionCosineMatrix<Middle, From>,
    ) -> DirectionCosineMatrix<Middle, To> {
        let rot_mat = self.rot_mat * other.rot_mat;
        let rot_mat_dt = match (self.rot_mat_dt, other.rot_mat_dt) {
            (Some(self_dt), Some(other_dt)) => {
                Some(self_dt * other.rot_mat + self.rot_mat * other_dt)
            }
            (Some(self_dt), None) => Some(self_dt * other.rot_mat),
            (None, Some(other_dt)) => Some(self.rot_mat * other_dt),
            (None, None) => None,
        };
        DirectionCosineMatrix {
            rot_mat,
            rot_mat_dt,
            _from: PhantomData,
            _to: PhantomData,
        }
    }
}

impl<Middle: FrameTag, From: FrameTag, To: FrameTag> Mul<DirectionCosineMatrix<Middle, From>>
    for DirectionCosineMatrix<From, To>
{
    type Output = DirectionCosineMatrix<Middle, To>;

    fn mul(self, rhs: DirectionCosineMatrix<Middle, From>) -> Self::Output {
        self.mul_unchecked(rhs)
    }
}

impl<From: FrameTag, To: FrameTag> Mul<Vector3> for DirectionCosineMatrix<From, To> {
    type Output = Vector3;

    /// No frame checks at this layer: this multiplies a bare
    /// `nalgebra` vector, and the transport theorem is not applied
    /// (position only).
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.rot_mat * rhs
    }
}

impl<From: FrameTag, To: FrameTag> Mul<Vector6> for DirectionCosineMatrix<From, To> {
    type Output = Vector6;

    fn mul(self, rhs: Vector6) -> Vector6 {
        self.state_dcm() * rhs
    }
}

impl<From: FrameTag, To: FrameTag> PartialEq for DirectionCosineMatrix<From, To> {
    fn eq(&self, other: &Self) -> bool {
        let rot_mat_match = (self.rot_mat - other.rot_mat).norm() < 1e-9;
        let dt_match = match (self.rot_mat_dt, other.rot_mat_dt) {
            (Some(a), Some(b)) => (a - b).norm() < 1e-9,
            (None, None) => true,
            _ => false,
        };
        rot_mat_match && dt_match
    }
}

impl<From: FrameTag, To: FrameTag> fmt::Display for DirectionCosineMatrix<From, To> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotation {} -> {}: {}", From::NAME, To::NAME, self.rot_mat)
    }
}

#[cfg(test)]
mod dcm_ut {
    use super::*;
    use crate::frames::{EarthFixed, EarthInertial};
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn r1_rotates_z_to_y() {
        let dcm: DirectionCosineMatrix<EarthInertial, EarthFixed> =
            DirectionCosineMatrix::r1(FRAC_PI_2);
        assert_eq!(dcm * Vector3::x(), Vector3::x());
        assert!((dcm * Vector3::z() - Vector3::y()).norm() < f64::EPSILON);
    }

    #[test]
    fn transpose_of_transpose_is_self() {
        let dcm: DirectionCosineMatrix<EarthInertial, EarthFixed> =
            DirectionCosineMatrix::r3(0.4);
        let back = dcm.transpose().transpose();
        assert!((dcm.rot_mat - back.rot_mat).norm() < 1e-12);
    }

    #[test]
    fn dcm_times_transpose_is_identity() {
        let dcm: DirectionCosineMatrix<EarthInertial, EarthFixed> =
            DirectionCosineMatrix::r3(1.234);
        let product = dcm.mul_unchecked(dcm.transpose());
        assert!(product.is_identity());
    }
}
