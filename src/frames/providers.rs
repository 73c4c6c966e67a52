/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Explicit `Rotation<To>` registrations: the compile-time frame graph's
//! edges. Each body-fixed/inertial pair is registered in both
//! directions — the `Fixed -> Inertial` direction computed directly via
//! [`super::rotation_angle_rad`], the `Inertial -> Fixed` direction as
//! its manually-written transpose — mirroring how the source's
//! registry resolves a reverse lookup by transposing a forward
//! provider.
//!
//! Rotation rates and prime-meridian-at-J2000 offsets below are the
//! same IAU-style constants carried on the matching
//! [`crate::bodies::CelestialBody`] catalog entries; they are
//! duplicated here as `const` because a `Rotation::dcm` provider takes
//! only a date; see `DESIGN.md` for the rationale.

use super::tags::{
    EarthFixed, EarthInertial, JupiterFixed, JupiterInertial, MarsFixed, MarsInertial, MoonFixed,
    MoonInertial, NeptuneFixed, NeptuneInertial, SaturnFixed, SaturnInertial, SunFixed,
    SunInertial, UranusFixed, UranusInertial, VenusFixed, VenusInertial,
};
use super::{rotation_angle_rad, Rotation, Ssb};
use crate::math::rotation::dcm::DirectionCosineMatrix;
use crate::time::Epoch;

fn j2000() -> Epoch {
    Epoch::from_jde_tdb(crate::constants::J2000_JD)
}

macro_rules! ssb_inertial_identity {
    ($inertial:ident) => {
        impl Rotation<$inertial> for Ssb {
            fn dcm(_date: Epoch) -> DirectionCosineMatrix<Ssb, $inertial> {
                DirectionCosineMatrix::identity()
            }
        }

        impl Rotation<Ssb> for $inertial {
            fn dcm(_date: Epoch) -> DirectionCosineMatrix<$inertial, Ssb> {
                DirectionCosineMatrix::identity()
            }
        }
    };
}

ssb_inertial_identity!(SunInertial);
ssb_inertial_identity!(EarthInertial);
ssb_inertial_identity!(MoonInertial);
ssb_inertial_identity!(VenusInertial);
ssb_inertial_identity!(MarsInertial);
ssb_inertial_identity!(JupiterInertial);
ssb_inertial_identity!(SaturnInertial);
ssb_inertial_identity!(UranusInertial);
ssb_inertial_identity!(NeptuneInertial);

macro_rules! body_spin_provider {
    ($inertial:ident, $fixed:ident, $rate_rad_s:expr, $prime_meridian_rad:expr) => {
        impl Rotation<$fixed> for $inertial {
            fn dcm(date: Epoch) -> DirectionCosineMatrix<$inertial, $fixed> {
                let theta = rotation_angle_rad($rate_rad_s, $prime_meridian_rad, j2000(), date);
                DirectionCosineMatrix::r3(theta)
            }
        }

        impl Rotation<$inertial> for $fixed {
            fn dcm(date: Epoch) -> DirectionCosineMatrix<$fixed, $inertial> {
                <$inertial as Rotation<$fixed>>::dcm(date).transpose()
            }
        }
    };
}

// Rotation rates in rad/s and prime-meridian-at-J2000 offsets in
// radians, IAU-style values (sidereal rotation, not solar day).
body_spin_provider!(SunInertial, SunFixed, 2.865e-6, 0.0);
body_spin_provider!(EarthInertial, EarthFixed, 7.292_115_146_7e-5, 1.753_368_559);
body_spin_provider!(MoonInertial, MoonFixed, 2.661_699_e-6, 0.0);
body_spin_provider!(VenusInertial, VenusFixed, -2.992_44e-7, 0.0);
body_spin_provider!(MarsInertial, MarsFixed, 7.088_218_4e-5, 0.0);
body_spin_provider!(JupiterInertial, JupiterFixed, 1.758_518_0e-4, 0.0);
body_spin_provider!(SaturnInertial, SaturnFixed, 1.637_884_0e-4, 0.0);
body_spin_provider!(UranusInertial, UranusFixed, -1.012_376_0e-4, 0.0);
body_spin_provider!(NeptuneInertial, NeptuneFixed, 1.083_382_0e-4, 0.0);

#[cfg(test)]
mod providers_ut {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn earth_inertial_fixed_roundtrip_is_identity() {
        let date = j2000();
        let fwd = <EarthInertial as Rotation<EarthFixed>>::dcm(date);
        let back = <EarthFixed as Rotation<EarthInertial>>::dcm(date);
        let round_trip = fwd.mul_unchecked(back);
        assert!((round_trip.rot_mat - crate::math::Matrix3::identity()).norm() < 1e-10);
    }

    #[test]
    fn earth_fixed_dcm_is_orthonormal() {
        use hifitime::TimeUnits;
        let date = j2000() + 10.0.days();
        let dcm = <EarthInertial as Rotation<EarthFixed>>::dcm(date);
        assert!(dcm.is_valid(1e-9, 1e-9));
        let _ = Vector3::x();
    }
}
