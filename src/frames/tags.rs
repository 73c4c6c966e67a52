/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Zero-sized frame tags. Each tag is a distinct type, so
//! [`crate::math::vector::Vector`] and
//! [`crate::math::rotation::dcm::DirectionCosineMatrix`] instantiated over
//! two different tags are two different, non-interchangeable Rust types:
//! passing one where the other is expected is a compile error, not a
//! runtime frame-mismatch check.

use super::FrameTag;

/// Solar-system-barycenter inertial frame (ICRF axes, SSB origin). The
/// root of the frame graph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ssb;

impl FrameTag for Ssb {
    const NAME: &'static str = "Solar System Barycenter Inertial";
}

/// Equator-of-date variant of Earth's inertial frame. Kept distinct from
/// [`EarthInertial`] per the minimum frame set, but this crate carries no
/// precession/nutation model, so the rotation between the two is the
/// identity until one is added.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EarthMeanEquatorInertial;

impl FrameTag for EarthMeanEquatorInertial {
    const NAME: &'static str = "Earth Mean Equator Inertial";
}

/// Vehicle-relative radial/in-track/cross-track frame. Its orientation
/// depends on a runtime state vector rather than only on date, so it is
/// deliberately excluded from the static [`super::Rotation`] registry;
/// see [`crate::elements::cartesian::Cartesian::ric_dcm`] for the
/// runtime-computed rotation into this frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ric;

impl FrameTag for Ric {
    const NAME: &'static str = "Radial-In-track-Cross-track";
}

macro_rules! body_frame_pair {
    ($inertial:ident, $fixed:ident, $name:literal) => {
        #[doc = concat!($name, "-centered inertial frame (ICRF-aligned).")]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        pub struct $inertial;

        impl FrameTag for $inertial {
            const NAME: &'static str = concat!($name, " Inertial");
        }

        #[doc = concat!($name, "-centered, ", $name, "-fixed (rotating) frame.")]
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        pub struct $fixed;

        impl FrameTag for $fixed {
            const NAME: &'static str = concat!($name, " Fixed");
        }
    };
}

body_frame_pair!(SunInertial, SunFixed, "Sun");
body_frame_pair!(EarthInertial, EarthFixed, "Earth");
body_frame_pair!(MoonInertial, MoonFixed, "Moon");
body_frame_pair!(VenusInertial, VenusFixed, "Venus");
body_frame_pair!(MarsInertial, MarsFixed, "Mars");
body_frame_pair!(JupiterInertial, JupiterFixed, "Jupiter");
body_frame_pair!(SaturnInertial, SaturnFixed, "Saturn");
body_frame_pair!(UranusInertial, UranusFixed, "Uranus");
body_frame_pair!(NeptuneInertial, NeptuneFixed, "Neptune");
