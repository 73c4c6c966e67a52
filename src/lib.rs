#![doc = include_str!("../README.md")]
/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

extern crate const_format;
extern crate hifitime;
extern crate log;

pub mod access;
pub mod bodies;
pub mod constants;
pub mod elements;
pub mod eom;
pub mod errors;
pub mod event;
pub mod force_models;
pub mod frames;
pub mod integrator;
pub mod math;
pub mod vehicle;

/// Re-export of hifitime plus the `JulianDate`/`Duration` aliases used
/// throughout this crate.
pub mod time {
    pub use core::str::FromStr;
    pub use hifitime::*;

    /// A quantity point in time. Arithmetic with a [`Duration`] yields
    /// another `JulianDate`; subtracting two `JulianDate`s yields a
    /// [`Duration`].
    pub type JulianDate = Epoch;
}

pub mod prelude {
    pub use crate::access::{FieldOfView, RiseSetInterval};
    pub use crate::bodies::{AstrodynamicsSystem, CelestialBody};
    pub use crate::elements::{
        Cartesian, Equinoctial, Keplerian, OrbitalElementPartials, OrbitalElements, State,
        StateHistory,
    };
    pub use crate::eom::EquationsOfMotion;
    pub use crate::errors::{IoError, MathError, PhysicsError};
    pub use crate::event::Event;
    pub use crate::force_models::ForceModel;
    pub use crate::frames::*;
    pub use crate::integrator::{Integrator, StepMethod};
    pub use crate::math::units::*;
    pub use crate::math::vector::Vector;
    pub use crate::time::*;
    pub use crate::vehicle::Vehicle;
}

/// Identifies a celestial body the way NAIF IDs do in the source corpus
/// this crate is descended from: a small stable integer, used as a
/// `HashMap`/array key and in frame-tag bookkeeping.
pub(crate) type NaifId = i32;
