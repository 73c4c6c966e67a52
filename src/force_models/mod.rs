/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Acceleration contributions an [`crate::eom::EquationsOfMotion`] sums
//! over at every derivative evaluation.
//!
//! Grounded on the `other_examples` `ForceModel`/`AccelModel` trait
//! pair: both return a plain acceleration vector given the current
//! osculating state, rather than saving any internal state of their
//! own, so a single `ForceModel` trait covers both shapes here.

pub mod drag;
pub mod oblateness;
pub mod srp;
pub mod third_body;
pub mod two_body;

pub use drag::AtmosphericDrag;
pub use oblateness::Oblateness;
pub use srp::SolarRadiationPressure;
pub use third_body::ThirdBody;
pub use two_body::TwoBody;

use crate::elements::cartesian::Cartesian;
use crate::errors::PhysicsResult;
use crate::frames::FrameTag;
use crate::math::units::Acceleration;
use crate::math::vector::Vector;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

/// A single acceleration contribution to a spacecraft's equations of
/// motion, expressed in frame `F`.
pub trait ForceModel<F: FrameTag> {
    fn name(&self) -> &'static str;

    /// The acceleration this model contributes at `epoch`, given the
    /// spacecraft's osculating Cartesian state and the vehicle it acts
    /// on (mass, areas, coefficients).
    fn acceleration(
        &self,
        epoch: Epoch,
        state: &Cartesian<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<Vector<Acceleration, F>>;
}
