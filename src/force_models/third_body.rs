/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Third-body gravitational perturbation, ported from the
//! `other_examples` `PointMasses::eom`: the acceleration on the
//! spacecraft from a perturbing body, minus that same body's pull on
//! the central body (the direct and indirect terms), so that only the
//! *differential* gravity shows up in the central body's own rotating
//! or inertial frame.

use crate::bodies::CelestialBody;
use crate::elements::cartesian::Cartesian;
use crate::errors::PhysicsResult;
use crate::frames::{FrameTag, Rotation, Ssb};
use crate::math::units::Acceleration;
use crate::math::vector::Vector;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

use super::ForceModel;

/// One perturbing body's contribution to the equations of motion of a
/// spacecraft orbiting a different central body. `body.parent` must be
/// the same body the spacecraft's `Cartesian<F>` state is centered on
/// (e.g. the Moon perturbing an Earth-centered orbit), since
/// [`CelestialBody::state_at`] returns a body's position about its own
/// parent.
pub struct ThirdBody {
    body: CelestialBody,
}

impl ThirdBody {
    pub fn new(body: CelestialBody) -> Self {
        Self { body }
    }
}

impl<F> ForceModel<F> for ThirdBody
where
    F: FrameTag,
    Ssb: Rotation<F>,
{
    fn name(&self) -> &'static str {
        "third-body"
    }

    fn acceleration(
        &self,
        epoch: Epoch,
        state: &Cartesian<F>,
        _vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<Vector<Acceleration, F>> {
        let central_to_third = self.body.state_at(epoch).to_cartesian()?.radius;
        let central_to_third: Vector<crate::math::units::Length, F> = central_to_third.in_frame(epoch);
        let r_ij = central_to_third.raw();
        let r_ij3 = r_ij.norm().powi(3);

        let r_j = r_ij - state.radius.raw(); // spacecraft as seen from the third body
        let r_j3 = r_j.norm().powi(3);

        let mu = self.body.mu.value();
        let accel = -mu * (r_j / r_j3 + r_ij / r_ij3);
        Ok(Vector::from_raw(accel))
    }
}

#[cfg(test)]
mod third_body_ut {
    use super::*;
    use crate::bodies;
    use crate::constants::celestial_objects;
    use crate::elements::State;
    use crate::frames::EarthInertial;
    use crate::math::units::{GravParam, Length, Mass, Velocity};

    struct NoopVehicle;
    impl Vehicle<EarthInertial> for NoopVehicle {
        fn state(&self) -> State<EarthInertial> {
            unimplemented!()
        }
        fn update_state(&mut self, _state: State<EarthInertial>) {}
        fn mass(&self) -> Mass {
            Mass::new(1.0)
        }
    }

    #[test]
    fn lunar_perturbation_on_a_geo_satellite_is_finite_and_small() {
        let moon = bodies::builtin(celestial_objects::MOON).unwrap();
        let model = ThirdBody::new(moon);
        let epoch = Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let state = Cartesian::<EarthInertial>::new(
            Vector::new(Length::new(42_164.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(3.075), Velocity::new(0.0)),
            epoch,
            GravParam::new(398_600.4418),
        );
        let accel = model.acceleration(epoch, &state, &NoopVehicle).unwrap();
        let magnitude = accel.raw().norm();
        assert!(magnitude.is_finite());
        // Lunar perturbation at GEO altitude is on the order of 1e-6 km/s^2.
        assert!(magnitude > 0.0 && magnitude < 1.0e-4);
    }
}
