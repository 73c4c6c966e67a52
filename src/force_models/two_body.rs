/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Newtonian point-mass gravity of the central body: `-mu/r^3 * r`.
//! Every propagation carries exactly one of these; every other force
//! model is a perturbation relative to it.

use crate::elements::cartesian::Cartesian;
use crate::errors::PhysicsResult;
use crate::frames::FrameTag;
use crate::math::units::{Acceleration, GravParam};
use crate::math::vector::Vector;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

use super::ForceModel;

#[derive(Copy, Clone, Debug)]
pub struct TwoBody {
    pub mu: GravParam,
}

impl TwoBody {
    pub fn new(mu: GravParam) -> Self {
        Self { mu }
    }
}

impl<F: FrameTag> ForceModel<F> for TwoBody {
    fn name(&self) -> &'static str {
        "two-body"
    }

    fn acceleration(
        &self,
        _epoch: Epoch,
        state: &Cartesian<F>,
        _vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<Vector<Acceleration, F>> {
        let r = state.rmag().value();
        let scale = -self.mu.value() / r.powi(3);
        Ok(Vector::from_raw(state.radius.raw() * scale))
    }
}

#[cfg(test)]
mod two_body_ut {
    use super::*;
    use crate::elements::State;
    use crate::frames::EarthInertial;
    use crate::math::units::{Length, Mass, Velocity};
    use approx::assert_relative_eq;

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
    fn acceleration_points_toward_the_central_body() {
        let mu = GravParam::new(398_600.4418);
        let model = TwoBody::new(mu);
        let epoch = crate::time::Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let state = Cartesian::<EarthInertial>::new(
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.5), Velocity::new(0.0)),
            epoch,
            mu,
        );
        let accel = model.acceleration(epoch, &state, &NoopVehicle).unwrap();
        assert!(accel.x().value() < 0.0);
        assert_relative_eq!(accel.y().value(), 0.0, epsilon = 1e-12);
        let expected = mu.value() / 7000.0f64.powi(2);
        assert_relative_eq!(accel.x().value().abs(), expected, epsilon = 1e-9);
    }
}
