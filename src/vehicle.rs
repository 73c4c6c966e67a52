/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! A trajectory-carrying body a force model or event acts on.
//!
//! The source expresses this as a type-erased `Vehicle` wrapper around a
//! user-defined implementation, with a family of `HasGetRamArea`-style
//! concepts supplying a zero default for whichever of the optional
//! properties (ram/lift/solar area, drag/lift/reflectivity coefficients)
//! a particular vehicle doesn't define. A trait with default methods is
//! the direct idiomatic equivalent: implementors only override the
//! properties their force models actually need.

use crate::elements::State;
use crate::frames::FrameTag;
use crate::math::units::{Area, Mass, Unitless};

/// A vehicle whose state is expressed in frame `F`.
///
/// [`Self::state`], [`Self::update_state`], and [`Self::mass`] are the
/// only properties every vehicle must supply; the surface-area and
/// coefficient methods default to zero, matching the source's
/// `get_*_impl` fallbacks, and only need overriding by vehicles that a
/// drag, SRP, or lift force model is actually attached to.
pub trait Vehicle<F: FrameTag> {
    fn state(&self) -> State<F>;

    fn update_state(&mut self, state: State<F>);

    fn mass(&self) -> Mass;

    /// Cross-sectional area presented to the atmosphere along the
    /// velocity vector, used by [`crate::force_models::drag`].
    fn ram_area(&self) -> Area {
        Area::new(0.0)
    }

    /// Cross-sectional area contributing aerodynamic lift.
    fn lift_area(&self) -> Area {
        Area::new(0.0)
    }

    /// Area presented to incident solar radiation, used by
    /// [`crate::force_models::srp`].
    fn solar_area(&self) -> Area {
        Area::new(0.0)
    }

    fn coefficient_of_drag(&self) -> Unitless {
        Unitless::new(0.0)
    }

    fn coefficient_of_lift(&self) -> Unitless {
        Unitless::new(0.0)
    }

    fn coefficient_of_reflectivity(&self) -> Unitless {
        Unitless::new(0.0)
    }
}

#[cfg(test)]
mod vehicle_ut {
    use super::*;
    use crate::elements::{Cartesian, OrbitalElements};
    use crate::frames::EarthInertial;
    use crate::math::units::{Length, Velocity};
    use crate::math::vector::Vector;
    use hifitime::Epoch;

    struct Satellite {
        state: State<EarthInertial>,
        mass: Mass,
    }

    impl Vehicle<EarthInertial> for Satellite {
        fn state(&self) -> State<EarthInertial> {
            self.state
        }

        fn update_state(&mut self, state: State<EarthInertial>) {
            self.state = state;
        }

        fn mass(&self) -> Mass {
            self.mass
        }
    }

    fn sample_state() -> State<EarthInertial> {
        let epoch = Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let cart = Cartesian::new(
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.5), Velocity::new(0.0)),
            epoch,
            crate::math::units::GravParam::new(398_600.4418),
        );
        State::new(OrbitalElements::Cartesian(cart))
    }

    #[test]
    fn default_areas_and_coefficients_are_zero() {
        let sat = Satellite {
            state: sample_state(),
            mass: Mass::new(1200.0),
        };
        assert_eq!(sat.ram_area().value(), 0.0);
        assert_eq!(sat.lift_area().value(), 0.0);
        assert_eq!(sat.solar_area().value(), 0.0);
        assert_eq!(sat.coefficient_of_drag().value(), 0.0);
        assert_eq!(sat.coefficient_of_lift().value(), 0.0);
        assert_eq!(sat.coefficient_of_reflectivity().value(), 0.0);
    }

    #[test]
    fn overriding_ram_area_is_observed() {
        struct Cubesat(State<EarthInertial>);
        impl Vehicle<EarthInertial> for Cubesat {
            fn state(&self) -> State<EarthInertial> {
                self.0
            }
            fn update_state(&mut self, state: State<EarthInertial>) {
                self.0 = state;
            }
            fn mass(&self) -> Mass {
                Mass::new(4.0)
            }
            fn ram_area(&self) -> Area {
                Area::from_m2(0.03)
            }
        }
        let sat = Cubesat(sample_state());
        assert!(sat.ram_area().value() > 0.0);
        assert_eq!(sat.coefficient_of_drag().value(), 0.0);
    }

    #[test]
    fn update_state_replaces_the_stored_state() {
        let mut sat = Satellite {
            state: sample_state(),
            mass: Mass::new(1200.0),
        };
        let later = State::new(sat.state().elements);
        sat.update_state(later);
        assert_eq!(sat.mass().value(), 1200.0);
    }
}
