/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! A root-findable condition the integrator can stop or log on.
//!
//! The source's `Event` is a type-erased wrapper whose `trigger_action`
//! defaults to a no-op for implementations that don't supply one. A
//! trait with a defaulted method captures the same "most events don't
//! need a post-trigger side effect" shape without the indirection.

use crate::elements::OrbitalElements;
use crate::frames::FrameTag;
use crate::math::units::Unitless;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

/// A condition tracked across an integration: the integrator samples
/// [`Self::measure_event`] at each accepted step and root-finds the
/// zero crossing, per [`crate::integrator::Integrator`].
pub trait Event<F: FrameTag> {
    fn name(&self) -> &str;

    /// A signed quantity whose zero crossing marks the event (e.g.
    /// altitude above a trigger radius, or an angle modulo a period).
    /// Must vary continuously with `time`/`state` for the integrator's
    /// root-find to converge.
    fn measure_event(&self, time: Epoch, state: &OrbitalElements<F>, vehicle: &dyn Vehicle<F>) -> Unitless;

    /// Whether the integrator should stop propagation the first time
    /// this event fires.
    fn is_terminal(&self) -> bool;

    /// Runs after the event fires, with mutable access to the vehicle
    /// (e.g. an impulsive maneuver or a mass-depletion update). The
    /// default is a no-op, matching events that only observe.
    fn trigger_action(&self, _vehicle: &mut dyn Vehicle<F>) {}
}

#[cfg(test)]
mod event_ut {
    use super::*;
    use crate::elements::{Cartesian, State};
    use crate::frames::EarthInertial;
    use crate::math::units::{GravParam, Length, Mass, Velocity};
    use crate::math::vector::Vector;

    struct StubVehicle(State<EarthInertial>, Mass);

    impl Vehicle<EarthInertial> for StubVehicle {
        fn state(&self) -> State<EarthInertial> {
            self.0
        }
        fn update_state(&mut self, state: State<EarthInertial>) {
            self.0 = state;
        }
        fn mass(&self) -> Mass {
            self.1
        }
    }

    struct AltitudeCrossing {
        trigger_radius: Length,
    }

    impl Event<EarthInertial> for AltitudeCrossing {
        fn name(&self) -> &str {
            "altitude-crossing"
        }

        fn measure_event(
            &self,
            _time: Epoch,
            state: &OrbitalElements<EarthInertial>,
            _vehicle: &dyn Vehicle<EarthInertial>,
        ) -> Unitless {
            let cart = state.to_cartesian().unwrap();
            Unitless::new(cart.rmag().value() - self.trigger_radius.value())
        }

        fn is_terminal(&self) -> bool {
            true
        }
    }

    fn sample_state() -> State<EarthInertial> {
        let epoch = Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let cart = Cartesian::new(
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.5), Velocity::new(0.0)),
            epoch,
            GravParam::new(398_600.4418),
        );
        State::new(OrbitalElements::Cartesian(cart))
    }

    #[test]
    fn altitude_event_measures_the_signed_distance_to_the_trigger_radius() {
        let event = AltitudeCrossing {
            trigger_radius: Length::new(6578.0),
        };
        let state = sample_state();
        let vehicle = StubVehicle(state, Mass::new(500.0));
        let value = event.measure_event(state.epoch, &state.elements, &vehicle);
        assert!((value.value() - (7000.0 - 6578.0)).abs() < 1e-9);
        assert!(event.is_terminal());
    }

    #[test]
    fn default_trigger_action_is_a_no_op() {
        struct Watcher;
        impl Event<EarthInertial> for Watcher {
            fn name(&self) -> &str {
                "watcher"
            }
            fn measure_event(
                &self,
                _time: Epoch,
                _state: &OrbitalElements<EarthInertial>,
                _vehicle: &dyn Vehicle<EarthInertial>,
            ) -> Unitless {
                Unitless::new(0.0)
            }
            fn is_terminal(&self) -> bool {
                false
            }
        }
        let event = Watcher;
        let mut vehicle = StubVehicle(sample_state(), Mass::new(500.0));
        event.trigger_action(&mut vehicle);
        assert_eq!(vehicle.mass().value(), 500.0);
    }
}
