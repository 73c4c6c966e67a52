/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Adaptive Runge-Kutta propagation.
//!
//! Ported from the source's `Integrator`: a fixed tolerance-controlled
//! step loop over an embedded Runge-Kutta pair (see [`tableau`]), with an
//! optional fixed-step mode, a set of root-findable [`crate::event::Event`]s
//! that can end the propagation early, and a proportional-integral (PI)
//! step-size controller that shrinks or grows the next step from the
//! current and previous local-error estimates.

pub mod tableau;

pub use tableau::StepMethod;

use hifitime::{Duration, Epoch, TimeUnits};
use snafu::ensure;

use crate::elements::{OrbitalElementPartials, State, StateHistory};
use crate::eom::EquationsOfMotion;
use crate::errors::{NonFiniteValueSnafu, PhysicsError, PhysicsResult};
use crate::event::Event;
use crate::frames::FrameTag;
use crate::vehicle::Vehicle;

/// Configuration and tolerances for an adaptive (or fixed-step)
/// propagation. Holds no state of its own between calls to
/// [`Self::propagate`]; every propagation starts fresh from the vehicle's
/// current state.
#[derive(Clone, Debug)]
pub struct Integrator {
    step_method: StepMethod,
    abs_tol: f64,
    rel_tol: f64,
    max_iter: u64,
    max_variable_step_iter: u64,
    initial_timestep_s: f64,
    fixed_timestep_s: f64,
    use_fixed_step: bool,
}

impl Default for Integrator {
    fn default() -> Self {
        Self {
            step_method: StepMethod::default(),
            abs_tol: 1e-13,
            rel_tol: 1e-13,
            max_iter: 100_000_000,
            max_variable_step_iter: 1_000,
            initial_timestep_s: 300.0,
            fixed_timestep_s: 1.0,
            use_fixed_step: false,
        }
    }
}

/// Step-size controller gains, matching the source's named constants.
const EPSILON: f64 = 0.8;
const MIN_ERROR_TO_CATCH: f64 = 2.0e-4;
const MIN_ERROR_STEP_FACTOR: f64 = 5.0;
const MIN_REL_STEP_SIZE: f64 = 0.2;

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_step_method(mut self, step_method: StepMethod) -> Self {
        self.step_method = step_method;
        self
    }

    pub fn set_abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    pub fn set_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    pub fn set_max_iter(mut self, max_iter: u64) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn set_initial_timestep(mut self, initial_timestep_s: f64) -> Self {
        self.initial_timestep_s = initial_timestep_s;
        self
    }

    /// Switches between adaptive and fixed-step propagation. With fixed
    /// stepping enabled, [`Self::propagate`] advances by
    /// [`Self::set_timestep`]'s value every iteration and never consults
    /// [`Self::check_error`].
    pub fn switch_fixed_timestep(mut self, use_fixed_step: bool) -> Self {
        self.use_fixed_step = use_fixed_step;
        self
    }

    /// Sets the fixed-step size. The source's own setter for this had a
    /// bug — `fixedTimeStep = fixedTimeStep` assigns the parameter to
    /// itself and never touches `this->_fixedTimeStep`, so fixed-step
    /// mode silently kept using whatever default it started with. Fixed
    /// here to actually store the value.
    pub fn set_timestep(mut self, fixed_timestep_s: f64) -> Self {
        self.fixed_timestep_s = fixed_timestep_s;
        self
    }

    /// Advances `vehicle`'s state by `duration` under `eom`, stopping
    /// early if a terminal event in `events` fires. Returns the full
    /// trajectory, one entry per accepted step (including the initial
    /// and final states).
    pub fn propagate<F: FrameTag>(
        &self,
        eom: &EquationsOfMotion<F>,
        vehicle: &mut dyn Vehicle<F>,
        duration: Duration,
        events: &[Box<dyn Event<F>>],
    ) -> PhysicsResult<StateHistory<F>> {
        let tableau = self.step_method.tableau();
        let start_epoch = vehicle.state().epoch;
        let end_epoch = start_epoch + duration;
        let sign = if duration.to_seconds() < 0.0 { -1.0 } else { 1.0 };

        let mut history = StateHistory::new();
        history.push(vehicle.state());

        let mut time = start_epoch;
        let mut time_step = sign * self.initial_timestep_s.abs();
        let mut previous_max_error: Option<f64> = None;
        let mut previous_time_step: Option<f64> = None;
        let mut iter = 0u64;
        let mut previous_event_values: Vec<f64> = events
            .iter()
            .map(|event| event.measure_event(time, &vehicle.state().elements, vehicle).value())
            .collect();

        while (end_epoch - time).to_seconds() * sign > 0.0 {
            if iter >= self.max_iter {
                log::warn!("propagation stopped: exceeded the configured maximum iteration count");
                return Ok(history);
            }
            iter += 1;

            let remaining = (end_epoch - time).to_seconds();
            if remaining.abs() < time_step.abs() {
                time_step = remaining;
            }

            let state = State::new(vehicle.state().elements);

            if self.use_fixed_step {
                let step = sign * self.fixed_timestep_s.abs();
                let step = if remaining.abs() < step.abs() { remaining } else { step };
                match self.try_step(eom, &tableau, time, &state, vehicle, step) {
                    Ok((new_elements, _)) => {
                        time = time + step.seconds();
                        vehicle.update_state(State::new(new_elements));
                    }
                    Err(PhysicsError::Crash { body, reason }) => {
                        log::warn!("propagation stopped: crashed into {body} ({reason})");
                        return Ok(history);
                    }
                    Err(other) => return Err(other),
                }
            } else {
                let mut accepted = false;
                let mut inner_iter = 0u64;
                while !accepted {
                    if inner_iter >= self.max_variable_step_iter {
                        log::warn!("propagation stopped: step size failed to converge within the configured retry budget");
                        return Ok(history);
                    }
                    inner_iter += 1;

                    let (new_elements, max_error) =
                        match self.try_step(eom, &tableau, time, &state, vehicle, time_step) {
                            Ok(stepped) => stepped,
                            Err(PhysicsError::Crash { body, reason }) => {
                                log::warn!("propagation stopped: crashed into {body} ({reason})");
                                return Ok(history);
                            }
                            Err(other) => return Err(other),
                        };

                    let (accept, next_step) =
                        self.check_error(max_error, time_step, previous_max_error, previous_time_step);

                    if accept {
                        let next_time = time + time_step.seconds();
                        if next_time == time {
                            log::warn!("propagation stopped: time step underflowed to zero at the current epoch");
                            return Ok(history);
                        }
                        time = next_time;
                        vehicle.update_state(State::new(new_elements));
                        previous_max_error = Some(max_error);
                        previous_time_step = Some(time_step);
                        time_step = next_step;
                        accepted = true;
                    } else {
                        time_step = next_step;
                    }
                }
            }

            history.push(vehicle.state());

            for (i, event) in events.iter().enumerate() {
                let value = event.measure_event(time, &vehicle.state().elements, vehicle).value();
                let crossed_zero = previous_event_values[i] * value <= 0.0 && previous_event_values[i] != value;
                previous_event_values[i] = value;
                if crossed_zero && event.is_terminal() {
                    event.trigger_action(vehicle);
                    return Ok(history);
                }
            }
        }

        Ok(history)
    }

    /// Runs every stage of `tableau` once, returning the propagated
    /// element set and the scaled maximum error between the tableau's
    /// two embedded orders. Mirrors the source's `try_step`: stage `i`'s
    /// derivative is evaluated at `time + c[i]*dt` against the state
    /// accumulated from every earlier stage's `a[i][j]` weight.
    fn try_step<F: FrameTag>(
        &self,
        eom: &EquationsOfMotion<F>,
        tableau: &tableau::Tableau,
        time: Epoch,
        state: &State<F>,
        vehicle: &dyn Vehicle<F>,
        time_step: f64,
    ) -> PhysicsResult<([f64; 6], f64)> {
        let y0 = state.elements.to_vector();
        let mut k: Vec<[f64; 6]> = Vec::with_capacity(tableau.stages);

        for i in 0..tableau.stages {
            let mut stage_vec = y0;
            for (j, row) in tableau.a[i].iter().enumerate() {
                for slot in 0..6 {
                    stage_vec[slot] += row * k[j][slot];
                }
            }
            let stage_time = time + (tableau.c[i] * time_step).seconds();
            let stage_elements = state.elements.from_vector(stage_time, stage_vec);
            let stage_state = State::new(stage_elements);
            let partials: OrbitalElementPartials<F> = eom.derivative(stage_time, &stage_state, vehicle)?;
            let mut rate = partials.to_vector();
            for value in rate.iter_mut() {
                *value *= time_step;
            }
            k.push(rate);
        }

        let mut y_new = y0;
        let mut y_hat = y0;
        for i in 0..tableau.stages {
            for slot in 0..6 {
                y_new[slot] += tableau.b[i] * k[i][slot];
                y_hat[slot] += tableau.bhat[i] * k[i][slot];
            }
        }

        for value in y_new.iter().chain(y_hat.iter()) {
            ensure!(
                value.is_finite(),
                NonFiniteValueSnafu {
                    action: "integrating a Runge-Kutta step"
                }
            );
        }

        let mut max_error = 0.0_f64;
        for slot in 0..6 {
            let scale = self.abs_tol + self.rel_tol * y_new[slot].abs();
            let err = (y_new[slot] - y_hat[slot]).abs() / scale.max(f64::EPSILON);
            max_error = max_error.max(err);
        }

        Ok((y_new, max_error))
    }

    /// The PI step-size controller: accepts the step (and proposes a new
    /// size for the next one) unless `max_error` exceeds [`EPSILON`].
    /// The growth law blends the current and previous error estimates
    /// (`previous_max_error`/`previous_time_step`) once a prior step is
    /// available; the very first step in a propagation instead grows or
    /// shrinks purely off the current error.
    fn check_error(
        &self,
        max_error: f64,
        time_step: f64,
        previous_max_error: Option<f64>,
        previous_time_step: Option<f64>,
    ) -> (bool, f64) {
        if max_error <= EPSILON {
            let next_step = match (previous_max_error, previous_time_step) {
                (Some(prev_error), Some(prev_step)) if prev_error > 0.0 => {
                    time_step
                        * (time_step / prev_step).abs()
                        * (EPSILON / max_error.max(f64::EPSILON)).powf(2.0 / 25.0)
                        * (max_error.max(f64::EPSILON) / prev_error.max(f64::EPSILON)).powf(3.0 / 50.0)
                }
                _ if max_error < MIN_ERROR_TO_CATCH => time_step * MIN_ERROR_STEP_FACTOR,
                _ => time_step * (EPSILON / max_error.max(f64::EPSILON)).powf(1.0 / 5.0),
            };
            (true, next_step)
        } else {
            let next_step = time_step * (EPSILON / max_error).powf(1.0 / 5.0).max(MIN_REL_STEP_SIZE);
            (false, next_step)
        }
    }
}

#[cfg(test)]
mod integrator_ut {
    use super::*;
    use crate::elements::{Cartesian, OrbitalElements};
    use crate::force_models::TwoBody;
    use crate::frames::EarthInertial;
    use crate::math::units::{GravParam, Length, Mass, Velocity};
    use crate::math::vector::Vector;

    struct Satellite(State<EarthInertial>);

    impl Vehicle<EarthInertial> for Satellite {
        fn state(&self) -> State<EarthInertial> {
            self.0
        }
        fn update_state(&mut self, state: State<EarthInertial>) {
            self.0 = state;
        }
        fn mass(&self) -> Mass {
            Mass::new(1200.0)
        }
    }

    fn leo_state() -> State<EarthInertial> {
        let mu = GravParam::new(398_600.4418);
        let cart = Cartesian::new(
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.546), Velocity::new(0.0)),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            mu,
        );
        State::new(OrbitalElements::Cartesian(cart))
    }

    #[test]
    fn two_body_propagation_conserves_orbital_radius_shape() {
        let eom: EquationsOfMotion<EarthInertial> =
            EquationsOfMotion::new(vec![Box::new(TwoBody::new(GravParam::new(398_600.4418)))]);
        let mut vehicle = Satellite(leo_state());
        let integrator = Integrator::new();
        let history = integrator
            .propagate(&eom, &mut vehicle, 600.0.seconds(), &[])
            .unwrap();

        assert!(history.len() >= 2);
        let first = history.first().unwrap().elements.to_cartesian().unwrap();
        let last = history.last().unwrap().elements.to_cartesian().unwrap();
        let rel_diff = (last.rmag().value() - first.rmag().value()).abs() / first.rmag().value();
        assert!(rel_diff < 1e-3, "radius drifted by {rel_diff}");
    }

    #[test]
    fn fixed_step_propagation_reaches_the_requested_duration() {
        let eom: EquationsOfMotion<EarthInertial> = EquationsOfMotion::new(Vec::new());
        let mut vehicle = Satellite(leo_state());
        let integrator = Integrator::new().switch_fixed_timestep(true).set_timestep(30.0);
        let history = integrator
            .propagate(&eom, &mut vehicle, 120.0.seconds(), &[])
            .unwrap();
        let elapsed = (history.last().unwrap().epoch - history.first().unwrap().epoch).to_seconds();
        assert!((elapsed - 120.0).abs() < 1e-6);
    }

    #[test]
    fn set_timestep_actually_changes_the_fixed_step() {
        let integrator = Integrator::new().set_timestep(42.0);
        assert_eq!(integrator.fixed_timestep_s, 42.0);
    }

    struct CrossesAltitude {
        trigger_radius: crate::math::units::Length,
    }

    impl Event<EarthInertial> for CrossesAltitude {
        fn name(&self) -> &str {
            "altitude-crossing"
        }
        fn measure_event(
            &self,
            _time: Epoch,
            state: &OrbitalElements<EarthInertial>,
            _vehicle: &dyn Vehicle<EarthInertial>,
        ) -> crate::math::units::Unitless {
            let cart = state.to_cartesian().unwrap();
            crate::math::units::Unitless::new(cart.rmag().value() - self.trigger_radius.value())
        }
        fn is_terminal(&self) -> bool {
            true
        }
    }

    #[test]
    fn terminal_event_stops_propagation_before_the_full_duration() {
        let eom: EquationsOfMotion<EarthInertial> =
            EquationsOfMotion::new(vec![Box::new(TwoBody::new(GravParam::new(398_600.4418)))]);
        // Slower-than-circular tangential speed at 7000 km puts the
        // vehicle at apoapsis; it falls toward a lower periapsis and
        // crosses 6900 km well before completing a full orbit.
        let mu = GravParam::new(398_600.4418);
        let cart = Cartesian::new(
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.0), Velocity::new(0.0)),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            mu,
        );
        let mut vehicle = Satellite(State::new(OrbitalElements::Cartesian(cart)));
        let integrator = Integrator::new().switch_fixed_timestep(true).set_timestep(10.0);
        let event: Box<dyn Event<EarthInertial>> = Box::new(CrossesAltitude {
            trigger_radius: Length::new(6900.0),
        });
        let history = integrator
            .propagate(&eom, &mut vehicle, 6000.0.seconds(), std::slice::from_ref(&event))
            .unwrap();
        let elapsed = (history.last().unwrap().epoch - history.first().unwrap().epoch).to_seconds();
        assert!(elapsed < 6000.0, "expected the event to cut the propagation short, elapsed={elapsed}");
    }
}
