/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Solar radiation pressure with a spherical-shadow umbra/penumbra test,
//! ported from the source's `EquationsOfMotion::find_accel_srp`. The
//! source precomputes a per-day Sun-relative-to-central-body ephemeris
//! table; here the same vector comes from
//! [`crate::bodies::CelestialBody::state_at`], since `central_body`'s
//! mean elements are already defined about its parent (the Sun, for
//! every planet in the built-in catalog).

use core::marker::PhantomData;

use crate::bodies::CelestialBody;
use crate::constants::{ASTRONOMICAL_UNIT_KM, SOLAR_PRESSURE_AT_1AU_N_M2};
use crate::elements::cartesian::Cartesian;
use crate::errors::PhysicsResult;
use crate::frames::{FrameTag, Rotation, Ssb};
use crate::math::units::{Acceleration, Length};
use crate::math::vector::Vector;
use crate::math::Vector3;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

use super::ForceModel;

/// Solar radius, km. The source's own comment shrugs at exactly why
/// this constant (not the mean photosphere radius) is used; kept as-is.
const SUN_RADIUS_KM: f64 = 696_000.0;

/// Solar radiation pressure, with an optional conical-shadow test
/// against a single occulting body (the one the spacecraft orbits).
/// `shadow_equatorial_radius` is `None` for bodies with no meaningful
/// shadow geometry (e.g. a heliocentric orbit about the Sun itself).
pub struct SolarRadiationPressure<F> {
    central_body: CelestialBody,
    shadow_equatorial_radius: Option<Length>,
    _frame: PhantomData<F>,
}

impl<F> SolarRadiationPressure<F> {
    pub fn new(central_body: CelestialBody, shadow_equatorial_radius: Option<Length>) -> Self {
        Self {
            central_body,
            shadow_equatorial_radius,
            _frame: PhantomData,
        }
    }

    /// The fraction of full sunlight reaching the spacecraft: 1.0 when
    /// lit, 0.5 in penumbra, 0.0 in umbra. `central_to_sun` and
    /// `spacecraft_position` are both raw vectors from the central
    /// body, in the same frame.
    fn sunlit_fraction(
        &self,
        central_to_sun: Vector3,
        spacecraft_position: Vector3,
        equatorial_radius_km: f64,
    ) -> f64 {
        let r_central_sun = central_to_sun.norm();
        let r_sc = spacecraft_position.norm();
        if r_central_sun <= f64::EPSILON || r_sc <= f64::EPSILON {
            return 1.0;
        }

        let cos_reference = (central_to_sun.dot(&spacecraft_position) / (r_central_sun * r_sc))
            .clamp(-1.0, 1.0);
        let reference_angle = cos_reference.acos();
        let reference_angle_1 = (equatorial_radius_km / r_sc).clamp(-1.0, 1.0).acos();
        let reference_angle_2 = (equatorial_radius_km / r_central_sun).clamp(-1.0, 1.0).acos();

        if reference_angle_1 + reference_angle_2 > reference_angle {
            // Line of sight to the Sun clears the occulting body: lit.
            return 1.0;
        }

        let x_u = equatorial_radius_km * r_central_sun / (SUN_RADIUS_KM - equatorial_radius_km);
        let r_p = -central_to_sun / r_central_sun * x_u;
        let r_ps = spacecraft_position - r_p;

        let norm_r_p = r_p.norm();
        let norm_r_ps = r_ps.norm();
        if norm_r_p <= f64::EPSILON || norm_r_ps <= f64::EPSILON {
            return 0.5;
        }

        let alpha_ps = ((-r_ps.dot(&r_p)) / (norm_r_p * norm_r_ps))
            .clamp(-1.0, 1.0)
            .asin()
            .abs();

        if alpha_ps < (equatorial_radius_km / x_u).clamp(-1.0, 1.0).asin() {
            0.0
        } else {
            0.5
        }
    }
}

impl<F> ForceModel<F> for SolarRadiationPressure<F>
where
    F: FrameTag,
    Ssb: Rotation<F>,
{
    fn name(&self) -> &'static str {
        "solar-radiation-pressure"
    }

    fn acceleration(
        &self,
        epoch: Epoch,
        state: &Cartesian<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<Vector<Acceleration, F>> {
        let sun_to_central = self.central_body.state_at(epoch).to_cartesian()?.radius;
        let central_to_sun: Vector<Length, F> = (-sun_to_central).in_frame(epoch);

        let spacecraft_to_sun = central_to_sun.raw() - state.radius.raw();
        let r_spacecraft_to_sun = spacecraft_to_sun.norm();
        if r_spacecraft_to_sun <= f64::EPSILON {
            return Ok(Vector::zero());
        }

        let pressure = SOLAR_PRESSURE_AT_1AU_N_M2
            * (ASTRONOMICAL_UNIT_KM / r_spacecraft_to_sun).powi(2);

        let sunlit_fraction = match self.shadow_equatorial_radius {
            Some(radius) => {
                self.sunlit_fraction(central_to_sun.raw(), state.radius.raw(), radius.value())
            }
            None => 1.0,
        };

        let area_sun = vehicle.solar_area().value();
        let reflectivity = vehicle.coefficient_of_reflectivity().value();
        let mass = vehicle.mass().value();
        let scale = -pressure * reflectivity * area_sun / mass / r_spacecraft_to_sun * sunlit_fraction;

        Ok(Vector::from_raw(spacecraft_to_sun * scale))
    }
}

#[cfg(test)]
mod srp_ut {
    use super::*;
    use crate::bodies;
    use crate::constants::celestial_objects;
    use crate::elements::State;
    use crate::frames::EarthInertial;
    use crate::math::units::{Area, GravParam, Mass, Unitless, Velocity};

    struct ReflectiveSat {
        mass: Mass,
        area: Area,
        reflectivity: Unitless,
    }

    impl Vehicle<EarthInertial> for ReflectiveSat {
        fn state(&self) -> State<EarthInertial> {
            unimplemented!()
        }
        fn update_state(&mut self, _state: State<EarthInertial>) {}
        fn mass(&self) -> Mass {
            self.mass
        }
        fn solar_area(&self) -> Area {
            self.area
        }
        fn coefficient_of_reflectivity(&self) -> Unitless {
            self.reflectivity
        }
    }

    fn model() -> SolarRadiationPressure<EarthInertial> {
        let earth = bodies::builtin(celestial_objects::EARTH).unwrap();
        SolarRadiationPressure::new(earth, Some(Length::new(6378.137)))
    }

    #[test]
    fn lit_spacecraft_is_pushed_away_from_the_sun() {
        let model = model();
        let epoch = Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let state = Cartesian::<EarthInertial>::new(
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.5), Velocity::new(0.0)),
            epoch,
            GravParam::new(398_600.4418),
        );
        let vehicle = ReflectiveSat {
            mass: Mass::new(500.0),
            area: Area::from_m2(10.0),
            reflectivity: Unitless::new(1.3),
        };
        let accel = model.acceleration(epoch, &state, &vehicle).unwrap();
        assert!(accel.raw().norm() > 0.0);
        assert!(accel.raw().norm().is_finite());
    }

    #[test]
    fn sunlit_fraction_is_full_when_body_does_not_occult() {
        let model = model();
        // Sun and spacecraft on the same side: no occultation possible.
        let fraction = model.sunlit_fraction(
            Vector3::new(1.496e8, 0.0, 0.0),
            Vector3::new(7000.0, 0.0, 0.0),
            6378.137,
        );
        assert_eq!(fraction, 1.0);
    }
}
