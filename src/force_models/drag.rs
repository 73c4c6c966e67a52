/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Atmospheric drag and lift, ported from the source's
//! `AtmosphericForce::compute_force`/`find_atmospheric_density`: only
//! the handful of bodies with a tabulated or modeled atmosphere are
//! covered — anything else has "no significant atmosphere" and this
//! force model simply isn't attached to its `EquationsOfMotion`.

use core::marker::PhantomData;

use crate::elements::cartesian::Cartesian;
use crate::errors::PhysicsResult;
use crate::frames::{ecef_to_geodetic, FrameTag, Rotation};
use crate::math::units::Acceleration;
use crate::math::vector::Vector;
use crate::math::Vector3;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

use super::ForceModel;

/// Which body's density model to evaluate. Each variant corresponds to
/// one `switch` arm of the source's `find_atmospheric_density`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Atmosphere {
    Venus,
    Earth,
    Mars,
    Titan,
}

/// Venus altitude (km, upper bound) -> density (kg/m^3).
const VENUS_TABLE: &[(f64, f64)] = &[
    (3.0, 5.53e1),
    (6.0, 4.75e1),
    (9.0, 4.02e1),
    (12.0, 3.44e1),
    (15.0, 2.91e1),
    (18.0, 2.46e1),
    (21.0, 2.06e1),
    (24.0, 1.70e1),
    (27.0, 1.405e1),
    (30.0, 1.115e1),
    (33.0, 9.0),
    (36.0, 7.15),
    (39.0, 5.15),
    (42.0, 4.34),
    (45.0, 3.30),
    (48.0, 2.39),
    (51.0, 1.88),
    (54.0, 1.38),
    (57.0, 9.6e-1),
    (60.0, 6.2e-1),
    (70.0, 1.2e-1),
    (80.0, 1.8e-2),
    (90.0, 2.3e-3),
    (100.0, 3.1e-4),
    (110.0, 4.4e-5),
    (120.0, 7.2e-6),
    (130.0, 1.4e-6),
    (140.0, 3.0e-7),
    (150.0, 8.0e-8),
    (160.0, 2.6e-8),
    (170.0, 9.5e-9),
    (180.0, 4.0e-9),
    (190.0, 1.9e-9),
    (200.0, 9.4e-10),
    (210.0, 4.9e-10),
    (220.0, 2.6e-10),
    (230.0, 1.4e-10),
    (240.0, 7.5e-11),
    (250.0, 5.5e-11),
    (260.0, 4.1e-11),
    (270.0, 2.2e-11),
    (280.0, 1.2e-11),
    (290.0, 6.5e-12),
    (300.0, 3.5e-12),
];

/// Mars altitude (km, upper bound) -> density (kg/m^3); only valid
/// below 80 km, where the polynomial extensions below take over.
const MARS_TABLE: &[(f64, f64)] = &[
    (2.0, 1.19e-1),
    (4.0, 1.10e-1),
    (6.0, 1.02e-1),
    (8.0, 9.39e-2),
    (10.0, 8.64e-2),
    (12.0, 7.93e-2),
    (14.0, 7.25e-2),
    (16.0, 6.61e-2),
    (18.0, 6.00e-2),
    (20.0, 5.43e-2),
    (22.0, 4.89e-2),
    (24.0, 3.91e-2),
    (26.0, 3.32e-2),
    (28.0, 2.82e-2),
    (30.0, 2.40e-2),
    (32.0, 2.04e-2),
    (34.0, 1.73e-2),
    (36.0, 1.47e-2),
    (38.0, 1.25e-2),
    (40.0, 1.06e-2),
    (45.0, 7.03e-3),
    (50.0, 4.67e-3),
    (55.0, 3.10e-3),
    (60.0, 2.06e-3),
    (65.0, 1.36e-3),
    (70.0, 9.11e-4),
    (75.0, 6.05e-4),
    (80.0, 4.02e-4),
];

/// Titan altitude (km, upper bound) -> density (g/cm^3).
const TITAN_TABLE: &[(f64, f64)] = &[
    (780.0, 1.00e-12),
    (790.0, 8.45e-12),
    (800.0, 7.16e-12),
    (810.0, 6.08e-12),
    (820.0, 5.17e-12),
    (830.0, 4.41e-12),
    (840.0, 3.77e-12),
    (850.0, 3.23e-12),
    (860.0, 2.78e-12),
    (870.0, 2.39e-12),
    (880.0, 2.06e-12),
    (890.0, 1.78e-12),
    (900.0, 1.54e-12),
    (910.0, 1.34e-12),
    (920.0, 1.16e-12),
    (930.0, 1.01e-12),
    (940.0, 8.80e-13),
    (950.0, 7.67e-13),
    (960.0, 6.69e-13),
    (970.0, 5.84e-13),
    (980.0, 5.10e-13),
    (990.0, 4.46e-13),
    (1000.0, 3.90e-13),
    (1010.0, 1.81e-13),
    (1020.0, 2.99e-13),
    (1030.0, 2.62e-13),
    (1040.0, 2.30e-13),
    (1050.0, 2.02e-13),
    (1060.0, 1.78e-13),
    (1070.0, 1.56e-13),
    (1080.0, 1.38e-13),
    (1090.0, 1.21e-13),
    (1100.0, 1.07e-13),
    (1110.0, 9.43e-14),
    (1120.0, 8.33e-14),
    (1130.0, 7.36e-14),
    (1140.0, 6.51e-14),
    (1150.0, 5.76e-14),
    (1160.0, 5.10e-14),
    (1170.0, 4.52e-14),
    (1180.0, 4.01e-14),
    (1190.0, 3.56e-14),
    (1200.0, 3.16e-14),
    (1210.0, 2.81e-14),
    (1220.0, 2.50e-14),
    (1230.0, 2.22e-14),
    (1240.0, 1.98e-14),
    (1250.0, 1.77e-14),
    (1260.0, 1.58e-14),
    (1270.0, 1.41e-14),
    (1280.0, 1.26e-14),
    (1290.0, 1.12e-14),
    (1300.0, 1.00e-14),
];

/// Earth altitude (km, upper bound) -> (reference altitude km, reference
/// density kg/m^3, scale height km), Vallado Table 7-4.
const EARTH_TABLE: &[(f64, f64, f64, f64)] = &[
    (25.0, 0.0, 1.225, 7.249),
    (30.0, 25.0, 3.899e-2, 6.349),
    (40.0, 30.0, 1.774e-2, 6.682),
    (50.0, 40.0, 3.972e-3, 7.554),
    (60.0, 50.0, 1.057e-3, 8.382),
    (70.0, 60.0, 3.206e-4, 7.714),
    (80.0, 70.0, 8.770e-5, 6.549),
    (90.0, 80.0, 1.905e-5, 5.799),
    (100.0, 90.0, 3.396e-6, 5.382),
    (110.0, 100.0, 5.297e-7, 5.877),
    (120.0, 110.0, 9.661e-8, 7.263),
    (130.0, 120.0, 2.438e-8, 9.473),
    (140.0, 130.0, 8.484e-9, 12.636),
    (150.0, 140.0, 3.845e-9, 16.149),
    (180.0, 150.0, 2.070e-9, 22.523),
    (200.0, 180.0, 5.464e-10, 29.740),
    (250.0, 200.0, 2.789e-10, 37.105),
    (300.0, 250.0, 7.248e-11, 45.546),
    (350.0, 300.0, 2.418e-11, 53.628),
    (400.0, 350.0, 9.158e-12, 53.298),
    (450.0, 400.0, 3.725e-12, 58.515),
    (500.0, 450.0, 1.585e-12, 60.828),
    (600.0, 500.0, 6.967e-13, 63.822),
    (700.0, 600.0, 1.454e-13, 71.835),
    (800.0, 700.0, 3.614e-14, 88.667),
    (900.0, 800.0, 1.170e-14, 124.64),
    (1000.0, 900.0, 5.245e-15, 181.05),
    (1100.0, 1000.0, 2.019e-15, 268.00),
];

/// Returns the value paired with the first table entry whose threshold
/// exceeds `altitude_km`, mirroring `std::map::upper_bound` on an
/// ascending-altitude keyed map; `None` once `altitude_km` runs past
/// the table's range.
fn upper_bound(table: &[(f64, f64)], altitude_km: f64) -> Option<f64> {
    table
        .iter()
        .find(|(threshold, _)| altitude_km < *threshold)
        .map(|&(_, value)| value)
}

fn earth_density_kg_km3(altitude_km: f64) -> f64 {
    let (ref_altitude, ref_density, scale_height) = EARTH_TABLE
        .iter()
        .find(|(threshold, ..)| altitude_km < *threshold)
        .map(|&(_, ra, rd, sh)| (ra, rd, sh))
        .unwrap_or((1100.0, 0.0, 1.0));
    ref_density * ((ref_altitude - altitude_km) / scale_height).exp() * 1.0e9
}

fn mars_density_kg_km3(altitude_km: f64) -> f64 {
    let density_kg_m3 = if altitude_km <= 80.0 {
        upper_bound(MARS_TABLE, altitude_km).unwrap_or(0.0)
    } else if altitude_km < 200.0 {
        (-2.553_14e-10 * altitude_km.powi(5) + 2.319_27e-7 * altitude_km.powi(4)
            - 8.332_06e-5 * altitude_km.powi(3)
            + 0.015_194_7 * altitude_km.powi(2)
            - 1.527_99 * altitude_km
            + 48.696_59)
            .exp()
    } else if altitude_km < 300.0 {
        (2.654_72e-11 * altitude_km.powi(5) - 2.455_58e-8 * altitude_km.powi(4)
            + 6.314_10e-6 * altitude_km.powi(3)
            + 4.733_59e-4 * altitude_km.powi(2)
            - 0.443_712 * altitude_km
            + 23.794_08)
            .exp()
    } else {
        0.0
    };
    density_kg_m3 * 1.0e9
}

impl Atmosphere {
    fn density_kg_km3(&self, altitude_km: f64) -> f64 {
        match self {
            Atmosphere::Venus => upper_bound(VENUS_TABLE, altitude_km).unwrap_or(0.0) * 1.0e9,
            Atmosphere::Earth => earth_density_kg_km3(altitude_km),
            Atmosphere::Mars => mars_density_kg_km3(altitude_km),
            Atmosphere::Titan => upper_bound(TITAN_TABLE, altitude_km).unwrap_or(0.0) * 1.0e12,
        }
    }
}

/// Drag and lift acceleration against a body's atmosphere, evaluated
/// in the body-fixed frame `Fixed` for altitude and relative velocity
/// and reported back in whatever frame the state was given in.
pub struct AtmosphericDrag<Fixed> {
    atmosphere: Atmosphere,
    equatorial_radius_km: f64,
    polar_radius_km: f64,
    rotation_rate_rad_s: f64,
    _fixed: PhantomData<Fixed>,
}

impl<Fixed> AtmosphericDrag<Fixed> {
    pub fn new(
        atmosphere: Atmosphere,
        equatorial_radius_km: f64,
        polar_radius_km: f64,
        rotation_rate_rad_s: f64,
    ) -> Self {
        Self {
            atmosphere,
            equatorial_radius_km,
            polar_radius_km,
            rotation_rate_rad_s,
            _fixed: PhantomData,
        }
    }
}

impl<Fixed, F> ForceModel<F> for AtmosphericDrag<Fixed>
where
    F: FrameTag + Rotation<Fixed>,
    Fixed: FrameTag,
{
    fn name(&self) -> &'static str {
        "atmospheric-drag"
    }

    fn acceleration(
        &self,
        epoch: Epoch,
        state: &Cartesian<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<Vector<Acceleration, F>> {
        let position_fixed: Vector<crate::math::units::Length, Fixed> = state.radius.in_frame(epoch);
        let geo = ecef_to_geodetic(
            position_fixed.raw(),
            self.equatorial_radius_km,
            self.polar_radius_km,
        );
        let density = self.atmosphere.density_kg_km3(geo.height_km);

        let r = state.radius.raw();
        let v = state.velocity.raw();
        let omega = self.rotation_rate_rad_s;
        let relative_velocity = Vector3::new(v.x - r.y * omega, v.y + r.x * omega, v.z);
        let relative_speed = relative_velocity.norm();

        let mass = vehicle.mass().value();
        let drag_magnitude = -0.5 * vehicle.coefficient_of_drag().value() * vehicle.ram_area().value()
            / mass
            * density
            * relative_speed;
        let accel_drag = relative_velocity * drag_magnitude;

        let rmag = state.rmag().value();
        let radial_velocity = r.dot(&v) / rmag;
        let lift_scale = 0.5 * vehicle.coefficient_of_lift().value() * vehicle.lift_area().value()
            / mass
            * density
            * radial_velocity
            * radial_velocity
            / rmag;
        let accel_lift = r * lift_scale;

        Ok(Vector::from_raw(accel_drag + accel_lift))
    }
}

#[cfg(test)]
mod drag_ut {
    use super::*;
    use crate::elements::State;
    use crate::frames::{EarthFixed, EarthInertial};
    use crate::math::units::{GravParam, Length, Mass, Unitless, Velocity};

    struct DraggySat {
        mass: Mass,
        cd: Unitless,
        ram_area: crate::math::units::Area,
    }

    impl Vehicle<EarthInertial> for DraggySat {
        fn state(&self) -> State<EarthInertial> {
            unimplemented!()
        }
        fn update_state(&mut self, _state: State<EarthInertial>) {}
        fn mass(&self) -> Mass {
            self.mass
        }
        fn coefficient_of_drag(&self) -> Unitless {
            self.cd
        }
        fn ram_area(&self) -> crate::math::units::Area {
            self.ram_area
        }
    }

    #[test]
    fn drag_opposes_relative_velocity_in_leo() {
        let model: AtmosphericDrag<EarthFixed> = AtmosphericDrag::new(
            Atmosphere::Earth,
            6378.137,
            6356.7523142,
            7.292_115_146_7e-5,
        );
        let epoch = crate::time::Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let state = Cartesian::<EarthInertial>::new(
            Vector::new(Length::new(6578.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.8), Velocity::new(0.0)),
            epoch,
            GravParam::new(398_600.4418),
        );
        let vehicle = DraggySat {
            mass: Mass::new(500.0),
            cd: Unitless::new(2.2),
            ram_area: crate::math::units::Area::from_m2(4.0),
        };
        let accel = model.acceleration(epoch, &state, &vehicle).unwrap();
        assert!(accel.y().value() < 0.0);
        assert!(accel.raw().norm().is_finite());
    }

    #[test]
    fn mars_density_is_zero_past_300km() {
        assert_eq!(mars_density_kg_km3(301.0), 0.0);
        assert!(mars_density_kg_km3(10.0) > 0.0);
    }

    #[test]
    fn venus_density_falls_off_with_altitude() {
        let low = Atmosphere::Venus.density_kg_km3(5.0);
        let high = Atmosphere::Venus.density_kg_km3(290.0);
        assert!(low > high);
        assert!(high > 0.0);
    }
}
