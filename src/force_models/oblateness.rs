/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Non-spherical gravity via normalized associated Legendre functions
//! (Pines-free recursive formulation), ported from the source's
//! `OblatenessForce::assign_legendre`/`compute_force`: the sectorial and
//! tesseral recursion coefficients (`alpha`, `beta`, `gamma`, the
//! diagonal `Pbase`) are precomputed once at construction and the
//! Legendre array itself is rebuilt per call from the current
//! latitude, exactly mirroring the source's two-phase split.

use core::marker::PhantomData;
use std::io::Read;

use crate::elements::cartesian::Cartesian;
use crate::errors::{IoResult, MalformedRowSnafu, PhysicsResult, TruncatedFileSnafu};
use crate::frames::{FrameTag, Rotation};
use crate::math::units::{Acceleration, GravParam, Length};
use crate::math::vector::Vector;
use crate::math::Vector3;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

use super::ForceModel;

/// Spherical-harmonic coefficients and precomputed recursion factors
/// for a single body's gravity field, truncated at degree `n_max` and
/// order `m_max`. `Inertial`/`Fixed` pin which registered frame pair
/// this instance rotates the state through to evaluate the field in
/// the body-fixed frame it is defined in.
pub struct Oblateness<Inertial, Fixed> {
    n_max: usize,
    m_max: usize,
    c: Vec<Vec<f64>>,
    s: Vec<Vec<f64>>,
    alpha: Vec<Vec<f64>>,
    beta: Vec<Vec<f64>>,
    gamma: Vec<Vec<f64>>,
    p_base: Vec<Vec<f64>>,
    mu: GravParam,
    equatorial_radius: Length,
    _inertial: PhantomData<Inertial>,
    _fixed: PhantomData<Fixed>,
}

fn zeros(n_max: usize, m_max: usize) -> Vec<Vec<f64>> {
    vec![vec![0.0; m_max + 1]; n_max + 1]
}

impl<Inertial, Fixed> Oblateness<Inertial, Fixed>
where
    Inertial: FrameTag + Rotation<Fixed>,
    Fixed: FrameTag + Rotation<Inertial>,
{
    /// Builds a field truncated at `n_max`/`m_max`, reading normalized
    /// `n,m,Cnm,Snm` coefficient rows from `reader` (one row per
    /// degree/order pair, the same row shape the source's
    /// `ingest_legendre_coefficient_file` parses out of its comma-
    /// separated gravity-model text files).
    pub fn from_reader<R: Read>(
        n_max: usize,
        m_max: usize,
        mu: GravParam,
        equatorial_radius: Length,
        reader: R,
    ) -> IoResult<Self> {
        let mut c = zeros(n_max, m_max);
        let mut s = zeros(n_max, m_max);

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        let mut highest_n = 0usize;
        let mut highest_m = 0usize;
        for (line, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| {
                MalformedRowSnafu {
                    line,
                    reason: e.to_string(),
                }
                .build()
            })?;
            if record.len() < 4 {
                return MalformedRowSnafu {
                    line,
                    reason: format!("expected 4 columns (n, m, Cnm, Snm), got {}", record.len()),
                }
                .fail();
            }
            let parse = |idx: usize, what: &str| -> Result<f64, crate::errors::IoError> {
                record[idx].trim().parse::<f64>().map_err(|_| {
                    MalformedRowSnafu {
                        line,
                        reason: format!("column {idx} ({what}) is not a number"),
                    }
                    .build()
                })
            };
            let n = parse(0, "degree")? as usize;
            let m = parse(1, "order")? as usize;
            if n > n_max || m > m_max {
                continue;
            }
            c[n][m] = parse(2, "Cnm")?;
            s[n][m] = parse(3, "Snm")?;
            highest_n = highest_n.max(n);
            highest_m = highest_m.max(m);
        }
        if highest_n < n_max || highest_m < m_max {
            return TruncatedFileSnafu {
                n_max,
                m_max,
            }
            .fail();
        }

        let mut alpha = zeros(n_max, m_max);
        let mut beta = zeros(n_max, m_max);
        let mut gamma = zeros(n_max, m_max);
        let mut p_base = zeros(n_max, m_max);

        let sqrt_one_half = 0.5_f64.sqrt();
        for n in 0..=n_max {
            let nn = n as f64;
            for m in 0..=m_max {
                let mm = m as f64;
                if n == m {
                    if n != 0 {
                        let mut tau = 1.0;
                        let mut ii = 2 * n as isize - 1;
                        while ii > 0 {
                            tau *= ii as f64 / (ii as f64 + 1.0);
                            ii -= 2;
                        }
                        p_base[n][m] = (2.0 * (2.0 * nn + 1.0) * tau).sqrt();
                    }
                } else if n == m + 1 {
                    p_base[n][m] = (2.0 * mm + 3.0).sqrt();
                } else if n >= m + 2 {
                    alpha[n][m] =
                        ((2.0 * nn + 1.0) * (2.0 * nn - 1.0) / ((nn - mm) * (nn + mm))).sqrt();
                    beta[n][m] = ((2.0 * nn + 1.0) * (nn + mm - 1.0) * (nn - mm - 1.0)
                        / ((2.0 * nn - 3.0) * (nn - mm) * (nn + mm)))
                        .sqrt();
                }

                let mut g = ((nn - mm) * (nn + mm + 1.0)).sqrt();
                if m == 0 {
                    g *= sqrt_one_half;
                }
                gamma[n][m] = g;
            }
        }

        Ok(Self {
            n_max,
            m_max,
            c,
            s,
            alpha,
            beta,
            gamma,
            p_base,
            mu,
            equatorial_radius,
            _inertial: PhantomData,
            _fixed: PhantomData,
        })
    }

    /// Rebuilds the normalized associated Legendre array for the given
    /// geocentric latitude. `P[n][m+1]` is read by `acceleration_body_fixed`'s
    /// `dVdlat` sum, so the array is sized one order wider than `m_max`.
    fn assign_legendre(&self, latitude_rad: f64) -> Vec<Vec<f64>> {
        let cos_lat = latitude_rad.cos();
        let sin_lat = latitude_rad.sin();
        let mut p = vec![vec![0.0; self.m_max + 2]; self.n_max + 1];
        p[0][0] = 1.0;
        for n in 0..=self.n_max {
            let cos_lat_pow_n = cos_lat.powi(n as i32);
            for m in 0..=(self.m_max + 1).min(n + 1) {
                if n == m {
                    if n == 0 {
                        p[n][m] = 1.0;
                    } else {
                        p[n][m] = self.p_base[n][m] * cos_lat_pow_n;
                    }
                } else if n == m + 1 {
                    p[n][m] = self.p_base[n][m] * sin_lat * p[m][m];
                } else if n >= m + 2 {
                    p[n][m] = self.alpha[n][m] * sin_lat * p[n - 1][m] + self.beta[n][m] * p[n - 2][m];
                }
            }
        }
        p
    }

    /// The acceleration contribution in the body-fixed frame, ported
    /// verbatim from `OblatenessForce::compute_force`'s `dVdr`/`dVdlat`/
    /// `dVdlong` partial-derivative chain.
    fn acceleration_body_fixed(&self, position_fixed: Vector3) -> Vector3 {
        let x = position_fixed.x;
        let y = position_fixed.y;
        let z = position_fixed.z;
        let r = (x * x + y * y + z * z).sqrt();
        let one_over_r = 1.0 / r;

        let r_ecef = (x * x + y * y).sqrt();
        let longitude = y.atan2(x);
        let latitude = (z * one_over_r).asin();

        let cos_lat = latitude.cos();
        let sin_lat = latitude.sin();
        let tan_lat = sin_lat / cos_lat;

        let p = self.assign_legendre(latitude);

        let mut d_v_dr = 0.0;
        let mut d_v_dlat = 0.0;
        let mut d_v_dlong = 0.0;

        for n in 2..=self.n_max {
            let nn = n as f64;
            let mut d_v_dr_inner = 0.0;
            let mut d_v_dlat_inner = 0.0;
            let mut d_v_dlong_inner = 0.0;

            for m in 0..=n.min(self.m_max) {
                let mm = m as f64;
                let cos_long_m = (mm * longitude).cos();
                let sin_long_m = (mm * longitude).sin();
                let temp = self.c[n][m] * cos_long_m + self.s[n][m] * sin_long_m;

                d_v_dr_inner += temp * p[n][m];
                d_v_dlat_inner += temp * (self.gamma[n][m] * p[n][m + 1] - mm * tan_lat * p[n][m]);
                d_v_dlong_inner += mm * (self.s[n][m] * cos_long_m - self.c[n][m] * sin_long_m) * p[n][m];
            }

            let r_ratio = (self.equatorial_radius.value() * one_over_r).powi(n as i32);
            d_v_dr += r_ratio * (nn + 1.0) * d_v_dr_inner;
            d_v_dlat += r_ratio * d_v_dlat_inner;
            d_v_dlong += r_ratio * d_v_dlong_inner;
        }

        let mu_over_r = self.mu.value() * one_over_r;
        let d_v_dr = d_v_dr * (mu_over_r * one_over_r);
        let d_v_dlat = d_v_dlat * mu_over_r;
        let d_v_dlong = d_v_dlong * mu_over_r;

        let one_over_ecef_r = 1.0 / r_ecef;
        let z_over_r_sq = z / (r * r);

        let dr_dr_ecef = Vector3::new(x * one_over_r, y * one_over_r, z * one_over_r);
        let dlat_dr_ecef = Vector3::new(
            -one_over_ecef_r * x * z_over_r_sq,
            -one_over_ecef_r * y * z_over_r_sq,
            one_over_ecef_r * (1.0 - z * z_over_r_sq),
        );
        let dlong_dr_ecef = Vector3::new(-y / (r_ecef * r_ecef), x / (r_ecef * r_ecef), 0.0);

        Vector3::new(
            d_v_dr * dr_dr_ecef.x + d_v_dlat * dlat_dr_ecef.x + d_v_dlong * dlong_dr_ecef.x,
            d_v_dr * dr_dr_ecef.y + d_v_dlat * dlat_dr_ecef.y + d_v_dlong * dlong_dr_ecef.y,
            d_v_dr * dr_dr_ecef.z + d_v_dlat * dlat_dr_ecef.z,
        )
    }
}

impl<Inertial, Fixed, F> ForceModel<F> for Oblateness<Inertial, Fixed>
where
    F: FrameTag,
    Inertial: FrameTag + Rotation<Fixed> + Rotation<F>,
    Fixed: FrameTag + Rotation<Inertial>,
    F: Rotation<Inertial>,
{
    fn name(&self) -> &'static str {
        "oblateness"
    }

    fn acceleration(
        &self,
        epoch: Epoch,
        state: &Cartesian<F>,
        _vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<Vector<Acceleration, F>> {
        let position_inertial: Vector<crate::math::units::Length, Inertial> = state.radius.in_frame(epoch);
        let position_fixed: Vector<crate::math::units::Length, Fixed> = position_inertial.in_frame(epoch);
        let accel_fixed = self.acceleration_body_fixed(position_fixed.raw());
        let accel_fixed_vec: Vector<Acceleration, Fixed> = Vector::from_raw(accel_fixed);
        let accel_inertial: Vector<Acceleration, Inertial> = accel_fixed_vec.in_frame(epoch);
        Ok(accel_inertial.in_frame(epoch))
    }
}

#[cfg(test)]
mod oblateness_ut {
    use super::*;
    use crate::elements::State;
    use crate::frames::{EarthFixed, EarthInertial};
    use crate::math::units::{Mass, Velocity};

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

    fn j2_only_field() -> Oblateness<EarthInertial, EarthFixed> {
        let csv = "0,0,1.0,0.0\n1,0,0.0,0.0\n1,1,0.0,0.0\n2,0,-0.00108263,0.0\n2,1,0.0,0.0\n2,2,0.0,0.0\n";
        Oblateness::from_reader(
            2,
            2,
            GravParam::new(398_600.4418),
            Length::new(6378.137),
            csv.as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn j2_acceleration_is_finite_and_nonzero_off_equator() {
        let field = j2_only_field();
        let epoch = crate::time::Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let state = Cartesian::<EarthInertial>::new(
            Vector::new(Length::new(4000.0), Length::new(0.0), Length::new(5000.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(7.0), Velocity::new(1.0)),
            epoch,
            GravParam::new(398_600.4418),
        );
        let accel = field.acceleration(epoch, &state, &NoopVehicle).unwrap();
        assert!(accel.raw().norm().is_finite());
        assert!(accel.raw().norm() > 0.0);
    }

    #[test]
    fn truncated_file_is_rejected() {
        let csv = "0,0,1.0,0.0\n";
        let result = Oblateness::<EarthInertial, EarthFixed>::from_reader(
            2,
            2,
            GravParam::new(398_600.4418),
            Length::new(6378.137),
            csv.as_bytes(),
        );
        assert!(result.is_err());
    }
}
