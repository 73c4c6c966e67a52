/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Turns an orbital state plus a set of attached force models into its
//! time derivative, in whatever element-set representation the state
//! itself uses. A Cowell-style Cartesian state differentiates into a
//! velocity/acceleration pair; a Keplerian or equinoctial state instead
//! differentiates through Gauss's variation-of-parameters equations,
//! projecting the summed perturbing acceleration onto the radial/
//! normal/tangential basis of the instantaneous orbit. Ported from the
//! source's `EquationsOfMotion::evaluate_state_derivative` dispatch
//! (`evaluate_cowells_method`, `evaluate_coes_vop`, and the equinoctial
//! analogue built by chain-ruling the same COE rates).

use snafu::ensure;

use crate::constants::SINGULARITY_TOLERANCE;
use crate::elements::cartesian::Cartesian;
use crate::elements::keplerian::Keplerian;
use crate::elements::equinoctial::Equinoctial;
use crate::elements::{OrbitalElementPartials, OrbitalElements, State};
use crate::errors::{CrashSnafu, PhysicsResult};
use crate::force_models::{ForceModel, TwoBody};
use crate::frames::FrameTag;
use crate::math::units::{Angle, Length, Unitless};
use crate::math::Vector3;
use crate::time::Epoch;
use crate::vehicle::Vehicle;

/// Raw (unitless) Gauss variation-of-parameters rates for the classical
/// element set, before they're wrapped into the dimensioned
/// [`OrbitalElementPartials::Keplerian`] variant. Kept as a private
/// tuple-returning helper so the equinoctial derivative can chain-rule
/// through the same computation without re-deriving it.
struct KeplerianRates {
    h_dot: f64,
    ecc_dot: f64,
    inc_dot: f64,
    raan_dot: f64,
    aop_dot: f64,
    ta_dot: f64,
}

/// Optionally bounds how close to the central body a propagated state
/// may get before [`EquationsOfMotion::derivative`] refuses to continue.
/// `None` disables the check (e.g. for a heliocentric cruise with no
/// meaningful "surface").
#[derive(Copy, Clone, Debug, Default)]
pub struct CrashRadius(Option<Length>);

impl CrashRadius {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn at(radius: Length) -> Self {
        Self(Some(radius))
    }
}

/// Sums every attached [`ForceModel`] into a single state derivative.
/// Exactly one instance is built per propagation; the central body's
/// own two-body attraction is always included and need not be passed
/// in as a separate force model.
pub struct EquationsOfMotion<F: FrameTag> {
    force_models: Vec<Box<dyn ForceModel<F>>>,
    crash_radius: CrashRadius,
}

impl<F: FrameTag> EquationsOfMotion<F> {
    pub fn new(force_models: Vec<Box<dyn ForceModel<F>>>) -> Self {
        Self {
            force_models,
            crash_radius: CrashRadius::none(),
        }
    }

    pub fn with_crash_radius(mut self, crash_radius: CrashRadius) -> Self {
        self.crash_radius = crash_radius;
        self
    }

    fn check_crash(&self, cart: &Cartesian<F>) -> PhysicsResult<()> {
        if let Some(radius) = self.crash_radius.0 {
            ensure!(
                cart.rmag().value() > radius.value(),
                CrashSnafu {
                    body: "central body",
                    reason: "radius of orbit fell below the configured crash radius"
                }
            );
        }
        Ok(())
    }

    /// Sums every attached force model's acceleration, in the frame the
    /// Cartesian state is expressed in. Does not include the central
    /// body's own two-body attraction; callers needing that add
    /// [`TwoBody`] themselves.
    fn perturbing_acceleration(
        &self,
        epoch: Epoch,
        cart: &Cartesian<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<Vector3> {
        let mut accel = Vector3::zeros();
        for model in &self.force_models {
            accel += model.acceleration(epoch, cart, vehicle)?.raw();
        }
        Ok(accel)
    }

    /// Cowell's method: `ẋ = v`, `v̇ = a_two_body + Σ a_perts`.
    fn cartesian_derivative(
        &self,
        epoch: Epoch,
        cart: &Cartesian<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<OrbitalElementPartials<F>> {
        self.check_crash(cart)?;
        let two_body = TwoBody::new(cart.mu).acceleration(epoch, cart, vehicle)?;
        let perts = self.perturbing_acceleration(epoch, cart, vehicle)?;
        let acceleration = crate::math::vector::Vector::from_raw(two_body.raw() + perts);
        Ok(OrbitalElementPartials::Cartesian {
            velocity: cart.velocity,
            acceleration,
        })
    }

    /// Gauss's planetary equations for the classical element set,
    /// projecting the summed perturbing acceleration onto the radial
    /// (R), orbit-normal (N), and along-track (T) unit vectors of the
    /// instantaneous orbit. Ported from the source's
    /// `evaluate_coes_vop`, with `h = sqrt(mu * sma * (1 - ecc^2))`
    /// treated as the state's angular-momentum magnitude rather than
    /// tracked as its own propagated variable (this crate's `Keplerian`
    /// stores `sma`, not `h`; see [`OrbitalElementPartials::Keplerian`]
    /// for why the rate this returns is nonetheless named `h_dot`).
    fn keplerian_rates(
        &self,
        epoch: Epoch,
        kep: &Keplerian<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<KeplerianRates> {
        let mu = kep.mu.value();
        let sma = kep.sma.value();
        let ecc = kep.ecc.value();
        let inc = kep.inc.value();
        let theta = kep.ta.value();
        let w = kep.aop.value();

        let h = (mu * sma * (1.0 - ecc * ecc)).sqrt();

        let cart = kep.to_cartesian()?;
        self.check_crash(&cart)?;
        let r = cart.radius.raw();
        let v = cart.velocity.raw();
        let rmag = r.norm();

        let r_hat = r / rmag;
        let n_vec = r.cross(&v);
        let n_hat = n_vec / h;
        let t_vec = n_hat.cross(&r_hat);
        let t_hat = t_vec / t_vec.norm();

        let perts = self.perturbing_acceleration(epoch, &cart, vehicle)?;
        let radial_pert = perts.dot(&r_hat);
        let normal_pert = perts.dot(&n_hat);
        let tangential_pert = perts.dot(&t_hat);

        let u = w + theta;
        let (sin_ta, cos_ta) = theta.sin_cos();
        let (sin_u, cos_u) = u.sin_cos();
        let h2 = h * h;
        let h_over_r2 = h / (rmag * rmag);

        let h_dot = rmag * tangential_pert;
        let mut ecc_dot = h / mu * sin_ta * radial_pert
            + 1.0 / (mu * h) * ((h2 + mu * rmag) * cos_ta + mu * ecc * rmag) * tangential_pert;
        let mut inc_dot = rmag / h * cos_u * normal_pert;
        let ta_dot = h_over_r2
            + (1.0 / (ecc * h))
                * ((h2 / mu) * cos_ta * radial_pert - (h2 / mu + rmag) * sin_ta * tangential_pert);
        let raan_dot = rmag * sin_u / (h * inc.sin()) * normal_pert;
        let aop_dot = -ta_dot + (h_over_r2 - raan_dot * inc.cos());

        // Guard circular and zero-inclination orbits, whose RAAN/AOP
        // rates are otherwise singular: clamp the derivative to zero
        // rather than let it blow up, same as the source.
        if ecc <= SINGULARITY_TOLERANCE && ecc_dot < 0.0 {
            log::warn!("eccentricity near zero with a shrinking rate; clamping ecc_dot to 0");
            ecc_dot = 0.0;
        }
        if inc <= SINGULARITY_TOLERANCE && inc_dot < 0.0 {
            log::warn!("inclination near zero with a shrinking rate; clamping inc_dot to 0");
            inc_dot = 0.0;
        }

        Ok(KeplerianRates {
            h_dot,
            ecc_dot,
            inc_dot,
            raan_dot,
            aop_dot,
            ta_dot,
        })
    }

    fn keplerian_derivative(
        &self,
        epoch: Epoch,
        kep: &Keplerian<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<OrbitalElementPartials<F>> {
        let rates = self.keplerian_rates(epoch, kep, vehicle)?;
        Ok(OrbitalElementPartials::Keplerian {
            h_dot: Unitless::new(rates.h_dot),
            ecc_dot: Unitless::new(rates.ecc_dot),
            inc_dot: Angle::new(rates.inc_dot),
            raan_dot: Angle::new(rates.raan_dot),
            aop_dot: Angle::new(rates.aop_dot),
            ta_dot: Angle::new(rates.ta_dot),
        })
    }

    /// Equinoctial variation of parameters. This crate's [`Equinoctial`]
    /// is the Walker/Broucke-Cefola set `(sma, h, k, p, q, mean_lon)`
    /// with `h = ecc*sin(aop+raan)`, `k = ecc*cos(aop+raan)`,
    /// `p = tan(inc/2)*sin(raan)`, `q = tan(inc/2)*cos(raan)` — rather
    /// than re-derive a second, independent set of Gauss equations for
    /// it, this converts to Keplerian, reuses
    /// [`Self::keplerian_rates`], and chain-rules the result through the
    /// same closed-form relations [`Equinoctial::from_keplerian`] uses
    /// to go the other way. `mean_lon_dot` here is the rate of the
    /// osculating *true* longitude (`aop+raan+ta`), not the mean
    /// longitude: propagating the mean-anomaly rate under perturbation
    /// needs its own correction term this crate doesn't track, so (as
    /// with [`OrbitalElementPartials::Keplerian::h_dot`] above) the
    /// field is reused for the quantity the variation-of-parameters
    /// math actually produces.
    fn equinoctial_derivative(
        &self,
        epoch: Epoch,
        equi: &Equinoctial<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<OrbitalElementPartials<F>> {
        let kep = equi.to_keplerian()?;
        let rates = self.keplerian_rates(epoch, &kep, vehicle)?;

        let mu = kep.mu.value();
        let sma = kep.sma.value();
        let ecc = kep.ecc.value();
        let inc = kep.inc.value();
        let raan = kep.raan.value();
        let aop = kep.aop.value();

        let h = (mu * sma * (1.0 - ecc * ecc)).sqrt();
        let sma_dot = (2.0 * h * rates.h_dot / mu + 2.0 * sma * ecc * rates.ecc_dot)
            / (1.0 - ecc * ecc);

        let varpi = aop + raan;
        let varpi_dot = rates.aop_dot + rates.raan_dot;
        let (sin_varpi, cos_varpi) = varpi.sin_cos();

        let h_eq_dot = rates.ecc_dot * sin_varpi + ecc * cos_varpi * varpi_dot;
        let k_eq_dot = rates.ecc_dot * cos_varpi - ecc * sin_varpi * varpi_dot;

        let half_inc = inc / 2.0;
        let sec2_half_inc = 1.0 / half_inc.cos().powi(2);
        let tan_half_inc = half_inc.tan();
        let (sin_raan, cos_raan) = raan.sin_cos();

        let p_eq_dot = 0.5 * sec2_half_inc * rates.inc_dot * sin_raan + tan_half_inc * cos_raan * rates.raan_dot;
        let q_eq_dot = 0.5 * sec2_half_inc * rates.inc_dot * cos_raan - tan_half_inc * sin_raan * rates.raan_dot;

        let true_lon_dot = varpi_dot + rates.ta_dot;

        Ok(OrbitalElementPartials::Equinoctial {
            sma_dot: Length::new(sma_dot),
            h_dot: Unitless::new(h_eq_dot),
            k_dot: Unitless::new(k_eq_dot),
            p_dot: Unitless::new(p_eq_dot),
            q_dot: Unitless::new(q_eq_dot),
            mean_lon_dot: Angle::new(true_lon_dot),
        })
    }

    /// Differentiates `state`, returning a partials variant matching
    /// the representation `state` is already expressed in.
    pub fn derivative(
        &self,
        epoch: Epoch,
        state: &State<F>,
        vehicle: &dyn Vehicle<F>,
    ) -> PhysicsResult<OrbitalElementPartials<F>> {
        match &state.elements {
            OrbitalElements::Cartesian(c) => self.cartesian_derivative(epoch, c, vehicle),
            OrbitalElements::Keplerian(k) => self.keplerian_derivative(epoch, k, vehicle),
            OrbitalElements::Equinoctial(e) => self.equinoctial_derivative(epoch, e, vehicle),
        }
    }
}

#[cfg(test)]
mod eom_ut {
    use super::*;
    use crate::elements::{Cartesian, OrbitalElements, State};
    use crate::frames::EarthInertial;
    use crate::math::units::{GravParam, Mass, Velocity};
    use crate::math::vector::Vector;
    use approx::assert_relative_eq;

    struct NoopVehicle;
    impl Vehicle<EarthInertial> for NoopVehicle {
        fn state(&self) -> State<EarthInertial> {
            unimplemented!()
        }
        fn update_state(&mut self, _state: State<EarthInertial>) {}
        fn mass(&self) -> Mass {
            Mass::new(1200.0)
        }
    }

    /// An inclined near-circular LEO state. Inclination is kept away
    /// from zero deliberately: an exactly equatorial orbit makes
    /// `raan_dot`'s `1/sin(inc)` term a `0/0`, which only cancels out
    /// because the numerator (`normal_pert`) is also exactly zero in
    /// the unperturbed case below, masking a real singularity rather
    /// than exercising the non-degenerate path.
    fn leo_cart() -> Cartesian<EarthInertial> {
        let mu = GravParam::new(398_600.4418);
        let v = 7.546;
        let (sin_i, cos_i) = 51.6f64.to_radians().sin_cos();
        Cartesian::new(
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0)),
            Vector::new(Velocity::new(0.0), Velocity::new(v * cos_i), Velocity::new(v * sin_i)),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            mu,
        )
    }

    #[test]
    fn unperturbed_cowell_derivative_matches_two_body_acceleration() {
        let eom: EquationsOfMotion<EarthInertial> = EquationsOfMotion::new(Vec::new());
        let cart = leo_cart();
        let epoch = cart.epoch;
        let state = State::new(OrbitalElements::Cartesian(cart));
        let partials = eom.derivative(epoch, &state, &NoopVehicle).unwrap();
        match partials {
            OrbitalElementPartials::Cartesian { velocity, acceleration } => {
                assert_relative_eq!(velocity.y().value(), 7.546, epsilon = 1e-9);
                assert!(acceleration.x().value() < 0.0);
            }
            _ => panic!("expected a Cartesian derivative"),
        }
    }

    #[test]
    fn unperturbed_keplerian_derivative_holds_elements_constant() {
        let eom: EquationsOfMotion<EarthInertial> = EquationsOfMotion::new(Vec::new());
        let cart = leo_cart();
        let epoch = cart.epoch;
        let kep = Keplerian::try_from_cartesian(&cart).unwrap();
        let state = State::new(OrbitalElements::Keplerian(kep));
        let partials = eom.derivative(epoch, &state, &NoopVehicle).unwrap();
        match partials {
            OrbitalElementPartials::Keplerian {
                h_dot,
                ecc_dot,
                inc_dot,
                raan_dot,
                aop_dot: _,
                ta_dot,
            } => {
                // With no perturbing force, only the true anomaly moves.
                assert_relative_eq!(h_dot.value(), 0.0, epsilon = 1e-9);
                assert_relative_eq!(ecc_dot.value(), 0.0, epsilon = 1e-9);
                assert_relative_eq!(inc_dot.value(), 0.0, epsilon = 1e-9);
                assert_relative_eq!(raan_dot.value(), 0.0, epsilon = 1e-9);
                assert!(ta_dot.value() > 0.0);
            }
            _ => panic!("expected a Keplerian derivative"),
        }
    }

    #[test]
    fn unperturbed_equinoctial_derivative_holds_shape_elements_constant() {
        let eom: EquationsOfMotion<EarthInertial> = EquationsOfMotion::new(Vec::new());
        let cart = leo_cart();
        let epoch = cart.epoch;
        let kep = Keplerian::try_from_cartesian(&cart).unwrap();
        let equi = Equinoctial::from_keplerian(&kep).unwrap();
        let state = State::new(OrbitalElements::Equinoctial(equi));
        let partials = eom.derivative(epoch, &state, &NoopVehicle).unwrap();
        match partials {
            OrbitalElementPartials::Equinoctial {
                sma_dot,
                h_dot,
                k_dot,
                p_dot,
                q_dot,
                mean_lon_dot,
            } => {
                assert_relative_eq!(sma_dot.value(), 0.0, epsilon = 1e-6);
                assert_relative_eq!(h_dot.value(), 0.0, epsilon = 1e-9);
                assert_relative_eq!(k_dot.value(), 0.0, epsilon = 1e-9);
                assert_relative_eq!(p_dot.value(), 0.0, epsilon = 1e-9);
                assert_relative_eq!(q_dot.value(), 0.0, epsilon = 1e-9);
                assert!(mean_lon_dot.value() > 0.0);
            }
            _ => panic!("expected an Equinoctial derivative"),
        }
    }

    #[test]
    fn crash_radius_is_enforced() {
        let eom: EquationsOfMotion<EarthInertial> =
            EquationsOfMotion::new(Vec::new()).with_crash_radius(CrashRadius::at(Length::new(7001.0)));
        let cart = leo_cart();
        let epoch = cart.epoch;
        let state = State::new(OrbitalElements::Cartesian(cart));
        assert!(eom.derivative(epoch, &state, &NoopVehicle).is_err());
    }
}
