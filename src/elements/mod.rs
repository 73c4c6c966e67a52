/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Orbital element sets: Cartesian, classical Keplerian, and modified
//! equinoctial, each tagged at compile time by the frame they're
//! expressed in. [`OrbitalElements`] is the sum type a propagator or
//! integrator passes around when the concrete representation is a
//! runtime choice (e.g. loaded from a state history file).

pub mod cartesian;
pub mod equinoctial;
pub mod keplerian;

pub use cartesian::Cartesian;
pub use equinoctial::Equinoctial;
pub use keplerian::Keplerian;

use hifitime::Epoch;
use indexmap::IndexMap;

use crate::errors::{KindMismatchSnafu, PhysicsResult};
use crate::frames::FrameTag;
use crate::math::units::{Angle, Length, Unitless, Velocity};
use crate::math::vector::Vector;

/// Any of the three element sets this crate supports, tagged by the
/// frame they're expressed in.
#[derive(Copy, Clone, Debug)]
pub enum OrbitalElements<F: FrameTag> {
    Cartesian(Cartesian<F>),
    Keplerian(Keplerian<F>),
    Equinoctial(Equinoctial<F>),
}

impl<F: FrameTag> OrbitalElements<F> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cartesian(_) => "Cartesian",
            Self::Keplerian(_) => "Keplerian",
            Self::Equinoctial(_) => "Equinoctial",
        }
    }

    pub fn epoch(&self) -> Epoch {
        match self {
            Self::Cartesian(c) => c.epoch,
            Self::Keplerian(k) => k.epoch,
            Self::Equinoctial(e) => e.epoch,
        }
    }

    /// Converts to the Cartesian representation, going through
    /// Keplerian for the equinoctial case.
    pub fn to_cartesian(&self) -> PhysicsResult<Cartesian<F>> {
        match self {
            Self::Cartesian(c) => Ok(*c),
            Self::Keplerian(k) => k.to_cartesian(),
            Self::Equinoctial(e) => e.to_keplerian()?.to_cartesian(),
        }
    }

    pub fn to_keplerian(&self) -> PhysicsResult<Keplerian<F>> {
        match self {
            Self::Cartesian(c) => Keplerian::try_from_cartesian(c),
            Self::Keplerian(k) => Ok(*k),
            Self::Equinoctial(e) => e.to_keplerian(),
        }
    }

    pub fn to_equinoctial(&self) -> PhysicsResult<Equinoctial<F>> {
        match self {
            Self::Cartesian(c) => Equinoctial::from_keplerian(&Keplerian::try_from_cartesian(c)?),
            Self::Keplerian(k) => Equinoctial::from_keplerian(k),
            Self::Equinoctial(e) => Ok(*e),
        }
    }

    /// A raw 6-component representation used by
    /// [`crate::integrator::Integrator`] to combine Runge-Kutta stages.
    /// Keplerian's first slot is the angular-momentum norm `h`, not
    /// `sma`, matching the basis [`OrbitalElementPartials::Keplerian`]
    /// differentiates in.
    pub fn to_vector(&self) -> [f64; 6] {
        match self {
            Self::Cartesian(c) => [
                c.radius.x().value(),
                c.radius.y().value(),
                c.radius.z().value(),
                c.velocity.x().value(),
                c.velocity.y().value(),
                c.velocity.z().value(),
            ],
            Self::Keplerian(k) => {
                let mu = k.mu.value();
                let ecc = k.ecc.value();
                let h = (mu * k.sma.value() * (1.0 - ecc * ecc)).sqrt();
                [h, ecc, k.inc.value(), k.raan.value(), k.aop.value(), k.ta.value()]
            }
            Self::Equinoctial(e) => [
                e.sma.value(),
                e.h.value(),
                e.k.value(),
                e.p.value(),
                e.q.value(),
                e.mean_lon.value(),
            ],
        }
    }

    /// Reconstructs an element set of the same kind as `self` and frame,
    /// at `epoch`, from a raw vector produced by [`Self::to_vector`] and
    /// advanced by the integrator. The angular-momentum slot is inverted
    /// back into `sma` for the Keplerian case.
    pub fn from_vector(&self, epoch: Epoch, v: [f64; 6]) -> Self {
        match self {
            Self::Cartesian(c) => Self::Cartesian(Cartesian::new(
                Vector::new(Length::new(v[0]), Length::new(v[1]), Length::new(v[2])),
                Vector::new(Velocity::new(v[3]), Velocity::new(v[4]), Velocity::new(v[5])),
                epoch,
                c.mu,
            )),
            Self::Keplerian(k) => {
                let mu = k.mu.value();
                let (h, ecc) = (v[0], v[1]);
                let sma = h * h / (mu * (1.0 - ecc * ecc));
                Self::Keplerian(Keplerian::new(
                    Length::new(sma),
                    Unitless::new(ecc),
                    Angle::new(v[2]),
                    Angle::new(v[3]),
                    Angle::new(v[4]),
                    Angle::new(v[5]),
                    epoch,
                    k.mu,
                ))
            }
            Self::Equinoctial(e) => Self::Equinoctial(Equinoctial::new(
                Length::new(v[0]),
                Unitless::new(v[1]),
                Unitless::new(v[2]),
                Unitless::new(v[3]),
                Unitless::new(v[4]),
                Angle::new(v[5]),
                epoch,
                e.mu,
            )),
        }
    }
}

/// The time derivative of an [`OrbitalElements`], in the same
/// representation as the element set it was differentiated from. Used
/// by [`crate::eom::EquationsOfMotion`] so a Cowell integrator produces
/// a Cartesian rate while a variation-of-parameters integrator produces
/// a Keplerian or equinoctial rate, without allocating a separate type
/// per representation.
#[derive(Copy, Clone, Debug)]
pub enum OrbitalElementPartials<F: FrameTag> {
    Cartesian {
        velocity: Vector<Velocity, F>,
        acceleration: Vector<crate::math::units::Acceleration, F>,
    },
    Keplerian {
        /// Rate of the angular-momentum norm, not a semimajor-axis
        /// rate: the Gauss variation-of-parameters equations this
        /// crate's Keplerian EOM kind integrates are driven by `h`,
        /// and converting that into `sma_dot` at every force-model
        /// evaluation would be both lossy near circular orbits and
        /// pure unnecessary algebra the integrator never needs.
        h_dot: Unitless,
        ecc_dot: Unitless,
        inc_dot: Angle,
        raan_dot: Angle,
        aop_dot: Angle,
        ta_dot: Angle,
    },
    Equinoctial {
        sma_dot: Length,
        h_dot: Unitless,
        k_dot: Unitless,
        p_dot: Unitless,
        q_dot: Unitless,
        mean_lon_dot: Angle,
    },
}

impl<F: FrameTag> OrbitalElementPartials<F> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cartesian { .. } => "Cartesian",
            Self::Keplerian { .. } => "Keplerian",
            Self::Equinoctial { .. } => "Equinoctial",
        }
    }

    /// A raw 6-component representation matching
    /// [`OrbitalElements::to_vector`]'s basis for the same kind, so
    /// [`crate::integrator::Integrator`] can combine Runge-Kutta stages
    /// with plain array arithmetic instead of a bespoke `Add`/`Mul` impl
    /// per element kind.
    pub fn to_vector(&self) -> [f64; 6] {
        match self {
            Self::Cartesian { velocity, acceleration } => [
                velocity.x().value(),
                velocity.y().value(),
                velocity.z().value(),
                acceleration.x().value(),
                acceleration.y().value(),
                acceleration.z().value(),
            ],
            Self::Keplerian {
                h_dot,
                ecc_dot,
                inc_dot,
                raan_dot,
                aop_dot,
                ta_dot,
            } => [
                h_dot.value(),
                ecc_dot.value(),
                inc_dot.value(),
                raan_dot.value(),
                aop_dot.value(),
                ta_dot.value(),
            ],
            Self::Equinoctial {
                sma_dot,
                h_dot,
                k_dot,
                p_dot,
                q_dot,
                mean_lon_dot,
            } => [
                sma_dot.value(),
                h_dot.value(),
                k_dot.value(),
                p_dot.value(),
                q_dot.value(),
                mean_lon_dot.value(),
            ],
        }
    }
}

impl<F: FrameTag> core::ops::Add for OrbitalElementPartials<F> {
    type Output = PhysicsResult<Self>;

    /// Sums two rates of the same kind, accumulating the contributions
    /// of several force models. Mixing kinds is a [`crate::errors::PhysicsError::KindMismatch`].
    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Cartesian { velocity: v1, acceleration: a1 }, Self::Cartesian { velocity: v2, acceleration: a2 }) => {
                Ok(Self::Cartesian {
                    velocity: v1 + v2,
                    acceleration: a1 + a2,
                })
            }
            (lhs, rhs) => KindMismatchSnafu {
                action: "summing equations-of-motion partials",
                lhs: lhs.kind(),
                rhs: rhs.kind(),
            }
            .fail(),
        }
    }
}

/// A single epoch-stamped element set.
#[derive(Copy, Clone, Debug)]
pub struct State<F: FrameTag> {
    pub epoch: Epoch,
    pub elements: OrbitalElements<F>,
}

impl<F: FrameTag> State<F> {
    pub fn new(elements: OrbitalElements<F>) -> Self {
        Self {
            epoch: elements.epoch(),
            elements,
        }
    }
}

/// An ordered, epoch-keyed trajectory, as produced by
/// [`crate::integrator::Integrator::propagate`] or loaded from a log
/// file. Backed by an [`IndexMap`] so insertion order (which for a
/// propagated trajectory is also chronological order) survives
/// iteration without a separate sort pass.
#[derive(Clone, Debug, Default)]
pub struct StateHistory<F: FrameTag> {
    states: IndexMap<Epoch, OrbitalElements<F>>,
}

impl<F: FrameTag> StateHistory<F> {
    pub fn new() -> Self {
        Self {
            states: IndexMap::new(),
        }
    }

    pub fn push(&mut self, state: State<F>) {
        self.states.insert(state.epoch, state.elements);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<State<F>> {
        self.states.first().map(|(&epoch, &elements)| State { epoch, elements })
    }

    pub fn last(&self) -> Option<State<F>> {
        self.states.last().map(|(&epoch, &elements)| State { epoch, elements })
    }

    pub fn at(&self, epoch: &Epoch) -> Option<OrbitalElements<F>> {
        self.states.get(epoch).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = State<F>> + '_ {
        self.states
            .iter()
            .map(|(&epoch, &elements)| State { epoch, elements })
    }
}

#[cfg(test)]
mod elements_ut {
    use super::*;
    use crate::frames::EarthInertial;
    use crate::math::units::GravParam;
    use hifitime::TimeUnits;

    fn sample_cartesian() -> Cartesian<EarthInertial> {
        Cartesian::new(
            Vector::new(7000.0.into(), 0.0.into(), 0.0.into()),
            Vector::new(0.0.into(), 7.546_049_1.into(), 0.0.into()),
            Epoch::from_jde_tdb(crate::constants::J2000_JD),
            GravParam::new(398_600.435_436),
        )
    }

    #[test]
    fn orbital_elements_round_trip_through_keplerian() {
        let elements = OrbitalElements::Cartesian(sample_cartesian());
        let kep = elements.to_keplerian().unwrap();
        let back = OrbitalElements::Keplerian(kep).to_cartesian().unwrap();
        assert!((back.radius.raw() - sample_cartesian().radius.raw()).norm() < 1e-6);
    }

    #[test]
    fn state_history_preserves_insertion_order() {
        let mut history = StateHistory::new();
        let epoch0 = Epoch::from_jde_tdb(crate::constants::J2000_JD);
        let cart = sample_cartesian();
        history.push(State::new(OrbitalElements::Cartesian(cart)));
        history.push(State::new(OrbitalElements::Cartesian(
            Cartesian::new(cart.radius, cart.velocity, epoch0 + 60.0.seconds(), cart.mu),
        )));
        assert_eq!(history.len(), 2);
        assert_eq!(history.first().unwrap().epoch, epoch0);
    }
}
