/*
 * ANISE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use hifitime::Epoch;
use snafu::prelude::*;
use std::io::ErrorKind as IOErrorKind;

/// Errors raised by dimensionless numerical routines shared across the
/// crate: iterative root-finders, division guards.
#[derive(Copy, Clone, Debug, Snafu, PartialEq)]
#[snafu(visibility(pub))]
pub enum MathError {
    #[snafu(display("prevented a division by zero when {action}"))]
    DivisionByZero { action: &'static str },
    #[snafu(display("{msg}: {value}"))]
    DomainError { value: f64, msg: &'static str },
    #[snafu(display("max iterations reached ({iter}) when {action}"))]
    MaxIterationsReached { iter: usize, action: &'static str },
}

pub type MathResult<T> = Result<T, MathError>;

/// Errors raised by the orbital-mechanics layer: element conversions,
/// frame rotations, the integrator, and force models.
#[derive(Clone, Debug, Snafu, PartialEq)]
#[snafu(visibility(pub))]
pub enum PhysicsError {
    /// Somehow you've entered code that should not be reachable, please file a bug.
    Unreachable,
    #[snafu(display("epochs {epoch1} and {epoch2} differ while {action}"))]
    EpochMismatch {
        action: &'static str,
        epoch1: Epoch,
        epoch2: Epoch,
    },
    #[snafu(display(
        "element-set kind mismatch: {action} requires both operands to be the same variant, got {lhs} and {rhs}"
    ))]
    KindMismatch {
        action: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[snafu(display(
        "requested element set index {got} is not one of {{Cartesian, Keplerian, Equinoctial}}"
    ))]
    UnknownElementSet { got: usize },
    #[snafu(display("celestial body id {id} is not in the built-in catalog"))]
    UnknownBody { id: crate::NaifId },
    #[snafu(display("parabolic orbits are physically impossible and the eccentricity calculated to be within {limit:e} of 1.0"))]
    ParabolicEccentricity { limit: f64 },
    #[snafu(display("hyperbolic true anomaly is physically impossible: {ta_deg} deg"))]
    HyperbolicTrueAnomaly { ta_deg: f64 },
    #[snafu(display("infinite or NaN value encountered when {action}"))]
    NonFiniteValue { action: &'static str },
    #[snafu(display("{source}"))]
    AppliedMath { source: MathError },
    #[snafu(display("invalid radius: {action}"))]
    RadiusError { action: &'static str },
    #[snafu(display("invalid velocity: {action}"))]
    VelocityError { action: &'static str },
    #[snafu(display("the vehicle crashed into {body}: {reason}"))]
    Crash {
        body: &'static str,
        reason: &'static str,
    },
    #[snafu(display(
        "no direction-cosine-matrix provider is registered between the requested frames ({action})"
    ))]
    NoRotationProvider { action: &'static str },
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Errors raised by external-interface ingestion: spherical-harmonic
/// coefficient files (§6 of the design notes) and similar row-oriented
/// inputs.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum IoError {
    #[snafu(display("failed to read coefficient file: {source}"))]
    Read { source: std::io::Error },
    #[snafu(display("failed to parse coefficient row {line}: {reason}"))]
    MalformedRow { line: usize, reason: String },
    #[snafu(display("coefficient file ended before reaching degree {n_max} order {m_max}"))]
    TruncatedFile { n_max: usize, m_max: usize },
}

pub type IoResult<T> = Result<T, IoError>;

impl From<IOErrorKind> for IoError {
    fn from(kind: IOErrorKind) -> Self {
        Self::Read {
            source: std::io::Error::from(kind),
        }
    }
}
