/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Compile-time-checked dimensioned quantities.
//!
//! Every base dimension named in the data model gets a newtype wrapping
//! an `f64` stored in the crate's canonical internal unit (kilometers,
//! seconds, radians, kilograms). Arithmetic between like dimensions is
//! free; arithmetic that changes dimension (e.g. `Length / TimeSpan`)
//! is expressed as an explicit operator overload with the correct
//! output type, so a caller can never silently add a `Length` to a
//! `Velocity`. Conversions to/from external units (degrees, days,
//! meters) happen only at a value's constructor or accessor; everything
//! stored internally is in the canonical unit.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! scalar_newtype {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Copy, Clone, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub f64);

        impl $name {
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            pub const fn value(self) -> f64 {
                self.0
            }

            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl Dimension for $name {
            fn raw(self) -> f64 {
                self.0
            }
        }
    };
}

/// A dimensioned scalar that can back a [`crate::math::vector::Vector`]
/// component: every newtype in this module implements it via the
/// `scalar_newtype!` macro.
pub trait Dimension:
    Copy
    + Clone
    + fmt::Debug
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + From<f64>
{
    fn raw(self) -> f64;
}

scalar_newtype!(Unitless, "A dimensionless scalar quantity.");
scalar_newtype!(Length, "A length, stored internally in kilometers.");
scalar_newtype!(TimeSpan, "A duration, stored internally in seconds.");
scalar_newtype!(Angle, "An angle, stored internally in radians.");
scalar_newtype!(Mass, "A mass, stored internally in kilograms.");
scalar_newtype!(
    GravParam,
    "A gravitational parameter mu, stored internally in km^3/s^2."
);
scalar_newtype!(Velocity, "A velocity, stored internally in km/s.");
scalar_newtype!(
    Acceleration,
    "An acceleration, stored internally in km/s^2."
);
scalar_newtype!(AngularRate, "An angular rate, stored internally in rad/s.");
scalar_newtype!(
    UnitlessRate,
    "The time derivative of a unitless quantity, stored internally in 1/s."
);
scalar_newtype!(Area, "A surface area, stored internally in km^2.");

// Cross-dimension operators: these are the only places a dimension
// actually changes, and each one is spelled out explicitly rather than
// handled by a generic `Quantity<Dim>` machine, so the exponent of
// every dimension in the system stays visible at the call site.

impl Div<TimeSpan> for Length {
    type Output = Velocity;
    fn div(self, rhs: TimeSpan) -> Velocity {
        Velocity(self.0 / rhs.0)
    }
}

impl Mul<TimeSpan> for Velocity {
    type Output = Length;
    fn mul(self, rhs: TimeSpan) -> Length {
        Length(self.0 * rhs.0)
    }
}

impl Div<TimeSpan> for Velocity {
    type Output = Acceleration;
    fn div(self, rhs: TimeSpan) -> Acceleration {
        Acceleration(self.0 / rhs.0)
    }
}

impl Mul<TimeSpan> for Acceleration {
    type Output = Velocity;
    fn mul(self, rhs: TimeSpan) -> Velocity {
        Velocity(self.0 * rhs.0)
    }
}

impl Div<TimeSpan> for Angle {
    type Output = AngularRate;
    fn div(self, rhs: TimeSpan) -> AngularRate {
        AngularRate(self.0 / rhs.0)
    }
}

impl Mul<TimeSpan> for AngularRate {
    type Output = Angle;
    fn mul(self, rhs: TimeSpan) -> Angle {
        Angle(self.0 * rhs.0)
    }
}

impl Div<TimeSpan> for Unitless {
    type Output = UnitlessRate;
    fn div(self, rhs: TimeSpan) -> UnitlessRate {
        UnitlessRate(self.0 / rhs.0)
    }
}

impl Mul<TimeSpan> for UnitlessRate {
    type Output = Unitless;
    fn mul(self, rhs: TimeSpan) -> Unitless {
        Unitless(self.0 * rhs.0)
    }
}

impl Mul<Length> for GravParam {
    // mu * r has units km^4/s^2, not a named quantity in this system,
    // so intermediate algebra that needs it works in bare f64. Only
    // mu / r^2 and mu / r^3 (used to scale a position vector into an
    // acceleration) are exposed as named operators.
    type Output = f64;
    fn mul(self, rhs: Length) -> f64 {
        self.0 * rhs.0
    }
}

impl Div<Length> for GravParam {
    type Output = f64;
    fn div(self, rhs: Length) -> f64 {
        self.0 / rhs.0
    }
}

impl Angle {
    pub fn from_degrees(deg: f64) -> Self {
        Self(deg.to_radians())
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// Normalizes to `[0, 2*pi)`.
    pub fn wrapped_positive(self) -> Self {
        Self(self.0.rem_euclid(std::f64::consts::TAU))
    }

    /// Normalizes to `(-pi, pi]`.
    pub fn wrapped_signed(self) -> Self {
        let two_pi = std::f64::consts::TAU;
        let mut wrapped = self.0.rem_euclid(two_pi);
        if wrapped > std::f64::consts::PI {
            wrapped -= two_pi;
        }
        Self(wrapped)
    }
}

impl Length {
    pub fn from_meters(m: f64) -> Self {
        Self(m / 1000.0)
    }

    pub fn to_meters(self) -> f64 {
        self.0 * 1000.0
    }
}

impl Area {
    pub fn from_m2(m2: f64) -> Self {
        Self(m2 / 1.0e6)
    }

    pub fn to_m2(self) -> f64 {
        self.0 * 1.0e6
    }
}

impl TimeSpan {
    pub fn from_days(days: f64) -> Self {
        Self(days * crate::constants::SECONDS_PER_DAY)
    }

    pub fn to_days(self) -> f64 {
        self.0 / crate::constants::SECONDS_PER_DAY
    }

    pub fn from_julian_centuries(jc: f64) -> Self {
        Self::from_days(jc * crate::constants::DAYS_PER_CENTURY)
    }

    pub fn to_julian_centuries(self) -> f64 {
        self.to_days() / crate::constants::DAYS_PER_CENTURY
    }
}

#[cfg(test)]
mod units_ut {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_over_time_is_velocity() {
        let d = Length(100.0);
        let t = TimeSpan(10.0);
        let v: Velocity = d / t;
        assert_relative_eq!(v.value(), 10.0);
    }

    #[test]
    fn angle_wrap_signed() {
        let a = Angle::from_degrees(350.0).wrapped_signed();
        assert_relative_eq!(a.to_degrees(), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn angle_wrap_positive() {
        let a = Angle::from_degrees(-10.0).wrapped_positive();
        assert_relative_eq!(a.to_degrees(), 350.0, epsilon = 1e-9);
    }
}
