/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Bare numeric constants shared across the crate. Body-specific physical
//! parameters (mu, radii, J2, ...) live on [`crate::bodies::CelestialBody`]
//! instances, not here; this module only carries the small set of
//! cross-cutting NAIF-style identifiers and math/astrodynamics constants
//! that do not belong to any one body or subsystem.

use crate::NaifId;

/// J2000 reference epoch, as a Julian Date (noon UT, 2000-01-01).
pub const J2000_JD: f64 = 2_451_545.0;

/// Seconds in a Julian day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in a Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Speed of light, km/s (IAU).
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Solar radiation pressure at 1 AU, N/m^2 (used by the SRP force model).
pub const SOLAR_PRESSURE_AT_1AU_N_M2: f64 = 4.56e-6;

/// 1 astronomical unit, in kilometers.
pub const ASTRONOMICAL_UNIT_KM: f64 = 149_597_870.7;

/// Tolerance used throughout element-set conversions to snap
/// near-singular geometry to canonical zero, per the singularity policy
/// described for Keplerian<->Cartesian conversion.
pub const SINGULARITY_TOLERANCE: f64 = 1e-10;

/// NAIF-style integer identifiers for celestial bodies known to the
/// built-in catalog in [`crate::bodies`]. These are stable small
/// integers used as `HashMap`/array keys, mirroring the convention the
/// corpus uses for NAIF IDs without depending on the NAIF ID registry.
pub mod celestial_objects {
    use super::NaifId;

    pub const SOLAR_SYSTEM_BARYCENTER: NaifId = 0;
    pub const SUN: NaifId = 10;
    pub const MERCURY: NaifId = 199;
    pub const VENUS: NaifId = 299;
    pub const EARTH: NaifId = 399;
    pub const MOON: NaifId = 301;
    pub const MARS: NaifId = 499;
    pub const PHOBOS: NaifId = 401;
    pub const DEIMOS: NaifId = 402;
    pub const JUPITER: NaifId = 599;
    pub const IO: NaifId = 501;
    pub const EUROPA: NaifId = 502;
    pub const GANYMEDE: NaifId = 503;
    pub const CALLISTO: NaifId = 504;
    pub const SATURN: NaifId = 699;
    pub const TITAN: NaifId = 606;
    pub const RHEA: NaifId = 605;
    pub const IAPETUS: NaifId = 608;
    pub const URANUS: NaifId = 799;
    pub const TITANIA: NaifId = 703;
    pub const OBERON: NaifId = 704;
    pub const NEPTUNE: NaifId = 899;
    pub const TRITON: NaifId = 801;

    /// Human-readable name for a known body ID, `None` for anything
    /// outside the built-in catalog.
    pub fn name_from_id(id: NaifId) -> Option<&'static str> {
        Some(match id {
            SOLAR_SYSTEM_BARYCENTER => "Solar System Barycenter",
            SUN => "Sun",
            MERCURY => "Mercury",
            VENUS => "Venus",
            EARTH => "Earth",
            MOON => "Moon",
            MARS => "Mars",
            PHOBOS => "Phobos",
            DEIMOS => "Deimos",
            JUPITER => "Jupiter",
            IO => "Io",
            EUROPA => "Europa",
            GANYMEDE => "Ganymede",
            CALLISTO => "Callisto",
            SATURN => "Saturn",
            TITAN => "Titan",
            RHEA => "Rhea",
            IAPETUS => "Iapetus",
            URANUS => "Uranus",
            TITANIA => "Titania",
            OBERON => "Oberon",
            NEPTUNE => "Neptune",
            TRITON => "Triton",
            _ => return None,
        })
    }
}

#[cfg(test)]
mod constants_ut {
    use super::*;

    #[test]
    fn body_name_roundtrip() {
        assert_eq!(
            celestial_objects::name_from_id(celestial_objects::EARTH),
            Some("Earth")
        );
        assert_eq!(celestial_objects::name_from_id(-1), None);
    }
}
