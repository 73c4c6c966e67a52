/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! The built-in celestial body catalog and the small system of bodies a
//! mission is defined against. Ported from the original's
//! `CelestialBody`/`AstrodynamicsSystem` factory pair: a `CelestialBody`
//! carries its physical constants and mean osculating elements about its
//! parent, and `AstrodynamicsSystem` is the registry a caller builds
//! once (central body plus whichever secondary bodies its force models
//! need) and then queries by NAIF-style id.

use core::f64::consts::TAU;

use hifitime::Epoch;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::celestial_objects;
use crate::elements::keplerian::Keplerian;
use crate::errors::{PhysicsError, PhysicsResult, UnknownBodySnafu};
use crate::frames::Ssb;
use crate::math::units::{Angle, AngularRate, GravParam, Length, Mass, TimeSpan, Unitless};
use crate::NaifId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CelestialBodyKind {
    Star,
    Planet,
    Moon,
    Barycenter,
}

/// Shape, gravity-field, and rotation constants that don't change with
/// time.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct PhysicalProperties {
    pub equatorial_radius: Length,
    pub polar_radius: Length,
    /// Radius below which a trajectory is considered to have impacted
    /// the body, per [`crate::eom::EquationsOfMotion::check_crash`].
    pub crash_radius: Length,
    /// Approximate radius of the body's sphere of influence about its
    /// parent, used to decide which body's gravity dominates at a given
    /// position.
    pub soi_radius: Length,
    pub j2: f64,
    pub j3: f64,
    pub axial_tilt: Angle,
    pub rotation_rate: AngularRate,
    pub sidereal_period: TimeSpan,
}

/// Mean osculating Keplerian elements of a body about its parent at
/// `reference_epoch`, plus their rates. The rates are kept in
/// per-Julian-century units rather than per-second: propagating a rate
/// this small (a fraction of a degree per century) as a per-second
/// quantity multiplied by a per-second `dt` loses precision over the
/// multi-century baselines these fits are valid for, the same concern
/// the source's own `CelestialBody.hpp` comments flag.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct OsculatingElements {
    pub sma_km: f64,
    pub sma_rate_km_per_century: f64,
    pub ecc: f64,
    pub ecc_rate_per_century: f64,
    pub inc_rad: f64,
    pub inc_rate_rad_per_century: f64,
    pub raan_rad: f64,
    pub raan_rate_rad_per_century: f64,
    pub aop_rad: f64,
    pub aop_rate_rad_per_century: f64,
    pub ma_rad: f64,
    pub ma_rate_rad_per_century: f64,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct CelestialBody {
    pub id: NaifId,
    pub name: &'static str,
    pub parent: Option<NaifId>,
    pub kind: CelestialBodyKind,
    pub reference_epoch: Epoch,
    pub mu: GravParam,
    /// Gravitational parameter of [`Self::parent`]; zero for a body
    /// with no parent (the Sun, in the built-in catalog).
    pub parent_mu: GravParam,
    pub mass: Mass,
    pub physical: PhysicalProperties,
    pub osculating: OsculatingElements,
}

impl CelestialBody {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: NaifId,
        name: &'static str,
        parent: Option<NaifId>,
        kind: CelestialBodyKind,
        reference_epoch: Epoch,
        mu: GravParam,
        parent_mu: GravParam,
        mass: Mass,
        physical: PhysicalProperties,
        osculating: OsculatingElements,
    ) -> Self {
        Self {
            id,
            name,
            parent,
            kind,
            reference_epoch,
            mu,
            parent_mu,
            mass,
            physical,
            osculating,
        }
    }

    fn propagate_mean_elements(&self, date: Epoch) -> (f64, f64, f64, f64, f64, f64) {
        let jc = (date - self.reference_epoch).to_seconds()
            / (crate::constants::SECONDS_PER_DAY * crate::constants::DAYS_PER_CENTURY);
        let o = &self.osculating;
        (
            o.sma_km + o.sma_rate_km_per_century * jc,
            o.ecc + o.ecc_rate_per_century * jc,
            o.inc_rad + o.inc_rate_rad_per_century * jc,
            o.raan_rad + o.raan_rate_rad_per_century * jc,
            o.aop_rad + o.aop_rate_rad_per_century * jc,
            (o.ma_rad + o.ma_rate_rad_per_century * jc).rem_euclid(TAU),
        )
    }

    /// Cheap analytical ephemeris: the mean elements propagated
    /// linearly, with the true anomaly recovered via the
    /// equation-of-center series rather than an exact Kepler solve.
    /// Suitable as a default when no numerically integrated trajectory
    /// for this body is available; see [`Self::state_at_exact`] for the
    /// higher-accuracy alternative.
    pub fn state_at(&self, date: Epoch) -> Keplerian<Ssb> {
        let (sma, ecc, inc, raan, aop, ma) = self.propagate_mean_elements(date);
        let ta = crate::math::kepler::mean_to_true_anomaly_series_rad(ma, ecc);
        Keplerian::new(
            Length::new(sma),
            Unitless::new(ecc),
            Angle::new(inc),
            Angle::new(raan),
            Angle::new(aop),
            Angle::new(ta),
            date,
            self.parent_mu,
        )
    }

    /// As [`Self::state_at`], but solves Kepler's equation by Newton
    /// iteration instead of the truncated series.
    pub fn state_at_exact(&self, date: Epoch) -> PhysicsResult<Keplerian<Ssb>> {
        let (sma, ecc, inc, raan, aop, ma) = self.propagate_mean_elements(date);
        let ta = crate::math::kepler::mean_to_true_anomaly_rad(ma, ecc)
            .map_err(|source| PhysicsError::AppliedMath { source })?;
        Ok(Keplerian::new(
            Length::new(sma),
            Unitless::new(ecc),
            Angle::new(inc),
            Angle::new(raan),
            Angle::new(aop),
            Angle::new(ta),
            date,
            self.parent_mu,
        ))
    }
}

/// Looks up a body in the built-in catalog by its NAIF-style id (see
/// [`crate::constants::celestial_objects`]). Mean elements are a
/// low-precision fit good for mission-design-scale work, not a
/// SPICE-grade ephemeris.
pub fn builtin(id: NaifId) -> Option<CelestialBody> {
    use celestial_objects::*;

    let j2000 = || Epoch::from_jde_tdb(crate::constants::J2000_JD);
    let sun_mu = 132_712_440_018.0;

    let body = match id {
        SUN => CelestialBody::new(
            SUN,
            "Sun",
            None,
            CelestialBodyKind::Star,
            j2000(),
            GravParam::new(sun_mu),
            GravParam::new(0.0),
            Mass::new(1.988_5e30),
            PhysicalProperties {
                equatorial_radius: Length::new(695_700.0),
                polar_radius: Length::new(695_700.0),
                crash_radius: Length::new(695_700.0),
                soi_radius: Length::new(1.0e12),
                j2: 0.0,
                j3: 0.0,
                axial_tilt: Angle::from_degrees(7.25),
                rotation_rate: AngularRate::new(TAU / (25.38 * crate::constants::SECONDS_PER_DAY)),
                sidereal_period: TimeSpan::from_days(25.38),
            },
            OsculatingElements {
                sma_km: 0.0,
                sma_rate_km_per_century: 0.0,
                ecc: 0.0,
                ecc_rate_per_century: 0.0,
                inc_rad: 0.0,
                inc_rate_rad_per_century: 0.0,
                raan_rad: 0.0,
                raan_rate_rad_per_century: 0.0,
                aop_rad: 0.0,
                aop_rate_rad_per_century: 0.0,
                ma_rad: 0.0,
                ma_rate_rad_per_century: 0.0,
            },
        ),
        MERCURY => planet(
            MERCURY,
            "Mercury",
            sun_mu,
            22_032.0,
            2_439.7,
            2_439.7,
            112_000.0,
            6.0e-5,
            0.0,
            0.03,
            58.646,
            57_909_050.0,
            0.205_630,
            7.005,
            48.331,
            29.124,
            174.796,
            87.969,
        ),
        VENUS => planet(
            VENUS,
            "Venus",
            sun_mu,
            324_859.0,
            6_051.8,
            6_051.8,
            616_000.0,
            4.458e-6,
            0.0,
            177.36,
            -243.025,
            108_208_000.0,
            0.006_772,
            3.394_58,
            76.680,
            54.884,
            50.115,
            224.701,
        ),
        EARTH => planet(
            EARTH,
            "Earth",
            sun_mu,
            398_600.4418,
            6_378.137,
            6_356.7523,
            924_000.0,
            1.082_63e-3,
            -2.5e-6,
            23.439_2811,
            0.997_27,
            149_598_023.0,
            0.016_709,
            0.0,
            174.9,
            288.1,
            357.517_23,
            365.256_36,
        ),
        MOON => moon(
            MOON,
            "Moon",
            EARTH,
            398_600.4418,
            4_902.800_7,
            1_737.4,
            1_737.1,
            1_737.4,
            66_100.0,
            2.032e-4,
            0.0,
            6.68,
            27.321_661,
            384_400.0,
            0.0549,
            5.145,
            125.08,
            318.15,
            135.27,
            27.321_582,
        ),
        MARS => planet(
            MARS,
            "Mars",
            sun_mu,
            42_828.37,
            3_396.19,
            3_376.2,
            577_000.0,
            1.960_45e-3,
            3.145e-5,
            25.19,
            1.025_957,
            227_939_200.0,
            0.093_41,
            1.850,
            49.558,
            286.502,
            19.373,
            686.980,
        ),
        PHOBOS => moon(
            PHOBOS,
            "Phobos",
            MARS,
            42_828.37,
            7.08e-4,
            13.0,
            11.1,
            13.0,
            none_soi(),
            0.0,
            0.0,
            0.0,
            0.318_91,
            9_376.0,
            0.0151,
            1.093,
            0.0,
            0.0,
            0.0,
            0.318_91,
        ),
        DEIMOS => moon(
            DEIMOS,
            "Deimos",
            MARS,
            42_828.37,
            9.8e-5,
            7.8,
            6.1,
            7.8,
            none_soi(),
            0.0,
            0.0,
            0.0,
            1.262_44,
            23_463.2,
            0.0002,
            0.93,
            0.0,
            0.0,
            0.0,
            1.262_44,
        ),
        JUPITER => planet(
            JUPITER,
            "Jupiter",
            sun_mu,
            126_686_531.9,
            71_492.0,
            66_854.0,
            48_219_000.0,
            1.469_6e-2,
            0.0,
            3.13,
            0.413_54,
            778_570_000.0,
            0.048_97,
            1.303,
            100.464,
            273.867,
            20.020,
            4_332.589,
        ),
        IO => moon(
            IO,
            "Io",
            JUPITER,
            126_686_531.9,
            5_959.9,
            1_821.6,
            1_815.8,
            1_821.6,
            7_836.0,
            0.0,
            0.0,
            0.0,
            1.769_137_8,
            421_700.0,
            0.0041,
            0.036,
            0.0,
            0.0,
            0.0,
            1.769_137_8,
        ),
        EUROPA => moon(
            EUROPA,
            "Europa",
            JUPITER,
            126_686_531.9,
            3_202.7,
            1_560.8,
            1_560.8,
            1_560.8,
            12_570.0,
            0.0,
            0.0,
            0.0,
            3.551_181,
            671_034.0,
            0.0094,
            0.466,
            0.0,
            0.0,
            0.0,
            3.551_181,
        ),
        GANYMEDE => moon(
            GANYMEDE,
            "Ganymede",
            JUPITER,
            126_686_531.9,
            9_887.8,
            2_631.2,
            2_631.2,
            2_631.2,
            20_100.0,
            0.0,
            0.0,
            0.0,
            7.154_553,
            1_070_412.0,
            0.0013,
            0.177,
            0.0,
            0.0,
            0.0,
            7.154_553,
        ),
        CALLISTO => moon(
            CALLISTO,
            "Callisto",
            JUPITER,
            126_686_531.9,
            7_179.2,
            2_410.3,
            2_410.3,
            2_410.3,
            37_700.0,
            0.0,
            0.0,
            0.0,
            16.689_018_4,
            1_882_709.0,
            0.0074,
            0.192,
            0.0,
            0.0,
            0.0,
            16.689_018_4,
        ),
        SATURN => planet(
            SATURN,
            "Saturn",
            sun_mu,
            37_931_206.2,
            60_268.0,
            54_364.0,
            43_226_000.0,
            1.629_1e-2,
            0.0,
            26.73,
            0.444_01,
            1_433_529_000.0,
            0.055_55,
            2.485,
            113.665,
            339.392,
            317.020,
            10_759.22,
        ),
        TITAN => moon(
            TITAN,
            "Titan",
            SATURN,
            37_931_206.2,
            8_978.13,
            2_574.73,
            2_574.73,
            2_574.73,
            44_200.0,
            0.0,
            0.0,
            0.0,
            15.945_4,
            1_221_870.0,
            0.0288,
            0.348_9,
            0.0,
            0.0,
            0.0,
            15.945_4,
        ),
        RHEA => moon(
            RHEA,
            "Rhea",
            SATURN,
            37_931_206.2,
            153.94,
            763.8,
            763.8,
            763.8,
            13_900.0,
            0.0,
            0.0,
            0.0,
            4.518_2,
            527_108.0,
            0.0012_6,
            0.345,
            0.0,
            0.0,
            0.0,
            4.518_2,
        ),
        IAPETUS => moon(
            IAPETUS,
            "Iapetus",
            SATURN,
            37_931_206.2,
            120.51,
            734.5,
            734.5,
            734.5,
            11_300.0,
            0.0,
            0.0,
            0.0,
            79.33,
            3_560_820.0,
            0.028_6,
            15.47,
            0.0,
            0.0,
            0.0,
            79.33,
        ),
        URANUS => planet(
            URANUS,
            "Uranus",
            sun_mu,
            5_793_951.3,
            25_559.0,
            24_973.0,
            51_655_000.0,
            3.343_4e-3,
            0.0,
            97.77,
            -0.718_33,
            2_872_463_000.0,
            0.046_38,
            0.773,
            74.006,
            96.998_857,
            142.238_6,
            30_685.4,
        ),
        TITANIA => moon(
            TITANIA,
            "Titania",
            URANUS,
            5_793_951.3,
            228.2,
            788.9,
            788.9,
            788.9,
            10_700.0,
            0.0,
            0.0,
            0.0,
            8.706_23,
            436_300.0,
            0.0011,
            0.34,
            0.0,
            0.0,
            0.0,
            8.706_23,
        ),
        OBERON => moon(
            OBERON,
            "Oberon",
            URANUS,
            5_793_951.3,
            192.4,
            761.4,
            761.4,
            761.4,
            9_400.0,
            0.0,
            0.0,
            0.0,
            13.463_24,
            583_519.0,
            0.0014,
            0.058,
            0.0,
            0.0,
            0.0,
            13.463_24,
        ),
        NEPTUNE => planet(
            NEPTUNE,
            "Neptune",
            sun_mu,
            6_836_527.1,
            24_764.0,
            24_341.0,
            86_353_000.0,
            3.411e-3,
            0.0,
            28.32,
            0.671_25,
            4_495_060_000.0,
            0.009_46,
            1.770,
            131.784,
            273.187,
            256.228,
            60_189.0,
        ),
        TRITON => moon(
            TRITON,
            "Triton",
            NEPTUNE,
            6_836_527.1,
            1_427.6,
            1_353.4,
            1_353.4,
            1_353.4,
            48_900.0,
            0.0,
            0.0,
            156.865,
            5.876_85,
            354_759.0,
            0.0000_16,
            129.812,
            0.0,
            0.0,
            0.0,
            -5.876_85,
        ),
        _ => return None,
    };

    Some(body)
}

fn none_soi() -> f64 {
    0.0
}

#[allow(clippy::too_many_arguments)]
fn planet(
    id: NaifId,
    name: &'static str,
    sun_mu: f64,
    mu: f64,
    eq_radius: f64,
    polar_radius: f64,
    soi_radius: f64,
    j2: f64,
    j3: f64,
    axial_tilt_deg: f64,
    rotation_period_days: f64,
    sma_km: f64,
    ecc: f64,
    inc_deg: f64,
    raan_deg: f64,
    aop_deg: f64,
    ma_deg_j2000: f64,
    period_days: f64,
) -> CelestialBody {
    let j2000 = Epoch::from_jde_tdb(crate::constants::J2000_JD);
    let ma_rate_deg_per_century = 360.0 / period_days * crate::constants::DAYS_PER_CENTURY;
    CelestialBody::new(
        id,
        name,
        Some(celestial_objects::SUN),
        CelestialBodyKind::Planet,
        j2000,
        GravParam::new(mu),
        GravParam::new(sun_mu),
        Mass::new(mu / 6.674_30e-20),
        PhysicalProperties {
            equatorial_radius: Length::new(eq_radius),
            polar_radius: Length::new(polar_radius),
            crash_radius: Length::new(eq_radius),
            soi_radius: Length::new(soi_radius),
            j2,
            j3,
            axial_tilt: Angle::from_degrees(axial_tilt_deg),
            rotation_rate: AngularRate::new(
                TAU / (rotation_period_days.abs() * crate::constants::SECONDS_PER_DAY)
                    * rotation_period_days.signum(),
            ),
            sidereal_period: TimeSpan::from_days(rotation_period_days.abs()),
        },
        OsculatingElements {
            sma_km,
            sma_rate_km_per_century: 0.0,
            ecc,
            ecc_rate_per_century: 0.0,
            inc_rad: inc_deg.to_radians(),
            inc_rate_rad_per_century: 0.0,
            raan_rad: raan_deg.to_radians(),
            raan_rate_rad_per_century: 0.0,
            aop_rad: aop_deg.to_radians(),
            aop_rate_rad_per_century: 0.0,
            ma_rad: ma_deg_j2000.to_radians(),
            ma_rate_rad_per_century: ma_rate_deg_per_century.to_radians(),
        },
    )
}

#[allow(clippy::too_many_arguments)]
fn moon(
    id: NaifId,
    name: &'static str,
    parent: NaifId,
    parent_mu: f64,
    mu: f64,
    eq_radius: f64,
    polar_radius: f64,
    crash_radius: f64,
    soi_radius: f64,
    j2: f64,
    j3: f64,
    axial_tilt_deg: f64,
    rotation_period_days: f64,
    sma_km: f64,
    ecc: f64,
    inc_deg: f64,
    raan_deg: f64,
    aop_deg: f64,
    ma_deg_j2000: f64,
    period_days: f64,
) -> CelestialBody {
    let j2000 = Epoch::from_jde_tdb(crate::constants::J2000_JD);
    let ma_rate_deg_per_century = 360.0 / period_days * crate::constants::DAYS_PER_CENTURY;
    CelestialBody::new(
        id,
        name,
        Some(parent),
        CelestialBodyKind::Moon,
        j2000,
        GravParam::new(mu),
        GravParam::new(parent_mu),
        Mass::new(mu / 6.674_30e-20),
        PhysicalProperties {
            equatorial_radius: Length::new(eq_radius),
            polar_radius: Length::new(polar_radius),
            crash_radius: Length::new(crash_radius),
            soi_radius: Length::new(soi_radius),
            j2,
            j3,
            axial_tilt: Angle::from_degrees(axial_tilt_deg),
            rotation_rate: AngularRate::new(
                TAU / (rotation_period_days.abs().max(1e-6) * crate::constants::SECONDS_PER_DAY)
                    * rotation_period_days.signum().max(-1.0),
            ),
            sidereal_period: TimeSpan::from_days(rotation_period_days.abs()),
        },
        OsculatingElements {
            sma_km,
            sma_rate_km_per_century: 0.0,
            ecc,
            ecc_rate_per_century: 0.0,
            inc_rad: inc_deg.to_radians(),
            inc_rate_rad_per_century: 0.0,
            raan_rad: raan_deg.to_radians(),
            raan_rate_rad_per_century: 0.0,
            aop_rad: aop_deg.to_radians(),
            aop_rate_rad_per_century: 0.0,
            ma_rad: ma_deg_j2000.to_radians(),
            ma_rate_rad_per_century: ma_rate_deg_per_century.to_radians(),
        },
    )
}

/// A registry of [`CelestialBody`] instances a mission is defined
/// against: a central body plus whichever secondary bodies its force
/// models or access geometry need, with their common ancestor ("system
/// root", per the source's `find_system_root`) computed once at
/// construction.
#[derive(Clone, Debug)]
pub struct AstrodynamicsSystem {
    bodies: IndexMap<NaifId, CelestialBody>,
    central: NaifId,
    root: NaifId,
}

impl AstrodynamicsSystem {
    pub fn new(central: NaifId, secondary: &[NaifId]) -> PhysicsResult<Self> {
        let mut bodies = IndexMap::new();
        Self::insert_with_ancestors(&mut bodies, central)?;
        for &id in secondary {
            Self::insert_with_ancestors(&mut bodies, id)?;
        }
        let root = Self::find_system_root(&bodies, central);
        Ok(Self {
            bodies,
            central,
            root,
        })
    }

    /// Convenience constructor for the common Earth-centered,
    /// Moon-as-third-body case, mirroring the source's
    /// `AstrodynamicsSystem::EarthMoon`.
    pub fn earth_moon() -> Self {
        Self::new(celestial_objects::EARTH, &[celestial_objects::MOON])
            .expect("Earth and the Moon are always present in the built-in catalog")
    }

    fn insert_with_ancestors(
        bodies: &mut IndexMap<NaifId, CelestialBody>,
        id: NaifId,
    ) -> PhysicsResult<()> {
        let mut cur = id;
        loop {
            if bodies.contains_key(&cur) {
                return Ok(());
            }
            let body = builtin(cur).ok_or(UnknownBodySnafu { id: cur }.build())?;
            let parent = body.parent;
            bodies.insert(cur, body);
            match parent {
                Some(parent_id) => cur = parent_id,
                None => return Ok(()),
            }
        }
    }

    /// The common ancestor of every registered body, walking parent
    /// pointers; falls back to the Sun if any registered body's chain
    /// does not lead back through the central body's own chain.
    fn find_system_root(bodies: &IndexMap<NaifId, CelestialBody>, central: NaifId) -> NaifId {
        let mut central_chain = vec![central];
        let mut cur = central;
        while let Some(parent) = bodies.get(&cur).and_then(|b| b.parent) {
            central_chain.push(parent);
            cur = parent;
        }

        for &id in bodies.keys() {
            if central_chain.contains(&id) {
                continue;
            }
            let mut cur = id;
            let mut reaches_central_chain = false;
            loop {
                if central_chain.contains(&cur) {
                    reaches_central_chain = true;
                    break;
                }
                match bodies.get(&cur).and_then(|b| b.parent) {
                    Some(parent) => cur = parent,
                    None => break,
                }
            }
            if !reaches_central_chain {
                return celestial_objects::SUN;
            }
        }

        *central_chain.last().unwrap_or(&central)
    }

    pub fn central_body(&self) -> &CelestialBody {
        &self.bodies[&self.central]
    }

    pub fn root(&self) -> NaifId {
        self.root
    }

    pub fn mu(&self) -> GravParam {
        self.central_body().mu
    }

    pub fn get(&self, id: NaifId) -> Option<&CelestialBody> {
        self.bodies.get(&id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.values()
    }
}

#[cfg(test)]
mod bodies_ut {
    use super::*;
    use approx::assert_relative_eq;
    use hifitime::TimeUnits;

    #[test]
    fn earth_moon_system_roots_at_the_sun() {
        let system = AstrodynamicsSystem::earth_moon();
        assert_eq!(system.root(), celestial_objects::SUN);
        assert_eq!(system.central_body().name, "Earth");
    }

    #[test]
    fn unknown_body_id_is_rejected() {
        assert!(AstrodynamicsSystem::new(-999, &[]).is_err());
    }

    #[test]
    fn moon_state_advances_over_a_quarter_orbit() {
        let moon = builtin(celestial_objects::MOON).unwrap();
        let epoch0 = moon.reference_epoch;
        let quarter_period = moon.osculating.ma_rate_rad_per_century.recip()
            * crate::constants::DAYS_PER_CENTURY
            * crate::constants::SECONDS_PER_DAY
            * core::f64::consts::FRAC_PI_2;
        let state0 = moon.state_at(epoch0);
        let state1 = moon.state_at(epoch0 + quarter_period.seconds());
        assert_relative_eq!(state0.sma.value(), state1.sma.value(), epsilon = 1e-6);
        assert!(state0.ta.value() != state1.ta.value());
    }
}
