/*
 * ANISE Toolkit
 * Copyright (C) 2021-2023 Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

//! Geometric access analysis: Earth-limb (or any body-limb) occlusion,
//! sensor field-of-regard containment, and rise/set interval extraction
//! from a time-sampled visibility trace.
//!
//! This module covers the purely geometric half of access analysis —
//! whether one platform can see another at a given instant, and the
//! contiguous intervals during which it can. Link-budget quantities
//! (carrier-to-noise ratio, antenna gain, atmospheric/polarization
//! losses) are a distinct concern layered on top of a confirmed
//! geometric access and are out of scope here.

use hifitime::{Duration, Epoch};

use crate::bodies::CelestialBody;
use crate::errors::{MathError, MathResult, PhysicsError, PhysicsResult};
use crate::frames::FrameTag;
use crate::math::units::{Angle, Length, Unitless};
use crate::math::vector::Vector;

/// A sensor's field of regard: whether a target along a given look
/// vector (expressed from the sensor's own origin, in the sensor's
/// frame) is within view.
///
/// Implementors can be as simple as a fixed half-angle cone (see
/// [`ConicalFov`]) or as elaborate as a gimbaled, keep-out-zone-aware
/// sensor; this trait only asks for the yes/no containment test that
/// [`link_is_visible`] and rise/set extraction need.
pub trait FieldOfView<F: FrameTag> {
    fn contains(&self, look_vector: Vector<Length, F>, date: Epoch) -> bool;
}

/// A fixed half-angle cone about a boresight direction, the common case
/// for an antenna or optical sensor with no gimbal.
#[derive(Copy, Clone, Debug)]
pub struct ConicalFov<F: FrameTag> {
    pub boresight: Vector<Unitless, F>,
    pub half_angle: Angle,
}

impl<F: FrameTag> ConicalFov<F> {
    pub fn new(boresight: Vector<Unitless, F>, half_angle: Angle) -> Self {
        Self {
            boresight,
            half_angle,
        }
    }
}

impl<F: FrameTag> FieldOfView<F> for ConicalFov<F> {
    fn contains(&self, look_vector: Vector<Length, F>, _date: Epoch) -> bool {
        let look_unit = look_vector.unit();
        let cos_theta = self.boresight.dot(&look_unit);
        cos_theta >= self.half_angle.value().cos()
    }
}

/// Whether `occulting_body` blocks the line of sight between two
/// positions expressed about that body's center.
///
/// Assumes a spherical occulting body, per the source's own note that
/// this is an approximation good enough for mission-design-scale access
/// analysis. `margin` pads the body's equatorial radius (e.g. for an
/// atmosphere or terrain bulge); pass [`Length::new`]`(0.0)` for a bare
/// geometric sphere.
///
/// Only checks whether `position1` is shadowed from `position2`; the
/// occlusion of a spherical body is symmetric, so the reverse direction
/// is blocked whenever this one is.
pub fn is_occulted<F: FrameTag>(
    position1: Vector<Length, F>,
    position2: Vector<Length, F>,
    occulting_body: &CelestialBody,
    margin: Length,
) -> PhysicsResult<bool> {
    let nadir1 = -position1;
    let nadir1_mag = nadir1.norm();
    let radius1to2 = position2 - position1;

    let limb_radius = occulting_body.physical.equatorial_radius + margin;
    let sin_limb = (limb_radius.value() / nadir1_mag.value()).clamp(-1.0, 1.0);
    let earth_limb_angle_rad = sin_limb.asin();

    let satellite_nadir_angle_rad = nadir1
        .offset_angle_rad(&radius1to2)
        .map_err(|source| PhysicsError::AppliedMath { source })?;

    if satellite_nadir_angle_rad <= earth_limb_angle_rad {
        let radius1to2_mag = radius1to2.norm();
        let earth_limb_range = nadir1_mag.value() * earth_limb_angle_rad.cos();
        if radius1to2_mag.value() > earth_limb_range {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether a link between two platforms is usable at the given instant:
/// not occulted by `occulting_body` (if any), and within both sensors'
/// field of regard.
///
/// `two_way` mirrors the source's distinction between a link that must
/// be in view from both ends (e.g. a crosslink requiring both antennas
/// pointed) and one where either end seeing the other is sufficient.
#[allow(clippy::too_many_arguments)]
pub fn link_is_visible<F: FrameTag>(
    position1: Vector<Length, F>,
    position2: Vector<Length, F>,
    sensor1: &dyn FieldOfView<F>,
    sensor2: &dyn FieldOfView<F>,
    two_way: bool,
    occulting_body: Option<(&CelestialBody, Length)>,
    date: Epoch,
) -> PhysicsResult<bool> {
    if let Some((body, margin)) = occulting_body {
        if is_occulted(position1, position2, body, margin)? {
            return Ok(false);
        }
    }

    let radius1to2 = position2 - position1;
    let radius2to1 = position1 - position2;
    let in1 = sensor1.contains(radius1to2, date);
    let in2 = sensor2.contains(radius2to1, date);
    Ok(if two_way { in1 && in2 } else { in1 || in2 })
}

/// A contiguous interval during which access held, bounded inclusive on
/// both ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RiseSetInterval {
    pub rise: Epoch,
    pub set: Epoch,
}

/// Extracts rise/set intervals from a time-ordered trace of
/// `(epoch, is_visible)` samples.
///
/// `samples` must be sorted by epoch and span the analysis window's
/// full start/end; the first and last samples are treated as bookends
/// the way the source does: the window opens already "risen" if the
/// first sample is visible, and closes with a final set exactly at the
/// last sample if it's still visible there (a rise with no observed set
/// before the window ends is dropped, matching the source's note that
/// access is analyzed over `[start, end)`).
///
/// A rise and set landing on the same sample (access visible for a
/// single sample only) is dropped rather than reported as a
/// zero-length interval — per the source, this is almost always an
/// artifact of too coarse a sampling resolution rather than a real
/// access.
pub fn find_rise_set_intervals(samples: &[(Epoch, bool)]) -> Vec<RiseSetInterval> {
    let mut intervals = Vec::new();
    let (Some(&(start, _)), Some(&(end, _))) = (samples.first(), samples.last()) else {
        return intervals;
    };

    let mut inside_access = false;
    let mut rise = start;
    let mut set = start;

    for &(time, visible) in samples {
        if time == start {
            inside_access = visible;
            if inside_access {
                rise = start;
            }
            continue;
        }
        if time == end {
            if inside_access && visible {
                intervals.push(RiseSetInterval { rise, set: end });
                continue;
            }
        }

        if inside_access && !visible {
            inside_access = false;
            if rise != set {
                intervals.push(RiseSetInterval { rise, set });
            }
        } else if inside_access && visible {
            set = time;
        } else if !inside_access && visible {
            inside_access = true;
            rise = time;
            set = time;
        }
    }
    intervals
}

/// Builds an evenly spaced time vector from `start` to `end`, clamping
/// the final step so it lands exactly on `end` rather than overshooting
/// by a fraction of `resolution`.
pub fn sample_epochs(start: Epoch, end: Epoch, resolution: Duration) -> MathResult<Vec<Epoch>> {
    if resolution <= Duration::ZERO {
        return Err(MathError::DomainError {
            value: resolution.to_seconds(),
            msg: "sample_epochs requires a positive resolution",
        });
    }
    let mut times = Vec::new();
    let mut time = start;
    loop {
        times.push(time);
        if time >= end {
            break;
        }
        time = if time + resolution > end { end } else { time + resolution };
    }
    Ok(times)
}

#[cfg(test)]
mod access_ut {
    use super::*;
    use crate::bodies;
    use crate::constants::celestial_objects::EARTH;
    use crate::frames::EarthInertial;
    use crate::math::units::Length;
    use hifitime::TimeUnits;

    fn earth() -> CelestialBody {
        bodies::builtin(EARTH).expect("Earth is always in the built-in catalog")
    }

    fn epoch(seconds: f64) -> Epoch {
        Epoch::from_jde_tdb(crate::constants::J2000_JD) + seconds.seconds()
    }

    #[test]
    fn occultation_blocks_line_of_sight_through_the_earth() {
        let earth = earth();
        let position1: Vector<Length, EarthInertial> =
            Vector::new(Length::new(-7000.0), Length::new(0.0), Length::new(0.0));
        let position2: Vector<Length, EarthInertial> =
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0));
        let occulted = is_occulted(position1, position2, &earth, Length::new(0.0)).unwrap();
        assert!(occulted);
    }

    #[test]
    fn occultation_does_not_block_nearby_unobstructed_line_of_sight() {
        let earth = earth();
        let position1: Vector<Length, EarthInertial> =
            Vector::new(Length::new(7000.0), Length::new(0.0), Length::new(0.0));
        let position2: Vector<Length, EarthInertial> =
            Vector::new(Length::new(7100.0), Length::new(100.0), Length::new(0.0));
        let occulted = is_occulted(position1, position2, &earth, Length::new(0.0)).unwrap();
        assert!(!occulted);
    }

    #[test]
    fn conical_fov_contains_boresight_direction() {
        let fov: ConicalFov<EarthInertial> = ConicalFov::new(
            Vector::new(Unitless::new(1.0), Unitless::new(0.0), Unitless::new(0.0)),
            Angle::from_degrees(10.0),
        );
        let look: Vector<Length, EarthInertial> =
            Vector::new(Length::new(1.0), Length::new(0.0), Length::new(0.0));
        assert!(fov.contains(look, epoch(0.0)));

        let outside: Vector<Length, EarthInertial> =
            Vector::new(Length::new(0.0), Length::new(1.0), Length::new(0.0));
        assert!(!fov.contains(outside, epoch(0.0)));
    }

    #[test]
    fn rise_set_extraction_finds_a_single_middle_interval() {
        let samples = vec![
            (epoch(0.0), false),
            (epoch(10.0), false),
            (epoch(20.0), true),
            (epoch(30.0), true),
            (epoch(40.0), true),
            (epoch(50.0), false),
            (epoch(60.0), false),
        ];
        let intervals = find_rise_set_intervals(&samples);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].rise, epoch(20.0));
        assert_eq!(intervals[0].set, epoch(40.0));
    }

    #[test]
    fn rise_set_extraction_keeps_access_open_at_the_window_bookends() {
        let samples = vec![
            (epoch(0.0), true),
            (epoch(10.0), true),
            (epoch(20.0), false),
            (epoch(30.0), true),
            (epoch(40.0), true),
        ];
        let intervals = find_rise_set_intervals(&samples);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0], RiseSetInterval { rise: epoch(0.0), set: epoch(10.0) });
        assert_eq!(intervals[1], RiseSetInterval { rise: epoch(30.0), set: epoch(40.0) });
    }

    #[test]
    fn rise_set_extraction_drops_single_sample_blips() {
        let samples = vec![
            (epoch(0.0), false),
            (epoch(10.0), true),
            (epoch(20.0), false),
        ];
        let intervals = find_rise_set_intervals(&samples);
        assert!(intervals.is_empty());
    }

    #[test]
    fn sample_epochs_clamps_the_final_step_to_end() {
        let start = epoch(0.0);
        let end = epoch(25.0);
        let times = sample_epochs(start, end, 10.0.seconds()).unwrap();
        assert_eq!(times.len(), 4);
        assert_eq!(times[3], end);
    }

    #[test]
    fn sample_epochs_rejects_nonpositive_resolution() {
        assert!(sample_epochs(epoch(0.0), epoch(10.0), 0.0.seconds()).is_err());
    }
}
