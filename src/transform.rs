// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/transform.rs - Placement coordinate transforms.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `transform` Module
 *
 * Turns a footprint's board position and orientation into the coordinates
 * reported in a position file.
 *
 * The XY part of a [Compensation] is expressed in the footprint's own
 * (rotated) frame, so it is rotated by the negative footprint orientation
 * before being added to the board position. Board Y grows downwards while
 * position files expect it to grow upwards, so the reported Y is negated.
 */

use rust_decimal::Decimal;

use crate::board::{Footprint, Point, to_mm};
use crate::compensation::Compensation;
use crate::error::{Error, Result};

/// Maps a footprint to one reported coordinate, in millimeters.
///
/// Drivers can substitute their own, e.g. to mirror X for bottom-side
/// components.
pub type CoordinateFn = fn(&Footprint, Point, &Compensation) -> Result<Decimal>;

fn out_of_range(footprint: &Footprint) -> Error {
    Error::CoordinateOverflow {
        reference: footprint.reference.clone(),
    }
}

/// Returns the compensated footprint position relative to `place_offset`,
/// in board units.
///
/// Fails with [Error::CoordinateOverflow] if the result does not fit in
/// board units.
pub fn footprint_position(
    footprint: &Footprint,
    place_offset: Point,
    compensation: &Compensation,
) -> Result<Point> {
    let pos = footprint
        .position
        .checked_sub(place_offset)
        .ok_or_else(|| out_of_range(footprint))?;
    let angle = (-footprint.orientation_degrees()).to_radians();
    let (sin, cos) = angle.sin_cos();
    let x = compensation.x * cos - compensation.y * sin;
    let y = compensation.x * sin + compensation.y * cos;
    pos.checked_add(Point::from_mm(x, y))
        .ok_or_else(|| out_of_range(footprint))
}

pub fn default_footprint_x(
    footprint: &Footprint,
    place_offset: Point,
    compensation: &Compensation,
) -> Result<Decimal> {
    Ok(to_mm(footprint_position(footprint, place_offset, compensation)?.x))
}

pub fn default_footprint_y(
    footprint: &Footprint,
    place_offset: Point,
    compensation: &Compensation,
) -> Result<Decimal> {
    let y = footprint_position(footprint, place_offset, compensation)?.y;
    y.checked_neg()
        .map(to_mm)
        .ok_or_else(|| out_of_range(footprint))
}

/// Returns the compensated orientation in degrees, in `[0, 360)`.
pub fn footprint_orientation(footprint: &Footprint, compensation: &Compensation) -> f64 {
    normalize_degrees(footprint.orientation_degrees() + compensation.rotation)
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // Tiny negative inputs round up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
