// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/compensation.rs - Per-component placement compensation.
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
 * # `compensation` Module
 *
 * Decides which correction applies to a footprint. In order of precedence:
 *
 * 1. The first non-empty correction field of the footprint's BOM entry, in
 *    the form `<X>;<Y>;<ROTATION>` (millimeters and degrees).
 * 2. The first matching pattern of the correction table.
 * 3. No correction.
 *
 * The XY correction of a BOM field is read in the footprint editor by
 * hovering the cursor over the intended origin.
 */

use crate::board::Footprint;
use crate::bom::{Bom, first_field};
use crate::correction::CorrectionTable;
use crate::error::{FormatError, Result};

/// Largest accepted XY correction magnitude, in millimeters.
///
/// Anything beyond this cannot be a placement correction on a real panel.
pub const MAX_OFFSET_MM: f64 = 10_000.0;

/// Returns true if `mm` is usable as an XY correction.
pub fn is_valid_offset(mm: f64) -> bool {
    mm.is_finite() && mm.abs() <= MAX_OFFSET_MM
}

/// Returns true if `degrees` is usable as a rotation correction.
pub fn is_valid_rotation(degrees: f64) -> bool {
    degrees.is_finite()
}

/// A placement correction in the footprint's own frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Compensation {
    /// X offset in millimeters.
    pub x: f64,
    /// Y offset in millimeters.
    pub y: f64,
    /// Rotation offset in degrees.
    pub rotation: f64,
}

impl Compensation {
    pub const ZERO: Compensation = Compensation {
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
    };

    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    /// Parses a `<X>;<Y>;<ROTATION>` correction field of component
    /// `reference`.
    pub fn parse(value: &str, reference: &str) -> std::result::Result<Self, FormatError> {
        let invalid = || FormatError::InvalidCompensation {
            reference: reference.to_string(),
            value: value.to_string(),
        };

        let parts = value
            .split(';')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match parts.as_slice() {
            &[x, y, rotation]
                if is_valid_offset(x) && is_valid_offset(y) && is_valid_rotation(rotation) =>
            {
                Ok(Self::new(x, y, rotation))
            }
            _ => Err(invalid()),
        }
    }
}

/// Resolves the compensation of a single footprint.
pub fn resolve<S: AsRef<str>>(
    footprint: &Footprint,
    bom: &Bom,
    correction_fields: &[S],
    table: &CorrectionTable,
) -> Result<Compensation> {
    let field = bom
        .get(&footprint.reference)
        .and_then(|entry| first_field(entry, correction_fields));

    match field {
        Some(value) => {
            let compensation = Compensation::parse(value, &footprint.reference)?;
            log::debug!(
                "{}: using BOM correction {:?}",
                footprint.reference,
                compensation
            );
            Ok(compensation)
        }
        None => Ok(table.apply(&footprint.lib_id)),
    }
}
