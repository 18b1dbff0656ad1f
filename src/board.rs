// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/board.rs - Board and footprint data model.
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
 * # `board` Module
 *
 * Plain value types describing a board snapshot as handed over by the CAD
 * data source. Nothing in this crate mutates a [Board]; the collector only
 * reads it and produces new records.
 *
 * Coordinates are kept in board internal units (nanometres) so that the
 * millimetre values reported in the position file are exact.
 */

use std::fmt;

use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Board internal units per millimetre.
pub const IU_PER_MM: f64 = 1_000_000.0;

const MM_SCALE: u32 = 6;

/// Converts millimetres to board internal units, rounding to the nearest unit.
pub fn from_mm(mm: f64) -> i64 {
    (mm * IU_PER_MM).round() as i64
}

/// Converts board internal units to exact millimetres.
pub fn to_mm(iu: i64) -> Decimal {
    Decimal::new(iu, MM_SCALE).normalize()
}

/// A 2D point in board internal units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn from_mm(x: f64, y: f64) -> Self {
        Self {
            x: from_mm(x),
            y: from_mm(y),
        }
    }

    /// Adds `rhs`, returning `None` on overflow.
    pub fn checked_add(self, rhs: Point) -> Option<Point> {
        Some(Point::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
        ))
    }

    /// Subtracts `rhs`, returning `None` on overflow.
    pub fn checked_sub(self, rhs: Point) -> Option<Point> {
        Some(Point::new(
            self.x.checked_sub(rhs.x)?,
            self.y.checked_sub(rhs.y)?,
        ))
    }
}

/// The copper layer a footprint is placed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    /// Front copper (`F.Cu`).
    FrontCopper,
    /// Back copper (`B.Cu`).
    BackCopper,
    /// Any other layer, by name.
    Other(String),
}

impl Layer {
    pub fn from_name(name: &str) -> Self {
        match name {
            "F.Cu" => Layer::FrontCopper,
            "B.Cu" => Layer::BackCopper,
            other => Layer::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::FrontCopper => f.write_str("F.Cu"),
            Layer::BackCopper => f.write_str("B.Cu"),
            Layer::Other(name) => f.write_str(name),
        }
    }
}

/// The assembly side reported in the position file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top side, written as `T`.
    Top,
    /// Bottom side, written as `B`.
    Bottom,
}

impl Side {
    /// Derives the assembly side of a footprint from its layer.
    ///
    /// Inner or non-copper layers have no assembly meaning and are reported
    /// as [Error::InvalidLayer].
    pub fn from_footprint(footprint: &Footprint) -> Result<Self> {
        match &footprint.layer {
            Layer::FrontCopper => Ok(Side::Top),
            Layer::BackCopper => Ok(Side::Bottom),
            other => Err(Error::InvalidLayer {
                reference: footprint.reference.clone(),
                layer: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "T",
            Side::Bottom => "B",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "T" => Some(Side::Top),
            "B" => Some(Side::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Electrical/mechanical kind of a pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAttribute {
    Smd,
    ThroughHole,
    Connector,
    NonPlatedHole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pad {
    pub attribute: PadAttribute,
}

/// A component placed on the board.
#[derive(Debug, Clone)]
pub struct Footprint {
    /// The reference designator (e.g., "R1"), unique per board.
    pub reference: String,
    /// Absolute position in board internal units.
    pub position: Point,
    /// Orientation in tenths of a degree.
    pub orientation: f64,
    /// The copper layer the footprint is placed on.
    pub layer: Layer,
    /// Full library identifier, e.g. `Resistor_SMD:R_0402_1005Metric`.
    pub lib_id: String,
    /// Set for non-physical footprints that are never placed by assembly.
    pub is_virtual: bool,
    pub pads: Vec<Pad>,
}

impl Footprint {
    /// Creates a physical, pad-less footprint on the front copper layer.
    pub fn new(reference: &str, lib_id: &str, position: Point, orientation: f64) -> Self {
        Self {
            reference: reference.to_string(),
            position,
            orientation,
            layer: Layer::FrontCopper,
            lib_id: lib_id.to_string(),
            is_virtual: false,
            pads: Vec::new(),
        }
    }

    /// Orientation in degrees.
    pub fn orientation_degrees(&self) -> f64 {
        self.orientation / 10.0
    }

    /// Returns true if any pad is not a surface-mount pad.
    pub fn has_non_smd_pins(&self) -> bool {
        self.pads
            .iter()
            .any(|pad| pad.attribute != PadAttribute::Smd)
    }
}

/// A board snapshot.
#[derive(Debug, Clone, Default)]
pub struct Board {
    /// The auxiliary origin all placement coordinates are measured from.
    pub aux_origin: Point,
    pub footprints: Vec<Footprint>,
}

impl Board {
    pub fn new(aux_origin: Point, footprints: Vec<Footprint>) -> Self {
        Self {
            aux_origin,
            footprints,
        }
    }
}
