// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Component position file generation library.
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
 * # `fabpos` Crate
 *
 * A library for generating the component position ("centroid") files
 * requested by PCB assembly houses, with per-component and per-footprint
 * placement corrections.
 *
 * This crate provides the full pipeline from a board snapshot to a position
 * file:
 *
 * 1. [correction]: Loads footprint correction pattern tables.
 * 2. [compensation]: Picks the correction for each component, preferring a
 *    BOM correction field over a table pattern.
 * 3. [transform]: Applies the correction to the footprint position and
 *    orientation.
 * 4. [position]: Collects one record per assembled component.
 * 5. [posfile]: Writes the records as a sorted CSV file.
 *
 * ## Usage Example
 *
 * ```no_run
 * use fabpos::board::{Board, Footprint, Point};
 * use fabpos::bom::BomEntry;
 * use fabpos::fab::FabHouse;
 * use fabpos::position::{CollectOptions, PositionData};
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Board data comes from the CAD tool
 *     let board = Board::new(
 *         Point::from_mm(100.0, 50.0),
 *         vec![Footprint::new(
 *             "R1",
 *             "Resistor_SMD:R_0402_1005Metric",
 *             Point::from_mm(110.0, 55.0),
 *             900.0,
 *         )],
 *     );
 *
 *     let bom = vec![
 *         BomEntry::new()
 *             .with_field("reference", "R1")
 *             .with_field("JLCPCB_CORRECTION", "0;0.1;180"),
 *     ];
 *
 *     let options = CollectOptions::new(FabHouse::Jlcpcb.default_correction_fields())
 *         .bom(&bom)
 *         .correction_file("corrections.csv");
 *
 *     // Collect and write the positions
 *     let positions = PositionData::collect(&board, options)?;
 *     positions.write_to_file("pos.csv")?;
 *
 *     Ok(())
 * }
 * ```
 */

pub mod board;
pub mod bom;
pub mod compensation;
pub mod correction;
pub mod error;
pub mod fab;
pub mod posfile;
pub mod position;
pub mod sniff;
pub mod transform;

pub use error::{Error, FormatError, Result};
