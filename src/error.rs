// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for position file generation.
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

use thiserror::Error;

/// Malformed user-supplied correction or BOM data.
///
/// Every variant carries the row or designator needed to find the fault in
/// the source file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("correction table line {line}: expected 5 columns, found {found}")]
    ColumnCount { line: u64, found: usize },

    #[error("correction table line {line}: invalid number {value:?} in column {column}")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("correction table line {line}: invalid regular expression: {source}")]
    InvalidPattern {
        line: u64,
        #[source]
        source: regex::Error,
    },

    #[error("{reference}: Invalid format of compensation '{value}'")]
    InvalidCompensation { reference: String, value: String },

    #[error("BOM entry {index} has no \"reference\" field")]
    MissingReference { index: usize },

    #[error("duplicate designator {0} in position data")]
    DuplicateDesignator(String),

    #[error("position file line {line}: {message}")]
    InvalidPositionRow { line: u64, message: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    /// A footprint sits on a layer that has no assembly side.
    #[error("Got component {reference} with invalid layer {layer}")]
    InvalidLayer { reference: String, layer: String },

    /// The compensated position does not fit in board units.
    #[error("{reference}: position out of range")]
    CoordinateOverflow { reference: String },
}

pub type Result<T> = std::result::Result<T, Error>;
