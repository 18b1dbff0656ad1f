// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/correction.rs - Footprint correction pattern tables.
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
 * # `correction` Module
 *
 * Loads footprint correction pattern files. A correction file is a CSV file
 * with the following columns:
 *
 * 1. Regular expression matched against the footprint library identifier
 * 2. Regular expression matched against the part ID (currently ignored)
 * 3. X correction in millimeters
 * 4. Y correction in millimeters
 * 5. Rotation correction in degrees
 *
 * The delimiter and the presence of a header row are detected automatically.
 * Rules are tried in file order and the first match wins.
 *
 * ## Usage Example
 *
 * ```no_run
 * use fabpos::correction::CorrectionTable;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let table = CorrectionTable::from_filename("corrections.csv")?;
 *
 *     let compensation = table.apply("Package_TO_SOT_SMD:SOT-23");
 *     println!("{:?}", compensation);
 *
 *     Ok(())
 * }
 * ```
 */

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use regex::Regex;

use crate::compensation::{Compensation, is_valid_offset, is_valid_rotation};
use crate::error::{FormatError, Result};
use crate::sniff;

const COLUMNS: usize = 5;

/// Single correction pattern to match a component against.
#[derive(Debug, Clone)]
pub struct CorrectionPattern {
    /// Matches the footprint library identifier from its start.
    pub footprint: Regex,
    /// Matches the part ID. Reserved; never consulted.
    pub part_id: Regex,
    /// X correction in millimeters.
    pub x_correction: f64,
    /// Y correction in millimeters.
    pub y_correction: f64,
    /// Rotation correction in degrees.
    pub rotation: f64,
}

impl CorrectionPattern {
    /// Returns true if `lib_id` starts with a match of the footprint pattern.
    pub fn matches(&self, lib_id: &str) -> bool {
        self.footprint.is_match(lib_id)
    }

    pub fn compensation(&self) -> Compensation {
        Compensation::new(self.x_correction, self.y_correction, self.rotation)
    }

    fn from_record(record: &StringRecord) -> std::result::Result<Self, FormatError> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != COLUMNS {
            return Err(FormatError::ColumnCount {
                line,
                found: record.len(),
            });
        }

        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| FormatError::InvalidPattern { line, source })
        };
        let number = |column: usize, is_valid: fn(f64) -> bool| {
            let value = &record[column];
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|&v| is_valid(v))
                .ok_or_else(|| FormatError::InvalidNumber {
                    line,
                    column: column + 1,
                    value: value.to_string(),
                })
        };

        Ok(Self {
            footprint: compile(format!("^(?:{})", &record[0]).as_str())?,
            part_id: compile(&record[1])?,
            x_correction: number(2, is_valid_offset)?,
            y_correction: number(3, is_valid_offset)?,
            rotation: number(4, is_valid_rotation)?,
        })
    }
}

/// An ordered list of correction patterns.
#[derive(Debug, Clone, Default)]
pub struct CorrectionTable {
    pub patterns: Vec<CorrectionPattern>,
}

impl CorrectionTable {
    /// Reads a correction pattern file.
    pub fn from_filename<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let file = File::open(filename.as_ref())?;
        let table = Self::from_reader(file)?;

        log::info!(
            "Loaded {} correction patterns from {}",
            table.patterns.len(),
            filename.as_ref().display()
        );

        Ok(table)
    }

    /// Reads a correction pattern file from `reader`.
    ///
    /// The whole input is buffered, since dialect detection needs a sample
    /// before parsing starts.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Parses the contents of a correction pattern file.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let dialect = sniff::sniff(data);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(dialect.delimiter)
            .flexible(true)
            .has_headers(dialect.has_header)
            .from_reader(data);

        let mut patterns = Vec::new();
        for result in reader.records() {
            let record = result?;
            patterns.push(CorrectionPattern::from_record(&record)?);
        }

        Ok(Self { patterns })
    }

    /// Returns the first pattern matching `lib_id`.
    pub fn find(&self, lib_id: &str) -> Option<&CorrectionPattern> {
        self.patterns.iter().find(|pattern| pattern.matches(lib_id))
    }

    /// Returns the correction of the first pattern matching `lib_id`, or no
    /// correction at all.
    pub fn apply(&self, lib_id: &str) -> Compensation {
        match self.find(lib_id) {
            Some(pattern) => {
                log::debug!(
                    "Footprint {} matched correction pattern {}",
                    lib_id,
                    pattern.footprint.as_str()
                );
                pattern.compensation()
            }
            None => Compensation::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
