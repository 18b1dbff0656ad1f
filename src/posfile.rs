// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/posfile.rs - Position (centroid) CSV file reading and writing.
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

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;

use crate::board::Side;
use crate::error::{FormatError, Result};
use crate::position::{PositionData, PositionRecord};

/// Column names of a position file.
pub const HEADER: [&str; 5] = ["Designator", "Mid X", "Mid Y", "Layer", "Rotation"];

impl PositionData {
    /// Writes the position file, one row per component sorted by designator.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);

        writer.write_record(HEADER)?;
        for record in self.sorted() {
            writer.write_record([
                record.designator.clone(),
                record.x.to_string(),
                record.y.to_string(),
                record.side.to_string(),
                record.rotation.to_string(),
            ])?;
        }
        writer.flush()?;

        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let file = File::create(filename.as_ref())?;
        self.write_to(file)?;

        log::info!(
            "Wrote {} positions to {}",
            self.records.len(),
            filename.as_ref().display()
        );

        Ok(())
    }

    /// Reads back a position file.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?;
        if headers.iter().ne(HEADER) {
            return Err(FormatError::InvalidPositionRow {
                line: 1,
                message: format!("unexpected header {:?}", headers),
            }
            .into());
        }

        let mut records = Vec::new();
        for result in reader.records() {
            records.push(parse_record(&result?)?);
        }

        Ok(Self { records })
    }

    pub fn from_filename<P: AsRef<Path>>(filename: P) -> Result<Self> {
        let file = File::open(filename)?;
        Self::from_reader(BufReader::new(file))
    }
}

fn parse_record(record: &StringRecord) -> std::result::Result<PositionRecord, FormatError> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    let invalid = |message: String| FormatError::InvalidPositionRow { line, message };

    if record.len() != HEADER.len() {
        return Err(invalid(format!(
            "expected {} columns, found {}",
            HEADER.len(),
            record.len()
        )));
    }

    let coordinate = |column: usize| {
        Decimal::from_str(&record[column])
            .map_err(|e| invalid(format!("{}: {}", HEADER[column], e)))
    };

    Ok(PositionRecord {
        designator: record[0].to_string(),
        x: coordinate(1)?,
        y: coordinate(2)?,
        side: Side::from_code(&record[3])
            .ok_or_else(|| invalid(format!("invalid layer {:?}", &record[3])))?,
        rotation: record[4]
            .parse::<f64>()
            .map_err(|e| invalid(format!("Rotation: {}", e)))?,
    })
}
