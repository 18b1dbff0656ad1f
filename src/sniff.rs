// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/sniff.rs - CSV dialect and header detection.
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
 * # `sniff` Module
 *
 * Guesses the delimiter of a hand-written CSV file and whether its first row
 * is a header, from a short sample at the start of the file.
 */

use csv::StringRecord;

/// Number of bytes inspected at the start of a file.
pub const SAMPLE_SIZE: usize = 1024;

/// Delimiters tried, in order of preference.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Maximum number of data rows consulted when looking for a header.
const HEADER_CHECK_ROWS: usize = 20;

/// The detected shape of a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub has_header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Numeric,
    Text(usize),
}

impl CellKind {
    fn of(cell: &str) -> Self {
        if cell.trim().parse::<f64>().is_ok() {
            CellKind::Numeric
        } else {
            CellKind::Text(cell.chars().count())
        }
    }
}

/// Inspects the start of `data` and returns its dialect.
pub fn sniff(data: &[u8]) -> Dialect {
    let sample = sample(data);
    let delimiter = sniff_delimiter(sample);
    let has_header = sniff_header(sample, delimiter);

    log::debug!(
        "Sniffed CSV dialect: delimiter {:?}, header {}",
        delimiter as char,
        has_header
    );

    Dialect {
        delimiter,
        has_header,
    }
}

/// Takes at most [SAMPLE_SIZE] bytes, dropping a trailing partial line.
fn sample(data: &[u8]) -> &[u8] {
    if data.len() <= SAMPLE_SIZE {
        return data;
    }
    let head = &data[..SAMPLE_SIZE];
    match head.iter().rposition(|&b| b == b'\n') {
        Some(end) => &head[..=end],
        None => head,
    }
}

fn records(sample: &[u8], delimiter: u8) -> Vec<StringRecord> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(sample)
        .records()
        .filter_map(|r| r.ok())
        .collect()
}

fn sniff_delimiter(sample: &[u8]) -> u8 {
    for delimiter in DELIMITERS {
        let rows = records(sample, delimiter);
        let Some(first) = rows.first() else {
            continue;
        };
        let width = first.len();
        if width > 1 && rows.iter().all(|row| row.len() == width) {
            return delimiter;
        }
    }
    DELIMITERS[0]
}

/// Votes column by column on whether the first row differs in kind from the
/// rows below it.
fn sniff_header(sample: &[u8], delimiter: u8) -> bool {
    let rows = records(sample, delimiter);
    let Some((header, data)) = rows.split_first() else {
        return false;
    };

    let mut columns: Vec<Option<CellKind>> = vec![None; header.len()];
    let mut consistent = vec![true; header.len()];

    for row in data.iter().take(HEADER_CHECK_ROWS) {
        if row.len() != header.len() {
            continue;
        }
        for (i, cell) in row.iter().enumerate() {
            let kind = CellKind::of(cell);
            match columns[i] {
                None => columns[i] = Some(kind),
                Some(seen) if seen != kind => consistent[i] = false,
                Some(_) => (),
            }
        }
    }

    let mut votes = 0i32;
    for (i, column) in columns.iter().enumerate() {
        if !consistent[i] {
            continue;
        }
        let Some(kind) = column else {
            continue;
        };
        let header_kind = CellKind::of(&header[i]);
        match kind {
            CellKind::Numeric => {
                if header_kind == CellKind::Numeric {
                    votes -= 1;
                } else {
                    votes += 1;
                }
            }
            CellKind::Text(_) => {
                if header_kind == *kind {
                    votes -= 1;
                } else {
                    votes += 1;
                }
            }
        }
    }

    votes > 0
}
