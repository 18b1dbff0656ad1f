// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/position.rs - Component position data collection.
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
 * # `position` Module
 *
 * Extracts the placement of every assembled footprint on a board, applying
 * BOM and correction-table compensations.
 *
 * ## Usage Example
 *
 * ```no_run
 * use fabpos::board::Board;
 * use fabpos::bom::BomEntry;
 * use fabpos::position::{CollectOptions, PositionData};
 *
 * fn export(board: &Board, bom: &[BomEntry]) -> Result<(), Box<dyn std::error::Error>> {
 *     let options = CollectOptions::new(["JLCPCB_CORRECTION"])
 *         .bom(bom)
 *         .correction_file("corrections.csv")
 *         .filter(|footprint| !footprint.has_non_smd_pins());
 *
 *     let positions = PositionData::collect(board, options)?;
 *     positions.write_to_file("pos.csv")?;
 *
 *     Ok(())
 * }
 * ```
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::board::{Board, Footprint, Side};
use crate::bom::{Bom, BomEntry};
use crate::compensation;
use crate::correction::CorrectionTable;
use crate::error::{FormatError, Result};
use crate::transform::{
    CoordinateFn, default_footprint_x, default_footprint_y, footprint_orientation,
};

/// Placement of a single component as reported to the fabrication house.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord {
    /// The reference designator (e.g., "R1").
    pub designator: String,
    /// X-coordinate in millimeters.
    pub x: Decimal,
    /// Y-coordinate in millimeters, growing upwards.
    pub y: Decimal,
    pub side: Side,
    /// Rotation in degrees, in `[0, 360)`.
    pub rotation: f64,
}

/// Decides whether a footprint goes into the position data.
pub type Filter<'a> = Box<dyn Fn(&Footprint) -> bool + 'a>;

enum CorrectionSource {
    None,
    File(PathBuf),
    Table(CorrectionTable),
}

/// Parameters of a position data collection run.
pub struct CollectOptions<'a> {
    correction_fields: Vec<String>,
    filter: Filter<'a>,
    bom: Option<&'a [BomEntry]>,
    corrections: CorrectionSource,
    footprint_x: CoordinateFn,
    footprint_y: CoordinateFn,
}

impl<'a> CollectOptions<'a> {
    /// Creates options that read per-component corrections from the first
    /// existing, non-empty field of `correction_fields`.
    pub fn new<I, S>(correction_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            correction_fields: correction_fields.into_iter().map(Into::into).collect(),
            filter: Box::new(|_: &Footprint| true),
            bom: None,
            corrections: CorrectionSource::None,
            footprint_x: default_footprint_x,
            footprint_y: default_footprint_y,
        }
    }

    /// Only footprints accepted by `filter` are collected.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Footprint) -> bool + 'a,
    {
        self.filter = Box::new(filter);
        self
    }

    /// Restricts collection to the components of `bom`, unless it is empty.
    pub fn bom(mut self, bom: &'a [BomEntry]) -> Self {
        self.bom = Some(bom);
        self
    }

    /// Loads correction patterns from `path` when collecting.
    pub fn correction_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.corrections = CorrectionSource::File(path.into());
        self
    }

    /// Uses an already loaded correction table.
    pub fn correction_table(mut self, table: CorrectionTable) -> Self {
        self.corrections = CorrectionSource::Table(table);
        self
    }

    pub fn footprint_x(mut self, f: CoordinateFn) -> Self {
        self.footprint_x = f;
        self
    }

    pub fn footprint_y(mut self, f: CoordinateFn) -> Self {
        self.footprint_y = f;
        self
    }
}

/// Position data of all collected components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionData {
    pub records: Vec<PositionRecord>,
}

impl PositionData {
    /// Collects the position of every non-virtual footprint on `board` that
    /// passes the BOM and filter checks of `options`.
    ///
    /// Any malformed correction aborts the whole run.
    pub fn collect(board: &Board, options: CollectOptions<'_>) -> Result<Self> {
        let table = match options.corrections {
            CorrectionSource::None => CorrectionTable::default(),
            CorrectionSource::File(path) => CorrectionTable::from_filename(path)?,
            CorrectionSource::Table(table) => table,
        };

        let bom = match options.bom {
            Some(entries) => Bom::from_entries(entries)?,
            None => Bom::default(),
        };

        let place_offset = board.aux_origin;
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for footprint in &board.footprints {
            if footprint.is_virtual {
                log::debug!("{}: skipping virtual footprint", footprint.reference);
                continue;
            }
            if !bom.is_empty() && !bom.contains(&footprint.reference) {
                log::debug!("{}: not in BOM, skipping", footprint.reference);
                continue;
            }
            if !(options.filter)(footprint) {
                log::debug!("{}: rejected by filter", footprint.reference);
                continue;
            }

            let compensation = compensation::resolve(
                footprint,
                &bom,
                options.correction_fields.as_slice(),
                &table,
            )?;
            let side = Side::from_footprint(footprint)?;

            if !seen.insert(footprint.reference.as_str()) {
                return Err(FormatError::DuplicateDesignator(footprint.reference.clone()).into());
            }

            records.push(PositionRecord {
                designator: footprint.reference.clone(),
                x: (options.footprint_x)(footprint, place_offset, &compensation)?,
                y: (options.footprint_y)(footprint, place_offset, &compensation)?,
                side,
                rotation: footprint_orientation(footprint, &compensation),
            });
        }

        log::info!(
            "Collected positions of {} out of {} footprints",
            records.len(),
            board.footprints.len()
        );

        Ok(Self { records })
    }

    /// Returns the records sorted by designator.
    pub fn sorted(&self) -> Vec<&PositionRecord> {
        let mut records: Vec<&PositionRecord> = self.records.iter().collect();
        records.sort_by(|a, b| a.designator.cmp(&b.designator));
        records
    }
}

/// Collects position data with the default coordinate mapping.
///
/// `bom` and `correction_file` are optional; an absent or empty BOM keeps
/// every non-virtual footprint accepted by `filter`.
pub fn collect_pos_data<S, F>(
    board: &Board,
    correction_fields: &[S],
    filter: F,
    bom: Option<&[BomEntry]>,
    correction_file: Option<&Path>,
) -> Result<Vec<PositionRecord>>
where
    S: AsRef<str>,
    F: Fn(&Footprint) -> bool,
{
    let mut options = CollectOptions::new(correction_fields.iter().map(|f| f.as_ref()))
        .filter(filter);
    if let Some(bom) = bom {
        options = options.bom(bom);
    }
    if let Some(path) = correction_file {
        options = options.correction_file(path);
    }
    Ok(PositionData::collect(board, options)?.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Layer, Point};
    use crate::bom::REFERENCE_FIELD;
    use crate::error::Error;
    use crate::transform::footprint_position;

    fn mm(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn board() -> Board {
        let mut fiducial = Footprint::new(
            "FID1",
            "Fiducial:Fiducial_1mm",
            Point::from_mm(1.0, 1.0),
            0.0,
        );
        fiducial.is_virtual = true;

        let mut c1 = Footprint::new(
            "C1",
            "Capacitor_SMD:C_0603_1608Metric",
            Point::from_mm(20.0, 10.0),
            900.0,
        );
        c1.layer = Layer::BackCopper;

        Board::new(
            Point::from_mm(10.0, 5.0),
            vec![
                Footprint::new(
                    "R1",
                    "Resistor_SMD:R_0402_1005Metric",
                    Point::from_mm(20.0, 10.0),
                    0.0,
                ),
                c1,
                fiducial,
            ],
        )
    }

    fn entry(reference: &str) -> BomEntry {
        BomEntry::new().with_field(REFERENCE_FIELD, reference)
    }

    fn find<'a>(records: &'a [PositionRecord], designator: &str) -> &'a PositionRecord {
        records
            .iter()
            .find(|r| r.designator == designator)
            .unwrap()
    }

    #[test]
    fn test_collect_without_bom() {
        let data = PositionData::collect(&board(), CollectOptions::new(["CORRECTION"])).unwrap();
        assert_eq!(data.records.len(), 2);

        let r1 = find(&data.records, "R1");
        assert_eq!((r1.x, r1.y), (mm("10"), mm("-5")));
        assert_eq!(r1.side, Side::Top);
        assert_eq!(r1.rotation, 0.0);

        let c1 = find(&data.records, "C1");
        assert_eq!(c1.side, Side::Bottom);
        assert_eq!(c1.rotation, 90.0);
    }

    #[test]
    fn test_bom_restricts_and_corrects() {
        let bom = vec![entry("C1").with_field("CORRECTION", "1;0;-90"), entry("FID1")];
        let data = PositionData::collect(&board(), CollectOptions::new(["CORRECTION"]).bom(&bom))
            .unwrap();

        // R1 is not in the BOM, FID1 is virtual.
        assert_eq!(data.records.len(), 1);
        let c1 = &data.records[0];
        assert_eq!(c1.designator, "C1");
        // (1, 0) rotated by -90 degrees is (0, -1).
        assert_eq!((c1.x, c1.y), (mm("10"), mm("-4")));
        assert_eq!(c1.rotation, 0.0);
    }

    #[test]
    fn test_empty_bom_keeps_everything() {
        let bom: Vec<BomEntry> = Vec::new();
        let data = PositionData::collect(&board(), CollectOptions::new(["CORRECTION"]).bom(&bom))
            .unwrap();
        assert_eq!(data.records.len(), 2);
    }

    #[test]
    fn test_filter() {
        let data = PositionData::collect(
            &board(),
            CollectOptions::new(["CORRECTION"]).filter(|fp| fp.reference != "R1"),
        )
        .unwrap();
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].designator, "C1");
    }

    #[test]
    fn test_correction_table() {
        let table = CorrectionTable::from_bytes(b"Resistor_SMD:,.*,0.5,0,180\n").unwrap();
        let bom = vec![entry("R1").with_field("CORRECTION", "0;1;0"), entry("C1")];

        let data = PositionData::collect(
            &board(),
            CollectOptions::new(["CORRECTION"]).correction_table(table.clone()),
        )
        .unwrap();
        let r1 = find(&data.records, "R1");
        assert_eq!((r1.x, r1.y, r1.rotation), (mm("10.5"), mm("-5"), 180.0));

        // The BOM field takes precedence over the table.
        let data = PositionData::collect(
            &board(),
            CollectOptions::new(["CORRECTION"])
                .bom(&bom)
                .correction_table(table),
        )
        .unwrap();
        let r1 = find(&data.records, "R1");
        assert_eq!((r1.x, r1.y, r1.rotation), (mm("10"), mm("-6"), 0.0));
    }

    #[test]
    fn test_invalid_layer() {
        let mut board = board();
        board.footprints[0].layer = Layer::from_name("In2.Cu");
        assert!(matches!(
            PositionData::collect(&board, CollectOptions::new(["CORRECTION"])),
            Err(Error::InvalidLayer { .. })
        ));
    }

    #[test]
    fn test_malformed_correction_aborts() {
        let bom = vec![entry("R1").with_field("CORRECTION", "1;2"), entry("C1")];
        assert!(matches!(
            PositionData::collect(&board(), CollectOptions::new(["CORRECTION"]).bom(&bom)),
            Err(Error::Format(FormatError::InvalidCompensation { .. }))
        ));
    }

    #[test]
    fn test_duplicate_designator() {
        let mut board = board();
        let copy = board.footprints[0].clone();
        board.footprints.push(copy);
        assert!(matches!(
            PositionData::collect(&board, CollectOptions::new(["CORRECTION"])),
            Err(Error::Format(FormatError::DuplicateDesignator(_)))
        ));
    }

    #[test]
    fn test_custom_x_mapping() {
        fn mirrored_x(
            fp: &Footprint,
            offset: Point,
            comp: &compensation::Compensation,
        ) -> Result<Decimal> {
            let x = crate::board::to_mm(footprint_position(fp, offset, comp)?.x);
            Ok(match fp.layer {
                Layer::BackCopper => -x,
                _ => x,
            })
        }

        let data = PositionData::collect(
            &board(),
            CollectOptions::new(["CORRECTION"]).footprint_x(mirrored_x),
        )
        .unwrap();
        assert_eq!(find(&data.records, "C1").x, mm("-10"));
        assert_eq!(find(&data.records, "R1").x, mm("10"));
    }

    #[test]
    fn test_huge_bom_correction_is_rejected() {
        let bom = vec![
            entry("R1").with_field("CORRECTION", "1e300;0;0"),
            entry("C1"),
        ];
        match PositionData::collect(&board(), CollectOptions::new(["CORRECTION"]).bom(&bom)) {
            Err(Error::Format(FormatError::InvalidCompensation { reference, value })) => {
                assert_eq!(reference, "R1");
                assert_eq!(value, "1e300;0;0");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_position_overflow_is_reported() {
        let mut board = board();
        board.footprints[0].position = Point::new(i64::MIN, 0);
        match PositionData::collect(&board, CollectOptions::new(["CORRECTION"])) {
            Err(Error::CoordinateOverflow { reference }) => assert_eq!(reference, "R1"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_collect_pos_data() {
        let bom = vec![entry("R1"), entry("C1")];
        let records =
            collect_pos_data(&board(), &["CORRECTION"], |_| true, Some(bom.as_slice()), None)
                .unwrap();
        assert_eq!(records.len(), 2);
    }
}
