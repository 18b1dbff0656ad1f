// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  tests/pipeline.rs - End-to-end position file generation tests.
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

use std::fs;
use std::str::FromStr;

use rust_decimal::Decimal;

use fabpos::board::{Board, Footprint, Layer, Point, Side};
use fabpos::bom::BomEntry;
use fabpos::fab::{FabHouse, ignore_filter, parse_ignore_list};
use fabpos::position::{CollectOptions, PositionData, collect_pos_data};
use fabpos::{Error, FormatError};

const CORRECTIONS: &str = "Footprint,Part,X,Y,Rotation\n\
                           R_0402,.*,0.1,-0.1,0\n\
                           Package_TO_SOT_SMD:SOT-23,.*,0,0,180\n";

fn mm(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn board() -> Board {
    let mut q1 = Footprint::new(
        "Q1",
        "Package_TO_SOT_SMD:SOT-23",
        Point::from_mm(15.0, 20.0),
        -900.0,
    );
    q1.layer = Layer::BackCopper;

    let mut tp1 = Footprint::new(
        "TP1",
        "TestPoint:TestPoint_Pad_D1.0mm",
        Point::default(),
        0.0,
    );
    tp1.is_virtual = true;

    Board::new(
        Point::from_mm(5.0, 5.0),
        vec![
            Footprint::new("U1", "R_0402:Odd_Library", Point::from_mm(15.0, 10.0), 0.0),
            Footprint::new(
                "R10",
                "Resistor_SMD:R_0402_1005Metric",
                Point::from_mm(25.0, 15.0),
                1800.0,
            ),
            q1,
            tp1,
            Footprint::new(
                "C1",
                "Capacitor_SMD:C_0603_1608Metric",
                Point::from_mm(5.0, 5.0),
                450.0,
            ),
        ],
    )
}

fn bom() -> Vec<BomEntry> {
    ["U1", "R10", "Q1", "TP1", "C1"]
        .into_iter()
        .map(|reference| {
            let entry = BomEntry::new().with_field("reference", reference);
            if reference == "C1" {
                entry.with_field("JLCPCB_CORRECTION", "1;2;0")
            } else {
                entry
            }
        })
        .collect()
}

#[test]
fn test_full_pipeline_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let corrections = dir.path().join("corrections.csv");
    let output = dir.path().join("pos.csv");
    fs::write(&corrections, CORRECTIONS).unwrap();

    let bom = bom();
    let options = CollectOptions::new(FabHouse::Jlcpcb.default_correction_fields())
        .bom(&bom)
        .correction_file(&corrections);
    let data = PositionData::collect(&board(), options).unwrap();
    data.write_to_file(&output).unwrap();

    let read = PositionData::from_filename(&output).unwrap();
    let designators: Vec<&str> = read
        .records
        .iter()
        .map(|r| r.designator.as_str())
        .collect();
    assert_eq!(designators, ["C1", "Q1", "R10", "U1"]);
    assert_eq!(read.records.len(), data.records.len());

    let get = |designator: &str| {
        read.records
            .iter()
            .find(|r| r.designator == designator)
            .unwrap()
    };

    // Identifier starts with R_0402: the table rule applies.
    let u1 = get("U1");
    assert_eq!((u1.x, u1.y, u1.rotation), (mm("10.1"), mm("-4.9"), 0.0));

    // R_0402 appears only after the library prefix: no match.
    let r10 = get("R10");
    assert_eq!((r10.x, r10.y, r10.rotation), (mm("20"), mm("-10"), 180.0));

    let q1 = get("Q1");
    assert_eq!(q1.side, Side::Bottom);
    assert_eq!((q1.x, q1.y, q1.rotation), (mm("10"), mm("-15"), 90.0));

    // The BOM correction (1, 2) is rotated by -45 degrees.
    let c1 = get("C1");
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let expected_x = Point::from_mm(1.0 * s + 2.0 * s, 0.0).x;
    let expected_y = Point::from_mm(0.0, -1.0 * s + 2.0 * s).y;
    assert_eq!(c1.x, fabpos::board::to_mm(expected_x));
    assert_eq!(c1.y, fabpos::board::to_mm(-expected_y));
    assert_eq!(c1.rotation, 45.0);
}

#[test]
fn test_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("pos.csv");

    let records = collect_pos_data(
        &board(),
        &["NO_SUCH_FIELD"],
        ignore_filter(parse_ignore_list("C1,U1")),
        None,
        None,
    )
    .unwrap();
    PositionData { records }.write_to_file(&output).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Designator,Mid X,Mid Y,Layer,Rotation\r\n\
         Q1,10,-15,B,270\r\n\
         R10,20,-10,T,180\r\n"
    );
}

#[test]
fn test_bad_correction_file() {
    let dir = tempfile::tempdir().unwrap();
    let corrections = dir.path().join("corrections.csv");
    fs::write(&corrections, "R_0402,.*,0.1,-0.1,0\nC_0603,.*,zero,0,0\n").unwrap();

    let result = PositionData::collect(
        &board(),
        CollectOptions::new(["JLCPCB_CORRECTION"]).correction_file(&corrections),
    );
    assert!(matches!(
        result,
        Err(Error::Format(FormatError::InvalidNumber { line: 2, .. }))
    ));
}

#[test]
fn test_missing_correction_file() {
    let result = PositionData::collect(
        &board(),
        CollectOptions::new(["JLCPCB_CORRECTION"])
            .correction_file("/nonexistent/corrections.csv"),
    );
    assert!(matches!(result, Err(Error::Io(_))));
}
