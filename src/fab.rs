// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/fab.rs - Fabrication house presets and option parsing.
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

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::board::Footprint;

/// A supported fabrication house.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FabHouse {
    Jlcpcb,
    Pcbway,
}

impl FabHouse {
    /// BOM fields consulted for per-component corrections when the user does
    /// not name any.
    pub fn default_correction_fields(&self) -> Vec<String> {
        let field = match self {
            FabHouse::Jlcpcb => "JLCPCB_CORRECTION",
            FabHouse::Pcbway => "PCBWAY_CORRECTION",
        };
        vec![field.to_string()]
    }
}

impl fmt::Display for FabHouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FabHouse::Jlcpcb => f.write_str("jlcpcb"),
            FabHouse::Pcbway => f.write_str("pcbway"),
        }
    }
}

impl FromStr for FabHouse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jlcpcb" => Ok(FabHouse::Jlcpcb),
            "pcbway" => Ok(FabHouse::Pcbway),
            _ => Err(format!("Unknown fabrication house {:?}", s)),
        }
    }
}

/// Splits a comma-separated list of field names, dropping blanks.
pub fn parse_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Splits a comma-separated list of designators to leave out of assembly.
pub fn parse_ignore_list(list: &str) -> HashSet<String> {
    parse_field_list(list).into_iter().collect()
}

/// Returns a collection filter that drops the `ignored` designators.
pub fn ignore_filter(ignored: HashSet<String>) -> impl Fn(&Footprint) -> bool {
    move |footprint: &Footprint| !ignored.contains(&footprint.reference)
}
