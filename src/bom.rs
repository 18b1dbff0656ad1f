// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/bom.rs - Bill of materials field lookup.
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

use std::collections::HashMap;

use crate::error::{FormatError, Result};

/// Name of the field holding the reference designator.
pub const REFERENCE_FIELD: &str = "reference";

/// A single BOM component: arbitrary named string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BomEntry {
    fields: HashMap<String, String>,
}

impl BomEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, returning the entry for chaining.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn reference(&self) -> Option<&str> {
        self.field(REFERENCE_FIELD)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BomEntry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Returns the value of the first field in `names` that exists on `entry` and
/// is not empty.
///
/// Only the exact empty string counts as empty; whitespace is a value.
pub fn first_field<'a, S: AsRef<str>>(entry: &'a BomEntry, names: &[S]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| entry.field(name.as_ref()))
        .find(|value| !value.is_empty())
}

/// BOM entries indexed by reference designator.
#[derive(Debug, Clone, Default)]
pub struct Bom {
    entries: HashMap<String, BomEntry>,
}

impl Bom {
    /// Indexes `entries` by their `reference` field.
    ///
    /// If a reference appears more than once, the last entry wins.
    pub fn from_entries(entries: &[BomEntry]) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let reference = entry
                .reference()
                .ok_or(FormatError::MissingReference { index: i })?;
            if index.insert(reference.to_string(), entry.clone()).is_some() {
                log::warn!(
                    "Duplicate BOM reference {}, keeping the last entry",
                    reference
                );
            }
        }
        Ok(Self { entries: index })
    }

    pub fn get(&self, reference: &str) -> Option<&BomEntry> {
        self.entries.get(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
