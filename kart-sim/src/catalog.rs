// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Part catalog
//!
//! Parts are described by a flat CSV table, one row per part. Fields are
//! separated by plain commas and never quoted; multi-valued fields such as
//! `allowed_mounts` use `;` inside a single column.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Catalog shipped with the crate
pub const BUNDLED_CATALOG_CSV: &str = include_str!("../assets/parts_catalog.csv");

/// Columns every catalog must provide
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "name",
    "category",
    "length_blocks",
    "width_blocks",
    "height_blocks",
    "mass",
    "drag_coeff",
    "grip_coeff",
    "durability",
    "allowed_mounts",
    "notes",
];

/// Errors raised while parsing a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The input had no header row
    #[error("parts CSV is empty")]
    Empty,

    /// A required column is absent from the header
    #[error("missing column {0} in parts CSV")]
    MissingColumn(&'static str),

    /// A numeric field did not parse
    #[error("line {line}: column {column} has non-numeric value {value:?}")]
    BadNumber {
        /// 1-based line number
        line: usize,
        /// Column name
        column: &'static str,
        /// Raw field text
        value: String,
    },

    /// The category column holds an unknown value
    #[error("line {line}: unknown part category {value:?}")]
    UnknownCategory {
        /// 1-based line number
        line: usize,
        /// Raw field text
        value: String,
    },
}

/// Functional group of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartCategory {
    /// Structural blocks, beams and plates
    Chassis,
    /// Rolling wheels
    Wheel,
    /// Wings, fins and floors
    Aero,
    /// Bolt-on protection
    Armor,
    /// Motors and axle housings
    Drive,
    /// Dense dead weight
    Ballast,
    /// Braces, hinges and dampers
    Suspension,
    /// Everything else
    Utility,
}

impl PartCategory {
    /// Every category
    pub const ALL: [PartCategory; 8] = [
        PartCategory::Chassis,
        PartCategory::Wheel,
        PartCategory::Aero,
        PartCategory::Armor,
        PartCategory::Drive,
        PartCategory::Ballast,
        PartCategory::Suspension,
        PartCategory::Utility,
    ];

    /// Name as it appears in the CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            PartCategory::Chassis => "chassis",
            PartCategory::Wheel => "wheel",
            PartCategory::Aero => "aero",
            PartCategory::Armor => "armor",
            PartCategory::Drive => "drive",
            PartCategory::Ballast => "ballast",
            PartCategory::Suspension => "suspension",
            PartCategory::Utility => "utility",
        }
    }
}

impl fmt::Display for PartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| s.to_owned())
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Unique display name, used by blueprints to reference the part
    pub name: String,
    /// Functional group
    pub category: PartCategory,
    /// Extent along z, in blocks
    pub length_blocks: f64,
    /// Extent along x, in blocks
    pub width_blocks: f64,
    /// Extent along y, in blocks
    pub height_blocks: f64,
    /// Mass contribution
    pub mass: f64,
    /// Drag contribution
    pub drag_coeff: f64,
    /// Grip coefficient, meaningful for wheels
    pub grip_coeff: f64,
    /// Nominal durability
    pub durability: f64,
    /// `;`-separated mount tags
    pub allowed_mounts: String,
    /// Free-form description
    pub notes: String,
}

impl Part {
    /// Mount tags the part may attach to
    pub fn mounts(&self) -> Vec<&str> {
        self.allowed_mounts
            .split(';')
            .map(str::trim)
            .filter(|mount| !mount.is_empty())
            .collect()
    }

    /// Footprint seen from above
    pub fn projected_area(&self) -> f64 {
        self.length_blocks * self.width_blocks
    }
}

/// Name → part resolution used by vehicle assembly
pub trait PartLookup {
    /// Resolve a part by its exact name
    fn find_part(&self, name: &str) -> Option<&Part>;
}

/// Parsed part table with lookups by name and category
#[derive(Debug, Clone, Default)]
pub struct PartCatalog {
    parts: Vec<Part>,
    by_name: HashMap<String, usize>,
}

impl PartCatalog {
    /// Build a catalog from already parsed parts
    ///
    /// When two parts share a name, the later one wins lookups.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        let by_name = parts
            .iter()
            .enumerate()
            .map(|(index, part)| (part.name.clone(), index))
            .collect();
        PartCatalog { parts, by_name }
    }

    /// Parse a catalog from CSV text
    pub fn parse_csv(csv: &str) -> Result<Self, CatalogError> {
        parse_parts_csv(csv).map(Self::from_parts)
    }

    /// The catalog bundled with the crate
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::parse_csv(BUNDLED_CATALOG_CSV)
    }

    /// Look up a part by name
    pub fn get(&self, name: &str) -> Option<&Part> {
        self.by_name.get(name).map(|&index| &self.parts[index])
    }

    /// Parts of a category, sorted by name
    pub fn by_category(&self, category: PartCategory) -> Vec<&Part> {
        let mut bucket: Vec<&Part> = self
            .parts
            .iter()
            .filter(|part| part.category == category)
            .collect();
        bucket.sort_by(|a, b| a.name.cmp(&b.name));
        bucket
    }

    /// All parts in file order
    pub fn iter(&self) -> impl Iterator<Item = &Part> + '_ {
        self.parts.iter()
    }

    /// Number of parsed records
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the catalog has no records
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl PartLookup for PartCatalog {
    fn find_part(&self, name: &str) -> Option<&Part> {
        self.get(name)
    }
}

/// Parse CSV text into parts, in file order
///
/// Blank lines are skipped. Missing trailing fields read as empty, which is
/// fine for the text columns and an error for the numeric ones.
pub fn parse_parts_csv(csv: &str) -> Result<Vec<Part>, CatalogError> {
    let mut lines = csv.trim().lines().enumerate();
    let (_, header_line) = lines.next().ok_or(CatalogError::Empty)?;
    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();

    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, required) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| *header == required)
            .ok_or(CatalogError::MissingColumn(required))?;
    }
    let [name, category, length, width, height, mass, drag, grip, durability, mounts, notes] =
        columns;

    let mut records = Vec::new();
    for (index, row) in lines {
        if row.trim().is_empty() {
            continue;
        }
        let line = index + 1;
        let values: Vec<&str> = row.split(',').collect();
        let text = |column: usize| values.get(column).map_or("", |value| value.trim());
        let number = |column: usize, label: &'static str| -> Result<f64, CatalogError> {
            let raw = text(column);
            raw.parse::<f64>().map_err(|_| CatalogError::BadNumber {
                line,
                column: label,
                value: raw.to_owned(),
            })
        };

        let category = text(category)
            .parse::<PartCategory>()
            .map_err(|value| CatalogError::UnknownCategory { line, value })?;

        records.push(Part {
            name: text(name).to_owned(),
            category,
            length_blocks: number(length, "length_blocks")?,
            width_blocks: number(width, "width_blocks")?,
            height_blocks: number(height, "height_blocks")?,
            mass: number(mass, "mass")?,
            drag_coeff: number(drag, "drag_coeff")?,
            grip_coeff: number(grip, "grip_coeff")?,
            durability: number(durability, "durability")?,
            allowed_mounts: text(mounts).to_owned(),
            notes: text(notes).to_owned(),
        });
    }

    log::debug!("parsed {} catalog parts", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,category,length_blocks,width_blocks,height_blocks,mass,drag_coeff,grip_coeff,durability,allowed_mounts,notes";

    #[test]
    fn test_parse_minimal() {
        let csv = format!(
            "{HEADER}\nTiny Wheel,wheel,1,1,1,2,0.01,0.8,20,axle,Tiny\n\nFin,aero,1,2,0.5,1,0.03,0,15,front;rear,Fin\n"
        );
        let catalog = PartCatalog::parse_csv(&csv).unwrap();
        assert_eq!(catalog.len(), 2);

        let fin = catalog.get("Fin").unwrap();
        assert_eq!(fin.category, PartCategory::Aero);
        assert_eq!(fin.mounts(), vec!["front", "rear"]);
        assert_eq!(fin.projected_area(), 2.0);
    }

    #[test]
    fn test_column_order_is_free() {
        let csv = "notes,allowed_mounts,durability,grip_coeff,drag_coeff,mass,height_blocks,width_blocks,length_blocks,category,name\n\
                   Heavy,center,100,0,0,15,1,1,1,ballast,Lump\n";
        let catalog = PartCatalog::parse_csv(csv).unwrap();
        let lump = catalog.get("Lump").unwrap();
        assert_eq!(lump.category, PartCategory::Ballast);
        assert_eq!(lump.mass, 15.0);
        assert_eq!(lump.notes, "Heavy");
    }

    #[test]
    fn test_missing_column() {
        let csv = "name,category,mass\nA,wheel,1\n";
        let err = PartCatalog::parse_csv(csv).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn("length_blocks")));
    }

    #[test]
    fn test_bad_number_and_category() {
        let csv = format!("{HEADER}\nA,wheel,x,1,1,1,0,0,0,axle,\n");
        let err = PartCatalog::parse_csv(&csv).unwrap_err();
        assert!(matches!(err, CatalogError::BadNumber { line: 2, column: "length_blocks", .. }));

        let csv = format!("{HEADER}\nA,hovercraft,1,1,1,1,0,0,0,axle,\n");
        let err = PartCatalog::parse_csv(&csv).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCategory { line: 2, .. }));
        assert!(err.to_string().contains("hovercraft"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(PartCatalog::parse_csv("   \n"), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_bundled_catalog() {
        let catalog = PartCatalog::bundled().unwrap();
        assert!(catalog.len() > 10);

        let wheel = catalog.get("Medium Wheel 2.0x").unwrap();
        assert_eq!(wheel.category, PartCategory::Wheel);
        assert!(wheel.mass > 1.0);

        let ballast = catalog.find_part("Ballast Cube 1x1x1 (dense)").unwrap();
        assert_eq!(ballast.category, PartCategory::Ballast);

        let aero = catalog.by_category(PartCategory::Aero);
        assert!(aero.len() > 3);
        assert!(aero.windows(2).all(|pair| pair[0].name <= pair[1].name));
    }

    #[test]
    fn test_category_round_trip() {
        for category in PartCategory::ALL {
            assert_eq!(category.as_str().parse::<PartCategory>(), Ok(category));
        }
    }
}
