//! Ship data: one stat row per ship and the per-class, per-level tables that hold them.
//! Tables are built by the loader once at startup and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use crate::data::vocabulary::{Attribute, HullClass, Level, Rarity, ATTRIBUTE_COUNT};
use crate::error::{Result, StatsError};

/// Numeric stats of a ship; any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatLine {
    values: [Option<f64>; ATTRIBUTE_COUNT],
}

impl StatLine {
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.values[attribute.index()]
    }

    pub fn set(&mut self, attribute: Attribute, value: Option<f64>) {
        self.values[attribute.index()] = value;
    }

    pub fn with(mut self, attribute: Attribute, value: f64) -> Self {
        self.set(attribute, Some(value));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipRecord {
    /// Name as authored in the source table, accents and markers included.
    pub name: String,
    pub rarity: Rarity,
    /// Contents of the `Type` column (e.g. "Battlecruiser").
    pub hull_type: String,
    pub stats: StatLine,
}

impl ShipRecord {
    pub fn new(name: impl Into<String>, rarity: Rarity, hull_type: impl Into<String>) -> Self {
        ShipRecord {
            name: name.into(),
            rarity,
            hull_type: hull_type.into(),
            stats: StatLine::default(),
        }
    }

    pub fn with_stat(mut self, attribute: Attribute, value: f64) -> Self {
        self.stats.set(attribute, Some(value));
        self
    }

    pub fn stat(&self, attribute: Attribute) -> Option<f64> {
        self.stats.get(attribute)
    }
}

/// Identifies a table: `<Shorthand>_Level_<N>`, e.g. `BB_Level_125`.
///
/// Ordered by level first, then by hull class in declaration order; this is
/// the order in which the repository searches tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableKey {
    pub level: Level,
    pub class: HullClass,
}

impl TableKey {
    pub fn new(class: HullClass, level: Level) -> Self {
        TableKey { level, class }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_Level_{}", self.class.shorthand(), self.level)
    }
}

impl FromStr for TableKey {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || StatsError::InvalidTableKey(s.to_string());
        let (class, level) = s.split_once('_').ok_or_else(invalid)?;
        let class = class.parse::<HullClass>().map_err(|_| invalid())?;
        if !level.to_ascii_lowercase().starts_with("level_") {
            return Err(invalid());
        }
        let level = level.parse::<Level>().map_err(|_| invalid())?;
        Ok(TableKey { level, class })
    }
}

/// All ships of one hull class at one level, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipTable {
    pub key: TableKey,
    columns: Vec<Attribute>,
    records: Vec<ShipRecord>,
}

impl ShipTable {
    /// `columns` lists the stat attributes present in the source header.
    pub fn new(key: TableKey, columns: Vec<Attribute>, records: Vec<ShipRecord>) -> Self {
        ShipTable {
            key,
            columns,
            records,
        }
    }

    /// Table carrying every stat column; convenient for building fixtures.
    pub fn with_all_columns(key: TableKey, records: Vec<ShipRecord>) -> Self {
        Self::new(key, Attribute::ALL.to_vec(), records)
    }

    pub fn class(&self) -> HullClass {
        self.key.class
    }

    pub fn level(&self) -> Level {
        self.key.level
    }

    pub fn records(&self) -> &[ShipRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[Attribute] {
        &self.columns
    }

    pub fn has_column(&self, attribute: Attribute) -> bool {
        self.columns.contains(&attribute)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Present values of `attribute` across the table, in record order.
    pub fn values(&self, attribute: Attribute) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| record.stat(attribute))
            .collect()
    }
}
