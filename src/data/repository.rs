//! In-memory store of every loaded ship table and name resolution against it.

use std::collections::BTreeMap;

use tracing::debug;

use crate::data::normalize::NameNormalizer;
use crate::data::ship::{ShipRecord, ShipTable, TableKey};
use crate::data::vocabulary::{HullClass, Level};

/// A resolved ship together with the exact table that contains it.
#[derive(Debug, Clone, Copy)]
pub struct ShipMatch<'a> {
    pub record: &'a ShipRecord,
    pub table: &'a ShipTable,
}

impl<'a> ShipMatch<'a> {
    pub fn name(&self) -> &'a str {
        &self.record.name
    }

    pub fn class(&self) -> HullClass {
        self.table.class()
    }

    pub fn level(&self) -> Level {
        self.table.level()
    }
}

/// Read-only collection of ship tables loaded once at startup.
///
/// Tables are kept in [`TableKey`] order, so a name that appears in several
/// hull classes at the same level always resolves to the same table
/// (DD, CL, CA, BB, CV, SS, AUX, IX).
#[derive(Debug, Default)]
pub struct ShipRepository {
    tables: BTreeMap<TableKey, ShipTable>,
    normalizer: NameNormalizer,
}

impl ShipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the normalizer used for lookups, keeping the loaded tables.
    pub fn set_normalizer(&mut self, normalizer: NameNormalizer) {
        self.normalizer = normalizer;
    }

    /// Add a table, returning the one it replaced under the same key.
    pub fn insert(&mut self, table: ShipTable) -> Option<ShipTable> {
        self.tables.insert(table.key, table)
    }

    pub fn table(&self, key: TableKey) -> Option<&ShipTable> {
        self.tables.get(&key)
    }

    /// All tables in key order.
    pub fn tables(&self) -> impl Iterator<Item = &ShipTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn ship_count(&self) -> usize {
        self.tables.values().map(ShipTable::len).sum()
    }

    /// Resolve `name` among all hull classes at `level`; first match wins.
    pub fn find(&self, name: &str, level: Level) -> Option<ShipMatch<'_>> {
        self.find_where(name, |key| key.level == level)
    }

    /// Resolve `name` in the single table for `class` at `level`.
    pub fn find_in_class(&self, name: &str, class: HullClass, level: Level) -> Option<ShipMatch<'_>> {
        self.find_where(name, |key| key.level == level && key.class == class)
    }

    fn find_where<F>(&self, name: &str, accept: F) -> Option<ShipMatch<'_>>
    where
        F: Fn(&TableKey) -> bool,
    {
        let wanted = self.normalizer.normalize(name);
        if wanted.is_empty() {
            return None;
        }
        let found = self
            .tables
            .values()
            .filter(|table| accept(&table.key))
            .find_map(|table| {
                table
                    .records()
                    .iter()
                    .find(|record| self.normalizer.normalize(&record.name) == wanted)
                    .map(|record| ShipMatch { record, table })
            });
        debug!(query = name, normalized = %wanted, found = found.is_some(), "ship lookup");
        found
    }
}
