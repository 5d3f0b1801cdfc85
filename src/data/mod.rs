//! Ship tables: vocabulary, name normalization, CSV loading and lookup.

pub mod loader;
pub mod normalize;
pub mod repository;
pub mod ship;
pub mod validate;
pub mod vocabulary;

pub use loader::{load_data_dir, LoadedData, DEFAULT_DATA_DIR};
pub use normalize::{normalize, NameNormalizer};
pub use repository::{ShipMatch, ShipRepository};
pub use ship::{ShipRecord, ShipTable, StatLine, TableKey};
pub use vocabulary::{parse_attribute_list, Attribute, HullClass, Level, Policy, Rarity};
