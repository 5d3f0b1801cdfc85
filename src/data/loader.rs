//! Load per-class, per-level ship tables from a directory of CSV files named
//! `<Shorthand>_Level_<N>.csv`. Malformed rows and files are skipped and
//! reported; only a missing or empty directory is fatal.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::data::normalize::NameNormalizer;
use crate::data::repository::ShipRepository;
use crate::data::ship::{ShipRecord, ShipTable, TableKey};
use crate::data::validate::{ValidationReport, ValidationSeverity};
use crate::data::vocabulary::{fold_token, Attribute, Rarity};
use crate::error::{Result, StatsError};

/// Folder the scraper writes to.
pub const DEFAULT_DATA_DIR: &str = "ship_stats_data";

const NAME_HEADERS: &[&str] = &["shipname", "name"];
const RARITY_HEADERS: &[&str] = &["rarity"];
const TYPE_HEADERS: &[&str] = &["type", "hulltype"];
const MISSING_MARKERS: &[&str] = &["", "-", "—", "?", "n/a"];

#[derive(Debug)]
pub struct LoadedData {
    pub repository: ShipRepository,
    pub report: ValidationReport,
}

/// Column positions resolved from a table header by name.
struct ColumnMap {
    name: usize,
    rarity: usize,
    hull_type: Option<usize>,
    stats: Vec<(Attribute, usize)>,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> std::result::Result<Self, String> {
        fn find(header: &StringRecord, names: &[&str]) -> Option<usize> {
            header
                .iter()
                .position(|cell| names.contains(&fold_token(cell).as_str()))
        }

        let name = find(header, NAME_HEADERS).ok_or("missing 'Ship Name' column")?;
        let rarity = find(header, RARITY_HEADERS).ok_or("missing 'Rarity' column")?;
        let hull_type = find(header, TYPE_HEADERS);

        let mut stats: Vec<(Attribute, usize)> = Vec::new();
        for (index, cell) in header.iter().enumerate() {
            if let Some(attribute) = Attribute::lookup(cell) {
                if !stats.iter().any(|(seen, _)| *seen == attribute) {
                    stats.push((attribute, index));
                }
            }
        }

        Ok(ColumnMap {
            name,
            rarity,
            hull_type,
            stats,
        })
    }

    fn attributes(&self) -> Vec<Attribute> {
        self.stats.iter().map(|(attribute, _)| *attribute).collect()
    }
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).map(str::trim).unwrap_or("")
}

/// Parse a stat cell. Placeholders and non-numeric text are missing values.
fn parse_stat(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if MISSING_MARKERS.iter().any(|m| trimmed.eq_ignore_ascii_case(m)) {
        return None;
    }
    trimmed.replace(',', "").parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read one table from CSV content. Returns `Ok(None)` when the header lacks
/// the required columns; the reason is pushed onto `report`. Rows whose names
/// collide under `normalizer` are kept and reported.
pub fn read_table<R: io::Read>(
    key: TableKey,
    source: R,
    context: &str,
    normalizer: &NameNormalizer,
    report: &mut ValidationReport,
) -> std::result::Result<Option<ShipTable>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let header = reader.headers()?.clone();
    let columns = match ColumnMap::from_header(&header) {
        Ok(columns) => columns,
        Err(reason) => {
            warn!(table = %key, %reason, "skipping table");
            report.push(ValidationSeverity::Error, context, reason);
            return Ok(None);
        }
    };

    let mut seen_names: HashMap<String, String> = HashMap::new();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(err) if !err.is_io_error() => {
                let line = err.position().map_or(0, |pos| pos.line());
                warn!(table = %key, line, error = %err, "skipping unreadable row");
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context} line {line}"),
                    format!("unreadable row: {err}"),
                );
                continue;
            }
            Err(err) => return Err(err),
        };
        let line = row.position().map_or(0, |pos| pos.line());
        let row_context = format!("{context} line {line}");

        let name = cell(&row, columns.name);
        if name.is_empty() {
            warn!(table = %key, line, "skipping row without a ship name");
            report.push(ValidationSeverity::Warning, row_context, "row has no ship name");
            continue;
        }
        let Some(rarity) = Rarity::parse(cell(&row, columns.rarity)) else {
            warn!(table = %key, line, ship = name, "skipping row with unknown rarity");
            report.push(
                ValidationSeverity::Warning,
                row_context,
                format!("unknown rarity '{}' for '{name}'", cell(&row, columns.rarity)),
            );
            continue;
        };
        let hull_type = columns
            .hull_type
            .map(|index| cell(&row, index))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| key.class.display_name());

        let mut record = ShipRecord::new(name, rarity, hull_type);
        for (attribute, index) in &columns.stats {
            record.stats.set(*attribute, parse_stat(cell(&row, *index)));
        }

        if let Some(previous) = seen_names.insert(normalizer.normalize(name), name.to_string()) {
            warn!(table = %key, line, ship = name, previous = %previous, "duplicate lookup name");
            report.push(
                ValidationSeverity::Warning,
                row_context,
                format!("'{name}' has the same lookup name as '{previous}'; the first row wins"),
            );
        }
        records.push(record);
    }

    debug!(table = %key, records = records.len(), "read table");
    Ok(Some(ShipTable::new(key, columns.attributes(), records)))
}

/// Load a single `<key>.csv` file.
pub fn load_table_file(
    path: &Path,
    key: TableKey,
    normalizer: &NameNormalizer,
    report: &mut ValidationReport,
) -> Result<Option<ShipTable>> {
    let file = fs::File::open(path).map_err(|source| StatsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let context = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| key.to_string());
    read_table(key, file, &context, normalizer, report).map_err(|source| StatsError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every recognised table in `dir`.
///
/// Files are visited in name order. Non-CSV files and CSV files whose stem is
/// not a table key are noted and ignored. A file that cannot be read at all
/// is reported as an error and skipped. The returned repository resolves
/// names with `normalizer`.
pub fn load_data_dir(dir: &Path, normalizer: &NameNormalizer) -> Result<LoadedData> {
    if !dir.is_dir() {
        return Err(StatsError::DataDirMissing(dir.to_path_buf()));
    }

    let io_err = |source| StatsError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::result::Result<_, _>>()
        .map_err(io_err)?;
    paths.sort();

    let mut report = ValidationReport::default();
    let mut repository = ShipRepository::new();
    repository.set_normalizer(normalizer.clone());

    for path in paths.iter().filter(|p| p.is_file()) {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_csv = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Ok(key) = stem.parse::<TableKey>() else {
            report.push(
                ValidationSeverity::Info,
                file_name,
                "file name is not <Class>_Level_<N>.csv; ignored",
            );
            continue;
        };

        match load_table_file(path, key, normalizer, &mut report) {
            Ok(Some(table)) => {
                if table.is_empty() {
                    report.push(ValidationSeverity::Warning, file_name.as_str(), "table has no ship rows");
                }
                if let Some(replaced) = repository.insert(table) {
                    warn!(table = %key, file = %file_name, "duplicate table file");
                    report.push(
                        ValidationSeverity::Warning,
                        file_name,
                        format!("duplicate table {key}; replaced {} earlier rows", replaced.len()),
                    );
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping table file");
                report.push(ValidationSeverity::Error, file_name, err.to_string());
            }
        }
    }

    if repository.is_empty() {
        return Err(StatsError::DataDirEmpty(dir.to_path_buf()));
    }

    info!(
        dir = %dir.display(),
        tables = repository.len(),
        ships = repository.ship_count(),
        warnings = report.count(ValidationSeverity::Warning),
        errors = report.count(ValidationSeverity::Error),
        "loaded ship tables"
    );
    Ok(LoadedData { repository, report })
}

#[cfg(test)]
mod tests {
    use super::parse_stat;

    #[test]
    fn stat_cells_with_placeholders_are_missing() {
        assert_eq!(parse_stat(""), None);
        assert_eq!(parse_stat(" - "), None);
        assert_eq!(parse_stat("N/A"), None);
        assert_eq!(parse_stat("abc"), None);
        assert_eq!(parse_stat("1,234"), Some(1234.0));
        assert_eq!(parse_stat(" 42.5 "), Some(42.5));
    }
}
