//! Dataset loading - read the registry CSV into records.
//!
//! CHANGELOG:
//! - 10/16/2026 - Explicit header detection instead of per-row column fallback
//! - 10/14/2026 - Initial CSV loader

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::matching::Record;

/// Errors that abort a dataset load.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unrecognized header {found:?}: expected `ID`/`Full Name` or `id`/`name` columns")]
    UnrecognizedHeader { found: Vec<String> },

    #[error("Invalid id {value:?} on row {row}")]
    InvalidId { row: usize, value: String },

    #[error("Duplicate id {id} on row {row}")]
    DuplicateId { row: usize, id: u64 },

    #[error("Empty name for id {id} on row {row}")]
    EmptyName { row: usize, id: u64 },
}

/// Recognized header naming conventions, in lookup order.
const SCHEMAS: &[(&str, &str)] = &[("ID", "Full Name"), ("id", "name")];

/// Column positions resolved once from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub id: usize,
    pub name: usize,
}

impl ColumnMapping {
    /// Resolve the id and name columns, failing fast when neither convention fits.
    pub fn detect(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let position = |wanted: &str| headers.iter().position(|h| h.trim() == wanted);

        SCHEMAS
            .iter()
            .find_map(|(id_col, name_col)| {
                Some(Self {
                    id: position(id_col)?,
                    name: position(name_col)?,
                })
            })
            .ok_or_else(|| LoadError::UnrecognizedHeader {
                found: headers.iter().map(String::from).collect(),
            })
    }
}

/// Read every record from a CSV file.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    read_records(file)
}

/// Read every record from any CSV source. All-or-nothing: the first bad row
/// fails the whole read.
pub fn read_records<R: Read>(source: R) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(source);
    let columns = ColumnMapping::detect(reader.headers()?)?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let raw = result?;

        let id_field = raw.get(columns.id).unwrap_or("").trim();
        let id: u64 = id_field.parse().map_err(|_| LoadError::InvalidId {
            row,
            value: id_field.to_string(),
        })?;

        let name = raw.get(columns.name).unwrap_or("");
        if name.trim().is_empty() {
            return Err(LoadError::EmptyName { row, id });
        }
        if !seen.insert(id) {
            return Err(LoadError::DuplicateId { row, id });
        }

        records.push(Record::new(id, name));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_lowercase_schema() {
        let csv = "id,name\n1,Juan García López\n2,María Rodríguez\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![Record::new(1, "Juan García López"), Record::new(2, "María Rodríguez")]
        );
    }

    #[test]
    fn test_reads_titled_schema_in_any_column_order() {
        let csv = "Full Name,Born,ID\n\"García, Juan\",1901,10\nAna Fernández,1899,11\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0], Record::new(10, "García, Juan"));
        assert_eq!(records[1], Record::new(11, "Ana Fernández"));
    }

    #[test]
    fn test_unrecognized_header() {
        let err = read_records("key,full_name\n1,Juan\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::UnrecognizedHeader { .. }));
    }

    #[test]
    fn test_mixed_conventions_are_rejected() {
        let err = read_records("ID,name\n1,Juan\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::UnrecognizedHeader { .. }));
    }

    #[test]
    fn test_invalid_id_is_fatal() {
        let err = read_records("id,name\n1,Juan\nx7,Pedro\n".as_bytes()).unwrap_err();
        match err {
            LoadError::InvalidId { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "x7");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            read_records("id,name\n-3,Juan\n".as_bytes()),
            Err(LoadError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_duplicate_and_empty() {
        assert!(matches!(
            read_records("id,name\n1,Juan\n1,Pedro\n".as_bytes()),
            Err(LoadError::DuplicateId { row: 2, id: 1 })
        ));
        assert!(matches!(
            read_records("id,name\n1,  \n".as_bytes()),
            Err(LoadError::EmptyName { row: 1, id: 1 })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "id,name\n1,Juan García López\n7,Juana Sánchez\n").unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, 7);
    }

    #[test]
    fn test_missing_file() {
        let err = load_records("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }
}
