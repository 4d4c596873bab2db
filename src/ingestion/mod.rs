//! Loading files into an in-memory [`crate::types::DataSet`].
//!
//! [`ingest_from_path`] picks the reader from the file extension. Format-specific functions live
//! under [`csv`] and [`json`]. CSV can also be read without a schema, see
//! [`csv::ingest_csv_inferred_from_path`].

pub mod csv;
pub mod json;

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, Schema};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    Csv,
    /// JSON array of objects, or NDJSON.
    Json,
}

impl IngestionFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("cannot detect format: '{}' has no extension", path.display()),
            })?;

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "json" | "ndjson" | "jsonl" => Ok(Self::Json),
            other => Err(IngestionError::SchemaMismatch {
                message: format!("unsupported file extension '.{other}'"),
            }),
        }
    }
}

/// Ingest a file into a [`DataSet`] using `schema`, auto-detecting the format by extension.
pub fn ingest_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let format = IngestionFormat::from_path(path)?;
    tracing::debug!(path = %path.display(), ?format, "ingesting");

    let ds = match format {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path, schema)?,
        IngestionFormat::Json => json::ingest_json_from_path(path, schema)?,
    };
    tracing::debug!(rows = ds.row_count(), columns = ds.column_count(), "ingested");
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::IngestionFormat;
    use crate::error::IngestionError;

    #[test]
    fn detects_format_by_extension() {
        assert_eq!(IngestionFormat::from_path("a/b.CSV").unwrap(), IngestionFormat::Csv);
        assert_eq!(IngestionFormat::from_path("x.ndjson").unwrap(), IngestionFormat::Json);
        assert_eq!(IngestionFormat::from_path("x.json").unwrap(), IngestionFormat::Json);
    }

    #[test]
    fn rejects_unknown_or_missing_extension() {
        assert!(matches!(
            IngestionFormat::from_path("x.parquet"),
            Err(IngestionError::SchemaMismatch { .. })
        ));
        assert!(IngestionFormat::from_path("noext").is_err());
    }
}
