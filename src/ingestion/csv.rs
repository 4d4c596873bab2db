//! CSV ingestion implementation.

use std::io::Read;
use std::path::Path;

use crate::datetime::{parse_date, parse_datetime};
use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type; empty cells become [`Value::Null`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Ingest a CSV file without a schema: column types are sniffed with [`infer_csv_schema`].
pub fn ingest_csv_inferred_from_path(path: impl AsRef<Path>) -> IngestionResult<DataSet> {
    let path = path.as_ref();
    let schema = {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
        infer_csv_schema(&mut rdr)?
    };
    ingest_csv_from_path(path, &schema)
}

/// Ingest in-memory CSV text without a schema.
pub fn ingest_csv_inferred_from_str(input: &str) -> IngestionResult<DataSet> {
    let schema = {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes());
        infer_csv_schema(&mut rdr)?
    };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());
    ingest_csv_from_reader(&mut rdr, &schema)
}

/// Sniff a schema from CSV data.
///
/// Each column gets the narrowest type every non-empty cell parses as, tried in the order
/// `Int64`, `Float64`, `Bool`, then `Utf8`. Date-like text stays `Utf8`; recognising it is left to
/// column inference. A column with no non-empty cells is `Utf8`.
pub fn infer_csv_schema<R: Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Schema> {
    let headers = rdr.headers()?.clone();
    let mut candidates: Vec<Candidates> = vec![Candidates::default(); headers.len()];

    for result in rdr.records() {
        let record = result?;
        for (cand, raw) in candidates.iter_mut().zip(record.iter()) {
            cand.observe(raw.trim());
        }
    }

    let fields = headers
        .iter()
        .zip(candidates)
        .map(|(name, cand)| Field::new(name, cand.resolve()))
        .collect();
    Ok(Schema::new(fields))
}

/// Which types every non-empty cell seen so far still parses as.
#[derive(Debug, Clone, Copy)]
struct Candidates {
    seen: bool,
    int: bool,
    float: bool,
    boolean: bool,
}

impl Default for Candidates {
    fn default() -> Self {
        Self {
            seen: false,
            int: true,
            float: true,
            boolean: true,
        }
    }
}

impl Candidates {
    fn observe(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.seen = true;
        self.int = self.int && s.parse::<i64>().is_ok();
        self.float = self.float && s.parse::<f64>().is_ok();
        self.boolean = self.boolean && parse_strict_bool(s).is_some();
    }

    fn resolve(self) -> DataType {
        match self {
            Self { seen: false, .. } => DataType::Utf8,
            Self { int: true, .. } => DataType::Int64,
            Self { float: true, .. } => DataType::Float64,
            Self { boolean: true, .. } => DataType::Bool,
            _ => DataType::Utf8,
        }
    }
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> IngestionResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| IngestionError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
        DataType::Date => parse_date(trimmed)
            .map(Value::Date)
            .ok_or_else(|| parse_error("expected date".to_string())),
        DataType::DateTime => parse_datetime(trimmed)
            .map(Value::DateTime)
            .ok_or_else(|| parse_error("expected date/time".to_string())),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

/// Only literal `true`/`false` mark a column as boolean when sniffing.
fn parse_strict_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{infer_csv_schema, ingest_csv_inferred_from_str};
    use crate::types::{DataType, Value};

    #[test]
    fn sniffs_narrowest_type_per_column() {
        let input = "id,score,flag,when,name,empty\n\
                     1,1.5,true,2024-01-01,Ada,\n\
                     2,,False,2024-01-02,Grace,\n\
                     3,2,true,2024-01-03,,\n";
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes());
        let schema = infer_csv_schema(&mut rdr).unwrap();
        let types: Vec<DataType> = schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![
                DataType::Int64,
                DataType::Float64,
                DataType::Bool,
                DataType::Utf8,
                DataType::Utf8,
                DataType::Utf8,
            ]
        );
    }

    #[test]
    fn inferred_ingestion_maps_empty_cells_to_null() {
        let ds = ingest_csv_inferred_from_str("a,b\n1,x\n,y\n").unwrap();
        assert_eq!(ds.rows[1], vec![Value::Null, Value::Utf8("y".to_string())]);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
    }
}
