//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Nested fields are addressed with dot paths in schema field names (e.g. `user.name`). A field
//! that is absent from an object is treated as missing, like an explicit `null`.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use crate::datetime::{parse_date, parse_datetime};
use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Ingest a JSON or NDJSON file into an in-memory [`DataSet`].
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema)
}

/// Ingest JSON or NDJSON text into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> IngestionResult<DataSet> {
    let records = parse_records(input)?;

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len());
    for (idx0, record) in records.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = record.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
            message: format!("row {row_num} is not a json object"),
        })?;

        let row = schema
            .fields
            .iter()
            .map(|field| match lookup(obj, &field.name) {
                Some(jv) => convert(row_num, &field.name, field.data_type, jv),
                None => Ok(Value::Null),
            })
            .collect::<IngestionResult<Vec<Value>>>()?;
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn parse_records(input: &str) -> IngestionResult<Vec<JsonValue>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // A single JSON document first, NDJSON otherwise.
    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::Array(items)) => Ok(items),
        Ok(obj @ JsonValue::Object(_)) => Ok(vec![obj]),
        Ok(_) => Err(IngestionError::SchemaMismatch {
            message: "json must be an object, an array of objects, or NDJSON".to_string(),
        }),
        Err(_) => trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<JsonValue>(line.trim()).map_err(|e| {
                    IngestionError::SchemaMismatch {
                        message: format!("invalid ndjson at line {}: {}", i + 1, e),
                    }
                })
            })
            .collect(),
    }
}

fn lookup<'a>(root: &'a Map<String, JsonValue>, path: &str) -> Option<&'a JsonValue> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn convert(row: usize, column: &str, data_type: DataType, v: &JsonValue) -> IngestionResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }

    let parse_error = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => v
            .as_str()
            .map(|s| Value::Utf8(s.to_string()))
            .ok_or_else(|| parse_error("expected string")),
        DataType::Bool => v.as_bool().map(Value::Bool).ok_or_else(|| parse_error("expected bool")),
        DataType::Int64 => match (v.as_i64(), v.as_u64()) {
            (Some(n), _) => Ok(Value::Int64(n)),
            (None, Some(_)) => Err(parse_error("u64 out of range for i64")),
            (None, None) => Err(parse_error("expected integer number")),
        },
        DataType::Float64 => v.as_f64().map(Value::Float64).ok_or_else(|| parse_error("expected number")),
        DataType::Date => v
            .as_str()
            .and_then(parse_date)
            .map(Value::Date)
            .ok_or_else(|| parse_error("expected date string")),
        DataType::DateTime => v
            .as_str()
            .and_then(parse_datetime)
            .map(Value::DateTime)
            .ok_or_else(|| parse_error("expected date/time string")),
    }
}
