//! Core data model types.
//!
//! The analyzer operates on an in-memory [`DataSet`]: a [`Schema`] (a list of typed [`Field`]s)
//! plus row-major [`Value`] storage. Loaders in [`crate::ingestion`] produce this shape, but any
//! caller can build one directly.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string (free text).
    Utf8,
    /// Calendar date without time zone.
    Date,
    /// Date and time without time zone.
    DateTime,
}

impl DataType {
    /// `true` for [`DataType::Int64`] and [`DataType::Float64`].
    ///
    /// [`DataType::Bool`] is deliberately not numeric: boolean columns profile as categorical and
    /// boolean targets as classification.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// `true` for integer-valued types.
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int64)
    }

    /// `true` for [`DataType::Date`] and [`DataType::DateTime`].
    pub fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Utf8 => "utf8",
            Self::Date => "date",
            Self::DateTime => "datetime",
        };
        f.write_str(s)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the shape of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float. `NaN` counts as missing.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time.
    DateTime(NaiveDateTime),
}

impl Value {
    /// `true` for [`Value::Null`] and floating point `NaN`.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Hashable identity of a non-missing value, used for distinct/frequency counting.
    ///
    /// Returns `None` for missing values.
    pub fn key(&self) -> Option<ValueKey<'_>> {
        match self {
            Self::Null => None,
            Self::Float64(v) if v.is_nan() => None,
            // -0.0 and 0.0 are the same value.
            Self::Float64(v) if *v == 0.0 => Some(ValueKey::Float(0.0f64.to_bits())),
            Self::Float64(v) => Some(ValueKey::Float(v.to_bits())),
            Self::Int64(v) => Some(ValueKey::Int(*v)),
            Self::Bool(v) => Some(ValueKey::Bool(*v)),
            Self::Utf8(s) => Some(ValueKey::Str(s.as_str())),
            Self::Date(d) => Some(ValueKey::Date(*d)),
            Self::DateTime(dt) => Some(ValueKey::DateTime(*dt)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int64(v) => write!(f, "{v}"),
            // `{:?}` keeps the trailing `.0`: `1.0`, not `1`.
            Self::Float64(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Borrowed, hashable identity of a non-missing [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Int(i64),
    /// Bit pattern of a non-NaN float.
    Float(u64),
    Bool(bool),
    Str(&'a str),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Build a dataset from named columns of equal length.
    ///
    /// # Panics
    ///
    /// Panics if the columns do not all have the same length.
    pub fn from_columns(columns: Vec<(Field, Vec<Value>)>) -> Self {
        let row_count = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        assert!(
            columns.iter().all(|(_, v)| v.len() == row_count),
            "all columns must have the same length"
        );

        let mut rows: Vec<Vec<Value>> = (0..row_count)
            .map(|_| Vec::with_capacity(columns.len()))
            .collect();
        let mut fields = Vec::with_capacity(columns.len());
        for (field, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
            fields.push(field);
        }
        Self::new(Schema::new(fields), rows)
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Iterate the values of column `idx` in row order.
    ///
    /// Rows shorter than the schema yield [`Value::Null`] for the absent cell.
    pub fn column(&self, idx: usize) -> impl ExactSizeIterator<Item = &Value> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).unwrap_or(&Value::Null))
    }
}
