//! Dataset-level counts.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{DataSet, ValueKey};

/// Basic, high-level dataset facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub num_rows: usize,
    pub num_columns: usize,
    /// Rows identical to an earlier row (missing values compare equal to each other).
    pub duplicate_rows: usize,
}

/// Count rows, columns and fully-duplicated rows.
pub fn compute_dataset_summary(dataset: &DataSet) -> DatasetSummary {
    let mut seen: HashSet<Vec<Option<ValueKey<'_>>>> = HashSet::with_capacity(dataset.row_count());
    let duplicate_rows = dataset
        .rows
        .iter()
        .filter(|row| !seen.insert(row.iter().map(|v| v.key()).collect()))
        .count();

    DatasetSummary {
        num_rows: dataset.row_count(),
        num_columns: dataset.column_count(),
        duplicate_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::compute_dataset_summary;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn counts_duplicates_after_first_occurrence() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("score", DataType::Float64),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Float64(1.5)],
                vec![Value::Int64(1), Value::Float64(1.5)],
                vec![Value::Int64(2), Value::Null],
                vec![Value::Int64(2), Value::Float64(f64::NAN)],
                vec![Value::Int64(1), Value::Float64(1.5)],
            ],
        );
        let s = compute_dataset_summary(&ds);
        assert_eq!(s.num_rows, 5);
        assert_eq!(s.num_columns, 2);
        assert_eq!(s.duplicate_rows, 3);
    }

    #[test]
    fn empty_dataset_has_no_duplicates() {
        let ds = DataSet::new(Schema::new(vec![Field::new("a", DataType::Utf8)]), vec![]);
        let s = compute_dataset_summary(&ds);
        assert_eq!((s.num_rows, s.num_columns, s.duplicate_rows), (0, 1, 0));
    }
}
