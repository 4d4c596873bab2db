//! Base per-column metrics shared by column inference and target analysis.

use std::collections::HashMap;

use crate::types::{Value, ValueKey};

/// Round to two decimal places; exact ties go to the even neighbour (`3.125` -> `3.12`).
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Missing/distinct/frequency metrics for one column.
#[derive(Debug)]
pub(crate) struct ColumnStats<'a> {
    pub total_rows: usize,
    pub non_missing: usize,
    /// Distinct non-missing values with their counts, in first-occurrence order.
    pub counts: Vec<(&'a Value, usize)>,
}

impl<'a> ColumnStats<'a> {
    pub fn collect<I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut index: HashMap<ValueKey<'a>, usize> = HashMap::new();
        let mut counts: Vec<(&'a Value, usize)> = Vec::new();
        let mut total_rows = 0usize;
        let mut non_missing = 0usize;

        for value in values {
            total_rows += 1;
            let Some(key) = value.key() else { continue };
            non_missing += 1;
            match index.get(&key) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(key, counts.len());
                    counts.push((value, 1));
                }
            }
        }

        Self {
            total_rows,
            non_missing,
            counts,
        }
    }

    /// Percentage of missing values, rounded to 2 decimals; `0.0` when there are no rows.
    pub fn missing_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        round2((1.0 - self.non_missing as f64 / self.total_rows as f64) * 100.0)
    }

    pub fn unique_values(&self) -> usize {
        self.counts.len()
    }

    /// Count of the most frequent non-missing value (0 when none).
    pub fn dominant_count(&self) -> usize {
        self.counts.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    /// Distinct values ordered by descending count; ties keep first-occurrence order.
    pub fn by_frequency(&self) -> Vec<(&'a Value, usize)> {
        let mut sorted = self.counts.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}
