//! Rule thresholds.
//!
//! Every decision the analyzer makes is a comparison against one of the values in [`Thresholds`].
//! The defaults are conservative and explainable; callers can override any subset of them, either
//! in code (struct update syntax) or from a JSON document:
//!
//! ```rust
//! use dataset_analyzer::config::Thresholds;
//!
//! let t = Thresholds::from_json_str(r#"{ "small_dataset_rows": 500 }"#).unwrap();
//! assert_eq!(t.small_dataset_rows, 500);
//! assert_eq!(t.missingness_threshold, 30.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Named thresholds controlling every inference, issue and target rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    /// Missing percentage at or above which a column is flagged `high_missingness`.
    pub missingness_threshold: f64,
    /// Dominant-value percentage at or above which a column is near-constant.
    pub near_constant_threshold: f64,
    /// Distinct values above which a categorical column has `high` cardinality.
    pub high_cardinality_limit: usize,
    /// Minimum `unique / non_missing` ratio for an ID-like column.
    pub id_uniqueness_ratio: f64,
    /// Row count below which the dataset is flagged `small_dataset`.
    pub small_dataset_rows: usize,
    /// An ID-like column needs strictly more distinct values than this.
    pub id_min_unique: usize,
    /// Integer columns with at most this many distinct values are `discrete`.
    pub discrete_max_unique: usize,
    /// Minimum share of parseable values for a text column to be treated as datetime.
    pub datetime_parse_ratio: f64,
    /// Numeric targets with strictly more distinct values than this are regression targets.
    pub regression_min_unique: usize,
    /// Majority/minority share ratio at or above which a classification target is imbalanced.
    pub imbalance_ratio_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            missingness_threshold: 30.0,
            near_constant_threshold: 99.0,
            high_cardinality_limit: 50,
            id_uniqueness_ratio: 0.95,
            small_dataset_rows: 100,
            id_min_unique: 10,
            discrete_max_unique: 20,
            datetime_parse_ratio: 0.8,
            regression_min_unique: 10,
            imbalance_ratio_threshold: 5.0,
        }
    }
}

impl Thresholds {
    /// Parse (partial) overrides from JSON; absent keys keep their defaults.
    pub fn from_json_str(input: &str) -> AnalysisResult<Self> {
        let t: Self = serde_json::from_str(input)?;
        t.validate()?;
        Ok(t)
    }

    /// Read overrides from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values that would make a rule meaningless.
    pub fn validate(&self) -> AnalysisResult<()> {
        check_percentage("missingness_threshold", self.missingness_threshold)?;
        check_percentage("near_constant_threshold", self.near_constant_threshold)?;
        check_ratio("id_uniqueness_ratio", self.id_uniqueness_ratio)?;
        check_ratio("datetime_parse_ratio", self.datetime_parse_ratio)?;
        if self.imbalance_ratio_threshold.is_nan() || self.imbalance_ratio_threshold < 1.0 {
            return Err(AnalysisError::Config {
                message: format!(
                    "imbalance_ratio_threshold must be >= 1.0 (got {})",
                    self.imbalance_ratio_threshold
                ),
            });
        }
        Ok(())
    }
}

fn check_percentage(name: &str, v: f64) -> AnalysisResult<()> {
    if (0.0..=100.0).contains(&v) {
        Ok(())
    } else {
        Err(AnalysisError::Config {
            message: format!("{name} must be within [0, 100] (got {v})"),
        })
    }
}

fn check_ratio(name: &str, v: f64) -> AnalysisResult<()> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::Config {
            message: format!("{name} must be within (0, 1] (got {v})"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Thresholds;
    use crate::error::AnalysisError;

    #[test]
    fn defaults_match_documented_values() {
        let t = Thresholds::default();
        assert_eq!(t.missingness_threshold, 30.0);
        assert_eq!(t.near_constant_threshold, 99.0);
        assert_eq!(t.high_cardinality_limit, 50);
        assert_eq!(t.id_uniqueness_ratio, 0.95);
        assert_eq!(t.small_dataset_rows, 100);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let t = Thresholds::from_json_str(r#"{"high_cardinality_limit": 5}"#).unwrap();
        assert_eq!(t.high_cardinality_limit, 5);
        assert_eq!(t.near_constant_threshold, 99.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Thresholds::from_json_str(r#"{"missingnes_threshold": 5}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Json(_)));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let err = Thresholds::from_json_str(r#"{"missingness_threshold": 130}"#).unwrap_err();
        assert!(err.to_string().contains("missingness_threshold"));

        let t = Thresholds {
            id_uniqueness_ratio: 0.0,
            ..Default::default()
        };
        assert!(matches!(t.validate(), Err(AnalysisError::Config { .. })));
    }
}
