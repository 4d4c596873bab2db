//! Target column analysis.
//!
//! Classifies the prediction problem a target column implies and, for classification targets,
//! measures class balance:
//!
//! 1. no observed values → [`ProblemType::Invalid`]
//! 2. one distinct value → [`ProblemType::Constant`]
//! 3. numeric with more than `regression_min_unique` distinct values → [`ProblemType::Regression`]
//! 4. otherwise → [`ProblemType::Classification`], with class shares and imbalance ratio

use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::Thresholds;
use crate::error::{AnalysisError, AnalysisResult};
use crate::types::DataSet;

use super::stats::{round2, ColumnStats};

/// Kind of prediction problem implied by the target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    Invalid,
    Constant,
    Regression,
    Classification,
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Constant => "constant",
            Self::Regression => "regression",
            Self::Classification => "classification",
        };
        f.write_str(s)
    }
}

/// Class label → share in percent, ordered by descending frequency.
///
/// Serializes as a JSON object that keeps this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassDistribution {
    classes: Vec<(String, f64)>,
}

impl ClassDistribution {
    /// Share of `label` in percent, if the class was observed.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.classes
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, pct)| *pct)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.classes.iter().map(|(l, pct)| (l.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Serialize for ClassDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.classes.len()))?;
        for (label, pct) in &self.classes {
            map.serialize_entry(label, pct)?;
        }
        map.end()
    }
}

/// Description of the target column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetAnalysis {
    pub target_column: String,
    pub missing_percentage: f64,
    pub unique_values: usize,
    pub problem_type: ProblemType,
    /// Set for classification targets only.
    pub class_distribution: Option<ClassDistribution>,
    pub is_imbalanced: Option<bool>,
    pub imbalance_ratio: Option<f64>,
}

/// Analyze `target_column`, if one is named.
///
/// Returns `Ok(None)` without inspecting the dataset when no target is given, and
/// [`AnalysisError::TargetColumnNotFound`] when the name is not in the schema.
pub fn analyze_target(
    dataset: &DataSet,
    target_column: Option<&str>,
    thresholds: &Thresholds,
) -> AnalysisResult<Option<TargetAnalysis>> {
    let Some(name) = target_column else {
        return Ok(None);
    };
    let idx = dataset
        .schema
        .index_of(name)
        .ok_or_else(|| AnalysisError::TargetColumnNotFound {
            column: name.to_string(),
        })?;
    let data_type = dataset.schema.fields[idx].data_type;

    let stats = ColumnStats::collect(dataset.column(idx));
    let unique_values = stats.unique_values();
    let mut analysis = TargetAnalysis {
        target_column: name.to_string(),
        missing_percentage: stats.missing_percentage(),
        unique_values,
        problem_type: ProblemType::Invalid,
        class_distribution: None,
        is_imbalanced: None,
        imbalance_ratio: None,
    };

    if stats.non_missing == 0 {
        return Ok(Some(analysis));
    }
    if unique_values == 1 {
        analysis.problem_type = ProblemType::Constant;
        return Ok(Some(analysis));
    }
    if data_type.is_numeric() && unique_values > thresholds.regression_min_unique {
        analysis.problem_type = ProblemType::Regression;
        return Ok(Some(analysis));
    }

    analysis.problem_type = ProblemType::Classification;

    let total = stats.non_missing as f64;
    let shares: Vec<(String, f64)> = stats
        .by_frequency()
        .into_iter()
        .map(|(value, count)| (value.to_string(), count as f64 / total * 100.0))
        .collect();

    let majority_pct = shares.first().map(|(_, p)| *p).unwrap_or(0.0);
    let minority_pct = shares.last().map(|(_, p)| *p).unwrap_or(0.0);
    let imbalance_ratio = (minority_pct > 0.0).then(|| round2(majority_pct / minority_pct));

    analysis.imbalance_ratio = imbalance_ratio;
    analysis.is_imbalanced =
        Some(imbalance_ratio.is_some_and(|r| r >= thresholds.imbalance_ratio_threshold));
    analysis.class_distribution = Some(ClassDistribution {
        classes: shares
            .into_iter()
            .map(|(label, pct)| (label, round2(pct)))
            .collect(),
    });

    tracing::debug!(
        target = name,
        classes = unique_values,
        imbalance_ratio = ?analysis.imbalance_ratio,
        "classification target analyzed"
    );
    Ok(Some(analysis))
}
