//! Data-quality issue detection.
//!
//! Issues are derived from column profiles plus the dataset summary. Each [`IssueKind`] variant
//! carries a fixed evidence shape:
//!
//! | issue_type | evidence |
//! |---|---|
//! | `small_dataset` | `num_rows`, `threshold` |
//! | `all_missing` | `missing_percentage` |
//! | `constant_column` | `unique_values` |
//! | `near_constant_column` | `missing_percentage` |
//! | `high_missingness` | `missing_percentage`, `threshold` |
//! | `id_like_column` | `unique_values` |
//! | `high_cardinality_categorical` | `unique_values`, `threshold` |

use std::fmt;

use serde::Serialize;

use crate::config::Thresholds;

use super::inference::{CardinalityLevel, ColumnProfile, ColumnProfiles, InferredType};
use super::summary::DatasetSummary;

/// Issue type identifier, without evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    SmallDataset,
    AllMissing,
    ConstantColumn,
    NearConstantColumn,
    HighMissingness,
    IdLikeColumn,
    HighCardinalityCategorical,
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SmallDataset => "small_dataset",
            Self::AllMissing => "all_missing",
            Self::ConstantColumn => "constant_column",
            Self::NearConstantColumn => "near_constant_column",
            Self::HighMissingness => "high_missingness",
            Self::IdLikeColumn => "id_like_column",
            Self::HighCardinalityCategorical => "high_cardinality_categorical",
        };
        f.write_str(s)
    }
}

/// Issue type together with its evidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue_type", content = "evidence", rename_all = "snake_case")]
pub enum IssueKind {
    SmallDataset { num_rows: usize, threshold: usize },
    AllMissing { missing_percentage: f64 },
    ConstantColumn { unique_values: usize },
    NearConstantColumn { missing_percentage: f64 },
    HighMissingness { missing_percentage: f64, threshold: f64 },
    IdLikeColumn { unique_values: usize },
    HighCardinalityCategorical { unique_values: usize, threshold: usize },
}

impl IssueKind {
    pub fn issue_type(&self) -> IssueType {
        match self {
            Self::SmallDataset { .. } => IssueType::SmallDataset,
            Self::AllMissing { .. } => IssueType::AllMissing,
            Self::ConstantColumn { .. } => IssueType::ConstantColumn,
            Self::NearConstantColumn { .. } => IssueType::NearConstantColumn,
            Self::HighMissingness { .. } => IssueType::HighMissingness,
            Self::IdLikeColumn { .. } => IssueType::IdLikeColumn,
            Self::HighCardinalityCategorical { .. } => IssueType::HighCardinalityCategorical,
        }
    }
}

/// A detected data-quality issue. Dataset-level issues have no column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    #[serde(flatten)]
    pub kind: IssueKind,
    pub column: Option<String>,
}

impl Issue {
    fn dataset(kind: IssueKind) -> Self {
        Self { kind, column: None }
    }

    fn for_column(name: &str, kind: IssueKind) -> Self {
        Self {
            kind,
            column: Some(name.to_string()),
        }
    }

    pub fn issue_type(&self) -> IssueType {
        self.kind.issue_type()
    }
}

/// Detect issues: the dataset-level check first, then per column in profile order.
pub fn detect_data_quality_issues(
    columns: &ColumnProfiles,
    summary: &DatasetSummary,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if summary.num_rows < thresholds.small_dataset_rows {
        issues.push(Issue::dataset(IssueKind::SmallDataset {
            num_rows: summary.num_rows,
            threshold: thresholds.small_dataset_rows,
        }));
    }

    for profile in columns {
        column_issues(profile, thresholds, &mut issues);
    }

    tracing::debug!(issues = issues.len(), "data quality issues detected");
    issues
}

fn column_issues(p: &ColumnProfile, t: &Thresholds, out: &mut Vec<Issue>) {
    if p.missing_percentage == 100.0 {
        out.push(Issue::for_column(
            &p.name,
            IssueKind::AllMissing {
                missing_percentage: 100.0,
            },
        ));
        return;
    }

    if p.is_constant {
        out.push(Issue::for_column(
            &p.name,
            IssueKind::ConstantColumn {
                unique_values: p.unique_values,
            },
        ));
    }

    if p.is_near_constant {
        out.push(Issue::for_column(
            &p.name,
            IssueKind::NearConstantColumn {
                missing_percentage: p.missing_percentage,
            },
        ));
    }

    if p.missing_percentage >= t.missingness_threshold {
        out.push(Issue::for_column(
            &p.name,
            IssueKind::HighMissingness {
                missing_percentage: p.missing_percentage,
                threshold: t.missingness_threshold,
            },
        ));
    }

    if p.is_id_like {
        out.push(Issue::for_column(
            &p.name,
            IssueKind::IdLikeColumn {
                unique_values: p.unique_values,
            },
        ));
    }

    if p.inferred_type == InferredType::Categorical
        && p.cardinality_level == Some(CardinalityLevel::High)
    {
        out.push(Issue::for_column(
            &p.name,
            IssueKind::HighCardinalityCategorical {
                unique_values: p.unique_values,
                threshold: t.high_cardinality_limit,
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{detect_data_quality_issues, Issue, IssueKind, IssueType};
    use crate::analysis::inference::{
        infer_column_properties, CardinalityLevel, ColumnProfile, ColumnProfiles, InferredType,
    };
    use crate::analysis::summary::DatasetSummary;
    use crate::config::Thresholds;
    use crate::types::{DataSet, DataType, Field, Value};

    fn profile(name: &str) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            original_type: DataType::Utf8,
            missing_percentage: 0.0,
            unique_values: 3,
            is_constant: false,
            is_near_constant: false,
            is_id_like: false,
            inferred_type: InferredType::Categorical,
            numerical_kind: None,
            cardinality_level: Some(CardinalityLevel::Low),
        }
    }

    fn summary(num_rows: usize) -> DatasetSummary {
        DatasetSummary {
            num_rows,
            num_columns: 1,
            duplicate_rows: 0,
        }
    }

    fn types(issues: &[Issue]) -> Vec<IssueType> {
        issues.iter().map(Issue::issue_type).collect()
    }

    #[test]
    fn small_dataset_is_reported_first_with_threshold() {
        let cols = ColumnProfiles::new(vec![profile("a")]);
        let issues = detect_data_quality_issues(&cols, &summary(50), &Thresholds::default());
        assert_eq!(
            issues,
            vec![Issue {
                kind: IssueKind::SmallDataset {
                    num_rows: 50,
                    threshold: 100
                },
                column: None,
            }]
        );
    }

    #[test]
    fn all_missing_short_circuits_other_checks() {
        let mut p = profile("empty");
        p.missing_percentage = 100.0;
        p.inferred_type = InferredType::Unknown;
        p.cardinality_level = None;
        let cols = ColumnProfiles::new(vec![p]);
        let issues = detect_data_quality_issues(&cols, &summary(500), &Thresholds::default());
        assert_eq!(types(&issues), vec![IssueType::AllMissing]);
        assert_eq!(issues[0].column.as_deref(), Some("empty"));
    }

    #[test]
    fn column_checks_run_in_fixed_order() {
        let mut p = profile("x");
        p.is_near_constant = true;
        p.missing_percentage = 45.5;
        p.unique_values = 80;
        p.cardinality_level = Some(CardinalityLevel::High);
        let cols = ColumnProfiles::new(vec![p]);
        let issues = detect_data_quality_issues(&cols, &summary(10), &Thresholds::default());
        assert_eq!(
            types(&issues),
            vec![
                IssueType::SmallDataset,
                IssueType::NearConstantColumn,
                IssueType::HighMissingness,
                IssueType::HighCardinalityCategorical,
            ]
        );
        assert_eq!(
            issues[2].kind,
            IssueKind::HighMissingness {
                missing_percentage: 45.5,
                threshold: 30.0
            }
        );
    }

    #[test]
    fn high_missingness_is_inclusive_at_threshold() {
        // 3 of 10 missing: (1 - 0.7) * 100 is 30.000000000000004 before rounding.
        let values: Vec<Value> = (0..10)
            .map(|i| if i < 3 { Value::Null } else { Value::Utf8(format!("v{}", i % 4)) })
            .collect();
        let ds = DataSet::from_columns(vec![(Field::new("m", DataType::Utf8), values)]);
        let t = Thresholds::default();
        let cols = infer_column_properties(&ds, &t);
        assert_eq!(cols.get("m").unwrap().missing_percentage, 30.0);

        let issues = detect_data_quality_issues(&cols, &summary(500), &t);
        assert_eq!(
            issues,
            vec![Issue {
                kind: IssueKind::HighMissingness {
                    missing_percentage: 30.0,
                    threshold: 30.0
                },
                column: Some("m".to_string()),
            }]
        );
    }

    #[test]
    fn high_missingness_not_reported_just_below_threshold() {
        let mut p = profile("m");
        p.missing_percentage = 29.99;
        let cols = ColumnProfiles::new(vec![p]);
        let issues = detect_data_quality_issues(&cols, &summary(500), &Thresholds::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn constant_and_id_like_carry_unique_values() {
        let mut c = profile("c");
        c.is_constant = true;
        c.unique_values = 1;
        c.inferred_type = InferredType::Constant;
        c.cardinality_level = None;

        let mut id = profile("id");
        id.original_type = DataType::Int64;
        id.is_id_like = true;
        id.unique_values = 120;
        id.inferred_type = InferredType::IdLike;
        id.cardinality_level = None;

        let cols = ColumnProfiles::new(vec![c, id]);
        let issues = detect_data_quality_issues(&cols, &summary(120), &Thresholds::default());
        assert_eq!(
            issues.iter().map(|i| i.kind.clone()).collect::<Vec<_>>(),
            vec![
                IssueKind::ConstantColumn { unique_values: 1 },
                IssueKind::IdLikeColumn { unique_values: 120 },
            ]
        );
    }

    #[test]
    fn serializes_with_issue_type_and_evidence() {
        let issue = Issue {
            kind: IssueKind::HighCardinalityCategorical {
                unique_values: 70,
                threshold: 50,
            },
            column: Some("city".to_string()),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "issue_type": "high_cardinality_categorical",
                "evidence": { "unique_values": 70, "threshold": 50 },
                "column": "city"
            })
        );
    }
}
