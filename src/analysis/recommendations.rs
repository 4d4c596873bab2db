//! Templated recommendations for detected issues.

use std::fmt;

use serde::Serialize;

use super::issues::{Issue, IssueType};

/// How urgently a recommendation should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(s)
    }
}

/// A human-readable statement tied to one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub related_issue: IssueType,
    pub column: Option<String>,
    pub statement: &'static str,
    pub severity: Severity,
}

/// Statement and severity for an issue type.
pub fn template(issue_type: IssueType) -> (&'static str, Severity) {
    match issue_type {
        IssueType::SmallDataset => (
            "The dataset contains a relatively small number of rows, which may limit the \
             reliability of patterns learned during modeling.",
            Severity::Medium,
        ),
        IssueType::AllMissing => (
            "This column contains no observed values, which means it cannot contribute \
             information to a model in its current form.",
            Severity::High,
        ),
        IssueType::ConstantColumn | IssueType::NearConstantColumn => (
            "This column shows little to no variation, which may limit its usefulness for \
             learning meaningful patterns.",
            Severity::Low,
        ),
        IssueType::HighMissingness => (
            "A large proportion of values are missing in this column, which may affect how \
             reliably it can be used during modeling.",
            Severity::Medium,
        ),
        IssueType::IdLikeColumn => (
            "This column behaves like an identifier and may pose a risk of information leakage \
             if used as a feature.",
            Severity::High,
        ),
        IssueType::HighCardinalityCategorical => (
            "This categorical column has a large number of unique values, which may require \
             careful handling during modeling.",
            Severity::Medium,
        ),
    }
}

/// One recommendation per issue, in issue order.
pub fn generate_recommendations(issues: &[Issue]) -> Vec<Recommendation> {
    issues
        .iter()
        .map(|issue| {
            let related_issue = issue.issue_type();
            let (statement, severity) = template(related_issue);
            Recommendation {
                related_issue,
                column: issue.column.clone(),
                statement,
                severity,
            }
        })
        .collect()
}
