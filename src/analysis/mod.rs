//! Rule-based dataset analysis.
//!
//! The analysis layer operates on [`crate::types::DataSet`] values and never mutates them. It is
//! a linear pipeline of pure functions:
//!
//! - [`compute_dataset_summary`]: row/column/duplicate counts
//! - [`infer_column_properties`]: per-column type/role inference
//! - [`detect_data_quality_issues`]: typed issue records from profiles + summary
//! - [`analyze_target`]: problem type and class balance of an optional target column
//! - [`generate_recommendations`]: one severity-tagged statement per issue
//!
//! [`analyze_dataset`] runs all of them and bundles the result in a [`DatasetReport`].
//!
//! ## Example
//!
//! ```rust
//! use dataset_analyzer::analysis::{analyze_dataset, AnalysisOptions, InferredType, ProblemType};
//! use dataset_analyzer::types::{DataSet, DataType, Field, Value};
//!
//! let ds = DataSet::from_columns(vec![
//!     (Field::new("id", DataType::Int64), (1..=40).map(Value::Int64).collect()),
//!     (
//!         Field::new("label", DataType::Utf8),
//!         (1..=40).map(|i| Value::Utf8(if i % 4 == 0 { "yes" } else { "no" }.to_string())).collect(),
//!     ),
//! ]);
//!
//! let report = analyze_dataset(&ds, Some("label"), &AnalysisOptions::default()).unwrap();
//! assert_eq!(report.columns.get("id").unwrap().inferred_type, InferredType::IdLike);
//! assert_eq!(report.target.as_ref().unwrap().problem_type, ProblemType::Classification);
//! // small_dataset + id_like_column
//! assert_eq!(report.recommendations.len(), 2);
//! ```

pub mod inference;
pub mod issues;
pub mod observability;
pub mod recommendations;
pub mod summary;
pub mod target;

mod stats;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::config::Thresholds;
use crate::error::AnalysisResult;
use crate::types::DataSet;

pub use inference::{
    infer_column_properties, CardinalityLevel, ColumnProfile, ColumnProfiles, InferredType,
    NumericalKind,
};
pub use issues::{detect_data_quality_issues, Issue, IssueKind, IssueType};
pub use observability::{
    AnalysisContext, AnalysisObserver, AnalysisStats, CompositeObserver, FileObserver,
    StdErrObserver,
};
pub use recommendations::{generate_recommendations, Recommendation, Severity};
pub use summary::{compute_dataset_summary, DatasetSummary};
pub use target::{analyze_target, ClassDistribution, ProblemType, TargetAnalysis};

use inference::{profile_column, ColumnFacts};

/// Options controlling a full analysis run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct AnalysisOptions {
    /// Rule thresholds.
    pub thresholds: Thresholds,
    /// Worker threads for column inference. `None` profiles columns sequentially.
    pub num_threads: Option<usize>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn AnalysisObserver>>,
    /// Severity at which `on_alert` is invoked for a recommendation.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for AnalysisOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisOptions")
            .field("thresholds", &self.thresholds)
            .field("num_threads", &self.num_threads)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            num_threads: None,
            observer: None,
            alert_at_or_above: Severity::High,
        }
    }
}

/// Full result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub summary: DatasetSummary,
    pub columns: ColumnProfiles,
    pub issues: Vec<Issue>,
    pub target: Option<TargetAnalysis>,
    pub recommendations: Vec<Recommendation>,
}

impl DatasetReport {
    /// Highest severity among the recommendations, `None` when there are none.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.recommendations.iter().map(|r| r.severity).max()
    }

    /// Recommendations concerning `column`.
    pub fn recommendations_for<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a Recommendation> + 'a {
        self.recommendations
            .iter()
            .filter(move |r| r.column.as_deref() == Some(column))
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the whole pipeline over `dataset`.
///
/// When an observer is configured, this function reports:
///
/// - `on_column_profiled` for every column, in column order
/// - `on_success` with run stats, or `on_failure` with the error
/// - `on_alert` for each recommendation with severity >= `options.alert_at_or_above`
pub fn analyze_dataset(
    dataset: &DataSet,
    target_column: Option<&str>,
    options: &AnalysisOptions,
) -> AnalysisResult<DatasetReport> {
    let start = Instant::now();
    let ctx = AnalysisContext {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        target_column: target_column.map(str::to_string),
    };

    let result = run_pipeline(dataset, target_column, options);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(report) => {
                for profile in &report.columns {
                    obs.on_column_profiled(&ctx, profile);
                }
                for rec in &report.recommendations {
                    if rec.severity >= options.alert_at_or_above {
                        obs.on_alert(&ctx, rec);
                    }
                }
                obs.on_success(
                    &ctx,
                    AnalysisStats {
                        columns_profiled: report.columns.len(),
                        issues: report.issues.len(),
                        recommendations: report.recommendations.len(),
                        highest_severity: report.highest_severity(),
                        elapsed: start.elapsed(),
                    },
                );
            }
            Err(e) => obs.on_failure(&ctx, e),
        }
    }

    result
}

fn run_pipeline(
    dataset: &DataSet,
    target_column: Option<&str>,
    options: &AnalysisOptions,
) -> AnalysisResult<DatasetReport> {
    let thresholds = &options.thresholds;
    thresholds.validate()?;

    // An unknown target fails the run before any column work.
    let target = analyze_target(dataset, target_column, thresholds)?;
    let summary = compute_dataset_summary(dataset);
    let columns = match options.num_threads {
        Some(n) => infer_column_properties_parallel(dataset, thresholds, n)?,
        None => infer_column_properties(dataset, thresholds),
    };
    let issues = detect_data_quality_issues(&columns, &summary, thresholds);
    let recommendations = generate_recommendations(&issues);

    Ok(DatasetReport {
        summary,
        columns,
        issues,
        target,
        recommendations,
    })
}

/// Column inference on a dedicated rayon pool of `num_threads` workers.
///
/// Output order is dataset column order, identical to [`infer_column_properties`].
pub fn infer_column_properties_parallel(
    dataset: &DataSet,
    thresholds: &Thresholds,
    num_threads: usize,
) -> AnalysisResult<ColumnProfiles> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads.max(1))
        .build()?;

    let profiles = pool.install(|| {
        (0..dataset.column_count())
            .into_par_iter()
            .map(|idx| profile_column(&ColumnFacts::from_dataset(dataset, idx), thresholds))
            .collect::<Vec<_>>()
    });
    Ok(ColumnProfiles::new(profiles))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        analyze_dataset, infer_column_properties, infer_column_properties_parallel,
        AnalysisContext, AnalysisObserver, AnalysisOptions, AnalysisStats, ColumnProfile,
        Recommendation, Severity,
    };
    use crate::config::Thresholds;
    use crate::error::AnalysisError;
    use crate::types::{DataSet, DataType, Field, Value};

    fn wide_dataset(columns: usize, rows: i64) -> DataSet {
        DataSet::from_columns(
            (0..columns)
                .map(|c| {
                    let values = (0..rows)
                        .map(|r| match c % 3 {
                            0 => Value::Int64(r),
                            1 => Value::Utf8(format!("v{}", r % (c as i64 + 2))),
                            _ => Value::Float64(r as f64 * 0.5),
                        })
                        .collect();
                    let dt = match c % 3 {
                        0 => DataType::Int64,
                        1 => DataType::Utf8,
                        _ => DataType::Float64,
                    };
                    (Field::new(format!("c{c}"), dt), values)
                })
                .collect(),
        )
    }

    #[derive(Default)]
    struct RecordingObserver {
        columns: Mutex<Vec<String>>,
        alerts: Mutex<Vec<Severity>>,
        successes: Mutex<Vec<AnalysisStats>>,
        failures: Mutex<Vec<String>>,
    }

    impl AnalysisObserver for RecordingObserver {
        fn on_column_profiled(&self, _ctx: &AnalysisContext, profile: &ColumnProfile) {
            self.columns.lock().unwrap().push(profile.name.clone());
        }
        fn on_success(&self, _ctx: &AnalysisContext, stats: AnalysisStats) {
            self.successes.lock().unwrap().push(stats);
        }
        fn on_failure(&self, _ctx: &AnalysisContext, error: &AnalysisError) {
            self.failures.lock().unwrap().push(error.to_string());
        }
        fn on_alert(&self, _ctx: &AnalysisContext, recommendation: &Recommendation) {
            self.alerts.lock().unwrap().push(recommendation.severity);
        }
    }

    #[test]
    fn parallel_inference_matches_sequential_order() {
        let ds = wide_dataset(24, 60);
        let t = Thresholds::default();
        let sequential = infer_column_properties(&ds, &t);
        let parallel = infer_column_properties_parallel(&ds, &t, 4).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn observer_sees_columns_alerts_and_success() {
        let obs = Arc::new(RecordingObserver::default());
        let opts = AnalysisOptions {
            observer: Some(obs.clone()),
            alert_at_or_above: Severity::High,
            ..Default::default()
        };
        let ds = wide_dataset(3, 30);
        let report = analyze_dataset(&ds, None, &opts).unwrap();

        assert_eq!(*obs.columns.lock().unwrap(), vec!["c0", "c1", "c2"]);
        // c0 is a monotonic integer id -> one high-severity recommendation.
        assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::High]);
        let successes = obs.successes.lock().unwrap();
        assert_eq!(successes.len(), 1);
        assert_eq!(successes[0].issues, report.issues.len());
        assert_eq!(successes[0].highest_severity, Some(Severity::High));
        assert!(obs.failures.lock().unwrap().is_empty());
    }

    #[test]
    fn observer_sees_failure_for_unknown_target() {
        let obs = Arc::new(RecordingObserver::default());
        let opts = AnalysisOptions {
            observer: Some(obs.clone()),
            ..Default::default()
        };
        let ds = wide_dataset(2, 5);
        let err = analyze_dataset(&ds, Some("nope"), &opts).unwrap_err();
        assert!(matches!(err, AnalysisError::TargetColumnNotFound { .. }));
        assert_eq!(obs.failures.lock().unwrap().len(), 1);
        assert!(obs.successes.lock().unwrap().is_empty());
        assert!(obs.columns.lock().unwrap().is_empty());
    }

    #[test]
    fn invalid_thresholds_fail_the_run() {
        let opts = AnalysisOptions {
            thresholds: Thresholds {
                near_constant_threshold: 120.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = analyze_dataset(&wide_dataset(1, 3), None, &opts).unwrap_err();
        assert!(matches!(err, AnalysisError::Config { .. }));
    }

    #[test]
    fn report_exposes_highest_severity_and_per_column_recommendations() {
        let ds = wide_dataset(3, 30);
        let report = analyze_dataset(&ds, None, &AnalysisOptions::default()).unwrap();
        assert_eq!(report.highest_severity(), Some(Severity::High));
        let for_id: Vec<_> = report.recommendations_for("c0").collect();
        assert_eq!(for_id.len(), 1);
        assert_eq!(report.recommendations_for("c1").count(), 0);
    }
}
