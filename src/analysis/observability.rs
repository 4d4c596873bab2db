use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::AnalysisError;

use super::inference::ColumnProfile;
use super::recommendations::{Recommendation, Severity};

/// Context about an analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisContext {
    /// Rows in the analyzed dataset.
    pub rows: usize,
    /// Columns in the analyzed dataset.
    pub columns: usize,
    /// Requested target column, if any.
    pub target_column: Option<String>,
}

/// Stats reported when a run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStats {
    pub columns_profiled: usize,
    pub issues: usize,
    pub recommendations: usize,
    /// Highest recommendation severity, `None` when nothing was flagged.
    pub highest_severity: Option<Severity>,
    pub elapsed: Duration,
}

/// Observer interface for analysis runs.
///
/// Implementors can record metrics, logs, or trigger alerts. All methods default to no-ops.
pub trait AnalysisObserver: Send + Sync {
    /// Called once per column, in column order, after its profile is final.
    fn on_column_profiled(&self, _ctx: &AnalysisContext, _profile: &ColumnProfile) {}

    /// Called when the run completes.
    fn on_success(&self, _ctx: &AnalysisContext, _stats: AnalysisStats) {}

    /// Called when the run fails.
    fn on_failure(&self, _ctx: &AnalysisContext, _error: &AnalysisError) {}

    /// Called for each recommendation at or above the configured alert severity.
    fn on_alert(&self, _ctx: &AnalysisContext, _recommendation: &Recommendation) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn AnalysisObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn AnalysisObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl AnalysisObserver for CompositeObserver {
    fn on_column_profiled(&self, ctx: &AnalysisContext, profile: &ColumnProfile) {
        for o in &self.observers {
            o.on_column_profiled(ctx, profile);
        }
    }

    fn on_success(&self, ctx: &AnalysisContext, stats: AnalysisStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &AnalysisContext, error: &AnalysisError) {
        for o in &self.observers {
            o.on_failure(ctx, error);
        }
    }

    fn on_alert(&self, ctx: &AnalysisContext, recommendation: &Recommendation) {
        for o in &self.observers {
            o.on_alert(ctx, recommendation);
        }
    }
}

/// Logs analysis events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl AnalysisObserver for StdErrObserver {
    fn on_column_profiled(&self, _ctx: &AnalysisContext, profile: &ColumnProfile) {
        eprintln!(
            "[analyze][column] name={} type={} inferred={} missing={}% unique={}",
            profile.name,
            profile.original_type,
            profile.inferred_type,
            profile.missing_percentage,
            profile.unique_values
        );
    }

    fn on_success(&self, ctx: &AnalysisContext, stats: AnalysisStats) {
        eprintln!(
            "[analyze][ok] rows={} columns={} issues={} highest_severity={} elapsed={:?}",
            ctx.rows,
            ctx.columns,
            stats.issues,
            severity_label(stats.highest_severity),
            stats.elapsed
        );
    }

    fn on_failure(&self, ctx: &AnalysisContext, error: &AnalysisError) {
        eprintln!(
            "[analyze][error] rows={} columns={} err={}",
            ctx.rows, ctx.columns, error
        );
    }

    fn on_alert(&self, _ctx: &AnalysisContext, recommendation: &Recommendation) {
        eprintln!(
            "[ALERT][analyze][{}] issue={} column={}",
            recommendation.severity,
            recommendation.related_issue,
            recommendation.column.as_deref().unwrap_or("-")
        );
    }
}

/// Appends analysis events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl AnalysisObserver for FileObserver {
    fn on_success(&self, ctx: &AnalysisContext, stats: AnalysisStats) {
        self.append_line(&format!(
            "{} ok rows={} columns={} target={} issues={} recommendations={} highest_severity={}",
            unix_ts(),
            ctx.rows,
            ctx.columns,
            ctx.target_column.as_deref().unwrap_or("-"),
            stats.issues,
            stats.recommendations,
            severity_label(stats.highest_severity)
        ));
    }

    fn on_failure(&self, ctx: &AnalysisContext, error: &AnalysisError) {
        self.append_line(&format!(
            "{} fail rows={} columns={} target={} err={}",
            unix_ts(),
            ctx.rows,
            ctx.columns,
            ctx.target_column.as_deref().unwrap_or("-"),
            error
        ));
    }

    fn on_alert(&self, _ctx: &AnalysisContext, recommendation: &Recommendation) {
        self.append_line(&format!(
            "{} ALERT severity={} issue={} column={}",
            unix_ts(),
            recommendation.severity,
            recommendation.related_issue,
            recommendation.column.as_deref().unwrap_or("-")
        ));
    }
}

fn severity_label(severity: Option<Severity>) -> String {
    severity.map_or_else(|| "none".to_string(), |s| s.to_string())
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
