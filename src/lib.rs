//! `dataset-analyzer` profiles an in-memory tabular [`types::DataSet`] with a fixed set of
//! deterministic rules and reports what it finds.
//!
//! A run produces a [`analysis::DatasetReport`] with:
//!
//! - a dataset summary (rows, columns, exact duplicate rows)
//! - one [`analysis::ColumnProfile`] per column: missingness, cardinality, constant / near-constant /
//!   ID-like flags and an inferred role (`unknown`, `constant`, `id_like`, `datetime`, `numerical`,
//!   `categorical`)
//! - data-quality [`analysis::Issue`]s, each carrying the evidence that triggered it
//! - an optional [`analysis::TargetAnalysis`] (classification vs regression, class balance)
//! - one severity-tagged [`analysis::Recommendation`] per issue
//!
//! Nothing is mutated and no model is fitted. Rule thresholds live in [`config::Thresholds`].
//!
//! ## Quick example
//!
//! ```rust
//! use dataset_analyzer::analysis::{analyze_dataset, AnalysisOptions, IssueType};
//! use dataset_analyzer::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("id", DataType::Int64),
//!     Field::new("country", DataType::Utf8),
//! ]);
//! let rows = (1..=12)
//!     .map(|i| vec![Value::Int64(i), Value::Utf8("NL".to_string())])
//!     .collect();
//! let ds = DataSet::new(schema, rows);
//!
//! let report = analyze_dataset(&ds, None, &AnalysisOptions::default()).unwrap();
//! let kinds: Vec<IssueType> = report.issues.iter().map(|i| i.issue_type()).collect();
//! assert_eq!(
//!     kinds,
//!     vec![IssueType::SmallDataset, IssueType::IdLikeColumn, IssueType::ConstantColumn]
//! );
//! ```
//!
//! ## Loading data
//!
//! ```no_run
//! use dataset_analyzer::analysis::{analyze_dataset, AnalysisOptions};
//! use dataset_analyzer::ingestion::csv::ingest_csv_inferred_from_path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ds = ingest_csv_inferred_from_path("train.csv")?;
//! let report = analyze_dataset(&ds, Some("label"), &AnalysisOptions::default())?;
//! println!("{}", report.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`analysis`]: the profiling pipeline and its report types
//! - [`config`]: rule thresholds
//! - [`ingestion`]: CSV and JSON readers
//! - [`types`]: schema + in-memory dataset types
//! - [`datetime`]: lenient date/time parsing shared by ingestion and inference
//! - [`error`]: error types

pub mod analysis;
pub mod config;
pub mod datetime;
pub mod error;
pub mod ingestion;
pub mod types;

pub use analysis::{analyze_dataset, AnalysisOptions, DatasetReport};
pub use config::Thresholds;
pub use error::{AnalysisError, AnalysisResult, IngestionError, IngestionResult};
