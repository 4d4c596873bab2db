use thiserror::Error;

/// Convenience result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by the analysis pipeline.
///
/// Column inference, issue detection and recommendation generation never fail; only target lookup,
/// configuration and the execution/serialization plumbing around them do.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The requested target column is not part of the dataset schema.
    #[error("target column '{column}' not found in dataset")]
    TargetColumnNotFound { column: String },

    /// A threshold override is out of its valid range.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// The worker pool for parallel column inference could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Reading a configuration file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization of a configuration or report failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV and JSON ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not conform to the provided schema (missing required fields/columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
