use chrono::NaiveDate;
use dataset_analyzer::analysis::{analyze_dataset, AnalysisOptions, InferredType};
use dataset_analyzer::ingestion::ingest_from_path;
use dataset_analyzer::ingestion::json::ingest_json_from_path;
use dataset_analyzer::types::{DataType, Field, Schema, Value};

fn events_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("user.name", DataType::Utf8),
        Field::new("at", DataType::DateTime),
    ])
}

#[test]
fn ingest_ndjson_fixture() {
    let ds = ingest_json_from_path("tests/fixtures/events.ndjson", &events_schema()).unwrap();

    assert_eq!(ds.row_count(), 3);
    let at = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(11, 30, 0)
        .unwrap();
    assert_eq!(ds.rows[1][2], Value::DateTime(at));
    assert_eq!(ds.rows[2], vec![Value::Int64(3), Value::Null, Value::Null]);
}

#[test]
fn ingest_from_path_detects_ndjson_and_profiles_it() {
    let ds = ingest_from_path("tests/fixtures/events.ndjson", &events_schema()).unwrap();
    let report = analyze_dataset(&ds, None, &AnalysisOptions::default()).unwrap();

    let at = report.columns.get("at").unwrap();
    assert_eq!(at.inferred_type, InferredType::Datetime);
    assert_eq!(at.missing_percentage, 33.33);
    assert_eq!(
        report.columns.get("user.name").unwrap().inferred_type,
        InferredType::Categorical
    );
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = ingest_from_path("tests/fixtures/events.parquet", &events_schema()).unwrap_err();
    assert!(err.to_string().contains("unsupported file extension"));
}
