//! End-to-end tests for CSV bulk import: bytes or file in, report out.

use std::io::Write;

use assert_matches::assert_matches;
use hrms_core::config::ImportConfig;
use hrms_core::error::CoreError;
use hrms_core::import::export::{error_report_csv, export_csv, template_csv};
use hrms_core::import::pipeline::{import_csv, import_csv_file};
use hrms_core::import::rules::RowErrorKind;
use hrms_core::import::schema::EntityKind;
use hrms_core::import::validator::ExistingRecords;
use hrms_core::records::{Designation, JobRole, JobType};

fn run(kind: EntityKind, csv: &str, existing: &ExistingRecords) -> hrms_core::import::pipeline::ImportReport {
    import_csv(kind, csv.as_bytes(), existing, &ImportConfig::default()).expect("import should parse")
}

// ---------------------------------------------------------------------------
// Test: designation upload with a blank and a repeated name
// ---------------------------------------------------------------------------

#[test]
fn test_designation_upload() {
    let report = run(
        EntityKind::Designation,
        "name\nSoftware Engineer\n\"\"\nSoftware Engineer\n",
        &ExistingRecords::new(),
    );

    assert!(report.headers.is_clean());
    let valid: Vec<Designation> = report.outcome.typed().unwrap();
    assert_eq!(
        valid,
        vec![Designation {
            name: "Software Engineer".into()
        }]
    );

    let errors: Vec<_> = report
        .outcome
        .errors
        .iter()
        .map(|e| (e.row, e.field.as_str(), e.message.as_str()))
        .collect();
    assert_eq!(
        errors,
        vec![
            (3, "name", "Name is required"),
            (4, "name", "Duplicate designation \"Software Engineer\" found in CSV"),
        ]
    );
}

// ---------------------------------------------------------------------------
// Test: job type color codes
// ---------------------------------------------------------------------------

#[test]
fn test_job_type_color_codes() {
    let report = run(
        EntityKind::JobType,
        "name,color_code\nRemote,123456\nOnsite,#ABC\nHybrid,#12345G\nContract,#1A2B3C\nIntern,#ffffff\nPart Time,\n",
        &ExistingRecords::new(),
    );

    let rejected: Vec<_> = report.outcome.errors.iter().map(|e| (e.row, e.kind)).collect();
    assert_eq!(
        rejected,
        vec![
            (2, RowErrorKind::InvalidFormat),
            (3, RowErrorKind::InvalidFormat),
            (4, RowErrorKind::InvalidFormat),
        ]
    );

    let valid: Vec<JobType> = report.outcome.typed().unwrap();
    assert_eq!(valid.len(), 3);
    assert_eq!(valid[2].color_code, None);
}

// ---------------------------------------------------------------------------
// Test: every row lands in exactly one bucket
// ---------------------------------------------------------------------------

#[test]
fn test_rows_accounted_for() {
    let csv = "name,responsibilities\n\
               Backend Developer,APIs\n\
               ,Orphan\n\
               backend developer,Dup\n\
               Tester,\n\
               Architect,Design\n";
    let existing = ExistingRecords::from_records(&[JobRole {
        name: "Architect".into(),
        responsibilities: None,
    }]);
    let report = run(EntityKind::JobRole, csv, &existing);
    let summary = report.outcome.summary();

    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.valid_rows, 2);
    assert_eq!(summary.invalid_rows, 3);
    assert_eq!(
        report.outcome.errors.last().map(|e| e.kind),
        Some(RowErrorKind::DuplicateInDatabase)
    );
}

// ---------------------------------------------------------------------------
// Test: export then re-import is detected as already present
// ---------------------------------------------------------------------------

#[test]
fn test_export_round_trip_is_idempotent() {
    let persisted = vec![
        JobType {
            name: "Full Time".into(),
            color_code: Some("#1A2B3C".into()),
        },
        JobType {
            name: "Freelance".into(),
            color_code: None,
        },
    ];
    let csv = export_csv(&EntityKind::JobType.schema(), &persisted).unwrap();
    let report = run(EntityKind::JobType, &csv, &ExistingRecords::from_records(&persisted));

    assert!(report.outcome.valid.is_empty());
    assert_eq!(report.outcome.errors.len(), 2);
    assert!(report
        .outcome
        .errors
        .iter()
        .all(|e| e.kind == RowErrorKind::DuplicateInDatabase));
}

// ---------------------------------------------------------------------------
// Test: templates validate and error reports render
// ---------------------------------------------------------------------------

#[test]
fn test_template_then_error_report() {
    let report = run(
        EntityKind::Degree,
        template_csv(EntityKind::Degree),
        &ExistingRecords::from_names(["mba"]),
    );
    assert_eq!(report.outcome.valid.len(), 2);

    let csv = error_report_csv(&report.outcome.errors).unwrap();
    assert_eq!(
        csv,
        "row,field,value,message\n3,name,MBA,\"Degree \"\"MBA\"\" already exists\"\n"
    );
}

// ---------------------------------------------------------------------------
// Test: parse failures abort the import
// ---------------------------------------------------------------------------

#[test]
fn test_unreadable_file_aborts() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"name\n\xff\xff\n").unwrap();

    let result = import_csv_file(
        EntityKind::Department,
        file.path(),
        &ExistingRecords::new(),
        &ImportConfig::default(),
    );
    assert_matches!(result, Err(CoreError::Parse(_)));
}

#[test]
fn test_file_import_succeeds() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"name,purpose\nEngineering,Build\nSales,\n").unwrap();

    let report = import_csv_file(
        EntityKind::Department,
        file.path(),
        &ExistingRecords::new(),
        &ImportConfig::default(),
    )
    .unwrap();
    assert_eq!(report.outcome.valid.len(), 2);
    assert_eq!(report.outcome.valid[0].get("purpose"), Some("Build"));
    assert_eq!(report.outcome.valid[1].get("purpose"), None);
}
