//! End-to-end import: parse → header check → validate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::parser::{parse_csv, parse_csv_file, ParsedCsv};
use super::schema::{EntityKind, FieldSchema};
use super::validator::{validate_rows, ExistingRecords, ImportOutcome};
use crate::config::ImportConfig;
use crate::error::CoreError;

/// Columns that do not line up with the entity schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderReport {
    /// Schema columns absent from the header.
    pub missing: Vec<String>,
    /// Header columns the schema does not know; their values are ignored.
    pub unknown: Vec<String>,
}

impl HeaderReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

/// Everything the upload dialog needs after one validation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub entity: EntityKind,
    pub headers: HeaderReport,
    pub outcome: ImportOutcome,
}

pub fn check_headers(schema: &FieldSchema, headers: &[String]) -> HeaderReport {
    let missing = schema
        .fields
        .iter()
        .filter(|f| !headers.iter().any(|h| *h == f.name))
        .map(|f| f.name.clone())
        .collect();
    let unknown = headers
        .iter()
        .filter(|h| !h.is_empty() && schema.field(h).is_none())
        .cloned()
        .collect();
    HeaderReport { missing, unknown }
}

/// Validate an uploaded CSV for `kind` against an existing-records snapshot.
///
/// Parse-level failures abort with no partial output. Row-level problems
/// are returned in the report.
pub fn import_csv(
    kind: EntityKind,
    data: &[u8],
    existing: &ExistingRecords,
    config: &ImportConfig,
) -> Result<ImportReport, CoreError> {
    let parsed = parse_csv(data, config)?;
    Ok(process(kind, parsed, existing))
}

/// Same as [`import_csv`], reading the file from disk.
pub fn import_csv_file(
    kind: EntityKind,
    path: &Path,
    existing: &ExistingRecords,
    config: &ImportConfig,
) -> Result<ImportReport, CoreError> {
    let parsed = parse_csv_file(path, config)?;
    Ok(process(kind, parsed, existing))
}

fn process(kind: EntityKind, parsed: ParsedCsv, existing: &ExistingRecords) -> ImportReport {
    let schema = kind.schema();

    let headers = check_headers(&schema, &parsed.headers);
    if !headers.is_clean() {
        tracing::warn!(
            entity = %kind,
            missing = ?headers.missing,
            unknown = ?headers.unknown,
            "CSV header does not match import schema"
        );
    }

    let outcome = validate_rows(&schema, &parsed.rows, existing);
    let summary = outcome.summary();

    tracing::info!(
        entity = %kind,
        total = summary.total_rows,
        valid = summary.valid_rows,
        invalid = summary.invalid_rows,
        errors = summary.error_count,
        "CSV import validated"
    );

    ImportReport {
        entity: kind,
        headers,
        outcome,
    }
}
