//! CSV export, downloadable templates and error reports.
//!
//! Everything here is a pure record-list → CSV text transform; nothing is
//! validated on the way out.

use serde::Serialize;
use serde_json::Value;

use super::rules::RowError;
use super::schema::{EntityKind, FieldSchema};
use crate::csv_writer::CsvBuffer;
use crate::error::CoreError;

/// Header of the downloadable error report.
pub const ERROR_REPORT_HEADER: [&str; 4] = ["row", "field", "value", "message"];

/// Serialize persisted records to CSV using the schema's column order.
///
/// Fields missing from a record (or `null`) are written as empty cells.
pub fn export_csv<T: Serialize>(schema: &FieldSchema, records: &[T]) -> Result<String, CoreError> {
    let columns = schema.column_names();
    let mut out = CsvBuffer::new();
    out.write_row(&columns)?;

    for record in records {
        let value = serde_json::to_value(record)
            .map_err(|e| CoreError::Internal(format!("Record serialization failed: {e}")))?;
        let Value::Object(map) = value else {
            return Err(CoreError::Internal(format!(
                "Cannot export {} record that is not an object",
                schema.entity
            )));
        };
        let cells: Vec<String> = columns
            .iter()
            .map(|column| map.get(*column).map(cell_text).unwrap_or_default())
            .collect();
        out.write_row(&cells)?;
    }

    out.finish()
}

/// Render the per-row error list as a downloadable CSV.
pub fn error_report_csv(errors: &[RowError]) -> Result<String, CoreError> {
    let mut out = CsvBuffer::new();
    out.write_row(ERROR_REPORT_HEADER)?;
    for err in errors {
        out.write_row([
            err.row.to_string().as_str(),
            err.field.as_str(),
            err.value.as_str(),
            err.message.as_str(),
        ])?;
    }
    out.finish()
}

/// Static example CSV users can download, fill in and re-import.
pub fn template_csv(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Degree => {
            "name,full_form\n\
             B.Tech,Bachelor of Technology\n\
             MBA,Master of Business Administration\n\
             B.Sc,\n"
        }
        EntityKind::Designation => {
            "name\n\
             Software Engineer\n\
             Senior Software Engineer\n\
             Technical Lead\n"
        }
        EntityKind::Department => {
            "name,purpose\n\
             Engineering,Builds and maintains client and internal products\n\
             Human Resources,\"Hiring, onboarding and employee relations\"\n\
             Finance,\n"
        }
        EntityKind::JobRole => {
            "name,responsibilities\n\
             Backend Developer,Designs and implements server-side services\n\
             QA Engineer,\"Writes test plans, automates regression suites\"\n\
             Scrum Master,\n"
        }
        EntityKind::JobType => {
            "name,color_code\n\
             Full Time,#1A2B3C\n\
             Contract,#F59E0B\n\
             Internship,\n"
        }
    }
}

/// Suggested download file name for a template.
pub fn template_file_name(kind: EntityKind) -> String {
    format!("{}_template.csv", kind.as_str())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
