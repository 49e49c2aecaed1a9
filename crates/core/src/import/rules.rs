//! Row-level violation and result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which rule a row violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    MissingRequiredField,
    InvalidFormat,
    DuplicateInFile,
    DuplicateInDatabase,
}

impl RowErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::InvalidFormat => "invalid_format",
            Self::DuplicateInFile => "duplicate_in_file",
            Self::DuplicateInDatabase => "duplicate_in_database",
        }
    }
}

/// A single field-level violation on one CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Spreadsheet row number: the header is row 1, the first data row is 2.
    pub row: usize,
    pub field: String,
    /// The offending value as it appeared in the file (untrimmed).
    pub value: String,
    pub message: String,
    pub kind: RowErrorKind,
}

/// A row that passed every rule, with trimmed values.
///
/// Optional fields left blank are `None`; keys are the schema's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRecord {
    pub row: usize,
    pub fields: BTreeMap<String, Option<String>>,
}

impl ValidatedRecord {
    /// Trimmed value of a field, `None` when blank or not in the schema.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// Convert into a typed record such as [`crate::records::Designation`].
    pub fn to_typed<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .filter_map(|(k, v)| {
                v.as_ref()
                    .map(|s| (k.clone(), serde_json::Value::String(s.clone())))
            })
            .collect();
        serde_json::from_value(serde_json::Value::Object(map))
    }
}

/// Counts for the "N valid / M invalid" banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub error_count: usize,
}
