//! Row validator: pure logic, no I/O and no state between calls.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::parser::RawRow;
use super::rules::{ImportSummary, RowError, RowErrorKind, ValidatedRecord};
use super::schema::{FieldDef, FieldSchema};
use crate::records::Named;

/// Trim and lowercase a value for uniqueness comparisons.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Existing records snapshot
// ---------------------------------------------------------------------------

/// Normalized unique-key values already persisted, taken before the import
/// starts. Keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct ExistingRecords {
    by_field: HashMap<String, HashSet<String>>,
}

impl ExistingRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of existing `name` values.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new().with_values("name", names)
    }

    /// Snapshot built from already-persisted typed records.
    pub fn from_records<T: Named>(records: &[T]) -> Self {
        Self::from_names(records.iter().map(Named::name))
    }

    pub fn with_values<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.by_field.entry(field.to_string()).or_default();
        set.extend(values.into_iter().map(|v| normalize_key(v.as_ref())));
        self
    }

    pub fn contains(&self, field: &str, normalized: &str) -> bool {
        self.by_field
            .get(field)
            .is_some_and(|set| set.contains(normalized))
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.values().all(HashSet::is_empty)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of validating every row of one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub valid: Vec<ValidatedRecord>,
    /// In row order; within a row, in rule-check order.
    pub errors: Vec<RowError>,
    /// Rows passed to the validator, counted as they are checked.
    #[serde(default)]
    pub total_rows: usize,
    /// Rows that produced at least one error.
    #[serde(default)]
    pub invalid_rows: usize,
}

impl ImportOutcome {
    /// Number of input rows that produced at least one error. Rows are
    /// counted, not row numbers, so repeated numbers are each counted.
    pub fn invalid_row_count(&self) -> usize {
        self.invalid_rows
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            total_rows: self.total_rows,
            valid_rows: self.valid.len(),
            invalid_rows: self.invalid_rows,
            error_count: self.errors.len(),
        }
    }

    /// Errors grouped by row number, for the per-row breakdown table.
    pub fn errors_by_row(&self) -> BTreeMap<usize, Vec<&RowError>> {
        let mut grouped: BTreeMap<usize, Vec<&RowError>> = BTreeMap::new();
        for err in &self.errors {
            grouped.entry(err.row).or_default().push(err);
        }
        grouped
    }

    /// Convert the valid records into typed submission records.
    pub fn typed<T>(&self) -> Result<Vec<T>, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        self.valid.iter().map(ValidatedRecord::to_typed).collect()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate rows in order against `schema`.
///
/// Every row ends up either in `valid` or contributes one or more entries to
/// `errors`. Malformed data never fails the call.
pub fn validate_rows<'a, I>(
    schema: &FieldSchema,
    rows: I,
    existing: &ExistingRecords,
) -> ImportOutcome
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut outcome = ImportOutcome::default();
    let mut seen: HashMap<&str, HashSet<String>> = HashMap::new();

    for raw in rows {
        let errors = check_row(schema, raw, existing, &mut seen);
        outcome.total_rows += 1;
        if errors.is_empty() {
            outcome.valid.push(build_record(schema, raw));
        } else {
            tracing::debug!(
                entity = %schema.entity,
                row = raw.row,
                errors = errors.len(),
                "CSV row rejected"
            );
            outcome.invalid_rows += 1;
            outcome.errors.extend(errors);
        }
    }

    outcome
}

fn check_row<'s>(
    schema: &'s FieldSchema,
    raw: &RawRow,
    existing: &ExistingRecords,
    seen: &mut HashMap<&'s str, HashSet<String>>,
) -> Vec<RowError> {
    let mut errors = Vec::new();

    // 1. Required fields.
    for field in schema.fields.iter().filter(|f| f.required) {
        if trimmed(raw, field).is_empty() {
            errors.push(row_error(
                raw,
                field,
                RowErrorKind::MissingRequiredField,
                format!("{} is required", field.label),
            ));
        }
    }

    // 2. Format constraints, skipped for blank values.
    for field in &schema.fields {
        let Some(format) = field.format else {
            continue;
        };
        let value = trimmed(raw, field);
        if !value.is_empty() && !format.matches(value) {
            errors.push(row_error(
                raw,
                field,
                RowErrorKind::InvalidFormat,
                format!("Invalid {} \"{value}\". {}", field.label.to_lowercase(), format.hint()),
            ));
        }
    }

    // 3. Uniqueness: existing records first, then earlier rows of this file.
    for field in schema.unique_fields() {
        let value = trimmed(raw, field);
        if value.is_empty() {
            continue;
        }
        let key = normalize_key(value);
        let earlier = seen.entry(field.name.as_str()).or_default();

        if existing.contains(&field.name, &key) {
            errors.push(row_error(
                raw,
                field,
                RowErrorKind::DuplicateInDatabase,
                format!("{} \"{value}\" already exists", schema.entity.title()),
            ));
        } else if earlier.contains(&key) {
            errors.push(row_error(
                raw,
                field,
                RowErrorKind::DuplicateInFile,
                format!("Duplicate {} \"{value}\" found in CSV", schema.entity.noun()),
            ));
        }
        earlier.insert(key);
    }

    errors
}

fn trimmed<'r>(raw: &'r RawRow, field: &FieldDef) -> &'r str {
    raw.get(&field.name).map(str::trim).unwrap_or("")
}

fn row_error(raw: &RawRow, field: &FieldDef, kind: RowErrorKind, message: String) -> RowError {
    RowError {
        row: raw.row,
        field: field.name.clone(),
        value: raw.get(&field.name).unwrap_or("").to_string(),
        message,
        kind,
    }
}

fn build_record(schema: &FieldSchema, raw: &RawRow) -> ValidatedRecord {
    let fields = schema
        .fields
        .iter()
        .map(|field| {
            let value = trimmed(raw, field);
            let value = (!value.is_empty()).then(|| value.to_string());
            (field.name.clone(), value)
        })
        .collect();
    ValidatedRecord {
        row: raw.row,
        fields,
    }
}
