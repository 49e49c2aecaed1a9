use validator::Validate;

use crate::error::CoreError;

/// Default maximum upload size: 5 MiB.
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Default maximum number of data rows per import.
pub const DEFAULT_MAX_ROWS: usize = 5_000;

/// Default column delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Limits and parsing options for CSV bulk imports.
///
/// All fields have defaults suitable for the master-data screens. Override
/// via environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ImportConfig {
    /// Reject uploads larger than this many bytes.
    #[validate(range(min = 1))]
    pub max_file_bytes: usize,
    /// Reject files with more data rows than this (header excluded).
    #[validate(range(min = 1))]
    pub max_rows: usize,
    /// Column delimiter byte.
    pub delimiter: u8,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_rows: DEFAULT_MAX_ROWS,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ImportConfig {
    /// Load configuration from the process environment (after reading a
    /// `.env` file if one is present).
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `CSV_IMPORT_MAX_BYTES` | `5242880` |
    /// | `CSV_IMPORT_MAX_ROWS`  | `5000`    |
    /// | `CSV_IMPORT_DELIMITER` | `,`       |
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_file_bytes = match lookup("CSV_IMPORT_MAX_BYTES") {
            Some(raw) => parse_usize("CSV_IMPORT_MAX_BYTES", &raw)?,
            None => defaults.max_file_bytes,
        };

        let max_rows = match lookup("CSV_IMPORT_MAX_ROWS") {
            Some(raw) => parse_usize("CSV_IMPORT_MAX_ROWS", &raw)?,
            None => defaults.max_rows,
        };

        let delimiter = match lookup("CSV_IMPORT_DELIMITER") {
            Some(raw) => parse_delimiter(&raw)?,
            None => defaults.delimiter,
        };

        let config = Self {
            max_file_bytes,
            max_rows,
            delimiter,
        };
        config
            .validate()
            .map_err(|e| CoreError::Validation(format!("Invalid import config: {e}")))?;
        Ok(config)
    }
}

fn parse_usize(key: &str, raw: &str) -> Result<usize, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("{key} must be a positive integer, got '{raw}'")))
}

fn parse_delimiter(raw: &str) -> Result<u8, CoreError> {
    // Allow a literal tab to be spelled out in .env files.
    if raw == "\\t" || raw.eq_ignore_ascii_case("tab") {
        return Ok(b'\t');
    }
    match raw.as_bytes() {
        [b] if b.is_ascii() && !b.is_ascii_alphanumeric() => Ok(*b),
        _ => Err(CoreError::Validation(format!(
            "CSV_IMPORT_DELIMITER must be a single punctuation character, got '{raw}'"
        ))),
    }
}
