/// Failures that abort a whole import or export operation.
///
/// Bad data inside a CSV row is never reported through this type; see
/// [`crate::import::rules::RowError`] for row-level violations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Failed to parse CSV: {0}")]
    Parse(String),

    #[error("File is too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("Too many rows: {rows} (max {max})")]
    TooManyRows { rows: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => Self::Parse(format!("line {}: {err}", pos.line())),
            None => Self::Parse(err.to_string()),
        }
    }
}
