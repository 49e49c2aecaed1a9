//! In-memory CSV writer shared by the export and report modules.

use crate::error::CoreError;

/// Buffers CSV output and returns it as a `String`.
pub struct CsvBuffer {
    writer: csv::Writer<Vec<u8>>,
}

impl CsvBuffer {
    pub fn new() -> Self {
        Self {
            writer: csv::Writer::from_writer(Vec::new()),
        }
    }

    pub fn write_row<I, T>(&mut self, cells: I) -> Result<(), CoreError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(cells)
            .map_err(|e| CoreError::Internal(format!("CSV write failed: {e}")))
    }

    pub fn finish(self) -> Result<String, CoreError> {
        let bytes = self
            .writer
            .into_inner()
            .map_err(|e| CoreError::Internal(format!("CSV flush failed: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| CoreError::Internal(format!("CSV output not UTF-8: {e}")))
    }
}

impl Default for CsvBuffer {
    fn default() -> Self {
        Self::new()
    }
}
