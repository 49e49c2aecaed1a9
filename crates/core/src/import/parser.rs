//! CSV decoding into header-keyed raw rows.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{Encoding, UTF_8};

use crate::config::ImportConfig;
use crate::error::CoreError;

/// Spreadsheet row number of the first data row (the header is row 1).
pub const FIRST_DATA_ROW: usize = 2;

/// One data row as read from the file. Values are untrimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Spreadsheet row number (header is row 1).
    pub row: usize,
    pub values: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            values: HashMap::new(),
        }
    }

    /// Builder used by tests and callers that already hold parsed data.
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.values.insert(column.to_string(), value.to_string());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// Row numbers are assigned in order, starting at [`FIRST_DATA_ROW`].
pub fn number_rows<I>(rows: I) -> Vec<RawRow>
where
    I: IntoIterator<Item = HashMap<String, String>>,
{
    rows.into_iter()
        .enumerate()
        .map(|(index, values)| RawRow {
            row: index + FIRST_DATA_ROW,
            values,
        })
        .collect()
}

/// Header plus data rows of one file.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Read and parse a CSV file from disk.
pub fn parse_csv_file(path: &Path, config: &ImportConfig) -> Result<ParsedCsv, CoreError> {
    file_size(std::fs::metadata(path)?.len(), config)?;
    let data = std::fs::read(path)?;
    parse_csv(&data, config)
}

/// Parse raw CSV bytes. The first record is the header.
///
/// Fails on non-UTF-8 input, a missing or duplicated header, reader errors,
/// an unterminated quoted field, and when the configured size or row limits
/// are exceeded.
pub fn parse_csv(data: &[u8], config: &ImportConfig) -> Result<ParsedCsv, CoreError> {
    check_size(data.len(), config)?;

    let text = decode_utf8(data)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header_record = reader.headers()?;
    let mut last_start = header_record.position().cloned();
    let headers: Vec<String> = header_record.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CoreError::Parse("CSV header row is empty".into()));
    }
    if let Some(dup) = duplicate_header(&headers) {
        return Err(CoreError::Parse(format!("Duplicate column '{dup}' in CSV header")));
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut row = FIRST_DATA_ROW;

    // Empty lines are skipped by the reader; every other record is a row,
    // even if all of its cells are blank.
    while reader.read_record(&mut record)? {
        if rows.len() == config.max_rows {
            return Err(CoreError::TooManyRows {
                rows: rows.len() + 1 + count_remaining(&mut reader)?,
                max: config.max_rows,
            });
        }

        last_start = record.position().cloned();
        let mut raw = RawRow::new(row);
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = record.get(i) {
                raw.values.insert(header.clone(), value.to_string());
            }
        }
        rows.push(raw);
        row += 1;
    }

    // The reader closes an open quote at end of input, so check the tail.
    let (start, line) = last_start.map_or((0, 1), |p| (p.byte(), p.line()));
    let tail = usize::try_from(start)
        .ok()
        .and_then(|start| text.as_bytes().get(start..))
        .unwrap_or_default();
    if ends_inside_quotes(tail, config.delimiter) {
        return Err(CoreError::Parse(format!(
            "Unterminated quoted field in the record starting on line {line}"
        )));
    }

    Ok(ParsedCsv { headers, rows })
}

fn duplicate_header(headers: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .map(String::as_str)
        .filter(|h| !h.is_empty())
        .find(|h| !seen.insert(*h))
}

/// File length from metadata, checked against the size limit.
fn file_size(len: u64, config: &ImportConfig) -> Result<usize, CoreError> {
    let size = usize::try_from(len).map_err(|_| CoreError::FileTooLarge {
        size: usize::MAX,
        max: config.max_file_bytes,
    })?;
    check_size(size, config)?;
    Ok(size)
}

fn check_size(size: usize, config: &ImportConfig) -> Result<(), CoreError> {
    if size > config.max_file_bytes {
        return Err(CoreError::FileTooLarge {
            size,
            max: config.max_file_bytes,
        });
    }
    Ok(())
}

/// Strict UTF-8 decode with BOM removal.
fn decode_utf8(data: &[u8]) -> Result<Cow<'_, str>, CoreError> {
    let body = match Encoding::for_bom(data) {
        Some((encoding, bom_len)) if encoding == UTF_8 => &data[bom_len..],
        Some((encoding, _)) => {
            return Err(CoreError::Parse(format!(
                "Unsupported encoding {}; save the file as UTF-8",
                encoding.name()
            )))
        }
        None => data,
    };
    UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| CoreError::Parse("File is not valid UTF-8".into()))
}

/// Whether `text` ends in the middle of a quoted field. A quote only opens a
/// field at its start; inside quotes `""` is an escaped quote.
fn ends_inside_quotes(text: &[u8], delimiter: u8) -> bool {
    let mut bytes = text.iter().copied().peekable();
    let mut in_quotes = false;
    let mut field_start = true;
    while let Some(b) = bytes.next() {
        if in_quotes {
            if b == b'"' {
                if bytes.peek() == Some(&b'"') {
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match b {
            b'"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            b'\n' | b'\r' => field_start = true,
            _ if b == delimiter => field_start = true,
            _ => field_start = false,
        }
    }
    in_quotes
}

fn count_remaining<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<usize, CoreError> {
    let mut record = StringRecord::new();
    let mut count = 0;
    while reader.read_record(&mut record)? {
        count += 1;
    }
    Ok(count)
}
