//! Record tokenizer: delimited text into rows of fields.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// One tokenized line of the source, fields in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based source line the record started on (0 when built by hand)
    line: u64,
    fields: Vec<String>,
}

impl Row {
    pub fn new<S: Into<String>>(line: u64, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    fn from_record(record: &StringRecord) -> Self {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        Self::new(line, record.iter())
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First field, if the row has one.
    pub fn first(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// Field at `position`.
    ///
    /// Out-of-range access is a caller bug, not an empty value, so it is
    /// reported as [`DomainError::ValueNotFound`].
    pub fn field(&self, position: usize) -> DomainResult<&str> {
        self.fields
            .get(position)
            .map(String::as_str)
            .ok_or(DomainError::ValueNotFound {
                position,
                len: self.fields.len(),
            })
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

/// Split `text` into rows.
///
/// Fields are split on `delimiter`; a double-quoted field may contain the
/// delimiter. Rows may have differing field counts, nothing is trimmed and
/// no header row is assumed. Blank lines yield no row.
#[instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn tokenize(text: &str, delimiter: u8) -> DomainResult<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DomainError::Tokenize {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        rows.push(Row::from_record(&record));
    }
    debug!("tokenize: {} rows", rows.len());
    Ok(rows)
}
