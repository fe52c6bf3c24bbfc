//! Rows and row assembly.
//!
//! [`Row`] is an ordered list of [`Value`]s. The crate-internal
//! `RowBuilder` collects the fields of one physical row, turns the first
//! row into the [`Header`] when the dialect asks for one, and applies the
//! [`RaggedRowPolicy`] to every data row.

use crate::dialect::{Dialect, RaggedRowPolicy};
use crate::error::{Error, Position, Result};
use crate::infer::Inferencer;
use crate::tokenizer::RawField;
use crate::{Header, Value};
use serde::Serialize;
use std::mem;
use std::ops::Index;
use std::str::Utf8Error;
use tracing::debug;

/// One data row.
///
/// # Examples
///
/// ```rust
/// use csvloader::{Row, Value};
///
/// let row = Row::new(vec![Value::from(1), Value::Null, Value::from("x")]);
/// assert_eq!(row.len(), 3);
/// assert_eq!(row[0], Value::Integer(1));
/// assert!(row.get(1).unwrap().is_null());
/// assert_eq!(row.get(3), None);
/// ```
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

impl IntoIterator for Row {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// What a finished physical row turned into.
#[derive(Debug, PartialEq)]
pub(crate) enum Assembled {
    Header(Header),
    Row(Row),
}

pub(crate) struct RowBuilder {
    inferencer: Inferencer,
    policy: RaggedRowPolicy,
    expecting_header: bool,
    expected: Option<usize>,
    values: Vec<Value>,
    names: Vec<String>,
}

impl RowBuilder {
    pub fn new(dialect: &Dialect) -> Self {
        RowBuilder {
            inferencer: Inferencer::new(dialect),
            policy: dialect.ragged_rows,
            expecting_header: dialect.header,
            expected: None,
            values: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Adds one field of the current row. Header fields are kept as text,
    /// data fields go through type inference.
    pub fn push_field(&mut self, field: &RawField, bytes: &[u8]) -> Result<()> {
        if self.expecting_header {
            let name = std::str::from_utf8(bytes).map_err(|e| encoding_error(field, &e))?;
            self.names.push(name.to_owned());
        } else {
            let value = self
                .inferencer
                .infer(bytes, field.quoted)
                .map_err(|e| encoding_error(field, &e))?;
            self.values.push(value);
        }
        Ok(())
    }

    /// Completes the current row, which started at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RaggedRow`] when the row length differs from the
    /// column count and the policy does not cover the difference.
    pub fn finish_row(&mut self, start: Position) -> Result<Assembled> {
        if self.expecting_header {
            self.expecting_header = false;
            let header = Header::new(mem::take(&mut self.names));
            self.expected = Some(header.len());
            debug!(columns = header.len(), line = start.line, "captured header");
            return Ok(Assembled::Header(header));
        }

        let mut values = mem::take(&mut self.values);
        let found = values.len();
        match self.expected {
            None => self.expected = Some(found),
            Some(expected) if expected != found => match self.policy {
                RaggedRowPolicy::Pad if found < expected => {
                    debug!(line = start.line, expected, found, "padding short row");
                    values.resize(expected, Value::Null);
                }
                RaggedRowPolicy::Truncate if found > expected => {
                    debug!(line = start.line, expected, found, "truncating long row");
                    values.truncate(expected);
                }
                _ => {
                    let column = expected.min(found) + 1;
                    let position = Position::new(start.line, column, start.byte_offset);
                    return Err(Error::ragged_row(position, expected, found));
                }
            },
            Some(_) => {}
        }

        self.values = Vec::with_capacity(values.len());
        Ok(Assembled::Row(Row::new(values)))
    }

    /// Forgets the fields collected for the current row.
    pub fn discard_row(&mut self) {
        self.values.clear();
        self.names.clear();
    }

    /// Column count every data row must match, once known.
    pub fn expected_columns(&self) -> Option<usize> {
        self.expected
    }
}

fn encoding_error(field: &RawField, err: &Utf8Error) -> Error {
    let offset = field.source_offset(err.valid_up_to());
    Error::encoding(Position::new(
        field.position.line,
        field.position.column,
        offset,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{row, ErrorKind};

    fn raw(len: usize, quoted: bool, column: usize) -> RawField {
        RawField {
            span: 0..len,
            quoted,
            escaped: false,
            position: Position::new(1, column, 0),
            dropped: Vec::new(),
        }
    }

    fn build(builder: &mut RowBuilder, fields: &[&str], line: usize) -> Result<Assembled> {
        for (i, text) in fields.iter().enumerate() {
            builder.push_field(&raw(text.len(), false, i + 1), text.as_bytes())?;
        }
        builder.finish_row(Position::new(line, 1, 0))
    }

    #[test]
    fn test_header_then_rows() {
        let mut builder = RowBuilder::new(&Dialect::default());
        let header = build(&mut builder, &["a", "1", "c"], 1).unwrap();
        assert_eq!(
            header,
            Assembled::Header(Header::new(vec!["a".into(), "1".into(), "c".into()]))
        );
        assert_eq!(builder.expected_columns(), Some(3));

        let row = build(&mut builder, &["1", "", "x"], 2).unwrap();
        assert_eq!(row, Assembled::Row(row![1, null, "x"]));
    }

    #[test]
    fn test_first_row_sets_width_without_header() {
        let mut builder = RowBuilder::new(&Dialect::new().with_header(false));
        assert_eq!(builder.expected_columns(), None);
        build(&mut builder, &["1", "2"], 1).unwrap();
        assert_eq!(builder.expected_columns(), Some(2));
        let err = build(&mut builder, &["1"], 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RaggedRow);
    }

    #[test]
    fn test_ragged_row_error() {
        let mut builder = RowBuilder::new(&Dialect::default());
        build(&mut builder, &["a", "b", "c"], 1).unwrap();
        let err = build(&mut builder, &["1", "2"], 2).unwrap_err();
        match err {
            Error::RaggedRow {
                position,
                expected,
                found,
            } => {
                assert_eq!(position.line, 2);
                assert_eq!(position.column, 3);
                assert_eq!((expected, found), (3, 2));
            }
            other => panic!("Expected ragged row, got {:?}", other),
        }
        // The failed row leaves nothing behind.
        let row = build(&mut builder, &["4", "5", "6"], 3).unwrap();
        assert_eq!(row, Assembled::Row(row![4, 5, 6]));
    }

    #[test]
    fn test_pad_policy() {
        let dialect = Dialect::new().with_ragged_rows(RaggedRowPolicy::Pad);
        let mut builder = RowBuilder::new(&dialect);
        build(&mut builder, &["a", "b", "c"], 1).unwrap();
        let row = build(&mut builder, &["1", "2"], 2).unwrap();
        assert_eq!(row, Assembled::Row(row![1, 2, null]));
        assert!(build(&mut builder, &["1", "2", "3", "4"], 3).is_err());
    }

    #[test]
    fn test_truncate_policy() {
        let dialect = Dialect::new().with_ragged_rows(RaggedRowPolicy::Truncate);
        let mut builder = RowBuilder::new(&dialect);
        build(&mut builder, &["a", "b"], 1).unwrap();
        let row = build(&mut builder, &["1", "2", "3"], 2).unwrap();
        assert_eq!(row, Assembled::Row(row![1, 2]));
        assert!(build(&mut builder, &["1"], 3).is_err());
    }

    #[test]
    fn test_encoding_error_position() {
        let mut builder = RowBuilder::new(&Dialect::new().with_header(false));
        let mut field = raw(4, true, 2);
        field.position = Position::new(5, 2, 100);
        let err = builder.push_field(&field, b"ab\xFFc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(err.position(), Some(Position::new(5, 2, 103)));

        // Source `"a""\xFF"`: the doubled quote shifts the bad byte by one.
        let mut field = raw(3, true, 1);
        field.dropped = vec![1];
        let err = builder.push_field(&field, b"a\"\xFF").unwrap_err();
        assert_eq!(err.byte_offset(), Some(4));
    }

    #[test]
    fn test_invalid_header_name() {
        let mut builder = RowBuilder::new(&Dialect::default());
        let err = builder.push_field(&raw(1, false, 1), b"\xFF").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_discard_row() {
        let mut builder = RowBuilder::new(&Dialect::new().with_header(false));
        builder.push_field(&raw(1, false, 1), b"1").unwrap();
        builder.discard_row();
        let row = build(&mut builder, &["7"], 2).unwrap();
        assert_eq!(row, Assembled::Row(row![7]));
    }
}
