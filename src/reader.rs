//! Streaming CSV reader.
//!
//! [`Reader`] is the pull-based front of the pipeline: each call to
//! [`Reader::read_row`] drives the tokenizer field by field, infers each
//! field's type and hands back one finished [`Row`]. Nothing is read ahead
//! beyond the current row and the byte buffer, so memory stays flat no
//! matter how large the input is.
//!
//! ## Usage
//!
//! ```rust
//! use csvloader::{Dialect, Reader, Value};
//!
//! let data = "id,name\n1,Alice\n2,Bob\n";
//! let mut reader = Reader::from_slice(data.as_bytes(), Dialect::default()).unwrap();
//!
//! let names: Vec<_> = reader.header().unwrap().unwrap().iter().map(str::to_string).collect();
//! assert_eq!(names, vec!["id", "name"]);
//!
//! for row in reader.rows() {
//!     let row = row.unwrap();
//!     assert!(matches!(row[0], Value::Integer(_)));
//! }
//! ```
//!
//! ## Cancellation
//!
//! A host may stop pulling rows at any point. Dropping the reader (or the
//! iterator returned by [`Reader::into_rows`]) drops the buffer and the
//! underlying reader, which closes a file opened by [`Reader::from_path`].
//! [`Reader::into_inner`] hands the underlying reader back instead.
//!
//! ## Errors
//!
//! The first error ends the stream: later calls return `Ok(None)`. Rows
//! returned before the error stay valid.

use crate::dialect::{Dialect, MalformedRowPolicy};
use crate::error::{Error, Position, Result};
use crate::row::{Assembled, RowBuilder};
use crate::source::ByteSource;
use crate::tokenizer::{Token, Tokenizer};
use crate::{Dataset, Header, Row};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace, warn};

/// A streaming CSV reader over any [`Read`] implementation.
pub struct Reader<R> {
    source: ByteSource<R>,
    tokenizer: Tokenizer,
    builder: RowBuilder,
    malformed: MalformedRowPolicy,
    header: Option<Header>,
    header_pending: bool,
    rows_read: usize,
    rows_skipped: usize,
    finished: bool,
}

impl<R: Read> Reader<R> {
    /// Creates a reader for `reader` with the given dialect.
    ///
    /// No input is read until the header or the first row is requested.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDialect`] if the dialect fails validation.
    pub fn new(reader: R, dialect: Dialect) -> Result<Self> {
        dialect.validate()?;
        debug!(
            delimiter = ?dialect.delimiter,
            quote = ?dialect.quote,
            escape = ?dialect.escape,
            header = dialect.header,
            ragged_rows = ?dialect.ragged_rows,
            malformed_rows = ?dialect.malformed_rows,
            "starting csv parse"
        );
        Ok(Reader {
            source: ByteSource::with_capacity(reader, dialect.buffer_capacity),
            tokenizer: Tokenizer::new(&dialect),
            builder: RowBuilder::new(&dialect),
            malformed: dialect.malformed_rows,
            header: None,
            header_pending: dialect.header,
            rows_read: 0,
            rows_skipped: 0,
            finished: false,
        })
    }

    /// Returns the header, reading it first if needed.
    ///
    /// Returns `Ok(None)` when the dialect has no header or the input is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns any error met while reading the header row.
    pub fn header(&mut self) -> Result<Option<&Header>> {
        if self.header_pending {
            // The builder turns the first row into the header.
            if let Some(Assembled::Header(header)) = self.next_assembled()? {
                self.header = Some(header);
            }
            self.header_pending = false;
        }
        Ok(self.header.as_ref())
    }

    /// Reads the next data row.
    ///
    /// Returns `Ok(None)` at end of input, and after an error.
    ///
    /// # Errors
    ///
    /// Returns the first I/O, quoting, encoding or ragged row error; the
    /// reader is finished afterwards.
    pub fn read_row(&mut self) -> Result<Option<Row>> {
        self.header()?;
        match self.next_assembled()? {
            Some(Assembled::Row(row)) => {
                self.rows_read += 1;
                trace!(row = self.rows_read, fields = row.len(), "read row");
                Ok(Some(row))
            }
            Some(Assembled::Header(header)) => {
                self.header = Some(header);
                self.read_row()
            }
            None => Ok(None),
        }
    }

    /// Returns an iterator over the remaining rows.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows { reader: self }
    }

    /// Turns the reader into an iterator that owns it.
    pub fn into_rows(self) -> IntoRows<R> {
        IntoRows { reader: self }
    }

    /// Reads every remaining row into a [`Dataset`].
    ///
    /// # Errors
    ///
    /// Returns the first error met; rows read before it are dropped.
    pub fn into_dataset(mut self) -> Result<Dataset> {
        self.header()?;
        let mut dataset = Dataset::new(self.header.take(), Vec::new());
        while let Some(row) = self.read_row()? {
            dataset.push(row);
        }
        Ok(dataset)
    }

    /// Number of data rows returned so far.
    #[must_use]
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Number of rows dropped under [`MalformedRowPolicy::Skip`].
    #[must_use]
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    /// Current line, column and byte offset.
    #[must_use]
    pub fn position(&self) -> Position {
        self.tokenizer.position(&self.source)
    }

    /// Returns `true` once the input is exhausted or an error was returned.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Releases the underlying reader. Unread buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    // Reads one physical row, applying the malformed row policy. Fuses on
    // error and at end of input.
    fn next_assembled(&mut self) -> Result<Option<Assembled>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            match self.assemble() {
                Ok(Some(assembled)) => return Ok(Some(assembled)),
                Ok(None) => {
                    self.finished = true;
                    debug!(
                        rows = self.rows_read,
                        skipped = self.rows_skipped,
                        columns = ?self.builder.expected_columns(),
                        "finished csv parse"
                    );
                    return Ok(None);
                }
                Err(err) if err.is_row_local() && self.malformed == MalformedRowPolicy::Skip => {
                    warn!(
                        line = ?err.line(),
                        column = ?err.column(),
                        error = %err,
                        "skipping malformed row"
                    );
                    self.rows_skipped += 1;
                    if let Err(err) = self.recover(&err) {
                        self.finished = true;
                        return Err(err);
                    }
                }
                Err(err) => {
                    self.finished = true;
                    return Err(err);
                }
            }
        }
    }

    fn assemble(&mut self) -> Result<Option<Assembled>> {
        loop {
            match self.tokenizer.next_token(&mut self.source)? {
                Token::Field(field) => {
                    let bytes = self.tokenizer.bytes(&field);
                    self.builder.push_field(&field, bytes)?;
                }
                Token::EndOfRow => {
                    let start = self.tokenizer.row_start();
                    return self.builder.finish_row(start).map(Some);
                }
                Token::EndOfInput => return Ok(None),
            }
        }
    }

    // Drops what is left of the row that produced `err`.
    fn recover(&mut self, err: &Error) -> Result<()> {
        self.builder.discard_row();
        match err {
            // The field was tokenized fine; finish the row normally.
            Error::Encoding { .. } => loop {
                match self.tokenizer.next_token(&mut self.source) {
                    Ok(Token::Field(_)) => {}
                    Ok(Token::EndOfRow | Token::EndOfInput) => return Ok(()),
                    Err(e) if e.is_row_local() => return self.tokenizer.abandon_row(&mut self.source),
                    Err(e) => return Err(e),
                }
            },
            _ => self.tokenizer.abandon_row(&mut self.source),
        }
    }
}

impl Reader<File> {
    /// Opens the file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened, or
    /// [`Error::InvalidDialect`].
    pub fn from_path<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| Error::io(Position::START, &e))?;
        Reader::new(file, dialect)
    }
}

impl<'a> Reader<&'a [u8]> {
    /// Creates a reader over an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDialect`] if the dialect fails validation.
    pub fn from_slice(bytes: &'a [u8], dialect: Dialect) -> Result<Self> {
        Reader::new(bytes, dialect)
    }
}

/// Borrowing iterator over the rows of a [`Reader`].
pub struct Rows<'r, R> {
    reader: &'r mut Reader<R>,
}

impl<R: Read> Iterator for Rows<'_, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}

/// Owning iterator over the rows of a [`Reader`].
pub struct IntoRows<R> {
    reader: Reader<R>,
}

impl<R: Read> IntoRows<R> {
    /// Returns the header, reading it first if needed.
    ///
    /// # Errors
    ///
    /// Returns any error met while reading the header row.
    pub fn header(&mut self) -> Result<Option<&Header>> {
        self.reader.header()
    }

    pub fn into_reader(self) -> Reader<R> {
        self.reader
    }
}

impl<R: Read> Iterator for IntoRows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_row().transpose()
    }
}

impl<R: Read> std::iter::FusedIterator for Rows<'_, R> {}
impl<R: Read> std::iter::FusedIterator for IntoRows<R> {}
