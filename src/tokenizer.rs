//! Field-level CSV tokenizer.
//!
//! The tokenizer pulls bytes from a [`ByteSource`] and produces one [`Token`]
//! per call: a completed field, the end of a row, or the end of input. Fields
//! are unescaped into a scratch buffer owned by the tokenizer; a [`RawField`]
//! is only a span into that buffer and is invalidated by the next call.
//!
//! ## Quoting
//!
//! Each field is read by a small state machine:
//!
//! ```text
//! FieldStart --quote--> Quoted --quote--> QuotedQuote --quote--> Quoted (literal ")
//!     |                  |  ^                 |
//!     |               escape |                +--delimiter/terminator/EOF--> done
//!     |                  v  |                 +--blank (trim)--> FieldEnd
//!     |              QuotedEscape             +--other--> InvalidQuoting
//!     +--other--> Unquoted --delimiter/terminator/EOF--> done
//! ```
//!
//! Delimiters and line breaks inside quotes are data. A quote byte inside an
//! unquoted field is data as well.

use crate::dialect::{Dialect, Terminator};
use crate::error::{Error, Position, Result};
use crate::source::ByteSource;
use std::io::Read;
use std::ops::Range;

/// A completed field, as a span of the tokenizer's scratch buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawField {
    pub span: Range<usize>,
    /// The field was enclosed in quotes.
    pub quoted: bool,
    /// The field contained an escaped quote or escaped byte.
    pub escaped: bool,
    /// Where the field's first byte is.
    pub position: Position,
    /// Scratch indices that had one source byte dropped right before them,
    /// such as an escape character or the first quote of a doubled pair.
    pub dropped: Vec<usize>,
}

impl RawField {
    /// Source byte offset of the scratch byte at `index`.
    pub fn source_offset(&self, index: usize) -> u64 {
        let dropped = self.dropped.iter().take_while(|&&at| at <= index).count();
        self.position.byte_offset + u64::from(self.quoted) + (index + dropped) as u64
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Field(RawField),
    EndOfRow,
    EndOfInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuotedEscape,
    QuotedQuote,
    FieldEnd,
}

/// What stopped a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Boundary {
    Delimiter,
    LineBreak,
    EndOfInput,
}

pub(crate) struct Tokenizer {
    delimiter: u8,
    quote: u8,
    escape: Option<u8>,
    terminator: Terminator,
    trim: bool,
    scratch: Vec<u8>,
    // Boundary consumed after the last field and not yet reported.
    pending: Option<Boundary>,
    in_row: bool,
    line: usize,
    column: usize,
    row_start: Position,
}

impl Tokenizer {
    /// Creates a tokenizer for a validated dialect.
    pub fn new(dialect: &Dialect) -> Self {
        Tokenizer {
            delimiter: dialect.delimiter_byte(),
            quote: dialect.quote_byte(),
            escape: dialect.escape_byte(),
            terminator: dialect.terminator,
            trim: dialect.trim,
            scratch: Vec::with_capacity(64),
            pending: None,
            in_row: false,
            line: 1,
            column: 0,
            row_start: Position::START,
        }
    }

    /// Reads the next token.
    ///
    /// A blank line is a row with one empty field. End of input at the
    /// start of a row ends the input without producing an extra row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuoting`], [`Error::UnterminatedQuote`] or
    /// [`Error::Io`].
    pub fn next_token<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<Token> {
        match self.pending.take() {
            Some(Boundary::LineBreak) => {
                self.in_row = false;
                return Ok(Token::EndOfRow);
            }
            Some(Boundary::EndOfInput) => {
                self.pending = Some(Boundary::EndOfInput);
                if self.in_row {
                    self.in_row = false;
                    return Ok(Token::EndOfRow);
                }
                return Ok(Token::EndOfInput);
            }
            Some(Boundary::Delimiter) | None => {}
        }

        if !self.in_row {
            // A line break here is a blank line: one empty field.
            if self.peek_byte(source)?.is_none() {
                self.pending = Some(Boundary::EndOfInput);
                return Ok(Token::EndOfInput);
            }
            self.in_row = true;
            self.column = 0;
            self.row_start = Position::new(self.line, 1, source.offset());
        }

        self.column += 1;
        let (field, boundary) = self.read_field(source)?;
        if boundary != Boundary::Delimiter {
            self.pending = Some(boundary);
        }
        Ok(Token::Field(field))
    }

    /// The bytes of a field returned by the latest call to
    /// [`Tokenizer::next_token`].
    #[inline]
    pub fn bytes(&self, field: &RawField) -> &[u8] {
        &self.scratch[field.span.clone()]
    }

    /// Position of the first byte of the current (or last) row.
    pub fn row_start(&self) -> Position {
        self.row_start
    }

    /// Current parser state as a position.
    pub fn position<R>(&self, source: &ByteSource<R>) -> Position
    where
        R: Read,
    {
        self.position_at(source.offset())
    }

    /// Drops the rest of the current row after a quoting error.
    ///
    /// Quotes in the rest of the broken field pair up, so a line break
    /// between such a pair does not end the row. Later fields follow the
    /// usual rule: a quote opens quoting only at the start of a field.
    pub fn abandon_row<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<()> {
        match self.pending {
            Some(Boundary::LineBreak) => self.pending = None,
            Some(Boundary::EndOfInput) => {}
            Some(Boundary::Delimiter) | None => self.skip_rest_of_row(source)?,
        }
        self.in_row = false;
        Ok(())
    }

    fn skip_rest_of_row<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<()> {
        let mut broken_field = true;
        let mut field_start = false;
        let mut in_quotes = false;
        loop {
            let Some(byte) = self.next_byte(source)? else {
                self.pending = Some(Boundary::EndOfInput);
                return Ok(());
            };

            if in_quotes {
                if Some(byte) == self.escape {
                    if let Some(escaped) = self.next_byte(source)? {
                        self.count_quoted_line_break(source, escaped)?;
                    }
                } else if byte == self.quote {
                    if self.peek_byte(source)? == Some(self.quote) {
                        self.next_byte(source)?;
                    } else {
                        in_quotes = false;
                    }
                } else {
                    self.count_quoted_line_break(source, byte)?;
                }
            } else if byte == self.delimiter {
                broken_field = false;
                field_start = true;
            } else if self.terminator.is_line_break(byte) {
                self.consume_line_break(source, byte)?;
                self.pending = None;
                return Ok(());
            } else if field_start && self.trim && is_blank(byte) {
                // leading blanks
            } else {
                if byte == self.quote && (field_start || broken_field) {
                    in_quotes = true;
                }
                field_start = false;
            }
        }
    }

    fn read_field<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<(RawField, Boundary)> {
        self.scratch.clear();
        let start = self.position(source);
        let mut state = State::FieldStart;
        let mut quoted = false;
        let mut escaped = false;
        let mut dropped = Vec::new();

        let boundary = loop {
            let Some(byte) = self.next_byte(source)? else {
                match state {
                    State::Quoted | State::QuotedEscape => {
                        return Err(Error::unterminated_quote(self.position(source)));
                    }
                    _ => break Boundary::EndOfInput,
                }
            };

            match state {
                State::FieldStart => {
                    if byte == self.quote {
                        quoted = true;
                        state = State::Quoted;
                    } else if let Some(boundary) = self.boundary(source, byte)? {
                        break boundary;
                    } else if self.trim && is_blank(byte) {
                        dropped.push(0);
                    } else {
                        self.scratch.push(byte);
                        self.extend_unquoted(source)?;
                        state = State::Unquoted;
                    }
                }
                State::Unquoted => {
                    if let Some(boundary) = self.boundary(source, byte)? {
                        break boundary;
                    }
                    self.scratch.push(byte);
                    self.extend_unquoted(source)?;
                }
                State::Quoted => {
                    if byte == self.quote {
                        state = State::QuotedQuote;
                    } else if Some(byte) == self.escape {
                        dropped.push(self.scratch.len());
                        state = State::QuotedEscape;
                    } else {
                        self.push_quoted(source, byte)?;
                    }
                }
                State::QuotedEscape => {
                    self.push_quoted(source, byte)?;
                    escaped = true;
                    state = State::Quoted;
                }
                State::QuotedQuote => {
                    if byte == self.quote {
                        dropped.push(self.scratch.len());
                        self.scratch.push(byte);
                        escaped = true;
                        state = State::Quoted;
                    } else if let Some(boundary) = self.boundary(source, byte)? {
                        break boundary;
                    } else if self.trim && is_blank(byte) {
                        state = State::FieldEnd;
                    } else {
                        return Err(self.invalid_quoting(source, byte));
                    }
                }
                State::FieldEnd => {
                    if let Some(boundary) = self.boundary(source, byte)? {
                        break boundary;
                    } else if !is_blank(byte) {
                        return Err(self.invalid_quoting(source, byte));
                    }
                }
            }
        };

        if self.trim && !quoted {
            while self.scratch.last().map_or(false, |&b| is_blank(b)) {
                self.scratch.pop();
            }
        }

        let field = RawField {
            span: 0..self.scratch.len(),
            quoted,
            escaped,
            position: start,
            dropped,
        };
        Ok((field, boundary))
    }

    // Classifies a byte read outside quotes; consumes the rest of a CRLF.
    fn boundary<R: Read>(&mut self, source: &mut ByteSource<R>, byte: u8) -> Result<Option<Boundary>> {
        if byte == self.delimiter {
            Ok(Some(Boundary::Delimiter))
        } else if self.terminator.is_line_break(byte) {
            self.consume_line_break(source, byte)?;
            Ok(Some(Boundary::LineBreak))
        } else {
            Ok(None)
        }
    }

    // Copies the plain bytes that follow in the current chunk without going
    // through the state machine. Stops before a delimiter or line break.
    fn extend_unquoted<R: Read>(&mut self, source: &mut ByteSource<R>) -> Result<()> {
        loop {
            let offset = source.offset();
            let chunk = match source.next_chunk() {
                Ok(Some(chunk)) => chunk,
                Ok(None) => return Ok(()),
                Err(e) => return Err(Error::io(self.position_at(offset), &e)),
            };
            let delimiter = self.delimiter;
            let terminator = self.terminator;
            let run = chunk
                .iter()
                .position(|&b| b == delimiter || terminator.is_line_break(b))
                .unwrap_or(chunk.len());
            let exhausted = run == chunk.len();
            self.scratch.extend_from_slice(&chunk[..run]);
            source.consume(run);
            if !exhausted {
                return Ok(());
            }
        }
    }

    fn consume_line_break<R: Read>(&mut self, source: &mut ByteSource<R>, byte: u8) -> Result<()> {
        if self.terminator == Terminator::Auto {
            let offset = source.offset();
            source
                .finish_line_break(byte)
                .map_err(|e| Error::io(self.position_at(offset), &e))?;
        }
        self.line += 1;
        Ok(())
    }

    // Line breaks inside quotes are data but still advance the line count.
    fn push_quoted<R: Read>(&mut self, source: &mut ByteSource<R>, byte: u8) -> Result<()> {
        self.scratch.push(byte);
        self.count_quoted_line_break(source, byte)
    }

    fn count_quoted_line_break<R: Read>(&mut self, source: &mut ByteSource<R>, byte: u8) -> Result<()> {
        if self.terminator.is_line_break(byte) {
            let crlf = self.terminator == Terminator::Auto
                && byte == b'\r'
                && self.peek_byte(source)? == Some(b'\n');
            if !crlf {
                self.line += 1;
            }
        }
        Ok(())
    }

    fn invalid_quoting<R: Read>(&self, source: &ByteSource<R>, byte: u8) -> Error {
        let offset = source.offset().saturating_sub(1);
        Error::invalid_quoting(self.position_at(offset), byte)
    }

    fn next_byte<R: Read>(&self, source: &mut ByteSource<R>) -> Result<Option<u8>> {
        source
            .next_byte()
            .map_err(|e| Error::io(self.position_at(source.offset()), &e))
    }

    fn peek_byte<R: Read>(&self, source: &mut ByteSource<R>) -> Result<Option<u8>> {
        source
            .peek_byte()
            .map_err(|e| Error::io(self.position_at(source.offset()), &e))
    }

    fn position_at(&self, byte_offset: u64) -> Position {
        Position::new(self.line, self.column.max(1), byte_offset)
    }
}

#[inline]
fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}
