//! Error types for CSV loading.
//!
//! Every failure raised while reading input carries a [`Position`] so the
//! host can point at the offending byte:
//!
//! - **Line**: 1-based physical line (line breaks inside quoted fields count)
//! - **Column**: 1-based index of the field within its row
//! - **Byte offset**: 0-based offset into the underlying stream
//!
//! ## Error Categories
//!
//! - **I/O Errors**: the underlying reader failed
//! - **Quoting Errors**: a quoted field is malformed or never closed
//! - **Ragged Rows**: a row has the wrong number of fields
//! - **Encoding Errors**: a field is not valid UTF-8
//! - **Dialect Errors**: the configuration itself is unusable
//!
//! ## Examples
//!
//! ```rust
//! use csvloader::{from_str, ErrorKind};
//!
//! let err = from_str("a,b\n1,\"2\"x\n").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidQuoting);
//! assert_eq!(err.line(), Some(2));
//! assert_eq!(err.column(), Some(2));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// A location in the input stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub byte_offset: u64,
}

impl Position {
    /// The position of the first byte of a stream.
    pub const START: Position = Position {
        line: 1,
        column: 1,
        byte_offset: 0,
    };

    #[must_use]
    pub const fn new(line: usize, column: usize, byte_offset: u64) -> Self {
        Position {
            line,
            column,
            byte_offset,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (byte {})",
            self.line, self.column, self.byte_offset
        )
    }
}

/// The category of an [`Error`], independent of where it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    InvalidQuoting,
    UnterminatedQuote,
    RaggedRow,
    Encoding,
    InvalidDialect,
}

/// Represents all possible errors that can occur while loading CSV.
///
/// Parse errors abort the current parse; rows already handed out by a
/// [`Reader`](crate::Reader) stay valid.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The underlying reader failed.
    #[error("IO error at byte {}: {message}", .position.byte_offset)]
    Io {
        position: Position,
        source_kind: io::ErrorKind,
        message: String,
    },

    /// A closing quote was followed by something other than a quote,
    /// delimiter or line terminator.
    #[error("Invalid quoting at {position}: unexpected {found:?} after closing quote")]
    InvalidQuoting { position: Position, found: char },

    /// Input ended inside a quoted field.
    #[error("Unterminated quoted field at {position}: input ended before the closing quote")]
    UnterminatedQuote { position: Position },

    /// A row's field count differs from the established column count.
    #[error(
        "Ragged row at line {}: expected {expected} fields, found {found}",
        .position.line
    )]
    RaggedRow {
        position: Position,
        expected: usize,
        found: usize,
    },

    /// A field that must become text is not valid UTF-8.
    #[error("Invalid UTF-8 at {position}")]
    Encoding { position: Position },

    /// The dialect cannot be used to parse anything.
    #[error("Invalid dialect: {0}")]
    InvalidDialect(String),
}

impl Error {
    /// Creates an I/O error from a failed read at `position`.
    pub fn io(position: Position, err: &io::Error) -> Self {
        Error::Io {
            position,
            source_kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Creates an invalid quoting error for the byte `found`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csvloader::{Error, Position};
    ///
    /// let err = Error::invalid_quoting(Position::new(3, 2, 17), b'x');
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn invalid_quoting(position: Position, found: u8) -> Self {
        Error::InvalidQuoting {
            position,
            found: char::from(found),
        }
    }

    /// Creates an unterminated quote error.
    pub fn unterminated_quote(position: Position) -> Self {
        Error::UnterminatedQuote { position }
    }

    /// Creates a ragged row error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csvloader::{Error, Position};
    ///
    /// let err = Error::ragged_row(Position::new(2, 3, 6), 3, 2);
    /// assert!(err.to_string().contains("expected 3 fields, found 2"));
    /// ```
    pub fn ragged_row(position: Position, expected: usize, found: usize) -> Self {
        Error::RaggedRow {
            position,
            expected,
            found,
        }
    }

    /// Creates an encoding error.
    pub fn encoding(position: Position) -> Self {
        Error::Encoding { position }
    }

    /// Creates a dialect error with a display message.
    pub fn invalid_dialect<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidDialect(msg.to_string())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::InvalidQuoting { .. } => ErrorKind::InvalidQuoting,
            Error::UnterminatedQuote { .. } => ErrorKind::UnterminatedQuote,
            Error::RaggedRow { .. } => ErrorKind::RaggedRow,
            Error::Encoding { .. } => ErrorKind::Encoding,
            Error::InvalidDialect(_) => ErrorKind::InvalidDialect,
        }
    }

    /// Where the error happened. `None` only for [`Error::InvalidDialect`],
    /// which is raised before any input is read.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Io { position, .. }
            | Error::InvalidQuoting { position, .. }
            | Error::UnterminatedQuote { position }
            | Error::RaggedRow { position, .. }
            | Error::Encoding { position } => Some(*position),
            Error::InvalidDialect(_) => None,
        }
    }

    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.position().map(|p| p.line)
    }

    #[must_use]
    pub fn column(&self) -> Option<usize> {
        self.position().map(|p| p.column)
    }

    #[must_use]
    pub fn byte_offset(&self) -> Option<u64> {
        self.position().map(|p| p.byte_offset)
    }

    /// Returns `true` for errors that only invalidate the row they occurred
    /// in, so a lenient reader may drop that row and carry on.
    pub(crate) fn is_row_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidQuoting | ErrorKind::UnterminatedQuote | ErrorKind::Encoding
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
