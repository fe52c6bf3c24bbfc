//! # csvloader
//!
//! A fast CSV reader with inline type inference.
//!
//! ## What does it do?
//!
//! csvloader turns delimited text into rows of typed [`Value`]s: nulls,
//! booleans, integers, floats and strings. Quoting, escaping, line endings,
//! byte order marks and ragged rows are handled by a purpose-built state
//! machine that reads its input in chunks, so a file of any size can be
//! streamed row by row.
//!
//! ## Key Features
//!
//! - **Streaming**: [`Reader`] pulls one row at a time; memory is one row plus
//!   the read buffer
//! - **Typed**: every field is classified by a fixed, documented grammar
//!   (see [`grammar`])
//! - **Configurable**: delimiter, quote, escape, terminator, header, trimming,
//!   ragged and malformed row policies through [`Dialect`]
//! - **Precise errors**: every parse error carries line, column and byte offset
//! - **Serde output**: [`Dataset`], [`Row`], [`Header`] and [`Value`] implement
//!   `Serialize`
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! csvloader = "0.1"
//! ```
//!
//! ### Parsing a Whole Input
//!
//! ```rust
//! use csvloader::{from_str, Value};
//!
//! let dataset = from_str("id,name,score\n1,Alice,9.5\n2,Bob,\n").unwrap();
//!
//! let header = dataset.header().unwrap();
//! assert_eq!(header.names(), &["id", "name", "score"]);
//!
//! let rows = dataset.rows();
//! assert_eq!(rows[0][0], Value::Integer(1));
//! assert_eq!(rows[0][1], Value::from("Alice"));
//! assert_eq!(rows[0][2].as_f64(), Some(9.5));
//! assert!(rows[1][2].is_null());
//! ```
//!
//! ### Streaming Rows
//!
//! ```rust
//! use csvloader::{Dialect, Reader};
//!
//! let input = "a,b\n1,2\n3,4\n";
//! let mut reader = Reader::new(input.as_bytes(), Dialect::default()).unwrap();
//!
//! let mut total = 0;
//! for row in reader.rows() {
//!     let row = row.unwrap();
//!     total += row.iter().filter_map(|v| v.as_i64()).sum::<i64>();
//! }
//! assert_eq!(total, 10);
//! ```
//!
//! ### Custom Dialects
//!
//! ```rust
//! use csvloader::{from_str_with_dialect, Dialect, RaggedRowPolicy, Value};
//!
//! let dialect = Dialect::new()
//!     .with_delimiter(';')
//!     .with_header(false)
//!     .with_ragged_rows(RaggedRowPolicy::Pad);
//!
//! let dataset = from_str_with_dialect("1;yes\n2\n", dialect).unwrap();
//! assert_eq!(dataset.rows()[1][1], Value::Null);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use csvloader::{from_str, ErrorKind};
//!
//! let err = from_str("a,b\n1,2\n3\n").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::RaggedRow);
//! assert_eq!(err.line(), Some(3));
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`debug` for parse milestones, `trace`
//! per row, `warn` for skipped rows). Install any subscriber to see them.
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Parse a small table and look at its values
//! - **`streaming.rs`** - Stream a large generated input row by row
//! - **`custom_dialect.rs`** - Semicolons, escapes and lenient policies
//!
//! Run any demo with: `cargo run --example <name>`

pub mod dataset;
pub mod dialect;
pub mod error;
pub mod grammar;
pub mod header;
pub mod infer;
pub mod macros;
pub mod reader;
pub mod row;
pub mod source;
mod tokenizer;
pub mod value;

pub use dataset::Dataset;
pub use dialect::{Dialect, MalformedRowPolicy, RaggedRowPolicy, Terminator};
pub use error::{Error, ErrorKind, Position, Result};
pub use grammar::GRAMMAR_VERSION;
pub use header::{Header, Record};
pub use infer::Inferencer;
pub use reader::{IntoRows, Reader, Rows};
pub use row::Row;
pub use source::ByteSource;
pub use value::{Float, Value, ValueKind};

use std::io;
use std::path::Path;

/// Parses CSV text with the default dialect.
///
/// # Examples
///
/// ```rust
/// use csvloader::{from_str, Value};
///
/// let dataset = from_str("x,y\n1,\"a\"\"b\"\n").unwrap();
/// assert_eq!(dataset.rows()[0][1], Value::from("a\"b"));
/// ```
///
/// # Errors
///
/// Returns the first quoting, encoding or ragged row error, with its line
/// and column.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Dataset> {
    from_slice(s.as_bytes())
}

/// Parses CSV text with a custom dialect.
///
/// # Examples
///
/// ```rust
/// use csvloader::{from_str_with_dialect, Dialect};
///
/// let dataset = from_str_with_dialect("a\tb\n1\t2\n", Dialect::tsv()).unwrap();
/// assert_eq!(dataset.header().unwrap().len(), 2);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidDialect`] for an invalid dialect, otherwise the
/// first parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_dialect(s: &str, dialect: Dialect) -> Result<Dataset> {
    from_slice_with_dialect(s.as_bytes(), dialect)
}

/// Parses CSV bytes with the default dialect.
///
/// # Examples
///
/// ```rust
/// use csvloader::{from_slice, ErrorKind};
///
/// let err = from_slice(b"a\n\xFF\n").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Encoding);
/// assert_eq!(err.line(), Some(2));
/// ```
///
/// # Errors
///
/// Returns the first parse error, including [`Error::Encoding`] for fields
/// that are not UTF-8.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8]) -> Result<Dataset> {
    from_slice_with_dialect(bytes, Dialect::default())
}

/// Parses CSV bytes with a custom dialect.
///
/// # Errors
///
/// Returns [`Error::InvalidDialect`] for an invalid dialect, otherwise the
/// first parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_dialect(bytes: &[u8], dialect: Dialect) -> Result<Dataset> {
    Reader::new(bytes, dialect)?.into_dataset()
}

/// Parses CSV from any reader with the default dialect.
///
/// The reader is consumed in chunks; it does not need to be buffered.
///
/// # Examples
///
/// ```rust
/// use csvloader::from_reader;
/// use std::io::Cursor;
///
/// let dataset = from_reader(Cursor::new(b"n\n1\n2\n3\n")).unwrap();
/// assert_eq!(dataset.len(), 3);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise the first parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(reader: R) -> Result<Dataset>
where
    R: io::Read,
{
    from_reader_with_dialect(reader, Dialect::default())
}

/// Parses CSV from any reader with a custom dialect.
///
/// # Errors
///
/// Returns [`Error::InvalidDialect`] for an invalid dialect, [`Error::Io`]
/// if reading fails, otherwise the first parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_dialect<R>(reader: R, dialect: Dialect) -> Result<Dataset>
where
    R: io::Read,
{
    Reader::new(reader, dialect)?.into_dataset()
}

/// Parses the CSV file at `path` with the default dialect.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, otherwise the
/// first parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    from_path_with_dialect(path, Dialect::default())
}

/// Parses the CSV file at `path` with a custom dialect.
///
/// # Errors
///
/// Returns [`Error::InvalidDialect`] for an invalid dialect, [`Error::Io`] if
/// the file cannot be opened or read, otherwise the first parse error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_path_with_dialect<P: AsRef<Path>>(path: P, dialect: Dialect) -> Result<Dataset> {
    Reader::from_path(path, dialect)?.into_dataset()
}
