//! Configuration for CSV parsing.
//!
//! This module provides the types that describe how an input is laid out and
//! how lenient the loader should be:
//!
//! - [`Dialect`]: Main configuration struct
//! - [`Terminator`]: Which bytes end a row
//! - [`RaggedRowPolicy`]: What to do with rows of the wrong length
//! - [`MalformedRowPolicy`]: What to do with rows that fail to tokenize
//!
//! ## Examples
//!
//! ```rust
//! use csvloader::{Dialect, RaggedRowPolicy, from_str_with_dialect};
//!
//! let dialect = Dialect::new()
//!     .with_delimiter(';')
//!     .with_ragged_rows(RaggedRowPolicy::Pad);
//!
//! let data = from_str_with_dialect("a;b;c\n1;2\n", dialect).unwrap();
//! assert_eq!(data.rows()[0].len(), 3);
//! ```
//!
//! A dialect can also be loaded from host configuration, every field being
//! optional:
//!
//! ```rust
//! use csvloader::Dialect;
//!
//! let dialect: Dialect = serde_json::from_str(r#"{"delimiter": "|", "header": false}"#).unwrap();
//! assert_eq!(dialect.delimiter, '|');
//! assert!(!dialect.header);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default size of the read buffer, in bytes.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Which bytes end a row outside quoted fields.
///
/// # Examples
///
/// ```rust
/// use csvloader::Terminator;
///
/// assert!(Terminator::Auto.is_line_break(b'\r'));
/// assert!(Terminator::Auto.is_line_break(b'\n'));
/// assert!(Terminator::Custom(';').is_line_break(b';'));
/// assert!(!Terminator::Custom(';').is_line_break(b'\n'));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminator {
    /// CR, LF and CRLF each end a row; CRLF counts once.
    #[default]
    Auto,
    /// A single custom ASCII byte ends a row.
    Custom(char),
}

impl Terminator {
    #[inline]
    #[must_use]
    pub fn is_line_break(&self, byte: u8) -> bool {
        match self {
            Terminator::Auto => byte == b'\n' || byte == b'\r',
            Terminator::Custom(ch) => u32::from(byte) == u32::from(*ch),
        }
    }
}

/// What to do with a data row whose length differs from the column count.
///
/// The column count comes from the header, or from the first data row when
/// the dialect has no header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaggedRowPolicy {
    /// Fail the parse with [`Error::RaggedRow`].
    #[default]
    Error,
    /// Pad short rows with `Null`. Long rows still fail.
    Pad,
    /// Drop the extra fields of long rows. Short rows still fail.
    Truncate,
}

/// What to do with a row that has malformed quoting or invalid UTF-8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Fail the parse.
    #[default]
    Error,
    /// Drop the row and resume at the next line break outside quotes.
    ///
    /// Quotes left in the broken field pair up, so a quoted line break after
    /// the error does not start a new row. Recovery is a heuristic: a stray
    /// unmatched quote in that field drops the rest of the input.
    Skip,
}

/// Configuration for one parse.
///
/// The defaults read RFC 4180 style CSV with a header row: comma delimiter,
/// double-quote quoting with `""` as the escaped quote, any of CR/LF/CRLF as
/// the line terminator, strict row lengths.
///
/// # Examples
///
/// ```rust
/// use csvloader::{Dialect, MalformedRowPolicy};
///
/// // Defaults
/// let dialect = Dialect::new();
/// assert_eq!(dialect.delimiter, ',');
/// assert!(dialect.header);
///
/// // Tab separated, no header, skip broken rows
/// let dialect = Dialect::tsv()
///     .with_header(false)
///     .with_malformed_rows(MalformedRowPolicy::Skip);
/// assert_eq!(dialect.delimiter, '\t');
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub delimiter: char,
    pub quote: char,
    /// Escape character inside quoted fields. `None` means quotes are only
    /// escaped by doubling them.
    pub escape: Option<char>,
    pub terminator: Terminator,
    pub header: bool,
    /// Strip spaces and tabs around fields (outside of quotes).
    pub trim: bool,
    pub ragged_rows: RaggedRowPolicy,
    pub malformed_rows: MalformedRowPolicy,
    /// `(true, false)` spellings, matched case-insensitively.
    pub boolean_literals: Vec<(String, String)>,
    /// When `false`, every non-empty field is kept as a string.
    pub infer_types: bool,
    pub buffer_capacity: usize,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect {
            delimiter: ',',
            quote: '"',
            escape: None,
            terminator: Terminator::default(),
            header: true,
            trim: false,
            ragged_rows: RaggedRowPolicy::default(),
            malformed_rows: MalformedRowPolicy::default(),
            boolean_literals: vec![("true".to_string(), "false".to_string())],
            infer_types: true,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl Dialect {
    /// Creates the default dialect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dialect for tab separated values.
    #[must_use]
    pub fn tsv() -> Self {
        Dialect {
            delimiter: '\t',
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Sets an escape character for quoted fields, e.g. `\\`.
    ///
    /// Doubled quotes are still accepted when an escape character is set.
    #[must_use]
    pub fn with_escape(mut self, escape: Option<char>) -> Self {
        self.escape = escape;
        self
    }

    #[must_use]
    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    #[must_use]
    pub fn with_ragged_rows(mut self, policy: RaggedRowPolicy) -> Self {
        self.ragged_rows = policy;
        self
    }

    #[must_use]
    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    /// Replaces the boolean literal pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csvloader::Dialect;
    ///
    /// let dialect = Dialect::new().with_boolean_literals([("yes", "no"), ("true", "false")]);
    /// assert_eq!(dialect.boolean_literals.len(), 2);
    /// ```
    #[must_use]
    pub fn with_boolean_literals<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.boolean_literals = literals
            .into_iter()
            .map(|(t, f)| (t.into(), f.into()))
            .collect();
        self
    }

    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }

    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Checks that the dialect can be used for parsing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDialect`] when a punctuation character is not
    /// ASCII or is a line break, when delimiter, quote, escape and custom
    /// terminator are not pairwise distinct, when a boolean literal is empty,
    /// or when the buffer capacity is zero.
    pub fn validate(&self) -> Result<()> {
        let mut punctuation = vec![("delimiter", self.delimiter), ("quote", self.quote)];
        if let Some(escape) = self.escape {
            punctuation.push(("escape", escape));
        }

        for &(name, ch) in &punctuation {
            if !ch.is_ascii() {
                return Err(Error::invalid_dialect(format!(
                    "{} {:?} is not an ASCII character",
                    name, ch
                )));
            }
            if ch == '\r' || ch == '\n' {
                return Err(Error::invalid_dialect(format!(
                    "{} cannot be a line break",
                    name
                )));
            }
        }

        if let Terminator::Custom(ch) = self.terminator {
            if !ch.is_ascii() {
                return Err(Error::invalid_dialect(format!(
                    "terminator {:?} is not an ASCII character",
                    ch
                )));
            }
            punctuation.push(("terminator", ch));
        }

        for (i, &(a, ca)) in punctuation.iter().enumerate() {
            for &(b, cb) in &punctuation[i + 1..] {
                if ca == cb {
                    return Err(Error::invalid_dialect(format!(
                        "{} and {} are both {:?}",
                        a, b, ca
                    )));
                }
            }
        }

        for (t, f) in &self.boolean_literals {
            if t.is_empty() || f.is_empty() {
                return Err(Error::invalid_dialect("boolean literals cannot be empty"));
            }
        }

        if self.buffer_capacity == 0 {
            return Err(Error::invalid_dialect("buffer capacity must be positive"));
        }

        Ok(())
    }

    pub(crate) fn delimiter_byte(&self) -> u8 {
        ascii_byte(self.delimiter)
    }

    pub(crate) fn quote_byte(&self) -> u8 {
        ascii_byte(self.quote)
    }

    pub(crate) fn escape_byte(&self) -> Option<u8> {
        self.escape.map(ascii_byte)
    }
}

// Only called on validated dialects, where every character is ASCII.
fn ascii_byte(ch: char) -> u8 {
    debug_assert!(ch.is_ascii());
    ch as u8
}
