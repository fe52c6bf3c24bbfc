//! CSV Input Grammar
//!
//! This module documents the input format accepted by this library and the
//! rules used to turn each field into a [`Value`](crate::Value). The rules are
//! versioned by [`GRAMMAR_VERSION`]; any change that can make the same input
//! produce different values bumps it.
//!
//! # Records and Fields
//!
//! Input is a sequence of rows separated by line terminators. Each row is a
//! sequence of fields separated by the delimiter (`,` by default).
//!
//! ```text
//! id,name,score
//! 1,Alice,9.5
//! 2,"Smith, Bob",
//! ```
//!
//! **Rules**:
//! - Line terminators are LF, CR and CRLF, mixed freely
//!   ([`Terminator::Auto`](crate::Terminator::Auto)), or one custom byte
//! - A blank line is a row with one empty field; a final line terminator
//!   does not start a row
//! - A leading UTF-8 byte order mark is stripped
//! - Fields are UTF-8; any other byte sequence is an `Encoding` error
//! - Whitespace around fields is data unless trimming is enabled
//!
//! # Quoting
//!
//! | Input | Field | Notes |
//! |-------|-------|-------|
//! | `"a,b"` | `a,b` | delimiter inside quotes is data |
//! | `"a""b"` | `a"b` | doubled quote is one quote |
//! | `""` | empty string | quoted empty field is not null |
//! | `"line1` + LF + `line2"` | two lines | line break kept verbatim, CRLF too |
//! | `a"b` | `a"b` | quote inside an unquoted field is data |
//! | `"a"b` | error | `InvalidQuoting` at the byte after the closing quote |
//! | `"abc` then end of input | error | `UnterminatedQuote` |
//!
//! With an escape character configured (say `\`), `\x` inside quotes is the
//! literal byte `x`; doubled quotes are still accepted.
//!
//! # Type Inference
//!
//! Unquoted fields are classified in this order; the first match wins:
//!
//! | Order | Type | Rule | Examples |
//! |-------|------|------|----------|
//! | 1 | Null | zero length | `` |
//! | 2 | Bool | case-insensitive boolean literal | `true`, `FALSE` |
//! | 3 | Integer | `[+-]? ( 0 \| [1-9][0-9]* )`, fits `i64` | `0`, `-42`, `+7` |
//! | 4 | Float | float grammar below | `3.14`, `-1e10`, `.5`, `1.` |
//! | 5 | String | anything else | `007`, `1e`, `inf`, `0x1F` |
//!
//! Float grammar:
//!
//! ```text
//! float    = sign? mantissa exponent?
//! mantissa = int ( "." digit* )? | "." digit+
//! exponent = ( "e" | "E" ) sign? digit+
//! int      = "0" | [1-9] digit*
//! ```
//!
//! **Notes**:
//! - Leading zeros make a field a string: `007`, `+01`, `00.5`
//! - `inf`, `nan` and hexadecimal forms are strings
//! - An integer too wide for `i64` becomes a float flagged inexact
//! - A float whose magnitude overflows becomes ±infinity flagged inexact;
//!   underflow to zero is not flagged
//! - Quoted fields are always strings, so `"42"` stays the text `42`
//! - With type inference disabled, every non-empty field is a string
//!
//! # Header Row
//!
//! When the dialect has a header, the first row is taken verbatim as column
//! names and no inference is applied to it.
//!
//! # Row Width
//!
//! The header (or the first data row) fixes the column count. A row of a
//! different width is a `RaggedRow` error unless the
//! [`RaggedRowPolicy`](crate::RaggedRowPolicy) pads short rows with nulls or
//! truncates long ones.

/// Version of the inference and quoting rules documented above.
pub const GRAMMAR_VERSION: u32 = 1;
