//! Type inference for raw fields.
//!
//! [`Inferencer::infer`] turns the bytes of one field into a [`Value`]. The
//! checks run in a fixed order and the first match wins:
//!
//! 1. quoted field → `String` (after unescaping; `""` is the empty string)
//! 2. empty field → `Null`
//! 3. boolean literal, case-insensitive → `Bool`
//! 4. integer grammar that fits `i64` → `Integer`
//! 5. float grammar → `Float` (integers too wide for `i64` land here,
//!    flagged inexact)
//! 6. anything else → `String`
//!
//! The exact grammars are documented in [`crate::grammar`].

use crate::dialect::Dialect;
use crate::value::{Float, Value};
use std::str::{self, Utf8Error};

/// Classifies raw field bytes into typed values.
///
/// # Examples
///
/// ```rust
/// use csvloader::{Inferencer, Value};
///
/// let inferencer = Inferencer::default();
/// assert_eq!(inferencer.infer(b"42", false).unwrap(), Value::Integer(42));
/// assert_eq!(inferencer.infer(b"TRUE", false).unwrap(), Value::Bool(true));
/// assert_eq!(inferencer.infer(b"007", false).unwrap(), Value::from("007"));
/// assert_eq!(inferencer.infer(b"42", true).unwrap(), Value::from("42"));
/// assert_eq!(inferencer.infer(b"", false).unwrap(), Value::Null);
/// ```
#[derive(Clone, Debug)]
pub struct Inferencer {
    booleans: Vec<(Box<[u8]>, Box<[u8]>)>,
    enabled: bool,
}

impl Default for Inferencer {
    fn default() -> Self {
        Inferencer::new(&Dialect::default())
    }
}

impl Inferencer {
    pub fn new(dialect: &Dialect) -> Self {
        Inferencer {
            booleans: dialect
                .boolean_literals
                .iter()
                .map(|(t, f)| (t.as_bytes().into(), f.as_bytes().into()))
                .collect(),
            enabled: dialect.infer_types,
        }
    }

    /// Infers the value of one field.
    ///
    /// # Errors
    ///
    /// Returns the UTF-8 error when the field would become a string but is
    /// not valid UTF-8.
    pub fn infer(&self, bytes: &[u8], quoted: bool) -> Result<Value, Utf8Error> {
        if quoted {
            return text(bytes);
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        if !self.enabled {
            return text(bytes);
        }
        if let Some(b) = self.boolean(bytes) {
            return Ok(Value::Bool(b));
        }
        if let Some(value) = number(bytes) {
            return Ok(value);
        }
        text(bytes)
    }

    fn boolean(&self, bytes: &[u8]) -> Option<bool> {
        self.booleans.iter().find_map(|(t, f)| {
            if bytes.eq_ignore_ascii_case(t) {
                Some(true)
            } else if bytes.eq_ignore_ascii_case(f) {
                Some(false)
            } else {
                None
            }
        })
    }
}

fn text(bytes: &[u8]) -> Result<Value, Utf8Error> {
    str::from_utf8(bytes).map(|s| Value::String(s.to_owned()))
}

fn number(bytes: &[u8]) -> Option<Value> {
    let shape = scan_number(bytes)?;
    // The scanner only accepts ASCII.
    let s = str::from_utf8(bytes).ok()?;

    if shape == Shape::Integer {
        if let Ok(i) = s.parse::<i64>() {
            return Some(Value::Integer(i));
        }
        let value = s.parse::<f64>().ok()?;
        return Some(Value::Float(Float::inexact(value)));
    }

    let value = s.parse::<f64>().ok()?;
    if value.is_infinite() {
        Some(Value::Float(Float::inexact(value)))
    } else {
        Some(Value::Float(Float::new(value)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Integer,
    Float,
}

/// Matches `[+-]? (int ("." digit*)? | "." digit+) ([eE] [+-]? digit+)?`
/// where `int` is `0` or a non-zero digit followed by digits. Returns
/// `Shape::Integer` when neither a fraction nor an exponent is present.
fn scan_number(bytes: &[u8]) -> Option<Shape> {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_digits = count_digits(&bytes[i..]);
    if int_digits > 1 && bytes[i] == b'0' {
        return None;
    }
    i += int_digits;

    let mut shape = Shape::Integer;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        shape = Shape::Float;
        i += 1;
        frac_digits = count_digits(&bytes[i..]);
        i += frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        shape = Shape::Float;
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_digits = count_digits(&bytes[i..]);
        if exp_digits == 0 {
            return None;
        }
        i += exp_digits;
    }

    (i == bytes.len()).then_some(shape)
}

#[inline]
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
