//! Typed field values.
//!
//! This module provides the [`Value`] enum, the typed form of one CSV field,
//! and [`Float`], a float that remembers whether it lost information.
//!
//! ## Core Types
//!
//! - [`Value`]: exactly one of null, boolean, integer, float or string
//! - [`Float`]: an `f64` plus an inexact flag
//! - [`ValueKind`]: the tag of a value, without its payload
//!
//! ## Usage Patterns
//!
//! ### Type Checking
//!
//! ```rust
//! use csvloader::{Value, ValueKind};
//!
//! let value = Value::from(42);
//! assert!(value.is_integer());
//! assert_eq!(value.kind(), ValueKind::Integer);
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use csvloader::Value;
//! use std::convert::TryFrom;
//!
//! let num: i64 = i64::try_from(Value::from(42)).unwrap();
//! assert_eq!(num, 42);
//! ```
//!
//! ### Handing Values to a Host
//!
//! `Value` implements `Serialize`, so any serde format can carry it:
//!
//! ```rust
//! use csvloader::Value;
//!
//! let json = serde_json::to_string(&vec![Value::Null, Value::from(1), Value::from("a")]).unwrap();
//! assert_eq!(json, r#"[null,1,"a"]"#);
//! ```

use serde::{Serialize, Serializer};
use std::fmt;

/// The typed value of one CSV field.
///
/// # Examples
///
/// ```rust
/// use csvloader::Value;
///
/// let null = Value::Null;
/// let num = Value::Integer(42);
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(Float),
    String(String),
}

/// The tag of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A floating-point value with an inexact flag.
///
/// The flag is set when the text did not fit: the magnitude overflowed to
/// infinity, or the text was an integer too wide for `i64` and was rounded.
///
/// # Examples
///
/// ```rust
/// use csvloader::Float;
///
/// let exact = Float::new(2.5);
/// assert!(!exact.is_inexact());
///
/// let overflow = Float::inexact(f64::INFINITY);
/// assert!(overflow.is_inexact());
/// assert_eq!(overflow.value(), f64::INFINITY);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Float {
    value: f64,
    inexact: bool,
}

impl Float {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Float {
            value,
            inexact: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn inexact(value: f64) -> Self {
        Float {
            value,
            inexact: true,
        }
    }

    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    #[must_use]
    pub const fn is_inexact(&self) -> bool {
        self.inexact
    }
}

// Debug formatting keeps a fraction or exponent on every finite value, so
// the text reads back as a float rather than an integer.
impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if the value is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns `true` if the value is an integer or a float.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an integer, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csvloader::Value;
    ///
    /// assert_eq!(Value::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(42.0).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is numeric, returns it as an `f64`. Otherwise returns
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csvloader::Value;
    ///
    /// assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
    /// assert_eq!(Value::from(2.5).as_f64(), Some(2.5));
    /// assert_eq!(Value::from("2.5").as_f64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(f.value()),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise
    /// returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Formats the value the way it would appear as an unquoted field:
/// null is empty, floats always carry a fraction or an exponent.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(f.value()),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = ValueKind;

    fn try_from(value: Value) -> Result<Self, ValueKind> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(other.kind()),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueKind;

    fn try_from(value: Value) -> Result<Self, ValueKind> {
        match value {
            Value::Integer(i) => Ok(i as f64),
            Value::Float(f) => Ok(f.value()),
            other => Err(other.kind()),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ValueKind;

    fn try_from(value: Value) -> Result<Self, ValueKind> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other.kind()),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ValueKind;

    fn try_from(value: Value) -> Result<Self, ValueKind> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other.kind()),
        }
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(Float::new(value))
    }
}

impl From<Float> for Value {
    fn from(value: Float) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Value::Integer(42)), Ok(42));
        assert_eq!(i64::try_from(Value::from(4.0)), Err(ValueKind::Float));
        assert_eq!(f64::try_from(Value::Integer(3)), Ok(3.0));
        assert_eq!(bool::try_from(Value::Bool(true)), Ok(true));
        assert_eq!(bool::try_from(Value::Null), Err(ValueKind::Null));
        assert_eq!(String::try_from(Value::from("x")), Ok("x".to_string()));
        assert_eq!(String::try_from(Value::Integer(1)), Err(ValueKind::Integer));
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(42u32), Value::Integer(42));
        assert_eq!(Value::from(3.5f64), Value::Float(Float::new(3.5)));
        assert_eq!(Value::from("test"), Value::String("test".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn test_exact_and_inexact_floats_differ() {
        assert_ne!(
            Value::Float(Float::new(1e20)),
            Value::Float(Float::inexact(1e20))
        );
    }

    #[test]
    fn test_display_reads_back_as_same_kind() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::from(3.0).to_string(), "3.0");
        assert_eq!(Value::from(1e20).to_string(), "1e20");
        assert_eq!(Value::from("a b").to_string(), "a b");
    }

    #[test]
    fn test_serialize() {
        let values = vec![
            Value::Null,
            Value::Bool(true),
            Value::Integer(-7),
            Value::from(0.25),
            Value::from("x\"y"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,true,-7,0.25,"x\"y"]"#);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind().to_string(), "null");
        assert_eq!(Value::from(1.5).kind().to_string(), "float");
        assert!(Value::Integer(1).is_number());
        assert!(Value::from(1.5).is_number());
        assert!(!Value::from("1").is_number());
    }
}
