//! Column names.
//!
//! This module provides [`Header`], the ordered list of column names taken
//! from the first row of a headed input. Lookup by name goes through an
//! [`IndexMap`] so it is constant time while iteration keeps file order.
//!
//! ## Examples
//!
//! ```rust
//! use csvloader::Header;
//!
//! let header = Header::new(vec!["id".to_string(), "name".to_string()]);
//!
//! assert_eq!(header.len(), 2);
//! assert_eq!(header.index_of("name"), Some(1));
//! assert_eq!(header.get(0), Some("id"));
//! ```

use crate::{Row, Value};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// One row keyed by column name, in column order.
pub type Record<'a> = IndexMap<&'a str, &'a Value>;

/// Ordered column names with lookup by name.
///
/// Duplicate names are kept in order; lookup by name finds the first one.
///
/// # Examples
///
/// ```rust
/// use csvloader::Header;
///
/// let header = Header::new(vec!["a".into(), "b".into(), "a".into()]);
/// assert_eq!(header.len(), 3);
/// assert_eq!(header.index_of("a"), Some(0));
///
/// let names: Vec<_> = header.iter().collect();
/// assert_eq!(names, vec!["a", "b", "a"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    names: Vec<String>,
    index: IndexMap<String, usize>,
}

impl Header {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let mut index = IndexMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Header { names, index }
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the header has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the name of column `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns the position of the first column called `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns `true` if some column is called `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns an iterator over the names, in column order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    /// Pairs the values of `row` with the column names.
    ///
    /// Values beyond the last column are left out; a duplicate name keeps
    /// the value of its first column.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csvloader::{row, Header, Value};
    ///
    /// let header = Header::new(vec!["id".into(), "name".into()]);
    /// let row = row![1, "Alice"];
    ///
    /// let record = header.record(&row);
    /// assert_eq!(record["id"], &Value::Integer(1));
    /// assert_eq!(record["name"].as_str(), Some("Alice"));
    /// ```
    #[must_use]
    pub fn record<'a>(&'a self, row: &'a Row) -> Record<'a> {
        let mut record = IndexMap::with_capacity(self.names.len());
        for (name, value) in self.names.iter().zip(row.iter()) {
            record.entry(name.as_str()).or_insert(value);
        }
        record
    }
}

impl Serialize for Header {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.names)
    }
}

impl FromIterator<String> for Header {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Header::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}
