//! Fully parsed tables.
//!
//! A [`Dataset`] is what the batch entry points ([`from_str`](crate::from_str),
//! [`from_reader`](crate::from_reader) and friends) return: the optional
//! [`Header`] plus every data row in input order.
//!
//! ## Examples
//!
//! ```rust
//! use csvloader::{from_str, Value};
//!
//! let dataset = from_str("city,population\nOslo,709037\nBergen,291940\n").unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! let population: Vec<_> = dataset
//!     .column("population")
//!     .unwrap()
//!     .filter_map(Value::as_i64)
//!     .collect();
//! assert_eq!(population, vec![709037, 291940]);
//! ```

use crate::{Header, Record, Row, Value};
use serde::Serialize;

/// A header and the rows that follow it.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dataset {
    header: Option<Header>,
    rows: Vec<Row>,
}

impl Dataset {
    #[must_use]
    pub fn new(header: Option<Header>, rows: Vec<Row>) -> Self {
        Dataset { header, rows }
    }

    /// Returns the header, if the dialect asked for one and the input was
    /// not empty.
    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows. The header is not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Returns the values of the column called `name`, top to bottom.
    ///
    /// Returns `None` if there is no header or no such column. Rows too
    /// short to reach the column are skipped.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let index = self.header.as_ref()?.index_of(name)?;
        Some(self.rows.iter().filter_map(move |row| row.get(index)))
    }

    /// Returns every row keyed by column name.
    ///
    /// Returns `None` if there is no header.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use csvloader::{from_str, Value};
    ///
    /// let dataset = from_str("id,ok\n1,true\n2,false\n").unwrap();
    /// let records: Vec<_> = dataset.records().unwrap().collect();
    ///
    /// assert_eq!(records[1]["id"], &Value::Integer(2));
    /// assert_eq!(records[1]["ok"], &Value::Bool(false));
    /// ```
    pub fn records(&self) -> Option<impl Iterator<Item = Record<'_>> + '_> {
        let header = self.header.as_ref()?;
        Some(self.rows.iter().map(move |row| header.record(row)))
    }

    #[must_use]
    pub fn into_parts(self) -> (Option<Header>, Vec<Row>) {
        (self.header, self.rows)
    }

    pub(crate) fn push(&mut self, row: Row) {
        self.rows.push(row);
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for Dataset {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
