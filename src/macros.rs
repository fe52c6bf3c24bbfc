/// Builds a [`Row`](crate::Row) from a list of values.
///
/// `null` stands for [`Value::Null`](crate::Value::Null); every other element
/// is converted with `Value::from`.
///
/// # Examples
///
/// ```rust
/// use csvloader::{row, Value};
///
/// let row = row![1, "two", 3.5, true, null, -4];
/// assert_eq!(row.len(), 6);
/// assert_eq!(row[1], Value::from("two"));
/// assert!(row[4].is_null());
/// assert_eq!(row[5], Value::Integer(-4));
/// ```
#[macro_export]
macro_rules! row {
    // Done
    (@acc [$($out:expr),*]) => {
        $crate::Row::new(vec![$($out),*])
    };

    // Handle null
    (@acc [$($out:expr),*] null $(, $($rest:tt)*)?) => {
        $crate::row!(@acc [$($out,)* $crate::Value::Null] $($($rest)*)?)
    };

    // Any expression convertible into a Value
    (@acc [$($out:expr),*] $elem:expr $(, $($rest:tt)*)?) => {
        $crate::row!(@acc [$($out,)* $crate::Value::from($elem)] $($($rest)*)?)
    };

    ($($elems:tt)*) => {
        $crate::row!(@acc [] $($elems)*)
    };
}
