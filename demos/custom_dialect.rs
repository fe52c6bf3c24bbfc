//! Semicolon separated input with backslash escapes and lenient policies.
//!
//! Run with: cargo run --example custom_dialect

use csvloader::{from_str_with_dialect, Dialect, MalformedRowPolicy, RaggedRowPolicy, Reader};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let input = "\
product;in_stock;price;note
'Widget';yes;9.99;'The \\'classic\\' one'
'Gadget';no;14.5
'Broken';'oops'x;1;
'Gizmo';YES;0.5;ok
";

    let dialect = Dialect::new()
        .with_delimiter(';')
        .with_quote('\'')
        .with_escape(Some('\\'))
        .with_boolean_literals([("yes", "no")])
        .with_ragged_rows(RaggedRowPolicy::Pad)
        .with_malformed_rows(MalformedRowPolicy::Skip);

    let mut reader = Reader::new(input.as_bytes(), dialect.clone())?;
    for row in reader.rows() {
        println!("{:?}", row?.into_values());
    }
    println!("Skipped {} malformed row(s)", reader.rows_skipped());

    // The same dialect, loaded from host configuration.
    let json = r#"{
        "delimiter": ";",
        "quote": "'",
        "escape": "\\",
        "boolean_literals": [["yes", "no"]],
        "ragged_rows": "pad",
        "malformed_rows": "skip"
    }"#;
    let configured: Dialect = serde_json::from_str(json)?;
    assert_eq!(configured, dialect);

    let dataset = from_str_with_dialect(input, configured)?;
    println!("Parsed {} rows from configured dialect", dataset.len());

    Ok(())
}
