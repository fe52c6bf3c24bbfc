//! Parse a small table and look at the inferred values.
//!
//! Run with: cargo run --example simple

use csvloader::{from_str, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let input = "\
id,name,balance,active,joined
1,Alice Johnson,1520.75,true,2021-04-01
2,\"Smith, Bob\",-30,false,
3,Carol,,TRUE,2023-11-19
";

    let dataset = from_str(input)?;

    if let Some(header) = dataset.header() {
        println!("Columns: {}", header.names().join(" | "));
    }

    for row in &dataset {
        let described: Vec<String> = row
            .iter()
            .map(|value| match value {
                Value::Null => "null".to_string(),
                other => format!("{} ({})", other, other.kind()),
            })
            .collect();
        println!("{}", described.join(", "));
    }

    let total: f64 = dataset
        .column("balance")
        .into_iter()
        .flatten()
        .filter_map(Value::as_f64)
        .sum();
    println!("\nTotal balance: {}", total);

    println!("\nAs JSON:\n{}", serde_json::to_string_pretty(&dataset)?);

    Ok(())
}
