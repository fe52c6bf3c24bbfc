//! Stream a large generated input row by row without holding it in memory.
//!
//! Run with: cargo run --example streaming

use csvloader::{Dialect, Reader};
use std::error::Error;
use std::io::{self, Read};

/// Produces `rows` lines of CSV on demand.
struct Generator {
    next: usize,
    rows: usize,
    pending: Vec<u8>,
}

impl Generator {
    fn new(rows: usize) -> Self {
        Generator {
            next: 0,
            rows,
            pending: b"id,value,label\n".to_vec(),
        }
    }
}

impl Read for Generator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pending.len() < buf.len() && self.next < self.rows {
            let line = format!("{},{},\"item {}\"\n", self.next, self.next as f64 / 4.0, self.next);
            self.pending.extend_from_slice(line.as_bytes());
            self.next += 1;
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut reader = Reader::new(Generator::new(1_000_000), Dialect::default())?;

    let header = reader.header()?.cloned();
    println!("Header: {:?}", header.map(|h| h.into_names()));

    let mut sum = 0.0;
    for row in reader.rows() {
        let row = row?;
        sum += row[1].as_f64().unwrap_or_default();
    }

    println!("Rows read: {}", reader.rows_read());
    println!("Sum of values: {}", sum);
    println!("Stopped at {}", reader.position());

    // Stopping early releases everything when the reader is dropped.
    let first_ten: Vec<_> = Reader::new(Generator::new(1_000_000), Dialect::default())?
        .into_rows()
        .take(10)
        .collect::<Result<_, csvloader::Error>>()?;
    println!("First ten rows: {}", first_ten.len());

    Ok(())
}
