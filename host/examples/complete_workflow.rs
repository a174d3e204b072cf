//! Complete workflow example: generate a feed, then flatten it
//!
//! This example demonstrates:
//! - Seeded synthetic feed generation
//! - Streaming the feed through the record parser
//! - CSV rendering with the schema-derived header row
//!
//! Run with:
//! cargo run --example complete_workflow

use std::io;

use edi_host::faker::Generator;
use edi_host::write_csv;
use record::{Parser, Schema};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A small, reproducible roster: 3 employees plus their dependents.
    let mut generator = Generator::with_seed(3, 42);
    let mut feed = Vec::new();
    let enrollees = generator.render(&mut feed)?;

    eprintln!("generated {enrollees} enrollees");

    let parser = Parser::new(Schema::sample_834());
    let rows = write_csv(&parser, feed.as_slice(), io::stdout().lock())?;

    eprintln!("flattened {rows} records");
    Ok(())
}
