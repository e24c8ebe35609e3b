//! Parse an MML report, validate it and print every output format.
//!
//! Run with: cargo run --example report [FILE]
//!
//! Set `RUST_LOG=mml_bounded=trace` to follow the parser line by line.

use mml_bounded::{parse, serialize, validate, OutputFormat, Statistics};
use std::error::Error;

const SAMPLE: &str = "\
T:Emergency report
M:Author|Rescue team
M:Priority|CRITICAL

H:Current situation
P:Fire in the north sector
M:Area|500 hectares

H:Actions
P:Evacuate red zone
L:Sector map|maps/sector-7.png
IMG:Fire photo|photos/fire-1500.jpg
";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read(path)?,
        None => SAMPLE.as_bytes().to_vec(),
    };

    let doc = parse(&input);
    println!("Valid: {}\n", if validate(&doc) { "yes" } else { "no" });
    println!("{}\n", Statistics::collect(&doc).summary());

    let mut out = vec![0u8; 16 * 1024];
    for format in [
        OutputFormat::Json,
        OutputFormat::Html,
        OutputFormat::Compact,
        OutputFormat::Text,
    ] {
        let len = serialize(&doc, format, &mut out)?;
        println!("--- {} ---", format.extension());
        println!("{}\n", String::from_utf8_lossy(&out[..len]));
    }

    Ok(())
}
