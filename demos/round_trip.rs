//! Serde types through JSON and YAML text.
//!
//! Run with: cargo run --example round_trip

use serde::{Deserialize, Serialize};
use std::error::Error;
use yaml_tree::{emit_json, emit_yaml, from_tree, parse_in_arena, parse_in_place, to_tree};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Reading {
    sensor: String,
    firmware: String,
    values: Vec<f64>,
    unit: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let reading = Reading {
        sensor: "thermo-7".to_string(),
        firmware: "9001".to_string(),
        values: vec![21.5, 21.75, 22.0],
        unit: None,
    };

    let tree = to_tree(&reading)?;
    let json = emit_json(&tree)?;
    let yaml = emit_yaml(&tree)?;
    println!("JSON:\n{}\n", json);
    println!("YAML:\n{}", yaml);

    // borrowed parse: plain and unescaped scalars point into `json`
    let from_json = parse_in_place(&json)?;
    let back: Reading = from_tree(&from_json)?;
    assert_eq!(back, reading);

    // owned parse: the tree keeps its own copy of every scalar
    let from_yaml = parse_in_arena(&yaml)?;
    let back: Reading = from_tree(&from_yaml)?;
    assert_eq!(back, reading);
    println!("✓ Round-trip successful");

    Ok(())
}
