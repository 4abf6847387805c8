//! Building a tree by hand and emitting it as JSON and YAML.
//!
//! Run with: cargo run --example build_and_emit

use std::error::Error;
use yaml_tree::{emit_json, emit_yaml, Style, Tree};

fn main() -> Result<(), Box<dyn Error>> {
    let name = String::from("arm-01");

    let mut tree = Tree::new();
    tree.root_mut().set_map()?;

    // a view into `name`: not copied, so `name` must outlive the tree
    tree.at("name").set_val(&name)?;
    // written through ToChars into the tree's arena
    tree.at("serial").write("0042")?;
    tree.at("joints").write(&6)?;

    {
        let mut limits = tree.at("limits");
        limits.set_seq()?.set_style(Style::Flow)?;
        for limit in [-1.5, 1.5] {
            limits.append_child()?.write(&limit)?;
        }
    }

    // nothing is created until the nested handle is written to
    tree.at("calibration").at("offset").write(&0.25)?;

    println!("JSON:\n{}\n", emit_json(&tree)?);
    println!("YAML:\n{}", emit_yaml(&tree)?);

    let serial = tree.root().child("serial")?;
    assert!(serial.is_val_quoted());
    println!("✓ serial stays a string: {}", serial.emit_json()?);

    Ok(())
}
