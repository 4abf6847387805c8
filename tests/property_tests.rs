//! Property-based tests for the guarantees the tree makes across emit and
//! parse: serde values survive both text forms, emitted JSON is always valid
//! JSON, and plain numbers stay bare only when they are JSON numbers.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use yaml_tree::{emit_json, emit_yaml, from_tree, is_json_number, parse_in_arena, to_tree, Tree};

fn through_json<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    let json = match to_tree(value).and_then(|t| emit_json(&t)) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Emit failed: {}", e);
            return false;
        }
    };
    match parse_in_arena(&json).and_then(|t| from_tree::<T>(&t)) {
        Ok(back) => *value == back,
        Err(e) => {
            eprintln!("Read back failed: {}", e);
            eprintln!("JSON was: {}", json);
            false
        }
    }
}

fn through_yaml<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    let yaml = match to_tree(value).and_then(|t| emit_yaml(&t)) {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Emit failed: {}", e);
            return false;
        }
    };
    match parse_in_arena(&yaml).and_then(|t| from_tree::<T>(&t)) {
        Ok(back) => *value == back,
        Err(e) => {
            eprintln!("Read back failed: {}", e);
            eprintln!("YAML was: {}", yaml);
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u32,
    label: String,
    score: i64,
    tags: Vec<String>,
    parent: Option<u32>,
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<u32>(),
        ".*",
        any::<i64>(),
        prop::collection::vec("[a-z0-9 :#'\"-]{0,12}", 0..4),
        proptest::option::of(any::<u32>()),
    )
        .prop_map(|(id, label, score, tags, parent)| Record {
            id,
            label,
            score,
            tags,
            parent,
        })
}

proptest! {
    #[test]
    fn prop_i64_json(n in any::<i64>()) {
        prop_assert!(through_json(&n));
    }

    #[test]
    fn prop_u64_yaml(n in any::<u64>()) {
        prop_assert!(through_yaml(&n));
    }

    #[test]
    fn prop_bool_both(b in any::<bool>()) {
        prop_assert!(through_json(&b));
        prop_assert!(through_yaml(&b));
    }

    #[test]
    fn prop_finite_f64_json(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        prop_assert!(through_json(&f));
    }

    #[test]
    fn prop_any_string_both(s in ".*") {
        prop_assert!(through_json(&s));
        prop_assert!(through_yaml(&s));
    }

    #[test]
    fn prop_vec_option_i32(v in prop::collection::vec(proptest::option::of(any::<i32>()), 0..16)) {
        prop_assert!(through_json(&v));
        prop_assert!(through_yaml(&v));
    }

    #[test]
    fn prop_record_both(r in record_strategy()) {
        prop_assert!(through_json(&r));
        prop_assert!(through_yaml(&r));
    }

    #[test]
    fn prop_emitted_json_is_valid(r in prop::collection::vec(record_strategy(), 0..4)) {
        let json = emit_json(&to_tree(&r).unwrap()).unwrap();
        let parsed: Result<serde_json::Value, _> = serde_json::from_str(&json);
        prop_assert!(parsed.is_ok(), "invalid JSON: {}", json);
        prop_assert_eq!(parsed.unwrap(), serde_json::to_value(&r).unwrap());
    }

    #[test]
    fn prop_plain_scalars_bare_only_if_number(text in "[0-9.eE+-]{1,8}") {
        let mut tree = Tree::new();
        tree.root_mut().set_val(&text).unwrap();
        let json = emit_json(&tree).unwrap();
        if is_json_number(&text) {
            prop_assert_eq!(json, text);
        } else {
            prop_assert!(json.starts_with('"') && json.ends_with('"'));
            prop_assert_eq!(serde_json::from_str::<String>(&json).unwrap(), text);
        }
    }

    #[test]
    fn prop_json_numbers_agree_with_serde_json(text in "-?[0-9]{1,4}(\\.[0-9]{1,3})?([eE][+-]?[0-9]{1,2})?") {
        let ours = is_json_number(&text);
        let theirs = serde_json::from_str::<serde_json::Number>(&text).is_ok();
        prop_assert_eq!(ours, theirs);
    }
}
