//! Structural reads: serde deserialization out of tree nodes.
//!
//! This module provides the [`NodeDeserializer`] that drives serde visitors
//! from the state of a node and its descendants.
//!
//! ## Overview
//!
//! - **Self-describing reads**: `deserialize_any` reports maps, sequences and
//!   scalars as such; plain scalars are classified (`null`, `~` and empty as
//!   unit, `true`/`false`, integers, floats, `.inf`/`.nan`), quoted scalars
//!   are always strings
//! - **Typed reads**: asking for a number parses the text through
//!   [`FromChars`](crate::FromChars), so a quoted `"10"` still reads as `10i32`
//! - **Zero copy**: strings are handed to visitors borrowed from the tree
//! - **Absent and empty**: a null node reads as `None`, an empty sequence or an
//!   empty map
//!
//! ## Usage
//!
//! Most users should go through [`NodeRef::deserialize`](crate::NodeRef::deserialize)
//! or [`from_tree`](crate::from_tree):
//!
//! ```rust
//! use serde::Deserialize;
//! use yaml_tree::{from_tree, parse_in_arena};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, tags: Vec<String> }
//!
//! let tree = parse_in_arena("x: 1\ntags: [a, '2']").unwrap();
//! let data: Data = from_tree(&tree).unwrap();
//! assert_eq!(data, Data { x: 1, tags: vec!["a".into(), "2".into()] });
//! ```

use crate::flags::NodeKind;
use crate::node::{Children, NodeRef};
use crate::scalar::{classify_plain, is_null_plain, FromChars, Plain};
use crate::{Error, Result};
use serde::de::value::BorrowedStrDeserializer;
use serde::{de, forward_to_deserialize_any};

/// Deserializes a value out of one node.
pub struct NodeDeserializer<'t, 'a> {
    node: NodeRef<'t, 'a>,
}

impl<'t, 'a> NodeDeserializer<'t, 'a> {
    pub fn new(node: NodeRef<'t, 'a>) -> Self {
        NodeDeserializer { node }
    }

    /// True for unset nodes, value-less scalars and plain null spellings.
    fn is_null(&self) -> bool {
        match self.node.kind() {
            NodeKind::Unset => self.node.val().is_none(),
            NodeKind::Scalar => match self.node.val() {
                None => true,
                Some(text) => !self.node.is_val_quoted() && is_null_plain(text),
            },
            NodeKind::Map | NodeKind::Seq => false,
        }
    }

    fn scalar_text(&self) -> Result<&'t str> {
        let kind = self.node.kind();
        if kind.is_container() {
            return Err(Error::type_mismatch("scalar", kind.name()));
        }
        Ok(self.node.val().unwrap_or(""))
    }

    fn parse<T: FromChars>(&self) -> Result<T> {
        let text = self.scalar_text()?;
        T::from_chars(text).ok_or_else(|| Error::parse_failure(std::any::type_name::<T>(), text))
    }

    fn seq(&self) -> Result<NodeSeq<'t, 'a>> {
        Ok(NodeSeq {
            iter: Some(self.node.children()?),
            remaining: self.node.num_children(),
        })
    }

    fn map(&self) -> Result<NodeMap<'t, 'a>> {
        Ok(NodeMap {
            iter: Some(self.node.children()?),
            remaining: self.node.num_children(),
            value: None,
        })
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $t:ty, $visit:ident;)*) => {$(
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'t>,
        {
            visitor.$visit(self.parse::<$t>()?)
        }
    )*};
}

impl<'t, 'a> de::Deserializer<'t> for NodeDeserializer<'t, 'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        match self.node.kind() {
            NodeKind::Map => visitor.visit_map(self.map()?),
            NodeKind::Seq => visitor.visit_seq(self.seq()?),
            NodeKind::Unset | NodeKind::Scalar => {
                let Some(text) = self.node.val() else {
                    return visitor.visit_unit();
                };
                if self.node.is_val_quoted() {
                    return visitor.visit_borrowed_str(text);
                }
                match classify_plain(text) {
                    Plain::Null => visitor.visit_unit(),
                    Plain::Bool(b) => visitor.visit_bool(b),
                    Plain::Int(i) => visitor.visit_i64(i),
                    Plain::UInt(u) => visitor.visit_u64(u),
                    Plain::Float(f) => visitor.visit_f64(f),
                    Plain::Str => visitor.visit_borrowed_str(text),
                }
            }
        }
    }

    deserialize_parsed! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
        deserialize_char => char, visit_char;
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        visitor.visit_borrowed_str(self.scalar_text()?)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        if self.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        if self.is_null() {
            visitor.visit_unit()
        } else {
            Err(Error::type_mismatch("null", self.node.kind().name()))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        match self.node.kind() {
            NodeKind::Seq => visitor.visit_seq(self.seq()?),
            _ if self.is_null() => visitor.visit_seq(NodeSeq::empty()),
            other => Err(Error::type_mismatch("sequence", other.name())),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        match self.node.kind() {
            NodeKind::Map => visitor.visit_map(self.map()?),
            _ if self.is_null() => visitor.visit_map(NodeMap::empty()),
            other => Err(Error::type_mismatch("map", other.name())),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        match self.node.kind() {
            NodeKind::Map => {
                let mut children = self.node.children()?;
                match (children.next(), children.next()) {
                    (Some(entry), None) => visitor.visit_enum(NodeEnum { entry }),
                    _ => Err(Error::custom("expected a map with exactly one entry")),
                }
            }
            NodeKind::Seq => Err(Error::type_mismatch("enum", "sequence")),
            NodeKind::Unset | NodeKind::Scalar => {
                visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(self.scalar_text()?))
            }
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        visitor.visit_unit()
    }
}

struct NodeSeq<'t, 'a> {
    iter: Option<Children<'t, 'a>>,
    remaining: usize,
}

impl NodeSeq<'_, '_> {
    fn empty() -> Self {
        NodeSeq {
            iter: None,
            remaining: 0,
        }
    }
}

impl<'t, 'a> de::SeqAccess<'t> for NodeSeq<'t, 'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'t>,
    {
        match self.iter.as_mut().and_then(Iterator::next) {
            Some(node) => {
                self.remaining = self.remaining.saturating_sub(1);
                seed.deserialize(NodeDeserializer::new(node)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct NodeMap<'t, 'a> {
    iter: Option<Children<'t, 'a>>,
    remaining: usize,
    value: Option<NodeRef<'t, 'a>>,
}

impl NodeMap<'_, '_> {
    fn empty() -> Self {
        NodeMap {
            iter: None,
            remaining: 0,
            value: None,
        }
    }
}

impl<'t, 'a> de::MapAccess<'t> for NodeMap<'t, 'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'t>,
    {
        match self.iter.as_mut().and_then(Iterator::next) {
            Some(node) => {
                self.remaining = self.remaining.saturating_sub(1);
                self.value = Some(node);
                seed.deserialize(KeyDeserializer::new(node)?).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'t>,
    {
        match self.value.take() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Deserializes a map key. Keys are strings unless a numeric or boolean
/// target asks for them to be parsed.
struct KeyDeserializer<'t> {
    key: &'t str,
}

impl<'t> KeyDeserializer<'t> {
    fn new(node: NodeRef<'t, '_>) -> Result<Self> {
        let key = node
            .key()
            .ok_or_else(|| Error::invalid_tree("map child without a key"))?;
        Ok(KeyDeserializer { key })
    }

    fn parse<T: FromChars>(&self) -> Result<T> {
        T::from_chars(self.key)
            .ok_or_else(|| Error::parse_failure(std::any::type_name::<T>(), self.key))
    }
}

impl<'t> de::Deserializer<'t> for KeyDeserializer<'t> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        visitor.visit_borrowed_str(self.key)
    }

    deserialize_parsed! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_i128 => i128, visit_i128;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_u128 => u128, visit_u128;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
        deserialize_char => char, visit_char;
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(self.key))
    }

    forward_to_deserialize_any! {
        <W: Visitor<'t>>
        str string bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// A one-entry map read as a data-carrying enum variant.
struct NodeEnum<'t, 'a> {
    entry: NodeRef<'t, 'a>,
}

impl<'t, 'a> de::EnumAccess<'t> for NodeEnum<'t, 'a> {
    type Error = Error;
    type Variant = NodeDeserializer<'t, 'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'t>,
    {
        let variant = seed.deserialize(KeyDeserializer::new(self.entry)?)?;
        Ok((variant, NodeDeserializer::new(self.entry)))
    }
}

impl<'t, 'a> de::VariantAccess<'t> for NodeDeserializer<'t, 'a> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        if self.is_null() {
            Ok(())
        } else {
            Err(Error::custom("expected unit variant"))
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'t>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'t>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::{from_tree, parse_in_arena, to_tree, Tree};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[test]
    fn test_plain_scalars_classified() {
        let tree = parse_in_arena("[1, -2, 2.5, true, null, ~, text, .inf]").unwrap();
        let v: serde_json::Value = from_tree(&tree).unwrap();
        assert_eq!(v[0], serde_json::json!(1));
        assert_eq!(v[1], serde_json::json!(-2));
        assert_eq!(v[2], serde_json::json!(2.5));
        assert_eq!(v[3], serde_json::json!(true));
        assert!(v[4].is_null());
        assert!(v[5].is_null());
        assert_eq!(v[6], serde_json::json!("text"));
        // serde_json has no infinity and stores it as null
        assert!(v[7].is_null() || v[7].is_f64());
    }

    #[test]
    fn test_quoted_scalars_are_strings() {
        let tree = parse_in_arena(r#"["10", '045', "true"]"#).unwrap();
        let v: Vec<serde_json::Value> = from_tree(&tree).unwrap();
        assert_eq!(v, vec![serde_json::json!("10"), serde_json::json!("045"), serde_json::json!("true")]);
    }

    #[test]
    fn test_quoted_number_parses_into_numeric_target() {
        let tree = parse_in_arena(r#"{n: "10"}"#).unwrap();
        let m: BTreeMap<String, i32> = from_tree(&tree).unwrap();
        assert_eq!(m["n"], 10);
    }

    #[test]
    fn test_borrowed_str() {
        let tree = parse_in_arena("{name: borrowed}").unwrap();
        #[derive(Deserialize)]
        struct View<'s> {
            name: &'s str,
        }
        let view: View<'_> = tree.root().deserialize().unwrap();
        assert_eq!(view.name, "borrowed");
    }

    #[test]
    fn test_integer_keys() {
        let tree = parse_in_arena("{1: a, 2: b}").unwrap();
        let m: BTreeMap<u32, String> = from_tree(&tree).unwrap();
        assert_eq!(m[&2], "b");
    }

    #[test]
    fn test_option_and_empty() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Opt {
            a: Option<i32>,
            b: Option<i32>,
            c: Vec<i32>,
        }
        let tree = parse_in_arena("a: ~\nb: 3\nc:").unwrap();
        let o: Opt = from_tree(&tree).unwrap();
        assert_eq!(o, Opt { a: None, b: Some(3), c: vec![] });
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let tree = parse_in_arena("{n: abc}").unwrap();
        let err = from_tree::<BTreeMap<String, i32>>(&tree).unwrap_err();
        assert!(matches!(err, crate::Error::ParseFailure { .. }));
    }

    #[test]
    fn test_type_mismatch() {
        let tree = parse_in_arena("[1, 2]").unwrap();
        assert!(matches!(
            from_tree::<BTreeMap<String, i32>>(&tree),
            Err(crate::Error::TypeMismatch { .. })
        ));
        assert!(from_tree::<i32>(&tree).is_err());
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect(u32, u32),
        Named { name: String },
    }

    #[test]
    fn test_enum_round_trip() {
        let shapes = vec![
            Shape::Empty,
            Shape::Circle(1.5),
            Shape::Rect(2, 3),
            Shape::Named { name: "n".into() },
        ];
        let tree = to_tree(&shapes).unwrap();
        let back: Vec<Shape> = from_tree(&tree).unwrap();
        assert_eq!(back, shapes);
    }

    #[test]
    fn test_unset_root_is_unit() {
        let tree = Tree::new();
        let v: Option<i32> = from_tree(&tree).unwrap();
        assert_eq!(v, None);
        from_tree::<()>(&tree).unwrap();
    }
}
