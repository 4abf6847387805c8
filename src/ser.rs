//! Structural writes: serde serialization into tree nodes.
//!
//! This module provides the [`NodeSerializer`] that writes any `Serialize`
//! value into a node, recursively creating map and sequence children.
//!
//! ## Overview
//!
//! - **Scalars**: numbers and booleans become plain scalars; strings and chars
//!   become quoted scalars (VALQUO), so `"045"` stays a string
//! - **Options and unit**: `None` and `()` become a plain `null`
//! - **Sequences and tuples**: become sequence nodes, one child per element
//! - **Maps and structs**: become map nodes, in serialization order
//! - **Enum variants**: unit variants are strings; data-carrying variants
//!   become a one-entry map `{variant: payload}`
//!
//! ## Usage
//!
//! Most users should go through [`NodeMut::serialize`](crate::NodeMut::serialize)
//! or [`to_tree`](crate::to_tree):
//!
//! ```rust
//! use serde::Serialize;
//! use yaml_tree::to_tree;
//!
//! #[derive(Serialize)]
//! struct Header { seq: u32, frame_id: String }
//!
//! let tree = to_tree(&Header { seq: 3, frame_id: "045".into() }).unwrap();
//! assert_eq!(tree.as_json().to_string(), r#"{"seq": 3,"frame_id": "045"}"#);
//! ```

use crate::arena::Text;
use crate::flags::NodeKind;
use crate::store::NodeId;
use crate::tree::Tree;
use crate::{Error, Result};
use serde::{ser, Serialize};

/// Serializes one value into one node of a tree.
///
/// The node is expected to be unset; [`NodeMut::serialize`](crate::NodeMut::serialize)
/// resets it before handing it over.
pub struct NodeSerializer<'t, 'a> {
    tree: &'t mut Tree<'a>,
    id: NodeId,
}

impl<'t, 'a> NodeSerializer<'t, 'a> {
    pub fn new(tree: &'t mut Tree<'a>, id: NodeId) -> Self {
        NodeSerializer { tree, id }
    }

    fn null(self) -> Result<()> {
        self.tree.set_val_text(self.id, Text::Borrowed("null"), false)
    }

    /// Turns the node into a one-entry map keyed by `variant` and returns the
    /// entry's value node.
    fn variant_entry(&mut self, variant: &'static str) -> Result<NodeId> {
        self.tree.set_kind(self.id, NodeKind::Map)?;
        let entry = self.tree.append_child(self.id)?;
        self.tree.set_key_text(entry, Text::Borrowed(variant), false)?;
        Ok(entry)
    }
}

impl<'t, 'a> ser::Serializer for NodeSerializer<'t, 'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'t, 'a>;
    type SerializeTuple = SeqSerializer<'t, 'a>;
    type SerializeTupleStruct = SeqSerializer<'t, 'a>;
    type SerializeTupleVariant = SeqSerializer<'t, 'a>;
    type SerializeMap = MapSerializer<'t, 'a>;
    type SerializeStruct = MapSerializer<'t, 'a>;
    type SerializeStructVariant = MapSerializer<'t, 'a>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_i128(self, v: i128) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_u128(self, v: u128) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.tree.write_val(self.id, &v)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.tree.write_val(self.id, v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        use ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<()> {
        self.null()
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.null()
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.null()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        mut self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let entry = self.variant_entry(variant)?;
        value.serialize(NodeSerializer::new(self.tree, entry))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.tree.set_kind(self.id, NodeKind::Seq)?;
        Ok(SeqSerializer {
            tree: self.tree,
            id: self.id,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        mut self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        let entry = self.variant_entry(variant)?;
        self.tree.set_kind(entry, NodeKind::Seq)?;
        Ok(SeqSerializer {
            tree: self.tree,
            id: entry,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        self.tree.set_kind(self.id, NodeKind::Map)?;
        Ok(MapSerializer {
            tree: self.tree,
            id: self.id,
            pending: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        mut self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        let entry = self.variant_entry(variant)?;
        self.tree.set_kind(entry, NodeKind::Map)?;
        Ok(MapSerializer {
            tree: self.tree,
            id: entry,
            pending: None,
        })
    }
}

/// Appends one child per element to a sequence node.
pub struct SeqSerializer<'t, 'a> {
    tree: &'t mut Tree<'a>,
    id: NodeId,
}

impl SeqSerializer<'_, '_> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = self.tree.append_child(self.id)?;
        value.serialize(NodeSerializer::new(&mut *self.tree, child))
    }
}

impl ser::SerializeSeq for SeqSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTuple for SeqSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for SeqSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for SeqSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Appends one keyed child per entry to a map node.
pub struct MapSerializer<'t, 'a> {
    tree: &'t mut Tree<'a>,
    id: NodeId,
    pending: Option<NodeId>,
}

impl MapSerializer<'_, '_> {
    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = self.tree.append_child(self.id)?;
        self.tree.set_key_text(child, Text::Borrowed(key), false)?;
        value.serialize(NodeSerializer::new(&mut *self.tree, child))
    }
}

impl ser::SerializeMap for MapSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = self.tree.append_child(self.id)?;
        key.serialize(KeySerializer {
            tree: &mut *self.tree,
            id: child,
        })?;
        self.pending = Some(child);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let child = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        value.serialize(NodeSerializer::new(&mut *self.tree, child))
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for MapSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for MapSerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Writes a map key. Keys must be scalars; textual keys are marked quoted.
struct KeySerializer<'t, 'a> {
    tree: &'t mut Tree<'a>,
    id: NodeId,
}

fn key_must_be_scalar() -> Error {
    Error::custom("map key must be a scalar")
}

impl ser::Serializer for KeySerializer<'_, '_> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = ser::Impossible<(), Error>;
    type SerializeTuple = ser::Impossible<(), Error>;
    type SerializeTupleStruct = ser::Impossible<(), Error>;
    type SerializeTupleVariant = ser::Impossible<(), Error>;
    type SerializeMap = ser::Impossible<(), Error>;
    type SerializeStruct = ser::Impossible<(), Error>;
    type SerializeStructVariant = ser::Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.tree.write_key(self.id, &v)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.tree.write_key(self.id, v)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(key_must_be_scalar())
    }

    fn serialize_none(self) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        self.tree
            .set_key_text(self.id, Text::Borrowed("null"), false)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.tree.write_key(self.id, variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_scalar())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_scalar())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_scalar())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_scalar())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_scalar())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_scalar())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_scalar())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_scalar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_tree;
    use indexmap::IndexMap;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[test]
    fn test_scalars() {
        assert_eq!(to_tree(&42).unwrap().as_json().to_string(), "42");
        assert_eq!(to_tree(&true).unwrap().as_json().to_string(), "true");
        assert_eq!(to_tree("hi").unwrap().as_json().to_string(), "\"hi\"");
        assert_eq!(to_tree(&'x').unwrap().as_json().to_string(), "\"x\"");
        assert_eq!(to_tree(&()).unwrap().as_json().to_string(), "null");
        assert_eq!(to_tree(&None::<i32>).unwrap().as_json().to_string(), "null");
    }

    #[test]
    fn test_numeric_looking_strings_stay_quoted() {
        let v = vec!["045", "1.2.3", "0.30.2", "true"];
        assert_eq!(
            to_tree(&v).unwrap().as_json().to_string(),
            r#"["045","1.2.3","0.30.2","true"]"#
        );
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut m = IndexMap::new();
        m.insert("bar", 2);
        m.insert("foo", 1);
        assert_eq!(
            to_tree(&m).unwrap().as_json().to_string(),
            r#"{"bar": 2,"foo": 1}"#
        );
    }

    #[test]
    fn test_integer_keys() {
        let mut m = BTreeMap::new();
        m.insert(66u32, 7);
        let tree = to_tree(&m).unwrap();
        let child = tree.root().child_at(0).unwrap();
        assert!(!child.is_key_quoted());
        assert_eq!(tree.as_json().to_string(), r#"{"66": 7}"#);
    }

    #[test]
    fn test_non_scalar_key_fails() {
        let mut m = BTreeMap::new();
        m.insert(vec![1], 1);
        assert!(matches!(to_tree(&m), Err(Error::Custom(_))));
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect(u32, u32),
        Named { name: String },
    }

    #[test]
    fn test_variants() {
        let shapes = vec![
            Shape::Empty,
            Shape::Circle(1.5),
            Shape::Rect(2, 3),
            Shape::Named { name: "n".into() },
        ];
        assert_eq!(
            to_tree(&shapes).unwrap().as_json().to_string(),
            r#"["Empty",{"Circle": 1.5},{"Rect": [2,3]},{"Named": {"name": "n"}}]"#
        );
    }

    #[test]
    fn test_bytes_become_sequence() {
        struct Raw;
        impl Serialize for Raw {
            fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_bytes(&[1, 2])
            }
        }
        assert_eq!(to_tree(&Raw).unwrap().as_json().to_string(), "[1,2]");
    }

    #[test]
    fn test_reserialize_replaces_children() {
        let mut tree = crate::Tree::new();
        tree.root_mut().serialize(&vec![1, 2, 3]).unwrap();
        tree.root_mut().serialize(&vec![4]).unwrap();
        assert_eq!(tree.as_json().to_string(), "[4]");
    }
}
