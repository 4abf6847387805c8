/// Builds a [`Tree`](crate::Tree) from a JSON-like literal.
///
/// Returns `Result<Tree<'static>>`. Leaves that are not `null`, `true`,
/// `false` or a nested literal are written with
/// [`NodeMut::serialize`](crate::NodeMut::serialize), so strings come out
/// quoted and numbers plain. Negative numbers and other multi-token leaves
/// need parentheses inside collections: `[(-1), 2]`.
///
/// ```rust
/// use yaml_tree::{emit_json, tree};
///
/// let t = tree!({
///     "name": "Alice",
///     "age": 30,
///     "tags": ["rust", "yaml"],
///     "manager": null
/// })
/// .unwrap();
/// assert_eq!(
///     emit_json(&t).unwrap(),
///     r#"{"name": "Alice","age": 30,"tags": ["rust","yaml"],"manager": null}"#
/// );
/// ```
#[macro_export]
macro_rules! tree {
    ($($body:tt)+) => {{
        let mut tree = $crate::Tree::new();
        let filled: $crate::Result<()> = {
            let mut root = tree.root_mut();
            $crate::__tree_fill!(root, $($body)+)
        };
        filled.map(|()| tree)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tree_fill {
    ($node:ident, null) => {
        $node.set_val("null").map(|_| ())
    };

    ($node:ident, true) => {
        $node.set_val("true").map(|_| ())
    };

    ($node:ident, false) => {
        $node.set_val("false").map(|_| ())
    };

    ($node:ident, []) => {
        $node.set_seq().map(|_| ())
    };

    ($node:ident, [ $($elem:tt),* $(,)? ]) => {
        (|| -> $crate::Result<()> {
            $node.set_seq()?;
            $({
                let mut child = $node.append_child()?;
                $crate::__tree_fill!(child, $elem)?;
            })*
            Ok(())
        })()
    };

    ($node:ident, {}) => {
        $node.set_map().map(|_| ())
    };

    ($node:ident, { $($key:literal : $value:tt),* $(,)? }) => {
        (|| -> $crate::Result<()> {
            $node.set_map()?;
            $({
                let mut child = $node.at($key);
                $crate::__tree_fill!(child, $value)?;
            })*
            Ok(())
        })()
    };

    ($node:ident, $leaf:expr) => {
        $node.serialize(&$leaf).map(|_| ())
    };
}
