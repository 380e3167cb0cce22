use std::fmt::Display;
use std::str::FromStr;

use crate::{
    error::{failure_from_kind, KdlErrorKind, KdlParseFailure},
    fmt::{write_node, EncodeOptions},
    parser, KdlEntry, KdlValue,
};

/// Represents a KDL
/// [`Node`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#node): a name,
/// optional type annotations, an ordered list of attributes, and an
/// optional children block.
#[derive(Debug, Clone, PartialEq)]
pub struct KdlNode {
    pub(crate) name: String,
    pub(crate) annotations: Vec<String>,
    pub(crate) entries: Vec<KdlEntry>,
    pub(crate) children: Option<Vec<KdlNode>>,
}

impl KdlNode {
    /// Creates a new node with the given name and nothing else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            entries: Vec::new(),
            children: None,
        }
    }

    /// The node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the node's name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The type annotations attached to this node, in order.
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    /// Attaches a type annotation, builder style.
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// A mutable reference to the node's type annotations.
    pub fn annotations_mut(&mut self) -> &mut Vec<String> {
        &mut self.annotations
    }

    /// The node's attributes (positional arguments and properties), in
    /// order.
    pub fn entries(&self) -> &[KdlEntry] {
        &self.entries
    }

    /// A mutable reference to the node's attributes.
    pub fn entries_mut(&mut self) -> &mut Vec<KdlEntry> {
        &mut self.entries
    }

    /// Appends an attribute.
    pub fn push(&mut self, entry: impl Into<KdlEntry>) {
        self.entries.push(entry.into());
    }

    /// The node's children: `None` if the node had no block at all,
    /// otherwise the block's nodes (possibly empty).
    pub fn children(&self) -> Option<&[KdlNode]> {
        self.children.as_deref()
    }

    /// A mutable reference to the node's children.
    pub fn children_mut(&mut self) -> Option<&mut Vec<KdlNode>> {
        self.children.as_mut()
    }

    /// Replaces the node's children block.
    pub fn set_children(&mut self, children: Vec<KdlNode>) {
        self.children = Some(children);
    }

    /// Removes the node's children block entirely.
    pub fn clear_children(&mut self) {
        self.children = None;
    }

    /// The `idx`-th positional argument's value, counting properties out.
    pub fn get(&self, idx: usize) -> Option<&KdlValue> {
        self.entries
            .iter()
            .filter(|e| e.is_arg())
            .nth(idx)
            .map(|e| e.value())
    }

    /// The value of the property named `key`. When duplicates exist (only
    /// possible on hand-built nodes), the most recent one wins.
    pub fn get_prop(&self, key: &str) -> Option<&KdlValue> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.name() == Some(key))
            .map(|e| e.value())
    }

    /// Iterates the node's positional argument values.
    pub fn iter_args(&self) -> impl Iterator<Item = &KdlValue> {
        self.entries
            .iter()
            .filter(|e| e.is_arg())
            .map(|e| e.value())
    }
}

impl Display for KdlNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        let _ = write_node(&mut out, self, 0, &EncodeOptions::default(), false);
        write!(f, "{out}")
    }
}

impl std::ops::Index<usize> for KdlNode {
    type Output = KdlValue;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("Argument out of range.")
    }
}

impl std::ops::Index<&str> for KdlNode {
    type Output = KdlValue;

    fn index(&self, index: &str) -> &Self::Output {
        self.get_prop(index).expect("No such property.")
    }
}

impl FromStr for KdlNode {
    type Err = KdlParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let doc = parser::decode_strict(s)?;
        let mut nodes = doc.nodes;
        if nodes.len() == 1 {
            Ok(nodes.remove(0))
        } else {
            Err(failure_from_kind(
                s,
                KdlErrorKind::InvalidParseState,
                (0..s.len()).into(),
                Some("expected exactly one node"),
            ))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accessors() {
        let mut node = KdlNode::new("config");
        node.push(1);
        node.push(("two", 2));
        node.push("three");
        assert_eq!(node.get(0), Some(&1.into()));
        assert_eq!(node.get(1), Some(&"three".into()));
        assert_eq!(node.get_prop("two"), Some(&2.into()));
        assert_eq!(node["two"], 2.into());
        assert_eq!(node[1], "three".into());
    }

    #[test]
    fn parsing() -> miette::Result<()> {
        let node: KdlNode = "foo 1 key=2".parse()?;
        assert_eq!(node.name(), "foo");
        assert_eq!(node.entries().len(), 2);

        assert!("foo\nbar".parse::<KdlNode>().is_err());
        Ok(())
    }

    #[test]
    fn display() {
        let mut node = KdlNode::new("hello");
        node.push(1);
        node.push(("name", "world"));
        assert_eq!(format!("{}", node), "hello 1 name=world");
    }
}
