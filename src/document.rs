use std::fmt::Display;
use std::str::FromStr;

use crate::{
    error::KdlParseFailure,
    fmt::{write_document, EncodeOptions},
    parser,
    query::{self, KdlSelector},
    KdlNode, KdlValue,
};

/// Represents a KDL
/// [`Document`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#document):
/// an ordered sequence of top-level nodes.
///
/// # Examples
///
/// The easiest way to create a `KdlDocument` is to parse it:
/// ```rust
/// # use knotwork::KdlDocument;
/// let kdl: KdlDocument = "foo 1 2 3\nbar 4 5 6".parse().expect("parse failed");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KdlDocument {
    pub(crate) nodes: Vec<KdlNode>,
}

impl KdlDocument {
    /// Creates a new, empty document.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets the first node with a matching name.
    pub fn get(&self, name: &str) -> Option<&KdlNode> {
        self.nodes.iter().find(move |n| n.name() == name)
    }

    /// Gets a mutable reference to the first node with a matching name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut KdlNode> {
        self.nodes.iter_mut().find(move |n| n.name() == name)
    }

    /// Gets the first argument (value) of the first node with a matching
    /// name. This is a shorthand utility for cases where a document is
    /// being used as a key/value store.
    ///
    /// # Examples
    ///
    /// Given a document like this:
    /// ```kdl
    /// foo 1
    /// bar #false
    /// ```
    ///
    /// You can fetch the value of `foo` in a single call like this:
    /// ```rust
    /// # use knotwork::{KdlDocument, KdlValue};
    /// # let doc: KdlDocument = "foo 1\nbar #false".parse().unwrap();
    /// assert_eq!(doc.get_arg("foo"), Some(&1.into()));
    /// ```
    pub fn get_arg(&self, name: &str) -> Option<&KdlValue> {
        self.get(name).and_then(|node| node.get(0))
    }

    /// Returns an iterator over all arguments (values) of the first node
    /// with a matching name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use knotwork::{KdlDocument, KdlValue};
    /// # let doc: KdlDocument = "foo 1 2 3".parse().unwrap();
    /// assert_eq!(
    ///   doc.iter_args("foo").collect::<Vec<&KdlValue>>(),
    ///   vec![&1.into(), &2.into(), &3.into()]
    /// );
    /// ```
    pub fn iter_args(&self, name: &str) -> impl Iterator<Item = &KdlValue> {
        self.get(name)
            .map(|n| n.entries())
            .unwrap_or_default()
            .iter()
            .filter(|e| e.name().is_none())
            .map(|e| e.value())
    }

    /// This utility makes it easy to interact with a KDL convention where
    /// child nodes named `-` are treated as array-ish values.
    ///
    /// # Examples
    ///
    /// Given a document like this:
    /// ```kdl
    /// foo {
    ///   - 1
    ///   - 2
    ///   - #false
    /// }
    /// ```
    ///
    /// You can fetch the dashed child values of `foo` in a single call like this:
    /// ```rust
    /// # use knotwork::{KdlDocument, KdlValue};
    /// # let doc: KdlDocument = "foo {\n - 1\n - 2\n - #false\n}".parse().unwrap();
    /// assert_eq!(
    ///     doc.iter_dash_args("foo").collect::<Vec<&KdlValue>>(),
    ///     vec![&1.into(), &2.into(), &false.into()]
    /// );
    /// ```
    pub fn iter_dash_args(&self, name: &str) -> impl Iterator<Item = &KdlValue> {
        self.get(name)
            .and_then(|n| n.children())
            .unwrap_or_default()
            .iter()
            .filter(|n| n.name() == "-")
            .filter_map(|n| n.get(0))
    }

    /// Returns a reference to this document's nodes.
    pub fn nodes(&self) -> &[KdlNode] {
        &self.nodes
    }

    /// Returns a mutable reference to this document's nodes.
    pub fn nodes_mut(&mut self) -> &mut Vec<KdlNode> {
        &mut self.nodes
    }

    /// Returns all nodes anywhere in the tree that match `path`. See
    /// [`select`](crate::select) for the matching rules.
    pub fn select(&self, path: &[KdlSelector]) -> Vec<&KdlNode> {
        query::select(self, path)
    }
}

impl Display for KdlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        let _ = write_document(&mut out, self, &EncodeOptions::default(), false);
        write!(f, "{out}")
    }
}

impl FromStr for KdlDocument {
    type Err = KdlParseFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::decode_strict(s)
    }
}

impl FromIterator<KdlNode> for KdlDocument {
    fn from_iter<T: IntoIterator<Item = KdlNode>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accessors() -> miette::Result<()> {
        let doc: KdlDocument = "foo 1 2 3\nbar prop=value".parse()?;
        assert_eq!(doc.nodes().len(), 2);
        assert_eq!(doc.get_arg("foo"), Some(&1.into()));
        assert_eq!(
            doc.iter_args("foo").collect::<Vec<_>>(),
            vec![&1.into(), &2.into(), &3.into()]
        );
        assert_eq!(
            doc.get("bar").and_then(|n| n.get_prop("prop")),
            Some(&KdlValue::ident("value"))
        );
        Ok(())
    }
}
