use crate::{KdlDocument, KdlNode, KdlValue};

/// One step of a selection path.
///
/// A path is an ordered sequence of selectors; see [`select`] for how a
/// path walks a document.
#[derive(Debug, Clone, PartialEq)]
pub enum KdlSelector {
    /// Matches nodes with this name.
    Name(String),
    /// Matches nodes with this name where every attribute selector matches
    /// some attribute.
    Node(String, Vec<KdlAttrSelector>),
    /// Matches nodes carrying a property with this key.
    Attr(String),
    /// Matches nodes carrying a property with this key and value.
    AttrValue(String, KdlValue),
    /// Matches nodes carrying a positional argument with this value.
    Value(KdlValue),
}

impl KdlSelector {
    /// A name selector with attribute constraints.
    pub fn node(
        name: impl Into<String>,
        attrs: impl IntoIterator<Item = KdlAttrSelector>,
    ) -> Self {
        KdlSelector::Node(name.into(), attrs.into_iter().collect())
    }

    /// A property-key selector.
    pub fn attr(key: impl Into<String>) -> Self {
        KdlSelector::Attr(key.into())
    }

    /// A property key/value selector.
    pub fn attr_value(key: impl Into<String>, value: impl Into<KdlValue>) -> Self {
        KdlSelector::AttrValue(key.into(), value.into())
    }

    /// A positional-argument selector.
    pub fn value(value: impl Into<KdlValue>) -> Self {
        KdlSelector::Value(value.into())
    }

    fn matches(&self, node: &KdlNode) -> bool {
        match self {
            KdlSelector::Name(name) => node.name() == name,
            KdlSelector::Node(name, attrs) => {
                node.name() == name && attrs.iter().all(|attr| attr.matches(node))
            }
            KdlSelector::Attr(key) => has_prop(node, key),
            KdlSelector::AttrValue(key, value) => has_prop_value(node, key, value),
            KdlSelector::Value(value) => has_arg(node, value),
        }
    }
}

impl From<&str> for KdlSelector {
    fn from(name: &str) -> Self {
        KdlSelector::Name(name.to_string())
    }
}

impl From<String> for KdlSelector {
    fn from(name: String) -> Self {
        KdlSelector::Name(name)
    }
}

/// An attribute constraint inside [`KdlSelector::Node`].
///
/// The shorthand conversions mirror the selector surface: a `(key, value)`
/// pair constrains a property, a bare value constrains a positional
/// argument.
#[derive(Debug, Clone, PartialEq)]
pub enum KdlAttrSelector {
    /// Some property has this key.
    Key(String),
    /// Some property has this key and value.
    KeyValue(String, KdlValue),
    /// Some positional argument has this value.
    Value(KdlValue),
}

impl KdlAttrSelector {
    /// A property-key constraint.
    pub fn key(key: impl Into<String>) -> Self {
        KdlAttrSelector::Key(key.into())
    }

    fn matches(&self, node: &KdlNode) -> bool {
        match self {
            KdlAttrSelector::Key(key) => has_prop(node, key),
            KdlAttrSelector::KeyValue(key, value) => has_prop_value(node, key, value),
            KdlAttrSelector::Value(value) => has_arg(node, value),
        }
    }
}

impl<T> From<T> for KdlAttrSelector
where
    T: Into<KdlValue>,
{
    fn from(value: T) -> Self {
        KdlAttrSelector::Value(value.into())
    }
}

impl<K, V> From<(K, V)> for KdlAttrSelector
where
    K: Into<String>,
    V: Into<KdlValue>,
{
    fn from((key, value): (K, V)) -> Self {
        KdlAttrSelector::KeyValue(key.into(), value.into())
    }
}

fn has_prop(node: &KdlNode, key: &str) -> bool {
    node.entries().iter().any(|e| e.name() == Some(key))
}

fn has_prop_value(node: &KdlNode, key: &str, value: &KdlValue) -> bool {
    node.entries()
        .iter()
        .any(|e| e.name() == Some(key) && e.value().scalar() == value.scalar())
}

fn has_arg(node: &KdlNode, value: &KdlValue) -> bool {
    node.entries()
        .iter()
        .any(|e| e.is_arg() && e.value().scalar() == value.scalar())
}

/// Returns every node in the tree matched by `path`.
///
/// The path is tried starting at every node of the tree. A node matching
/// the first selector continues the remaining path into its children; a
/// node matching the final selector is part of the result. Value
/// comparisons ignore radix formats and annotations.
pub fn select<'a>(doc: &'a KdlDocument, path: &[KdlSelector]) -> Vec<&'a KdlNode> {
    let mut out = Vec::new();
    select_nodes(doc.nodes(), path, &mut out);
    out
}

fn select_nodes<'a>(nodes: &'a [KdlNode], path: &[KdlSelector], out: &mut Vec<&'a KdlNode>) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    for node in nodes {
        if first.matches(node) {
            if rest.is_empty() {
                push_unique(out, node);
            } else if let Some(children) = node.children() {
                select_nodes(children, rest, out);
            }
        }
        if let Some(children) = node.children() {
            select_nodes(children, path, out);
        }
    }
}

fn push_unique<'a>(out: &mut Vec<&'a KdlNode>, node: &'a KdlNode) {
    if !out.iter().any(|n| std::ptr::eq(*n, node)) {
        out.push(node);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(input: &str) -> KdlDocument {
        input.parse().expect("parse failed")
    }

    #[test]
    fn by_name() {
        let doc = doc("node1 {\n  node2 {\n    node3\n  }\n}");
        let found = select(&doc, &["node2".into()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "node2");
        assert!(found[0].children().is_some());
    }

    #[test]
    fn name_everywhere() {
        let doc = doc("a {\n  b\n}\nb\nc {\n  d {\n    b\n  }\n}");
        let found = select(&doc, &["b".into()]);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn chained_path() {
        let doc = doc("a {\n  b {\n    c 1\n  }\n}\nb {\n  c 2\n}");
        let found = select(&doc, &["a".into(), "c".into()]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get(0), Some(&1.into()));
    }

    #[test]
    fn attr_selectors() {
        let doc = doc("x a=1\nx a=2\ny a=1");
        let found = select(&doc, &[KdlSelector::attr("a")]);
        assert_eq!(found.len(), 3);
        let found = select(&doc, &[KdlSelector::attr_value("a", 1)]);
        assert_eq!(found.len(), 2);
        let found = select(
            &doc,
            &[KdlSelector::node("x", [KdlAttrSelector::from(("a", 2))])],
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn value_selectors() {
        let doc = doc("x 1 2\ny 3");
        let found = select(&doc, &[KdlSelector::value(2)]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "x");
        let found = select(
            &doc,
            &[KdlSelector::node("y", [KdlAttrSelector::from(3)])],
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn format_is_ignored_in_comparison() {
        let doc = doc("x 0xff");
        let found = select(&doc, &[KdlSelector::value(255)]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn empty_path() {
        let doc = doc("a");
        assert!(select(&doc, &[]).is_empty());
    }
}
