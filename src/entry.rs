use std::fmt::Display;

use crate::{
    fmt::{write_entry, EncodeOptions},
    KdlValue,
};

/// KDL Entries are the "attributes" of KDL nodes: either a positional
/// [`Argument`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#argument)
/// or a key/value
/// [`Property`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#property).
#[derive(Debug, Clone, PartialEq)]
pub enum KdlEntry {
    /// A positional argument.
    Arg(KdlValue),
    /// A `key=value` property. The key is always an identifier-typed value
    /// with no annotations.
    Prop {
        /// The property name.
        key: KdlValue,
        /// The property value.
        value: KdlValue,
    },
}

impl KdlEntry {
    /// Creates a new positional (argument) entry.
    pub fn new(value: impl Into<KdlValue>) -> Self {
        KdlEntry::Arg(value.into())
    }

    /// Creates a new key/value (property) entry.
    pub fn new_prop(key: impl Into<String>, value: impl Into<KdlValue>) -> Self {
        KdlEntry::Prop {
            key: KdlValue::ident(key.into()),
            value: value.into(),
        }
    }

    /// The property name, if this entry is a property.
    pub fn name(&self) -> Option<&str> {
        match self {
            KdlEntry::Arg(_) => None,
            KdlEntry::Prop { key, .. } => key.as_ident(),
        }
    }

    /// The entry's value: the argument itself, or the value side of a
    /// property.
    pub fn value(&self) -> &KdlValue {
        match self {
            KdlEntry::Arg(value) => value,
            KdlEntry::Prop { value, .. } => value,
        }
    }

    /// A mutable reference to the entry's value.
    pub fn value_mut(&mut self) -> &mut KdlValue {
        match self {
            KdlEntry::Arg(value) => value,
            KdlEntry::Prop { value, .. } => value,
        }
    }

    /// Returns `true` for positional arguments.
    pub fn is_arg(&self) -> bool {
        matches!(self, KdlEntry::Arg(_))
    }

    /// Returns `true` for properties.
    pub fn is_prop(&self) -> bool {
        matches!(self, KdlEntry::Prop { .. })
    }
}

/// Marks which entries survive property de-duplication: for every property
/// key, only the latest occurrence is kept, at its latest position;
/// positional arguments always survive in place.
pub(crate) fn survivor_mask(entries: &[KdlEntry]) -> Vec<bool> {
    use std::collections::HashMap;
    let mut last: HashMap<&str, usize> = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        if let Some(name) = entry.name() {
            last.insert(name, i);
        }
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry.name() {
            Some(name) => last.get(name) == Some(&i),
            None => true,
        })
        .collect()
}

impl Display for KdlEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        let _ = write_entry(&mut out, self, &EncodeOptions::default(), false);
        write!(f, "{out}")
    }
}

impl<T> From<T> for KdlEntry
where
    T: Into<KdlValue>,
{
    fn from(value: T) -> Self {
        KdlEntry::new(value)
    }
}

impl<K, V> From<(K, V)> for KdlEntry
where
    K: Into<String>,
    V: Into<KdlValue>,
{
    fn from((key, value): (K, V)) -> Self {
        KdlEntry::new_prop(key, value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::KdlScalar;

    #[test]
    fn new() {
        let entry = KdlEntry::new(42);
        assert!(entry.is_arg());
        assert_eq!(entry.value().scalar(), &KdlScalar::Integer(42.into()));

        let entry = KdlEntry::new_prop("name", 42);
        assert!(entry.is_prop());
        assert_eq!(entry.name(), Some("name"));
        assert_eq!(entry.value().scalar(), &KdlScalar::Integer(42.into()));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", KdlEntry::new(42)), "42");
        assert_eq!(format!("{}", KdlEntry::new_prop("name", 42)), "name=42");
    }

    #[test]
    fn survivors() {
        let entries = vec![
            KdlEntry::new_prop("a", 1),
            KdlEntry::new(10),
            KdlEntry::new_prop("b", 2),
            KdlEntry::new_prop("a", 3),
        ];
        assert_eq!(survivor_mask(&entries), vec![false, true, true, true]);
    }
}
