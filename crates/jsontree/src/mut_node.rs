//! The mutable write tree handed to [`write`](crate::write).

use alloc::{collections::BTreeMap, string::String, vec::Vec};

/// One node of a write tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MutNode {
    Null,
    Bool(bool),
    Sint(i64),
    Uint(u64),
    Real(f64),
    /// Pre-formatted number text, written verbatim (used for integers wider
    /// than 64 bits).
    Raw(String),
    Str(String),
    Arr(Vec<MutNode>),
    Obj(MutObject),
}

/// Object members in insertion order.
///
/// Inserting a key that is already present replaces its value in place: the
/// last write wins and the key keeps its first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutObject {
    entries: Vec<(String, MutNode)>,
    index: BTreeMap<String, usize>,
}

impl MutObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: BTreeMap::new(),
        }
    }

    /// Insert a member, returning the value it replaced.
    pub fn insert(&mut self, key: String, value: MutNode) -> Option<MutNode> {
        if let Some(&slot) = self.index.get(&key) {
            return Some(core::mem::replace(&mut self.entries[slot].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MutNode> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &MutNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, MutNode)> for MutObject {
    fn from_iter<T: IntoIterator<Item = (K, MutNode)>>(iter: T) -> Self {
        let mut obj = MutObject::new();
        for (k, v) in iter {
            obj.insert(k.into(), v);
        }
        obj
    }
}

impl From<bool> for MutNode {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for MutNode {
    fn from(n: i64) -> Self {
        Self::Sint(n)
    }
}

impl From<u64> for MutNode {
    fn from(n: u64) -> Self {
        Self::Uint(n)
    }
}

impl From<f64> for MutNode {
    fn from(n: f64) -> Self {
        Self::Real(n)
    }
}

impl From<&str> for MutNode {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for MutNode {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<MutNode>> for MutNode {
    fn from(items: Vec<MutNode>) -> Self {
        Self::Arr(items)
    }
}

impl From<MutObject> for MutNode {
    fn from(obj: MutObject) -> Self {
        Self::Obj(obj)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::{MutNode, MutObject};

    #[test]
    fn duplicate_key_keeps_first_position_last_value() {
        let mut obj = MutObject::new();
        assert_eq!(obj.insert("a".to_string(), MutNode::Sint(1)), None);
        assert_eq!(obj.insert("b".to_string(), MutNode::Sint(2)), None);
        assert_eq!(
            obj.insert("a".to_string(), MutNode::Sint(3)),
            Some(MutNode::Sint(1))
        );

        let members: Vec<_> = obj.iter().collect();
        assert_eq!(
            members,
            [("a", &MutNode::Sint(3)), ("b", &MutNode::Sint(2))]
        );
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("a"), Some(&MutNode::Sint(3)));
    }
}
