use rustc_hash::FxHashMap;
use serde::ser::SerializeSeq;
use serde::Serialize;
use serde::Serializer;

use crate::errors::ModelError;
use crate::key::NodeKey;
use crate::tree::NodeId;

/// Insertion-ordered child collection with a sibling-key index.
///
/// Order drives rendering; the index makes `get` and `remove` by key
/// cheap. Keys are unique within one collection.
#[derive(Debug, Clone, Default)]
pub struct NodeCollection {
    order: Vec<NodeId>,
    index: FxHashMap<NodeKey, NodeId>,
}

impl NodeCollection {
    pub fn insert(&mut self, key: NodeKey, id: NodeId) -> Result<(), ModelError> {
        if self.index.contains_key(&key) {
            return Err(ModelError::DuplicateKey { key });
        }
        self.index.insert(key, id);
        self.order.push(id);
        Ok(())
    }

    /// Insert a batch of entries ahead of every existing child,
    /// preserving the batch's own order.
    pub fn prepend(&mut self, entries: Vec<(NodeKey, NodeId)>) -> Result<(), ModelError> {
        for (key, _) in &entries {
            if self.index.contains_key(key) {
                return Err(ModelError::DuplicateKey { key: key.clone() });
            }
        }
        let mut order = Vec::with_capacity(entries.len() + self.order.len());
        for (key, id) in entries {
            self.index.insert(key, id);
            order.push(id);
        }
        order.extend(self.order.drain(..));
        self.order = order;
        Ok(())
    }

    pub fn get(&self, key: &NodeKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn remove(&mut self, key: &NodeKey) -> Option<NodeId> {
        let id = self.index.remove(key)?;
        self.order.retain(|candidate| *candidate != id);
        Some(id)
    }

    pub fn contains_key(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, NodeId>> {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drain every entry in order, leaving the collection empty.
    pub(crate) fn take_entries(&mut self) -> Vec<(NodeKey, NodeId)> {
        let index = std::mem::take(&mut self.index);
        let mut by_id: FxHashMap<NodeId, NodeKey> =
            index.into_iter().map(|(key, id)| (id, key)).collect();
        self.order
            .drain(..)
            .filter_map(|id| by_id.remove(&id).map(|key| (key, id)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a NodeCollection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for NodeCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.order.len()))?;
        for id in &self.order {
            seq.serialize_element(id)?;
        }
        seq.end()
    }
}
