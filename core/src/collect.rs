//! Flattening a traversal into node/identifier snapshots.

use hashbrown::HashMap;

use crate::ast::{Node, NodeKey};
use crate::path::Path;
use crate::walker::inspect;
use crate::{String, ToString, Vec};

/// A node and the frozen path it was visited at.
#[derive(Debug, Clone)]
pub struct NodeWithId<'a> {
    pub node: Node<'a>,
    pub id: Path,
}

impl NodeWithId<'_> {
    /// The identifier string (`id` joined with `/`).
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }
}

/// Every node reachable from `root`, with its identifier, in walk order.
pub fn collect_all<'a>(root: impl Into<Node<'a>>) -> Vec<NodeWithId<'a>> {
    let mut nodes = Vec::new();
    inspect(root, |node, path| {
        if let Some(node) = node {
            nodes.push(NodeWithId {
                node,
                id: path.clone(),
            });
        }
        true
    });
    tracing::debug!(nodes = nodes.len(), "collected node identifiers");
    nodes
}

/// Node identity to identifier.
///
/// Entries keep walk order; lookups go through an index keyed by node
/// identity, so structurally equal nodes at different positions never
/// collide.
#[derive(Debug, Default)]
pub struct NodeMap<'a> {
    entries: Vec<NodeWithId<'a>>,
    index: HashMap<NodeKey, usize>,
}

impl<'a> NodeMap<'a> {
    pub fn get(&self, node: impl Into<Node<'a>>) -> Option<&Path> {
        let key = node.into().key();
        self.index.get(&key).map(|&i| &self.entries[i].id)
    }

    pub fn contains(&self, node: impl Into<Node<'a>>) -> bool {
        self.get(node).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in walk order.
    pub fn iter(&self) -> impl Iterator<Item = (Node<'a>, &Path)> + '_ {
        self.entries.iter().map(|entry| (entry.node, &entry.id))
    }

    fn insert(&mut self, entry: NodeWithId<'a>) {
        let key = entry.node.key();
        match self.index.get(&key) {
            // A node reachable twice keeps the path of its last visit.
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }
}

/// Builds the identity map for the tree rooted at `root`.
pub fn build_map<'a>(root: impl Into<Node<'a>>) -> NodeMap<'a> {
    let mut map = NodeMap::default();
    for entry in collect_all(root) {
        map.insert(entry);
    }
    tracing::debug!(entries = map.len(), "built node map");
    map
}

/// An identifier that more than one node received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub id: String,
    /// Positions in the collected sequence, ascending.
    pub positions: Vec<usize>,
}

/// Identifiers assigned to more than one entry, in order of first use.
pub fn duplicate_ids(nodes: &[NodeWithId<'_>]) -> Vec<Duplicate> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
    let mut duplicates: Vec<Duplicate> = Vec::new();
    for (position, entry) in nodes.iter().enumerate() {
        let id = entry.id_string();
        match seen.get(&id) {
            Some(&first) => match duplicates.iter_mut().find(|d| d.id == id) {
                Some(duplicate) => duplicate.positions.push(position),
                None => duplicates.push(Duplicate {
                    id,
                    positions: crate::vec![first, position],
                }),
            },
            None => {
                seen.insert(id, position);
            }
        }
    }
    if !duplicates.is_empty() {
        tracing::warn!(count = duplicates.len(), "duplicate node identifiers");
    }
    duplicates
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod collect_test;
