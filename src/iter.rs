use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::keys::CompositeKey;
use crate::node::{NodeArena, NodeId};

/// Lazy walk over every stored pair at or below a starting node, i.e. every
/// full key carrying the prefix that resolved to that node.
///
/// Traversal is breadth-first over the worklist: a node's stored pair is
/// yielded before any of its descendants'. Ordering between entries at the
/// same depth follows hash-map iteration order and is unspecified. The walk
/// is finite and single-pass; a fresh `find` starts a new one.
pub struct Iter<'a, K: CompositeKey, V> {
    nodes: &'a NodeArena<K, V>,
    pending: VecDeque<NodeId>,
}

impl<'a, K: CompositeKey, V> Iter<'a, K, V> {
    /// `None` for a prefix that resolved nothing: the iterator starts (and
    /// stays) exhausted.
    pub(crate) fn new(nodes: &'a NodeArena<K, V>, start: Option<NodeId>) -> Self {
        let mut pending = VecDeque::new();
        if let Some(start) = start {
            pending.push_back(start);
        }
        Self { nodes, pending }
    }
}

impl<'a, K: CompositeKey, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // Pop nodes until one carries data; enqueue children either way. The
        // starting node usually has none (a partial prefix stops part-way
        // through the key), so this also covers the initial skip-forward.
        loop {
            let id = self.pending.pop_front()?;
            let node = &self.nodes[id];
            K::push_children(&node.children, &mut self.pending);
            if let Some((key, value)) = node.data.as_ref() {
                return Some((key, value));
            }
        }
    }
}

impl<K: CompositeKey, V> FusedIterator for Iter<'_, K, V> {}
