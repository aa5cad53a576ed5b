use std::collections::VecDeque;
use std::fmt;

use log::trace;

use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::keys::{CompositeKey, KeyPrefix};
use crate::node::{Node, NodeArena, NodeId};

/// An in-memory map from a fixed-arity composite key `K` (a tuple of typed
/// parts) to a value `V`, supporting lookup, counting, existence checks and
/// erasure by any contiguous prefix of the key.
///
/// Invariants maintained throughout:
/// - a node at depth `d` only populates the child map for position `d`;
/// - stored pairs live only at full depth;
/// - `len` equals the number of data-bearing nodes reachable from the root
///   and is maintained incrementally, never recomputed by walking.
///
/// Erasing an interior prefix drops the whole subtree under it but never
/// prunes ancestors above the erase point; empty intermediate nodes are
/// deliberately left behind.
pub struct MultiKeyMap<K: CompositeKey, V> {
    nodes: NodeArena<K, V>,
    root: NodeId,
    len: usize,
}

impl<K: CompositeKey, V> MultiKeyMap<K, V> {
    pub fn new() -> Self {
        let mut nodes = NodeArena::new();
        let root = nodes.add(Node::root());
        Self {
            nodes,
            root,
            len: 0,
        }
    }

    /// Inserts a value at a full key. Refuses to overwrite: returns true if
    /// the pair was stored, false if the key was already present (the stored
    /// value is left untouched).
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let node_id = key.locate_or_create(&mut self.nodes, self.root);
        trace!("insert: resolved node {:?}", node_id);
        let node = &mut self.nodes[node_id];
        if node.data.is_some() {
            return false;
        }
        node.data = Some((key, value));
        self.len += 1;
        true
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let node_id = key.locate(&self.nodes, self.root)?;
        let (_, value) = self.nodes[node_id].data.as_ref()?;
        Some(value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node_id = key.locate(&self.nodes, self.root)?;
        let (_, value) = self.nodes[node_id].data.as_mut()?;
        Some(value)
    }

    /// Fallible lookup: `Error::KeyNotFound` when the key holds no value.
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Index-style access: returns the value stored at `key`, inserting a
    /// default one first if the key is absent. Counts the element exactly
    /// once no matter how often it is called.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let node_id = key.locate_or_create(&mut self.nodes, self.root);
        trace!("get_or_default: resolved node {:?}", node_id);
        if self.nodes[node_id].data.is_none() {
            self.nodes[node_id].data = Some((key, V::default()));
            self.len += 1;
        }
        let (_, value) = self.nodes[node_id].data.as_mut().expect("data populated above");
        value
    }

    /// Finds every stored pair whose key starts with `prefix`. An absent
    /// prefix yields an empty iterator, not an error.
    pub fn find<P: KeyPrefix<K>>(&self, prefix: &P) -> Iter<'_, K, V> {
        let start = prefix.locate(&self.nodes, self.root);
        trace!("find: {}-part prefix resolved to {:?}", P::LEN, start);
        Iter::new(&self.nodes, start)
    }

    /// Iterates every stored pair in the map (the zero-length prefix).
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, Some(self.root))
    }

    /// Number of stored pairs matching `prefix`. O(matches), not O(1).
    pub fn count<P: KeyPrefix<K>>(&self, prefix: &P) -> usize {
        self.find(prefix).count()
    }

    pub fn contains<P: KeyPrefix<K>>(&self, prefix: &P) -> bool {
        self.find(prefix).next().is_some()
    }

    /// Erases every stored pair whose key starts with `prefix`, returning
    /// how many were removed (0 when the prefix resolves nothing).
    ///
    /// The resolved node and its whole subtree are freed and the node is
    /// spliced out of its parent's child map. Ancestors above the erase
    /// point are left in place even when they end up childless.
    pub fn remove<P: KeyPrefix<K>>(&mut self, prefix: &P) -> usize {
        let Some(node_id) = prefix.locate(&self.nodes, self.root) else {
            return 0;
        };

        // Count the stored pairs at or below the resolved node before
        // touching anything.
        let removed = Iter::new(&self.nodes, Some(node_id)).count();
        trace!("remove: node {:?} drops {} elements", node_id, removed);

        // Free the subtree below the resolved node, then the node itself.
        let mut pending = VecDeque::new();
        K::push_children(&self.nodes[node_id].children, &mut pending);
        while let Some(child) = pending.pop_front() {
            K::push_children(&self.nodes[child].children, &mut pending);
            self.nodes.free(child);
        }
        K::clear_children(&mut self.nodes[node_id].children);

        if let Some(parent) = self.nodes[node_id].parent {
            prefix.unlink_last(&mut self.nodes, parent);
        }
        self.nodes.free(node_id);

        self.len -= removed;
        removed
    }

    /// Drops every element and the entire old tree, including dead
    /// intermediate nodes `remove` may have left behind.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.add(Node::root());
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves every pair whose key is absent from `self` out of `source`.
    /// Keys present in both maps stay untouched on both sides.
    pub fn merge(&mut self, source: &mut Self) {
        let keys: Vec<K> = source.iter().map(|(key, _)| key.clone()).collect();
        for key in keys {
            if self.contains(&key) {
                continue;
            }
            let node_id = key
                .locate(&source.nodes, source.root)
                .expect("key was just listed");
            // Steal the pair rather than cloning the value, then detach the
            // now-empty leaf from the source tree.
            let (key, value) = source.nodes[node_id]
                .data
                .take()
                .expect("key was just listed");
            if let Some(parent) = source.nodes[node_id].parent {
                key.unlink_last(&mut source.nodes, parent);
            }
            source.nodes.free(node_id);
            source.len -= 1;
            self.insert(key, value);
        }
    }

    /// O(1) exchange of the whole contents of two maps.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}

impl<K: CompositeKey, V> Default for MultiKeyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: the clone gets a freshly rooted tree rebuilt by reinsertion,
/// sharing no nodes (and carrying none of the source's dead nodes).
impl<K: CompositeKey, V: Clone> Clone for MultiKeyMap<K, V> {
    fn clone(&self) -> Self {
        let mut fresh = Self::new();
        for (key, value) in self.iter() {
            fresh.insert(key.clone(), value.clone());
        }
        fresh
    }
}

impl<K: CompositeKey, V: PartialEq> PartialEq for MultiKeyMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && other.iter().all(|(key, value)| self.get(key) == Some(value))
    }
}

impl<K: CompositeKey, V: Eq> Eq for MultiKeyMap<K, V> {}

impl<K: CompositeKey, V> FromIterator<(K, V)> for MultiKeyMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: CompositeKey, V> Extend<(K, V)> for MultiKeyMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: CompositeKey, V, const N: usize> From<[(K, V); N]> for MultiKeyMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_iter(entries)
    }
}

impl<'a, K: CompositeKey, V> IntoIterator for &'a MultiKeyMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

struct KeyFmt<'a, K: CompositeKey>(&'a K);

impl<K: CompositeKey> fmt::Debug for KeyFmt<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_parts(f)
    }
}

impl<K: CompositeKey, V: fmt::Debug> fmt::Debug for MultiKeyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (KeyFmt(key), value)))
            .finish()
    }
}

/// Renders `[K keys, N elements]{ {p0, p1, ...}:v, ... }`. Entry order is
/// traversal order and therefore unspecified between same-depth siblings.
impl<K: CompositeKey, V: fmt::Debug> fmt::Display for MultiKeyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} keys, {} elements]{{", K::ARITY, self.len)?;
        let mut sep = " ";
        for (key, value) in self.iter() {
            f.write_str(sep)?;
            key.fmt_parts(f)?;
            write!(f, ":{:?}", value)?;
            sep = ", ";
        }
        if self.len > 0 {
            f.write_str(" ")?;
        }
        f.write_str("}")
    }
}
