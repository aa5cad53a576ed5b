use crate::keys::CompositeKey;
use crate::utils::slotvec::{SlotIndex, SlotVec};

/// Stable handle to a node in the arena.
pub type NodeId = SlotIndex;

/// The arena all nodes of one map live in. Tree ownership is expressed
/// through handles: child maps hold `NodeId`s and the container frees
/// subtrees explicitly, so parent back-references cannot dangle or cycle.
pub type NodeArena<K, V> = SlotVec<Node<K, V>>;

/// A single trie vertex, reached by consuming some prefix of a composite key.
pub struct Node<K: CompositeKey, V> {
    /// One child-map slot per key-part position. A node at depth `d` only
    /// ever populates the map for position `d`; the rest stay empty.
    /// Carrying a statically-typed slot for every level is what lets each
    /// level key its children by its own part type without a runtime tag.
    pub(crate) children: K::ChildMaps,
    /// The stored pair. Present iff this node sits at full depth and that
    /// exact key is live in the map.
    pub(crate) data: Option<(K, V)>,
    /// Structural back-reference, used only to splice this node out of its
    /// parent's child map on erase. `None` for the root.
    pub(crate) parent: Option<NodeId>,
}

impl<K: CompositeKey, V> Node<K, V> {
    pub(crate) fn root() -> Self {
        Self {
            children: K::ChildMaps::default(),
            data: None,
            parent: None,
        }
    }

    pub(crate) fn child_of(parent: NodeId) -> Self {
        Self {
            children: K::ChildMaps::default(),
            data: None,
            parent: Some(parent),
        }
    }
}
