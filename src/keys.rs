//! Composite-key and key-prefix traits, implemented for tuples.
//!
//! A composite key is an ordered tuple of parts; the trie spends one level
//! per part, and each level's child map is keyed by that level's part type.
//! The trick is that every lookup must pick "the child map whose key type is
//! the part being consumed" with no runtime tag. Tuple position gives us
//! that for free: the macro below generates, per arity, one `CompositeKey`
//! impl plus a `KeyPrefix` impl for every contiguous prefix, and each
//! generated resolver step addresses the child map at its own tuple index.
//! Dispatch is by position, never by type, so parts may repeat a type at
//! different positions without ambiguity.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::node::{Node, NodeArena, NodeId};
use crate::KeyPart;

mod sealed {
    pub trait Sealed {}
}

/// An ordered, fixed-arity composite key. Implemented for tuples of
/// `KeyPart`s up to arity 8; not implementable outside this crate.
pub trait CompositeKey: Sized + Clone + KeyPrefix<Self> + sealed::Sealed {
    /// One hash map per level, keyed by that level's part type.
    #[doc(hidden)]
    type ChildMaps: Default;

    /// Number of key parts.
    const ARITY: usize;

    #[doc(hidden)]
    fn push_children(maps: &Self::ChildMaps, out: &mut VecDeque<NodeId>);

    #[doc(hidden)]
    fn clear_children(maps: &mut Self::ChildMaps);

    /// Writes the key as `{p0, p1, ...}` for the map's string rendering.
    #[doc(hidden)]
    fn fmt_parts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// A contiguous, from-the-start run of the parts of composite key `K`.
///
/// For `K = (A, B, C)` this is implemented by `(A,)`, `(A, B)` and
/// `(A, B, C)` itself — never by a subset that skips a position. The impls
/// are the path resolver: each knows statically which child map to consult
/// at each level it covers.
pub trait KeyPrefix<K>: sealed::Sealed {
    /// Number of parts supplied, `1..=K::ARITY`.
    const LEN: usize;

    /// Walks one level per part from `root`. Fails on the first level whose
    /// child map lacks the part value; no side effects.
    #[doc(hidden)]
    fn locate<V>(&self, nodes: &NodeArena<K, V>, root: NodeId) -> Option<NodeId>
    where
        K: CompositeKey;

    /// Like `locate`, but materializes every missing node along the path.
    /// Created nodes are empty; only the caller populates the terminal one.
    #[doc(hidden)]
    fn locate_or_create<V>(&self, nodes: &mut NodeArena<K, V>, root: NodeId) -> NodeId
    where
        K: CompositeKey;

    /// Removes the entry in `parent`'s child map (at this prefix's last
    /// position) that leads to this prefix's terminal node.
    #[doc(hidden)]
    fn unlink_last<V>(&self, nodes: &mut NodeArena<K, V>, parent: NodeId)
    where
        K: CompositeKey;
}

macro_rules! composite_key {
    ($(($part:ident, $idx:tt)),+ $(,)?) => {
        impl<$($part: KeyPart),+> sealed::Sealed for ($($part,)+) {}

        impl<$($part: KeyPart),+> CompositeKey for ($($part,)+) {
            type ChildMaps = ($(HashMap<$part, NodeId>,)+);

            const ARITY: usize = <[()]>::len(&[$(composite_key!(@unit $part)),+]);

            fn push_children(maps: &Self::ChildMaps, out: &mut VecDeque<NodeId>) {
                $(out.extend(maps.$idx.values().copied());)+
            }

            fn clear_children(maps: &mut Self::ChildMaps) {
                $(maps.$idx.clear();)+
            }

            fn fmt_parts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("{")?;
                let mut sep = "";
                $(
                    write!(f, "{}{:?}", sep, self.$idx)?;
                    sep = ", ";
                )+
                let _ = sep;
                f.write_str("}")
            }
        }

        composite_key!(@prefixes [$(($part, $idx)),+] [] [$(($part, $idx)),+]);
    };

    (@unit $part:ident) => {
        ()
    };

    // Grow the accumulated prefix one part at a time; emit an impl per step.
    (@prefixes [$(($full:ident, $fidx:tt)),+] [$(($acc:ident, $aidx:tt)),*] []) => {};
    (@prefixes
        [$(($full:ident, $fidx:tt)),+]
        [$(($acc:ident, $aidx:tt)),*]
        [($next:ident, $nidx:tt) $(, ($rest:ident, $ridx:tt))*]
    ) => {
        composite_key!(@prefix
            [$(($full, $fidx)),+]
            [$(($acc, $aidx),)* ($next, $nidx)]
            ($next, $nidx)
        );
        composite_key!(@prefixes
            [$(($full, $fidx)),+]
            [$(($acc, $aidx),)* ($next, $nidx)]
            [$(($rest, $ridx)),*]
        );
    };

    (@prefix
        [$(($full:ident, $fidx:tt)),+]
        [$(($pp:ident, $pidx:tt)),+]
        ($last:ident, $lidx:tt)
    ) => {
        impl<$($full: KeyPart),+> KeyPrefix<($($full,)+)> for ($($pp,)+) {
            const LEN: usize = <[()]>::len(&[$(composite_key!(@unit $pp)),+]);

            fn locate<V>(
                &self,
                nodes: &NodeArena<($($full,)+), V>,
                root: NodeId,
            ) -> Option<NodeId> {
                let mut cur = root;
                $(
                    let map = &nodes[cur].children.$pidx;
                    log::trace!(
                        "locate: level {} at node {:?} ({} children)",
                        $pidx,
                        cur,
                        map.len()
                    );
                    cur = *map.get(&self.$pidx)?;
                )+
                Some(cur)
            }

            fn locate_or_create<V>(
                &self,
                nodes: &mut NodeArena<($($full,)+), V>,
                root: NodeId,
            ) -> NodeId {
                let mut cur = root;
                $(
                    cur = match nodes[cur].children.$pidx.get(&self.$pidx).copied() {
                        Some(child) => child,
                        None => {
                            let child = nodes.add(Node::child_of(cur));
                            log::trace!(
                                "locate_or_create: level {} new node {:?}",
                                $pidx,
                                child
                            );
                            nodes[cur].children.$pidx.insert(self.$pidx.clone(), child);
                            child
                        }
                    };
                )+
                cur
            }

            fn unlink_last<V>(
                &self,
                nodes: &mut NodeArena<($($full,)+), V>,
                parent: NodeId,
            ) {
                nodes[parent].children.$lidx.remove(&self.$lidx);
            }
        }
    };
}

composite_key!((A, 0));
composite_key!((A, 0), (B, 1));
composite_key!((A, 0), (B, 1), (C, 2));
composite_key!((A, 0), (B, 1), (C, 2), (D, 3));
composite_key!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4));
composite_key!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5));
composite_key!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6));
composite_key!((A, 0), (B, 1), (C, 2), (D, 3), (E, 4), (F, 5), (G, 6), (H, 7));
