//! A multi-key map: an in-memory container mapping a fixed-arity composite
//! key (an ordered tuple of typed parts) to a value, with lookup, counting,
//! existence checks, and erasure by any *prefix* of that key — the first N
//! parts in declared order, with none skipped.
//!
//! One prefix trie holds everything; full-key and partial-key operations
//! share its node structure and traversal. Each trie level is keyed by that
//! level's part type, dispatched by tuple position at compile time, so no
//! type information is erased along the way.
//!
//! ```
//! use mkm::MultiKeyMap;
//!
//! let mut map = MultiKeyMap::<(u32, char, bool), f32>::new();
//! map.insert((5, 'c', true), 1.0);
//! map.insert((5, 'c', false), 2.0);
//! map.insert((6, 'd', false), 5.0);
//!
//! assert_eq!(map.count(&(5, 'c')), 2);
//! assert_eq!(map.get(&(6, 'd', false)), Some(&5.0));
//! assert_eq!(map.remove(&(5,)), 2);
//! ```

use std::fmt::Debug;
use std::hash::Hash;

mod error;
pub mod iter;
pub mod keys;
#[doc(hidden)]
pub mod node;
pub mod tree;
pub mod utils;

#[cfg(test)]
mod proptests;

pub use error::{Error, Result};
pub use iter::Iter;
pub use keys::{CompositeKey, KeyPrefix};
pub use tree::MultiKeyMap;

/// One typed component of a composite key.
///
/// Blanket-implemented: any equality-comparable, hashable, cloneable,
/// debug-printable type qualifies.
pub trait KeyPart: Eq + Hash + Clone + Debug {}
impl<T: Eq + Hash + Clone + Debug> KeyPart for T {}
