use std::ops::{Index, IndexMut};

// We use a u32 here instead of usize under the assumption there simply won't
// be that many entries, and so that handles stored inside child maps stay
// small.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SlotIndex(pub(crate) u32);

/// A place to store owned values that can be accessed by a stable index, with
/// holes being re-used through a free list. A poor man's slot map, really.
/// Values reference each other by `SlotIndex` instead of pointers, so
/// back-references can neither dangle nor form ownership cycles.
pub struct SlotVec<V> {
    slots: Vec<Option<V>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<V> SlotVec<V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::with_capacity(16),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn add(&mut self, value: V) -> SlotIndex {
        self.len += 1;
        match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx as usize] = Some(value);
                SlotIndex(idx)
            }
            None => {
                let idx = self.slots.len() as u32;
                self.slots.push(Some(value));
                SlotIndex(idx)
            }
        }
    }

    /// Frees the slot at `index`, returning false if it was already free.
    pub fn free(&mut self, index: SlotIndex) -> bool {
        let Some(slot) = self.slots.get_mut(index.0 as usize) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        self.free_list.push(index.0);
        self.len -= 1;
        true
    }

    pub fn get(&self, index: SlotIndex) -> Option<&V> {
        self.slots.get(index.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut V> {
        self.slots.get_mut(index.0 as usize)?.as_mut()
    }

    /// Drops every value and forgets the free list. Previously handed-out
    /// indices must not be used afterwards.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<V> Default for SlotVec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Index<SlotIndex> for SlotVec<V> {
    type Output = V;

    fn index(&self, index: SlotIndex) -> &V {
        self.get(index).expect("slot is live")
    }
}

impl<V> IndexMut<SlotIndex> for SlotVec<V> {
    fn index_mut(&mut self, index: SlotIndex) -> &mut V {
        self.get_mut(index).expect("slot is live")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_get_free() {
        let mut sv = SlotVec::new();
        let a = sv.add("a");
        let b = sv.add("b");
        assert_eq!(sv.len(), 2);
        assert_eq!(sv[a], "a");
        assert_eq!(sv.get(b), Some(&"b"));

        assert!(sv.free(a));
        assert!(!sv.free(a));
        assert_eq!(sv.get(a), None);
        assert_eq!(sv.len(), 1);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut sv = SlotVec::new();
        let a = sv.add(1);
        sv.add(2);
        sv.free(a);
        let c = sv.add(3);
        assert_eq!(a, c);
        assert_eq!(sv[c], 3);
        assert_eq!(sv.len(), 2);
    }

    #[test]
    fn clear_resets() {
        let mut sv = SlotVec::new();
        sv.add(1);
        sv.add(2);
        sv.clear();
        assert!(sv.is_empty());
        let a = sv.add(7);
        assert_eq!(sv[a], 7);
    }
}
