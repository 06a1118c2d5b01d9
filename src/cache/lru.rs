//! LRU Tracker Module
//!
//! Index-arena doubly linked list keeping keys in recency order.

// Sentinel slots. HEAD.next is the most recently used node,
// TAIL.prev the least recently used one.
const HEAD: usize = 0;
const TAIL: usize = 1;

#[derive(Debug)]
struct Slot<V> {
    key: String,
    value: Option<V>,
    prev: usize,
    next: usize,
}

impl<V> Slot<V> {
    fn sentinel() -> Self {
        Self {
            key: String::new(),
            value: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Nodes live in a `Vec` and link to each other by index. Removed slots go
/// on a free list and are reused by later insertions, so steady-state churn
/// does not allocate nodes.
#[derive(Debug)]
pub struct LruTracker<V> {
    slots: Vec<Slot<V>>,
    free: Vec<usize>,
    len: usize,
}

impl<V> LruTracker<V> {
    // == Constructor ==
    /// Creates an empty tracker with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + 2);
        slots.push(Slot::sentinel());
        slots.push(Slot::sentinel());
        Self {
            slots,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a new node as most recently used and returns its index.
    pub fn push_front(&mut self, key: String, value: V) -> usize {
        let idx = match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx];
                slot.key = key;
                slot.value = Some(value);
                idx
            }
            None => {
                self.slots.push(Slot {
                    key,
                    value: Some(value),
                    prev: HEAD,
                    next: TAIL,
                });
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Touch ==
    /// Marks a node as most recently used.
    pub fn touch(&mut self, idx: usize) {
        if self.slots[HEAD].next == idx {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks a node, recycles its slot and returns its key and value.
    pub fn remove(&mut self, idx: usize) -> Option<(String, V)> {
        if idx <= TAIL {
            return None;
        }
        let value = self.slots[idx].value.take()?;
        self.unlink(idx);
        let key = std::mem::take(&mut self.slots[idx].key);
        self.free.push(idx);
        self.len -= 1;
        Some((key, value))
    }

    // == Oldest ==
    /// Index of the least recently used node.
    pub fn oldest(&self) -> Option<usize> {
        let idx = self.slots[TAIL].prev;
        (idx != HEAD).then_some(idx)
    }

    // == Newer ==
    /// Index of the node used just after `idx`, walking toward the head.
    pub fn newer(&self, idx: usize) -> Option<usize> {
        let prev = self.slots[idx].prev;
        (prev != HEAD).then_some(prev)
    }

    pub fn key(&self, idx: usize) -> &str {
        &self.slots[idx].key
    }

    pub fn value(&self, idx: usize) -> Option<&V> {
        self.slots[idx].value.as_ref()
    }

    pub fn value_mut(&mut self, idx: usize) -> Option<&mut V> {
        self.slots[idx].value.as_mut()
    }

    // == Length ==
    /// Returns the number of tracked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let mut cursor = self.slots[HEAD].next;
        std::iter::from_fn(move || {
            if cursor == TAIL {
                return None;
            }
            let slot = &self.slots[cursor];
            cursor = slot.next;
            Some(slot.key.as_str())
        })
    }

    /// Walks the list in both directions and checks the links agree with
    /// the tracked length.
    pub fn is_consistent(&self) -> bool {
        let mut forward = 0;
        let mut cursor = self.slots[HEAD].next;
        while cursor != TAIL {
            if forward > self.len || self.slots[self.slots[cursor].next].prev != cursor {
                return false;
            }
            forward += 1;
            cursor = self.slots[cursor].next;
        }

        let mut backward = 0;
        let mut cursor = self.slots[TAIL].prev;
        while cursor != HEAD {
            if backward > self.len {
                return false;
            }
            backward += 1;
            cursor = self.slots[cursor].prev;
        }

        forward == self.len && backward == self.len
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.slots[HEAD].next;
        self.slots[idx].prev = HEAD;
        self.slots[idx].next = first;
        self.slots[first].prev = idx;
        self.slots[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }
}
