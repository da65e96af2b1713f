//! An indexed binary min-heap.
use slab::Slab;

/// Stable reference to an item in an [`EventQueue`].
///
/// Valid until the item is popped or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventHandle(usize);

#[derive(Debug)]
struct Entry<T> {
    item: T,
    /// Current position in `heap`.
    position: usize,
}

/// Min-priority queue supporting removal of arbitrary items.
///
/// Items are stored in a [`Slab`]; the heap itself is a vector of
/// slab keys. Every entry tracks its position in the heap, so that
/// [`remove`](Self::remove) needs no search.
#[derive(Debug)]
pub struct EventQueue<T: Ord> {
    entries: Slab<Entry<T>>,
    heap: Vec<usize>,
}

impl<T: Ord> EventQueue<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        EventQueue {
            entries: Slab::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert `item` and return a handle to it.
    pub fn emplace(&mut self, item: T) -> EventHandle {
        let position = self.heap.len();
        let key = self.entries.insert(Entry { item, position });
        self.heap.push(key);
        self.sift_up(position);
        EventHandle(key)
    }

    pub fn get(&self, handle: EventHandle) -> Option<&T> {
        self.entries.get(handle.0).map(|e| &e.item)
    }

    pub fn contains(&self, handle: EventHandle) -> bool {
        self.entries.contains(handle.0)
    }

    /// The smallest item, if any.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first().map(|&key| &self.entries[key].item)
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            None
        } else {
            Some(self.remove_at(0))
        }
    }

    /// Remove and return the smallest item.
    ///
    /// # Panics
    ///
    /// If the queue is empty.
    pub fn pop_min(&mut self) -> T {
        self.pop().expect("pop_min called on an empty event queue")
    }

    /// Remove the item referred to by `handle`.
    ///
    /// # Panics
    ///
    /// If the handle is no longer valid.
    pub fn remove(&mut self, handle: EventHandle) -> T {
        let position = self
            .entries
            .get(handle.0)
            .expect("event handle not found in queue")
            .position;
        self.remove_at(position)
    }

    fn remove_at(&mut self, position: usize) -> T {
        let last = self.heap.len() - 1;
        self.swap(position, last);
        let key = self.heap.pop().expect("heap cannot be empty here");
        if position < self.heap.len() {
            self.update(position);
        }
        self.entries.remove(key).item
    }

    /// Restore the heap property for the item at `position`.
    fn update(&mut self, position: usize) {
        if position > 0 && self.less(position, parent(position)) {
            self.sift_up(position);
        } else {
            self.sift_down(position);
        }
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let up = parent(position);
            if !self.less(position, up) {
                break;
            }
            self.swap(position, up);
            position = up;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut smallest = position;
            if left < self.heap.len() && self.less(left, smallest) {
                smallest = left;
            }
            if right < self.heap.len() && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == position {
                break;
            }
            self.swap(position, smallest);
            position = smallest;
        }
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.entries[self.heap[i]].item < self.entries[self.heap[j]].item
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        let (ki, kj) = (self.heap[i], self.heap[j]);
        self.entries[ki].position = i;
        self.entries[kj].position = j;
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        for (position, &key) in self.heap.iter().enumerate() {
            assert_eq!(self.entries[key].position, position);
            if position > 0 {
                assert!(!self.less(position, parent(position)));
            }
        }
        assert_eq!(self.entries.len(), self.heap.len());
    }
}

#[inline]
fn parent(position: usize) -> usize {
    (position - 1) / 2
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::iter::from_fn;

    use super::*;

    #[test]
    fn test_pop_in_order() {
        let mut queue = EventQueue::with_capacity(8);
        for v in [5, 3, 8, 1, 9, 1, 4] {
            queue.emplace(v);
            queue.check_invariants();
        }
        assert_eq!(queue.peek(), Some(&1));
        let order: Vec<_> = from_fn(|| queue.pop()).collect();
        assert_eq!(order, vec![1, 1, 3, 4, 5, 8, 9]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_by_handle() {
        let mut queue = EventQueue::with_capacity(8);
        let handles: Vec<_> = (0..10).rev().map(|v| (v, queue.emplace(v))).collect();
        for &(v, handle) in handles.iter().filter(|(v, _)| v % 3 == 0) {
            assert_eq!(queue.get(handle), Some(&v));
            assert_eq!(queue.remove(handle), v);
            assert!(!queue.contains(handle));
            queue.check_invariants();
        }
        let order: Vec<_> = from_fn(|| queue.pop()).collect();
        assert_eq!(order, vec![1, 2, 4, 5, 7, 8]);
    }

    #[test]
    fn test_random_operations() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut queue = EventQueue::with_capacity(16);
        let mut live: Vec<(u32, EventHandle)> = vec![];
        for _ in 0..2000 {
            match rng.gen_range(0..3) {
                0 | 1 => {
                    let v = rng.gen_range(0..100);
                    live.push((v, queue.emplace(v)));
                }
                _ if !live.is_empty() => {
                    let (v, handle) = live.swap_remove(rng.gen_range(0..live.len()));
                    assert_eq!(queue.remove(handle), v);
                }
                _ => {}
            }
            queue.check_invariants();
        }
        live.sort_unstable_by_key(|&(v, _)| v);
        let order: Vec<_> = from_fn(|| queue.pop()).collect();
        let expected: Vec<_> = live.iter().map(|&(v, _)| v).collect();
        assert_eq!(order, expected);
    }

    #[test]
    #[should_panic(expected = "empty event queue")]
    fn test_pop_min_empty() {
        let mut queue: EventQueue<u32> = EventQueue::with_capacity(0);
        queue.pop_min();
    }
}
