//! Mutable-priority binary min-heap.

/// Array-backed binary min-heap over `(item, key)` pairs.
///
/// Unlike `std::collections::BinaryHeap`, an enqueued item's key can be
/// lowered in place with [`rescore`](Self::rescore), which restores heap
/// order without popping. All comparisons are strict, so equal-keyed
/// entries keep their insertion-time relative order; ties between equally
/// good paths are therefore broken the same way on every run.
#[derive(Debug, Default)]
pub struct PriorityQueue<T> {
    content: Vec<(T, f64)>,
}

impl<T: PartialEq> PriorityQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            content: Vec::new(),
        }
    }

    /// Number of enqueued items.
    #[inline]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Remove all items, keeping the allocation.
    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Insert an item with the given key.
    pub fn push(&mut self, item: T, key: f64) {
        self.content.push((item, key));
        self.sift_up(self.content.len() - 1);
    }

    /// Remove and return the minimum-key item.
    pub fn pop(&mut self) -> Option<(T, f64)> {
        if self.content.is_empty() {
            return None;
        }
        let result = self.content.swap_remove(0);
        if !self.content.is_empty() {
            self.sift_down(0);
        }
        Some(result)
    }

    /// Lower the key of an already-enqueued item and restore heap order.
    ///
    /// Does nothing when the item is not in the queue. The new key must
    /// not exceed the item's current key.
    pub fn rescore(&mut self, item: &T, key: f64) {
        if let Some(i) = self.content.iter().position(|(it, _)| it == item) {
            debug_assert!(key <= self.content[i].1, "rescore must not raise a key");
            self.content[i].1 = key;
            self.sift_up(i);
        }
    }

    fn sift_up(&mut self, mut n: usize) {
        while n > 0 {
            let parent = (n - 1) / 2;
            if self.content[n].1 < self.content[parent].1 {
                self.content.swap(n, parent);
                n = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut n: usize) {
        let len = self.content.len();
        loop {
            let c1 = 2 * n + 1;
            let c2 = c1 + 1;
            let mut swap = None;
            let mut best = self.content[n].1;
            if c1 < len && self.content[c1].1 < best {
                swap = Some(c1);
                best = self.content[c1].1;
            }
            if c2 < len && self.content[c2].1 < best {
                swap = Some(c2);
            }
            match swap {
                Some(s) => {
                    self.content.swap(n, s);
                    n = s;
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_key_order() {
        let mut q = PriorityQueue::new();
        q.push("c", 3.0);
        q.push("a", 1.0);
        q.push("d", 4.0);
        q.push("b", 2.0);
        let order: Vec<_> = std::iter::from_fn(|| q.pop()).map(|(it, _)| it).collect();
        assert_eq!(order, ["a", "b", "c", "d"]);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut q = PriorityQueue::new();
        q.push("first", 1.0);
        q.push("second", 1.0);
        q.push("third", 1.0);
        assert_eq!(q.pop(), Some(("first", 1.0)));
    }

    #[test]
    fn rescore_lifts_an_item() {
        let mut q = PriorityQueue::new();
        q.push("a", 1.0);
        q.push("b", 5.0);
        q.push("c", 3.0);
        q.rescore(&"b", 0.5);
        assert_eq!(q.pop(), Some(("b", 0.5)));
        assert_eq!(q.pop(), Some(("a", 1.0)));
        assert_eq!(q.pop(), Some(("c", 3.0)));
    }

    #[test]
    fn rescore_missing_item_is_a_no_op() {
        let mut q = PriorityQueue::new();
        q.push("a", 1.0);
        q.rescore(&"zz", 0.1);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some(("a", 1.0)));
    }

    #[test]
    fn clear_keeps_the_queue_usable() {
        let mut q = PriorityQueue::new();
        q.push(1usize, 2.0);
        q.clear();
        assert!(q.pop().is_none());
        q.push(2usize, 1.0);
        assert_eq!(q.pop(), Some((2, 1.0)));
    }
}
