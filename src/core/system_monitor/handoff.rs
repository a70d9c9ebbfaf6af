//! Bounded producer/consumer queue between the sampler and its consumer.
//!
//! The producer never waits: pushing into a full queue evicts the oldest
//! unread item. The lock is held only for the push or pop itself.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

#[derive(Debug)]
pub struct HandoffQueue<T> {
    capacity: usize,
    items: Mutex<VecDeque<T>>,
    dropped: AtomicU64,
}

impl<T> HandoffQueue<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            dropped: AtomicU64::new(0),
        }
    }

    /// Enqueue `item`, returning the evicted oldest item when the queue was full
    pub fn push(&self, item: T) -> Option<T> {
        let mut items = self.items.lock();
        let evicted = if items.len() >= self.capacity {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            items.pop_front()
        } else {
            None
        };
        items.push_back(item);
        evicted
    }

    /// Oldest unread item, if any
    pub fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Every unread item, oldest first
    pub fn drain(&self) -> Vec<T> {
        self.items.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items evicted unread since creation
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop_in_order() {
        let queue = HandoffQueue::new(4);
        queue.push(1);
        queue.push(2);

        assert_eq!(queue.try_pop(), Some(1));
        assert_eq!(queue.try_pop(), Some(2));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let queue = HandoffQueue::new(2);
        assert_eq!(queue.push(1), None);
        assert_eq!(queue.push(2), None);
        assert_eq!(queue.push(3), Some(1));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.drain(), vec![2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let queue = HandoffQueue::new(0);
        queue.push("a");
        queue.push("b");

        assert_eq!(queue.capacity(), 1);
        assert_eq!(queue.drain(), vec!["b"]);
    }
}
