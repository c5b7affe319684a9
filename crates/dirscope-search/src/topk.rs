//! Bounded list of the largest items seen so far.

/// Keeps at most `capacity` items, ordered by key descending.
///
/// Items with equal keys keep their insertion order.
#[derive(Debug, Clone)]
pub struct TopK<T> {
    capacity: usize,
    items: Vec<(u64, T)>,
}

impl<T> TopK<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            // Grows on demand past this.
            items: Vec::with_capacity(capacity.min(1024)),
        }
    }

    /// Offer an item. Returns whether it was kept.
    pub fn push(&mut self, key: u64, item: T) -> bool {
        if self.capacity == 0 {
            return false;
        }

        if self.items.len() >= self.capacity
            && self.items.last().is_some_and(|(smallest, _)| key <= *smallest)
        {
            return false;
        }

        let at = self.items.partition_point(|(k, _)| *k >= key);
        self.items.insert(at, (key, item));
        if self.items.len() > self.capacity {
            self.items.pop();
        }
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in key-descending order.
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_iter().map(|(_, item)| item).collect()
    }
}
