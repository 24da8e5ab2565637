//! Fixed-capacity history buffer.

use std::collections::vec_deque::{Iter, IterMut};
use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Append-only log holding at most `N` items; the oldest item is evicted first.
///
/// Serialized as a plain list. Deserializing a longer list keeps the last `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedLog<T, const N: usize> {
    items: VecDeque<T>,
}

impl<T, const N: usize> BoundedLog<T, N> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(N),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Append at the back. Returns the evicted item when the log was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        if N == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == N {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == N
    }

    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Ord, const N: usize> BoundedLog<T, N> {
    /// Insert keeping ascending order, then evict from the front if over capacity.
    ///
    /// For items arriving in order this is identical to [`push`](Self::push);
    /// an item older than everything in a full log is dropped immediately.
    pub fn insert_sorted(&mut self, item: T) -> Option<T> {
        if N == 0 {
            return Some(item);
        }
        let at = self.items.partition_point(|existing| existing <= &item);
        self.items.insert(at, item);
        if self.items.len() > N {
            self.items.pop_front()
        } else {
            None
        }
    }
}

impl<T: Clone, const N: usize> BoundedLog<T, N> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T, const N: usize> Default for BoundedLog<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FromIterator<T> for BoundedLog<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut log = Self::new();
        for item in iter {
            log.push(item);
        }
        log
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a BoundedLog<T, N> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize, const N: usize> Serialize for BoundedLog<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for BoundedLog<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest() {
        let mut log: BoundedLog<u32, 3> = BoundedLog::new();
        assert_eq!(log.push(1), None);
        assert_eq!(log.push(2), None);
        assert_eq!(log.push(3), None);
        assert!(log.is_full());
        assert_eq!(log.push(4), Some(1));
        assert_eq!(log.to_vec(), vec![2, 3, 4]);
        assert_eq!(log.first(), Some(&2));
        assert_eq!(log.last(), Some(&4));
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut log: BoundedLog<u32, 0> = BoundedLog::new();
        assert_eq!(log.push(7), Some(7));
        assert_eq!(log.insert_sorted(7), Some(7));
        assert!(log.is_empty());
    }

    #[test]
    fn test_insert_sorted_keeps_order() {
        let mut log: BoundedLog<u32, 4> = BoundedLog::new();
        for n in [10, 30, 20, 40] {
            log.insert_sorted(n);
        }
        assert_eq!(log.to_vec(), vec![10, 20, 30, 40]);

        // Newer than the oldest: oldest goes.
        assert_eq!(log.insert_sorted(25), Some(10));
        assert_eq!(log.to_vec(), vec![20, 25, 30, 40]);

        // Older than everything in a full log: dropped straight away.
        assert_eq!(log.insert_sorted(5), Some(5));
        assert_eq!(log.to_vec(), vec![20, 25, 30, 40]);
    }

    #[test]
    fn test_deserialize_truncates_to_capacity() {
        let log: BoundedLog<u32, 2> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(log.to_vec(), vec![2, 3]);
        assert_eq!(serde_json::to_string(&log).unwrap(), "[2,3]");
    }
}
