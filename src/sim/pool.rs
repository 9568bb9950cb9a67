//! Explicitly owned free-list for recycling spent objects

/// Bounded stack of reusable values
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
    capacity: usize,
}

impl<T> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Take a spare value, if any
    pub fn acquire(&mut self) -> Option<T> {
        self.free.pop()
    }

    /// Return a value for reuse; dropped when the pool is full
    pub fn release(&mut self, value: T) {
        if self.free.len() < self.capacity {
            self.free.push(value);
        }
    }

    /// Spare values currently held
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn clear(&mut self) {
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release() {
        let mut pool = Pool::with_capacity(2);
        assert!(pool.acquire().is_none());
        pool.release(1);
        pool.release(2);
        pool.release(3); // over capacity, dropped
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.acquire(), Some(2));
        assert_eq!(pool.acquire(), Some(1));
        assert!(pool.is_empty());
    }
}
