//! Fixed-size ring buffer backing [`BoundedQueue`](super::BoundedQueue).
//!
//! Not synchronized; the queue only touches it while holding its lock.

/// `capacity` slots addressed by a read cursor (`head`) and a write cursor
/// (`tail`), both modulo capacity.
pub(crate) struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// # Panics
    ///
    /// Panics if `capacity` is 0; the queue validates before constructing.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Writes `value` at `tail`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full or the tail slot is occupied; both mean
    /// the caller broke the `len <= capacity` invariant.
    pub(crate) fn push_back(&mut self, value: T) {
        assert!(!self.is_full(), "ring buffer overflow: len == capacity");

        let slot = &mut self.slots[self.tail];
        assert!(slot.is_none(), "ring buffer tail slot already occupied");
        *slot = Some(value);

        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
    }

    /// Takes the element at `head`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the head slot is vacant while `len > 0`.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.slots[self.head]
            .take()
            .unwrap_or_else(|| {
                panic!(
                    "ring buffer head slot {} vacant with len {}",
                    self.head, self.len
                )
            });

        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Some(value)
    }
}
