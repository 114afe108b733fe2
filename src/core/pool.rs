//! Bounded free-list for reusable buffers
//!
//! Entries and encoders are recycled through a `Pool` to keep allocation pressure off the
//! logging path. The free-list is a bounded channel: releasing into a full pool simply drops the
//! value, and values that grew beyond their ceiling are never pooled so one pathological record
//! cannot pin a large buffer forever.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::ops::{Deref, DerefMut};

/// A value that can be cleared and handed out again.
pub trait Recycle {
    /// Clears the value for its next user while keeping allocated capacity.
    fn reset(&mut self);

    /// Returns false when the value grew too large to be worth keeping.
    fn is_reusable(&self) -> bool {
        true
    }
}

pub struct Pool<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    init: fn() -> T,
}

impl<T: Recycle> Pool<T> {
    /// Creates a pool holding at most `capacity` idle values.
    pub fn new(capacity: usize, init: fn() -> T) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            init,
        }
    }

    /// Takes an idle value, or builds a fresh one when the pool is empty.
    ///
    /// The value is reset before it is returned and goes back to the pool when the guard drops.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let mut value = self.receiver.try_recv().unwrap_or_else(|_| (self.init)());
        value.reset();
        Pooled {
            value: Some(value),
            pool: self,
        }
    }

    /// Number of idle values currently held.
    pub fn idle(&self) -> usize {
        self.receiver.len()
    }

    fn release(&self, value: T) {
        if value.is_reusable() {
            // A full pool drops the value.
            let _ = self.sender.try_send(value);
        }
    }
}

/// Exclusive handle on a pooled value.
///
/// The value cannot outlive the guard, so nothing can read it after it went back to the pool.
pub struct Pooled<'a, T: Recycle> {
    value: Option<T>,
    pool: &'a Pool<T>,
}

impl<T: Recycle> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_ref().expect("pooled value is present until drop")
    }
}

impl<T: Recycle> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("pooled value is present until drop")
    }
}

impl<T: Recycle> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.release(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Buffer(Vec<u8>);

    impl Recycle for Buffer {
        fn reset(&mut self) {
            self.0.clear();
        }

        fn is_reusable(&self) -> bool {
            self.0.capacity() <= 64
        }
    }

    fn new_buffer() -> Buffer {
        Buffer(Vec::with_capacity(16))
    }

    #[test]
    fn test_values_are_reused_and_reset() {
        let pool = Pool::new(4, new_buffer);
        {
            let mut buffer = pool.acquire();
            buffer.0.extend_from_slice(b"hello");
        }
        assert_eq!(pool.idle(), 1);

        let buffer = pool.acquire();
        assert!(buffer.0.is_empty());
        assert!(buffer.0.capacity() >= 16);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_oversized_values_are_discarded() {
        let pool = Pool::new(4, new_buffer);
        {
            let mut buffer = pool.acquire();
            buffer.0.extend_from_slice(&[0u8; 1024]);
        }
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_full_pool_drops_extra_values() {
        let pool = Pool::new(2, new_buffer);
        {
            let _a = pool.acquire();
            let _b = pool.acquire();
            let _c = pool.acquire();
        }
        assert_eq!(pool.idle(), 2);
    }
}
