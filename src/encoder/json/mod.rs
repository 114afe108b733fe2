//! JSON encoder rendering into a growable byte buffer
//!
//! Encoders are recycled through a process-wide pool. Use [`JsonEncoder::acquire`] to borrow
//! one for a single record; it returns to the pool when the guard drops, unless its buffer
//! grew beyond [`MAX_POOLED_CAPACITY`].

mod delimiters;
mod types;

use crate::core::pool::{Pool, Pooled, Recycle};
use crate::encoder::{Encoder, ObjectEncoder};
use std::sync::LazyLock;

/// Initial buffer capacity of a fresh encoder.
pub const INITIAL_CAPACITY: usize = 1024;

/// Encoders whose buffer grew to this capacity are dropped instead of pooled.
pub const MAX_POOLED_CAPACITY: usize = 1 << 16;

/// Maximum number of idle encoders kept around.
const POOL_SIZE: usize = 64;

static ENCODER_POOL: LazyLock<Pool<JsonEncoder>> =
    LazyLock::new(|| Pool::new(POOL_SIZE, JsonEncoder::new));

/// Pooled JSON encoder handle.
pub type PooledEncoder = Pooled<'static, JsonEncoder>;

/// JSON encoder. Not meant to be shared across threads.
#[derive(Debug, Default)]
pub struct JsonEncoder {
    buffer: Vec<u8>,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Borrows an empty encoder from the process-wide pool.
    pub fn acquire() -> PooledEncoder {
        ENCODER_POOL.acquire()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl Recycle for JsonEncoder {
    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn is_reusable(&self) -> bool {
        self.buffer.capacity() < MAX_POOLED_CAPACITY
    }
}

impl Encoder for JsonEncoder {
    fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn encode(&mut self, handler: &dyn Fn(&mut dyn ObjectEncoder)) -> &[u8] {
        self.append_begin_marker();
        handler(self);
        self.append_end_marker();
        self.append_line_break();
        &self.buffer
    }
}
