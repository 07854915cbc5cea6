//! Lock-free pool of reusable write buffers
//!
//! The async write path copies caller bytes into a pooled `BytesMut` before
//! queueing them, so sustained throughput does not allocate per write. The
//! pool is process-wide state: initialized on first use, never torn down,
//! shared by every async writer in the process.
//!
//! Exhaustion allocates a fresh buffer instead of blocking; buffers return
//! to the pool after the worker drains them to the file.

use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;

/// Capacity of each pooled buffer; writes larger than this are split into
/// multiple chunks on the rotation path
pub const POOLED_BUFFER_SIZE: usize = 1024 * 1024;

/// Number of buffers the shared pool retains
const POOL_CAPACITY: usize = 64;

static SHARED_POOL: LazyLock<BufferPool> =
    LazyLock::new(|| BufferPool::new(POOL_CAPACITY, POOLED_BUFFER_SIZE));

/// Lock-free free-list of fixed-capacity `BytesMut` buffers
pub struct BufferPool {
    queue: ArrayQueue<BytesMut>,
    buffer_capacity: usize,
    metrics: BufferPoolMetrics,
}

/// Counters for pool behavior under load
#[derive(Debug, Default)]
pub struct BufferPoolMetrics {
    /// Buffer reused from the pool
    pub hits: AtomicU64,

    /// Pool empty, fresh allocation
    pub misses: AtomicU64,

    /// Buffer returned to the pool
    pub returns: AtomicU64,

    /// Buffer dropped on return (pool full or undersized buffer)
    pub drops: AtomicU64,
}

impl BufferPoolMetrics {
    /// Get a point-in-time view as (hits, misses, returns, drops)
    pub fn snapshot(&self) -> (u64, u64, u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.returns.load(Ordering::Relaxed),
            self.drops.load(Ordering::Relaxed),
        )
    }
}

impl BufferPool {
    /// Create a pool with `pool_size` pre-allocated buffers of
    /// `buffer_capacity` bytes each
    pub fn new(pool_size: usize, buffer_capacity: usize) -> Self {
        let queue = ArrayQueue::new(pool_size);
        for _ in 0..pool_size {
            // filling an empty queue, cannot fail
            let _ = queue.push(BytesMut::with_capacity(buffer_capacity));
        }
        Self {
            queue,
            buffer_capacity,
            metrics: BufferPoolMetrics::default(),
        }
    }

    /// The process-wide pool shared by all async writers
    pub fn shared() -> &'static BufferPool {
        &SHARED_POOL
    }

    /// Take a buffer, allocating fresh if the pool is empty
    #[inline]
    pub fn get(&self) -> BytesMut {
        match self.queue.pop() {
            Some(buf) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                BytesMut::with_capacity(self.buffer_capacity)
            }
        }
    }

    /// Clear a buffer and hand it back
    ///
    /// Buffers that shrank below pool capacity (split off, reallocated) are
    /// dropped rather than pooled, as is anything past pool capacity.
    #[inline]
    pub fn put(&self, mut buf: BytesMut) {
        buf.clear();
        if buf.capacity() >= self.buffer_capacity && self.queue.push(buf).is_ok() {
            self.metrics.returns.fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics.drops.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Buffers currently available
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    /// Capacity of each pooled buffer in bytes
    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Get reference to the pool counters
    #[inline]
    pub fn metrics(&self) -> &BufferPoolMetrics {
        &self.metrics
    }
}

#[cfg(test)]
#[path = "buffer_pool_test.rs"]
mod buffer_pool_test;
