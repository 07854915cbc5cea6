//! Shared low-level utilities
//!
//! - **buffer_pool**: pre-allocated `BytesMut` pool feeding the async
//!   write queue

pub mod buffer_pool;

pub use buffer_pool::{BufferPool, BufferPoolMetrics, POOLED_BUFFER_SIZE};
