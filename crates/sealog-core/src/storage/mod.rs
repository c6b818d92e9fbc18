//! Durable output storage.
//!
//! - [`DurableWriter`]: buffered file with flush + fsync + close
//! - [`SharedWriter`]: the same writer behind the lock shared with shutdown

pub mod shared;
pub mod writer;

pub use shared::SharedWriter;
pub use writer::{clamp_buffer_size, DurableWriter, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};
