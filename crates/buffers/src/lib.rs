//! Position-aware typed buffers for binary I/O.
//!
//! This crate provides fixed-capacity buffers with a position/limit/mark
//! cursor for seven element families, and byte-order-aware views that
//! reinterpret a byte buffer as a buffer of a wider primitive.
//!
//! # Overview
//!
//! - [`Buffer`] - The typed buffer, generic over its [`Element`]
//! - [`ByteBuffer`] - Bytes, with multi-byte accessors in a [`ByteOrder`]
//! - [`CharBuffer`], [`Int16Buffer`], [`Int32Buffer`], [`Int64Buffer`],
//!   [`Float32Buffer`], [`Float64Buffer`] - Array-backed buffers, or views
//!   over a byte buffer created with `ByteBuffer::as_*_buffer`
//! - [`Cursor`] - The capacity/limit/position/mark state machine
//!
//! # Example
//!
//! ```
//! use binbuf_buffers::{ByteBuffer, ByteOrder};
//!
//! let mut bytes = ByteBuffer::allocate(8);
//! bytes.set_order(ByteOrder::LittleEndian);
//! bytes.put_i32(7)?;
//! bytes.put_i32(-7)?;
//! bytes.flip();
//!
//! // The view shares the byte storage and its order.
//! let mut ints = bytes.duplicate().as_i32_buffer();
//! assert_eq!(ints.get()?, 7);
//! assert_eq!(ints.get()?, -7);
//!
//! ints.put_at(0, 0x0102_0304)?;
//! assert_eq!(bytes.get_at(0)?, 0x04);
//! # Ok::<(), binbuf_buffers::BufferError>(())
//! ```

mod buffer;
mod byte_buffer;
mod char_buffer;
mod cmp;
mod cursor;
mod element;
mod order;

pub use buffer::{shared_array, Buffer, Iter, SharedArray};
pub use byte_buffer::ByteBuffer;
pub use char_buffer::CharBuffer;
pub use cmp::{compare_elements, equal_elements};
pub use cursor::{check_range, Cursor};
pub use element::Element;
pub use order::ByteOrder;

pub type Int16Buffer = Buffer<i16>;
pub type Int32Buffer = Buffer<i32>;
pub type Int64Buffer = Buffer<i64>;
pub type Float32Buffer = Buffer<f32>;
pub type Float64Buffer = Buffer<f64>;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A read needed more elements than remain.
    #[error("buffer underflow")]
    Underflow,
    /// A write needed more room than remains.
    #[error("buffer overflow")]
    Overflow,
    /// A mutating call on a read-only buffer.
    #[error("buffer is read-only")]
    ReadOnly,
    /// An absolute access outside `[0, limit)`.
    #[error("index {index} out of range for limit {limit}")]
    IndexOutOfRange { index: usize, limit: usize },
    /// An `(offset, length)` window that does not fit a slice of `len`.
    #[error("range at offset {offset} with length {length} out of bounds for length {len}")]
    RangeOutOfBounds {
        offset: usize,
        length: usize,
        len: usize,
    },
    /// `reset` without a mark.
    #[error("mark is not set")]
    InvalidMark,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
