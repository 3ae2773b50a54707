//! Big-endian data streams for binbuf.
//!
//! This crate layers the classic data-stream format on top of
//! [`std::io::Read`] and [`std::io::Write`]: fixed-width primitives in
//! big-endian order, encoded with the same codec as
//! [`binbuf_buffers::ByteOrder`], and length-prefixed modified UTF-8 strings.
//!
//! # Overview
//!
//! - [`DataInput`] / [`DataOutput`] - The primitive read/write contracts
//! - [`DataInputStream`] / [`DataOutputStream`] - Implementations over any
//!   reader or writer, including a [`ByteBuffer`](binbuf_buffers::ByteBuffer)
//! - [`encode_mutf8`] / [`decode_mutf8`] - The modified UTF-8 string codec
//!
//! # Example
//!
//! ```
//! use binbuf_buffers::ByteBuffer;
//! use binbuf_data_io::{DataInput, DataInputStream, DataOutput, DataOutputStream};
//!
//! let mut out = DataOutputStream::new(ByteBuffer::allocate(32));
//! out.write_i32(-2)?;
//! out.write_utf("h\u{e9}")?;
//! assert_eq!(out.size(), 4 + 2 + 3);
//!
//! let mut bytes = out.into_inner();
//! bytes.flip();
//! let mut input = DataInputStream::new(bytes);
//! assert_eq!(input.read_i32()?, -2);
//! assert_eq!(input.read_utf()?, "h\u{e9}");
//! # Ok::<(), binbuf_data_io::DataError>(())
//! ```

mod input;
mod mutf8;
mod output;

pub use input::{DataInput, DataInputStream};
pub use mutf8::{decode_mutf8, decode_mutf8_units, encode_mutf8, encode_mutf8_units, mutf8_len};
pub use output::{DataOutput, DataOutputStream};

use std::io;

use binbuf_buffers::BufferError;
use thiserror::Error;

/// Longest encoded string a 2-byte length prefix can describe.
pub const MAX_UTF_LEN: usize = u16::MAX as usize;

/// Error type for data stream operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("malformed modified UTF-8 input at byte {offset}")]
    MalformedInput { offset: usize },
    #[error("encoded string too long: {0} bytes")]
    StringTooLong(usize),
    #[error("decoded string contains an unpaired surrogate")]
    UnpairedSurrogate,
    #[error(transparent)]
    Buffer(#[from] BufferError),
}
