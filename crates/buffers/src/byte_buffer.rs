//! Byte buffer: configurable byte order, multi-byte accessors and typed views.

use std::cell::Cell;
use std::io;

use crate::buffer::Storage;
use crate::{
    Buffer, BufferError, ByteOrder, CharBuffer, Element, Float32Buffer, Float64Buffer,
    Int16Buffer, Int32Buffer, Int64Buffer,
};

/// A buffer of bytes.
///
/// Besides the element-wise API shared with every [`Buffer`], a byte buffer
/// reads and writes wider primitives in its [`ByteOrder`] (big-endian unless
/// changed with [`set_order`](Buffer::set_order)) and can be turned into a
/// typed view with the `as_*_buffer` family.
///
/// # Example
///
/// ```
/// use binbuf_buffers::{ByteBuffer, ByteOrder};
///
/// let mut buf = ByteBuffer::allocate(8);
/// buf.put_i32(0x0102_0304)?;
/// buf.set_order(ByteOrder::LittleEndian);
/// buf.put_i32(0x0102_0304)?;
/// assert!(!buf.has_remaining());
/// buf.flip();
/// assert_eq!(buf.to_vec(), vec![1, 2, 3, 4, 4, 3, 2, 1]);
/// # Ok::<(), binbuf_buffers::BufferError>(())
/// ```
pub type ByteBuffer = Buffer<u8>;

impl Buffer<u8> {
    /// Changes the order used by subsequent multi-byte accesses.
    ///
    /// Views created earlier with `as_*_buffer` keep the order they were
    /// created with.
    pub fn set_order(&mut self, order: ByteOrder) -> &mut Self {
        self.order = order;
        if let Storage::Bytes(bytes) = &mut self.storage {
            bytes.set_order(order);
        }
        self
    }

    /// The `width` storage cells starting at `index`, after a bounds check
    /// against the limit that cannot overflow.
    fn cells(&self, index: usize, width: usize) -> Result<&[Cell<u8>], BufferError> {
        self.cursor.check_index(index, width)?;
        match &self.storage {
            Storage::Array { array, offset, .. } => {
                array
                    .get(offset + index..offset + index + width)
                    .ok_or(BufferError::IndexOutOfRange {
                        index,
                        limit: self.limit(),
                    })
            }
            Storage::Bytes(bytes) => bytes.cells(index, width),
        }
    }

    pub(crate) fn get_scalar_at<E: Element>(&self, index: usize) -> Result<E, BufferError> {
        let cells = self.cells(index, E::WIDTH)?;
        Ok(E::decode(cells, self.order()))
    }

    pub(crate) fn put_scalar_at<E: Element>(
        &self,
        index: usize,
        value: E,
    ) -> Result<(), BufferError> {
        self.ensure_writable()?;
        let cells = self.cells(index, E::WIDTH)?;
        value.encode(cells, self.order());
        Ok(())
    }

    fn get_scalar<E: Element>(&mut self) -> Result<E, BufferError> {
        if E::WIDTH > self.remaining() {
            return Err(BufferError::Underflow);
        }
        let value = self.get_scalar_at(self.position())?;
        self.cursor.next_get(E::WIDTH)?;
        Ok(value)
    }

    fn put_scalar<E: Element>(&mut self, value: E) -> Result<&mut Self, BufferError> {
        self.ensure_writable()?;
        if E::WIDTH > self.remaining() {
            return Err(BufferError::Overflow);
        }
        self.put_scalar_at(self.position(), value)?;
        self.cursor.next_put(E::WIDTH)?;
        Ok(self)
    }

    fn put_scalar_indexed<E: Element>(
        &mut self,
        index: usize,
        value: E,
    ) -> Result<&mut Self, BufferError> {
        self.put_scalar_at(index, value)?;
        Ok(self)
    }

    // ------------------------------------------------------------------- char

    /// Reads a 16-bit char code unit at the position.
    pub fn get_char(&mut self) -> Result<u16, BufferError> {
        self.get_scalar()
    }

    /// Reads a 16-bit char code unit at byte `index` without moving the position.
    pub fn get_char_at(&self, index: usize) -> Result<u16, BufferError> {
        self.get_scalar_at(index)
    }

    /// Writes a 16-bit char code unit at the position and advances it by its width.
    pub fn put_char(&mut self, value: u16) -> Result<&mut Self, BufferError> {
        self.put_scalar(value)
    }

    /// Writes a 16-bit char code unit at byte `index` without moving the position.
    pub fn put_char_at(&mut self, index: usize, value: u16) -> Result<&mut Self, BufferError> {
        self.put_scalar_indexed(index, value)
    }

    // ------------------------------------------------------------------ int16

    /// Reads an `i16` at the position and advances it by its width.
    pub fn get_i16(&mut self) -> Result<i16, BufferError> {
        self.get_scalar()
    }

    /// Reads an `i16` at byte `index` without moving the position.
    pub fn get_i16_at(&self, index: usize) -> Result<i16, BufferError> {
        self.get_scalar_at(index)
    }

    /// Writes an `i16` at the position and advances it by its width.
    pub fn put_i16(&mut self, value: i16) -> Result<&mut Self, BufferError> {
        self.put_scalar(value)
    }

    /// Writes an `i16` at byte `index` without moving the position.
    pub fn put_i16_at(&mut self, index: usize, value: i16) -> Result<&mut Self, BufferError> {
        self.put_scalar_indexed(index, value)
    }

    // ------------------------------------------------------------------ int32

    /// Reads an `i32` at the position and advances it by its width.
    pub fn get_i32(&mut self) -> Result<i32, BufferError> {
        self.get_scalar()
    }

    /// Reads an `i32` at byte `index` without moving the position.
    pub fn get_i32_at(&self, index: usize) -> Result<i32, BufferError> {
        self.get_scalar_at(index)
    }

    /// Writes an `i32` at the position and advances it by its width.
    pub fn put_i32(&mut self, value: i32) -> Result<&mut Self, BufferError> {
        self.put_scalar(value)
    }

    /// Writes an `i32` at byte `index` without moving the position.
    pub fn put_i32_at(&mut self, index: usize, value: i32) -> Result<&mut Self, BufferError> {
        self.put_scalar_indexed(index, value)
    }

    // ------------------------------------------------------------------ int64

    /// Reads an `i64` at the position and advances it by its width.
    pub fn get_i64(&mut self) -> Result<i64, BufferError> {
        self.get_scalar()
    }

    /// Reads an `i64` at byte `index` without moving the position.
    pub fn get_i64_at(&self, index: usize) -> Result<i64, BufferError> {
        self.get_scalar_at(index)
    }

    /// Writes an `i64` at the position and advances it by its width.
    pub fn put_i64(&mut self, value: i64) -> Result<&mut Self, BufferError> {
        self.put_scalar(value)
    }

    /// Writes an `i64` at byte `index` without moving the position.
    pub fn put_i64_at(&mut self, index: usize, value: i64) -> Result<&mut Self, BufferError> {
        self.put_scalar_indexed(index, value)
    }

    // ---------------------------------------------------------------- float32

    /// Reads an `f32` at the position and advances it by its width.
    pub fn get_f32(&mut self) -> Result<f32, BufferError> {
        self.get_scalar()
    }

    /// Reads an `f32` at byte `index` without moving the position.
    pub fn get_f32_at(&self, index: usize) -> Result<f32, BufferError> {
        self.get_scalar_at(index)
    }

    /// Writes an `f32` at the position and advances it by its width.
    pub fn put_f32(&mut self, value: f32) -> Result<&mut Self, BufferError> {
        self.put_scalar(value)
    }

    /// Writes an `f32` at byte `index` without moving the position.
    pub fn put_f32_at(&mut self, index: usize, value: f32) -> Result<&mut Self, BufferError> {
        self.put_scalar_indexed(index, value)
    }

    // ---------------------------------------------------------------- float64

    /// Reads an `f64` at the position and advances it by its width.
    pub fn get_f64(&mut self) -> Result<f64, BufferError> {
        self.get_scalar()
    }

    /// Reads an `f64` at byte `index` without moving the position.
    pub fn get_f64_at(&self, index: usize) -> Result<f64, BufferError> {
        self.get_scalar_at(index)
    }

    /// Writes an `f64` at the position and advances it by its width.
    pub fn put_f64(&mut self, value: f64) -> Result<&mut Self, BufferError> {
        self.put_scalar(value)
    }

    /// Writes an `f64` at byte `index` without moving the position.
    pub fn put_f64_at(&mut self, index: usize, value: f64) -> Result<&mut Self, BufferError> {
        self.put_scalar_indexed(index, value)
    }

    // ------------------------------------------------------------------ views

    /// Views the remaining bytes as `E` elements.
    pub(crate) fn view_as<E: Element>(self) -> Buffer<E> {
        Buffer::from_bytes(self)
    }

    /// Consumes the buffer into a [`CharBuffer`] view; see [`as_i32_buffer`](Self::as_i32_buffer).
    pub fn as_char_buffer(self) -> CharBuffer {
        self.view_as()
    }

    /// Consumes the buffer into an [`Int16Buffer`] view; see [`as_i32_buffer`](Self::as_i32_buffer).
    pub fn as_i16_buffer(self) -> Int16Buffer {
        self.view_as()
    }

    /// Consumes the buffer and views its remaining bytes as `i32` elements.
    ///
    /// The view has `capacity = remaining() / 4`, starts at the current
    /// position, and uses this buffer's order and read-only flag. To keep
    /// using the bytes directly, view a [`duplicate`](Buffer::duplicate)
    /// instead. The other `as_*_buffer` methods work the same way.
    pub fn as_i32_buffer(self) -> Int32Buffer {
        self.view_as()
    }

    /// Consumes the buffer into an [`Int64Buffer`] view; see [`as_i32_buffer`](Self::as_i32_buffer).
    pub fn as_i64_buffer(self) -> Int64Buffer {
        self.view_as()
    }

    /// Consumes the buffer into a [`Float32Buffer`] view; see [`as_i32_buffer`](Self::as_i32_buffer).
    pub fn as_f32_buffer(self) -> Float32Buffer {
        self.view_as()
    }

    /// Consumes the buffer into a [`Float64Buffer`] view; see [`as_i32_buffer`](Self::as_i32_buffer).
    pub fn as_f64_buffer(self) -> Float64Buffer {
        self.view_as()
    }
}

impl io::Read for Buffer<u8> {
    /// Drains up to `buf.len()` remaining bytes.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        self.get_slice(&mut buf[..n]).map_err(io::Error::other)?;
        Ok(n)
    }
}

impl io::Write for Buffer<u8> {
    /// Fills up to `buf.len()` bytes of the remaining room.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.is_read_only() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                BufferError::ReadOnly,
            ));
        }
        let n = buf.len().min(self.remaining());
        self.put_slice(&buf[..n]).map_err(io::Error::other)?;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
