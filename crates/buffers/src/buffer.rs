//! The typed buffer shared by every element family.

use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::cmp::{compare_elements, equal_elements};
use crate::cursor::{check_range, Cursor};
use crate::{BufferError, ByteOrder, Element};

/// Backing storage that several buffers may alias.
///
/// Writes through any buffer over the same storage are visible through all
/// of them, and through any handle the caller kept.
pub type SharedArray<T> = Rc<[Cell<T>]>;

/// Collects values into a fresh [`SharedArray`].
pub fn shared_array<T: Copy>(values: impl IntoIterator<Item = T>) -> SharedArray<T> {
    values.into_iter().map(Cell::new).collect()
}

pub(crate) enum Storage<T: Element> {
    /// Elements live in `array[offset..]`.
    Array {
        array: SharedArray<T>,
        offset: usize,
        read_only: bool,
    },
    /// Elements are decoded from a privately owned byte buffer whose
    /// cursor always spans its full capacity.
    Bytes(Box<Buffer<u8>>),
}

/// A fixed-capacity sequence of `T` with a position/limit/mark cursor.
///
/// A buffer either owns a slot range of a [`SharedArray`] or is a view over a
/// [`ByteBuffer`](crate::ByteBuffer) whose bytes are reinterpreted as `T` in
/// the byte buffer's [`ByteOrder`]. Slices and duplicates share storage with
/// the buffer they came from but move their cursors independently.
///
/// Buffers are not thread-safe; they are neither `Send` nor `Sync`.
///
/// # Example
///
/// ```
/// use binbuf_buffers::Int32Buffer;
///
/// let mut buf = Int32Buffer::allocate(4);
/// buf.put(1)?.put(2)?.put(3)?;
/// buf.flip();
/// assert_eq!(buf.remaining(), 3);
/// assert_eq!(buf.get()?, 1);
/// assert_eq!(buf.get_at(2)?, 3);
/// # Ok::<(), binbuf_buffers::BufferError>(())
/// ```
pub struct Buffer<T: Element> {
    pub(crate) cursor: Cursor,
    pub(crate) storage: Storage<T>,
    /// For byte-view storage this mirrors the wrapped bytes' order, which
    /// [`order`](Self::order) reads directly.
    pub(crate) order: ByteOrder,
}

impl<T: Element> Buffer<T> {
    /// Allocates a zero-filled buffer of `capacity` elements.
    pub fn allocate(capacity: usize) -> Self {
        let array = shared_array(std::iter::repeat(T::default()).take(capacity));
        Self::over_array(array, 0, Cursor::new(capacity), false)
    }

    /// Wraps `values`; capacity and limit equal `values.len()`.
    pub fn wrap(values: Vec<T>) -> Self {
        let capacity = values.len();
        Self::over_array(shared_array(values), 0, Cursor::new(capacity), false)
    }

    /// Wraps `values` with `position = start` and `limit = start + length`.
    pub fn wrap_range(values: Vec<T>, start: usize, length: usize) -> Result<Self, BufferError> {
        Self::wrap_shared(shared_array(values), start, length)
    }

    /// Wraps storage the caller keeps a handle to.
    ///
    /// Capacity is the full storage length; the window is
    /// `[start, start + length)`.
    pub fn wrap_shared(
        array: SharedArray<T>,
        start: usize,
        length: usize,
    ) -> Result<Self, BufferError> {
        let capacity = array.len();
        check_range(start, length, capacity)?;
        let cursor = Cursor::with_window(capacity, start, start + length)?;
        Ok(Self::over_array(array, 0, cursor, false))
    }

    fn over_array(array: SharedArray<T>, offset: usize, cursor: Cursor, read_only: bool) -> Self {
        Self {
            cursor,
            storage: Storage::Array {
                array,
                offset,
                read_only,
            },
            order: T::ARRAY_ORDER,
        }
    }

    /// Reinterprets the remaining bytes of `bytes` as elements of `T`.
    pub(crate) fn from_bytes(bytes: Buffer<u8>) -> Self {
        let bytes = bytes.slice();
        let capacity = bytes.capacity() >> T::SHIFT;
        let order = bytes.order();
        Self {
            cursor: Cursor::new(capacity),
            storage: Storage::Bytes(Box::new(bytes)),
            order,
        }
    }

    // ------------------------------------------------------------------ cursor

    /// Number of elements the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// Index of the next element to read or write.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Index of the first element that must not be read or written.
    #[inline]
    pub fn limit(&self) -> usize {
        self.cursor.limit()
    }

    /// `limit - position`.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Whether `position < limit`.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.cursor.has_remaining()
    }

    /// The cursor state as a plain value.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Sets the position to zero and the limit to the capacity, clearing the mark.
    pub fn clear(&mut self) -> &mut Self {
        self.cursor.clear();
        self
    }

    /// Sets the limit to the position and the position to zero, clearing the mark.
    pub fn flip(&mut self) -> &mut Self {
        self.cursor.flip();
        self
    }

    /// Sets the position to zero, clearing the mark.
    pub fn rewind(&mut self) -> &mut Self {
        self.cursor.rewind();
        self
    }

    /// Saves the position for a later [`reset`](Self::reset).
    pub fn mark(&mut self) -> &mut Self {
        self.cursor.mark();
        self
    }

    /// Restores the position saved by [`mark`](Self::mark).
    pub fn reset(&mut self) -> Result<&mut Self, BufferError> {
        self.cursor.reset()?;
        Ok(self)
    }

    /// Sets the limit, pulling the position and mark back inside it.
    pub fn set_limit(&mut self, limit: usize) -> Result<&mut Self, BufferError> {
        self.cursor.set_limit(limit)?;
        Ok(self)
    }

    /// Sets the position, dropping a mark that lies beyond it.
    pub fn set_position(&mut self, position: usize) -> Result<&mut Self, BufferError> {
        self.cursor.set_position(position)?;
        Ok(self)
    }

    // ---------------------------------------------------------------- storage

    /// Whether writes are rejected.
    pub fn is_read_only(&self) -> bool {
        match &self.storage {
            Storage::Array { read_only, .. } => *read_only,
            Storage::Bytes(bytes) => bytes.is_read_only(),
        }
    }

    /// Byte order used to encode elements.
    ///
    /// Array-backed buffers other than byte buffers always report the native
    /// order; views report the order of the byte buffer they wrap.
    pub fn order(&self) -> ByteOrder {
        match &self.storage {
            Storage::Array { .. } => self.order,
            Storage::Bytes(bytes) => bytes.order(),
        }
    }

    /// Whether [`array`](Self::array) would succeed.
    pub fn has_array(&self) -> bool {
        matches!(
            self.storage,
            Storage::Array {
                read_only: false,
                ..
            }
        )
    }

    /// The storage behind an array-backed, writable buffer.
    ///
    /// Element `i` of this buffer is `array()[array_offset() + i]`.
    pub fn array(&self) -> Result<&SharedArray<T>, BufferError> {
        match &self.storage {
            Storage::Array {
                read_only: true, ..
            } => Err(BufferError::ReadOnly),
            Storage::Array { array, .. } => Ok(array),
            Storage::Bytes(_) => Err(BufferError::Unsupported("buffer is a view over bytes")),
        }
    }

    /// Storage index of this buffer's element 0.
    pub fn array_offset(&self) -> Result<usize, BufferError> {
        match &self.storage {
            Storage::Array {
                read_only: true, ..
            } => Err(BufferError::ReadOnly),
            Storage::Array { offset, .. } => Ok(*offset),
            Storage::Bytes(_) => Err(BufferError::Unsupported("buffer is a view over bytes")),
        }
    }

    #[inline]
    pub(crate) fn ensure_writable(&self) -> Result<(), BufferError> {
        if self.is_read_only() {
            return Err(BufferError::ReadOnly);
        }
        Ok(())
    }

    /// Reads element `index` of the storage; bounds were checked by the caller.
    pub(crate) fn load(&self, index: usize) -> Result<T, BufferError> {
        match &self.storage {
            Storage::Array { array, offset, .. } => array
                .get(offset + index)
                .map(Cell::get)
                .ok_or(BufferError::IndexOutOfRange {
                    index,
                    limit: self.limit(),
                }),
            Storage::Bytes(bytes) => bytes.get_scalar_at(index << T::SHIFT),
        }
    }

    pub(crate) fn store(&self, index: usize, value: T) -> Result<(), BufferError> {
        match &self.storage {
            Storage::Array {
                read_only: true, ..
            } => Err(BufferError::ReadOnly),
            Storage::Array { array, offset, .. } => {
                let cell = array
                    .get(offset + index)
                    .ok_or(BufferError::IndexOutOfRange {
                        index,
                        limit: self.limit(),
                    })?;
                cell.set(value);
                Ok(())
            }
            Storage::Bytes(bytes) => bytes.put_scalar_at(index << T::SHIFT, value),
        }
    }

    fn load_run(&self, start: usize, out: &mut [T]) -> Result<(), BufferError> {
        for (k, slot) in out.iter_mut().enumerate() {
            *slot = self.load(start + k)?;
        }
        Ok(())
    }

    fn store_run(&self, start: usize, src: &[T]) -> Result<(), BufferError> {
        for (k, value) in src.iter().enumerate() {
            self.store(start + k, *value)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------- get/put

    /// Reads the element at the position and advances it.
    pub fn get(&mut self) -> Result<T, BufferError> {
        let at = self.cursor.next_get(1)?;
        self.load(at)
    }

    /// Reads the element at `index` without moving the cursor.
    pub fn get_at(&self, index: usize) -> Result<T, BufferError> {
        let at = self.cursor.check_index(index, 1)?;
        self.load(at)
    }

    /// Writes `value` at the position and advances it.
    pub fn put(&mut self, value: T) -> Result<&mut Self, BufferError> {
        self.ensure_writable()?;
        let at = self.cursor.next_put(1)?;
        self.store(at, value)?;
        Ok(self)
    }

    /// Writes `value` at `index` without moving the cursor.
    pub fn put_at(&mut self, index: usize, value: T) -> Result<&mut Self, BufferError> {
        self.ensure_writable()?;
        let at = self.cursor.check_index(index, 1)?;
        self.store(at, value)?;
        Ok(self)
    }

    /// Fills `dst` from the remaining elements.
    pub fn get_slice(&mut self, dst: &mut [T]) -> Result<&mut Self, BufferError> {
        let len = dst.len();
        self.get_slice_range(dst, 0, len)
    }

    /// Fills `dst[offset..offset + length]` from the remaining elements.
    ///
    /// Fails with `Underflow`, leaving the position untouched, if fewer than
    /// `length` elements remain.
    pub fn get_slice_range(
        &mut self,
        dst: &mut [T],
        offset: usize,
        length: usize,
    ) -> Result<&mut Self, BufferError> {
        check_range(offset, length, dst.len())?;
        if length > self.remaining() {
            return Err(BufferError::Underflow);
        }
        self.load_run(self.position(), &mut dst[offset..offset + length])?;
        self.cursor.next_get(length)?;
        Ok(self)
    }

    /// Writes all of `src` at the position.
    pub fn put_slice(&mut self, src: &[T]) -> Result<&mut Self, BufferError> {
        self.put_slice_range(src, 0, src.len())
    }

    /// Writes `src[offset..offset + length]` at the position.
    ///
    /// Fails with `Overflow`, leaving the buffer untouched, if fewer than
    /// `length` elements of room remain.
    pub fn put_slice_range(
        &mut self,
        src: &[T],
        offset: usize,
        length: usize,
    ) -> Result<&mut Self, BufferError> {
        check_range(offset, length, src.len())?;
        self.ensure_writable()?;
        if length > self.remaining() {
            return Err(BufferError::Overflow);
        }
        self.store_run(self.position(), &src[offset..offset + length])?;
        self.cursor.next_put(length)?;
        Ok(self)
    }

    /// Moves every remaining element of `src` into this buffer.
    ///
    /// Both positions advance by `src.remaining()`. Nothing is read from
    /// `src` unless the whole transfer can happen. Passing a buffer as its
    /// own source is rejected by the borrow checker:
    ///
    /// ```compile_fail
    /// use binbuf_buffers::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::allocate(4);
    /// buf.put_buffer(&mut buf);
    /// ```
    pub fn put_buffer(&mut self, src: &mut Buffer<T>) -> Result<&mut Self, BufferError> {
        self.ensure_writable()?;
        let n = src.remaining();
        if n > self.remaining() {
            return Err(BufferError::Overflow);
        }
        // Staged through a vector: `src` may alias this buffer's storage.
        let mut staged = vec![T::default(); n];
        src.get_slice(&mut staged)?;
        self.put_slice(&staged)
    }

    // ------------------------------------------------------------------ views

    /// A buffer over `[position, limit)` of this one, sharing storage.
    ///
    /// The slice starts with `position = 0`, `limit = capacity = remaining()`
    /// and no mark. Read-only-ness and byte order carry over.
    pub fn slice(&self) -> Self {
        self.window(self.position(), self.remaining())
    }

    /// A buffer over `len` elements starting at storage index `start`.
    pub(crate) fn window(&self, start: usize, len: usize) -> Self {
        let storage = match &self.storage {
            Storage::Array {
                array,
                offset,
                read_only,
            } => Storage::Array {
                array: Rc::clone(array),
                offset: offset + start,
                read_only: *read_only,
            },
            Storage::Bytes(bytes) => {
                Storage::Bytes(Box::new(bytes.window(start << T::SHIFT, len << T::SHIFT)))
            }
        };
        Self {
            cursor: Cursor::new(len),
            storage,
            order: self.order,
        }
    }

    /// An independent cursor over the same storage, starting from this
    /// buffer's capacity, limit, position and mark.
    pub fn duplicate(&self) -> Self {
        self.copy_with(self.is_read_only())
    }

    /// Like [`duplicate`](Self::duplicate), but the result rejects writes.
    pub fn as_read_only_buffer(&self) -> Self {
        self.copy_with(true)
    }

    fn copy_with(&self, read_only: bool) -> Self {
        let storage = match &self.storage {
            Storage::Array { array, offset, .. } => Storage::Array {
                array: Rc::clone(array),
                offset: *offset,
                read_only,
            },
            Storage::Bytes(bytes) if read_only => {
                Storage::Bytes(Box::new(bytes.as_read_only_buffer()))
            }
            Storage::Bytes(bytes) => Storage::Bytes(Box::new(bytes.duplicate())),
        };
        Self {
            cursor: self.cursor,
            storage,
            order: self.order,
        }
    }

    /// Moves `[position, limit)` to the front of the buffer.
    ///
    /// Afterwards `position = old remaining()`, `limit = capacity` and the
    /// mark is cleared, ready for more writes.
    pub fn compact(&mut self) -> Result<&mut Self, BufferError> {
        self.ensure_writable()?;
        let moved = self.remaining();
        let from = self.position();
        let limit = self.limit();
        match &mut self.storage {
            Storage::Array { array, offset, .. } => {
                let cells = array
                    .get(*offset..*offset + limit)
                    .ok_or(BufferError::IndexOutOfRange {
                        index: limit,
                        limit,
                    })?;
                for k in 0..moved {
                    cells[k].set(cells[from + k].get());
                }
            }
            Storage::Bytes(bytes) => {
                bytes.set_limit(limit << T::SHIFT)?;
                bytes.set_position(from << T::SHIFT)?;
                bytes.compact()?;
                bytes.clear();
            }
        }
        self.cursor.compacted(moved);
        Ok(self)
    }

    // ------------------------------------------------------------- inspection

    /// Iterates over the remaining elements without moving the position.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            index: self.position(),
        }
    }

    /// Copies the remaining elements into a vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

/// Iterator over the remaining elements of a [`Buffer`].
pub struct Iter<'a, T: Element> {
    buffer: &'a Buffer<T>,
    index: usize,
}

impl<T: Element> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.index >= self.buffer.limit() {
            return None;
        }
        let value = self.buffer.load(self.index).ok()?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.buffer.limit().saturating_sub(self.index);
        (n, Some(n))
    }
}

impl<T: Element> ExactSizeIterator for Iter<'_, T> {}

impl<T: Element> PartialEq for Buffer<T> {
    /// Compares the remaining elements only; NaN equals NaN.
    fn eq(&self, other: &Self) -> bool {
        self.remaining() == other.remaining() && equal_elements(self.iter(), other.iter())
    }
}

impl<T: Element> Eq for Buffer<T> {}

impl<T: Element> PartialOrd for Buffer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Element> Ord for Buffer<T> {
    /// Lexicographic over the remaining elements; a proper prefix sorts first.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        compare_elements(self.iter(), other.iter())
    }
}

impl<T: Element> Hash for Buffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in self.iter() {
            state.write_u64(value.hash_word());
        }
    }
}

impl<T: Element> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[pos={} lim={} cap={}]",
            T::BUFFER_NAME,
            self.position(),
            self.limit(),
            self.capacity()
        )
    }
}
