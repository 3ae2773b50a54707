//! Cursor state shared by every buffer.

use crate::BufferError;

/// Capacity, limit, position and mark of a buffer.
///
/// Every mutator keeps the chain `mark <= position <= limit <= capacity`
/// intact: lowering the limit drags the position down with it, and moving
/// the position below the mark discards the mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    capacity: usize,
    limit: usize,
    position: usize,
    mark: Option<usize>,
}

impl Cursor {
    /// Creates a cursor with `position = 0`, `limit = capacity` and no mark.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            limit: capacity,
            position: 0,
            mark: None,
        }
    }

    /// Creates a cursor over `capacity` elements with the given window.
    ///
    /// Fails unless `position <= limit <= capacity`.
    pub fn with_window(
        capacity: usize,
        position: usize,
        limit: usize,
    ) -> Result<Self, BufferError> {
        let mut cursor = Self::new(capacity);
        cursor.set_limit(limit)?;
        cursor.set_position(position)?;
        Ok(cursor)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The saved mark, if any.
    #[inline]
    pub fn mark_value(&self) -> Option<usize> {
        self.mark
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.position < self.limit
    }

    /// Resets the window to the whole capacity and drops the mark.
    pub fn clear(&mut self) -> &mut Self {
        self.position = 0;
        self.limit = self.capacity;
        self.mark = None;
        self
    }

    /// Switches from filling to draining: `limit = position`, `position = 0`.
    pub fn flip(&mut self) -> &mut Self {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
        self
    }

    /// Rewinds the position to zero, keeping the limit.
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = None;
        self
    }

    pub fn mark(&mut self) -> &mut Self {
        self.mark = Some(self.position);
        self
    }

    /// Moves the position back to the mark.
    pub fn reset(&mut self) -> Result<&mut Self, BufferError> {
        let mark = self.mark.ok_or(BufferError::InvalidMark)?;
        self.position = mark;
        Ok(self)
    }

    pub fn set_limit(&mut self, limit: usize) -> Result<&mut Self, BufferError> {
        if limit > self.capacity {
            return Err(BufferError::InvalidArgument("limit exceeds capacity"));
        }
        self.limit = limit;
        if self.position > limit {
            self.position = limit;
        }
        if matches!(self.mark, Some(mark) if mark > limit) {
            self.mark = None;
        }
        Ok(self)
    }

    pub fn set_position(&mut self, position: usize) -> Result<&mut Self, BufferError> {
        if position > self.limit {
            return Err(BufferError::InvalidArgument("position exceeds limit"));
        }
        self.position = position;
        if matches!(self.mark, Some(mark) if mark > position) {
            self.mark = None;
        }
        Ok(self)
    }

    /// Advances the position by `count` elements for a relative read.
    ///
    /// Returns the position before the advance, or `Underflow` if fewer than
    /// `count` elements remain.
    #[inline]
    pub(crate) fn next_get(&mut self, count: usize) -> Result<usize, BufferError> {
        if count > self.remaining() {
            return Err(BufferError::Underflow);
        }
        let at = self.position;
        self.position += count;
        Ok(at)
    }

    /// Like [`next_get`](Self::next_get) but reports `Overflow`.
    #[inline]
    pub(crate) fn next_put(&mut self, count: usize) -> Result<usize, BufferError> {
        if count > self.remaining() {
            return Err(BufferError::Overflow);
        }
        let at = self.position;
        self.position += count;
        Ok(at)
    }

    /// Checks that `width` elements starting at `index` lie below the limit.
    #[inline]
    pub(crate) fn check_index(&self, index: usize, width: usize) -> Result<usize, BufferError> {
        match index.checked_add(width) {
            Some(end) if end <= self.limit => Ok(index),
            _ => Err(BufferError::IndexOutOfRange {
                index,
                limit: self.limit,
            }),
        }
    }

    /// Overwrites the cursor after a compaction moved `moved` elements to the front.
    pub(crate) fn compacted(&mut self, moved: usize) {
        self.position = moved;
        self.limit = self.capacity;
        self.mark = None;
    }
}

/// Validates a `(offset, length)` window over a slice of `len` elements.
///
/// Written as `length > len - offset` so that the sum never overflows.
pub fn check_range(offset: usize, length: usize, len: usize) -> Result<(), BufferError> {
    if offset > len || length > len - offset {
        return Err(BufferError::RangeOutOfBounds {
            offset,
            length,
            len,
        });
    }
    Ok(())
}
