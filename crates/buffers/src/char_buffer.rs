//! Char buffer: 16-bit code units and string interop.

use std::fmt;

use crate::{Buffer, BufferError};

/// A buffer of UTF-16 code units.
pub type CharBuffer = Buffer<u16>;

impl Buffer<u16> {
    /// A read-only buffer over the UTF-16 code units of `s`.
    ///
    /// # Example
    ///
    /// ```
    /// use binbuf_buffers::CharBuffer;
    ///
    /// let buf = CharBuffer::wrap_str("h\u{e9}llo");
    /// assert!(buf.is_read_only());
    /// assert_eq!(buf.remaining(), 5);
    /// assert_eq!(buf.to_string(), "h\u{e9}llo");
    /// ```
    pub fn wrap_str(s: &str) -> Self {
        Self::wrap(s.encode_utf16().collect()).as_read_only_buffer()
    }

    /// Writes the UTF-16 code units of `s` at the position.
    pub fn put_str(&mut self, s: &str) -> Result<&mut Self, BufferError> {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.put_slice(&units)
    }
}

impl fmt::Display for Buffer<u16> {
    /// Renders the remaining code units; unpaired surrogates become U+FFFD.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_str_surrogates() {
        let buf = CharBuffer::wrap_str("a\u{1F600}");
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.get_at(1).unwrap(), 0xD83D);
        assert_eq!(buf.get_at(2).unwrap(), 0xDE00);
    }

    #[test]
    fn test_wrap_str_rejects_put() {
        let mut buf = CharBuffer::wrap_str("abc");
        assert_eq!(buf.put(b'x' as u16).unwrap_err(), BufferError::ReadOnly);
        assert_eq!(buf.put_str("x").unwrap_err(), BufferError::ReadOnly);
    }

    #[test]
    fn test_put_str_and_display() {
        let mut buf = CharBuffer::allocate(8);
        buf.put_str("hey").unwrap().put_str("!").unwrap();
        buf.flip();
        assert_eq!(buf.to_string(), "hey!");
        buf.get().unwrap();
        assert_eq!(buf.to_string(), "ey!");
    }

    #[test]
    fn test_put_str_overflow() {
        let mut buf = CharBuffer::allocate(2);
        assert_eq!(buf.put_str("abc").unwrap_err(), BufferError::Overflow);
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_display_lone_surrogate() {
        let buf = CharBuffer::wrap(vec![0x61, 0xD800]);
        assert_eq!(buf.to_string(), "a\u{FFFD}");
    }
}
