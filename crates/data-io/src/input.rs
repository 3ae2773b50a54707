//! Big-endian primitive input.

use std::io::{self, Read};

use binbuf_buffers::{check_range, ByteOrder};

use crate::mutf8::decode_mutf8;
use crate::DataError;

const ORDER: ByteOrder = ByteOrder::BigEndian;

/// Reads primitives in big-endian order from a byte source.
///
/// Implementors supply [`read_fully_range`](DataInput::read_fully_range) and
/// [`skip_bytes`](DataInput::skip_bytes); every other method is built on them.
pub trait DataInput {
    /// Fills `buf[offset..offset + length]` or fails with `UnexpectedEof`.
    fn read_fully_range(
        &mut self,
        buf: &mut [u8],
        offset: usize,
        length: usize,
    ) -> Result<(), DataError>;

    /// Discards up to `n` bytes, returning how many were skipped.
    fn skip_bytes(&mut self, n: usize) -> Result<usize, DataError>;

    /// Fills all of `buf`.
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<(), DataError> {
        let len = buf.len();
        self.read_fully_range(buf, 0, len)
    }

    /// Any non-zero byte is `true`.
    fn read_bool(&mut self) -> Result<bool, DataError> {
        Ok(self.read_u8()? != 0)
    }

    fn read_u8(&mut self) -> Result<u8, DataError> {
        let [b] = read_array::<1, _>(self)?;
        Ok(b)
    }

    fn read_i8(&mut self) -> Result<i8, DataError> {
        Ok(self.read_u8()? as i8)
    }

    fn read_i16(&mut self) -> Result<i16, DataError> {
        Ok(ORDER.decode_i16(read_array(self)?))
    }

    fn read_u16(&mut self) -> Result<u16, DataError> {
        Ok(ORDER.decode_u16(read_array(self)?))
    }

    /// A UTF-16 code unit.
    fn read_char(&mut self) -> Result<u16, DataError> {
        self.read_u16()
    }

    fn read_i32(&mut self) -> Result<i32, DataError> {
        Ok(ORDER.decode_i32(read_array(self)?))
    }

    fn read_i64(&mut self) -> Result<i64, DataError> {
        Ok(ORDER.decode_i64(read_array(self)?))
    }

    fn read_f32(&mut self) -> Result<f32, DataError> {
        Ok(ORDER.decode_f32(read_array(self)?))
    }

    fn read_f64(&mut self) -> Result<f64, DataError> {
        Ok(ORDER.decode_f64(read_array(self)?))
    }

    /// Reads a `u16` byte count followed by that many bytes of modified UTF-8.
    fn read_utf(&mut self) -> Result<String, DataError> {
        let len = self.read_u16()? as usize;
        let mut bytes = vec![0u8; len];
        self.read_fully(&mut bytes)?;
        decode_mutf8(&bytes)
    }
}

fn read_array<const N: usize, D: DataInput + ?Sized>(input: &mut D) -> Result<[u8; N], DataError> {
    let mut b = [0u8; N];
    input.read_fully(&mut b)?;
    Ok(b)
}

/// [`DataInput`] over any [`Read`].
///
/// Holds at most one byte of lookahead, used by [`read_line`](Self::read_line).
pub struct DataInputStream<R> {
    inner: R,
    pushback: Option<u8>,
    offset: u64,
}

impl<R: Read> DataInputStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: None,
            offset: 0,
        }
    }

    /// Bytes handed out so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the reader. A byte held back by `read_line` is lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads a line of Latin-1 text.
    ///
    /// The line ends at `\n`, `\r`, `\r\n`, or the end of input, and the
    /// terminator is not included. Returns `None` if the input is already
    /// exhausted.
    pub fn read_line(&mut self) -> Result<Option<String>, DataError> {
        let mut line = String::new();
        let mut any = false;
        loop {
            match self.next_byte()? {
                None => return Ok(any.then_some(line)),
                Some(b'\n') => return Ok(Some(line)),
                Some(b'\r') => {
                    if let Some(b) = self.next_byte()? {
                        if b != b'\n' {
                            self.unread(b);
                        }
                    }
                    return Ok(Some(line));
                }
                Some(b) => {
                    any = true;
                    line.push(b as char);
                }
            }
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>, DataError> {
        if let Some(b) = self.pushback.take() {
            self.offset += 1;
            return Ok(Some(b));
        }
        let mut b = [0u8; 1];
        loop {
            match self.inner.read(&mut b) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(b[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn unread(&mut self, b: u8) {
        self.pushback = Some(b);
        self.offset -= 1;
    }

    fn fill(&mut self, dst: &mut [u8]) -> Result<(), DataError> {
        let mut filled = 0;
        if !dst.is_empty() {
            if let Some(b) = self.pushback.take() {
                dst[0] = b;
                filled = 1;
                self.offset += 1;
            }
        }
        while filled < dst.len() {
            match self.inner.read(&mut dst[filled..]) {
                Ok(0) => {
                    tracing::trace!(
                        offset = self.offset,
                        wanted = dst.len() - filled,
                        "input ended before read completed"
                    );
                    return Err(DataError::UnexpectedEof);
                }
                Ok(n) => {
                    filled += n;
                    self.offset += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl<R: Read> DataInput for DataInputStream<R> {
    fn read_fully_range(
        &mut self,
        buf: &mut [u8],
        offset: usize,
        length: usize,
    ) -> Result<(), DataError> {
        check_range(offset, length, buf.len())?;
        self.fill(&mut buf[offset..offset + length])
    }

    fn skip_bytes(&mut self, n: usize) -> Result<usize, DataError> {
        let mut skipped = 0;
        if n > 0 && self.pushback.take().is_some() {
            skipped = 1;
        }
        let rest = (n - skipped) as u64;
        skipped += io::copy(&mut (&mut self.inner).take(rest), &mut io::sink())? as usize;
        self.offset += skipped as u64;
        Ok(skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binbuf_buffers::BufferError;
    use std::io::Cursor;
    use tracing_test::traced_test;

    fn stream(bytes: &[u8]) -> DataInputStream<Cursor<Vec<u8>>> {
        DataInputStream::new(Cursor::new(bytes.to_vec()))
    }

    /// Hands out one byte per call.
    struct Trickle(Vec<u8>, usize);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.1 >= self.0.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[self.1];
            self.1 += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_primitives() {
        let mut s = stream(&[
            1, 0xFF, 0x80, 0x12, 0x34, 0xFF, 0xFE, 0x00, 0x41, 0x3F, 0x80, 0x00, 0x00,
        ]);
        assert!(s.read_bool().unwrap());
        assert_eq!(s.read_u8().unwrap(), 0xFF);
        assert_eq!(s.read_i8().unwrap(), -128);
        assert_eq!(s.read_u16().unwrap(), 0x1234);
        assert_eq!(s.read_i16().unwrap(), -2);
        assert_eq!(s.read_char().unwrap(), 0x41);
        assert_eq!(s.read_f32().unwrap(), 1.0);
        assert_eq!(s.offset(), 13);
        assert!(matches!(s.read_u8(), Err(DataError::UnexpectedEof)));
    }

    #[test]
    fn test_short_reads_are_completed() {
        let mut s = DataInputStream::new(Trickle(vec![0, 0, 0, 0, 0, 0, 1, 0], 0));
        assert_eq!(s.read_i64().unwrap(), 256);
    }

    #[test]
    fn test_read_fully_range() {
        let mut s = stream(&[1, 2, 3]);
        let mut buf = [0u8; 5];
        s.read_fully_range(&mut buf, 1, 3).unwrap();
        assert_eq!(buf, [0, 1, 2, 3, 0]);
        assert!(matches!(
            s.read_fully_range(&mut buf, 4, 2),
            Err(DataError::Buffer(BufferError::RangeOutOfBounds { offset: 4, length: 2, len: 5 }))
        ));
        assert!(matches!(
            s.read_fully_range(&mut buf, 1, usize::MAX),
            Err(DataError::Buffer(BufferError::RangeOutOfBounds { .. }))
        ));
        s.read_fully_range(&mut buf, 5, 0).unwrap();
    }

    #[test]
    fn test_skip_bytes_stops_at_end() {
        let mut s = stream(&[1, 2, 3, 4]);
        assert_eq!(s.skip_bytes(2).unwrap(), 2);
        assert_eq!(s.read_u8().unwrap(), 3);
        assert_eq!(s.skip_bytes(10).unwrap(), 1);
        assert_eq!(s.skip_bytes(1).unwrap(), 0);
        assert_eq!(s.offset(), 4);
    }

    #[test]
    fn test_read_line_terminators() {
        let mut s = stream(b"one\ntwo\r\nthree\rfour");
        assert_eq!(s.read_line().unwrap().as_deref(), Some("one"));
        assert_eq!(s.read_line().unwrap().as_deref(), Some("two"));
        assert_eq!(s.read_line().unwrap().as_deref(), Some("three"));
        assert_eq!(s.read_line().unwrap().as_deref(), Some("four"));
        assert_eq!(s.read_line().unwrap(), None);
    }

    #[test]
    fn test_read_line_empty_lines_and_lookahead() {
        let mut s = stream(b"\n\rA\r\xE9");
        assert_eq!(s.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(s.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(s.read_u8().unwrap(), b'A');
        assert_eq!(s.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(s.read_line().unwrap().as_deref(), Some("\u{e9}"));
        assert_eq!(s.offset(), 5);
    }

    #[test]
    fn test_pushback_feeds_skip() {
        let mut s = stream(b"\rxy");
        assert_eq!(s.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(s.skip_bytes(1).unwrap(), 1);
        assert_eq!(s.read_u8().unwrap(), b'y');
    }

    #[test]
    fn test_read_utf() {
        let mut s = stream(&[0, 6, 0x41, 0xDF, 0xBF, 0xE1, 0x88, 0xB4, 0, 0]);
        assert_eq!(s.read_utf().unwrap(), "A\u{7FF}\u{1234}");
        assert_eq!(s.read_utf().unwrap(), "");
    }

    #[test]
    fn test_read_utf_truncated_body() {
        let mut s = stream(&[0, 4, b'a', b'b']);
        assert!(matches!(s.read_utf(), Err(DataError::UnexpectedEof)));
    }

    #[test]
    fn test_io_errors_pass_through() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }
        let mut s = DataInputStream::new(Broken);
        match s.read_i32() {
            Err(DataError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[traced_test]
    #[test]
    fn test_premature_end_is_logged() {
        let mut s = stream(&[1, 2]);
        assert!(s.read_i32().is_err());
        assert!(logs_contain("input ended before read completed"));
    }
}
