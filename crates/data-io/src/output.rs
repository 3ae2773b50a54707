//! Big-endian primitive output.

use std::io::Write;

use binbuf_buffers::ByteOrder;

use crate::mutf8::encode_mutf8;
use crate::DataError;

const ORDER: ByteOrder = ByteOrder::BigEndian;

/// Writes primitives in big-endian order to a byte sink.
///
/// Implementors supply [`write_slice`](DataOutput::write_slice).
pub trait DataOutput {
    /// Writes all of `bytes`.
    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), DataError>;

    /// `true` as 1, `false` as 0.
    fn write_bool(&mut self, v: bool) -> Result<(), DataError> {
        self.write_u8(v as u8)
    }

    fn write_u8(&mut self, v: u8) -> Result<(), DataError> {
        self.write_slice(&[v])
    }

    fn write_i8(&mut self, v: i8) -> Result<(), DataError> {
        self.write_u8(v as u8)
    }

    fn write_i16(&mut self, v: i16) -> Result<(), DataError> {
        self.write_slice(&ORDER.encode_i16(v))
    }

    fn write_u16(&mut self, v: u16) -> Result<(), DataError> {
        self.write_slice(&ORDER.encode_u16(v))
    }

    /// A UTF-16 code unit.
    fn write_char(&mut self, v: u16) -> Result<(), DataError> {
        self.write_u16(v)
    }

    fn write_i32(&mut self, v: i32) -> Result<(), DataError> {
        self.write_slice(&ORDER.encode_i32(v))
    }

    fn write_i64(&mut self, v: i64) -> Result<(), DataError> {
        self.write_slice(&ORDER.encode_i64(v))
    }

    fn write_f32(&mut self, v: f32) -> Result<(), DataError> {
        self.write_slice(&ORDER.encode_f32(v))
    }

    fn write_f64(&mut self, v: f64) -> Result<(), DataError> {
        self.write_slice(&ORDER.encode_f64(v))
    }

    /// Writes the low byte of each UTF-16 code unit of `s`.
    fn write_bytes(&mut self, s: &str) -> Result<(), DataError> {
        let bytes: Vec<u8> = s.encode_utf16().map(|u| u as u8).collect();
        self.write_slice(&bytes)
    }

    /// Writes each UTF-16 code unit of `s` as two bytes.
    fn write_chars(&mut self, s: &str) -> Result<(), DataError> {
        let mut bytes = Vec::with_capacity(s.len() * 2);
        for u in s.encode_utf16() {
            bytes.extend_from_slice(&ORDER.encode_u16(u));
        }
        self.write_slice(&bytes)
    }

    /// Writes a `u16` byte count followed by `s` in modified UTF-8.
    ///
    /// Nothing is written if the encoding exceeds 65535 bytes.
    fn write_utf(&mut self, s: &str) -> Result<(), DataError> {
        let body = encode_mutf8(s)?;
        self.write_u16(body.len() as u16)?;
        self.write_slice(&body)
    }
}

/// [`DataOutput`] over any [`Write`], counting the bytes written.
pub struct DataOutputStream<W> {
    inner: W,
    written: usize,
}

impl<W: Write> DataOutputStream<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Bytes successfully written so far, saturating at `usize::MAX`.
    pub fn size(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<(), DataError> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DataOutput for DataOutputStream<W> {
    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), DataError> {
        self.inner.write_all(bytes)?;
        self.written = self.written.saturating_add(bytes.len());
        Ok(())
    }
}
