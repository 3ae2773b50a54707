//! Modified UTF-8.
//!
//! Each UTF-16 code unit is encoded on its own: below `0x80` as one byte,
//! below `0x800` as two, otherwise as three. Surrogate pairs therefore take
//! six bytes. The wire form is prefixed by the encoded byte count as a
//! big-endian `u16`, which the stream types write and read.

use crate::{DataError, MAX_UTF_LEN};

/// Number of bytes `units` occupy once encoded.
pub fn mutf8_len(units: impl IntoIterator<Item = u16>) -> usize {
    units
        .into_iter()
        .map(|u| match u {
            0..=0x7F => 1,
            0x80..=0x7FF => 2,
            _ => 3,
        })
        .sum()
}

/// Encodes the UTF-16 code units of `s`, without the length prefix.
///
/// # Example
///
/// ```
/// use binbuf_data_io::encode_mutf8;
///
/// let bytes = encode_mutf8("A\u{7FF}\u{1234}")?;
/// assert_eq!(bytes, vec![0x41, 0xDF, 0xBF, 0xE1, 0x88, 0xB4]);
/// # Ok::<(), binbuf_data_io::DataError>(())
/// ```
pub fn encode_mutf8(s: &str) -> Result<Vec<u8>, DataError> {
    let units: Vec<u16> = s.encode_utf16().collect();
    encode_mutf8_units(&units)
}

/// Encodes raw UTF-16 code units, lone surrogates included.
///
/// Fails with `StringTooLong` if the result would not fit a `u16` prefix.
pub fn encode_mutf8_units(units: &[u16]) -> Result<Vec<u8>, DataError> {
    let len = mutf8_len(units.iter().copied());
    if len > MAX_UTF_LEN {
        return Err(DataError::StringTooLong(len));
    }
    let mut out = Vec::with_capacity(len);
    for &v in units {
        match v {
            0..=0x7F => out.push(v as u8),
            0x80..=0x7FF => {
                out.push(0xC0 | (v >> 6) as u8);
                out.push(0x80 | (v & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (v >> 12) as u8);
                out.push(0x80 | ((v >> 6) & 0x3F) as u8);
                out.push(0x80 | (v & 0x3F) as u8);
            }
        }
    }
    Ok(out)
}

/// Decodes `bytes` into UTF-16 code units.
///
/// Every continuation byte must carry the `10xxxxxx` marker, and a
/// multi-byte sequence must not run past the end of `bytes`.
pub fn decode_mutf8_units(bytes: &[u8]) -> Result<Vec<u16>, DataError> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let a = bytes[i] as u16;
        let (unit, width) = if a < 0x80 {
            (a, 1)
        } else if a & 0xE0 == 0xC0 {
            let b = continuation(bytes, i, 1)?;
            (((a & 0x1F) << 6) | b, 2)
        } else if a & 0xF0 == 0xE0 {
            let b = continuation(bytes, i, 1)?;
            let c = continuation(bytes, i, 2)?;
            (((a & 0x0F) << 12) | (b << 6) | c, 3)
        } else {
            return Err(malformed(i));
        };
        out.push(unit);
        i += width;
    }
    Ok(out)
}

/// Decodes `bytes` into a string.
///
/// # Example
///
/// ```
/// use binbuf_data_io::decode_mutf8;
///
/// let s = decode_mutf8(&[0x41, 0xDF, 0xBF, 0xE1, 0x88, 0xB4])?;
/// assert_eq!(s, "A\u{7FF}\u{1234}");
/// # Ok::<(), binbuf_data_io::DataError>(())
/// ```
pub fn decode_mutf8(bytes: &[u8]) -> Result<String, DataError> {
    let units = decode_mutf8_units(bytes)?;
    String::from_utf16(&units).map_err(|_| DataError::UnpairedSurrogate)
}

/// The low six bits of the continuation byte at `start + k`.
fn continuation(bytes: &[u8], start: usize, k: usize) -> Result<u16, DataError> {
    match bytes.get(start + k) {
        Some(&b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
        Some(_) => Err(malformed(start + k)),
        None => Err(malformed(start)),
    }
}

fn malformed(offset: usize) -> DataError {
    tracing::debug!(offset, "malformed modified UTF-8 input");
    DataError::MalformedInput { offset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_len() {
        assert_eq!(mutf8_len("".encode_utf16()), 0);
        assert_eq!(mutf8_len("abc".encode_utf16()), 3);
        assert_eq!(mutf8_len([0x80u16, 0x7FF]), 4);
        assert_eq!(mutf8_len("\u{1F600}".encode_utf16()), 6);
    }

    #[test]
    fn test_encode_boundaries() {
        assert_eq!(encode_mutf8_units(&[0x7F]).unwrap(), vec![0x7F]);
        assert_eq!(encode_mutf8_units(&[0x80]).unwrap(), vec![0xC2, 0x80]);
        assert_eq!(encode_mutf8_units(&[0x800]).unwrap(), vec![0xE0, 0xA0, 0x80]);
        assert_eq!(encode_mutf8_units(&[0xFFFF]).unwrap(), vec![0xEF, 0xBF, 0xBF]);
        assert_eq!(encode_mutf8_units(&[0]).unwrap(), vec![0]);
    }

    #[test]
    fn test_encode_surrogate_pair_separately() {
        assert_eq!(
            encode_mutf8("\u{1F600}").unwrap(),
            vec![0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]
        );
        assert_eq!(decode_mutf8(&[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]).unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_encode_too_long() {
        let units = vec![0x800u16; MAX_UTF_LEN / 3 + 1];
        assert!(matches!(
            encode_mutf8_units(&units),
            Err(DataError::StringTooLong(65538))
        ));
        let units = vec![b'a' as u16; MAX_UTF_LEN];
        assert_eq!(encode_mutf8_units(&units).unwrap().len(), MAX_UTF_LEN);
    }

    #[test]
    fn test_decode_two_byte_null() {
        assert_eq!(decode_mutf8_units(&[0xC0, 0x80]).unwrap(), vec![0]);
        assert_eq!(decode_mutf8(&[0x61, 0xC0, 0x80, 0x62]).unwrap(), "a\0b");
    }

    #[test]
    fn test_decode_bad_continuation() {
        assert!(matches!(
            decode_mutf8(&[0x41, 0xC3, 0x41]),
            Err(DataError::MalformedInput { offset: 2 })
        ));
        assert!(matches!(
            decode_mutf8(&[0xE1, 0x88, 0xF4]),
            Err(DataError::MalformedInput { offset: 2 })
        ));
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            decode_mutf8(&[0x41, 0xE1, 0x88]),
            Err(DataError::MalformedInput { offset: 1 })
        ));
        assert!(matches!(
            decode_mutf8(&[0xDF]),
            Err(DataError::MalformedInput { offset: 0 })
        ));
    }

    #[test]
    fn test_decode_bad_lead() {
        assert!(matches!(
            decode_mutf8(&[0x80]),
            Err(DataError::MalformedInput { offset: 0 })
        ));
        assert!(matches!(
            decode_mutf8(&[0x41, 0xF0, 0x90, 0x80, 0x80]),
            Err(DataError::MalformedInput { offset: 1 })
        ));
    }

    #[test]
    fn test_decode_lone_surrogate() {
        let bytes = encode_mutf8_units(&[0xD800]).unwrap();
        assert_eq!(decode_mutf8_units(&bytes).unwrap(), vec![0xD800]);
        assert!(matches!(
            decode_mutf8(&bytes),
            Err(DataError::UnpairedSurrogate)
        ));
    }

    #[traced_test]
    #[test]
    fn test_malformed_input_is_logged() {
        let _ = decode_mutf8(&[0x41, 0xC3]);
        assert!(logs_contain("malformed modified UTF-8 input"));
    }
}
