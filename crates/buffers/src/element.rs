//! Element types a [`Buffer`](crate::Buffer) can hold.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;

use crate::ByteOrder;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A fixed-width primitive stored in a buffer.
///
/// `u16` plays the role of a 16-bit char code unit, `i16` the signed 16-bit
/// integer. Equality, ordering and hashing treat every NaN as equal to every
/// other NaN so that buffer equality stays reflexive.
pub trait Element: Copy + Default + fmt::Debug + sealed::Sealed + 'static {
    /// `log2` of the encoded width in bytes.
    const SHIFT: u32;
    /// Encoded width in bytes.
    const WIDTH: usize = 1 << Self::SHIFT;
    /// Order reported by array-backed buffers of this element.
    const ARRAY_ORDER: ByteOrder = ByteOrder::native();
    /// Name used in `Debug` output.
    const BUFFER_NAME: &'static str;

    /// Decodes a value from exactly [`WIDTH`](Self::WIDTH) bytes.
    fn decode(bytes: &[Cell<u8>], order: ByteOrder) -> Self;

    /// Encodes `self` into exactly [`WIDTH`](Self::WIDTH) bytes.
    fn encode(self, bytes: &[Cell<u8>], order: ByteOrder);

    fn same(a: Self, b: Self) -> bool;

    fn compare(a: Self, b: Self) -> Ordering;

    /// Word folded into a buffer hash. Equal elements yield equal words.
    fn hash_word(self) -> u64;
}

fn gather<const N: usize>(bytes: &[Cell<u8>]) -> [u8; N] {
    let mut out = [0u8; N];
    for (slot, cell) in out.iter_mut().zip(bytes) {
        *slot = cell.get();
    }
    out
}

fn scatter(src: &[u8], bytes: &[Cell<u8>]) {
    for (byte, cell) in src.iter().zip(bytes) {
        cell.set(*byte);
    }
}

impl Element for u8 {
    const SHIFT: u32 = 0;
    const ARRAY_ORDER: ByteOrder = ByteOrder::BigEndian;
    const BUFFER_NAME: &'static str = "ByteBuffer";

    #[inline]
    fn decode(bytes: &[Cell<u8>], _order: ByteOrder) -> Self {
        bytes.first().map_or(0, Cell::get)
    }

    #[inline]
    fn encode(self, bytes: &[Cell<u8>], _order: ByteOrder) {
        if let Some(cell) = bytes.first() {
            cell.set(self);
        }
    }

    fn same(a: Self, b: Self) -> bool {
        a == b
    }

    fn compare(a: Self, b: Self) -> Ordering {
        a.cmp(&b)
    }

    fn hash_word(self) -> u64 {
        self as u64
    }
}

macro_rules! int_element {
    ($ty:ty, $name:expr, $shift:expr, $decode:ident, $encode:ident) => {
        impl Element for $ty {
            const SHIFT: u32 = $shift;
            const BUFFER_NAME: &'static str = $name;

            #[inline]
            fn decode(bytes: &[Cell<u8>], order: ByteOrder) -> Self {
                order.$decode(gather(bytes))
            }

            #[inline]
            fn encode(self, bytes: &[Cell<u8>], order: ByteOrder) {
                scatter(&order.$encode(self), bytes);
            }

            fn same(a: Self, b: Self) -> bool {
                a == b
            }

            fn compare(a: Self, b: Self) -> Ordering {
                a.cmp(&b)
            }

            fn hash_word(self) -> u64 {
                self as u64
            }
        }
    };
}

int_element!(u16, "CharBuffer", 1, decode_u16, encode_u16);
int_element!(i16, "Int16Buffer", 1, decode_i16, encode_i16);
int_element!(i32, "Int32Buffer", 2, decode_i32, encode_i32);
int_element!(i64, "Int64Buffer", 3, decode_i64, encode_i64);

// `0.0 == -0.0` and NaN matches NaN; the hash collapses both the same way.
macro_rules! float_element {
    ($ty:ty, $name:expr, $shift:expr, $decode:ident, $encode:ident, $canonical_nan:expr) => {
        impl Element for $ty {
            const SHIFT: u32 = $shift;
            const BUFFER_NAME: &'static str = $name;

            #[inline]
            fn decode(bytes: &[Cell<u8>], order: ByteOrder) -> Self {
                order.$decode(gather(bytes))
            }

            #[inline]
            fn encode(self, bytes: &[Cell<u8>], order: ByteOrder) {
                scatter(&order.$encode(self), bytes);
            }

            fn same(a: Self, b: Self) -> bool {
                a == b || (a.is_nan() && b.is_nan())
            }

            fn compare(a: Self, b: Self) -> Ordering {
                if Self::same(a, b) {
                    Ordering::Equal
                } else if a.is_nan() {
                    Ordering::Greater
                } else if b.is_nan() {
                    Ordering::Less
                } else {
                    a.total_cmp(&b)
                }
            }

            fn hash_word(self) -> u64 {
                if self.is_nan() {
                    $canonical_nan
                } else if self == 0.0 {
                    0
                } else {
                    self.to_bits() as u64
                }
            }
        }
    };
}

float_element!(f32, "Float32Buffer", 2, decode_f32, encode_f32, 0x7FC0_0000);
float_element!(f64, "Float64Buffer", 3, decode_f64, encode_f64, 0x7FF8_0000_0000_0000);

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(bytes: &[u8]) -> Vec<Cell<u8>> {
        bytes.iter().copied().map(Cell::new).collect()
    }

    #[test]
    fn test_widths() {
        assert_eq!(<u8 as Element>::WIDTH, 1);
        assert_eq!(<u16 as Element>::WIDTH, 2);
        assert_eq!(<i16 as Element>::WIDTH, 2);
        assert_eq!(<i32 as Element>::WIDTH, 4);
        assert_eq!(<f32 as Element>::WIDTH, 4);
        assert_eq!(<i64 as Element>::WIDTH, 8);
        assert_eq!(<f64 as Element>::WIDTH, 8);
    }

    #[test]
    fn test_decode_encode_cells() {
        let bytes = cells(&[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(i32::decode(&bytes, ByteOrder::BigEndian), 0x1234_5678);
        assert_eq!(i32::decode(&bytes, ByteOrder::LittleEndian), 0x7856_3412);
        0x0A0Bi16.encode(&bytes[1..3], ByteOrder::LittleEndian);
        let raw: Vec<u8> = bytes.iter().map(Cell::get).collect();
        assert_eq!(raw, vec![0x12, 0x0B, 0x0A, 0x78]);
    }

    #[test]
    fn test_float_nan_is_same() {
        let a = f64::NAN;
        let b = f64::from_bits(0x7FF8_0000_0000_0001);
        assert!(f64::same(a, b));
        assert_eq!(f64::compare(a, b), Ordering::Equal);
        assert_eq!(a.hash_word(), b.hash_word());
    }

    #[test]
    fn test_float_signed_zero() {
        assert!(f32::same(0.0, -0.0));
        assert_eq!(f32::compare(-0.0, 0.0), Ordering::Equal);
        assert_eq!(0.0f32.hash_word(), (-0.0f32).hash_word());
    }

    #[test]
    fn test_float_nan_sorts_last() {
        assert_eq!(f32::compare(f32::NAN, f32::INFINITY), Ordering::Greater);
        assert_eq!(f32::compare(f32::NEG_INFINITY, f32::NAN), Ordering::Less);
        assert_eq!(f32::compare(-1.0, 2.0), Ordering::Less);
    }
}
