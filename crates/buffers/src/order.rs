//! Byte-order-aware primitive codec.
//!
//! Integers are assembled from and split into bytes one shift at a time.
//! Floating-point values go through their IEEE-754 bit pattern and reuse the
//! integer routines; 16-bit chars are plain `u16`s.

/// Order in which the bytes of a multi-byte value are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Most-significant byte first. The default for byte buffers and the
    /// only order used by the data streams.
    #[default]
    BigEndian,
    /// Least-significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the host platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    pub fn decode_u16(self, b: [u8; 2]) -> u16 {
        match self {
            ByteOrder::BigEndian => ((b[0] as u16) << 8) | (b[1] as u16),
            ByteOrder::LittleEndian => ((b[1] as u16) << 8) | (b[0] as u16),
        }
    }

    pub fn encode_u16(self, v: u16) -> [u8; 2] {
        let hi = (v >> 8) as u8;
        let lo = v as u8;
        match self {
            ByteOrder::BigEndian => [hi, lo],
            ByteOrder::LittleEndian => [lo, hi],
        }
    }

    pub fn decode_u32(self, b: [u8; 4]) -> u32 {
        let mut v = 0u32;
        match self {
            ByteOrder::BigEndian => {
                for byte in b {
                    v = (v << 8) | byte as u32;
                }
            }
            ByteOrder::LittleEndian => {
                for byte in b.into_iter().rev() {
                    v = (v << 8) | byte as u32;
                }
            }
        }
        v
    }

    pub fn encode_u32(self, v: u32) -> [u8; 4] {
        let mut b = [0u8; 4];
        for (i, slot) in b.iter_mut().enumerate() {
            let shift = match self {
                ByteOrder::BigEndian => 8 * (3 - i),
                ByteOrder::LittleEndian => 8 * i,
            };
            *slot = (v >> shift) as u8;
        }
        b
    }

    pub fn decode_u64(self, b: [u8; 8]) -> u64 {
        let mut v = 0u64;
        match self {
            ByteOrder::BigEndian => {
                for byte in b {
                    v = (v << 8) | byte as u64;
                }
            }
            ByteOrder::LittleEndian => {
                for byte in b.into_iter().rev() {
                    v = (v << 8) | byte as u64;
                }
            }
        }
        v
    }

    pub fn encode_u64(self, v: u64) -> [u8; 8] {
        let mut b = [0u8; 8];
        for (i, slot) in b.iter_mut().enumerate() {
            let shift = match self {
                ByteOrder::BigEndian => 8 * (7 - i),
                ByteOrder::LittleEndian => 8 * i,
            };
            *slot = (v >> shift) as u8;
        }
        b
    }

    #[inline]
    pub fn decode_i16(self, b: [u8; 2]) -> i16 {
        self.decode_u16(b) as i16
    }

    #[inline]
    pub fn encode_i16(self, v: i16) -> [u8; 2] {
        self.encode_u16(v as u16)
    }

    #[inline]
    pub fn decode_i32(self, b: [u8; 4]) -> i32 {
        self.decode_u32(b) as i32
    }

    #[inline]
    pub fn encode_i32(self, v: i32) -> [u8; 4] {
        self.encode_u32(v as u32)
    }

    #[inline]
    pub fn decode_i64(self, b: [u8; 8]) -> i64 {
        self.decode_u64(b) as i64
    }

    #[inline]
    pub fn encode_i64(self, v: i64) -> [u8; 8] {
        self.encode_u64(v as u64)
    }

    #[inline]
    pub fn decode_f32(self, b: [u8; 4]) -> f32 {
        f32::from_bits(self.decode_u32(b))
    }

    #[inline]
    pub fn encode_f32(self, v: f32) -> [u8; 4] {
        self.encode_u32(v.to_bits())
    }

    #[inline]
    pub fn decode_f64(self, b: [u8; 8]) -> f64 {
        f64::from_bits(self.decode_u64(b))
    }

    #[inline]
    pub fn encode_f64(self, v: f64) -> [u8; 8] {
        self.encode_u64(v.to_bits())
    }
}
