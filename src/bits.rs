use core::fmt;

use crate::{hex::bytes_to_hex, Error};

/// A sequence of exactly `len` bits, packed most-significant-bit first.
///
/// Unlike a growable bit set, the byte representation always has
/// `ceil(len / 8)` bytes no matter how many leading bits are zero. The
/// unused low-order bits of the last byte are kept at zero, so two buffers
/// holding the same bits always compare equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FixedBitBuffer {
    buf: Vec<u8>,
    len: usize,
}

/// Number of bytes needed to hold `bits` bits.
pub(crate) const fn byte_len(bits: usize) -> usize {
    (bits + 7) / 8
}

impl FixedBitBuffer {
    /// Creates a buffer of `len` zero bits.
    pub fn zeroed(len: usize) -> Self {
        Self {
            buf: vec![0; byte_len(len)],
            len,
        }
    }

    /// Loads `len` bits from `bytes`, which must hold exactly
    /// `ceil(len / 8)` bytes. Padding bits past `len` are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBufferLength`] if `bytes` has the wrong length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ff1_ls80::FixedBitBuffer;
    /// let bits = FixedBitBuffer::from_bytes(&[0x00, 0x00, 0xFF], 20).unwrap();
    /// assert_eq!(bits.len(), 20);
    /// assert_eq!(bits.as_bytes(), &[0x00, 0x00, 0xF0]);
    /// ```
    pub fn from_bytes(bytes: &[u8], len: usize) -> Result<Self, Error> {
        let expected = byte_len(len);
        if bytes.len() != expected {
            return Err(Error::InvalidBufferLength {
                expected,
                actual: bytes.len(),
            });
        }

        let mut bits = Self {
            buf: bytes.to_vec(),
            len,
        };
        bits.clear_padding();
        Ok(bits)
    }

    /// Number of bits in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns bit `i`, counting from the most significant bit of the first
    /// byte.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn bit(&self, i: usize) -> bool {
        assert!(i < self.len, "bit index {} out of range for length {}", i, self.len);
        (self.buf[i / 8] >> (7 - i % 8)) & 1 == 1
    }

    /// The packed bytes, exactly `ceil(len / 8)` of them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Copies the packed bytes out of the buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Consumes the buffer, returning the packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Copies bits `lo..hi` into a new buffer of `hi - lo` bits.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi` or `hi > self.len()`.
    pub fn slice(&self, lo: usize, hi: usize) -> Self {
        assert!(
            lo <= hi && hi <= self.len,
            "bit range {}..{} out of bounds for length {}",
            lo,
            hi,
            self.len
        );

        let mut out = Self::zeroed(hi - lo);
        let src = &self.buf[lo / 8..];
        let shift = lo % 8;

        if shift == 0 {
            let n = out.buf.len();
            out.buf.copy_from_slice(&src[..n]);
        } else {
            // Each output byte straddles two source bytes.
            for (i, dst) in out.buf.iter_mut().enumerate() {
                let next = src.get(i + 1).map_or(0, |&b| b >> (8 - shift));
                *dst = (src[i] << shift) | next;
            }
        }

        out.clear_padding();
        out
    }

    /// Returns `self || other`.
    pub fn concat(&self, other: &Self) -> Self {
        let mut out = Self::zeroed(self.len + other.len);
        out.buf[..self.buf.len()].copy_from_slice(&self.buf);

        let shift = self.len % 8;
        if shift == 0 {
            out.buf[self.buf.len()..].copy_from_slice(&other.buf);
        } else {
            // The last byte of self is partially filled, so other is shifted
            // right to start in its unused low bits. Both inputs keep their
            // padding at zero, so OR-ing is enough.
            let start = self.len / 8;
            for (i, &b) in other.buf.iter().enumerate() {
                out.buf[start + i] |= b >> shift;
                if let Some(next) = out.buf.get_mut(start + i + 1) {
                    *next |= b << (8 - shift);
                }
            }
        }

        out
    }

    /// XORs `other` into this buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffers have different lengths.
    pub fn xor_assign(&mut self, other: &Self) {
        assert_eq!(
            self.len, other.len,
            "bit buffers have different lengths"
        );
        xor_slice(&mut self.buf, &other.buf);
    }

    /// Returns `self ^ other`.
    ///
    /// # Panics
    ///
    /// Panics if the buffers have different lengths.
    pub fn xor(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.xor_assign(other);
        out
    }

    fn clear_padding(&mut self) {
        let used = self.len % 8;
        if used != 0 {
            if let Some(last) = self.buf.last_mut() {
                *last &= 0xFF << (8 - used);
            }
        }
    }
}

impl fmt::Debug for FixedBitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedBitBuffer")
            .field("len", &self.len)
            .field("bits", &bytes_to_hex(&self.buf))
            .finish()
    }
}

pub(crate) fn xor_slice(dst: &mut [u8], src: &[u8]) {
    assert_eq!(
        dst.len(),
        src.len(),
        "destination and source slices have different lengths"
    );
    for (lhs, &rhs) in dst.iter_mut().zip(src.iter()) {
        *lhs ^= rhs;
    }
}
