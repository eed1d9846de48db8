use cipher::{
    generic_array::{typenum::Unsigned, GenericArray},
    BlockEncrypt,
};

use crate::{
    bits::{byte_len, xor_slice},
    Error, FixedBitBuffer,
};

/// The Feistel round function: a block cipher used as a pseudorandom mask
/// generator.
///
/// The half is PKCS#7-padded and CBC-encrypted with the tweak as IV. When
/// more bits are needed than CBC produced, the last CBC block `R` is
/// expanded as `R || CIPH(R ^ [1]) || CIPH(R ^ [2]) || ...`, with the
/// counter XORed into the final four bytes.
///
/// Only the forward direction of the cipher is used, whether the engine is
/// encrypting or decrypting.
pub struct RoundMask<'a, C: BlockEncrypt> {
    cipher: &'a C,
}

impl<'a, C: BlockEncrypt> RoundMask<'a, C> {
    pub fn new(cipher: &'a C) -> Self {
        Self { cipher }
    }

    /// Returns the leading `len` bits of the mask derived from `half`.
    pub fn mask(
        &self,
        tweak: &GenericArray<u8, C::BlockSize>,
        half: &FixedBitBuffer,
        len: usize,
    ) -> Result<FixedBitBuffer, Error> {
        let needed = byte_len(len);
        let input = pad(half.as_bytes(), C::BlockSize::to_usize())?;

        let mut out = Vec::with_capacity(input.len().max(needed));
        let mut state = tweak.clone();
        for block in input.chunks_exact(C::BlockSize::to_usize()) {
            xor_slice(&mut state, block);
            self.cipher.encrypt_block(&mut state);
            out.extend_from_slice(&state);
        }

        let mut i = 1_u32;
        while out.len() < needed {
            out.extend_from_slice(&self.expand(&state, i));
            // Only reachable with a mask of 2^32 blocks or more.
            i = i.checked_add(1).ok_or(Error::CipherBackend)?;
        }

        out.truncate(needed);
        FixedBitBuffer::from_bytes(&out, len)
    }

    fn expand(
        &self,
        r: &GenericArray<u8, C::BlockSize>,
        i: u32,
    ) -> GenericArray<u8, C::BlockSize> {
        let mut block = r.clone();
        xor_slice(&mut block[C::BlockSize::to_usize() - 4..], &i.to_be_bytes());
        self.cipher.encrypt_block(&mut block);
        block
    }
}

/// PKCS#7: always appends between 1 and `block_size` bytes, each holding the
/// pad length.
fn pad(buf: &[u8], block_size: usize) -> Result<Vec<u8>, Error> {
    let n = block_size - buf.len() % block_size;
    let value = u8::try_from(n).map_err(|_| Error::CipherBackend)?;

    let mut padded = Vec::with_capacity(buf.len() + n);
    padded.extend_from_slice(buf);
    padded.resize(buf.len() + n, value);
    Ok(padded)
}
