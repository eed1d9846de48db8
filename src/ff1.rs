use core::fmt;

use aes::Aes128;
use cipher::{
    generic_array::{
        typenum::{Unsigned, U16},
        GenericArray,
    },
    BlockEncrypt, KeyInit,
};
use zeroize::Zeroize;

use crate::{
    hex::hex_to_bytes, Error, FixedBitBuffer, LengthRegistry, Params, Registration, RoundMask,
};

/// Length of a tweak in bytes: one block of the underlying cipher.
pub const TWEAK_LEN: usize = 16;

/// Per-message public context mixed into every round.
pub type Tweak = [u8; TWEAK_LEN];

/// An unbalanced FF1 engine for binary messages, using the Feistel method
/// "Left" with `split(n) = n - 80`.
///
/// The block cipher must have a 16 byte block size and defaults to AES-128.
/// Every message length must be registered with
/// [`register_length`](Self::register_length) before use.
#[derive(Clone)]
pub struct UnbalancedFF1<C = Aes128> {
    cipher: C,
    lengths: LengthRegistry,
}

impl<C> UnbalancedFF1<C>
where
    C: BlockEncrypt<BlockSize = U16> + KeyInit,
{
    /// Creates an engine from a key given as hexadecimal digits, two per key
    /// byte (32 digits for AES-128).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyMaterial`] if the string is not exactly the
    /// right number of hex digits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ff1_ls80::{Error, UnbalancedFF1};
    /// assert!(UnbalancedFF1::<aes::Aes128>::from_hex("0102030405060708090A0B0C0D0E0F16").is_ok());
    ///
    /// assert_eq!(
    ///     UnbalancedFF1::<aes::Aes128>::from_hex("0102030405060708090A0B0C0D0E0F").err(),
    ///     Some(Error::InvalidKeyMaterial)
    /// );
    /// ```
    pub fn from_hex(key_hex: &str) -> Result<Self, Error> {
        if key_hex.len() != 2 * C::KeySize::to_usize() {
            return Err(Error::InvalidKeyMaterial);
        }

        let mut key = hex_to_bytes(key_hex).map_err(|_| Error::InvalidKeyMaterial)?;
        let cipher = C::new_from_slice(&key);
        key.zeroize();

        cipher.map(Self::new).map_err(|_| Error::InvalidKeyMaterial)
    }
}

impl<C> UnbalancedFF1<C>
where
    C: BlockEncrypt<BlockSize = U16>,
{
    /// Creates an engine for an already keyed block cipher, with no message
    /// lengths registered.
    pub fn new(cipher: C) -> Self {
        Self {
            cipher,
            lengths: LengthRegistry::new(),
        }
    }

    /// Prepares the engine to process messages of `len` bits.
    ///
    /// Registering a length twice is harmless and reported as
    /// [`Registration::AlreadyRegistered`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless `len` is a multiple of 8 and at
    /// least 88.
    pub fn register_length(&mut self, len: usize) -> Result<Registration, Error> {
        self.lengths.register(len)
    }

    /// Registered message lengths, in registration order.
    pub fn registered_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.lengths.lengths()
    }

    /// Parameters used for messages of `len` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredLength`] if `len` was never registered.
    pub fn params(&self, len: usize) -> Result<Params, Error> {
        self.lengths.ensure_registered(len).copied()
    }

    /// Encrypts `x` in place. The message length is `8 * x.len()` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredLength`] if that length was never
    /// registered. `x` is left untouched on error.
    pub fn encrypt(&self, tweak: &Tweak, x: &mut [u8]) -> Result<(), Error> {
        let input = FixedBitBuffer::from_bytes(x, x.len() * 8)?;
        let output = self.encrypt_bits(tweak, &input)?;
        x.copy_from_slice(output.as_bytes());
        Ok(())
    }

    /// Decrypts `x` in place. The message length is `8 * x.len()` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredLength`] if that length was never
    /// registered. `x` is left untouched on error.
    pub fn decrypt(&self, tweak: &Tweak, x: &mut [u8]) -> Result<(), Error> {
        let input = FixedBitBuffer::from_bytes(x, x.len() * 8)?;
        let output = self.decrypt_bits(tweak, &input)?;
        x.copy_from_slice(output.as_bytes());
        Ok(())
    }

    /// Encrypts a bit buffer, returning a ciphertext of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredLength`] if `x.len()` was never
    /// registered.
    pub fn encrypt_bits(
        &self,
        tweak: &Tweak,
        x: &FixedBitBuffer,
    ) -> Result<FixedBitBuffer, Error> {
        let params = self.lengths.ensure_registered(x.len())?;
        let tweak = GenericArray::from_slice(tweak);
        let prf = RoundMask::new(&self.cipher);

        tracing::trace!(len = params.len, rounds = params.rounds, "encrypting");

        let mut x = x.clone();
        for _ in 0..params.rounds {
            // A is the smaller half and is the one masked; B carries over
            // unchanged and becomes the front of the next round's input.
            let mut a = x.slice(0, params.split);
            let b = x.slice(params.split, params.len);

            a.xor_assign(&prf.mask(tweak, &b, params.split)?);
            x = b.concat(&a);
        }

        Ok(x)
    }

    /// Decrypts a bit buffer, returning a plaintext of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredLength`] if `x.len()` was never
    /// registered.
    pub fn decrypt_bits(
        &self,
        tweak: &Tweak,
        x: &FixedBitBuffer,
    ) -> Result<FixedBitBuffer, Error> {
        let params = self.lengths.ensure_registered(x.len())?;
        let tweak = GenericArray::from_slice(tweak);
        let prf = RoundMask::new(&self.cipher);

        tracing::trace!(len = params.len, rounds = params.rounds, "decrypting");

        let mut x = x.clone();
        // The round index never enters the round function, so undoing a round
        // only needs the B half that encryption moved to the front.
        for _ in (0..params.rounds).rev() {
            let b = x.slice(0, params.remainder);
            let mut c = x.slice(params.remainder, params.len);

            c.xor_assign(&prf.mask(tweak, &b, params.split)?);
            x = c.concat(&b);
        }

        Ok(x)
    }
}

impl<C> fmt::Debug for UnbalancedFF1<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnbalancedFF1")
            .field("cipher", &"[REDACTED]")
            .field("lengths", &self.lengths.lengths().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Tweak, UnbalancedFF1};
    use crate::{Error, FixedBitBuffer, Registration};

    use lazy_static::lazy_static;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    const KEY: &str = "0102030405060708090A0B0C0D0E0F16";

    lazy_static! {
        static ref FF1: UnbalancedFF1 = {
            let mut ff1: UnbalancedFF1 = UnbalancedFF1::from_hex(KEY).unwrap();
            for len in (88..=1024).step_by(8) {
                ff1.register_length(len).unwrap();
            }
            ff1
        };
    }

    fn tweak_from(seed: &[u8]) -> Tweak {
        let mut tweak = [0; 16];
        for (t, s) in tweak.iter_mut().zip(seed.iter()) {
            *t = *s;
        }
        tweak
    }

    macro_rules! a_then_b {
        ($tweak:ident, $x:ident, $a:ident, $b:ident) => {{
            if $x.len() < 11 {
                return TestResult::discard();
            }
            let tweak = tweak_from(&$tweak);

            let mut output = $x.clone();
            FF1.$a(&tweak, &mut output).unwrap();
            if output.len() != $x.len() {
                return TestResult::failed();
            }
            FF1.$b(&tweak, &mut output).unwrap();

            TestResult::from_bool(output == $x)
        }};
    }

    /// Test that an [`UnbalancedFF1`] instance can encrypt and decrypt a
    /// plaintext.
    #[quickcheck]
    fn encrypt_then_decrypt(tweak: Vec<u8>, x: Vec<u8>) -> TestResult {
        a_then_b!(tweak, x, encrypt, decrypt)
    }

    /// Test that an [`UnbalancedFF1`] instance can decrypt and encrypt a
    /// ciphertext.
    #[quickcheck]
    fn decrypt_then_encrypt(tweak: Vec<u8>, x: Vec<u8>) -> TestResult {
        a_then_b!(tweak, x, decrypt, encrypt)
    }

    /// Test that encrypting one plaintext does not affect the next.
    #[quickcheck]
    fn encrypt_reuse_multiple_plaintexts(tweak: Vec<u8>, x1: Vec<u8>, x2: Vec<u8>) -> TestResult {
        if x1.len() < 11 || x1.len() != x2.len() || x1 == x2 {
            return TestResult::discard();
        }
        let tweak = tweak_from(&tweak);

        let encrypt = |x: &[u8]| {
            let mut output = x.to_vec();
            FF1.encrypt(&tweak, &mut output).unwrap();
            output
        };

        let expected_1 = encrypt(&x1);
        let expected_2 = encrypt(&x2);

        if expected_1 == expected_2 {
            return TestResult::failed();
        }

        TestResult::from_bool(
            (0..10).all(|_| encrypt(&x1) == expected_1 && encrypt(&x2) == expected_2),
        )
    }

    /// The ciphertext differs from the plaintext in at least one bit.
    #[quickcheck]
    fn encrypt_changes_message(tweak: Vec<u8>, x: Vec<u8>) -> TestResult {
        if x.len() < 11 {
            return TestResult::discard();
        }
        let mut output = x.clone();
        FF1.encrypt(&tweak_from(&tweak), &mut output).unwrap();
        TestResult::from_bool(output != x)
    }

    #[test]
    fn unregistered_length_leaves_buffer_untouched() {
        let mut ff1: UnbalancedFF1 = UnbalancedFF1::from_hex(KEY).unwrap();
        let tweak = [0x57; 16];
        let x = [0xA5; 13];

        let mut output = x;
        assert_eq!(
            ff1.encrypt(&tweak, &mut output),
            Err(Error::UnregisteredLength(104))
        );
        assert_eq!(
            ff1.decrypt(&tweak, &mut output),
            Err(Error::UnregisteredLength(104))
        );
        assert_eq!(output, x);

        assert_eq!(ff1.register_length(104), Ok(Registration::Registered));
        assert!(ff1.encrypt(&tweak, &mut output).is_ok());
        assert_ne!(output, x);
    }

    #[test]
    fn non_byte_aligned_bits_are_rejected() {
        let x = FixedBitBuffer::zeroed(100);
        assert_eq!(
            FF1.encrypt_bits(&[0; 16], &x),
            Err(Error::UnregisteredLength(100))
        );
        assert_eq!(
            FF1.decrypt_bits(&[0; 16], &x),
            Err(Error::UnregisteredLength(100))
        );
    }

    #[test]
    fn bits_and_bytes_agree() {
        let tweak = [0x11; 16];
        let mut x = *b"fixed-size payload";
        let bits = FixedBitBuffer::from_bytes(&x, x.len() * 8).unwrap();

        let ct = FF1.encrypt_bits(&tweak, &bits).unwrap();
        FF1.encrypt(&tweak, &mut x).unwrap();

        assert_eq!(ct.as_bytes(), &x[..]);
        assert_eq!(FF1.decrypt_bits(&tweak, &ct).unwrap(), bits);
    }

    #[test]
    fn rejects_bad_keys() {
        for key in [
            "",
            "0102030405060708090A0B0C0D0E0F",
            "0102030405060708090A0B0C0D0E0F1617",
            "0102030405060708090A0B0C0D0E0FZZ",
            "0102030405060708090A0B0C0D0E0F 6",
        ] {
            assert_eq!(
                UnbalancedFF1::<aes::Aes128>::from_hex(key).err(),
                Some(Error::InvalidKeyMaterial),
                "{:?}",
                key
            );
        }
    }

    #[test]
    fn lowercase_key_is_same_key() {
        let mut upper: UnbalancedFF1 = UnbalancedFF1::from_hex(KEY).unwrap();
        let mut lower: UnbalancedFF1 = UnbalancedFF1::from_hex(&KEY.to_lowercase()).unwrap();
        upper.register_length(88).unwrap();
        lower.register_length(88).unwrap();

        let (mut a, mut b) = ([7; 11], [7; 11]);
        upper.encrypt(&[1; 16], &mut a).unwrap();
        lower.encrypt(&[1; 16], &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn params_lookup() {
        let params = FF1.params(104).unwrap();
        assert_eq!((params.split, params.remainder, params.rounds), (24, 80, 18));
        assert_eq!(
            UnbalancedFF1::<aes::Aes128>::from_hex(KEY).unwrap().params(104),
            Err(Error::UnregisteredLength(104))
        );
    }

    #[test]
    fn debug_redacts_key() {
        let mut ff1: UnbalancedFF1 = UnbalancedFF1::from_hex(KEY).unwrap();
        ff1.register_length(104).unwrap();
        let s = format!("{:?}", ff1);
        assert_eq!(s, r#"UnbalancedFF1 { cipher: "[REDACTED]", lengths: [104] }"#);
    }
}
