//! Unbalanced FF1 format-preserving encryption for fixed-size binary
//! messages, following the FFX mode of operation with the Feistel method
//! "Left" and `split(n) = n - 80`.
//!
//! A message of `n` bits encrypts to a ciphertext of `n` bits. Each round
//! masks the smaller `split(n)`-bit half with bits from AES-CBC over the
//! 80-bit remainder, using the tweak as IV. This suits bit-level telemetry
//! such as the 104 encryptable bits of an ADS-B extended squitter.
//!
//! There is no integrity check: decrypting with the wrong tweak silently
//! yields an unrelated message.
//!
//! Above 208 bits the 128-bit CBC output no longer covers the smaller half,
//! and the mask is extended with further AES blocks. Ciphertexts of those
//! lengths are therefore not interoperable with implementations that leave
//! the bits past the CBC output unmasked.
//!
//! # Example
//!
//! ```rust
//! # use ff1_ls80::{hex_to_bytes, Registration, UnbalancedFF1};
//! #
//! let mut ff1: UnbalancedFF1 = UnbalancedFF1::from_hex("0102030405060708090A0B0C0D0E0F16").unwrap();
//! assert_eq!(ff1.register_length(104), Ok(Registration::Registered));
//!
//! let tweak = [0x57; 16];
//! let mut x = hex_to_bytes("0102030405060708090A0B0C13").unwrap();
//!
//! ff1.encrypt(&tweak, &mut x).unwrap();
//! assert_eq!(x, hex_to_bytes("B9300A30B1146566106FF1506F").unwrap());
//! ff1.decrypt(&tweak, &mut x).unwrap();
//! assert_eq!(x, hex_to_bytes("0102030405060708090A0B0C13").unwrap());
//! ```

#![deny(missing_docs)]

mod bits;
mod error;
mod ff1;
mod hex;
mod params;
mod prf;
mod registry;

pub use crate::{
    bits::FixedBitBuffer,
    error::Error,
    ff1::{Tweak, UnbalancedFF1, TWEAK_LEN},
    hex::{bytes_to_hex, hex_to_bytes},
    params::{is_valid_len, Params, MIN_MESSAGE_BITS, REMAINDER_BITS},
    registry::{LengthRegistry, Registration},
};

use crate::prf::RoundMask;
