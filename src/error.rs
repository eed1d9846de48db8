/// Errors related to FF1-LS80 encryption.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The key string is not exactly the expected number of hexadecimal
    /// digits for the block cipher's key size.
    #[error("key must be exactly twice the cipher key size in hexadecimal digits")]
    InvalidKeyMaterial,
    /// A hex string has an odd length or contains a non-hex character.
    #[error("invalid hexadecimal string")]
    InvalidHex,
    /// The message length is not a multiple of 8 bits or is below the
    /// 88-bit floor.
    #[error("message length of {0} bits is not valid")]
    InvalidLength(usize),
    /// The message length was never registered with
    /// [`UnbalancedFF1::register_length`](crate::UnbalancedFF1::register_length).
    #[error("message length of {0} bits is not registered")]
    UnregisteredLength(usize),
    /// A byte buffer does not hold exactly `ceil(bits / 8)` bytes.
    #[error("expected a buffer of {expected} bytes, got {actual}")]
    InvalidBufferLength {
        /// Required number of bytes.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },
    /// The block cipher could not produce the requested mask.
    #[error("block cipher failed to produce a round mask")]
    CipherBackend,
}
