use crate::Error;

/// Length in bits of the larger Feistel half. `split(n) = n - 80` keeps
/// both halves byte-aligned for every valid `n`.
pub const REMAINDER_BITS: usize = 80;

/// Smallest valid message length in bits, giving a one-byte smaller half.
pub const MIN_MESSAGE_BITS: usize = REMAINDER_BITS + 8;

/// Parameters derived from a message length `n`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Params {
    /// Message length `n` in bits.
    pub len: usize,
    /// `split(n)`: length of the smaller half, which is masked each round.
    pub split: usize,
    /// `n - split(n)`: length of the half fed to the round function.
    pub remainder: usize,
    /// `rnds(n)`: number of Feistel rounds.
    pub rounds: usize,
}

impl Params {
    /// Derives the parameters for a message of `len` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless `len` is a multiple of 8 and at
    /// least [`MIN_MESSAGE_BITS`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use ff1_ls80::{Error, Params};
    /// let params = Params::new(104).unwrap();
    /// assert_eq!((params.split, params.remainder, params.rounds), (24, 80, 18));
    ///
    /// assert_eq!(Params::new(100), Err(Error::InvalidLength(100)));
    /// ```
    pub fn new(len: usize) -> Result<Self, Error> {
        if !is_valid_len(len) {
            return Err(Error::InvalidLength(len));
        }

        let split = len - REMAINDER_BITS;
        // ceil(4n / split(n)) rewritten as 4 + ceil(4 * 80 / split(n)), which
        // cannot overflow for any valid n.
        let rounds = 4 + (4 * REMAINDER_BITS - 1) / split + 1;

        Ok(Self {
            len,
            split,
            remainder: REMAINDER_BITS,
            rounds,
        })
    }
}

/// Returns `true` if a message of `len` bits can be processed.
pub fn is_valid_len(len: usize) -> bool {
    len % 8 == 0 && len >= MIN_MESSAGE_BITS
}
