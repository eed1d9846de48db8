//! Hex codecs for assembling keys, tweaks and messages.

use crate::Error;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Decodes a hex string into bytes. Both upper and lower case digits are
/// accepted.
///
/// # Errors
///
/// Returns [`Error::InvalidHex`] if the string has an odd number of
/// characters or contains anything other than hex digits.
///
/// # Examples
///
/// ```rust
/// # use ff1_ls80::hex_to_bytes;
/// assert_eq!(hex_to_bytes("0a0B").unwrap(), [0x0A, 0x0B]);
/// assert!(hex_to_bytes("abc").is_err());
/// ```
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, Error> {
    let s = s.as_bytes();
    if s.len() % 2 != 0 {
        return Err(Error::InvalidHex);
    }

    s.chunks_exact(2)
        .map(|pair| Ok((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

/// Encodes bytes as an uppercase hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        s.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
        s.push(char::from(HEX_DIGITS[usize::from(b & 0xF)]));
    }
    s
}

fn nibble(c: u8) -> Result<u8, Error> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(Error::InvalidHex),
    }
}
