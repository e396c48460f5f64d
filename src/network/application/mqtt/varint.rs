//! Remaining-length encoding.
//!
//! The remaining length is a variable-length integer: each byte carries 7
//! bits of the value, least significant group first, and the top bit marks
//! that another byte follows. At most 4 bytes are allowed, which caps the
//! value at [`MAX_REMAINING_LENGTH`] (`0xFF 0xFF 0xFF 0x7F`).
//!
//! ```rust
//! use libmqtt::network::application::mqtt::varint;
//!
//! let mut buf = [0u8; varint::MAX_LEN];
//! let used = varint::encode(321, &mut buf).unwrap();
//! assert_eq!(&buf[..used], &[0xC1, 0x02]);
//! assert_eq!(varint::decode(&buf[..used]), Ok((321, 2)));
//! ```

use super::{Error, MAX_REMAINING_LENGTH};

/// Longest encoding of a remaining length, in bytes.
pub const MAX_LEN: usize = 4;

const CONTINUATION: u8 = 0x80;

/// Number of bytes `value` occupies on the wire, or `None` when it cannot be
/// encoded.
pub const fn encoded_len(value: usize) -> Option<usize> {
    match value {
        0..=127 => Some(1),
        128..=16_383 => Some(2),
        16_384..=2_097_151 => Some(3),
        2_097_152..=MAX_REMAINING_LENGTH => Some(4),
        _ => None,
    }
}

/// Encodes `value` at the start of `dst`, returning the bytes used.
///
/// Nothing is written on error.
pub fn encode(value: usize, dst: &mut [u8]) -> Result<usize, Error> {
    let len = encoded_len(value).ok_or(Error::LengthOverflow)?;
    if dst.len() < len {
        return Err(Error::BufferTooSmall);
    }

    let mut rest = value;
    for (i, byte) in dst[..len].iter_mut().enumerate() {
        let mut digit = (rest % 128) as u8;
        rest /= 128;
        if i + 1 < len {
            digit |= CONTINUATION;
        }
        *byte = digit;
    }
    Ok(len)
}

/// Decodes a remaining length from the start of `src`.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode(src: &[u8]) -> Result<(usize, usize), Error> {
    let mut value = 0usize;
    for (i, &byte) in src.iter().take(MAX_LEN).enumerate() {
        value |= usize::from(byte & !CONTINUATION) << (7 * i);
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
    }

    if src.len() >= MAX_LEN {
        // The fourth byte still asked for a fifth.
        Err(Error::MalformedLength)
    } else {
        Err(Error::Truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: [(usize, usize); 9] = [
        (0, 1),
        (1, 1),
        (127, 1),
        (128, 2),
        (16_383, 2),
        (16_384, 3),
        (2_097_151, 3),
        (2_097_152, 4),
        (268_435_455, 4),
    ];

    #[test]
    fn test_boundaries_use_minimal_length() {
        for (value, expected_len) in BOUNDARIES {
            let mut buf = [0u8; MAX_LEN];
            let used = encode(value, &mut buf).unwrap();
            assert_eq!(used, expected_len, "length of {}", value);
            assert_eq!(encoded_len(value), Some(expected_len));
            assert_eq!(decode(&buf[..used]), Ok((value, used)));
        }
    }

    #[test]
    fn test_known_encodings() {
        let mut buf = [0u8; MAX_LEN];
        assert_eq!(encode(0, &mut buf), Ok(1));
        assert_eq!(buf[0], 0x00);

        assert_eq!(encode(128, &mut buf), Ok(2));
        assert_eq!(&buf[..2], &[0x80, 0x01]);

        assert_eq!(encode(MAX_REMAINING_LENGTH, &mut buf), Ok(4));
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_encode_rejects_values_past_the_maximum() {
        let mut buf = [0xAAu8; MAX_LEN];
        assert_eq!(encode(MAX_REMAINING_LENGTH + 1, &mut buf), Err(Error::LengthOverflow));
        assert_eq!(buf, [0xAA; MAX_LEN]);
        assert_eq!(encoded_len(MAX_REMAINING_LENGTH + 1), None);
    }

    #[test]
    fn test_encode_into_short_buffer() {
        let mut buf = [0u8; 1];
        assert_eq!(encode(200, &mut buf), Err(Error::BufferTooSmall));
        assert_eq!(buf, [0]);
    }

    #[test]
    fn test_decode_rejects_fifth_byte() {
        assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x01]), Err(Error::MalformedLength));
        assert_eq!(decode(&[0x80, 0x80, 0x80, 0x80]), Err(Error::MalformedLength));
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(decode(&[]), Err(Error::Truncated));
        assert_eq!(decode(&[0x80]), Err(Error::Truncated));
        assert_eq!(decode(&[0xFF, 0xFF, 0xFF]), Err(Error::Truncated));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        assert_eq!(decode(&[0x05, 0xFF, 0xFF]), Ok((5, 1)));
    }
}
