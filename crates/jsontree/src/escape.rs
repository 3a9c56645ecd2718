//! Decoding of `\uXXXX` escapes, including UTF-16 surrogate pairs.
//!
//! The reader hands over the bytes following a `\u`; [`decode_unicode_escape`]
//! consumes one escape, or two when the first is a high surrogate, and returns
//! the decoded `char` together with the number of bytes consumed.

use crate::error::ReadErrorKind;

/// Convert a single ASCII hex digit into its 0..=15 value.
#[inline]
fn hex_val(b: u8) -> Option<u16> {
    match b {
        b'0'..=b'9' => Some(u16::from(b - b'0')),
        b'a'..=b'f' => Some(u16::from(b - b'a') + 10),
        b'A'..=b'F' => Some(u16::from(b - b'A') + 10),
        _ => None,
    }
}

/// Decode exactly four hex digits at the start of `bytes`.
fn hex4(bytes: &[u8]) -> Option<u16> {
    let digits = bytes.get(..4)?;
    digits
        .iter()
        .try_fold(0u16, |acc, &b| Some((acc << 4) | hex_val(b)?))
}

const HIGH_SURROGATES: core::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: core::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Decode the escape whose hex digits start at `bytes[0]` (the `\u` has
/// already been consumed).
///
/// Returns the decoded character and how many bytes of `bytes` it used: 4 for
/// a BMP scalar, 10 for a surrogate pair (`XXXX\uYYYY`).
pub(crate) fn decode_unicode_escape(bytes: &[u8]) -> Result<(char, usize), ReadErrorKind> {
    let first = hex4(bytes).ok_or(ReadErrorKind::InvalidEscape)?;

    if LOW_SURROGATES.contains(&first) {
        return Err(ReadErrorKind::UnpairedSurrogate(first));
    }

    if !HIGH_SURROGATES.contains(&first) {
        let ch = char::from_u32(u32::from(first)).ok_or(ReadErrorKind::InvalidEscape)?;
        return Ok((ch, 4));
    }

    // A high surrogate must be followed directly by `\u` and a low surrogate.
    let low = match bytes.get(4..6) {
        Some(b"\\u") => hex4(&bytes[6..]).ok_or(ReadErrorKind::InvalidEscape)?,
        _ => return Err(ReadErrorKind::UnpairedSurrogate(first)),
    };
    if !LOW_SURROGATES.contains(&low) {
        return Err(ReadErrorKind::UnpairedSurrogate(first));
    }

    let code = 0x10000 + ((u32::from(first) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    let ch = char::from_u32(code).ok_or(ReadErrorKind::InvalidEscape)?;
    Ok((ch, 10))
}

#[cfg(test)]
mod tests {
    use super::decode_unicode_escape;
    use crate::error::ReadErrorKind;

    #[test]
    fn basic_decoding() {
        assert_eq!(decode_unicode_escape(b"0041"), Ok(('A', 4)));
    }

    #[test]
    fn mixed_case_hex() {
        assert_eq!(
            decode_unicode_escape(b"AbCd rest"),
            Ok((char::from_u32(0xABCD).unwrap(), 4))
        );
    }

    #[test]
    fn surrogate_pair() {
        assert_eq!(decode_unicode_escape(b"D83D\\uDE00"), Ok(('😀', 10)));
    }

    #[test]
    fn invalid_hex_error() {
        assert_eq!(
            decode_unicode_escape(b"00G1"),
            Err(ReadErrorKind::InvalidEscape)
        );
    }

    #[test]
    fn truncated_escape() {
        assert_eq!(decode_unicode_escape(b"00"), Err(ReadErrorKind::InvalidEscape));
    }

    #[test]
    fn lone_surrogates_rejected() {
        assert_eq!(
            decode_unicode_escape(b"D800"),
            Err(ReadErrorKind::UnpairedSurrogate(0xD800))
        );
        assert_eq!(
            decode_unicode_escape(b"DC00"),
            Err(ReadErrorKind::UnpairedSurrogate(0xDC00))
        );
        assert_eq!(
            decode_unicode_escape(b"D800\\u0041"),
            Err(ReadErrorKind::UnpairedSurrogate(0xD800))
        );
    }
}
