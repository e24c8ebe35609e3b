//! Percent-encoding for URL values.
//!
//! Every byte outside the unreserved set `A-Z a-z 0-9 - _ . ~` is written as
//! `%XX` with uppercase hex digits. The HTML serializer only applies this when
//! [`HtmlOptions::encode_urls`](crate::HtmlOptions) is set.

use crate::ser::OutputBuffer;
use crate::Result;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[inline]
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~')
}

/// Writes the percent-encoded form of `input` into `out`.
pub(crate) fn encode_into(input: &[u8], out: &mut OutputBuffer<'_>) -> Result<()> {
    let mut start = 0;
    for (i, &byte) in input.iter().enumerate() {
        if is_unreserved(byte) {
            continue;
        }
        out.write(&input[start..i])?;
        out.write(&[b'%', HEX[usize::from(byte >> 4)], HEX[usize::from(byte & 0x0F)]])?;
        start = i + 1;
    }
    out.write(&input[start..])
}

/// Percent-encodes `input` into `out` and returns the encoded length.
///
/// Like the serializers, the last byte of `out` is reserved for a zero
/// sentinel.
///
/// # Errors
///
/// [`Error::InvalidInput`](crate::Error::InvalidInput) for an empty buffer,
/// [`Error::BufferOverflow`](crate::Error::BufferOverflow) if the encoded form
/// does not fit.
///
/// # Examples
///
/// ```rust
/// use mml_bounded::percent_encode;
///
/// let mut out = [0u8; 32];
/// let len = percent_encode(b"a b/c~", &mut out).unwrap();
/// assert_eq!(&out[..len], b"a%20b%2Fc~");
/// ```
pub fn percent_encode(input: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut buf = OutputBuffer::new(out)?;
    encode_into(input, &mut buf)?;
    Ok(buf.finish())
}
