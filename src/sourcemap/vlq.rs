//! Base64 variable-length quantity (VLQ) coding for source map segments.
//!
//! Every field of a `mappings` segment is a signed integer written as a run of base64
//! characters. Each character carries six bits:
//!
//! - **Bit 5** (`& 32`) - continuation flag; set on every character except the last one of
//!   a value
//! - **Bits 0-4** - payload, least significant group first
//!
//! Once a value is complete, bit 0 of the accumulated payload is the sign (`1` = negative)
//! and the remaining bits are the magnitude.
//!
//! # Example
//!
//! ```text
//! "AAAA"   -> [0, 0, 0, 0]
//! "gB"     -> [16]          ('g' = 32 | 0, 'B' = 1; 1 << 5 = 32; 32 >> 1 = 16)
//! "D"      -> [-1]
//! ```
//!
//! Characters outside the base64 alphabet are skipped rather than rejected, so a damaged
//! segment still yields whatever values it can. Payload bits that would shift past 64 bits
//! are discarded.

/// The base64 alphabet used by source maps, indexed by 6-bit value.
pub const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const CONTINUATION_BIT: u8 = 0b10_0000;
const PAYLOAD_MASK: u8 = 0b01_1111;
const PAYLOAD_BITS: u32 = 5;

/// Maps an ASCII byte to its 6-bit base64 value.
fn base64_value(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Streaming decoder over a single VLQ segment.
///
/// Yields one `i64` per completed value. A trailing run of continuation characters with no
/// terminating character produces nothing.
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::sourcemap::vlq::VlqDecoder;
///
/// let values: Vec<i64> = VlqDecoder::new("AACA").collect();
/// assert_eq!(values, vec![0, 0, 1, 0]);
/// ```
pub struct VlqDecoder<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> VlqDecoder<'a> {
    /// Create a decoder over `segment`.
    #[must_use]
    pub fn new(segment: &'a str) -> Self {
        VlqDecoder {
            data: segment.as_bytes(),
            position: 0,
        }
    }

    /// Returns `true` if unread characters remain.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }
}

impl Iterator for VlqDecoder<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let mut accumulated = 0u64;
        let mut shift = 0u32;

        while let Some(&byte) = self.data.get(self.position) {
            self.position += 1;

            let Some(digit) = base64_value(byte) else {
                continue;
            };

            if let Some(bits) = u64::from(digit & PAYLOAD_MASK).checked_shl(shift) {
                accumulated |= bits;
            }

            if digit & CONTINUATION_BIT != 0 {
                shift = shift.saturating_add(PAYLOAD_BITS);
                continue;
            }

            #[allow(clippy::cast_possible_wrap)]
            let magnitude = (accumulated >> 1) as i64;
            return Some(if accumulated & 1 == 1 {
                -magnitude
            } else {
                magnitude
            });
        }

        None
    }
}

/// Decodes every value in a VLQ segment.
///
/// # Arguments
/// * `segment` - One comma-separated segment of a `mappings` string
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::sourcemap::vlq::decode;
///
/// assert_eq!(decode("AAgBC"), vec![0, 0, 16, 1]);
/// assert!(decode("").is_empty());
/// ```
#[must_use]
pub fn decode(segment: &str) -> Vec<i64> {
    VlqDecoder::new(segment).collect()
}

/// Encodes `values` as one VLQ segment.
///
/// Inverse of [`decode`] for every value whose magnitude fits in 62 bits.
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::sourcemap::vlq::{decode, encode};
///
/// assert_eq!(encode(&[0, 0, 0, 0]), "AAAA");
/// assert_eq!(decode(&encode(&[-1, 1000, 7])), vec![-1, 1000, 7]);
/// ```
#[must_use]
pub fn encode(values: &[i64]) -> String {
    let mut out = String::with_capacity(values.len() * 2);
    for &value in values {
        encode_value(value, &mut out);
    }
    out
}

fn encode_value(value: i64, out: &mut String) {
    let mut remaining = (value.unsigned_abs() << 1) | u64::from(value < 0);

    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut digit = (remaining & u64::from(PAYLOAD_MASK)) as u8;
        remaining >>= PAYLOAD_BITS;
        if remaining > 0 {
            digit |= CONTINUATION_BIT;
        }
        out.push(char::from(BASE64_ALPHABET[usize::from(digit)]));
        if remaining == 0 {
            break;
        }
    }
}
