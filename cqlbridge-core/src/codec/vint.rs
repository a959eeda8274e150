//! Variable-length integers as used by the CQL `duration` encoding
//!
//! - MSB-first encoding with consecutive 1-bits indicating extra bytes
//! - First byte pattern: [number of extra bytes as 1-bits][0][value bits]
//! - ZigZag encoding maps small negative values to small unsigned ones
//! - Maximum 9 bytes total length

use nom::{bytes::complete::take, IResult};

/// Maximum bytes a vint can occupy
pub const MAX_VINT_SIZE: usize = 9;

/// Decode a ZigZag-encoded signed vint
pub fn parse_vint(input: &[u8]) -> IResult<&[u8], i64> {
    let Some(&first_byte) = input.first() else {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        )));
    };

    let extra_bytes = first_byte.leading_ones() as usize;
    let (input, bytes) = take(extra_bytes + 1)(input)?;

    // For N extra bytes the first byte keeps (7 - N) value bits
    let first_byte_value_bits = 7usize.saturating_sub(extra_bytes);
    let first_byte_mask = if first_byte_value_bits > 0 {
        (1u8 << first_byte_value_bits) - 1
    } else {
        0
    };

    let mut value = u64::from(first_byte & first_byte_mask);
    for &byte in &bytes[1..] {
        value = (value << 8) | u64::from(byte);
    }

    Ok((input, zigzag_decode(value)))
}

/// Encode a signed integer as a ZigZag vint
pub fn encode_vint(value: i64) -> Vec<u8> {
    let unsigned_value = zigzag_encode(value);

    let size = vint_size(unsigned_value);
    let mut result = vec![0u8; size];

    if size == 1 {
        result[0] = (unsigned_value & 0x7F) as u8;
        return result;
    }

    let extra_bytes = size - 1;
    let first_byte_value_bits = 7usize.saturating_sub(extra_bytes);
    let first_byte_prefix = 0xFFu8 << (8 - extra_bytes);

    let high_bits_shift = 8 * extra_bytes;
    let first_byte_value = if first_byte_value_bits > 0 {
        (unsigned_value >> high_bits_shift) & ((1u64 << first_byte_value_bits) - 1)
    } else {
        0
    };
    result[0] = first_byte_prefix | (first_byte_value as u8);

    let mut remaining_value = unsigned_value;
    for byte in result[1..].iter_mut().rev() {
        *byte = (remaining_value & 0xFF) as u8;
        remaining_value >>= 8;
    }

    result
}

/// 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...
fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Number of bytes needed to encode an (already ZigZag-mapped) value
fn vint_size(value: u64) -> usize {
    let bits_needed = 64 - value.leading_zeros() as usize;

    // Length 1 holds 7 bits; length N > 1 holds (8 - N) + 8 * (N - 1) bits,
    // except length 9 whose first byte carries no value bits.
    for length in 1..=MAX_VINT_SIZE {
        let available_bits = if length == 1 {
            7
        } else {
            8usize.saturating_sub(length) + 8 * (length - 1)
        };

        if bits_needed <= available_bits {
            return length;
        }
    }

    MAX_VINT_SIZE
}
