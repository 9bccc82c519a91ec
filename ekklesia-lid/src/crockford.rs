//! Crockford base32 for unsigned integers.
//!
//! Encoding emits the uppercase canonical alphabet, most significant symbol
//! first. Decoding is case-insensitive and folds the ambiguous letters
//! `O` to `0` and `I`/`L` to `1`.

use crate::error::FormatReason;

/// The 32 symbols in value order.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Encode `value` without padding. Zero encodes as `"0"`.
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return String::from("0");
    }

    // 64 bits need at most 13 symbols
    let mut buf = [0u8; 13];
    let mut pos = buf.len();
    while value > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(value & 0x1f) as usize];
        value >>= 5;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Encode `value` left-padded with `0` to at least `width` symbols.
pub fn encode_padded(value: u64, width: usize) -> String {
    format!("{:0>width$}", encode(value), width = width)
}

/// Map one input symbol to its 5-bit value.
pub fn symbol_value(symbol: char) -> Option<u8> {
    let v = match symbol.to_ascii_uppercase() {
        c @ '0'..='9' => c as u8 - b'0',
        'O' => 0,
        'I' | 'L' => 1,
        'A' => 10,
        'B' => 11,
        'C' => 12,
        'D' => 13,
        'E' => 14,
        'F' => 15,
        'G' => 16,
        'H' => 17,
        'J' => 18,
        'K' => 19,
        'M' => 20,
        'N' => 21,
        'P' => 22,
        'Q' => 23,
        'R' => 24,
        'S' => 25,
        'T' => 26,
        'V' => 27,
        'W' => 28,
        'X' => 29,
        'Y' => 30,
        'Z' => 31,
        _ => return None,
    };
    Some(v)
}

/// Decode a symbol string into an integer.
pub fn decode(symbols: &str) -> Result<u64, FormatReason> {
    if symbols.is_empty() {
        return Err(FormatReason::EmptyGroup);
    }

    symbols.chars().try_fold(0u64, |acc, symbol| {
        let digit = symbol_value(symbol).ok_or(FormatReason::InvalidSymbol(symbol))?;
        if acc >> 59 != 0 {
            return Err(FormatReason::Overflow);
        }
        Ok((acc << 5) | u64::from(digit))
    })
}

/// Uppercase `symbols` and replace ambiguous letters with their digits.
pub fn normalize(symbols: &str) -> String {
    symbols
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            'I' | 'L' => '1',
            other => other,
        })
        .collect()
}
