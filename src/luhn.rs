//! Luhn (ISO/IEC 7812) checksum primitives.
//!
//! Both functions double every second digit counting from the right edge of
//! the final number. `luhn_check_digit` anchors that count as if the check
//! digit were already appended, so the two always agree.

use crate::error::{SynthError, Result};

fn double_digit(digit: u8) -> u8 {
    let doubled = digit * 2;
    if doubled > 9 { doubled - 9 } else { doubled }
}

/// Sums the digits, doubling those at odd offsets from the right when
/// `double_rightmost` is false, or at even offsets when it is true.
fn weighted_sum(digits: &[u8], double_rightmost: bool) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(offset, &digit)| {
            let doubled = (offset % 2 == 1) != double_rightmost;
            u32::from(if doubled { double_digit(digit) } else { digit })
        })
        .sum()
}

/// Returns true when the full digit sequence passes the Luhn checksum
///
/// An empty sequence is never valid.
pub fn luhn_is_valid(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }
    weighted_sum(digits, false) % 10 == 0
}

/// Derives the digit that makes `partial` Luhn-valid once appended
pub fn luhn_check_digit(partial: &[u8]) -> u8 {
    let sum = weighted_sum(partial, true);
    ((10 - (sum % 10)) % 10) as u8
}

/// Converts a digit string into numeric digits
///
/// # Errors
/// Returns `SynthError::InvalidPattern` on any non-digit character.
pub fn digits_from_str(number: &str) -> Result<Vec<u8>> {
    number
        .chars()
        .map(|c| {
            c.to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| SynthError::InvalidPattern(format!("non-digit character '{}'", c)))
        })
        .collect()
}

/// Validates a number given as a string
///
/// Whitespace and dashes are ignored; any other non-digit makes it invalid.
pub fn is_valid_number(number: &str) -> bool {
    let cleaned: String = number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    digits_from_str(&cleaned)
        .map(|digits| luhn_is_valid(&digits))
        .unwrap_or(false)
}
