//! Number synthesis: fills the free positions after a prefix with random
//! digits and closes the number with its Luhn check digit.
//!
//! # Bounded retries
//! Every round is validated independently. The loop stops after at most
//! `max_rounds` attempts and reports `SynthError::NoValidCandidate`, which
//! signals a checksum defect rather than bad luck.

use rand::Rng;
use tracing::{debug, error, warn};
use crate::config::MAX_GENERATION_ROUNDS;
use crate::error::{SynthError, Result};
use crate::luhn::{digits_from_str, luhn_check_digit, luhn_is_valid};

/// Length of numbers whose leading digit is `3`
pub const SHORT_NUMBER_LENGTH: usize = 15;

/// Length of every other number
pub const STANDARD_NUMBER_LENGTH: usize = 16;

/// Returns the total length of a number started by `prefix`
pub fn target_length(prefix: &str) -> usize {
    if prefix.starts_with('3') {
        SHORT_NUMBER_LENGTH
    } else {
        STANDARD_NUMBER_LENGTH
    }
}

/// Synthesizes a Luhn-valid number that starts with `prefix`
pub fn synthesize<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> Result<String> {
    synthesize_with_rounds(prefix, MAX_GENERATION_ROUNDS, rng)
}

/// Same as `synthesize` with an explicit retry ceiling
///
/// # Errors
/// - `InvalidPattern` if `prefix` is empty or holds non-digits
/// - `PrefixTooLong` if no position is left before the check digit
/// - `NoValidCandidate` if `max_rounds` rounds all fail validation
pub fn synthesize_with_rounds<R: Rng + ?Sized>(
    prefix: &str,
    max_rounds: usize,
    rng: &mut R,
) -> Result<String> {
    if prefix.is_empty() {
        return Err(SynthError::InvalidPattern("prefix must not be empty".to_string()));
    }
    let prefix_digits = digits_from_str(prefix)?;

    let target_len = target_length(prefix);
    if prefix_digits.len() >= target_len - 1 {
        return Err(SynthError::PrefixTooLong {
            prefix_len: prefix_digits.len(),
            target_len,
        });
    }
    let missing = target_len - 1 - prefix_digits.len();

    let mut candidate = Vec::with_capacity(target_len);
    for round in 1..=max_rounds {
        candidate.clear();
        candidate.extend_from_slice(&prefix_digits);
        candidate.extend((0..missing).map(|_| rng.gen_range(0..10u8)));
        let check = luhn_check_digit(&candidate);
        candidate.push(check);

        if luhn_is_valid(&candidate) {
            debug!(prefix, round, "synthesized candidate");
            return Ok(candidate.iter().map(|&d| char::from(b'0' + d)).collect());
        }
        warn!(prefix, round, "candidate rejected by checksum");
    }

    error!(prefix, max_rounds, "retry ceiling exhausted without a valid candidate");
    Err(SynthError::NoValidCandidate { rounds: max_rounds })
}
