use serde::{Deserialize, Serialize};
use crate::error::{SynthError, Result};

/// Default field separator for pattern strings
pub const DEFAULT_DELIMITER: char = '|';

/// Minimum number of prefix digits a pattern must carry
pub const MIN_PREFIX_DIGITS: usize = 6;

/// Parsed generation pattern
///
/// Every field is digit-only; an empty field means "unset" and is randomized
/// at assembly time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub number_prefix: String,
    pub month: String,
    pub year: String,
    pub cvv_fragment: String,
}

impl Pattern {
    /// Parses `"<prefix>|<month>|<year>|<cvv>"`
    ///
    /// Fields after the prefix may be omitted. Fields beyond the fourth are
    /// ignored.
    ///
    /// # Errors
    /// Returns `SynthError::InvalidPattern` when the stripped prefix holds
    /// fewer than `MIN_PREFIX_DIGITS` digits.
    pub fn parse(input: &str, delimiter: char) -> Result<Self> {
        let mut fields = input.split(delimiter).map(strip_non_digits);

        let number_prefix = fields.next().unwrap_or_default();
        if number_prefix.len() < MIN_PREFIX_DIGITS {
            return Err(SynthError::InvalidPattern(format!(
                "prefix must contain at least {} digits, got {}",
                MIN_PREFIX_DIGITS,
                number_prefix.len()
            )));
        }

        Ok(Pattern {
            number_prefix,
            month: fields.next().unwrap_or_default(),
            year: fields.next().unwrap_or_default(),
            cvv_fragment: fields.next().unwrap_or_default(),
        })
    }

    /// Builds a pattern from a bare prefix with every other field unset
    pub fn from_prefix(prefix: &str) -> Result<Self> {
        Self::parse(prefix, DEFAULT_DELIMITER)
    }

    /// Leading digit of the prefix, used to pick number and code lengths
    pub fn leading_digit(&self) -> Option<char> {
        self.number_prefix.chars().next()
    }
}

/// Removes every non-digit character
pub fn strip_non_digits(field: &str) -> String {
    field.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Rejects batch sizes below one
pub fn validate_count(count: usize) -> Result<()> {
    if count < 1 {
        return Err(SynthError::InvalidPattern(
            "count must be at least 1".to_string(),
        ));
    }
    Ok(())
}
