use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::config::GeneratorConfig;
use crate::error::{SynthError, Result};
use crate::pattern::{validate_count, Pattern};
use crate::synthesizer::synthesize_with_rounds;

/// Separator used inside assembled records
pub const FIELD_SEPARATOR: char = '|';

/// Expiry date of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiry {
    pub month: String,
    pub year: String,
}

impl Expiry {
    /// Last two characters of the year (the whole year if shorter)
    pub fn short_year(&self) -> &str {
        let start = self
            .year
            .char_indices()
            .rev()
            .nth(1)
            .map_or(0, |(i, _)| i);
        &self.year[start..]
    }

    /// `MM|YY` form shown to callers
    pub fn display(&self) -> String {
        format!("{}{}{}", self.month, FIELD_SEPARATOR, self.short_year())
    }
}

/// One assembled record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub number: String,
    pub expiry: String,
    pub security_code: String,
    pub combined: String,
}

impl Record {
    fn new(number: String, expiry: &Expiry, security_code: String) -> Self {
        let expiry = expiry.display();
        let combined = format!(
            "{}{sep}{}{sep}{}",
            number,
            expiry,
            security_code,
            sep = FIELD_SEPARATOR
        );
        Record { number, expiry, security_code, combined }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.combined)
    }
}

/// Ordered result of a batch generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub records: Vec<Record>,
    pub combined: Vec<String>,
}

impl BatchResult {
    fn from_records(records: Vec<Record>) -> Self {
        let combined = records.iter().map(|r| r.combined.clone()).collect();
        BatchResult { records, combined }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index-keyed JSON object: `{"0": {...}, "1": {...}}`
    pub fn to_json(&self) -> Result<String> {
        let keyed: BTreeMap<usize, &Record> = self.records.iter().enumerate().collect();
        Ok(serde_json::to_string(&keyed)?)
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.combined.join("\n"))
    }
}

/// Picks the expiry, keeping supplied fields verbatim
///
/// # Errors
/// Returns `SynthError::Config` when the year must be randomized and
/// `min_years_ahead > max_years_ahead`.
pub fn assemble_expiry<R: Rng + ?Sized>(
    pattern: &Pattern,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Expiry> {
    let year = if pattern.year.is_empty() {
        if config.min_years_ahead > config.max_years_ahead {
            return Err(SynthError::Config(format!(
                "min_years_ahead ({}) exceeds max_years_ahead ({})",
                config.min_years_ahead, config.max_years_ahead
            )));
        }
        let base = config.resolved_year();
        rng.gen_range(base + config.min_years_ahead..=base + config.max_years_ahead)
            .to_string()
    } else {
        pattern.year.clone()
    };

    let month = if pattern.month.is_empty() {
        format!("{:02}", rng.gen_range(1..=12u32))
    } else {
        pattern.month.clone()
    };

    Ok(Expiry { month, year })
}

/// Security code length for a number
pub fn security_code_length(number: &str) -> usize {
    if number.starts_with('3') { 4 } else { 3 }
}

/// Builds the security code, preserving fixed positions of the fragment
///
/// The fragment fills positions from the left; the remaining positions are
/// random digits. A fragment longer than the code is truncated. Without a
/// fragment the code never starts with zero.
pub fn assemble_security_code<R: Rng + ?Sized>(
    fragment: &str,
    length: usize,
    rng: &mut R,
) -> String {
    let fixed: Vec<char> = fragment.chars().take(length).collect();
    (0..length)
        .map(|i| match fixed.get(i) {
            Some(&c) => c,
            None if i == 0 && fixed.is_empty() => char::from(b'0' + rng.gen_range(1..10u8)),
            None => char::from(b'0' + rng.gen_range(0..10u8)),
        })
        .collect()
}

/// Assembles one record from a parsed pattern
pub fn assemble_one<R: Rng + ?Sized>(
    pattern: &Pattern,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Record> {
    let number = synthesize_with_rounds(&pattern.number_prefix, config.max_rounds, rng)?;
    let expiry = assemble_expiry(pattern, config, rng)?;
    let code_len = security_code_length(&number);
    let security_code = assemble_security_code(&pattern.cvv_fragment, code_len, rng);

    Ok(Record::new(number, &expiry, security_code))
}

/// Assembles `count` independent records
///
/// Stops at the first failure; no partial batch is returned.
pub fn assemble_batch<R: Rng + ?Sized>(
    pattern: &Pattern,
    count: usize,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<BatchResult> {
    validate_count(count)?;

    let records = (0..count)
        .map(|_| assemble_one(pattern, config, rng))
        .collect::<Result<Vec<_>>>()?;

    debug!(count, prefix = %pattern.number_prefix, "assembled batch");
    Ok(BatchResult::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::luhn::is_valid_number;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config_2026() -> GeneratorConfig {
        GeneratorConfig { reference_year: Some(2026), ..Default::default() }
    }

    #[test]
    fn test_assemble_one_prefix_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let pattern = Pattern::from_prefix("411111").unwrap();
        let record = assemble_one(&pattern, &config_2026(), &mut rng).unwrap();

        assert!(record.number.starts_with("411111"));
        assert_eq!(record.number.len(), 16);
        assert!(is_valid_number(&record.number));

        assert_eq!(record.security_code.len(), 3);
        assert!(record.security_code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(
            record.combined,
            format!("{}|{}|{}", record.number, record.expiry, record.security_code)
        );
    }

    #[test]
    fn test_random_expiry_range_and_format() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let pattern = Pattern::from_prefix("411111").unwrap();
        for _ in 0..500 {
            let record = assemble_one(&pattern, &config_2026(), &mut rng).unwrap();
            let (month, year) = record.expiry.split_once('|').unwrap();
            assert_eq!(month.len(), 2);
            assert_eq!(year.len(), 2);
            let month: u32 = month.parse().unwrap();
            let year: u32 = year.parse().unwrap();
            assert!((1..=12).contains(&month));
            assert!((27..=31).contains(&year));
        }
    }

    #[test]
    fn test_inverted_year_window_is_config_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let config = GeneratorConfig {
            min_years_ahead: 6,
            reference_year: Some(2026),
            ..Default::default()
        };
        let pattern = Pattern::from_prefix("411111").unwrap();
        assert!(matches!(
            assemble_one(&pattern, &config, &mut rng),
            Err(SynthError::Config(_))
        ));
        assert!(matches!(
            assemble_batch(&pattern, 3, &config, &mut rng),
            Err(SynthError::Config(_))
        ));

        // A supplied year never touches the window
        let pattern = Pattern::parse("411111|05|2030", '|').unwrap();
        let record = assemble_one(&pattern, &config, &mut rng).unwrap();
        assert_eq!(record.expiry, "05|30");
    }

    #[test]
    fn test_assemble_one_short_scheme() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let pattern = Pattern::from_prefix("371111").unwrap();
        let record = assemble_one(&pattern, &config_2026(), &mut rng).unwrap();
        assert_eq!(record.number.len(), 15);
        assert_eq!(record.security_code.len(), 4);
    }

    #[test]
    fn test_fixed_expiry_is_kept() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let pattern = Pattern::parse("400000|09|2027|", '|').unwrap();
        let record = assemble_one(&pattern, &config_2026(), &mut rng).unwrap();
        assert_eq!(record.expiry, "09|27");
    }

    #[test]
    fn test_short_year_forms() {
        let expiry = Expiry { month: "1".to_string(), year: "7".to_string() };
        assert_eq!(expiry.display(), "1|7");
        let expiry = Expiry { month: "03".to_string(), year: "2031".to_string() };
        assert_eq!(expiry.display(), "03|31");
        let expiry = Expiry { month: "03".to_string(), year: "20éa".to_string() };
        assert_eq!(expiry.short_year(), "éa");
        let expiry = Expiry { month: "03".to_string(), year: String::new() };
        assert_eq!(expiry.display(), "03|");
    }

    #[test]
    fn test_security_code_fragment_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        for _ in 0..50 {
            let code = assemble_security_code("7", 4, &mut rng);
            assert_eq!(code.len(), 4);
            assert!(code.starts_with('7'));
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
        assert_eq!(assemble_security_code("12345", 3, &mut rng), "123");
        assert_eq!(assemble_security_code("098", 3, &mut rng), "098");
    }

    #[test]
    fn test_random_security_code_has_no_leading_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        for _ in 0..200 {
            let code = assemble_security_code("", 3, &mut rng);
            assert_eq!(code.len(), 3);
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn test_long_security_codes() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let code = assemble_security_code("", 12, &mut rng);
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert!(!code.starts_with('0'));

        let code = assemble_security_code("0", 20, &mut rng);
        assert_eq!(code.len(), 20);
        assert!(code.starts_with('0'));
        assert_eq!(assemble_security_code("", 0, &mut rng), "");
    }

    #[test]
    fn test_assemble_batch_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(16);
        let pattern = Pattern::from_prefix("540000").unwrap();
        let batch = assemble_batch(&pattern, 10, &config_2026(), &mut rng).unwrap();
        assert_eq!(batch.len(), 10);
        assert_eq!(batch.combined.len(), 10);
        for (record, line) in batch.records.iter().zip(&batch.combined) {
            assert!(is_valid_number(&record.number));
            assert_eq!(&record.combined, line);
        }
    }

    #[test]
    fn test_assemble_batch_rejects_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let pattern = Pattern::from_prefix("540000").unwrap();
        let err = assemble_batch(&pattern, 0, &config_2026(), &mut rng).unwrap_err();
        assert!(matches!(err, SynthError::InvalidPattern(_)));
    }

    #[test]
    fn test_assemble_batch_is_all_or_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(18);
        let pattern = Pattern::from_prefix("411111111111111").unwrap();
        let err = assemble_batch(&pattern, 5, &config_2026(), &mut rng).unwrap_err();
        assert!(matches!(err, SynthError::PrefixTooLong { .. }));
    }

    #[test]
    fn test_pattern_is_not_mutated() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let pattern = Pattern::parse("400000||2029|5", '|').unwrap();
        let before = pattern.clone();
        assemble_batch(&pattern, 3, &config_2026(), &mut rng).unwrap();
        assert_eq!(pattern, before);
    }

    #[test]
    fn test_batch_json_is_index_keyed() {
        let mut rng = ChaCha8Rng::seed_from_u64(20);
        let pattern = Pattern::from_prefix("400000").unwrap();
        let batch = assemble_batch(&pattern, 2, &config_2026(), &mut rng).unwrap();
        let value: serde_json::Value = serde_json::from_str(&batch.to_json().unwrap()).unwrap();
        assert_eq!(value["0"]["combined"], batch.combined[0].as_str());
        assert_eq!(value["1"]["number"], batch.records[1].number.as_str());
        assert_eq!(batch.to_string().lines().count(), 2);
    }
}
