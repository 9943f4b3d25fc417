use chrono::Datelike;
use serde::{Deserialize, Serialize};
use crate::error::{SynthError, Result};
use crate::pattern::DEFAULT_DELIMITER;

/// Retry ceiling for a single number synthesis
pub const MAX_GENERATION_ROUNDS: usize = 1000;

/// Records produced when the caller does not ask for a specific count
pub const DEFAULT_BATCH_COUNT: usize = 10;

/// Nearest randomized expiry year, relative to the reference year
pub const MIN_YEARS_AHEAD: i32 = 1;

/// Furthest randomized expiry year, relative to the reference year
pub const MAX_YEARS_AHEAD: i32 = 5;

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub delimiter: char,
    pub max_rounds: usize,
    pub default_count: usize,
    pub min_years_ahead: i32,
    pub max_years_ahead: i32,
    /// Year randomized expiries are counted from; `None` means the current local year
    pub reference_year: Option<i32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            delimiter: DEFAULT_DELIMITER,
            max_rounds: MAX_GENERATION_ROUNDS,
            default_count: DEFAULT_BATCH_COUNT,
            min_years_ahead: MIN_YEARS_AHEAD,
            max_years_ahead: MAX_YEARS_AHEAD,
            reference_year: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(SynthError::Config("max_rounds must be at least 1".to_string()));
        }
        if self.default_count == 0 {
            return Err(SynthError::Config("default_count must be at least 1".to_string()));
        }
        if self.min_years_ahead > self.max_years_ahead {
            return Err(SynthError::Config(format!(
                "min_years_ahead ({}) exceeds max_years_ahead ({})",
                self.min_years_ahead, self.max_years_ahead
            )));
        }
        if self.delimiter.is_ascii_digit() {
            return Err(SynthError::Config("delimiter must not be a digit".to_string()));
        }
        Ok(())
    }

    /// Resolves the reference year, falling back to the local calendar
    pub fn resolved_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}
