use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::pattern::{validate_count, Pattern};
use crate::record::{assemble_batch, assemble_one, BatchResult, Record};

/// Entry point for pattern-driven generation
///
/// Holds configuration only. Every call parses its own pattern and draws from
/// the RNG it is given, so one `Generator` can be shared across threads as
/// long as each thread brings its own RNG.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a new Generator
    ///
    /// # Errors
    /// Returns `SynthError::Config` if the configuration is inconsistent.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Generator { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parses a pattern string with the configured delimiter
    pub fn parse(&self, pattern: &str) -> Result<Pattern> {
        Pattern::parse(pattern, self.config.delimiter)
    }

    /// Generates one record using the thread-local RNG
    pub fn generate_one(&self, pattern: &str) -> Result<Record> {
        self.generate_one_with(pattern, &mut rand::thread_rng())
    }

    /// Generates `count` records using the thread-local RNG
    pub fn generate_batch(&self, pattern: &str, count: usize) -> Result<BatchResult> {
        self.generate_batch_with(pattern, count, &mut rand::thread_rng())
    }

    /// Generates `default_count` records
    pub fn generate_default_batch(&self, pattern: &str) -> Result<BatchResult> {
        self.generate_batch(pattern, self.config.default_count)
    }

    pub fn generate_one_with<R: Rng + ?Sized>(&self, pattern: &str, rng: &mut R) -> Result<Record> {
        let pattern = self.parse(pattern)?;
        assemble_one(&pattern, &self.config, rng)
    }

    pub fn generate_batch_with<R: Rng + ?Sized>(
        &self,
        pattern: &str,
        count: usize,
        rng: &mut R,
    ) -> Result<BatchResult> {
        validate_count(count)?;
        let pattern = self.parse(pattern)?;
        assemble_batch(&pattern, count, &self.config, rng)
    }

    /// Reproducible batch: the same seed, pattern and config yield the same records
    pub fn generate_batch_seeded(&self, pattern: &str, count: usize, seed: u64) -> Result<BatchResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate_batch_with(pattern, count, &mut rng)
    }
}
