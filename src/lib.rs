pub mod pattern;
pub mod luhn;
pub mod synthesizer;
pub mod record;
pub mod generator;
pub mod config;
pub mod error;

pub use pattern::{Pattern, strip_non_digits, validate_count, DEFAULT_DELIMITER, MIN_PREFIX_DIGITS};
pub use luhn::{luhn_is_valid, luhn_check_digit, digits_from_str, is_valid_number};
pub use synthesizer::{
    synthesize,
    synthesize_with_rounds,
    target_length,
    SHORT_NUMBER_LENGTH,
    STANDARD_NUMBER_LENGTH,
};
pub use record::{
    Expiry,
    Record,
    BatchResult,
    assemble_one,
    assemble_batch,
    assemble_expiry,
    assemble_security_code,
    security_code_length,
};
pub use generator::Generator;
pub use config::{
    GeneratorConfig,
    MAX_GENERATION_ROUNDS,
    DEFAULT_BATCH_COUNT,
    MIN_YEARS_AHEAD,
    MAX_YEARS_AHEAD,
};
pub use error::{SynthError, Result};
