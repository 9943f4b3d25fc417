use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Prefix too long: {prefix_len} digits leave no room before the check digit of a {target_len}-digit number")]
    PrefixTooLong { prefix_len: usize, target_len: usize },

    #[error("No valid candidate found after {rounds} rounds")]
    NoValidCandidate { rounds: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SynthError>;

impl From<serde_json::Error> for SynthError {
    fn from(err: serde_json::Error) -> Self {
        SynthError::Serialization(err.to_string())
    }
}
