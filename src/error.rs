//! Error types for minichain

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// Input that could not be decoded: bad hex, wrong length, a point that is
    /// not on the curve, undecodable DER or an out-of-range secret scalar.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Well-formed signature that does not verify under the given key.
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainError {
    /// True for the malformed-input kind, false for everything else.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ChainError::MalformedInput(_))
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
