use thiserror::Error;

pub type Result<T> = std::result::Result<T, RampError>;

#[derive(Error, Debug)]
pub enum RampError {
    /// Input rejected before any computation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reference and competing series do not share a time base
    #[error("Misaligned series: {0}")]
    Alignment(String),

    /// First averaging window has no points and nothing to fall back on
    #[error("Empty first window starting at {window_start} with no seed value")]
    EmptyWindow { window_start: usize },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Archive checksum mismatch")]
    ChecksumMismatch,
}

impl RampError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        RampError::InvalidInput(msg.into())
    }

    pub(crate) fn misaligned(msg: impl Into<String>) -> Self {
        RampError::Alignment(msg.into())
    }
}
