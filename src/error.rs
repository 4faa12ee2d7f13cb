//! Error types for the chord recognition engine

use std::fmt;

/// Errors that can occur during chord analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Audio source unreadable, corrupt or in an unsupported format
    DecodeError(String),

    /// Decoded signal has zero usable samples
    EmptyAudio(String),

    /// Invalid input parameters
    InvalidInput(String),
}

/// Discriminant of [`AnalysisError`] without its message
///
/// Carried by the failed state of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`AnalysisError::DecodeError`]
    Decode,
    /// See [`AnalysisError::EmptyAudio`]
    EmptyAudio,
    /// See [`AnalysisError::InvalidInput`]
    InvalidInput,
}

impl AnalysisError {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::DecodeError(_) => ErrorKind::Decode,
            AnalysisError::EmptyAudio(_) => ErrorKind::EmptyAudio,
            AnalysisError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::DecodeError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::EmptyAudio(msg) => write!(f, "Empty audio: {}", msg),
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
