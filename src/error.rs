//! Error types for the speech analysis pipeline

use std::fmt;

/// Errors that can occur while analysing or rendering audio
///
/// Absent input is not an error (the pipeline short-circuits), and numeric
/// degeneracy such as the mean of an empty set surfaces as `NaN` in the
/// metric set rather than as one of these variants.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Invalid input parameters (zero sample rate, unsupported channel layout, ...)
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Processing error inside a feature primitive
    ProcessingError(String),

    /// Spectrogram rendering failed
    RenderError(String),

    /// Numerical error (overflow, underflow, etc.)
    NumericalError(String),

    /// Filesystem error (temporary image allocation, reading audio files)
    IoError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::RenderError(msg) => write!(f, "Render error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            AnalysisError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::IoError(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for AnalysisError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AnalysisError::DecodingError(err.to_string())
    }
}
