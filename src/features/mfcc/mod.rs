//! MFCC extraction
//!
//! - Mel scale conversion and triangular filterbank
//! - Mel power spectrogram and cepstral coefficients

pub mod extractor;
pub mod mel;

pub use extractor::{mel_spectrogram, mfcc};
