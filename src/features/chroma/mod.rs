//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - Chroma filterbank
//! - Tuning estimation
//! - Chroma vector computation and normalization

pub mod extractor;
pub mod filterbank;
pub mod normalization;
pub mod tuning;

pub use extractor::chroma_stft;
