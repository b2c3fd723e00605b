//! Feature extraction modules
//!
//! This module contains the frame-level analysis primitives:
//! - STFT and dB scaling
//! - Temporal features (energy, zero-crossing rate)
//! - Spectral features (centroid, contrast)
//! - MFCC
//! - Chroma extraction
//! - Pitch tracking (peak picking + pYIN)

pub mod chroma;
pub mod mfcc;
pub mod pitch;
pub mod scaling;
pub mod spectral;
pub mod stft;
pub mod temporal;
