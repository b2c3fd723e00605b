//! Audio preprocessing modules
//!
//! Prepares raw input for analysis:
//! - Normalization (integer full-scale division, float passthrough)
//! - Channel mixing (multi-channel to mono)
//! - The resulting immutable [`Waveform`]

pub mod channel_mixer;
pub mod normalization;
pub mod waveform;

pub use waveform::Waveform;
