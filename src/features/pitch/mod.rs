//! Pitch estimation
//!
//! - Peak-picking multi-pitch tracking on the STFT (`piptrack`)
//! - Probabilistic YIN fundamental frequency tracking (`pyin`)

pub mod hmm;
pub mod piptrack;
pub mod pyin;

pub use piptrack::{piptrack, PitchTrack};
pub use pyin::{pyin, F0Track};
