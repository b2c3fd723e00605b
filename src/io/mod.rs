//! Audio I/O modules
//!
//! Raw sample buffers and audio decoding using Symphonia.

pub mod decoder;
pub mod sample_buffer;

pub use sample_buffer::{RawAudio, RawSamples};
