//! Spectral shape features
//!
//! - Spectral centroid (centre of mass of the magnitude spectrum)
//! - Spectral contrast (peak-to-valley ratio per octave band)

pub mod centroid;
pub mod contrast;

pub use centroid::spectral_centroid;
pub use contrast::spectral_contrast;
