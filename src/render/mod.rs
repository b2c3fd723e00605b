//! Spectrogram image rendering
//!
//! - Magma colour scale
//! - Exclusive plotting context
//! - PNG spectrogram with log-frequency axis and colorbar

pub mod colormap;
pub mod context;
pub mod spectrogram;

pub use context::PlotContext;
pub use spectrogram::render_spectrogram;
