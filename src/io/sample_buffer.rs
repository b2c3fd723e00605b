//! Raw sample buffers as they arrive from a decoder or a caller

/// Interleaved PCM samples tagged with their storage type
///
/// Integer variants carry quantized samples whose full scale is the type's
/// maximum magnitude; `Int24` stores 24-bit samples sign-extended in `i32`.
/// Float variants are assumed to be normalized to [-1.0, 1.0] already.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSamples {
    /// 8-bit signed integer samples
    Int8(Vec<i8>),
    /// 16-bit signed integer samples
    Int16(Vec<i16>),
    /// 24-bit signed integer samples stored in `i32`
    Int24(Vec<i32>),
    /// 32-bit signed integer samples
    Int32(Vec<i32>),
    /// 32-bit float samples
    Float32(Vec<f32>),
    /// 64-bit float samples
    Float64(Vec<f64>),
}

impl RawSamples {
    /// Number of stored samples (all channels)
    pub fn len(&self) -> usize {
        match self {
            RawSamples::Int8(s) => s.len(),
            RawSamples::Int16(s) => s.len(),
            RawSamples::Int24(s) | RawSamples::Int32(s) => s.len(),
            RawSamples::Float32(s) => s.len(),
            RawSamples::Float64(s) => s.len(),
        }
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bit width of the sample type
    pub fn bit_width(&self) -> u32 {
        match self {
            RawSamples::Int8(_) => 8,
            RawSamples::Int16(_) => 16,
            RawSamples::Int24(_) => 24,
            RawSamples::Int32(_) | RawSamples::Float32(_) => 32,
            RawSamples::Float64(_) => 64,
        }
    }

    /// True for integer-quantized variants
    pub fn is_integer(&self) -> bool {
        !matches!(self, RawSamples::Float32(_) | RawSamples::Float64(_))
    }
}

/// A clip of audio as handed to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RawAudio {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of interleaved channels
    pub channels: u16,

    /// Interleaved samples
    pub samples: RawSamples,
}

impl RawAudio {
    /// Mono clip
    pub fn mono(sample_rate: u32, samples: RawSamples) -> Self {
        Self {
            sample_rate,
            channels: 1,
            samples,
        }
    }

    /// Interleaved multi-channel clip
    pub fn interleaved(sample_rate: u32, channels: u16, samples: RawSamples) -> Self {
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}
