//! Audio decoding using Symphonia
//!
//! Decodes a file into [`RawAudio`] without normalizing it: the sample type
//! of the first decoded packet decides the [`RawSamples`] variant, so integer
//! sources stay integer and go through the same normalization path as
//! caller-supplied buffers.

use super::sample_buffer::{RawAudio, RawSamples};
use crate::error::AnalysisError;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, SampleBuffer, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::ConvertibleSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Decode an audio file to interleaved PCM samples
///
/// # Arguments
///
/// * `path` - Path to audio file (any container/codec Symphonia supports)
///
/// # Returns
///
/// `RawAudio` with the file's sample rate, channel count and native sample type
///
/// # Errors
///
/// Returns `AnalysisError::IoError` if the file cannot be opened and
/// `AnalysisError::DecodingError` if no decodable audio track is found
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<RawAudio, AnalysisError> {
    let path = path.as_ref();
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16);
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Option<RawSamples> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                channels.get_or_insert(spec.channels.count() as u16);

                let target = samples.get_or_insert_with(|| empty_like(&decoded));
                append_decoded(target, decoded);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packets are skipped; the rest of the stream is still usable.
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let sample_rate = sample_rate
        .ok_or_else(|| AnalysisError::DecodingError("Unknown sample rate".to_string()))?;
    let channels = channels.unwrap_or(1);
    let samples = samples.unwrap_or(RawSamples::Float32(Vec::new()));

    log::debug!(
        "Decoded {} samples ({} channels, {}-bit) at {} Hz",
        samples.len(),
        channels,
        samples.bit_width(),
        sample_rate
    );

    Ok(RawAudio::interleaved(sample_rate, channels, samples))
}

/// Pick the buffer variant matching a decoded packet's native sample type
fn empty_like(decoded: &AudioBufferRef<'_>) -> RawSamples {
    match decoded {
        AudioBufferRef::U8(_) | AudioBufferRef::S8(_) => RawSamples::Int8(Vec::new()),
        AudioBufferRef::U16(_) | AudioBufferRef::S16(_) => RawSamples::Int16(Vec::new()),
        AudioBufferRef::U24(_) | AudioBufferRef::S24(_) => RawSamples::Int24(Vec::new()),
        AudioBufferRef::U32(_) | AudioBufferRef::S32(_) => RawSamples::Int32(Vec::new()),
        AudioBufferRef::F32(_) => RawSamples::Float32(Vec::new()),
        AudioBufferRef::F64(_) => RawSamples::Float64(Vec::new()),
    }
}

fn append_decoded(target: &mut RawSamples, decoded: AudioBufferRef<'_>) {
    match target {
        RawSamples::Int8(out) => append_converted(out, decoded),
        RawSamples::Int16(out) => append_converted(out, decoded),
        RawSamples::Int24(out) => append_int24(out, decoded),
        RawSamples::Int32(out) => append_converted(out, decoded),
        RawSamples::Float32(out) => append_converted(out, decoded),
        RawSamples::Float64(out) => append_converted(out, decoded),
    }
}

fn append_converted<S: Sample + ConvertibleSample>(out: &mut Vec<S>, decoded: AudioBufferRef<'_>) {
    let spec = *decoded.spec();
    let mut buf = SampleBuffer::<S>::new(decoded.capacity() as u64, spec);
    buf.copy_interleaved_ref(decoded);
    out.extend_from_slice(buf.samples());
}

fn append_int24(out: &mut Vec<i32>, decoded: AudioBufferRef<'_>) {
    match decoded {
        AudioBufferRef::S24(buf) => {
            let channels = buf.spec().channels.count();
            out.reserve(buf.frames() * channels);
            for i in 0..buf.frames() {
                for ch in 0..channels {
                    out.push(buf.chan(ch)[i].inner());
                }
            }
        }
        other => {
            // Rescale from full 32-bit range down to 24 bits.
            let mut wide = Vec::new();
            append_converted::<i32>(&mut wide, other);
            out.extend(wide.into_iter().map(|s| s >> 8));
        }
    }
}
