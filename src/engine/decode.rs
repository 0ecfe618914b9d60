//! Audio decoding for the headless engine
//!
//! Audio reaches the engine as opaque bytes. WAV is decoded with `hound`
//! and mixed down to a single channel, which is all the waveform and the
//! transport need.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{CropError, Result};

/// Decoded, mono-mixed audio
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source before mixdown
    pub source_channels: u16,
}

impl DecodedAudio {
    /// Length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode WAV bytes
///
/// # Errors
/// * `InvalidAudio` - If the bytes are not a readable WAV stream
/// * `UnsupportedFormat` - If the integer bit depth is not 8/16/24/32
/// * `EmptyAudio` - If the stream holds no frames
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio> {
    let reader = WavReader::new(bytes).map_err(|e| CropError::InvalidAudio {
        reason: format!("Failed to read WAV header: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(CropError::InvalidAudio {
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    let samples = mixdown(&interleaved, channels);
    if samples.is_empty() {
        return Err(CropError::EmptyAudio);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        source_channels: spec.channels,
    })
}

/// Encode a sine tone as 16-bit PCM WAV bytes
///
/// Used for demos and fixtures; every channel carries the same tone.
pub fn encode_test_tone(
    frequency: f32,
    duration_secs: f64,
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let frames = (duration_secs * sample_rate as f64) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(encode_error)?;
        for i in 0..frames {
            let value = ((angular_freq * i as f32).sin() * 0.5 * i16::MAX as f32) as i16;
            for _ in 0..channels {
                writer.write_sample(value).map_err(encode_error)?;
            }
        }
        writer.finalize().map_err(encode_error)?;
    }

    Ok(cursor.into_inner())
}

fn encode_error(e: hound::Error) -> CropError {
    CropError::InvalidAudio {
        reason: format!("Failed to encode WAV: {}", e),
        source: Some(Box::new(e)),
    }
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let read_error = |e: hound::Error| CropError::InvalidAudio {
        reason: format!("Failed to read {}-bit samples: {}", bits_per_sample, e),
        source: Some(Box::new(e)),
    };

    match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error),
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error),
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error),
        // 24-bit is stored as i32 in hound
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8388608.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error),
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2147483648.0))
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error),
        (SampleFormat::Int, bits) => Err(CropError::UnsupportedFormat {
            format: format!("{}-bit integer audio", bits),
        }),
    }
}

/// Average interleaved frames down to one channel
fn mixdown(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_decode_test_tone_duration() {
        let bytes = encode_test_tone(440.0, 2.0, 8000, 1).unwrap();
        let audio = decode_wav(&bytes).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.source_channels, 1);
        assert_relative_eq!(audio.duration(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stereo_is_mixed_down() {
        let bytes = encode_test_tone(220.0, 1.0, 8000, 2).unwrap();
        let audio = decode_wav(&bytes).unwrap();
        assert_eq!(audio.source_channels, 2);
        assert_eq!(audio.samples.len(), 8000);
    }

    #[test]
    fn test_mixdown_averages_frames() {
        let mixed = mixdown(&[1.0, 0.0, 0.5, 0.5], 2);
        assert_eq!(mixed, vec![0.5, 0.5]);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = decode_wav(b"definitely not a wav file").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_AUDIO");
    }

    #[test]
    fn test_empty_wav_rejected() {
        let bytes = encode_test_tone(440.0, 0.0, 8000, 1).unwrap();
        let err = decode_wav(&bytes).unwrap_err();
        assert!(matches!(err, CropError::EmptyAudio));
    }
}
