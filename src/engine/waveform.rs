//! Waveform summaries
//!
//! What an engine draws is a min/max envelope of the track, one column per
//! horizontal bucket.

use serde::Serialize;

/// Envelope of one waveform column
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Peak {
    pub min: f32,
    pub max: f32,
}

/// Split `samples` into `buckets` columns and take the min/max of each
///
/// Returns fewer columns than requested when there are fewer samples than
/// buckets. Returns an empty vector for empty input or zero buckets.
pub fn compute_peaks(samples: &[f32], buckets: usize) -> Vec<Peak> {
    if samples.is_empty() || buckets == 0 {
        return Vec::new();
    }

    let per_bucket = samples.len().div_ceil(buckets);
    samples
        .chunks(per_bucket)
        .map(|chunk| {
            chunk.iter().fold(
                Peak {
                    min: f32::INFINITY,
                    max: f32::NEG_INFINITY,
                },
                |acc, &s| Peak {
                    min: acc.min.min(s),
                    max: acc.max.max(s),
                },
            )
        })
        .collect()
}

/// Largest absolute sample value in the envelope
pub fn envelope_peak(peaks: &[Peak]) -> f32 {
    peaks
        .iter()
        .map(|p| p.min.abs().max(p.max.abs()))
        .fold(0.0_f32, f32::max)
}

/// Convert linear amplitude to decibels
///
/// Returns `-inf` for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}
