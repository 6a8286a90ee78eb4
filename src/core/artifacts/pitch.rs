//! Post-synthesis pitch adjustment.
//!
//! The shifter operates on mono 16-bit PCM WAV data using the varispeed
//! technique: the waveform is resampled by the pitch factor while the
//! declared sample rate stays fixed, so raising the pitch shortens the clip
//! proportionally (and lowering it lengthens it). The synthesis pipeline
//! requests PCM output from the provider whenever a pitch adjustment is
//! pending, so compressed containers never reach this module.

use thiserror::Error;

/// Errors from pitch processing.
#[derive(Error, Debug)]
pub enum PitchError {
    /// The input is not a parseable RIFF/WAVE stream.
    #[error("invalid WAV data: {0}")]
    InvalidWav(String),

    /// The WAV stream is valid but not a layout the shifter handles.
    #[error("unsupported audio layout: {0}")]
    Unsupported(String),
}

/// Convert the API pitch parameter to a semitone offset.
///
/// The pitch parameter spans -50..=50 and maps linearly onto -6..=6
/// semitones.
pub fn semitones_for(pitch: i64) -> f32 {
    (pitch as f32 / 50.0) * 6.0
}

/// Capability seam for pitch transforms, injected into the application
/// state so the pipeline never depends on a concrete DSP approach.
pub trait PitchShifter: Send + Sync {
    /// Transform mono 16-bit PCM WAV bytes by `semitones`.
    fn shift_wav(&self, wav: &[u8], semitones: f32) -> Result<Vec<u8>, PitchError>;
}

/// Default shifter: linear-interpolation varispeed resampler.
pub struct VarispeedShifter;

impl PitchShifter for VarispeedShifter {
    fn shift_wav(&self, wav: &[u8], semitones: f32) -> Result<Vec<u8>, PitchError> {
        let audio = parse_wav(wav)?;
        let factor = 2f64.powf(f64::from(semitones) / 12.0);
        if (factor - 1.0).abs() < 1e-9 {
            return Ok(wav.to_vec());
        }
        let shifted = resample(&audio.samples, factor);
        Ok(build_wav(audio.sample_rate, &shifted))
    }
}

struct WavAudio {
    sample_rate: u32,
    samples: Vec<i16>,
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn parse_wav(data: &[u8]) -> Result<WavAudio, PitchError> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(PitchError::InvalidWav("missing RIFF/WAVE header".into()));
    }

    let mut sample_rate = None;
    let mut samples = None;
    let mut offset = 12;
    while offset + 8 <= data.len() {
        let chunk_id = &data[offset..offset + 4];
        let chunk_size = read_u32(data, offset + 4) as usize;
        let body_start = offset + 8;
        let body_end = body_start
            .checked_add(chunk_size)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| PitchError::InvalidWav("chunk overruns buffer".into()))?;
        let body = &data[body_start..body_end];

        match chunk_id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(PitchError::InvalidWav("fmt chunk too short".into()));
                }
                let audio_format = read_u16(body, 0);
                let channels = read_u16(body, 2);
                let rate = read_u32(body, 4);
                let bits = read_u16(body, 14);
                if audio_format != 1 {
                    return Err(PitchError::Unsupported(format!(
                        "audio format {audio_format}, only PCM is handled"
                    )));
                }
                if channels != 1 {
                    return Err(PitchError::Unsupported(format!(
                        "{channels} channels, only mono is handled"
                    )));
                }
                if bits != 16 {
                    return Err(PitchError::Unsupported(format!(
                        "{bits}-bit samples, only 16-bit is handled"
                    )));
                }
                sample_rate = Some(rate);
            }
            b"data" => {
                let parsed: Vec<i16> = body
                    .chunks_exact(2)
                    .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                samples = Some(parsed);
            }
            _ => {}
        }

        // Chunks are word aligned; odd sizes carry a pad byte.
        offset = body_end + (chunk_size & 1);
    }

    match (sample_rate, samples) {
        (Some(sample_rate), Some(samples)) => Ok(WavAudio {
            sample_rate,
            samples,
        }),
        (None, _) => Err(PitchError::InvalidWav("missing fmt chunk".into())),
        (_, None) => Err(PitchError::InvalidWav("missing data chunk".into())),
    }
}

/// Resample by `factor` with linear interpolation. A factor above one reads
/// the input faster, producing fewer output samples.
fn resample(samples: &[i16], factor: f64) -> Vec<i16> {
    if samples.is_empty() {
        return Vec::new();
    }
    let out_len = ((samples.len() as f64) / factor).round().max(1.0) as usize;
    let last = samples.len() - 1;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * factor;
        let idx = (pos.floor() as usize).min(last);
        let frac = pos - idx as f64;
        let a = f64::from(samples[idx]);
        let b = f64::from(samples[(idx + 1).min(last)]);
        out.push((a + (b - a) * frac).round() as i16);
    }
    out
}

fn build_wav(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let data_len = samples.len() * 2;
    let riff_size = 4 + 8 + 16 + 8 + data_len;
    let mut out = Vec::with_capacity(8 + riff_size);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(riff_size as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}
