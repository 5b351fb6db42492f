use std::io::Cursor;
use tracing::debug;

use super::backend::AudioFrame;
use crate::error::ChatError;

/// A finished recording: all captured frames joined into one PCM buffer
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioClip {
    /// Join captured frames into one clip in the target format.
    ///
    /// Every frame is remixed to `target_channels` and resampled to
    /// `target_sample_rate`, so frames captured at different rates or
    /// channel counts still yield a clip whose header matches its samples.
    /// A zero target keeps the first frame's value.
    pub fn from_frames(
        frames: Vec<AudioFrame>,
        target_sample_rate: u32,
        target_channels: u16,
    ) -> Self {
        let first = frames.first();
        let sample_rate = match target_sample_rate {
            0 => first.map_or(0, |frame| frame.sample_rate),
            rate => rate,
        };
        let channels = match target_channels {
            0 => first.map_or(1, |frame| frame.channels.max(1)),
            channels => channels,
        };

        let mut samples = Vec::new();
        // Consecutive frames at one source rate are resampled together so
        // interpolation doesn't restart at every frame boundary
        let mut run: Vec<i16> = Vec::new();
        let mut run_rate = 0;

        for frame in frames {
            if frame.sample_rate != run_rate && !run.is_empty() {
                samples.extend(resample(&run, run_rate, sample_rate, channels));
                run.clear();
            }
            run_rate = frame.sample_rate;
            run.extend(remix(&frame.samples, frame.channels, channels));
        }
        if !run.is_empty() {
            samples.extend(resample(&run, run_rate, sample_rate, channels));
        }

        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        let per_second = self.sample_rate as u64 * self.channels.max(1) as u64;
        if per_second == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / per_second
    }

    /// Encode as a 16-bit PCM WAV file
    pub fn to_wav(&self) -> Result<Vec<u8>, ChatError> {
        if self.is_empty() {
            return Err(ChatError::Encode("recording captured no audio".to_string()));
        }

        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| ChatError::Encode(format!("failed to create WAV: {}", e)))?;
            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| ChatError::Encode(format!("failed to write sample: {}", e)))?;
            }
            writer
                .finalize()
                .map_err(|e| ChatError::Encode(format!("failed to finalize WAV: {}", e)))?;
        }

        let wav = cursor.into_inner();
        debug!(
            "Encoded clip: {}ms, {} bytes",
            self.duration_ms(),
            wav.len()
        );

        Ok(wav)
    }
}

/// Convert interleaved samples from `from` to `to` channels.
///
/// Mono output sums all channels (clamped); otherwise channels are mapped
/// round-robin, which duplicates mono into stereo.
fn remix(samples: &[i16], from: u16, to: u16) -> Vec<i16> {
    let from = from.max(1) as usize;
    let to = to.max(1) as usize;
    if from == to {
        return samples.to_vec();
    }

    samples
        .chunks_exact(from)
        .flat_map(|frame| {
            let mixed: Vec<i16> = if to == 1 {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                vec![sum.clamp(i16::MIN as i32, i16::MAX as i32) as i16]
            } else {
                (0..to).map(|c| frame[c % from]).collect()
            };
            mixed
        })
        .collect()
}

/// Resample interleaved audio by linear interpolation.
///
/// Output frame `i` is read at source position `i * from / to`; whole
/// ratios reduce to plain decimation.
fn resample(samples: &[i16], from: u32, to: u32, channels: u16) -> Vec<i16> {
    let channels = channels.max(1) as usize;
    let frames = samples.len() / channels;
    if from == to || from == 0 || to == 0 || frames == 0 {
        return samples.to_vec();
    }

    let count = (frames as u64 * to as u64).div_ceil(from as u64) as usize;
    let step = from as f64 / to as f64;
    let mut out = Vec::with_capacity(count * channels);

    for i in 0..count {
        let position = i as f64 * step;
        let index = (position.floor() as usize).min(frames - 1);
        let next = (index + 1).min(frames - 1);
        let frac = position - index as f64;

        for c in 0..channels {
            let a = samples[index * channels + c] as f64;
            let b = samples[next * channels + c] as f64;
            out.push((a + (b - a) * frac).round() as i16);
        }
    }

    out
}
