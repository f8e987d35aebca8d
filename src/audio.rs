//! WAV loading and resampling for the recognition engines.

use hound::WavReader;
use rubato::{FftFixedInOut, Resampler as RubatoResampler};
use std::path::Path;

/// Decoded audio with its original sample rate and channel count.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Interleaved samples, normalized to [-1.0, 1.0].
    pub samples: Vec<f32>,
    pub sample_rate: usize,
    pub channels: usize,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: usize, channels: usize) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / (self.sample_rate * self.channels) as f32
    }
}

/// Load a WAV file. Int samples are normalized to [-1.0, 1.0].
pub fn load_wav(path: &Path) -> Result<AudioBuffer, String> {
    let reader =
        WavReader::open(path).map_err(|e| format!("Failed to open WAV {}: {}", path.display(), e))?;
    let spec = reader.spec();
    let sample_rate = spec.sample_rate as usize;
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Failed to read samples: {}", e))?,
        hound::SampleFormat::Int => {
            let scale = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| format!("Failed to read samples: {}", e))?
        }
    };

    Ok(AudioBuffer::new(samples, sample_rate, channels))
}

/// Downmix to mono by averaging channels. Mono input is returned as-is.
pub fn to_mono(buffer: &AudioBuffer) -> AudioBuffer {
    if buffer.channels == 1 {
        return buffer.clone();
    }
    let mono: Vec<f32> = buffer
        .samples
        .chunks(buffer.channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();
    AudioBuffer::new(mono, buffer.sample_rate, 1)
}

const RESAMPLE_CHUNK_HINT: usize = 1024;

/// Fixed-rate audio resampler. Input must be mono.
pub struct Resampler {
    target_rate: usize,
}

impl Resampler {
    pub fn new(target_rate: usize) -> Self {
        Self { target_rate }
    }

    /// Resample a mono buffer to the target rate.
    pub fn resample(&self, buffer: &AudioBuffer) -> Result<AudioBuffer, String> {
        if buffer.sample_rate == self.target_rate {
            return Ok(buffer.clone());
        }
        if buffer.channels != 1 {
            return Err("Resampling requires mono audio; call to_mono() first".to_string());
        }

        let mut fft = FftFixedInOut::<f32>::new(
            buffer.sample_rate,
            self.target_rate,
            RESAMPLE_CHUNK_HINT,
            1,
        )
        .map_err(|e| format!("Failed to create resampler: {}", e))?;

        // The FFT resampler picks its own valid input block size near the hint.
        let chunk_in = fft.input_frames_next();
        let ratio = self.target_rate as f64 / buffer.sample_rate as f64;
        let mut out = Vec::with_capacity((buffer.samples.len() as f64 * ratio) as usize + chunk_in);

        let mut chunks = buffer.samples.chunks_exact(chunk_in);
        for chunk in &mut chunks {
            let produced = fft
                .process(&[chunk.to_vec()], None)
                .map_err(|e| format!("Resampling failed: {}", e))?;
            out.extend_from_slice(&produced[0]);
        }

        // Zero-pad the final partial chunk and keep only the proportional output.
        let tail = chunks.remainder();
        if !tail.is_empty() {
            let mut padded = tail.to_vec();
            padded.resize(chunk_in, 0.0);
            let produced = fft
                .process(&[padded], None)
                .map_err(|e| format!("Resampling failed: {}", e))?;
            let keep = (produced[0].len() as f64 * tail.len() as f64 / chunk_in as f64) as usize;
            out.extend_from_slice(&produced[0][..keep.min(produced[0].len())]);
        }

        Ok(AudioBuffer::new(out, self.target_rate, 1))
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(16_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    #[test]
    fn to_mono_averages_channels() {
        let stereo = AudioBuffer::new(vec![1.0, 0.0, 0.5, 0.5], 16_000, 2);
        let mono = to_mono(&stereo);
        assert_eq!(mono.channels, 1);
        assert_eq!(mono.samples.len(), 2);
        assert!((mono.samples[0] - 0.5).abs() < 1e-6);
        assert!((mono.samples[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let buffer = AudioBuffer::new(vec![0.25; 2048], 16_000, 1);
        let out = Resampler::new(16_000).resample(&buffer).unwrap();
        assert_eq!(out.sample_rate, 16_000);
        assert_eq!(out.samples.len(), buffer.samples.len());
    }

    #[test]
    fn resample_8k_to_16k_doubles_sample_count() {
        let buffer = AudioBuffer::new(vec![0.1; 4096], 8_000, 1);
        let out = Resampler::new(16_000).resample(&buffer).unwrap();
        assert_eq!(out.sample_rate, 16_000);
        let expected = 8192i64;
        assert!((out.samples.len() as i64 - expected).abs() <= 32);
    }

    #[test]
    fn resample_rejects_stereo() {
        let stereo = AudioBuffer::new(vec![0.0; 2048], 44_100, 2);
        assert!(Resampler::default().resample(&stereo).is_err());
    }

    #[test]
    fn load_wav_missing_file_errors() {
        assert!(load_wav(Path::new("definitely/not/here.wav")).is_err());
    }

    #[test]
    fn load_wav_normalizes_int_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [0i16, i16::MAX / 2, i16::MIN / 2, 0] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let buffer = load_wav(&path).unwrap();
        assert_eq!(buffer.sample_rate, 16_000);
        assert_eq!(buffer.channels, 1);
        assert_eq!(buffer.samples.len(), 4);
        assert!(buffer.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!((buffer.samples[1] - 0.5).abs() < 1e-3);
    }
}
