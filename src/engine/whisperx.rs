//! WhisperX backend: whisper.cpp via whisper-rs.

use super::{EngineKind, SpeechEngine};
use crate::{audio, hub};
use log::{debug, warn};
use std::path::Path;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

const TARGET_SAMPLE_RATE: usize = 16_000;
const MODEL_FILE: &str = "ggml-medium.bin";

/// Where inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Gpu,
}

/// Decode options for the whisper backend.
#[derive(Debug, Clone, Copy)]
pub struct WhisperOptions {
    pub device: Device,
    /// Requested batch size for the transcription call.
    pub batch_size: usize,
}

impl Default for WhisperOptions {
    fn default() -> Self {
        Self {
            device: Device::Gpu,
            batch_size: 1,
        }
    }
}

impl WhisperOptions {
    /// Number of decode passes actually made. whisper.cpp decodes
    /// single-stream, so batch sizes above 1 warn and fall back to one.
    pub fn effective_batch_size(&self) -> usize {
        if self.batch_size > 1 {
            warn!(
                "whisper.cpp decodes single-stream; ignoring batch size {}",
                self.batch_size
            );
        }
        1
    }
}

pub struct WhisperXEngine {
    ctx: WhisperContext,
    options: WhisperOptions,
}

impl WhisperXEngine {
    /// Load the ggml whisper model, fetching it into `models_dir` first if
    /// it is not cached locally.
    pub fn new(models_dir: &Path, options: WhisperOptions) -> Result<Self, String> {
        let model_dir = hub::ensure_engine_model(models_dir, EngineKind::Whisperx)?;
        let model_path = model_dir.join(MODEL_FILE);

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(options.device == Device::Gpu);
        let ctx = WhisperContext::new_with_params(&model_path.to_string_lossy(), ctx_params)
            .map_err(|e| e.to_string())?;
        Ok(Self { ctx, options })
    }
}

impl SpeechEngine for WhisperXEngine {
    fn id(&self) -> &'static str {
        "whisperx"
    }

    fn name(&self) -> &'static str {
        "WhisperX (whisper.cpp)"
    }

    fn transcribe(&mut self, audio_path: &Path) -> Result<String, String> {
        let buffer = audio::load_wav(audio_path)?;
        let mono = audio::to_mono(&buffer);
        // whisper.cpp requires 16 kHz input.
        let resampled = audio::Resampler::new(TARGET_SAMPLE_RATE).resample(&mono)?;
        debug!("[whisperx] {:.2}s of audio", resampled.duration());

        // One pass regardless of the requested batch size.
        let _passes = self.options.effective_batch_size();

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self.ctx.create_state().map_err(|e| e.to_string())?;
        state
            .full(params, &resampled.samples)
            .map_err(|e| e.to_string())?;

        let num_segments = state.full_n_segments().map_err(|e| e.to_string())?;
        if num_segments == 0 {
            return Ok(String::new());
        }
        // Single-utterance assumption: only the first segment is surfaced,
        // verbatim as the library produced it.
        state.full_get_segment_text(0).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_gpu_with_single_batch() {
        let options = WhisperOptions::default();
        assert_eq!(options.device, Device::Gpu);
        assert_eq!(options.batch_size, 1);
        assert_eq!(options.effective_batch_size(), 1);
    }

    #[test]
    fn oversized_batch_falls_back_to_one_pass() {
        let options = WhisperOptions {
            device: Device::Cpu,
            batch_size: 8,
        };
        assert_eq!(options.effective_batch_size(), 1);
    }

    #[test]
    fn zero_batch_still_decodes_once() {
        let options = WhisperOptions {
            device: Device::Cpu,
            batch_size: 0,
        };
        assert_eq!(options.effective_batch_size(), 1);
    }
}
