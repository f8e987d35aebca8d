//! SherpaONNX backend: zipformer offline transducer.

use super::{EngineKind, SpeechEngine};
use crate::{audio, hub};
use log::debug;
use sherpa_rs::zipformer::{ZipFormer, ZipFormerConfig};
use std::path::Path;

const TARGET_SAMPLE_RATE: usize = 16_000;

pub struct SherpaOnnxEngine {
    decoder: ZipFormer,
    resampler: audio::Resampler,
}

impl SherpaOnnxEngine {
    /// Load the zipformer transducer, fetching its files into `models_dir`
    /// first if they are not cached locally.
    pub fn new(models_dir: &Path) -> Result<Self, String> {
        let model_dir = hub::ensure_engine_model(models_dir, EngineKind::SherpaOnnx)?;
        let config = ZipFormerConfig {
            encoder: model_dir.join("encoder-epoch-99-avg-1.onnx").to_string_lossy().into_owned(),
            decoder: model_dir.join("decoder-epoch-99-avg-1.onnx").to_string_lossy().into_owned(),
            joiner: model_dir.join("joiner-epoch-99-avg-1.onnx").to_string_lossy().into_owned(),
            tokens: model_dir.join("tokens.txt").to_string_lossy().into_owned(),
            ..Default::default()
        };
        let decoder = ZipFormer::new(config).map_err(|e| e.to_string())?;
        Ok(Self {
            decoder,
            resampler: audio::Resampler::new(TARGET_SAMPLE_RATE),
        })
    }
}

impl SpeechEngine for SherpaOnnxEngine {
    fn id(&self) -> &'static str {
        "sherpa-onnx"
    }

    fn name(&self) -> &'static str {
        "SherpaONNX (zipformer)"
    }

    fn transcribe(&mut self, audio_path: &Path) -> Result<String, String> {
        let buffer = audio::load_wav(audio_path)?;
        let mono = audio::to_mono(&buffer);
        // The transducer expects 16 kHz input.
        let resampled = self.resampler.resample(&mono)?;
        debug!(
            "[sherpa-onnx] {:.2}s of audio resampled {} -> {} Hz",
            mono.duration(),
            mono.sample_rate,
            TARGET_SAMPLE_RATE
        );

        // Returned verbatim from the decoder.
        Ok(self
            .decoder
            .decode(TARGET_SAMPLE_RATE as u32, resampled.samples))
    }
}
