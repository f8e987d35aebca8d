//! FunASR backend: paraformer-zh served by the sherpa-onnx runtime.

use super::{EngineKind, SpeechEngine};
use crate::{audio, hub, textnorm};
use log::debug;
use sherpa_rs::paraformer::{ParaformerConfig, ParaformerRecognizer};
use std::path::Path;

pub struct FunAsrEngine {
    recognizer: ParaformerRecognizer,
}

impl FunAsrEngine {
    /// Load the paraformer-zh model, fetching it into `models_dir` first
    /// if it is not cached locally.
    pub fn new(models_dir: &Path) -> Result<Self, String> {
        let model_dir = hub::ensure_engine_model(models_dir, EngineKind::Funasr)?;
        let config = ParaformerConfig {
            model: model_dir.join("model.int8.onnx").to_string_lossy().into_owned(),
            tokens: model_dir.join("tokens.txt").to_string_lossy().into_owned(),
            ..Default::default()
        };
        let recognizer = ParaformerRecognizer::new(config).map_err(|e| e.to_string())?;
        Ok(Self { recognizer })
    }
}

impl SpeechEngine for FunAsrEngine {
    fn id(&self) -> &'static str {
        "funasr"
    }

    fn name(&self) -> &'static str {
        "FunASR (paraformer-zh)"
    }

    fn transcribe(&mut self, audio_path: &Path) -> Result<String, String> {
        let buffer = audio::load_wav(audio_path)?;
        let mono = audio::to_mono(&buffer);
        debug!("[funasr] {:.2}s of audio at {} Hz", mono.duration(), mono.sample_rate);

        // The runtime resamples internally, so samples go in at native rate.
        let result = self
            .recognizer
            .transcribe(mono.sample_rate as u32, &mono.samples);

        // Paraformer emits space-separated ideographs; collapse the gaps.
        // No other normalization is applied.
        Ok(textnorm::collapse_cjk_whitespace(&result.text))
    }
}
